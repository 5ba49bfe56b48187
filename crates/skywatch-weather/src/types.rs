//! Domain types for location state and aggregated weather views.

use skywatch_api::{CurrentConditions, ForecastEntry, WeatherAlert};

/// Geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// The application's notion of "where": a display name, always present,
/// plus coordinates once any resolution has succeeded. The remote service's
/// location identifier is deliberately not cached here; the orchestrator
/// resolves it lazily per fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub display_name: String,
    pub coordinates: Option<Coordinates>,
}

impl Location {
    pub fn named(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            coordinates: None,
        }
    }
}

/// Where the current location value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionPhase {
    /// Startup default; nothing resolved yet.
    #[default]
    Default,
    /// A device-position resolution is in flight.
    Resolving,
    /// Device resolution or an explicit user choice settled the value.
    Resolved,
}

/// Point-in-time weather for one location, with the resolved identifier the
/// dependent fetches need. Ephemeral: owned by the view that fetched it.
#[derive(Debug, Clone)]
pub struct WeatherSnapshot {
    pub location_id: i64,
    pub location_name: String,
    pub temperature: f64,
    pub condition: String,
    pub humidity: f64,
    pub rain_probability: Option<f64>,
}

impl From<CurrentConditions> for WeatherSnapshot {
    fn from(w: CurrentConditions) -> Self {
        Self {
            location_id: w.location.id,
            location_name: w.location.name,
            temperature: w.temperature,
            condition: w.weather_condition,
            humidity: w.humidity,
            rain_probability: w.rain_probability,
        }
    }
}

/// One city's entry in a multi-city summary board.
#[derive(Debug, Clone)]
pub struct CitySummary {
    pub name: String,
    pub temperature: f64,
    pub condition: String,
    pub rain_probability: Option<f64>,
}

/// Everything a single-location view needs: the snapshot from resolution
/// plus the per-call-isolated dependent fetches. A failed dependent fetch
/// contributes an empty list, never an error.
#[derive(Debug, Clone)]
pub struct LocationOverview {
    pub snapshot: WeatherSnapshot,
    pub forecasts: Vec<ForecastEntry>,
    pub alerts: Vec<WeatherAlert>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use skywatch_api::LocationRecord;

    #[test]
    fn snapshot_carries_the_resolved_id() {
        let conditions = CurrentConditions {
            location: LocationRecord {
                id: 42,
                name: "Đà Nẵng".to_string(),
                latitude: 16.0544,
                longitude: 108.2022,
                country_code: "VN".to_string(),
            },
            temperature: 31.0,
            humidity: 75.0,
            wind_speed: 4.0,
            pressure: 1008.0,
            weather_condition: "Clear".to_string(),
            rain_probability: None,
        };

        let snapshot = WeatherSnapshot::from(conditions);
        assert_eq!(snapshot.location_id, 42);
        assert_eq!(snapshot.location_name, "Đà Nẵng");
        assert_eq!(snapshot.condition, "Clear");
    }

    #[test]
    fn named_location_has_no_coordinates() {
        let loc = Location::named("Hà Nội, VN");
        assert_eq!(loc.display_name, "Hà Nội, VN");
        assert!(loc.coordinates.is_none());
    }
}
