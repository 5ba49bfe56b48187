//! The aggregated fetch pattern every weather-consuming view follows.
//!
//! The remote service assigns each location an identifier that is only
//! learned from the current-weather endpoint, so every chain starts with a
//! resolve step. Dependent fetches (forecasts, alerts) are strictly
//! sequenced after it and isolated per call: a failing alerts fetch never
//! blocks a working forecast. Multi-location fan-out runs the resolve step
//! concurrently per name and drops failing branches from the aggregate.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::instrument;

use skywatch_api::{ApiClient, ForecastEntry};
use skywatch_core::error::{LocationError, NetworkError};

use crate::cache::ForecastCache;
use crate::types::{CitySummary, LocationOverview, WeatherSnapshot};

pub struct WeatherOrchestrator {
    api: Arc<ApiClient>,
    cache: ForecastCache,
}

impl WeatherOrchestrator {
    pub fn new(api: Arc<ApiClient>, forecast_ttl: Duration) -> Self {
        Self {
            api,
            cache: ForecastCache::new(forecast_ttl),
        }
    }

    /// Step 1 of the pattern: resolve a display name to current conditions
    /// plus the canonical location identifier. Failure here aborts the
    /// whole chain for that location.
    #[instrument(skip(self), level = "info")]
    pub async fn resolve(&self, name: &str) -> Result<WeatherSnapshot, LocationError> {
        match self.api.current_weather(name).await {
            Ok(response) => Ok(WeatherSnapshot::from(response.weather)),
            Err(e) => Err(LocationError::ResolutionFailed {
                name: name.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Forecast bundle for a resolved location, served from the TTL cache
    /// when possible.
    #[instrument(skip(self), level = "debug")]
    pub async fn forecasts(&self, location_id: i64) -> Result<Vec<ForecastEntry>, NetworkError> {
        if let Some(bundle) = self.cache.get_bundle(location_id) {
            tracing::debug!(location_id, "Forecast cache hit");
            return Ok(bundle);
        }

        let entries = self.api.forecast_all_types(location_id).await?;
        self.cache.store_bundle(location_id, &entries);
        Ok(entries)
    }

    /// Full single-location view: resolve, then dependent fetches, each
    /// isolated. A failed forecast or alerts call contributes an empty list
    /// and a warning, not an error.
    #[instrument(skip(self), level = "info")]
    pub async fn overview(&self, name: &str) -> Result<LocationOverview, LocationError> {
        let snapshot = self.resolve(name).await?;

        let forecasts = match self.forecasts(snapshot.location_id).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Forecast fetch failed for {}: {}", name, e);
                Vec::new()
            }
        };

        let alerts = match self.api.alerts(name).await {
            Ok(alerts) => alerts,
            Err(e) => {
                tracing::warn!("Alerts fetch failed for {}: {}", name, e);
                Vec::new()
            }
        };

        Ok(LocationOverview {
            snapshot,
            forecasts,
            alerts,
        })
    }

    /// Fan-out over a fixed set of city names, one resolve per name
    /// concurrently. Each branch's failure is caught independently and
    /// contributes nothing to the aggregate; the result order is whatever
    /// completion order was and must be treated as commutative.
    #[instrument(skip(self, names), level = "info")]
    pub async fn city_summaries(&self, names: &[String]) -> Vec<CitySummary> {
        let mut set = JoinSet::new();

        for name in names {
            let api = self.api.clone();
            let name = name.clone();
            set.spawn(async move {
                match api.current_weather(&name).await {
                    Ok(response) => {
                        let w = response.weather;
                        Some(CitySummary {
                            name,
                            temperature: w.temperature,
                            condition: w.weather_condition,
                            rain_probability: w.rain_probability,
                        })
                    }
                    Err(e) => {
                        tracing::warn!("Dropping {} from summary: {}", name, e);
                        None
                    }
                }
            });
        }

        let mut summaries = Vec::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(Some(summary)) => summaries.push(summary),
                Ok(None) => {}
                Err(e) => tracing::warn!("Summary task panicked: {}", e),
            }
        }
        summaries
    }

    /// Drop cached forecasts for a location (used on navigate-away).
    pub fn invalidate_forecasts(&self, location_id: i64) {
        self.cache.invalidate(location_id);
    }
}

impl std::fmt::Debug for WeatherOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherOrchestrator").finish()
    }
}
