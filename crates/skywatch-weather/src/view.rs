//! Per-view ephemeral forecast state.
//!
//! Holds loading/error flags and the active tab filter over a fetched
//! forecast bundle. Filtering is a pure local re-projection; switching tabs
//! never triggers a network call. Results from superseded fetches are
//! discarded via the same generation-counter rule the location manager
//! uses.

use skywatch_api::{ForecastEntry, ForecastType};

#[derive(Debug, Default)]
pub struct ForecastView {
    loading: bool,
    error: Option<String>,
    active_filter: Option<ForecastType>,
    entries: Vec<ForecastEntry>,
    generation: u64,
}

impl ForecastView {
    pub fn new(initial_filter: ForecastType) -> Self {
        Self {
            active_filter: Some(initial_filter),
            ..Self::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn active_filter(&self) -> Option<ForecastType> {
        self.active_filter
    }

    /// Start a fetch for the current location; returns the generation
    /// ticket the eventual result must present to be applied.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.generation
    }

    /// Apply a completed fetch. Returns false (state untouched) when a
    /// newer load superseded this one.
    pub fn apply(&mut self, generation: u64, result: Result<Vec<ForecastEntry>, String>) -> bool {
        if generation != self.generation {
            tracing::debug!(
                stale = generation,
                current = self.generation,
                "Discarding stale forecast result"
            );
            return false;
        }
        self.loading = false;
        match result {
            Ok(entries) => {
                self.entries = entries;
                self.error = None;
            }
            Err(message) => {
                self.entries.clear();
                self.error = Some(message);
            }
        }
        true
    }

    /// Switch the active tab. Local only; the fetched bundle is reused.
    pub fn set_filter(&mut self, filter: ForecastType) {
        self.active_filter = Some(filter);
    }

    /// The entries for the active tab. Idempotent: same bundle and filter
    /// always project the same sequence.
    pub fn visible(&self) -> Vec<&ForecastEntry> {
        match self.active_filter {
            Some(filter) => self
                .entries
                .iter()
                .filter(|e| e.forecast_type == filter)
                .collect(),
            None => self.entries.iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::Utc;

    fn entry(forecast_type: ForecastType, high: f64) -> ForecastEntry {
        ForecastEntry {
            forecast_type,
            forecast_time: Utc::now(),
            high_temperature: high,
            low_temperature: high - 7.0,
            rain_probability: 30.0,
            uv_index: 6.0,
            weather_condition: None,
        }
    }

    fn mixed_bundle() -> Vec<ForecastEntry> {
        vec![
            entry(ForecastType::Short, 30.0),
            entry(ForecastType::Daily, 31.0),
            entry(ForecastType::Daily, 32.0),
            entry(ForecastType::Weekly, 33.0),
        ]
    }

    #[test]
    fn load_cycle_sets_and_clears_loading() {
        let mut view = ForecastView::new(ForecastType::Daily);

        let ticket = view.begin_load();
        assert!(view.is_loading());

        assert!(view.apply(ticket, Ok(mixed_bundle())));
        assert!(!view.is_loading());
        assert!(view.error().is_none());
        assert_eq!(view.visible().len(), 2);
    }

    #[test]
    fn filtering_is_idempotent() {
        let mut view = ForecastView::new(ForecastType::Daily);
        let ticket = view.begin_load();
        view.apply(ticket, Ok(mixed_bundle()));

        let first: Vec<f64> = view.visible().iter().map(|e| e.high_temperature).collect();
        let second: Vec<f64> = view.visible().iter().map(|e| e.high_temperature).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![31.0, 32.0]);
    }

    #[test]
    fn switching_tabs_only_changes_the_projection() {
        let mut view = ForecastView::new(ForecastType::Daily);
        let ticket = view.begin_load();
        view.apply(ticket, Ok(mixed_bundle()));

        view.set_filter(ForecastType::Weekly);
        let weekly = view.visible();
        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[0].high_temperature, 33.0);

        view.set_filter(ForecastType::Short);
        assert_eq!(view.visible().len(), 1);

        // The fetched bundle itself is untouched by tab switches.
        view.set_filter(ForecastType::Daily);
        assert_eq!(view.visible().len(), 2);
    }

    #[test]
    fn stale_result_is_discarded() {
        let mut view = ForecastView::new(ForecastType::Daily);

        let old_ticket = view.begin_load();
        let new_ticket = view.begin_load();

        // The older fetch resolves after the newer one started.
        assert!(view.apply(new_ticket, Ok(mixed_bundle())));
        assert!(!view.apply(old_ticket, Ok(vec![entry(ForecastType::Daily, 99.0)])));

        let highs: Vec<f64> = view.visible().iter().map(|e| e.high_temperature).collect();
        assert_eq!(highs, vec![31.0, 32.0]);
    }

    #[test]
    fn failed_load_records_the_error() {
        let mut view = ForecastView::new(ForecastType::Daily);
        let ticket = view.begin_load();

        assert!(view.apply(ticket, Err("resolution failed".to_string())));
        assert!(!view.is_loading());
        assert_eq!(view.error(), Some("resolution failed"));
        assert!(view.visible().is_empty());
    }
}
