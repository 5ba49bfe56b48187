//! In-memory TTL cache for forecast bundles.
//!
//! Keyed by `(location_id, ForecastType)`. The all-types response is
//! partitioned by its discriminant on store; a bundle is only served back
//! when every type is present and unexpired, so a partial or aging cache
//! triggers one fresh all-types fetch rather than mixed-age data.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use skywatch_api::{ForecastEntry, ForecastType};

struct CachedSlice {
    fetched_at: Instant,
    entries: Vec<ForecastEntry>,
}

pub struct ForecastCache {
    ttl: Duration,
    slices: Mutex<HashMap<(i64, ForecastType), CachedSlice>>,
}

impl ForecastCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slices: Mutex::new(HashMap::new()),
        }
    }

    /// Partition an all-types response by forecast type and cache each
    /// slice. Types absent from the response are cached empty, so a server
    /// that legitimately has no weekly data doesn't force refetches.
    pub fn store_bundle(&self, location_id: i64, entries: &[ForecastEntry]) {
        let now = Instant::now();
        let mut slices = self.slices.lock();
        for forecast_type in ForecastType::ALL {
            let slice: Vec<ForecastEntry> = entries
                .iter()
                .filter(|e| e.forecast_type == forecast_type)
                .cloned()
                .collect();
            slices.insert(
                (location_id, forecast_type),
                CachedSlice {
                    fetched_at: now,
                    entries: slice,
                },
            );
        }
    }

    /// The full bundle for a location, or `None` when any type is missing
    /// or expired.
    pub fn get_bundle(&self, location_id: i64) -> Option<Vec<ForecastEntry>> {
        let slices = self.slices.lock();
        let mut bundle = Vec::new();
        for forecast_type in ForecastType::ALL {
            let slice = slices.get(&(location_id, forecast_type))?;
            if slice.fetched_at.elapsed() > self.ttl {
                return None;
            }
            bundle.extend(slice.entries.iter().cloned());
        }
        Some(bundle)
    }

    /// Drop everything cached for one location (invalidate-on-navigate).
    pub fn invalidate(&self, location_id: i64) {
        self.slices
            .lock()
            .retain(|(id, _), _| *id != location_id);
    }

    /// Drop all cached data.
    pub fn clear(&self) {
        self.slices.lock().clear();
    }
}
