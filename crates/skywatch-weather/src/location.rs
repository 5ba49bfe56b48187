//! Location state manager.
//!
//! Owns the current [`Location`] value and its resolution pipeline. User
//! overrides via [`LocationManager::set_location`] always win over in-flight
//! device resolutions: every change bumps a monotonic generation counter,
//! and an async result is applied only if its generation is still current.
//! Stale results are discarded silently.

use std::future::Future;

use parking_lot::RwLock;

use skywatch_core::error::LocationError;

use crate::geocode::Geocoder;
use crate::types::{Coordinates, Location, ResolutionPhase};

struct LocationInner {
    location: Location,
    phase: ResolutionPhase,
    generation: u64,
}

pub struct LocationManager {
    inner: RwLock<LocationInner>,
}

impl LocationManager {
    /// Start at the configured default display name, unresolved.
    pub fn new(default_display_name: &str) -> Self {
        Self {
            inner: RwLock::new(LocationInner {
                location: Location::named(default_display_name),
                phase: ResolutionPhase::Default,
                generation: 0,
            }),
        }
    }

    /// The location value as of right now. Readers must call this at use
    /// time rather than holding a copy across awaits.
    pub fn current(&self) -> Location {
        self.inner.read().location.clone()
    }

    pub fn phase(&self) -> ResolutionPhase {
        self.inner.read().phase
    }

    pub fn generation(&self) -> u64 {
        self.inner.read().generation
    }

    /// Explicit override from search or navigation. Synchronous, always
    /// wins: the generation bump invalidates any in-flight resolution.
    pub fn set_location(&self, display_name: &str, coordinates: Option<Coordinates>) {
        let mut inner = self.inner.write();
        inner.generation += 1;
        inner.location = Location {
            display_name: display_name.to_string(),
            coordinates,
        };
        inner.phase = ResolutionPhase::Resolved;
        tracing::info!(
            generation = inner.generation,
            "Location set to {}",
            display_name
        );
    }

    /// Mark a resolution as started and return its generation ticket.
    pub fn begin_resolution(&self) -> u64 {
        let mut inner = self.inner.write();
        inner.generation += 1;
        inner.phase = ResolutionPhase::Resolving;
        inner.generation
    }

    /// Apply a completed resolution. Returns false (and changes nothing)
    /// when a newer change superseded this resolution.
    pub fn complete_resolution(
        &self,
        generation: u64,
        display_name: &str,
        coordinates: Coordinates,
    ) -> bool {
        let mut inner = self.inner.write();
        if inner.generation != generation {
            tracing::debug!(
                stale = generation,
                current = inner.generation,
                "Discarding stale location resolution"
            );
            return false;
        }
        inner.location = Location {
            display_name: display_name.to_string(),
            coordinates: Some(coordinates),
        };
        inner.phase = ResolutionPhase::Resolved;
        tracing::info!("Resolved device location: {}", display_name);
        true
    }

    /// Mark a failed resolution. The current value stays as it was; the
    /// failure is logged by the pipeline, not surfaced.
    pub fn fail_resolution(&self, generation: u64) {
        let mut inner = self.inner.write();
        if inner.generation != generation {
            return;
        }
        if inner.phase == ResolutionPhase::Resolving {
            inner.phase = ResolutionPhase::Default;
        }
    }

    /// Startup resolution pipeline: device position, then reverse geocode.
    ///
    /// Any failure along the way leaves the default display name in place
    /// and is logged only. A user override racing this pipeline wins via
    /// the generation guard.
    pub async fn resolve_with<F>(&self, position: F, geocoder: &Geocoder)
    where
        F: Future<Output = Result<Coordinates, LocationError>>,
    {
        let generation = self.begin_resolution();

        let coords = match position.await {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!("Device position unavailable: {}", e);
                self.fail_resolution(generation);
                return;
            }
        };

        match geocoder.reverse(coords).await {
            Some(name) => {
                self.complete_resolution(generation, &name, coords);
            }
            None => {
                tracing::debug!(
                    "Reverse geocode failed for {}, {}",
                    coords.latitude,
                    coords.longitude
                );
                self.fail_resolution(generation);
            }
        }
    }
}
