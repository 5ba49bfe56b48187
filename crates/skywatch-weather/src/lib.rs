//! Location state and aggregated weather fetching for Skywatch.
//!
//! Owns the "current location" value and its resolution pipeline, and
//! provides the resolve → dependent-fetch → fan-out pattern every
//! weather-consuming view follows, with stale-result protection and
//! per-call failure isolation.

pub mod cache;
pub mod device;
pub mod geocode;
pub mod location;
pub mod orchestrator;
pub mod types;
pub mod view;

pub use cache::ForecastCache;
pub use device::PositionSource;
pub use geocode::Geocoder;
pub use location::LocationManager;
pub use orchestrator::WeatherOrchestrator;
pub use types::*;
pub use view::ForecastView;
