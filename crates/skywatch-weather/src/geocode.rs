//! Reverse geocoding: convert coordinates to a human-readable place name.
//! Uses a Nominatim-compatible endpoint; free, no API key required.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::types::Coordinates;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "Skywatch/0.1.0";

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<ReverseAddress>,
}

#[derive(Debug, Deserialize)]
struct ReverseAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    country: Option<String>,
    country_code: Option<String>,
}

pub struct Geocoder {
    client: Option<Client>,
    base_url: String,
}

impl Geocoder {
    /// Geocoder against the given Nominatim-compatible base URL.
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build();

        let client = match client {
            Ok(c) => Some(c),
            Err(e) => {
                tracing::warn!("Failed to create geocoding client: {}", e);
                None
            }
        };

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Reverse geocode coordinates to "Place, CC" (e.g. "Hà Nội, VN").
    ///
    /// Returns `None` on any failure; geocoding is best-effort and the
    /// caller keeps its previous display name.
    pub async fn reverse(&self, coords: Coordinates) -> Option<String> {
        let client = self.client.as_ref()?;

        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json&addressdetails=1&zoom=10",
            self.base_url, coords.latitude, coords.longitude
        );

        let response = match client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Reverse geocode request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Reverse geocode returned status {}", response.status());
            return None;
        }

        let body: ReverseResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!("Reverse geocode parse error: {}", e);
                return None;
            }
        };

        let addr = body.address?;

        let place = addr
            .city
            .or(addr.town)
            .or(addr.village)
            .or(addr.state)
            .or(addr.country)?;

        // Suffix with the country code for disambiguation, "Hà Nội, VN".
        let result = match addr.country_code.as_deref() {
            Some(cc) if !cc.is_empty() => format!("{}, {}", place, cc.to_uppercase()),
            _ => place,
        };

        tracing::info!("Reverse geocoded to: {}", result);
        Some(result)
    }
}
