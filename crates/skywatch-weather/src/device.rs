//! Best-effort device position via IP geolocation.
//!
//! There is no portable OS geolocation API, so position comes from an
//! ip-api-compatible endpoint. Consumers only see pass/fail plus
//! coordinates; permission and timeout semantics belong to the provider.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use skywatch_core::error::LocationError;

use crate::types::Coordinates;

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct IpPositionResponse {
    status: String,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

pub struct PositionSource {
    client: Client,
    base_url: String,
}

impl PositionSource {
    pub fn new(base_url: &str) -> Result<Self, LocationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                tracing::warn!("Failed to create position client: {}", e);
                LocationError::ServiceUnavailable
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Look up the device's approximate position.
    pub async fn current_position(&self) -> Result<Coordinates, LocationError> {
        let url = format!("{}/json", self.base_url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                LocationError::Timeout
            } else {
                LocationError::ServiceUnavailable
            }
        })?;

        if !response.status().is_success() {
            return Err(LocationError::ServiceUnavailable);
        }

        let body: IpPositionResponse = response
            .json()
            .await
            .map_err(|_| LocationError::ServiceUnavailable)?;

        if body.status != "success" {
            return Err(LocationError::ServiceUnavailable);
        }

        match (body.lat, body.lon) {
            (Some(latitude), Some(longitude)) => Ok(Coordinates {
                latitude,
                longitude,
            }),
            _ => Err(LocationError::ServiceUnavailable),
        }
    }
}
