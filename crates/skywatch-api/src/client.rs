//! The single outbound-call gateway to the remote service.
//!
//! `ApiClient` centralizes the base endpoint and header configuration and
//! injects the current authorization credential into every request. The
//! credential is re-read from the shared [`CredentialStore`] at send time,
//! never captured at construction, so a login or logout is visible to the
//! very next request. The client performs no retries and no
//! logout-on-401; callers handle authorization failures explicitly.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use tracing::instrument;

use skywatch_core::error::{AuthError, NetworkError, ReqwestErrorExt};

use crate::types::*;

/// Shared cell holding the current authorization token.
///
/// Written only by the session manager; read by the client on every send.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    inner: Arc<RwLock<Option<String>>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The credential as of right now, or `None` when unauthenticated.
    pub fn current(&self) -> Option<String> {
        self.inner.read().clone()
    }

    pub fn set(&self, token: String) {
        *self.inner.write() = Some(token);
    }

    pub fn clear(&self) {
        *self.inner.write() = None;
    }

    pub fn is_set(&self) -> bool {
        self.inner.read().is_some()
    }
}

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    credential: CredentialStore,
}

impl ApiClient {
    /// Create a client for the given service base URL.
    pub fn new(
        base_url: &str,
        credential: CredentialStore,
        timeout: Duration,
    ) -> Result<Self, NetworkError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ReqwestErrorExt::into_network_error)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credential,
        })
    }

    /// Build a request for `path`, attaching the current credential if one
    /// is held. Unauthenticated requests go out without the header.
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, &url);
        match self.credential.current() {
            Some(token) => builder.header("Authorization", format!("Token {}", token)),
            None => builder,
        }
    }

    /// Decode a 2xx body or surface a typed failure. A body that doesn't
    /// match the expected schema fails fast here.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, NetworkError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| NetworkError::InvalidResponse(e.to_string()))
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(NetworkError::ServerError {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Success/failure for endpoints that answer with a plain
    /// `{"message": ...}` acknowledgement; the body is not decoded.
    async fn acknowledge(&self, response: reqwest::Response) -> Result<(), NetworkError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(NetworkError::ServerError {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// `POST /auth/register/`. Success does not imply login; the caller must
    /// invoke `login` separately.
    #[instrument(skip(self, request), level = "info")]
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), AuthError> {
        let response = self
            .request(reqwest::Method::POST, "/auth/register/")
            .json(request)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.into_network_error()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status.is_client_error() {
            let message = response.text().await.unwrap_or_default();
            Err(AuthError::RegistrationRejected { message })
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(AuthError::Network(NetworkError::ServerError {
                status: status.as_u16(),
                message,
            }))
        }
    }

    /// `POST /auth/login/`.
    #[instrument(skip(self, request), level = "info")]
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, AuthError> {
        let response = self
            .request(reqwest::Method::POST, "/auth/login/")
            .json(request)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.into_network_error()))?;

        let status = response.status();
        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| AuthError::Network(NetworkError::InvalidResponse(e.to_string())))
        } else if status.is_client_error() {
            Err(AuthError::InvalidCredentials)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(AuthError::Network(NetworkError::ServerError {
                status: status.as_u16(),
                message,
            }))
        }
    }

    /// `POST /current/by_location/`. Doubles as the name-to-id resolution
    /// call: the response embeds the canonical location identifier.
    #[instrument(skip(self), level = "info")]
    pub async fn current_weather(&self, name: &str) -> Result<CurrentWeatherResponse, NetworkError> {
        let response = self
            .request(reqwest::Method::POST, "/current/by_location/")
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        self.handle_response(response).await
    }

    /// `POST /alerts/by_location/`.
    #[instrument(skip(self), level = "info")]
    pub async fn alerts(&self, name: &str) -> Result<Vec<WeatherAlert>, NetworkError> {
        let response = self
            .request(reqwest::Method::POST, "/alerts/by_location/")
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        self.handle_response(response).await
    }

    /// `GET /forecast/{id}/?type=...` for one forecast type.
    #[instrument(skip(self), level = "info")]
    pub async fn forecast(
        &self,
        location_id: i64,
        forecast_type: ForecastType,
    ) -> Result<Vec<ForecastEntry>, NetworkError> {
        let path = format!("/forecast/{}/?type={}", location_id, forecast_type.as_str());
        let response = self
            .request(reqwest::Method::GET, &path)
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        self.handle_response(response).await
    }

    /// `GET /forecast/{id}/all_types/` returning all three types in one call, for
    /// client-side filtering per tab.
    #[instrument(skip(self), level = "info")]
    pub async fn forecast_all_types(
        &self,
        location_id: i64,
    ) -> Result<Vec<ForecastEntry>, NetworkError> {
        let path = format!("/forecast/{}/all_types/", location_id);
        let response = self
            .request(reqwest::Method::GET, &path)
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        self.handle_response(response).await
    }

    /// `GET /news/`.
    #[instrument(skip(self), level = "info")]
    pub async fn news(&self) -> Result<Vec<NewsArticle>, NetworkError> {
        let response = self
            .request(reqwest::Method::GET, "/news/")
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        self.handle_response(response).await
    }

    /// `GET /news/{id}/`.
    #[instrument(skip(self), level = "info")]
    pub async fn news_article(&self, id: i64) -> Result<NewsArticle, NetworkError> {
        let path = format!("/news/{}/", id);
        let response = self
            .request(reqwest::Method::GET, &path)
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        self.handle_response(response).await
    }

    /// `GET /user/profile/`, authenticated.
    #[instrument(skip(self), level = "info")]
    pub async fn profile(&self) -> Result<UserProfile, NetworkError> {
        let response = self
            .request(reqwest::Method::GET, "/user/profile/")
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        self.handle_response(response).await
    }

    /// `POST /user/update_profile/`, authenticated.
    #[instrument(skip(self, update), level = "info")]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, NetworkError> {
        let response = self
            .request(reqwest::Method::POST, "/user/update_profile/")
            .json(update)
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        self.handle_response(response).await
    }

    /// `POST /user/add_favorite_location/`, authenticated. The response is
    /// only an acknowledgement message; the updated favorites list comes
    /// from a fresh `profile()` call.
    #[instrument(skip(self), level = "info")]
    pub async fn add_favorite_location(&self, name: &str) -> Result<(), NetworkError> {
        let response = self
            .request(reqwest::Method::POST, "/user/add_favorite_location/")
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        self.acknowledge(response).await
    }

    /// `POST /user/remove_favorite_location/`, authenticated. Acknowledged
    /// only, like `add_favorite_location`.
    #[instrument(skip(self), level = "info")]
    pub async fn remove_favorite_location(&self, location_id: i64) -> Result<(), NetworkError> {
        let response = self
            .request(reqwest::Method::POST, "/user/remove_favorite_location/")
            .json(&serde_json::json!({ "location_id": location_id }))
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        self.acknowledge(response).await
    }

    /// `POST /user/check_notifications/`, authenticated. The service checks
    /// current conditions at the given position against the user's
    /// notification settings and returns the alerts that passed the filter.
    #[instrument(skip(self), level = "info")]
    pub async fn check_notifications(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<WeatherAlert>, NetworkError> {
        let response = self
            .request(reqwest::Method::POST, "/user/check_notifications/")
            .json(&serde_json::json!({ "latitude": latitude, "longitude": longitude }))
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        self.handle_response(response).await
    }

    /// `POST /user/update_notification_settings/`, authenticated.
    #[instrument(skip(self, settings), level = "info")]
    pub async fn update_notification_settings(
        &self,
        settings: &NotificationSettings,
    ) -> Result<(), NetworkError> {
        let response = self
            .request(reqwest::Method::POST, "/user/update_notification_settings/")
            .json(settings)
            .send()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        self.acknowledge(response).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.credential.is_set())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn credential_store_roundtrip() {
        let store = CredentialStore::new();
        assert!(store.current().is_none());
        assert!(!store.is_set());

        store.set("tok".to_string());
        assert_eq!(store.current().as_deref(), Some("tok"));

        store.clear();
        assert!(store.current().is_none());
    }

    #[test]
    fn clones_share_the_same_cell() {
        let store = CredentialStore::new();
        let reader = store.clone();

        store.set("shared".to_string());
        assert_eq!(reader.current().as_deref(), Some("shared"));

        store.clear();
        assert!(reader.current().is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new(
            "http://localhost:8000/api/",
            CredentialStore::new(),
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(client.base_url, "http://localhost:8000/api");
    }
}
