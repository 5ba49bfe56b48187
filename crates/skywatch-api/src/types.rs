//! Wire schemas for the remote weather/news/user service.
//!
//! Every response payload is decoded into one of these types at the client
//! boundary; a 2xx body that does not match fails fast as
//! `NetworkError::InvalidResponse` instead of leaking dynamic shapes into
//! view logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// New-account fields for `POST /auth/register/`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Credentials for `POST /auth/login/`. `login` accepts username or email.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Successful login: opaque token plus the authenticated profile.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// The authenticated user's profile (the session identity).
///
/// The login response names the identifier `user_id` while the profile
/// endpoint names it `id`; both decode into the same field. Favorites and
/// notification settings only appear on the profile endpoint, so they
/// default to empty elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "user_id", alias = "id")]
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub favorite_locations: Vec<FavoriteLocation>,
    #[serde(default)]
    pub notification_settings: NotificationSettings,
}

/// Partial profile update for `POST /user/update_profile/`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Canonical location record assigned by the remote service.
///
/// The `id` is required before any forecast or alert call can be made; it is
/// only ever obtained from a `CurrentWeatherResponse`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: i64,
    pub name: String,
    #[serde(deserialize_with = "decimal::required")]
    pub latitude: f64,
    #[serde(deserialize_with = "decimal::required")]
    pub longitude: f64,
    pub country_code: String,
}

/// Current conditions for one location.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentConditions {
    pub location: LocationRecord,
    #[serde(deserialize_with = "decimal::required")]
    pub temperature: f64,
    #[serde(deserialize_with = "decimal::required")]
    pub humidity: f64,
    #[serde(deserialize_with = "decimal::required")]
    pub wind_speed: f64,
    #[serde(deserialize_with = "decimal::required")]
    pub pressure: f64,
    pub weather_condition: String,
    #[serde(default, deserialize_with = "decimal::optional")]
    pub rain_probability: Option<f64>,
}

/// Envelope for `POST /current/by_location/`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeatherResponse {
    pub weather: CurrentConditions,
}

/// Forecast granularity. The `all_types` endpoint returns a heterogeneous
/// list carrying all three; views filter locally per tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastType {
    Short,
    Daily,
    Weekly,
}

impl ForecastType {
    pub const ALL: [ForecastType; 3] =
        [ForecastType::Short, ForecastType::Daily, ForecastType::Weekly];

    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastType::Short => "short",
            ForecastType::Daily => "daily",
            ForecastType::Weekly => "weekly",
        }
    }
}

/// One forecast entry. `weather_condition` is optional on the wire; older
/// server builds omit it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub forecast_type: ForecastType,
    pub forecast_time: DateTime<Utc>,
    #[serde(deserialize_with = "decimal::required")]
    pub high_temperature: f64,
    #[serde(deserialize_with = "decimal::required")]
    pub low_temperature: f64,
    #[serde(deserialize_with = "decimal::required")]
    pub rain_probability: f64,
    #[serde(deserialize_with = "decimal::required")]
    pub uv_index: f64,
    #[serde(default)]
    pub weather_condition: Option<String>,
}

/// Active alert for a location.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherAlert {
    pub alert_type: String,
    pub severity: String,
    pub message: String,
    #[serde(default)]
    pub recommendation: Option<String>,
    pub issued_at: DateTime<Utc>,
}

/// News article; content is rendered elsewhere, the core only moves it.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsArticle {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub image: Option<String>,
}

/// A saved location on the user's profile. The authoritative list lives in
/// the profile payload; add/remove calls only acknowledge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteLocation {
    pub id: i64,
    pub name: String,
    #[serde(deserialize_with = "decimal::required")]
    pub latitude: f64,
    #[serde(deserialize_with = "decimal::required")]
    pub longitude: f64,
    pub country_code: String,
}

/// Per-user alert-type toggles, one per alert category the service emits.
/// Posted whole: an omitted flag is reset to false server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default)]
    pub rain: bool,
    #[serde(default)]
    pub storm: bool,
    #[serde(default)]
    pub extreme_temperature: bool,
    #[serde(default)]
    pub fog: bool,
}

/// Numeric fields the service emits as JSON strings (`"31.50"`); some
/// deployments coerce them to plain numbers instead. Accept both.
mod decimal {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    impl Raw {
        fn value<E: serde::de::Error>(self) -> Result<f64, E> {
            match self {
                Raw::Number(n) => Ok(n),
                Raw::Text(s) => s
                    .trim()
                    .parse()
                    .map_err(|_| E::custom(format!("invalid decimal string {:?}", s))),
            }
        }
    }

    pub fn required<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Raw::deserialize(deserializer)?.value()
    }

    pub fn optional<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            Some(raw) => raw.value().map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn login_response_decodes_token_and_user() {
        let body = r#"{
            "token": "abc123",
            "user": {
                "user_id": 7,
                "username": "linh",
                "email": "linh@example.com",
                "first_name": "Linh",
                "last_name": "Tran"
            }
        }"#;
        let resp: LoginResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.token, "abc123");
        assert_eq!(resp.user.id, 7);
        assert_eq!(resp.user.username, "linh");
        assert!(resp.user.favorite_locations.is_empty());
    }

    #[test]
    fn profile_endpoint_names_the_identifier_id() {
        let body = r#"{
            "id": 7,
            "username": "linh",
            "email": "linh@example.com",
            "first_name": "Linh",
            "last_name": "Tran",
            "favorite_locations": [{
                "id": 3,
                "name": "Đà Nẵng",
                "latitude": "16.05440000",
                "longitude": "108.20220000",
                "country_code": "VN"
            }],
            "notification_settings": {"rain": true, "storm": false}
        }"#;
        let profile: UserProfile = serde_json::from_str(body).unwrap();
        assert_eq!(profile.id, 7);
        assert_eq!(profile.favorite_locations.len(), 1);
        assert_eq!(profile.favorite_locations[0].latitude, 16.0544);
        assert!(profile.notification_settings.rain);
        assert!(!profile.notification_settings.fog);
    }

    #[test]
    fn current_weather_embeds_location_id() {
        let body = r#"{
            "weather": {
                "location": {
                    "id": 42,
                    "name": "Đà Nẵng",
                    "latitude": 16.0544,
                    "longitude": 108.2022,
                    "country_code": "VN"
                },
                "temperature": 31.5,
                "humidity": 78.0,
                "wind_speed": 4.2,
                "pressure": 1009.0,
                "weather_condition": "Partly Cloudy"
            }
        }"#;
        let resp: CurrentWeatherResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.weather.location.id, 42);
        assert!(resp.weather.rain_probability.is_none());
    }

    #[test]
    fn decimal_fields_arrive_as_strings() {
        // The service serializes decimal columns as quoted strings.
        let body = r#"{
            "weather": {
                "location": {
                    "id": 42,
                    "name": "Đà Nẵng",
                    "latitude": "16.05440000",
                    "longitude": "108.20220000",
                    "country_code": "VN"
                },
                "temperature": "31.50",
                "humidity": "78.00",
                "wind_speed": "4.20",
                "pressure": "1009.00",
                "weather_condition": "Partly Cloudy",
                "rain_probability": "10.00"
            }
        }"#;
        let resp: CurrentWeatherResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.weather.temperature, 31.5);
        assert_eq!(resp.weather.pressure, 1009.0);
        assert_eq!(resp.weather.rain_probability, Some(10.0));
        assert_eq!(resp.weather.location.latitude, 16.0544);
    }

    #[test]
    fn forecast_decimals_accept_both_encodings() {
        let entry = r#"{
            "forecast_type": "daily",
            "forecast_time": "2026-08-29T00:00:00Z",
            "high_temperature": "33.00",
            "low_temperature": 25.0,
            "rain_probability": "60.00",
            "uv_index": 8.0
        }"#;
        let parsed: ForecastEntry = serde_json::from_str(entry).unwrap();
        assert_eq!(parsed.high_temperature, 33.0);
        assert_eq!(parsed.low_temperature, 25.0);
        assert_eq!(parsed.rain_probability, 60.0);
    }

    #[test]
    fn a_garbage_decimal_string_is_a_decode_error() {
        let entry = r#"{
            "forecast_type": "daily",
            "forecast_time": "2026-08-29T00:00:00Z",
            "high_temperature": "warm",
            "low_temperature": 25.0,
            "rain_probability": 60.0,
            "uv_index": 8.0
        }"#;
        assert!(serde_json::from_str::<ForecastEntry>(entry).is_err());
    }

    #[test]
    fn forecast_type_is_lowercase_on_the_wire() {
        let entry = r#"{
            "forecast_type": "weekly",
            "forecast_time": "2026-08-29T00:00:00Z",
            "high_temperature": 33.0,
            "low_temperature": 25.0,
            "rain_probability": 60.0,
            "uv_index": 8.0
        }"#;
        let parsed: ForecastEntry = serde_json::from_str(entry).unwrap();
        assert_eq!(parsed.forecast_type, ForecastType::Weekly);
        assert!(parsed.weather_condition.is_none());

        let json = serde_json::to_string(&parsed).unwrap();
        assert!(json.contains("\"forecast_type\":\"weekly\""));
    }

    #[test]
    fn notification_settings_carry_all_four_flags() {
        let settings = NotificationSettings {
            rain: true,
            storm: true,
            extreme_temperature: false,
            fog: false,
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"rain\":true"));
        assert!(json.contains("\"storm\":true"));
        assert!(json.contains("\"extreme_temperature\":false"));
        assert!(json.contains("\"fog\":false"));
    }

    #[test]
    fn profile_update_is_partial() {
        let update = ProfileUpdate {
            email: Some("new@example.com".to_string()),
            ..ProfileUpdate::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"email":"new@example.com"}"#);
    }
}
