//! Centralized error types for the Skywatch application.
//!
//! This module provides a typed error hierarchy that:
//! - Enables precise error handling throughout the codebase
//! - Provides user-friendly messages suitable for UI display
//! - Preserves full error context for debugging/logging
//!
//! Propagation policy: the core never retries automatically and never logs
//! the user out on an authorization failure. Callers are responsible for
//! user-facing messaging; the core guarantees state is left consistent.

use thiserror::Error;

/// Top-level application error type.
///
/// All errors in the Skywatch application should be convertible to this type.
/// Use `user_message()` to get a UI-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Location error: {0}")]
    Location(#[from] LocationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Auth(e) => e.user_message(),
            AppError::Location(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Network-related errors (HTTP transport, non-2xx responses, bad payloads).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// Authentication errors (login, registration, credential storage).
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Registration rejected. The server's reason (duplicate username,
    /// validation failure, ...) is carried in the payload for the caller to
    /// render; the core does not distinguish sub-causes.
    #[error("Registration rejected: {message}")]
    RegistrationRejected { message: String },

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Credential storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
}

impl AuthError {
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "Invalid credentials. Please check and try again.",
            AuthError::RegistrationRejected { .. } => {
                "Registration failed. Please check your details and try again."
            }
            AuthError::NotAuthenticated => "Not signed in. Please authenticate.",
            AuthError::Storage(_) => "Failed to save credentials. Please try again.",
            AuthError::Network(e) => e.user_message(),
        }
    }
}

/// Location errors (name resolution, device position, geocoding).
#[derive(Debug, Error)]
pub enum LocationError {
    /// The remote service could not resolve a display name to a location
    /// identifier. Aborts the whole fetch chain for that location.
    #[error("Could not resolve location {name:?}: {message}")]
    ResolutionFailed { name: String, message: String },

    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location service unavailable")]
    ServiceUnavailable,

    #[error("Location request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
}

impl LocationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::ResolutionFailed { .. } => "Location not found. Check and try again.",
            LocationError::PermissionDenied => "Location access was denied.",
            LocationError::ServiceUnavailable => {
                "Location service unavailable. Please try again later."
            }
            LocationError::Timeout => "Locating you took too long. Please try again.",
            LocationError::Network(e) => e.user_message(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_conversion() {
        let auth_err = AuthError::InvalidCredentials;
        let app_err: AppError = auth_err.into();
        assert!(matches!(app_err, AppError::Auth(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_user_message_propagation() {
        let app_err = AppError::Network(NetworkError::Timeout);
        assert_eq!(
            app_err.user_message(),
            "The request timed out. Please try again."
        );
    }

    #[test]
    fn test_server_error_messages_split_on_status() {
        let client_side = NetworkError::ServerError {
            status: 404,
            message: "not found".into(),
        };
        let server_side = NetworkError::ServerError {
            status: 503,
            message: "unavailable".into(),
        };
        assert_ne!(client_side.user_message(), server_side.user_message());
    }

    #[test]
    fn test_registration_rejection_carries_payload() {
        let err = AuthError::RegistrationRejected {
            message: "username already taken".into(),
        };
        assert!(err.to_string().contains("username already taken"));
    }

    #[test]
    fn test_resolution_failure_names_the_location() {
        let err = LocationError::ResolutionFailed {
            name: "Atlantis".into(),
            message: "404".into(),
        };
        assert!(err.to_string().contains("Atlantis"));
    }
}
