//! Request client for the Skywatch remote service.
//!
//! One gateway for every outbound call: base endpoint, headers, and
//! credential injection live here, alongside the typed wire schemas.

pub mod client;
pub mod types;

pub use client::{ApiClient, CredentialStore};
pub use types::*;
