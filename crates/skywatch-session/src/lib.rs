//! Session state for Skywatch.
//!
//! Owns the identity/credential pair and its lifecycle (login, register,
//! logout, restore), with durable persistence across restarts.

pub mod manager;
pub mod storage;

pub use manager::{SessionManager, SessionState};
pub use storage::SessionStorage;
