//! Roster Server Library
//!
//! HTTP surface and query service over the Roster user records.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::UserQueryService;
pub use state::AppState;
