//! External Services
//!
//! This module contains services that interact with external systems:
//! - api: background worker for sort jobs, previews and downloads

pub mod api;

// Re-export commonly used types for convenience
pub use api::{spawn_api_service, ApiHandle, ApiRequest, ApiResponse};
