//! Error types
//!
//! `SubmitError` covers what stops a job before any request is made;
//! `SortError` covers what can go wrong once the request is out.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a submission was refused client-side
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// No service endpoint configured
    #[error("API URL missing: set api_url in the config file or FACESORT_API_URL")]
    Configuration,

    /// Missing target or empty batch (the submit affordance is disabled)
    #[error("{0}")]
    Validation(ValidationError),

    /// A job is already running
    #[error("A sort job is already running")]
    InFlight,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Select a target face first")]
    MissingTarget,

    #[error("Select at least one image to scan")]
    EmptyBatch,
}

/// Failure of a request to the sort service
#[derive(Debug, Error)]
pub enum SortError {
    /// Network failure or timeout; no response was received
    #[error("{message}")]
    Transport { message: String },

    /// The service answered with a non-success status
    #[error("{message}")]
    Service { status: u16, message: String },

    /// Success status but the body was not a sort result
    #[error("Invalid response from service: {0}")]
    InvalidResponse(String),

    #[error("Failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SortError {
    /// HTTP status, if the service answered
    pub fn status(&self) -> Option<u16> {
        match self {
            SortError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }
}
