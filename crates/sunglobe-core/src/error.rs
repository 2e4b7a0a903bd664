//! Error types for sunglobe

use thiserror::Error;

/// Core sunglobe errors
///
/// None of these are fatal: the synchronizer absorbs every one of them and
/// the projector keeps ticking off the last reading or the local clock.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GlobeError {
    // Transport errors
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),

    #[error("HTTP client setup failed: {0}")]
    ClientBuild(String),

    // Payload errors
    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Response has no datetime field")]
    MissingDatetime,

    #[error("Malformed datetime: {0:?}")]
    MalformedDatetime(String),
}

impl GlobeError {
    /// Short machine-friendly label, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            GlobeError::Transport(_) => "transport",
            GlobeError::HttpStatus(_) => "http_status",
            GlobeError::ClientBuild(_) => "client_build",
            GlobeError::Decode(_) => "decode",
            GlobeError::MissingDatetime => "missing_datetime",
            GlobeError::MalformedDatetime(_) => "malformed_datetime",
        }
    }
}

/// Result type for sunglobe operations
pub type GlobeResult<T> = Result<T, GlobeError>;
