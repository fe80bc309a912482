//! Error types for the geocoding client

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Geocoding client errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Geocoding request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Geocoding provider error ({status})")]
    BadStatus { status: u16 },

    #[error("Geocoding request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Invalid geocoding configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// True when the provider did not answer within the configured timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}
