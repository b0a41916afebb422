//! Error types for the tracking client.
//!
//! # Design
//! The server's status code is never inspected, so there is no HTTP-status
//! variant: a request either reached the server (success) or it did not
//! (`Transport`). The remaining variants reject input before any I/O.

/// Errors returned by `TrackingClient` and `Tracker`.
#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    /// The base endpoint normalizes to an empty host.
    #[error("invalid tracking endpoint {0:?}: no host left after normalization")]
    InvalidEndpoint(String),

    /// A required argument was empty.
    #[error("invalid argument `{name}`: must not be empty")]
    InvalidArgument { name: &'static str },

    /// The request did not complete: connect, DNS, timeout or body read.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The configuration could not be parsed.
    #[error("invalid tracker configuration: {0}")]
    Config(#[from] toml::de::Error),
}
