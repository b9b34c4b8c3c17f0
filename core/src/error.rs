//! Error type for the HTTP facade.
//!
//! # Design
//! Transport failures keep the underlying `ureq` or `url` error as their
//! source so callers can inspect the original cause. The facade never
//! classifies status codes: a 404 or 500 is a successful round-trip here.
//! `Decode` is only produced by `try_decode_url`; the lenient `decode_url`
//! maps it to `None`.

use thiserror::Error;

/// Errors returned by `HttpFacade` operations and `try_decode_url`.
#[derive(Debug, Error)]
pub enum FacadeError {
    /// The URL could not be parsed.
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Connecting, sending, or receiving failed (timeouts, DNS, I/O).
    #[error("transport failed: {0}")]
    Transport(#[from] ureq::Error),

    /// No connection slot for the route freed up within the acquisition
    /// timeout.
    #[error("timed out after {waited_ms}ms waiting for a connection to {route}")]
    PoolTimeout { route: String, waited_ms: u64 },

    /// The response body could not be read as UTF-8 text.
    #[error("reading response body failed: {0}")]
    Body(String),

    /// A percent-encoded string contained an invalid escape or invalid UTF-8.
    #[error("cannot decode {input:?}: {reason}")]
    Decode { input: String, reason: String },

    /// `PoolConfig::validate` rejected the configuration.
    #[error("invalid pool configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T, E = FacadeError> = std::result::Result<T, E>;
