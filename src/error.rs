//! Error types for S2S client operations.
//!
//! Two layers converge here: [`ApiError`] carries a failure reported by the
//! BasaltPass API itself (structured error envelope or raw HTTP error), while
//! [`ClientError`] is the crate-wide error returned by every client method,
//! wrapping `ApiError` alongside local failure modes such as network errors
//! and payload decode errors.

use std::fmt;

use thiserror::Error;

/// A failure reported by the BasaltPass API.
///
/// Constructed on two paths:
///
/// - **Structured application error**: the response envelope contained a
///   non-empty `error` object. `code` and `message` come from that object;
///   `status` and `request_id` from the surrounding response.
/// - **Raw HTTP error**: the response status was >= 400 without a usable
///   `error` object. `code` is `None` and `message` falls back to the HTTP
///   reason phrase.
///
/// Callers should treat an unset `code` as `"http_error"`; the [`Display`]
/// rendering already does.
///
/// [`Display`]: std::fmt::Display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Machine-readable application error code, if the server supplied one.
    pub code: Option<String>,
    /// Human-readable error message.
    pub message: String,
    /// Originating HTTP status code, if known.
    pub status: Option<u16>,
    /// Server-supplied correlation id for support/debugging.
    pub request_id: Option<String>,
}

impl fmt::Display for ApiError {
    // Rendering is a stable contract for logging: code (or the http_error
    // placeholder), status when known, message, request id when known.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiError")?;
        if let Some(status) = self.status {
            write!(f, " {status}")?;
        }
        write!(f, " {}: {}", self.code.as_deref().unwrap_or("http_error"), self.message)?;
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id={request_id})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Errors returned by [`S2sClient`](crate::client::S2sClient) operations.
///
/// [`Api`](ClientError::Api) means the server answered and reported a
/// failure; every other variant is a local or transport-level problem. A
/// decode failure on a success response surfaces as
/// [`Decode`](ClientError::Decode), never as a fabricated `ApiError`.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The API returned an error envelope or an HTTP error status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The HTTP request failed at the connection level (refused, reset,
    /// timeout, DNS, TLS).
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The retry middleware failed, typically after exhausting all retry
    /// attempts on a connection-level error.
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// The base URL or a joined request URL is malformed.
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// A success response carried a body that could not be parsed as JSON,
    /// or a payload that did not match the expected entity shape.
    #[error("Failed to decode response payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// An extra header name from the configuration is not a valid HTTP
    /// header name.
    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),

    /// A credential or extra header value contains bytes not allowed in an
    /// HTTP header value.
    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),

    /// The configuration file or environment overrides could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A configuration value is out of its supported range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
