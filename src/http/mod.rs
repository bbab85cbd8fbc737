//! HTTP plumbing for the S2S client.
//!
//! This module is the request/response pipeline underneath
//! [`S2sClient`](crate::client::S2sClient):
//!
//! - [`http_client`] executes requests with injected credential headers, a
//!   per-attempt timeout, and a bounded exponential-backoff retry policy for
//!   idempotent GET requests (configured status codes plus connection-level
//!   failures).
//! - [`envelope`] interprets the JSON response envelope, separating success
//!   payloads from structured application errors and raw HTTP errors.
//!
//! Neither piece is public API; the resource client composes them.

mod envelope;
mod http_client;

pub(crate) use envelope::decode;
pub(crate) use http_client::HttpClient;
