use std::collections::HashSet;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::{RetryTransientMiddleware, Retryable, RetryableStrategy, default_on_request_failure};
use url::Url;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Upper bound on a single backoff interval, regardless of the seed.
const MAX_RETRY_INTERVAL: Duration = Duration::from_secs(30);

/// Retries only the status codes from the client configuration; connection
/// level failures fall back to the stock transient classification.
///
/// The crate-default strategy treats every 5xx as transient, which would
/// ignore the configured status set.
struct RetryableStatusCodes {
    statuses: HashSet<u16>,
}

impl RetryableStrategy for RetryableStatusCodes {
    fn handle(&self, res: &Result<reqwest::Response, reqwest_middleware::Error>) -> Option<Retryable> {
        match res {
            Ok(response) if self.statuses.contains(&response.status().as_u16()) => Some(Retryable::Transient),
            Ok(_) => None,
            Err(error) => default_on_request_failure(error),
        }
    }
}

/// Low-level transport for the S2S API.
///
/// Owns one `reqwest` connection pool per client instance, shared by the
/// retrying and non-retrying paths and safe for concurrent use. The pool is
/// released when the transport is dropped.
///
/// Credential headers (`client_id`, `client_secret`) and
/// `Accept: application/json` are installed as client default headers, so
/// every outgoing request carries them; configured extra headers are merged
/// on top and may override the mandatory values but never remove them.
pub(crate) struct HttpClient {
    base_url: String,
    retrying: ClientWithMiddleware,
    bare: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = config.base_url.trim_end_matches('/').to_owned();
        Url::parse(&base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("client_id"), HeaderValue::from_str(&config.client_id)?);
        headers.insert(
            HeaderName::from_static("client_secret"),
            HeaderValue::from_str(&config.client_secret)?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in &config.extra_headers {
            headers.insert(HeaderName::from_bytes(name.as_bytes())?, HeaderValue::from_str(value)?);
        }

        let bare = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;

        // Checked before Duration construction: from_secs_f64 panics on
        // negative or non-finite input, and the policy builder rejects a
        // seed above the interval cap.
        if !config.backoff_factor.is_finite() || config.backoff_factor < 0.0 {
            return Err(ClientError::InvalidConfig(format!(
                "backoff_factor must be a finite non-negative number of seconds, got {}",
                config.backoff_factor
            )));
        }
        let backoff_seed = Duration::from_secs_f64(config.backoff_factor);
        if backoff_seed > MAX_RETRY_INTERVAL {
            return Err(ClientError::InvalidConfig(format!(
                "backoff_factor must not exceed {} seconds, got {}",
                MAX_RETRY_INTERVAL.as_secs(),
                config.backoff_factor
            )));
        }

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(backoff_seed, MAX_RETRY_INTERVAL)
            .build_with_max_retries(config.max_retries);
        let strategy = RetryableStatusCodes {
            statuses: config.retry_statuses.iter().copied().collect(),
        };
        let retrying = reqwest_middleware::ClientBuilder::new(bare.clone())
            .with(RetryTransientMiddleware::new_with_policy_and_strategy(retry_policy, strategy))
            .build();

        Ok(Self { base_url, retrying, bare })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Executes a request and returns the raw response.
    ///
    /// GET requests go through the retry middleware; any other method uses
    /// the bare client and is never retried. On retry exhaustion the last
    /// observed failure (response or connection error) is surfaced
    /// unmodified.
    ///
    /// Query pairs are appended as given; callers omit unset optional
    /// parameters entirely rather than sending empty values.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, ClientError> {
        let url = Url::parse(&format!("{}{}", self.base_url, path))?;

        let response = if method == Method::GET {
            self.retrying.request(method, url).query(query).send().await?
        } else {
            self.bare.request(method, url).query(query).send().await?
        };
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_stripped_from_base_url() {
        let config = ClientConfig::new("https://id.example.com///", "svc", "secret");
        let client = HttpClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "https://id.example.com");
    }

    #[test]
    fn invalid_base_url_is_rejected_at_construction() {
        let config = ClientConfig::new("not a url", "svc", "secret");
        let result = HttpClient::new(&config);
        assert!(matches!(result, Err(ClientError::Url(_))));
    }

    #[test]
    fn invalid_extra_header_name_is_rejected() {
        let config =
            ClientConfig::new("https://id.example.com", "svc", "secret").with_extra_header("bad header", "v");
        let result = HttpClient::new(&config);
        assert!(matches!(result, Err(ClientError::InvalidHeaderName(_))));
    }

    #[test]
    fn negative_backoff_factor_is_rejected() {
        let config = ClientConfig::new("https://id.example.com", "svc", "secret").with_backoff_factor(-1.0);
        let result = HttpClient::new(&config);
        assert!(matches!(result, Err(ClientError::InvalidConfig(_))));
    }

    #[test]
    fn non_finite_backoff_factor_is_rejected() {
        let config =
            ClientConfig::new("https://id.example.com", "svc", "secret").with_backoff_factor(f64::NAN);
        let result = HttpClient::new(&config);
        assert!(matches!(result, Err(ClientError::InvalidConfig(_))));
    }

    #[test]
    fn backoff_factor_above_interval_cap_is_rejected() {
        let config = ClientConfig::new("https://id.example.com", "svc", "secret").with_backoff_factor(60.0);
        let result = HttpClient::new(&config);
        assert!(matches!(result, Err(ClientError::InvalidConfig(_))));
    }

    #[test]
    fn retryable_strategy_honors_configured_status_set() {
        let strategy = RetryableStatusCodes {
            statuses: [503u16].into_iter().collect(),
        };
        // Connection-failure classification is covered by the client-level
        // wiremock tests.
        assert!(matches!(strategy.handle(&Ok(http_response(503))), Some(Retryable::Transient)));
        assert!(strategy.handle(&Ok(http_response(500))).is_none());
        assert!(strategy.handle(&Ok(http_response(200))).is_none());
    }

    fn http_response(status: u16) -> reqwest::Response {
        http::Response::builder().status(status).body("").unwrap().into()
    }
}
