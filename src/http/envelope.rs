//! Response envelope interpretation.
//!
//! Every S2S response is a JSON envelope: `{"data": <payload>}` on success,
//! `{"error": {"code", "message"}, "request_id"}` on failure. The error
//! envelope may arrive with any HTTP status, including 200, and an HTTP
//! error status may arrive with no envelope at all. [`decode`] normalizes
//! all of these into either the raw `data` payload or a typed error.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use serde_json::Value;

use crate::error::{ApiError, ClientError};

/// Decodes a response into its `data` payload, per this precedence:
///
/// 1. Status >= 400: the body is parsed as JSON only when the response
///    declares a JSON content type. A parsed envelope with a non-empty
///    `error` object yields a structured [`ApiError`]; anything else yields
///    a raw [`ApiError`] carrying the status and reason phrase, regardless
///    of parse outcome.
/// 2. Status < 400: the body is parsed unconditionally and a parse failure
///    is [`ClientError::Decode`] (a local fault, not an API error). A
///    non-empty `error` object overrides the success status; otherwise the
///    `data` field is returned (`null` when absent).
pub(crate) async fn decode(response: Response) -> Result<Value, ClientError> {
    let status = response.status();

    if status.as_u16() >= 400 {
        let declares_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"));
        let body = response.text().await.unwrap_or_default();

        if declares_json
            && let Ok(envelope) = serde_json::from_str::<Value>(&body)
            && let Some(api_error) = error_from_envelope(&envelope, status)
        {
            return Err(ClientError::Api(api_error));
        }
        return Err(ClientError::Api(ApiError {
            code: None,
            message: reason_phrase(status),
            status: Some(status.as_u16()),
            request_id: None,
        }));
    }

    let body = response.text().await?;
    let envelope: Value = serde_json::from_str(&body)?;
    if let Some(api_error) = error_from_envelope(&envelope, status) {
        return Err(ClientError::Api(api_error));
    }
    Ok(envelope.get("data").cloned().unwrap_or(Value::Null))
}

/// Extracts a structured [`ApiError`] when the envelope carries a non-empty
/// `error` object. An absent, null, or empty `error` is not an error
/// envelope.
fn error_from_envelope(envelope: &Value, status: StatusCode) -> Option<ApiError> {
    let error = envelope.get("error")?.as_object()?;
    if error.is_empty() {
        return None;
    }
    Some(ApiError {
        code: error.get("code").and_then(Value::as_str).map(str::to_owned),
        message: error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("error")
            .to_owned(),
        status: Some(status.as_u16()),
        request_id: envelope.get("request_id").and_then(Value::as_str).map(str::to_owned),
    })
}

fn reason_phrase(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("HTTP error").to_owned()
}
