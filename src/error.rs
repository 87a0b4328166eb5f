//! Error types: the crate-level [`Error`] enum and the normalized
//! [`ApiError`] built from non-2xx responses.

use reqwest::{header, Response, StatusCode};

/// A normalized API failure, built exactly once per non-2xx response that
/// was not resolved by an authentication refresh.
///
/// Classification is always derived from [`ApiError::status`] on demand;
/// nothing is stored redundantly.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{message} (status {status})")]
pub struct ApiError {
    /// Human-readable message: the provider's `message` field when present,
    /// else the canonical status reason, else `"Unknown error"`.
    pub message: String,
    pub status: StatusCode,
    /// Provider-specific error code (e.g. `rest_post_invalid_id`).
    pub code: Option<String>,
    /// Structured `data` payload attached by the provider, if any.
    pub data: Option<serde_json::Value>,
    /// The raw response body, kept for callers that need more than the
    /// parsed fields.
    pub body: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
struct ErrorPayload {
    message: Option<String>,
    code: Option<String>,
    data: Option<serde_json::Value>,
}

impl ApiError {
    /// Normalizes a failed response. Never fails itself: a body that is not
    /// JSON, or that fails to parse, degrades to an empty payload.
    pub async fn from_response(response: Response) -> Self {
        let status = response.status();
        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.contains("json"))
            .unwrap_or(false);
        let body = response.text().await.ok();

        let payload = match (&body, is_json) {
            (Some(text), true) => serde_json::from_str::<ErrorPayload>(text).unwrap_or_default(),
            _ => ErrorPayload::default(),
        };

        let message = payload
            .message
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| "Unknown error".to_string());

        Self {
            message,
            status,
            code: payload.code,
            data: payload.data,
            body,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(
            self.status,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        )
    }

    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }

    pub fn is_rate_limit_error(&self) -> bool {
        self.status == StatusCode::TOO_MANY_REQUESTS
    }

    /// A short message suitable for showing to an end user. Statuses without
    /// curated text fall back to [`ApiError::message`].
    pub fn user_message(&self) -> &str {
        match self.status.as_u16() {
            400 => "The request was invalid. Please check your input and try again.",
            401 => "Authentication required. Please log in and try again.",
            403 => "You do not have permission to perform this action.",
            404 => "The requested resource was not found.",
            429 => "Too many requests. Please wait a moment and try again.",
            500 => "The server encountered an error. Please try again later.",
            502 => "The server is temporarily unavailable. Please try again later.",
            503 => "The service is temporarily unavailable. Please try again later.",
            _ => &self.message,
        }
    }
}

/// All failures surfaced by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A non-2xx response, normalized.
    #[error("API request failed: {0}")]
    Api(#[from] ApiError),

    /// Invalid client or authentication configuration; raised once at
    /// construction time, never per request.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The request's cancellation token fired before the response arrived.
    #[error("request cancelled")]
    Cancelled,

    /// A transport-level failure (DNS, connect, TLS). Passed through
    /// unmodified; there is no response to normalize.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A request body could not be serialized or a response body could not
    /// be deserialized into the expected shape.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// An authentication refresh ran but the retried request still failed
    /// with an auth error. Retried at most once, never recursively.
    #[error("authentication refresh did not resolve the failure (status {status})")]
    RefreshFailed { status: StatusCode },
}

impl Error {
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn error_with_status(status: u16) -> ApiError {
        ApiError {
            message: "something broke".to_string(),
            status: StatusCode::from_u16(status).unwrap(),
            code: None,
            data: None,
            body: None,
        }
    }

    #[test]
    fn classification_follows_status() {
        let cases = [
            // (status, client, server, auth, not_found, rate_limited)
            (400, true, false, false, false, false),
            (401, true, false, true, false, false),
            (403, true, false, true, false, false),
            (404, true, false, false, true, false),
            (429, true, false, false, false, true),
            (500, false, true, false, false, false),
            (502, false, true, false, false, false),
            (503, false, true, false, false, false),
        ];
        for (status, client, server, auth, not_found, rate_limited) in cases {
            let err = error_with_status(status);
            assert_eq!(err.is_client_error(), client, "client {status}");
            assert_eq!(err.is_server_error(), server, "server {status}");
            assert_eq!(err.is_auth_error(), auth, "auth {status}");
            assert_eq!(err.is_not_found(), not_found, "not_found {status}");
            assert_eq!(err.is_rate_limit_error(), rate_limited, "rate {status}");
        }
    }

    #[test]
    fn user_message_curated_table() {
        let expected = [
            (400, "The request was invalid. Please check your input and try again."),
            (401, "Authentication required. Please log in and try again."),
            (403, "You do not have permission to perform this action."),
            (404, "The requested resource was not found."),
            (429, "Too many requests. Please wait a moment and try again."),
            (500, "The server encountered an error. Please try again later."),
            (502, "The server is temporarily unavailable. Please try again later."),
            (503, "The service is temporarily unavailable. Please try again later."),
        ];
        for (status, message) in expected {
            assert_eq!(error_with_status(status).user_message(), message);
        }
    }

    #[test]
    fn user_message_falls_back_to_raw_message() {
        assert_eq!(error_with_status(418).user_message(), "something broke");
    }
}
