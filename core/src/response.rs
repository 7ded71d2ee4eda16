//! Uniform result of every client operation.
//!
//! # Design
//! Both a delivered HTTP response and a transport failure become a
//! `Response`, so callers inspect `status` instead of matching on errors.
//! A transport failure is reported with the sentinel status
//! `TRANSPORT_FAILURE_STATUS` (0, never a real HTTP status) and the
//! failure's display text as the body. The body is kept opaque; `json()`
//! decodes it on demand. Bytes that are not valid UTF-8 arrive here already
//! replaced with U+FFFD; the status is never affected by the body.

use tracing::warn;

use crate::error::TransportError;
use crate::http::HttpResponse;

/// Status reported when no HTTP response was received.
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

/// Status code paired with the raw response body.
///
/// Two responses are equal iff both status and body are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn from_http(response: HttpResponse) -> Self {
        Self::new(response.status, response.body)
    }

    pub fn from_transport_failure(err: &TransportError) -> Self {
        Self::new(TRANSPORT_FAILURE_STATUS, err.to_string())
    }

    /// True for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_transport_failure(&self) -> bool {
        self.status == TRANSPORT_FAILURE_STATUS
    }

    /// Decode the body as JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Fold a transport outcome into a `Response`. HTTP error statuses pass
/// through unchanged.
pub fn normalize(outcome: Result<HttpResponse, TransportError>) -> Response {
    match outcome {
        Ok(response) => Response::from_http(response),
        Err(err) => {
            warn!(error = %err, "transport failure normalized to sentinel response");
            Response::from_transport_failure(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn equal_pairs_are_equal() {
        assert_eq!(Response::new(202, "{}"), Response::new(202, "{}"));
    }

    #[test]
    fn differing_status_or_body_are_not_equal() {
        assert_ne!(Response::new(202, "{}"), Response::new(200, "{}"));
        assert_ne!(Response::new(202, "{}"), Response::new(202, ""));
    }

    #[test]
    fn success_passes_through() {
        let response = normalize(Ok(http(202, "{}")));
        assert_eq!(response, Response::new(202, "{}"));
        assert!(response.is_success());
    }

    #[test]
    fn http_error_status_is_data() {
        let response = normalize(Ok(http(422, r#"{"errors":[{"code":"invalid"}]}"#)));
        assert_eq!(response.status, 422);
        assert!(!response.is_success());
        assert!(!response.is_transport_failure());
        assert_eq!(response.json().unwrap()["errors"][0]["code"], "invalid");
    }

    #[test]
    fn transport_failure_uses_sentinel_status() {
        let err = TransportError::Connection("refused".to_string());
        let response = normalize(Err(err));
        assert_eq!(response.status, TRANSPORT_FAILURE_STATUS);
        assert_eq!(response.body, "connection failed: refused");
        assert!(response.is_transport_failure());
        assert!(!response.is_success());
    }

    #[test]
    fn non_json_body_fails_only_when_decoded() {
        let response = normalize(Ok(http(500, "Internal Server Error")));
        assert_eq!(response.body, "Internal Server Error");
        assert!(response.json().is_err());
    }
}
