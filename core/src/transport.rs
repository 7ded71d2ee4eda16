//! The transport seam and its ureq implementation.
//!
//! # Design
//! `Transport` is the only capability the client needs from an HTTP stack:
//! POST a JSON body to an account-relative path and get back a status and
//! body, or a `TransportError`. Any HTTP status, 4xx and 5xx included, is a
//! successful return. Tests substitute an in-memory implementation; real
//! callers use `UreqTransport`.
//!
//! Implementations must be `Send + Sync` so one client can be shared across
//! threads. Retries, deadlines and connection reuse are the transport's own
//! business.

use std::time::Duration;

use base64::Engine;
use tracing::{debug, warn};
use ureq::Agent;

use crate::config::{ClientConfig, Credentials};
use crate::error::TransportError;
use crate::http::{HttpResponse, JSON_API_CONTENT_TYPE};

pub trait Transport: Send + Sync {
    /// Issue exactly one POST of `body` to `path`.
    fn post(&self, path: &str, body: &str) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post(&self, path: &str, body: &str) -> Result<HttpResponse, TransportError> {
        (**self).post(path, body)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn post(&self, path: &str, body: &str) -> Result<HttpResponse, TransportError> {
        (**self).post(path, body)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn post(&self, path: &str, body: &str) -> Result<HttpResponse, TransportError> {
        (**self).post(path, body)
    }
}

/// Upper bound on a response body read into memory.
pub const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

/// Blocking HTTP transport backed by a ureq `Agent`.
///
/// Status codes are never turned into errors; only failures to obtain a
/// response are.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
    base_url: String,
    authorization: Option<String>,
    user_agent: String,
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport")
            .field("base_url", &self.base_url)
            .field("authorized", &self.authorization.is_some())
            .finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(non_zero(config.timeout))
            .timeout_connect(non_zero(config.connect_timeout))
            .build()
            .new_agent();

        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            authorization: config.credentials.as_ref().map(authorization_header),
            user_agent: config.user_agent.clone(),
        }
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Transport for UreqTransport {
    fn post(&self, path: &str, body: &str) -> Result<HttpResponse, TransportError> {
        let url = self.url_for(path);
        debug!(%url, "sending POST");

        let mut request = self
            .agent
            .post(&url)
            .header("Content-Type", JSON_API_CONTENT_TYPE)
            .header("Accept", "*/*")
            .header("User-Agent", &self.user_agent);
        if let Some(auth) = &self.authorization {
            request = request.header("Authorization", auth);
        }

        let mut response = request.send(body.as_bytes())?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        // The status is already known; a body that cannot be read must not hide it.
        let body = match response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_vec()
        {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                warn!(status, error = %err, "response body unreadable, returning empty body");
                String::new()
            }
        };

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

// A zero duration disables the corresponding ureq timeout.
fn non_zero(duration: Duration) -> Option<Duration> {
    (!duration.is_zero()).then_some(duration)
}

fn authorization_header(credentials: &Credentials) -> String {
    match credentials {
        Credentials::ApiKey(key) => {
            let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{key}:"));
            format!("Basic {encoded}")
        }
        Credentials::AccessToken(token) => format!("Bearer {token}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_and_path_with_one_slash() {
        let config = ClientConfig::new("12345").base_url("http://localhost:3000/v2/");
        let transport = UreqTransport::new(&config);
        assert_eq!(transport.url_for("12345/orders"), "http://localhost:3000/v2/12345/orders");
        assert_eq!(transport.url_for("/12345/orders"), "http://localhost:3000/v2/12345/orders");
    }

    #[test]
    fn api_key_uses_basic_auth_with_empty_password() {
        let header = authorization_header(&Credentials::ApiKey("abc".to_string()));
        // base64("abc:")
        assert_eq!(header, "Basic YWJjOg==");
    }

    #[test]
    fn access_token_uses_bearer() {
        let header = authorization_header(&Credentials::AccessToken("tok".to_string()));
        assert_eq!(header, "Bearer tok");
    }

    #[test]
    fn zero_timeout_is_disabled() {
        assert_eq!(non_zero(Duration::ZERO), None);
        assert_eq!(non_zero(Duration::from_secs(3)), Some(Duration::from_secs(3)));
    }
}
