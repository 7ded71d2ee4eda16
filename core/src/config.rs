//! Client configuration.
//!
//! # Design
//! Configuration is an explicit struct built once and validated once by
//! `DripClient::from_config`. It carries the account id (fixed for the
//! client's lifetime) and everything the ureq transport needs: base URL,
//! credentials and timeouts. `from_env` reads the same settings from
//! `DRIP_*` variables.

use std::time::Duration;

use url::Url;

use crate::error::ClientError;

pub const DEFAULT_BASE_URL: &str = "https://api.getdrip.com/v2/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// How requests authenticate.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// HTTP basic auth with the key as username and an empty password.
    ApiKey(String),
    /// OAuth bearer token.
    AccessToken(String),
}

// Secrets stay out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::ApiKey(_) => f.write_str("ApiKey(..)"),
            Credentials::AccessToken(_) => f.write_str("AccessToken(..)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub account_id: String,
    pub base_url: String,
    pub credentials: Option<Credentials>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: None,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: format!("drip-rust/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::ApiKey(api_key.into()));
        self
    }

    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::AccessToken(token.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build a configuration from the process environment.
    ///
    /// `DRIP_ACCOUNT_ID` is required. `DRIP_ACCESS_TOKEN` takes precedence
    /// over `DRIP_API_KEY`. `DRIP_URL_PREFIX`, `DRIP_TIMEOUT_SECS` and
    /// `DRIP_OPEN_TIMEOUT_SECS` override the defaults.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let account_id = lookup("DRIP_ACCOUNT_ID")
            .ok_or_else(|| ClientError::InvalidConfig("DRIP_ACCOUNT_ID is not set".to_string()))?;
        let mut config = Self::new(account_id);

        if let Some(token) = lookup("DRIP_ACCESS_TOKEN") {
            config = config.access_token(token);
        } else if let Some(key) = lookup("DRIP_API_KEY") {
            config = config.api_key(key);
        }
        if let Some(prefix) = lookup("DRIP_URL_PREFIX") {
            config = config.base_url(prefix);
        }
        if let Some(secs) = lookup("DRIP_TIMEOUT_SECS") {
            config = config.timeout(parse_secs("DRIP_TIMEOUT_SECS", &secs)?);
        }
        if let Some(secs) = lookup("DRIP_OPEN_TIMEOUT_SECS") {
            config = config.connect_timeout(parse_secs("DRIP_OPEN_TIMEOUT_SECS", &secs)?);
        }
        Ok(config)
    }

    /// Reject an empty account id or a base URL that is not absolute http(s).
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.account_id.trim().is_empty() {
            return Err(ClientError::InvalidConfig("account_id must not be empty".to_string()));
        }
        let url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidConfig(format!("base_url {:?}: {e}", self.base_url)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidConfig(format!(
                "base_url scheme must be http or https, got {}",
                url.scheme()
            )));
        }
        Ok(())
    }
}

fn parse_secs(name: &str, raw: &str) -> Result<Duration, ClientError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ClientError::InvalidConfig(format!("{name} must be whole seconds, got {raw:?}")))
}
