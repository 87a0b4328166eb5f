//! Client configuration.

use crate::auth::AuthConfig;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use url::Url;

/// Configuration for a [`crate::Client`].
///
/// Deserializable from application configuration; the non-serde fields are
/// populated through the builder methods. The crate sets no request timeout
/// of its own: callers that want one supply a pre-configured
/// `reqwest::Client` via [`Config::with_http_client`].
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Root address of the target API, with or without trailing slash,
    /// e.g. `https://example.com/wp-json`.
    pub base_url: Url,
    #[serde(default)]
    pub auth: AuthConfig,
    /// Headers attached to every request; overridden by per-request headers
    /// and by authentication headers.
    #[serde(skip)]
    pub default_headers: HeaderMap,
    #[serde(skip)]
    pub http_client: Option<reqwest::Client>,
}

impl Config {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            auth: AuthConfig::None,
            default_headers: HeaderMap::new(),
            http_client: None,
        }
    }

    pub fn auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }

    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }
}
