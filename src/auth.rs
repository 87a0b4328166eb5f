//! Authentication strategies.
//!
//! [`AuthConfig`] is the closed set of supported methods; building it once
//! yields an [`Authentication`] value whose headers are re-read from the
//! shared credential cell just before every request, so a token refresh is
//! picked up by calls issued afterwards.

use crate::error::Error;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use parking_lot::RwLock;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION},
    Method, StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

pub const API_KEY_HEADER: &str = "X-API-Key";
pub const NONCE_HEADER: &str = "X-WP-Nonce";

/// Authentication method plus its credentials. Deserializable from
/// configuration with a `method` tag, e.g.
/// `{ "method": "basic", "username": "...", "password": "..." }`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum AuthConfig {
    #[default]
    None,
    Basic {
        username: String,
        password: String,
    },
    Bearer {
        token: String,
        #[serde(default)]
        refresh_token: Option<String>,
    },
    ApiKey {
        api_key: String,
    },
    Hmac {
        api_key: String,
        secret: String,
    },
    Nonce {
        nonce: String,
    },
    Oauth2 {
        client_id: String,
        client_secret: String,
        #[serde(default)]
        access_token: Option<String>,
        #[serde(default)]
        refresh_token: Option<String>,
    },
}

impl AuthConfig {
    /// Validates the credentials and builds the [`Authentication`] value.
    ///
    /// Validation happens here exactly once; every missing required field is
    /// named in the resulting [`Error::InvalidConfiguration`].
    pub fn build(self) -> Result<Authentication, Error> {
        let mut missing = Vec::new();
        let mut require = |name: &'static str, value: &str| {
            if value.is_empty() {
                missing.push(name);
            }
        };
        match &self {
            AuthConfig::None => {}
            AuthConfig::Basic { username, password } => {
                require("username", username);
                require("password", password);
            }
            AuthConfig::Bearer { token, .. } => require("token", token),
            AuthConfig::ApiKey { api_key } => require("api_key", api_key),
            AuthConfig::Hmac { api_key, secret } => {
                require("api_key", api_key);
                require("secret", secret);
            }
            AuthConfig::Nonce { nonce } => require("nonce", nonce),
            AuthConfig::Oauth2 {
                client_id,
                client_secret,
                ..
            } => {
                require("client_id", client_id);
                require("client_secret", client_secret);
            }
        }
        if !missing.is_empty() {
            return Err(Error::InvalidConfiguration(format!(
                "missing required credential field(s): {}",
                missing.join(", ")
            )));
        }
        Ok(Authentication {
            credentials: Arc::new(RwLock::new(self)),
            refresher: None,
            signer: None,
            observer: None,
        })
    }
}

/// New token material returned by a [`TokenRefresher`].
#[derive(Clone, Debug)]
pub struct TokenUpdate {
    pub access_token: String,
    /// Replacement refresh token, if the provider rotates them. `None`
    /// keeps the current one.
    pub refresh_token: Option<String>,
}

/// Caller-supplied token exchange. The crate decides *when* to refresh
/// (one retry on 401); the actual exchange call is the caller's.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenUpdate, Error>;
}

/// Pre-request extension point, e.g. HMAC signature generation. Returned
/// headers are merged into the outgoing request.
#[async_trait]
pub trait RequestSigner: Send + Sync {
    async fn before_request(
        &self,
        method: &Method,
        url: &Url,
        body: Option<&[u8]>,
    ) -> Result<HeaderMap, Error>;
}

/// Post-response observer, invoked on successful responses only.
pub trait ResponseObserver: Send + Sync {
    fn after_response(&self, status: StatusCode, headers: &HeaderMap);
}

/// A built authentication strategy: current credentials plus optional
/// lifecycle hooks. Cheap to clone; clones share the credential cell.
#[derive(Clone)]
pub struct Authentication {
    credentials: Arc<RwLock<AuthConfig>>,
    refresher: Option<Arc<dyn TokenRefresher>>,
    signer: Option<Arc<dyn RequestSigner>>,
    observer: Option<Arc<dyn ResponseObserver>>,
}

impl Authentication {
    /// Shorthand for the unauthenticated strategy.
    pub fn none() -> Self {
        AuthConfig::None.build().expect("no credentials to validate")
    }

    /// Installs a token refresher. Only effective for methods that carry a
    /// refresh token (`bearer`, `oauth2`); see [`Authentication::should_refresh`].
    pub fn with_refresher(mut self, refresher: Arc<dyn TokenRefresher>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ResponseObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub(crate) fn signer(&self) -> Option<&dyn RequestSigner> {
        self.signer.as_deref()
    }

    pub(crate) fn observer(&self) -> Option<&dyn ResponseObserver> {
        self.observer.as_deref()
    }

    /// The header set for the *current* credentials. Re-read on every call
    /// so an in-place refresh is observed by subsequent requests.
    pub fn header_map(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        let sensitive_value = |value: String| -> Result<HeaderValue, Error> {
            let mut value = HeaderValue::from_str(&value).map_err(|err| {
                Error::InvalidConfiguration(format!("credential is not a valid header value: {err}"))
            })?;
            value.set_sensitive(true);
            Ok(value)
        };
        match &*self.credentials.read() {
            AuthConfig::None | AuthConfig::Hmac { .. } => {}
            AuthConfig::Basic { username, password } => {
                let encoded = BASE64.encode(format!("{username}:{password}"));
                headers.insert(AUTHORIZATION, sensitive_value(format!("Basic {encoded}"))?);
            }
            AuthConfig::Bearer { token, .. } => {
                headers.insert(AUTHORIZATION, sensitive_value(format!("Bearer {token}"))?);
            }
            AuthConfig::ApiKey { api_key } => {
                headers.insert(
                    HeaderName::from_static("x-api-key"),
                    sensitive_value(api_key.clone())?,
                );
            }
            AuthConfig::Nonce { nonce } => {
                headers.insert(
                    HeaderName::from_static("x-wp-nonce"),
                    sensitive_value(nonce.clone())?,
                );
            }
            AuthConfig::Oauth2 { access_token, .. } => {
                if let Some(token) = access_token {
                    headers.insert(AUTHORIZATION, sensitive_value(format!("Bearer {token}"))?);
                }
            }
        }
        Ok(headers)
    }

    fn refresh_token(&self) -> Option<String> {
        match &*self.credentials.read() {
            AuthConfig::Bearer { refresh_token, .. }
            | AuthConfig::Oauth2 { refresh_token, .. } => refresh_token.clone(),
            _ => None,
        }
    }

    /// Whether a failed response should trigger the single refresh-and-retry
    /// cycle: a refresher is installed, the credentials carry a refresh
    /// token, and the failure is an authentication failure.
    pub fn should_refresh(&self, status: StatusCode) -> bool {
        status == StatusCode::UNAUTHORIZED
            && self.refresher.is_some()
            && self.refresh_token().is_some()
    }

    /// Runs the caller-supplied token exchange and swaps the new tokens into
    /// the shared cell. Requests already in flight keep the headers they were
    /// sent with; requests issued afterwards observe the new token.
    pub async fn refresh(&self) -> Result<(), Error> {
        let refresher = self.refresher.as_ref().ok_or_else(|| {
            Error::InvalidConfiguration("no token refresher installed".to_string())
        })?;
        let refresh_token = self.refresh_token().ok_or_else(|| {
            Error::InvalidConfiguration("authentication method has no refresh token".to_string())
        })?;
        let update = refresher.refresh(&refresh_token).await?;

        let mut credentials = self.credentials.write();
        match &mut *credentials {
            AuthConfig::Bearer {
                token,
                refresh_token,
            } => {
                *token = update.access_token;
                if update.refresh_token.is_some() {
                    *refresh_token = update.refresh_token;
                }
            }
            AuthConfig::Oauth2 {
                access_token,
                refresh_token,
                ..
            } => {
                *access_token = Some(update.access_token);
                if update.refresh_token.is_some() {
                    *refresh_token = update.refresh_token;
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl std::fmt::Debug for Authentication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authentication")
            .field("refresher", &self.refresher.is_some())
            .field("signer", &self.signer.is_some())
            .field("observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
        headers.get(name).unwrap().to_str().unwrap()
    }

    #[test]
    fn basic_header_round_trips_through_base64() {
        let auth = AuthConfig::Basic {
            username: "admin".to_string(),
            password: "secret123".to_string(),
        }
        .build()
        .unwrap();
        let headers = auth.header_map().unwrap();
        let value = header_str(&headers, "authorization");
        let encoded = value.strip_prefix("Basic ").unwrap();
        let decoded = BASE64.decode(encoded).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), "admin:secret123");
    }

    #[test]
    fn bearer_and_api_key_and_nonce_headers() {
        let bearer = AuthConfig::Bearer {
            token: "tok-1".to_string(),
            refresh_token: None,
        }
        .build()
        .unwrap();
        assert_eq!(
            header_str(&bearer.header_map().unwrap(), "authorization"),
            "Bearer tok-1"
        );

        let api_key = AuthConfig::ApiKey {
            api_key: "key-1".to_string(),
        }
        .build()
        .unwrap();
        assert_eq!(
            header_str(&api_key.header_map().unwrap(), API_KEY_HEADER),
            "key-1"
        );

        let nonce = AuthConfig::Nonce {
            nonce: "n-1".to_string(),
        }
        .build()
        .unwrap();
        assert_eq!(
            header_str(&nonce.header_map().unwrap(), NONCE_HEADER),
            "n-1"
        );
    }

    #[test]
    fn none_and_hmac_produce_no_headers() {
        assert!(Authentication::none().header_map().unwrap().is_empty());

        let hmac = AuthConfig::Hmac {
            api_key: "key".to_string(),
            secret: "secret".to_string(),
        }
        .build()
        .unwrap();
        assert!(hmac.header_map().unwrap().is_empty());
    }

    #[test]
    fn oauth2_header_only_with_access_token() {
        let without = AuthConfig::Oauth2 {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            access_token: None,
            refresh_token: None,
        }
        .build()
        .unwrap();
        assert!(without.header_map().unwrap().is_empty());

        let with = AuthConfig::Oauth2 {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            access_token: Some("acc-1".to_string()),
            refresh_token: None,
        }
        .build()
        .unwrap();
        assert_eq!(
            header_str(&with.header_map().unwrap(), "authorization"),
            "Bearer acc-1"
        );
    }

    #[test]
    fn missing_fields_are_named() {
        let err = AuthConfig::Basic {
            username: String::new(),
            password: String::new(),
        }
        .build()
        .unwrap_err();
        match err {
            Error::InvalidConfiguration(message) => {
                assert!(message.contains("username"), "{message}");
                assert!(message.contains("password"), "{message}");
            }
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }
    }

    struct StaticRefresher(&'static str);

    #[async_trait]
    impl TokenRefresher for StaticRefresher {
        async fn refresh(&self, _refresh_token: &str) -> Result<TokenUpdate, Error> {
            Ok(TokenUpdate {
                access_token: self.0.to_string(),
                refresh_token: None,
            })
        }
    }

    #[tokio::test]
    async fn refresh_swaps_token_in_place() {
        let auth = AuthConfig::Bearer {
            token: "old".to_string(),
            refresh_token: Some("refresh".to_string()),
        }
        .build()
        .unwrap()
        .with_refresher(Arc::new(StaticRefresher("new")));

        assert!(auth.should_refresh(StatusCode::UNAUTHORIZED));
        assert!(!auth.should_refresh(StatusCode::FORBIDDEN));

        // A clone issued before the refresh shares the cell and sees the
        // new token afterwards.
        let shared = auth.clone();
        auth.refresh().await.unwrap();
        assert_eq!(
            header_str(&shared.header_map().unwrap(), "authorization"),
            "Bearer new"
        );
    }

    #[test]
    fn refresh_requires_token_and_refresher() {
        let without_token = AuthConfig::Bearer {
            token: "tok".to_string(),
            refresh_token: None,
        }
        .build()
        .unwrap()
        .with_refresher(Arc::new(StaticRefresher("unused")));
        assert!(!without_token.should_refresh(StatusCode::UNAUTHORIZED));

        let without_refresher = AuthConfig::Bearer {
            token: "tok".to_string(),
            refresh_token: Some("refresh".to_string()),
        }
        .build()
        .unwrap();
        assert!(!without_refresher.should_refresh(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn deserializes_from_tagged_config() {
        let config: AuthConfig = serde_json::from_str(
            r#"{ "method": "basic", "username": "admin", "password": "pw" }"#,
        )
        .unwrap();
        assert!(matches!(config, AuthConfig::Basic { .. }));
    }
}
