//! The request executor: builds one HTTP call from a [`Request`] descriptor
//! and the configured authentication, applies the single refresh-and-retry
//! rule, and parses the response.

use crate::{
    auth::Authentication,
    config::Config,
    endpoints,
    error::{ApiError, Error},
    pagination::Paginated,
    url::{self, Params},
    PageMeta,
};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE},
    Method, Response,
};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Logical PUT goes out as POST carrying this header; the provider has no
/// native PUT route.
pub const METHOD_OVERRIDE_HEADER: &str = "X-HTTP-Method-Override";

/// The immutable record of one intended request. Built once per call and
/// consumed by [`Client::execute`] and friends.
#[derive(Clone, Debug, Default)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) params: Params,
    pub(crate) body: Option<serde_json::Value>,
    pub(crate) headers: Option<HeaderMap>,
    pub(crate) cancellation: Option<CancellationToken>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// A logical update; sent as POST with [`METHOD_OVERRIDE_HEADER`].
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, Error> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.get_or_insert_with(HeaderMap::new).insert(name, value);
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Attaches a cooperative cancellation token; when it fires before the
    /// response arrives the call resolves to [`Error::Cancelled`].
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Explicit header precedence for one request, kept as a standalone function
/// so the rule is testable in isolation: defaults < caller overrides < auth
/// headers, except that a caller-set `Content-Type` survives auth.
pub(crate) fn merge_headers(
    defaults: &HeaderMap,
    overrides: Option<&HeaderMap>,
    auth: &HeaderMap,
) -> HeaderMap {
    let mut merged = defaults.clone();
    if let Some(overrides) = overrides {
        for (name, value) in overrides {
            merged.insert(name.clone(), value.clone());
        }
    }
    let caller_content_type = overrides.is_some_and(|headers| headers.contains_key(CONTENT_TYPE));
    for (name, value) in auth {
        if *name == CONTENT_TYPE && caller_content_type {
            continue;
        }
        merged.insert(name.clone(), value.clone());
    }
    merged
}

struct Inner {
    http: reqwest::Client,
    base_url: ::url::Url,
    auth: Authentication,
    default_headers: HeaderMap,
}

/// The API client. Cheap to clone; all clones share one HTTP connection
/// pool and one authentication state.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

impl Client {
    /// Builds a client, validating the authentication configuration once.
    pub fn new(config: Config) -> Result<Self, Error> {
        let auth = config.auth.clone().build()?;
        Self::with_authentication(config, auth)
    }

    /// Builds a client around an already-built [`Authentication`], which is
    /// how refresh/signing hooks get installed.
    pub fn with_authentication(config: Config, auth: Authentication) -> Result<Self, Error> {
        Ok(Self {
            inner: Arc::new(Inner {
                http: config.http_client.unwrap_or_default(),
                base_url: config.base_url,
                auth,
                default_headers: config.default_headers,
            }),
        })
    }

    pub fn authentication(&self) -> &Authentication {
        &self.inner.auth
    }

    /// Executes the request and parses the JSON response body.
    pub async fn execute<T: DeserializeOwned>(&self, request: &Request) -> Result<T, Error> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Executes the request and returns the raw body text (sitemap XML).
    pub async fn execute_text(&self, request: &Request) -> Result<String, Error> {
        let response = self.send(request).await?;
        Ok(response.text().await?)
    }

    /// Executes a list request, deriving page metadata from the provider's
    /// count headers before parsing the items.
    pub async fn execute_paginated<T: DeserializeOwned>(
        &self,
        request: &Request,
    ) -> Result<Paginated<T>, Error> {
        let page = request.params.get_u64("page").unwrap_or(1);
        let per_page = request.params.get_u64("per_page");
        let response = self.send(request).await?;
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;
        let items: Vec<T> = serde_json::from_slice(&bytes)?;
        let meta = PageMeta::from_headers(
            &headers,
            page,
            per_page.unwrap_or(items.len() as u64),
            items.len(),
        );
        Ok(Paginated { items, meta })
    }

    /// Executes a list request whose response is a field-keyed JSON object
    /// (taxonomies, post types, post statuses): the values become an ordered
    /// sequence and pagination always reports a single page.
    pub async fn execute_map_list<T: DeserializeOwned>(
        &self,
        request: &Request,
    ) -> Result<Paginated<T>, Error> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(&bytes)?;
        let items = map
            .into_iter()
            .map(|(_, value)| serde_json::from_value(value))
            .collect::<Result<Vec<T>, _>>()?;
        let meta = PageMeta::single_page(items.len());
        Ok(Paginated { items, meta })
    }

    /// Executes a `multipart/form-data` request. The form is rebuilt through
    /// `make_form` on the refresh retry because a form body is not replayable.
    pub async fn execute_multipart<T, F>(&self, request: &Request, make_form: F) -> Result<T, Error>
    where
        T: DeserializeOwned,
        F: Fn() -> Result<reqwest::multipart::Form, Error>,
    {
        let response = self.send_inner(request, Some(&make_form)).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Sends the request and resolves to the successful response, applying
    /// the single refresh-and-retry rule. Non-2xx responses that are not
    /// retried away are normalized into [`ApiError`].
    pub(crate) async fn send(&self, request: &Request) -> Result<Response, Error> {
        self.send_inner(request, None).await
    }

    async fn send_inner(
        &self,
        request: &Request,
        make_form: Option<&(dyn Fn() -> Result<reqwest::multipart::Form, Error>)>,
    ) -> Result<Response, Error> {
        let body_method = request.method == Method::POST
            || request.method == Method::PUT
            || request.method == Method::PATCH;
        let body_bytes = match &request.body {
            Some(body) if body_method => Some(serde_json::to_vec(body)?),
            _ => None,
        };

        let mut refreshed = false;
        loop {
            let form = make_form.map(|make| make()).transpose()?;
            let response = self
                .send_once(request, body_bytes.as_deref(), form)
                .await?;
            let status = response.status();

            if status.is_success() {
                if let Some(observer) = self.inner.auth.observer() {
                    observer.after_response(status, response.headers());
                }
                return Ok(response);
            }

            if self.inner.auth.should_refresh(status) {
                if refreshed {
                    return Err(Error::RefreshFailed { status });
                }
                refreshed = true;
                tracing::warn!(%status, "auth failure, refreshing credentials and retrying once");
                self.inner.auth.refresh().await?;
                continue;
            }

            return Err(ApiError::from_response(response).await.into());
        }
    }

    async fn send_once(
        &self,
        request: &Request,
        body_bytes: Option<&[u8]>,
        form: Option<reqwest::multipart::Form>,
    ) -> Result<Response, Error> {
        let target = url::build_url(self.inner.base_url.as_str(), &request.path, &request.params);
        let target = ::url::Url::parse(&target).map_err(|err| {
            Error::InvalidConfiguration(format!("invalid request url `{target}`: {err}"))
        })?;

        let mut headers = merge_headers(
            &self.inner.default_headers,
            request.headers.as_ref(),
            &self.inner.auth.header_map()?,
        );

        if let Some(signer) = self.inner.auth.signer() {
            let signed = signer
                .before_request(&request.method, &target, body_bytes)
                .await?;
            for (name, value) in &signed {
                headers.insert(name.clone(), value.clone());
            }
        }

        let physical_method = if request.method == Method::PUT {
            headers.insert(
                HeaderName::from_static("x-http-method-override"),
                HeaderValue::from_static("PUT"),
            );
            Method::POST
        } else {
            request.method.clone()
        };

        if body_bytes.is_some() && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        tracing::debug!(method = %physical_method, url = %target, "sending request");

        let mut builder = self
            .inner
            .http
            .request(physical_method, target)
            .headers(headers);
        if let Some(bytes) = body_bytes {
            builder = builder.body(bytes.to_vec());
        }
        if let Some(form) = form {
            builder = builder.multipart(form);
        }

        let send = builder.send();
        match &request.cancellation {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(Error::Cancelled),
                    response = send => Ok(response?),
                }
            }
            None => Ok(send.await?),
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url)
            .field("auth", &self.inner.auth)
            .finish_non_exhaustive()
    }
}

impl Client {
    pub fn posts(&self) -> endpoints::Posts {
        endpoints::Posts::new(self.clone())
    }

    pub fn pages(&self) -> endpoints::Pages {
        endpoints::Pages::new(self.clone())
    }

    pub fn media(&self) -> endpoints::Media {
        endpoints::Media::new(self.clone())
    }

    pub fn users(&self) -> endpoints::Users {
        endpoints::Users::new(self.clone())
    }

    pub fn comments(&self) -> endpoints::Comments {
        endpoints::Comments::new(self.clone())
    }

    pub fn categories(&self) -> endpoints::Categories {
        endpoints::Categories::new(self.clone())
    }

    pub fn tags(&self) -> endpoints::Tags {
        endpoints::Tags::new(self.clone())
    }

    pub fn taxonomies(&self) -> endpoints::Taxonomies {
        endpoints::Taxonomies::new(self.clone())
    }

    pub fn post_types(&self) -> endpoints::PostTypes {
        endpoints::PostTypes::new(self.clone())
    }

    pub fn post_statuses(&self) -> endpoints::PostStatuses {
        endpoints::PostStatuses::new(self.clone())
    }

    pub fn sitemap(&self) -> endpoints::Sitemap {
        endpoints::Sitemap::new(self.clone())
    }
}
