//! Per-resource endpoint factories.
//!
//! Every factory composes the shared executor and pagination helpers with a
//! fixed base path. Resources with the standard collection shape embed an
//! [`Endpoint`] and expose its CRUD surface through `Deref`; extras
//! (revisions, `me`, uploads) are inherent methods on the factory.

mod comments;
mod discovery;
mod media;
mod pages;
mod posts;
mod sitemap;
mod terms;
mod users;

pub use comments::Comments;
pub use discovery::{PostStatuses, PostTypes, Taxonomies};
pub use media::Media;
pub use pages::Pages;
pub use posts::Posts;
pub use sitemap::Sitemap;
pub use terms::{Categories, Tags};
pub use users::Users;

use crate::{
    client::{Client, Request},
    error::Error,
    pagination::{self, Paginated},
    url::{self, Params},
};
use futures::Stream;
use serde::{de::DeserializeOwned, Serialize};
use std::{borrow::Cow, marker::PhantomData};
use tokio_util::sync::CancellationToken;

/// The shared `{list, get, create, update, delete}` capability over one
/// collection path.
#[derive(Clone, Debug)]
pub struct Endpoint<T> {
    client: Client,
    base_path: Cow<'static, str>,
    cancellation: Option<CancellationToken>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Endpoint<T> {
    pub(crate) fn new(client: Client, base_path: impl Into<Cow<'static, str>>) -> Self {
        Self {
            client,
            base_path: base_path.into(),
            cancellation: None,
            _marker: PhantomData,
        }
    }

    /// Attaches a cancellation token to every request this endpoint issues.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn base_path(&self) -> &str {
        &self.base_path
    }

    pub(crate) fn request(&self, request: Request) -> Request {
        match &self.cancellation {
            Some(token) => request.cancellation(token.clone()),
            None => request,
        }
    }

    fn item_path(&self, id: u64) -> String {
        url::resource_path(&self.base_path, Some(&id.to_string()))
    }

    /// Fetches one page of the collection.
    pub async fn list(&self, params: Params) -> Result<Paginated<T>, Error> {
        let request = self.request(Request::get(self.base_path.as_ref()).params(params));
        self.client.execute_paginated(&request).await
    }

    /// Fetches every page of the collection into one ordered `Vec`; see
    /// [`pagination::list_all`] for the traversal rules.
    pub async fn list_all(&self, params: Params) -> Result<Vec<T>, Error> {
        pagination::list_all(|page_params| self.list(page_params), params).await
    }

    /// A lazy page-at-a-time traversal; see [`pagination::page_stream`].
    pub fn pages(&self, params: Params) -> impl Stream<Item = Result<Paginated<T>, Error>> + '_ {
        pagination::page_stream(move |page_params| self.list(page_params), params)
    }

    pub async fn get(&self, id: u64, params: Params) -> Result<T, Error> {
        let request = self.request(Request::get(self.item_path(id)).params(params));
        self.client.execute(&request).await
    }

    pub async fn create<B: Serialize>(&self, body: &B) -> Result<T, Error> {
        let request = self.request(Request::post(self.base_path.as_ref()).json(body)?);
        self.client.execute(&request).await
    }

    /// A logical update, physically sent as POST with the method-override
    /// header.
    pub async fn update<B: Serialize>(&self, id: u64, body: &B) -> Result<T, Error> {
        let request = self.request(Request::put(self.item_path(id)).json(body)?);
        self.client.execute(&request).await
    }

    /// Deletes a resource. With `force` the provider skips the trash and
    /// answers with a `{ deleted, previous }` wrapper, so the response stays
    /// an opaque value.
    pub async fn delete(&self, id: u64, force: bool) -> Result<serde_json::Value, Error> {
        let mut params = Params::new();
        if force {
            params.set("force", true);
        }
        let request = self.request(Request::delete(self.item_path(id)).params(params));
        self.client.execute(&request).await
    }
}

/// Read-only resources the provider returns as one field-keyed object
/// (taxonomies, post types, post statuses): list converts the object's
/// values to an ordered single-page sequence, get addresses items by slug.
#[derive(Clone, Debug)]
pub struct KeyedEndpoint<T> {
    client: Client,
    base_path: Cow<'static, str>,
    cancellation: Option<CancellationToken>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> KeyedEndpoint<T> {
    pub(crate) fn new(client: Client, base_path: impl Into<Cow<'static, str>>) -> Self {
        Self {
            client,
            base_path: base_path.into(),
            cancellation: None,
            _marker: PhantomData,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    fn request(&self, request: Request) -> Request {
        match &self.cancellation {
            Some(token) => request.cancellation(token.clone()),
            None => request,
        }
    }

    pub async fn list(&self, params: Params) -> Result<Paginated<T>, Error> {
        let request = self.request(Request::get(self.base_path.as_ref()).params(params));
        self.client.execute_map_list(&request).await
    }

    pub async fn get(&self, slug: &str, params: Params) -> Result<T, Error> {
        let path = url::resource_path(&self.base_path, Some(slug));
        let request = self.request(Request::get(path).params(params));
        self.client.execute(&request).await
    }
}
