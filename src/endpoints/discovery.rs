//! Read-only discovery resources. The provider answers these listings with
//! one field-keyed object instead of an array, so they go through
//! [`KeyedEndpoint`] and always report a single page.

use super::KeyedEndpoint;
use crate::{
    client::Client,
    types::{PostStatus, PostType, Taxonomy},
};
use std::ops::Deref;

#[derive(Clone, Debug)]
pub struct Taxonomies {
    endpoint: KeyedEndpoint<Taxonomy>,
}

impl Taxonomies {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            endpoint: KeyedEndpoint::new(client, "/wp/v2/taxonomies"),
        }
    }
}

impl Deref for Taxonomies {
    type Target = KeyedEndpoint<Taxonomy>;

    fn deref(&self) -> &Self::Target {
        &self.endpoint
    }
}

#[derive(Clone, Debug)]
pub struct PostTypes {
    endpoint: KeyedEndpoint<PostType>,
}

impl PostTypes {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            endpoint: KeyedEndpoint::new(client, "/wp/v2/types"),
        }
    }
}

impl Deref for PostTypes {
    type Target = KeyedEndpoint<PostType>;

    fn deref(&self) -> &Self::Target {
        &self.endpoint
    }
}

#[derive(Clone, Debug)]
pub struct PostStatuses {
    endpoint: KeyedEndpoint<PostStatus>,
}

impl PostStatuses {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            endpoint: KeyedEndpoint::new(client, "/wp/v2/statuses"),
        }
    }
}

impl Deref for PostStatuses {
    type Target = KeyedEndpoint<PostStatus>;

    fn deref(&self) -> &Self::Target {
        &self.endpoint
    }
}
