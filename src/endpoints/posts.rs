use super::Endpoint;
use crate::{
    client::{Client, Request},
    error::Error,
    types::{Post, Revision},
    url::{self, Params},
};
use std::ops::Deref;

const BASE_PATH: &str = "/wp/v2/posts";

/// The posts collection: full CRUD plus revision history.
#[derive(Clone, Debug)]
pub struct Posts {
    endpoint: Endpoint<Post>,
}

impl Posts {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            endpoint: Endpoint::new(client, BASE_PATH),
        }
    }

    fn revisions_path(&self, post_id: u64) -> String {
        let item = url::resource_path(self.endpoint.base_path(), Some(&post_id.to_string()));
        url::join_path(&item, "revisions")
    }

    /// Lists the stored revisions of one post.
    pub async fn revisions(&self, post_id: u64, params: Params) -> Result<Vec<Revision>, Error> {
        let request = self
            .endpoint
            .request(Request::get(self.revisions_path(post_id)).params(params));
        self.endpoint.client().execute(&request).await
    }

    pub async fn revision(&self, post_id: u64, revision_id: u64) -> Result<Revision, Error> {
        let path = url::resource_path(
            &self.revisions_path(post_id),
            Some(&revision_id.to_string()),
        );
        let request = self.endpoint.request(Request::get(path));
        self.endpoint.client().execute(&request).await
    }
}

impl Deref for Posts {
    type Target = Endpoint<Post>;

    fn deref(&self) -> &Self::Target {
        &self.endpoint
    }
}
