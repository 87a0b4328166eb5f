use super::Endpoint;
use crate::{
    client::{Client, Request},
    error::Error,
    types::{Page, Revision},
    url::{self, Params},
};
use std::ops::Deref;

const BASE_PATH: &str = "/wp/v2/pages";

/// The pages collection; same shape as posts, including revisions.
#[derive(Clone, Debug)]
pub struct Pages {
    endpoint: Endpoint<Page>,
}

impl Pages {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            endpoint: Endpoint::new(client, BASE_PATH),
        }
    }

    fn revisions_path(&self, page_id: u64) -> String {
        let item = url::resource_path(self.endpoint.base_path(), Some(&page_id.to_string()));
        url::join_path(&item, "revisions")
    }

    pub async fn revisions(&self, page_id: u64, params: Params) -> Result<Vec<Revision>, Error> {
        let request = self
            .endpoint
            .request(Request::get(self.revisions_path(page_id)).params(params));
        self.endpoint.client().execute(&request).await
    }

    pub async fn revision(&self, page_id: u64, revision_id: u64) -> Result<Revision, Error> {
        let path = url::resource_path(
            &self.revisions_path(page_id),
            Some(&revision_id.to_string()),
        );
        let request = self.endpoint.request(Request::get(path));
        self.endpoint.client().execute(&request).await
    }
}

impl Deref for Pages {
    type Target = Endpoint<Page>;

    fn deref(&self) -> &Self::Target {
        &self.endpoint
    }
}
