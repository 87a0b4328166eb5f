use crate::{
    client::{Client, Request},
    error::Error,
};
use tokio_util::sync::CancellationToken;

/// The two sitemap reads. These return raw XML and are passed through
/// unparsed; everything else in the API speaks JSON.
#[derive(Clone, Debug)]
pub struct Sitemap {
    client: Client,
    cancellation: Option<CancellationToken>,
}

impl Sitemap {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            cancellation: None,
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

    /// The sitemap index, `wp-sitemap.xml`.
    pub async fn index(&self) -> Result<String, Error> {
        let request = self.request(Request::get("/wp-sitemap.xml"));
        self.client.execute_text(&request).await
    }

    /// One sitemap part, e.g. `object_type = "posts-post"`, `page = 1`
    /// resolves to `wp-sitemap-posts-post-1.xml`.
    pub async fn part(&self, object_type: &str, page: u64) -> Result<String, Error> {
        let request = self.request(Request::get(format!("/wp-sitemap-{object_type}-{page}.xml")));
        self.client.execute_text(&request).await
    }
}
