use super::Endpoint;
use crate::{client::Client, types::Comment};
use std::ops::Deref;

const BASE_PATH: &str = "/wp/v2/comments";

/// The comments collection; plain CRUD, no extras.
#[derive(Clone, Debug)]
pub struct Comments {
    endpoint: Endpoint<Comment>,
}

impl Comments {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            endpoint: Endpoint::new(client, BASE_PATH),
        }
    }
}

impl Deref for Comments {
    type Target = Endpoint<Comment>;

    fn deref(&self) -> &Self::Target {
        &self.endpoint
    }
}
