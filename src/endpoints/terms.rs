use super::Endpoint;
use crate::{client::Client, types::Term};
use std::ops::Deref;

/// The categories collection (hierarchical terms).
#[derive(Clone, Debug)]
pub struct Categories {
    endpoint: Endpoint<Term>,
}

impl Categories {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            endpoint: Endpoint::new(client, "/wp/v2/categories"),
        }
    }
}

impl Deref for Categories {
    type Target = Endpoint<Term>;

    fn deref(&self) -> &Self::Target {
        &self.endpoint
    }
}

/// The tags collection (flat terms).
#[derive(Clone, Debug)]
pub struct Tags {
    endpoint: Endpoint<Term>,
}

impl Tags {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            endpoint: Endpoint::new(client, "/wp/v2/tags"),
        }
    }
}

impl Deref for Tags {
    type Target = Endpoint<Term>;

    fn deref(&self) -> &Self::Target {
        &self.endpoint
    }
}
