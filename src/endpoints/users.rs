use super::Endpoint;
use crate::{
    client::{Client, Request},
    error::Error,
    types::User,
    url::{self, Params},
};
use std::ops::Deref;

const BASE_PATH: &str = "/wp/v2/users";

/// The users collection, including the authenticated `me` view.
#[derive(Clone, Debug)]
pub struct Users {
    endpoint: Endpoint<User>,
}

impl Users {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            endpoint: Endpoint::new(client, BASE_PATH),
        }
    }

    /// The user the current credentials belong to.
    pub async fn me(&self, params: Params) -> Result<User, Error> {
        let path = url::resource_path(BASE_PATH, Some("me"));
        let request = self.endpoint.request(Request::get(path).params(params));
        self.endpoint.client().execute(&request).await
    }

    /// Deletes a user. The provider requires `force=true` here (users have
    /// no trash) and, when given, reassigns the user's content.
    pub async fn delete(
        &self,
        id: u64,
        reassign: Option<u64>,
    ) -> Result<serde_json::Value, Error> {
        let mut params = Params::new().with("force", true);
        if let Some(reassign) = reassign {
            params.set("reassign", reassign);
        }
        let path = url::resource_path(BASE_PATH, Some(&id.to_string()));
        let request = self.endpoint.request(Request::delete(path).params(params));
        self.endpoint.client().execute(&request).await
    }
}

impl Deref for Users {
    type Target = Endpoint<User>;

    fn deref(&self) -> &Self::Target {
        &self.endpoint
    }
}
