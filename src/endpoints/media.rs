use super::Endpoint;
use crate::{
    client::{Client, Request},
    error::Error,
    types::MediaItem,
};
use reqwest::multipart::{Form, Part};
use std::ops::Deref;

const BASE_PATH: &str = "/wp/v2/media";

/// The media library. Creation goes through [`Media::upload`] because the
/// provider expects `multipart/form-data`, not JSON.
#[derive(Clone, Debug)]
pub struct Media {
    endpoint: Endpoint<MediaItem>,
}

impl Media {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            endpoint: Endpoint::new(client, BASE_PATH),
        }
    }

    /// Uploads a new media item: the binary payload goes under the `file`
    /// form field, every entry of `fields` (e.g. `title`, `alt_text`) is
    /// appended as a plain form field.
    pub async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
        fields: &[(String, String)],
    ) -> Result<MediaItem, Error> {
        let request = self.endpoint.request(Request::post(BASE_PATH));
        // The form is rebuilt per attempt; multipart bodies are not
        // replayable across the refresh retry.
        let make_form = || {
            let part = Part::bytes(bytes.clone())
                .file_name(file_name.to_string())
                .mime_str(content_type)
                .map_err(Error::Transport)?;
            let mut form = Form::new().part("file", part);
            for (name, value) in fields {
                form = form.text(name.clone(), value.clone());
            }
            Ok(form)
        };
        self.endpoint
            .client()
            .execute_multipart(&request, make_form)
            .await
    }
}

impl Deref for Media {
    type Target = Endpoint<MediaItem>;

    fn deref(&self) -> &Self::Target {
        &self.endpoint
    }
}
