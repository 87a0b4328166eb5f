//! An async, typed client for WordPress-style REST APIs.
//!
//! The crate is a thin call-and-parse layer over `reqwest`: it joins the
//! base address with endpoint paths, serializes query parameters with the
//! provider's encoding rules, attaches authentication headers, traverses
//! pagination, and normalizes failed responses into one structured error.
//!
//! ```no_run
//! use wp_client::{AuthConfig, Client, Config, Params};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), wp_client::Error> {
//!     let config = Config::new("https://example.com/wp-json".parse().unwrap()).auth(
//!         AuthConfig::Basic {
//!             username: "admin".into(),
//!             password: "secret".into(),
//!         },
//!     );
//!     let client = Client::new(config)?;
//!
//!     // One page, with the provider's count headers folded into metadata.
//!     let page = client.posts().list(Params::new().with("per_page", 10u64)).await?;
//!     println!("{} posts of {} total", page.items.len(), page.meta.total);
//!
//!     // Or every page at once, fetched concurrently after page 1.
//!     let all = client.posts().list_all(Params::new()).await?;
//!     println!("{} posts", all.len());
//!     Ok(())
//! }
//! ```
//!
//! Authentication is a closed set of methods ([`AuthConfig`]) validated once
//! at construction; bearer and oauth2 credentials can be refreshed in place
//! through a caller-supplied [`TokenRefresher`], which the executor invokes
//! at most once per request on a 401 before retrying. Cancellation is
//! cooperative via `tokio_util`'s `CancellationToken` and surfaces as
//! [`Error::Cancelled`], distinct from API and transport failures.

mod auth;
mod client;
mod config;
mod error;
pub mod endpoints;
mod pagination;
pub mod types;
mod url;

pub use auth::{
    AuthConfig, Authentication, RequestSigner, ResponseObserver, TokenRefresher, TokenUpdate,
    API_KEY_HEADER, NONCE_HEADER,
};
pub use client::{Client, Request, METHOD_OVERRIDE_HEADER};
pub use config::Config;
pub use error::{ApiError, Error};
pub use pagination::{
    list_all, page_stream, PageMeta, Paginated, MAX_PAGE_SIZE, TOTAL_HEADER, TOTAL_PAGES_HEADER,
};
pub use crate::url::{
    build_url, join_path, resource_path, ParamValue, Params, EMBED_PARAM, FIELDS_PARAM,
};
