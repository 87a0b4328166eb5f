//! Pagination: per-page metadata derived from the provider's count headers
//! and helpers to traverse every page of a listing.

use crate::{error::Error, url::Params};
use futures::{future::try_join_all, Future, Stream};
use reqwest::header::HeaderMap;

/// Response header carrying the total number of matching items.
pub const TOTAL_HEADER: &str = "X-WP-Total";
/// Response header carrying the total number of pages at the requested size.
pub const TOTAL_PAGES_HEADER: &str = "X-WP-TotalPages";

/// Page size forced by [`list_all`]; the provider's maximum.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Position metadata for one page of a listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageMeta {
    /// Total matching items across all pages.
    pub total: u64,
    pub total_pages: u64,
    /// The page this metadata describes, 1-based. Always equals the page
    /// requested by the caller (1 when omitted).
    pub page: u64,
    /// Page size in effect for the request.
    pub per_page: u64,
    pub has_more: bool,
}

impl PageMeta {
    /// Derives metadata from the count headers. When the headers are absent
    /// the totals are inferred from the returned items, which reports a
    /// single page; accuracy then depends on the provider actually returning
    /// everything at once.
    pub fn from_headers(headers: &HeaderMap, page: u64, per_page: u64, item_count: usize) -> Self {
        let header_u64 = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u64>().ok())
        };
        let total = header_u64(TOTAL_HEADER).unwrap_or(item_count as u64);
        let total_pages = header_u64(TOTAL_PAGES_HEADER).unwrap_or(1);
        Self {
            total,
            total_pages,
            page,
            per_page,
            has_more: page < total_pages,
        }
    }

    /// Metadata for listings the provider returns in one shot (field-keyed
    /// maps such as taxonomies or post statuses).
    pub fn single_page(item_count: usize) -> Self {
        Self {
            total: item_count as u64,
            total_pages: 1,
            page: 1,
            per_page: item_count as u64,
            has_more: false,
        }
    }
}

/// One page of items plus its position metadata.
#[derive(Clone, Debug)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

/// Collects every page of a listing into one ordered `Vec`.
///
/// Page 1 is fetched at the maximum page size; when more pages exist they
/// are all fetched concurrently and concatenated in ascending page order
/// (ordering is by page index, not completion time). The first page error
/// aborts the whole call; there is no partial result.
///
/// Any caller-supplied `page`/`per_page` values in `params` are overridden.
pub async fn list_all<T, F, Fut>(fetch: F, params: Params) -> Result<Vec<T>, Error>
where
    F: Fn(Params) -> Fut,
    Fut: Future<Output = Result<Paginated<T>, Error>>,
{
    let page_params = |page: u64| {
        params
            .clone()
            .with("page", page)
            .with("per_page", MAX_PAGE_SIZE)
    };

    let first = fetch(page_params(1)).await?;
    if first.meta.total_pages <= 1 {
        return Ok(first.items);
    }

    let remaining = try_join_all((2..=first.meta.total_pages).map(|page| fetch(page_params(page))));

    let mut items = first.items;
    for page in remaining.await? {
        items.extend(page.items);
    }
    Ok(items)
}

/// A lazy, restartable page-at-a-time traversal.
///
/// Each poll fetches exactly one page and waits for it before the next page
/// is requested; the stream ends after the first page whose `has_more` is
/// false. The traversal trusts the provider's pagination metadata: if
/// `has_more` never turns false, the stream is infinite. Errors surface at
/// the iteration step that hit them.
///
/// The caller's `page` value in `params` is overridden; `per_page` is left
/// as supplied.
pub fn page_stream<T, F, Fut>(
    fetch: F,
    params: Params,
) -> impl Stream<Item = Result<Paginated<T>, Error>>
where
    F: Fn(Params) -> Fut,
    Fut: Future<Output = Result<Paginated<T>, Error>>,
{
    futures::stream::try_unfold((1u64, false), move |(page, done)| {
        let fut = (!done).then(|| fetch(params.clone().with("page", page)));
        async move {
            match fut {
                None => Ok(None),
                Some(fut) => {
                    let fetched = fut.await?;
                    let done = !fetched.meta.has_more;
                    Ok(Some((fetched, (page + 1, done))))
                }
            }
        }
    })
}
