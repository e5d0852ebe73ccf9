//! Cursor pagination over list endpoints
//!
//! Gorgias list responses carry an opaque `next_cursor`; its absence is the
//! only end-of-list signal. [`paginate`] turns a page-fetch function into a
//! lazy stream of items, fetching one page per suspension round. A page with
//! an empty `data` array but a present cursor still triggers the next fetch.

use std::future::Future;

use futures::stream::{self, Stream, TryStreamExt};
use tokio_util::sync::CancellationToken;

use crate::error::GorgiasError;
use crate::types::PaginatedResponse;

/// Page size used when the config does not specify one
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Knobs for [`paginate`] and [`collect_all`]
#[derive(Debug, Clone, Default)]
pub struct PaginationConfig {
    /// Items requested per page
    pub page_size: Option<u32>,

    /// Checked before each page fetch; once triggered the stream fails with
    /// a network error instead of fetching further
    pub cancel: Option<CancellationToken>,
}

/// Lazily iterate all items across pages.
///
/// `fetch_page` receives the cursor of the page to fetch (`None` for the
/// first) and the page size. Items are yielded in page order; the stream
/// ends when a page carries no `next_cursor`.
pub fn paginate<T, F, Fut>(
    fetch_page: F,
    config: PaginationConfig,
) -> impl Stream<Item = Result<T, GorgiasError>>
where
    F: FnMut(Option<String>, u32) -> Fut,
    Fut: Future<Output = Result<PaginatedResponse<T>, GorgiasError>>,
{
    let page_size = config.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    let cancel = config.cancel;

    // Outer None means the previous page had no next cursor; the inner
    // Option is the cursor itself (None = first page).
    let initial: Option<Option<String>> = Some(None);

    stream::try_unfold((initial, fetch_page), move |(pending, mut fetch)| {
        let cancel = cancel.clone();
        async move {
            let Some(cursor) = pending else {
                return Ok(None);
            };

            if let Some(token) = &cancel {
                if token.is_cancelled() {
                    return Err(GorgiasError::network("pagination cancelled", None, None));
                }
            }

            let page = fetch(cursor, page_size).await?;
            let next = page.meta.next_cursor.clone().map(Some);
            let items = stream::iter(page.data.into_iter().map(Ok::<T, GorgiasError>));
            Ok(Some((items, (next, fetch))))
        }
    })
    .try_flatten()
}

/// Collect every item from a paginated endpoint into memory.
///
/// Unsuitable for unbounded result sets; prefer [`paginate`] and consume the
/// stream incrementally.
pub async fn collect_all<T, F, Fut>(
    fetch_page: F,
    config: PaginationConfig,
) -> Result<Vec<T>, GorgiasError>
where
    F: FnMut(Option<String>, u32) -> Fut,
    Fut: Future<Output = Result<PaginatedResponse<T>, GorgiasError>>,
{
    paginate(fetch_page, config).try_collect().await
}
