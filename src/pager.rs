//! Cursor-based page collection
//!
//! One loop drives every paginated endpoint: call the page fetcher with the
//! previous cursor, append the items, report progress, and stop once the
//! requested limit is reached or the endpoint signals end-of-data. The loop
//! never fetches ahead, so the result may exceed `limit` by at most one page;
//! callers that need an exact cut truncate downstream.

use std::future::Future;

use crate::error::Result;
use crate::progress::Progress;

/// One page of results from a cursor-paginated endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Opaque cursor for the next page (meaningful only when `has_more`)
    pub cursor: String,
    /// Whether the endpoint has further pages
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Final page carrying the given items.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            cursor: String::new(),
            has_more: false,
        }
    }

    /// Intermediate page carrying the given items and next cursor.
    pub fn more(items: Vec<T>, cursor: impl Into<String>) -> Self {
        Self {
            items,
            cursor: cursor.into(),
            has_more: true,
        }
    }
}

/// Collect pages until at least `limit` items are accumulated or the data is
/// exhausted, reporting `report_offset + accumulated` after every page.
///
/// The start cursor is empty (endpoint-defined). Fetch failures propagate
/// immediately; nothing from a failed page is counted. An empty page that
/// still claims more data is treated as exhaustion: without new items the
/// loop cannot make progress, so it stops rather than spin on the endpoint.
pub async fn collect_pages<T, F, Fut>(
    limit: usize,
    report_offset: u64,
    progress: &mut Progress,
    fetch: F,
) -> Result<Vec<T>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    collect_pages_with(limit, report_offset, progress, |items| items.len(), fetch).await
}

/// [`collect_pages`] with a caller-supplied measure over the accumulator.
///
/// The comment task counts nested replies toward its unit budget, so its
/// measure is larger than `len()`.
pub async fn collect_pages_with<T, M, F, Fut>(
    limit: usize,
    report_offset: u64,
    progress: &mut Progress,
    measure: M,
    mut fetch: F,
) -> Result<Vec<T>>
where
    M: Fn(&[T]) -> usize,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut accumulated: Vec<T> = Vec::new();
    let mut cursor = String::new();

    loop {
        let page = fetch(cursor).await?;
        let page_len = page.items.len();
        accumulated.extend(page.items);
        cursor = page.cursor;

        let measured = measure(&accumulated);
        progress.set_completed(report_offset + measured as u64);

        if measured >= limit {
            // Truncation happens downstream; the loop only stops iterating.
            break;
        }
        if !page.has_more {
            break;
        }
        if page_len == 0 {
            tracing::warn!("empty page with has_more set, treating as exhausted");
            break;
        }
    }

    Ok(accumulated)
}
