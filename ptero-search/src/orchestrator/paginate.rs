//! Lazy, single-pass walk over a paginated panel collection.
//!
//! [`Paginator`] requests pages `1..=max_pages` in order and yields one
//! record at a time together with the page it came from. A page is only
//! fetched once every record of the previous page has been consumed, so a
//! caller that stops early never pays for pages it does not read.
//!
//! The walk ends when:
//! - the page budget is used up
//! - the panel declares `total_pages` and the current page has reached it
//! - a page returns zero items (regardless of declared totals)
//! - a fetch fails; the error is returned once and the paginator is done

use std::collections::VecDeque;

use crate::config::clamp_per_page;
use crate::engine::{page_query, PanelApi, Query};
use crate::envelope::{declared_total_pages, extract_items};
use crate::error::SearchError;
use crate::types::Record;

/// Cursor over one collection. Not restartable.
pub struct Paginator<'a, A: PanelApi> {
    api: &'a A,
    path: String,
    extra_query: Query,
    per_page: u32,
    max_pages: u32,
    page: u32,
    buffer: VecDeque<Record>,
    finished: bool,
}

impl<'a, A: PanelApi> Paginator<'a, A> {
    /// Create a paginator over `path`. `per_page` is clamped to `1..=100`
    /// and `max_pages` raised to at least 1. Nothing is fetched yet.
    pub fn new(api: &'a A, path: impl Into<String>, per_page: u32, max_pages: u32) -> Self {
        Self {
            api,
            path: path.into(),
            extra_query: Query::new(),
            per_page: clamp_per_page(per_page),
            max_pages: max_pages.max(1),
            page: 0,
            buffer: VecDeque::new(),
            finished: false,
        }
    }

    /// Send additional query pairs (e.g. filters) with every page request.
    pub fn with_query(mut self, extra: Query) -> Self {
        self.extra_query = extra;
        self
    }

    /// Page size sent to the panel.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of pages requested so far.
    pub fn pages_requested(&self) -> u32 {
        self.page
    }

    /// Yield the next `(page number, record)` pair.
    ///
    /// Returns `Ok(None)` once the collection or the page budget is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// Propagates the transport error of a failed page fetch. After an
    /// error the paginator yields nothing more.
    pub async fn next_record(&mut self) -> Result<Option<(u32, Record)>, SearchError> {
        loop {
            if let Some(record) = self.buffer.pop_front() {
                return Ok(Some((self.page, record)));
            }
            if self.finished || self.page >= self.max_pages {
                return Ok(None);
            }

            self.page += 1;
            let mut query = page_query(self.page, self.per_page);
            query.extend(self.extra_query.iter().cloned());

            let payload = match self.api.get(&self.path, &query).await {
                Ok(payload) => payload,
                Err(e) => {
                    self.finished = true;
                    return Err(e);
                }
            };

            let items = extract_items(&payload);
            let total_pages = declared_total_pages(&payload);
            tracing::debug!(
                path = %self.path,
                page = self.page,
                items = items.len(),
                total_pages = ?total_pages,
                "fetched page"
            );

            let reached_last = total_pages.is_some_and(|total| i64::from(self.page) >= total);
            if reached_last || items.is_empty() {
                self.finished = true;
            }
            self.buffer.extend(items);
        }
    }

    /// Drain the remaining records into a vector.
    ///
    /// # Errors
    ///
    /// Same as [`next_record`](Self::next_record); records read before the failure are
    /// discarded.
    pub async fn collect(mut self) -> Result<Vec<(u32, Record)>, SearchError> {
        let mut out = Vec::new();
        while let Some(entry) = self.next_record().await? {
            out.push(entry);
        }
        Ok(out)
    }
}
