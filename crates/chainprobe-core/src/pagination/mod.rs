//! Cursor-following collection of paginated list endpoints.
//!
//! The gateway returns list resources one [`Page`] at a time; each page may
//! carry a `paging.next_position` token that names where the next page starts.
//! [`PagedCollectionFetcher`] walks those tokens until they run out and hands
//! back the concatenated records in server order.
//!
//! ## Guarantees
//!
//! - Pages are requested strictly one after another: the token for page N+1 is
//!   only known once page N has arrived.
//! - A failed page fails the whole collection. Callers never see a truncated
//!   result.
//! - A token that repeats is reported as [`PaginationError::PaginationCycle`],
//!   and a listing longer than `max_pages` as
//!   [`PaginationError::PageLimitExceeded`], so a misbehaving server cannot
//!   keep the loop alive forever.

use crate::{rest::RestError, types::NodeAddress, types::Page};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, future::Future};
use thiserror::Error;
use tracing::{debug, warn};

/// Pagination settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size requested through the `limit` parameter. `None` leaves it to the gateway.
    #[serde(default)]
    pub page_size: Option<u32>,

    /// Upper bound on pages fetched for one listing (default: 10000).
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

fn default_max_pages() -> usize {
    10_000
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { page_size: None, max_pages: default_max_pages() }
    }
}

/// Errors that end a paginated fetch.
#[derive(Error, Debug)]
pub enum PaginationError {
    /// A page could not be fetched or decoded. Carries the node and the cause.
    #[error("Fetch of page {page} from {node} failed: {source}")]
    FetchFailed {
        node: NodeAddress,
        /// One-based number of the page that failed.
        page: usize,
        #[source]
        source: RestError,
    },

    /// The server handed out a continuation token it had already handed out.
    #[error("Pagination cycle at {node}: token '{token}' was already visited")]
    PaginationCycle { node: NodeAddress, token: String },

    #[error("Pagination at {node} exceeded {limit} pages")]
    PageLimitExceeded { node: NodeAddress, limit: usize },
}

impl PaginationError {
    /// Underlying gateway error, for `FetchFailed`.
    #[must_use]
    pub fn rest_error(&self) -> Option<&RestError> {
        match self {
            Self::FetchFailed { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Returns `true` if fetching again may succeed. Protocol violations never are.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.rest_error().is_some_and(RestError::is_transient)
    }
}

/// Follows continuation tokens until a page arrives without one.
#[derive(Debug, Clone, Default)]
pub struct PagedCollectionFetcher {
    config: PaginationConfig,
}

impl PagedCollectionFetcher {
    #[must_use]
    pub fn new(config: PaginationConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Collects every record of a listing on `node`.
    ///
    /// `fetch_page` is called first with `None`, then with each `next_position`
    /// in turn. `node` is only used to label errors and log events.
    ///
    /// # Errors
    ///
    /// - [`PaginationError::FetchFailed`] if any page fetch fails; records
    ///   gathered so far are dropped
    /// - [`PaginationError::PaginationCycle`] if a continuation token repeats
    /// - [`PaginationError::PageLimitExceeded`] if the listing runs past `max_pages`
    pub async fn fetch_all<T, F, Fut>(
        &self,
        node: &NodeAddress,
        mut fetch_page: F,
    ) -> Result<Vec<T>, PaginationError>
    where
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = Result<Page<T>, RestError>>,
    {
        let mut collected = Vec::new();
        let mut seen_tokens: HashSet<String> = HashSet::new();
        let mut token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page_number = pages + 1;
            let page = fetch_page(token.clone()).await.map_err(|source| {
                debug!(node = %node, page = page_number, error = %source, "page fetch failed");
                PaginationError::FetchFailed { node: node.clone(), page: page_number, source }
            })?;
            pages = page_number;

            let next = page.next_position().map(str::to_owned);
            debug!(
                node = %node,
                page = pages,
                records = page.data.len(),
                has_next = next.is_some(),
                "page fetched"
            );
            collected.extend(page.data);

            let Some(next) = next else {
                return Ok(collected);
            };

            if !seen_tokens.insert(next.clone()) {
                warn!(node = %node, token = %next, page = pages, "pagination token repeated");
                return Err(PaginationError::PaginationCycle { node: node.clone(), token: next });
            }

            if pages >= self.config.max_pages {
                warn!(node = %node, limit = self.config.max_pages, "pagination page limit reached");
                return Err(PaginationError::PageLimitExceeded {
                    node: node.clone(),
                    limit: self.config.max_pages,
                });
            }

            token = Some(next);
        }
    }
}
