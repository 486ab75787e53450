//! Gateway resources and list query parameters.

use std::fmt;
use url::Url;

/// Collections exposed by the REST gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Blocks,
    Batches,
    Transactions,
    State,
    Receipts,
    Peers,
    BatchStatuses,
}

impl Resource {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Blocks => "/blocks",
            Self::Batches => "/batches",
            Self::Transactions => "/transactions",
            Self::State => "/state",
            Self::Receipts => "/receipts",
            Self::Peers => "/peers",
            Self::BatchStatuses => "/batch_statuses",
        }
    }

    /// Returns `true` if the gateway paginates this collection.
    #[must_use]
    pub fn is_paginated(self) -> bool {
        matches!(self, Self::Blocks | Self::Batches | Self::Transactions | Self::State)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path().trim_start_matches('/'))
    }
}

/// `wait` parameter of `/batch_statuses`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    /// Bare `wait`: the gateway's own default timeout.
    Default,
    Seconds(u64),
}

/// Filters for a list request. Empty by default, which lists everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub head: Option<String>,
    pub ids: Vec<String>,
    pub address: Option<String>,
    pub limit: Option<u32>,
    pub reverse: bool,
    pub wait: Option<Wait>,
}

impl ListQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn head(mut self, head: impl Into<String>) -> Self {
        self.head = Some(head.into());
        self
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.ids.push(id.into());
        self
    }

    #[must_use]
    pub fn ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    #[must_use]
    pub fn wait(mut self, wait: Wait) -> Self {
        self.wait = Some(wait);
        self
    }

    /// Writes the query string onto `url`, adding `start` when continuing a listing.
    ///
    /// Leaves `url` untouched when there is nothing to add, so no dangling `?` appears.
    pub fn apply(&self, url: &mut Url, start: Option<&str>) {
        let mut pairs: Vec<(&str, Option<String>)> = Vec::new();

        if let Some(head) = &self.head {
            pairs.push(("head", Some(head.clone())));
        }
        if !self.ids.is_empty() {
            pairs.push(("id", Some(self.ids.join(","))));
        }
        if let Some(address) = &self.address {
            pairs.push(("address", Some(address.clone())));
        }
        if let Some(start) = start {
            pairs.push(("start", Some(start.to_string())));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", Some(limit.to_string())));
        }
        if self.reverse {
            pairs.push(("reverse", None));
        }
        match self.wait {
            Some(Wait::Default) => pairs.push(("wait", None)),
            Some(Wait::Seconds(secs)) => pairs.push(("wait", Some(secs.to_string()))),
            None => {}
        }

        if pairs.is_empty() {
            return;
        }

        let mut serializer = url.query_pairs_mut();
        for (key, value) in pairs {
            match value {
                Some(value) => serializer.append_pair(key, &value),
                None => serializer.append_key_only(key),
            };
        }
    }
}
