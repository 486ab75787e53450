//! Resource model shared by the REST client, pagination and consensus layers.
//!
//! The gateway speaks JSON. List endpoints return a [`Page`], single-resource
//! endpoints return a [`ResourceEnvelope`], and failures carry an
//! [`ApiErrorBody`]. Only the handful of fields the probe actually inspects are
//! typed; everything else passes through as [`serde_json::Value`].

use crate::rest::RestError;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr, sync::Arc};
use url::Url;

/// Base URL of a node's REST gateway, e.g. `http://10.0.0.4:8008`.
///
/// Stored without a trailing slash so that [`NodeAddress::endpoint`] can append
/// resource paths directly. Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeAddress(Arc<str>);

impl NodeAddress {
    /// Parses and normalises a gateway base URL.
    ///
    /// The stored form is the serialized [`Url`]: lowercase host, default port
    /// dropped, no trailing slash. Two spellings of the same node compare equal.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidAddress`] if the string is not an absolute
    /// `http`/`https` URL with a host, or if it carries a query or fragment.
    pub fn parse(raw: &str) -> Result<Self, RestError> {
        let trimmed = raw.trim();
        let url = Url::parse(trimmed)
            .map_err(|e| RestError::InvalidAddress(format!("{trimmed}: {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(RestError::InvalidAddress(format!(
                "{trimmed}: unsupported scheme '{}'",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(RestError::InvalidAddress(format!("{trimmed}: missing host")));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(RestError::InvalidAddress(format!(
                "{trimmed}: base URL must not carry a query or fragment"
            )));
        }

        Ok(Self(Arc::from(url.as_str().trim_end_matches('/'))))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the absolute URL of `path` on this node.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidRequest`] if the joined URL does not parse.
    pub fn endpoint(&self, path: &str) -> Result<Url, RestError> {
        let joined = format!("{}/{}", self.0, path.trim_start_matches('/'));
        Url::parse(&joined).map_err(|e| RestError::InvalidRequest(format!("{joined}: {e}")))
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NodeAddress {
    type Err = RestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NodeAddress {
    type Error = RestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NodeAddress> for String {
    fn from(value: NodeAddress) -> Self {
        value.0.to_string()
    }
}

/// Order in which a gateway lists blocks.
///
/// The ledger gateway returns `/blocks` head-first unless `reverse` is passed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Paging metadata attached to every list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub limit: Option<u64>,
    /// Opaque continuation token for the next page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_position: Option<String>,
    /// Fully-formed URL of the next page, when the gateway provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T = serde_json::Value> {
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
}

impl<T> Page<T> {
    /// A final page holding `data` and no continuation token.
    #[must_use]
    pub fn last(data: Vec<T>) -> Self {
        Self { data, head: None, link: None, paging: None }
    }

    /// A page holding `data` followed by the page at `next_position`.
    #[must_use]
    pub fn with_next(data: Vec<T>, next_position: impl Into<String>) -> Self {
        Self {
            data,
            head: None,
            link: None,
            paging: Some(Paging {
                next_position: Some(next_position.into()),
                ..Paging::default()
            }),
        }
    }

    /// Continuation token, if another page follows. An empty token counts as absent.
    #[must_use]
    pub fn next_position(&self) -> Option<&str> {
        self.paging
            .as_ref()
            .and_then(|p| p.next_position.as_deref())
            .filter(|token| !token.is_empty())
    }
}

/// Single-resource response (`/blocks/{id}`, `/state/{address}`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEnvelope<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Error payload returned by the gateway on non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub block_num: Option<u64>,
    #[serde(default)]
    pub previous_block_id: Option<String>,
    #[serde(default)]
    pub state_root_hash: Option<String>,
    #[serde(default)]
    pub signer_public_key: Option<String>,
    #[serde(default)]
    pub batch_ids: Vec<String>,
}

/// A committed block. Consensus only looks at `header_signature`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub header_signature: String,
    #[serde(default)]
    pub header: Option<BlockHeader>,
    #[serde(default)]
    pub batches: Vec<serde_json::Value>,
}

impl Block {
    /// A block carrying only an identifier.
    #[must_use]
    pub fn with_id(header_signature: impl Into<String>) -> Self {
        Self { header_signature: header_signature.into(), header: None, batches: Vec::new() }
    }

    #[must_use]
    pub fn block_num(&self) -> Option<u64> {
        self.header.as_ref().and_then(|h| h.block_num)
    }
}

/// Blocks committed on one node, ordered genesis (index 0) to tip (last index).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    #[must_use]
    pub fn from_genesis_first(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    #[must_use]
    pub fn from_tip_first(mut blocks: Vec<Block>) -> Self {
        blocks.reverse();
        Self { blocks }
    }

    /// Builds a chain from a gateway listing in the given order.
    #[must_use]
    pub fn from_listing(blocks: Vec<Block>, order: ListingOrder) -> Self {
        match order {
            ListingOrder::NewestFirst => Self::from_tip_first(blocks),
            ListingOrder::OldestFirst => Self::from_genesis_first(blocks),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    #[must_use]
    pub fn tip(&self) -> Option<&Block> {
        self.blocks.last()
    }

    #[must_use]
    pub fn genesis(&self) -> Option<&Block> {
        self.blocks.first()
    }

    /// Absolute index of the block `offset` positions behind the tip
    /// (`len - 1 - offset`), or `None` if the chain is too short.
    #[must_use]
    pub fn index_from_tip(&self, offset: usize) -> Option<usize> {
        self.blocks.len().checked_sub(1)?.checked_sub(offset)
    }

    #[must_use]
    pub fn block_at_offset_from_tip(&self, offset: usize) -> Option<&Block> {
        self.index_from_tip(offset).and_then(|index| self.blocks.get(index))
    }

    pub fn block_ids(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|b| b.header_signature.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchState {
    Committed,
    Pending,
    Invalid,
    #[serde(other)]
    Unknown,
}

/// Entry of `/batch_statuses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStatus {
    pub id: String,
    pub status: BatchState,
    #[serde(default)]
    pub invalid_transactions: Vec<serde_json::Value>,
}

/// Accepts an integer either as a JSON number or as a decimal string.
///
/// Header fields decoded from protobuf on the gateway side arrive as strings.
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
