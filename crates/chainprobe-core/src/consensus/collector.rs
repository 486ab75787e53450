//! Concurrent chain retrieval from a set of nodes.

use super::types::{ChainStatus, NodeChain};
use crate::{
    pagination::PaginationError,
    rest::RestClient,
    types::{Chain, NodeAddress},
};
use async_trait::async_trait;
use futures_util::future::join_all;
use std::{sync::Arc, time::Duration};
use tokio::time::Instant;
use tracing::{debug, warn};

/// Anything that can produce a node's chain, genesis first.
#[async_trait]
pub trait ChainSource: Send + Sync {
    async fn fetch_chain(&self, node: &NodeAddress) -> Result<Chain, PaginationError>;
}

#[async_trait]
impl ChainSource for RestClient {
    async fn fetch_chain(&self, node: &NodeAddress) -> Result<Chain, PaginationError> {
        RestClient::fetch_chain(self, node).await
    }
}

/// Fetches every node's chain concurrently under one shared deadline.
///
/// Each node gets its own result slot; a failed or late node never cancels
/// its siblings. [`collect`](Self::collect) returns only once every slot has settled.
pub struct ChainCollector<S: ?Sized> {
    source: Arc<S>,
    fetch_timeout: Duration,
}

impl<S: ChainSource + ?Sized> ChainCollector<S> {
    pub fn new(source: Arc<S>, fetch_timeout: Duration) -> Self {
        Self { source, fetch_timeout }
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    /// Returns one [`NodeChain`] per node, in the order of `nodes`.
    pub async fn collect(&self, nodes: &[NodeAddress]) -> Vec<NodeChain> {
        let deadline = Instant::now() + self.fetch_timeout;

        let futures = nodes.iter().map(|node| {
            let source = Arc::clone(&self.source);
            async move {
                let status =
                    match tokio::time::timeout_at(deadline, source.fetch_chain(node)).await {
                        Ok(Ok(chain)) => {
                            debug!(node = %node, blocks = chain.len(), "chain collected");
                            ChainStatus::Fetched(chain)
                        }
                        Ok(Err(e)) => {
                            warn!(
                                node = %node,
                                error = %e,
                                transient = e.is_transient(),
                                "chain fetch failed"
                            );
                            ChainStatus::Unreachable { reason: e.to_string() }
                        }
                        Err(_) => {
                            warn!(node = %node, timeout = ?self.fetch_timeout, "chain fetch timed out");
                            ChainStatus::TimedOut
                        }
                    };
                NodeChain { node: node.clone(), status }
            }
        });

        join_all(futures).await
    }
}
