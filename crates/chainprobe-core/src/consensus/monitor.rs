//! Repeated consensus checks with exponential backoff.

use super::{
    checker::{ensure_distinct, ChainConsensusChecker},
    collector::{ChainCollector, ChainSource},
    config::{ConsensusConfig, MonitorConfig},
    types::{ConsensusError, ConsensusVerdict},
};
use crate::types::NodeAddress;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Collects chains and checks them, optionally until the verdict settles.
///
/// Only [`ConsensusVerdict::Indeterminate`] is retried: a node may still be
/// syncing or restarting. `Agree` and `Disagree` are final answers.
pub struct ConsensusMonitor<S: ?Sized> {
    collector: ChainCollector<S>,
    config: MonitorConfig,
}

impl<S: ChainSource + ?Sized> ConsensusMonitor<S> {
    pub fn new(collector: ChainCollector<S>, config: MonitorConfig) -> Self {
        Self { collector, config }
    }

    /// Builds a monitor over `source` using the fetch deadline from `consensus`.
    pub fn from_config(source: Arc<S>, consensus: &ConsensusConfig, monitor: MonitorConfig) -> Self {
        Self::new(ChainCollector::new(source, consensus.fetch_timeout()), monitor)
    }

    #[must_use]
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Fetches every node's chain once and compares them at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`ConsensusError::InvalidArgument`] for an empty or duplicated node list.
    pub async fn check_once(
        &self,
        nodes: &[NodeAddress],
        offset: usize,
    ) -> Result<ConsensusVerdict, ConsensusError> {
        if nodes.is_empty() {
            return Err(ConsensusError::InvalidArgument("no nodes to check".to_string()));
        }
        ensure_distinct(nodes)?;

        let chains = self.collector.collect(nodes).await;
        ChainConsensusChecker::new(offset).check(&chains)
    }

    /// Checks until the verdict is `Agree` or `Disagree`, or attempts run out.
    ///
    /// When every attempt is indeterminate the last verdict is returned as is.
    ///
    /// # Errors
    ///
    /// Returns [`ConsensusError::InvalidArgument`] for an empty or duplicated node list.
    pub async fn wait_for_agreement(
        &self,
        nodes: &[NodeAddress],
        offset: usize,
    ) -> Result<ConsensusVerdict, ConsensusError> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let verdict = self.check_once(nodes, offset).await?;

            if !verdict.is_indeterminate() {
                info!(attempt, verdict = verdict.as_str(), "consensus settled");
                return Ok(verdict);
            }
            if attempt >= max_attempts {
                warn!(attempts = attempt, "consensus still indeterminate, giving up");
                return Ok(verdict);
            }

            let delay = self.config.delay_after(attempt);
            debug!(attempt, delay = ?delay, "consensus indeterminate, retrying");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
