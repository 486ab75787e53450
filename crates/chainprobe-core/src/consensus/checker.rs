//! Tip-relative block comparison across node chains.

use super::types::{
    Agreement, ChainStatus, ComparedBlock, ConsensusError, ConsensusVerdict, Disagreement,
    Indeterminate, MissingNode, MissingReason, NodeChain,
};
use crate::types::NodeAddress;
use std::collections::HashSet;
use tracing::{error, info, warn};

/// Rejects a node list that names the same node twice.
pub(crate) fn ensure_distinct<'a>(
    nodes: impl IntoIterator<Item = &'a NodeAddress>,
) -> Result<(), ConsensusError> {
    let mut seen = HashSet::new();
    match nodes.into_iter().find(|node| !seen.insert(*node)) {
        Some(duplicate) => Err(ConsensusError::InvalidArgument(format!(
            "node {duplicate} appears more than once"
        ))),
        None => Ok(()),
    }
}

/// Compares the block `block_offset_from_tip` positions behind each chain's tip.
///
/// Offset 0 is the tip itself. Chains are compared at their own tip-relative
/// index, so nodes at different heights can still agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainConsensusChecker {
    block_offset_from_tip: usize,
}

impl ChainConsensusChecker {
    #[must_use]
    pub fn new(block_offset_from_tip: usize) -> Self {
        Self { block_offset_from_tip }
    }

    #[must_use]
    pub fn block_offset_from_tip(&self) -> usize {
        self.block_offset_from_tip
    }

    /// Produces a verdict over already-fetched chains.
    ///
    /// The reference block comes from the first chain that resolves at the
    /// offset; every other resolved block must carry the identical identifier.
    /// Any unreachable, timed-out or too-short node makes the verdict
    /// [`ConsensusVerdict::Indeterminate`], even when the rest agree.
    ///
    /// # Errors
    ///
    /// Returns [`ConsensusError::InvalidArgument`] if `chains` is empty or
    /// names the same node twice.
    pub fn check(&self, chains: &[NodeChain]) -> Result<ConsensusVerdict, ConsensusError> {
        if chains.is_empty() {
            return Err(ConsensusError::InvalidArgument("no chains to compare".to_string()));
        }

        ensure_distinct(chains.iter().map(|c| &c.node))?;

        let offset = self.block_offset_from_tip;
        let mut compared = Vec::with_capacity(chains.len());
        let mut missing = Vec::new();

        for slot in chains {
            let reason = match &slot.status {
                ChainStatus::Fetched(chain) => {
                    let target = chain
                        .index_from_tip(offset)
                        .and_then(|index| chain.blocks().get(index).map(|block| (index, block)));
                    match target {
                        Some((index, block)) => {
                            compared.push(ComparedBlock {
                                node: slot.node.clone(),
                                index,
                                block_id: block.header_signature.clone(),
                            });
                            continue;
                        }
                        None => MissingReason::ChainTooShort { chain_len: chain.len() },
                    }
                }
                ChainStatus::Unreachable { reason } => MissingReason::Unreachable(reason.clone()),
                ChainStatus::TimedOut => MissingReason::TimedOut,
            };
            missing.push(MissingNode { node: slot.node.clone(), reason });
        }

        let reference = compared.first().cloned();
        let dissenting: Vec<_> = match &reference {
            Some(reference) => compared
                .iter()
                .filter(|c| c.block_id != reference.block_id)
                .map(|c| c.node.clone())
                .collect(),
            None => Vec::new(),
        };

        let reference = match reference {
            Some(reference) if missing.is_empty() => reference,
            _ => {
                for m in &missing {
                    warn!(node = %m.node, offset, reason = %m.reason, "node excluded from consensus check");
                }
                warn!(
                    offset,
                    missing = missing.len(),
                    compared = compared.len(),
                    dissenting = dissenting.len(),
                    "consensus indeterminate"
                );
                return Ok(ConsensusVerdict::Indeterminate(Indeterminate {
                    offset,
                    missing,
                    compared,
                    dissenting,
                }));
            }
        };

        if dissenting.is_empty() {
            info!(offset, block_id = %reference.block_id, nodes = compared.len(), "nodes agree");
            return Ok(ConsensusVerdict::Agree(Agreement {
                offset,
                block_id: reference.block_id,
                compared,
            }));
        }

        error!(
            offset,
            reference_node = %reference.node,
            dissenting = dissenting.len(),
            "nodes disagree"
        );
        for c in &compared {
            error!(node = %c.node, index = c.index, block_id = %c.block_id, "compared block");
        }

        Ok(ConsensusVerdict::Disagree(Disagreement { offset, reference, dissenting, compared }))
    }
}
