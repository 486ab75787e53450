//! Inputs and verdicts of a consensus check.

use crate::types::{Chain, NodeAddress};
use std::fmt;
use thiserror::Error;

/// Raised only for caller mistakes. Data-level outcomes are [`ConsensusVerdict`]s.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsensusError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Outcome of fetching one node's chain.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainStatus {
    Fetched(Chain),
    /// The fetch failed; `reason` is the rendered error.
    Unreachable { reason: String },
    /// The fetch did not settle before the collection deadline.
    TimedOut,
}

/// One node's slot in a consensus check.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeChain {
    pub node: NodeAddress,
    pub status: ChainStatus,
}

impl NodeChain {
    #[must_use]
    pub fn fetched(node: NodeAddress, chain: Chain) -> Self {
        Self { node, status: ChainStatus::Fetched(chain) }
    }

    #[must_use]
    pub fn unreachable(node: NodeAddress, reason: impl Into<String>) -> Self {
        Self { node, status: ChainStatus::Unreachable { reason: reason.into() } }
    }

    #[must_use]
    pub fn timed_out(node: NodeAddress) -> Self {
        Self { node, status: ChainStatus::TimedOut }
    }

    #[must_use]
    pub fn chain(&self) -> Option<&Chain> {
        match &self.status {
            ChainStatus::Fetched(chain) => Some(chain),
            _ => None,
        }
    }
}

/// The block a node holds at the compared position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparedBlock {
    pub node: NodeAddress,
    /// Absolute index in the node's genesis-first chain.
    pub index: usize,
    pub block_id: String,
}

/// Why a node could not take part in the comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingReason {
    Unreachable(String),
    TimedOut,
    /// The chain has no block at the requested offset.
    ChainTooShort { chain_len: usize },
}

impl fmt::Display for MissingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable(reason) => write!(f, "unreachable: {reason}"),
            Self::TimedOut => f.write_str("timed out"),
            Self::ChainTooShort { chain_len } => write!(f, "chain too short ({chain_len} blocks)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingNode {
    pub node: NodeAddress,
    pub reason: MissingReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agreement {
    pub offset: usize,
    pub block_id: String,
    pub compared: Vec<ComparedBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disagreement {
    pub offset: usize,
    /// Block of the first resolved chain, against which the others were compared.
    pub reference: ComparedBlock,
    /// Nodes whose block differs from `reference`.
    pub dissenting: Vec<NodeAddress>,
    pub compared: Vec<ComparedBlock>,
}

/// Comparison that could not be completed.
///
/// `compared` and `dissenting` still describe the nodes that did resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indeterminate {
    pub offset: usize,
    pub missing: Vec<MissingNode>,
    pub compared: Vec<ComparedBlock>,
    pub dissenting: Vec<NodeAddress>,
}

impl Indeterminate {
    /// Nodes whose fetch failed or timed out.
    pub fn unreachable_nodes(&self) -> impl Iterator<Item = &NodeAddress> {
        self.missing
            .iter()
            .filter(|m| matches!(m.reason, MissingReason::Unreachable(_) | MissingReason::TimedOut))
            .map(|m| &m.node)
    }

    /// Nodes reached whose chains were too short, with their lengths.
    pub fn lagging_nodes(&self) -> impl Iterator<Item = (&NodeAddress, usize)> {
        self.missing.iter().filter_map(|m| match m.reason {
            MissingReason::ChainTooShort { chain_len } => Some((&m.node, chain_len)),
            _ => None,
        })
    }
}

/// Three-valued result of a consensus check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsensusVerdict {
    Agree(Agreement),
    Disagree(Disagreement),
    Indeterminate(Indeterminate),
}

impl ConsensusVerdict {
    #[must_use]
    pub fn is_agree(&self) -> bool {
        matches!(self, Self::Agree(_))
    }

    #[must_use]
    pub fn is_disagree(&self) -> bool {
        matches!(self, Self::Disagree(_))
    }

    #[must_use]
    pub fn is_indeterminate(&self) -> bool {
        matches!(self, Self::Indeterminate(_))
    }

    /// Every block that took part in the comparison.
    #[must_use]
    pub fn compared(&self) -> &[ComparedBlock] {
        match self {
            Self::Agree(a) => &a.compared,
            Self::Disagree(d) => &d.compared,
            Self::Indeterminate(i) => &i.compared,
        }
    }

    /// Returns a static string representation for log fields.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agree(_) => "agree",
            Self::Disagree(_) => "disagree",
            Self::Indeterminate(_) => "indeterminate",
        }
    }
}

impl fmt::Display for ConsensusVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agree(a) => write!(
                f,
                "{} nodes agree on block {} at offset {}",
                a.compared.len(),
                a.block_id,
                a.offset
            ),
            Self::Disagree(d) => write!(
                f,
                "{} of {} nodes disagree with {} at offset {}",
                d.dissenting.len(),
                d.compared.len(),
                d.reference.node,
                d.offset
            ),
            Self::Indeterminate(i) => {
                write!(f, "indeterminate at offset {}:", i.offset)?;
                for missing in &i.missing {
                    write!(f, " {} ({})", missing.node, missing.reason)?;
                }
                Ok(())
            }
        }
    }
}
