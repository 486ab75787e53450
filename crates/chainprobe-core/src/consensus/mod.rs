//! # Chain Consensus Checks
//!
//! Decides whether a set of nodes agree on the block a fixed distance behind
//! each node's tip.
//!
//! ## Steps
//!
//! 1. **Collection**: fetch every node's chain concurrently under one deadline
//!    ([`ChainCollector`]); each node fills its own [`NodeChain`] slot
//! 2. **Comparison**: once all slots settle, resolve each chain's block at
//!    `len - 1 - offset` and compare identifiers exactly ([`ChainConsensusChecker`])
//! 3. **Polling** (optional): repeat while the result is indeterminate
//!    ([`ConsensusMonitor`])
//!
//! ## Verdicts
//!
//! - `Agree`: every node resolved and all identifiers match
//! - `Disagree`: every node resolved and at least one identifier differs
//! - `Indeterminate`: some node was unreachable, timed out or too short
//!
//! A missing node is never skipped; it always makes the verdict indeterminate.

pub mod checker;
pub mod collector;
pub mod config;
pub mod monitor;
pub mod types;

#[cfg(test)]
mod tests;

pub use checker::ChainConsensusChecker;
pub use collector::{ChainCollector, ChainSource};
pub use config::{ConsensusConfig, MonitorConfig};
pub use monitor::ConsensusMonitor;
pub use types::{
    Agreement, ChainStatus, ComparedBlock, ConsensusError, ConsensusVerdict, Disagreement,
    Indeterminate, MissingNode, MissingReason, NodeChain,
};
