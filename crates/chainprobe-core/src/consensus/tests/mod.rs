//! Tests for the consensus module.
//!
//! - `checker_tests`: verdicts of `ChainConsensusChecker` over fixed chains
//! - `monitor_tests`: collection and polling against in-memory chain sources
