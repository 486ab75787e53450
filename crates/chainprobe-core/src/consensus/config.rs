//! Consensus check and polling settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusConfig {
    /// Distance behind the tip of the compared block; 0 is the tip (default: 1).
    #[serde(default = "default_block_offset_from_tip")]
    pub block_offset_from_tip: usize,

    /// Deadline in seconds shared by all chain fetches of one check (default: 30).
    #[serde(default = "default_fetch_timeout_seconds")]
    pub fetch_timeout_seconds: u64,
}

fn default_block_offset_from_tip() -> usize {
    1
}

fn default_fetch_timeout_seconds() -> u64 {
    30
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            block_offset_from_tip: default_block_offset_from_tip(),
            fetch_timeout_seconds: default_fetch_timeout_seconds(),
        }
    }
}

impl ConsensusConfig {
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }
}

/// Retry policy for [`ConsensusMonitor::wait_for_agreement`](super::ConsensusMonitor::wait_for_agreement).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Checks performed before giving up (default: 5).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay after the first indeterminate check, doubled each time (default: 500).
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Cap on the delay between checks (default: 5000).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    5
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    5000
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl MonitorConfig {
    /// Delay before check number `attempt + 1`, where `attempt` starts at 1.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.initial_delay_ms.saturating_mul(factor).min(self.max_delay_ms))
    }
}
