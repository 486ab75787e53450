//! E2E Test Configuration
//!
//! Live-network settings, read from environment variables.

use chainprobe_core::{
    config::{NodesConfig, ProbeConfig},
    consensus::{ConsensusConfig, MonitorConfig},
    pagination::PaginationConfig,
};

/// Configuration for E2E tests
#[derive(Debug, Clone)]
pub struct E2eConfig {
    /// REST gateway of the node the suite talks to
    pub gateway_url: String,
    /// Whether to probe the gateway's peers as well
    pub discover_peers: bool,
    /// REST gateway port on peer hosts
    pub rest_api_port: u16,
    /// Page size requested from list endpoints
    pub page_size: u32,
    /// Blocks behind the tip compared across nodes
    pub block_offset_from_tip: usize,
    /// Timeout in seconds for readiness and chain fetches
    pub timeout_seconds: u64,
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

impl Default for E2eConfig {
    fn default() -> Self {
        Self {
            gateway_url: std::env::var("CHAINPROBE_E2E_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8008".to_string()),
            discover_peers: env_or("CHAINPROBE_E2E_DISCOVER", true),
            rest_api_port: env_or("CHAINPROBE_E2E_REST_PORT", 8008),
            page_size: env_or("CHAINPROBE_E2E_PAGE_SIZE", 100),
            block_offset_from_tip: env_or("CHAINPROBE_E2E_BLOCK_OFFSET", 1),
            timeout_seconds: 30,
        }
    }
}

impl E2eConfig {
    /// Create config from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::default()
    }

    /// The equivalent probe configuration.
    #[must_use]
    pub fn probe_config(&self) -> ProbeConfig {
        ProbeConfig {
            nodes: NodesConfig {
                seed_url: self.gateway_url.clone(),
                static_urls: Vec::new(),
                discover_peers: self.discover_peers,
                rest_api_port: self.rest_api_port,
            },
            pagination: PaginationConfig { page_size: Some(self.page_size), ..Default::default() },
            consensus: ConsensusConfig {
                block_offset_from_tip: self.block_offset_from_tip,
                fetch_timeout_seconds: self.timeout_seconds,
            },
            monitor: MonitorConfig { max_attempts: 10, initial_delay_ms: 1000, max_delay_ms: 5000 },
            ..ProbeConfig::default()
        }
    }
}
