//! Probe configuration with layered loading.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//!
//! 1. **Compiled defaults**: `Default` implementations and serde defaults
//! 2. **Config file**: TOML file named by the `CHAINPROBE_CONFIG` env var
//! 3. **Environment variables**: `CHAINPROBE__*` env vars override single fields
//!
//! # Configuration Sections
//!
//! - [`NodesConfig`]: which gateways to probe
//! - [`RestClientConfig`]: HTTP timeouts, pooling and listing order
//! - [`PaginationConfig`]: page size and page limit
//! - [`ConsensusConfig`]: compared offset and fetch deadline
//! - [`MonitorConfig`]: polling attempts and backoff
//! - [`LoggingConfig`]: log level and format
//!
//! # Example
//!
//! ```toml
//! [nodes]
//! seed_url = "http://10.0.0.4:8008"
//! static_urls = ["http://10.0.0.9:8008"]
//! discover_peers = true
//!
//! [pagination]
//! page_size = 100
//!
//! [consensus]
//! block_offset_from_tip = 1
//! ```

use crate::{
    consensus::{ConsensusConfig, MonitorConfig},
    pagination::PaginationConfig,
    rest::{discover_nodes, RestClient, RestClientConfig, RestError},
    types::NodeAddress,
};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Gateways to probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodesConfig {
    /// Gateway used for discovery, and always probed itself (default: `http://127.0.0.1:8008`).
    #[serde(default = "default_seed_url")]
    pub seed_url: String,

    /// Gateways probed in addition to the seed and its peers.
    #[serde(default)]
    pub static_urls: Vec<String>,

    /// Whether to add the seed's `/peers` to the node list (default: true).
    #[serde(default = "default_discover_peers")]
    pub discover_peers: bool,

    /// REST gateway port on discovered peer hosts (default: 8008).
    #[serde(default = "default_rest_api_port")]
    pub rest_api_port: u16,
}

fn default_seed_url() -> String {
    "http://127.0.0.1:8008".to_string()
}

fn default_discover_peers() -> bool {
    true
}

fn default_rest_api_port() -> u16 {
    8008
}

impl Default for NodesConfig {
    fn default() -> Self {
        Self {
            seed_url: default_seed_url(),
            static_urls: Vec::new(),
            discover_peers: default_discover_peers(),
            rest_api_port: default_rest_api_port(),
        }
    }
}

impl NodesConfig {
    /// Parsed seed address.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidAddress`] if `seed_url` is not a gateway URL.
    pub fn seed(&self) -> Result<NodeAddress, RestError> {
        NodeAddress::parse(&self.seed_url)
    }

    /// Full node list: the seed's peers and the seed (or just the seed), then the static URLs.
    ///
    /// # Errors
    ///
    /// Returns an error if an address does not parse or peer discovery fails.
    pub async fn resolve(&self, client: &RestClient) -> Result<Vec<NodeAddress>, RestError> {
        let seed = self.seed()?;
        let mut nodes = if self.discover_peers {
            discover_nodes(client, &seed, self.rest_api_port).await?
        } else {
            vec![seed]
        };

        for raw in &self.static_urls {
            nodes.push(NodeAddress::parse(raw)?);
        }

        Ok(crate::rest::discovery::dedup_preserving_order(nodes))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "trace", "debug", "info", "warn", "error"). Defaults to `"info"`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: `"json"` or `"pretty"`. Defaults to `"pretty"`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), format: default_log_format() }
    }
}

/// Complete probe configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default)]
    pub nodes: NodesConfig,

    #[serde(default)]
    pub rest: RestClientConfig,

    #[serde(default)]
    pub pagination: PaginationConfig,

    #[serde(default)]
    pub consensus: ConsensusConfig,

    #[serde(default)]
    pub monitor: MonitorConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ProbeConfig {
    /// Loads configuration from a TOML file with environment variable overrides.
    ///
    /// A missing file is not an error. Environment variables with the
    /// `CHAINPROBE__` prefix override single values, with `__` separating
    /// nested fields (e.g., `CHAINPROBE__NODES__SEED_URL=http://10.0.0.4:8008`).
    /// `CHAINPROBE__NODES__STATIC_URLS` takes a comma-separated list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be parsed or a value has the wrong type.
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_builder = Config::builder()
            .set_default("nodes.seed_url", default_seed_url())?
            .set_default("nodes.discover_peers", default_discover_peers())?
            .set_default("nodes.rest_api_port", i64::from(default_rest_api_port()))?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?
            .add_source(File::with_name(&config_path.as_ref().to_string_lossy()).required(false))
            .add_source(
                Environment::with_prefix("CHAINPROBE")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("nodes.static_urls"),
            )
            .build()?;

        config_builder.try_deserialize()
    }

    /// Loads configuration from `config/chainprobe.toml`, or the file named by `CHAINPROBE_CONFIG`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration cannot be loaded or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var("CHAINPROBE_CONFIG")
            .unwrap_or_else(|_| "config/chainprobe.toml".to_string());
        Self::from_file(&config_path)
    }

    /// Builds a REST client from the `rest` and `pagination` sections.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn rest_client(&self) -> Result<RestClient, RestError> {
        RestClient::with_config(self.rest.clone(), self.pagination.clone())
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid setting found.
    pub fn validate(&self) -> Result<(), String> {
        self.nodes.seed().map_err(|e| format!("nodes.seed_url: {e}"))?;
        for raw in &self.nodes.static_urls {
            NodeAddress::parse(raw).map_err(|e| format!("nodes.static_urls: {e}"))?;
        }
        if self.nodes.discover_peers && self.nodes.rest_api_port == 0 {
            return Err("nodes.rest_api_port must be greater than 0".to_string());
        }

        if self.rest.request_timeout_seconds == 0 {
            return Err("rest.request_timeout_seconds must be greater than 0".to_string());
        }
        if self.rest.connect_timeout_seconds == 0 {
            return Err("rest.connect_timeout_seconds must be greater than 0".to_string());
        }

        if self.pagination.page_size == Some(0) {
            return Err("pagination.page_size must be greater than 0".to_string());
        }
        if self.pagination.max_pages == 0 {
            return Err("pagination.max_pages must be greater than 0".to_string());
        }

        if self.consensus.fetch_timeout_seconds == 0 {
            return Err("consensus.fetch_timeout_seconds must be greater than 0".to_string());
        }

        if self.monitor.max_attempts == 0 {
            return Err("monitor.max_attempts must be greater than 0".to_string());
        }
        if self.monitor.max_delay_ms < self.monitor.initial_delay_ms {
            return Err("monitor.max_delay_ms must not be below monitor.initial_delay_ms".to_string());
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                self.logging.format
            ));
        }

        Ok(())
    }
}
