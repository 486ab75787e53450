//! # Chainprobe Core
//!
//! Client-side verification of a ledger network through its nodes' REST gateways.
//!
//! - **[`rest`]**: HTTP client for the gateway, with typed resources, list queries
//!   and peer discovery.
//!
//! - **[`pagination`]**: Cursor-following collection of paginated listings, with
//!   cycle and page-limit guards.
//!
//! - **[`consensus`]**: Concurrent chain collection and a three-valued verdict on
//!   whether nodes agree on the block a fixed distance behind their tips.
//!
//! - **[`config`]**: Layered configuration (defaults, TOML file, environment).
//!
//! - **[`logging`]**: `tracing` subscriber setup.
//!
//! ## Flow
//!
//! ```text
//! ProbeConfig ──► NodesConfig::resolve ──► [node addresses]
//!                                               │
//!                                               ▼
//!                                ChainCollector (join_all, shared deadline)
//!                                   │ RestClient::fetch_chain per node
//!                                   │   └─ PagedCollectionFetcher over /blocks
//!                                   ▼
//!                             [NodeChain slots]
//!                                   │
//!                                   ▼
//!                         ChainConsensusChecker ──► Agree | Disagree | Indeterminate
//! ```

pub mod config;
pub mod consensus;
pub mod logging;
pub mod pagination;
pub mod rest;
pub mod types;

pub use config::ProbeConfig;
pub use consensus::{ChainConsensusChecker, ConsensusMonitor, ConsensusVerdict};
pub use pagination::{PagedCollectionFetcher, PaginationError};
pub use rest::{RestClient, RestError};
pub use types::{Block, Chain, NodeAddress, Page};
