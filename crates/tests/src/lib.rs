//! Integration and End-to-End Tests for Chainprobe
//!
//! This crate contains various test modules:
//!
//! - `rest_client_tests`: `RestClient` against a mock gateway (paging, error mapping, resources)
//! - `discovery_tests`: peer discovery and node list resolution
//! - `consensus_tests`: consensus verdicts across several mock gateways
//! - `config_tests`: environment overrides of `ProbeConfig`
//! - `mock_infrastructure`: reusable mock gateway and fixtures
//! - `e2e`: end-to-end tests against a live gateway (requires `e2e` feature)
//!
//! ## Running Tests
//!
//! ### Unit/Integration Tests (no external dependencies)
//! ```bash
//! cargo test --package tests
//! ```
//!
//! ### End-to-End Tests (requires a running network)
//!
//! ```bash
//! CHAINPROBE_E2E_URL=http://10.0.0.4:8008 cargo test --package tests --features e2e e2e
//! ```




#[cfg(test)]
mod config_tests;

/// Mock infrastructure for testing
pub mod mock_infrastructure;
