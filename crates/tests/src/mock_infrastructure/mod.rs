//! Mock Infrastructure for Testing Chainprobe
//!
//! Reusable mock gateways and fixtures for exercising the REST client,
//! pagination and consensus checks without a running ledger.
//!
//! ## Components
//!
//! - `RestMockBuilder`: wraps mockito to serve gateway responses and paginated listings
//! - Test helpers for block, batch and error fixtures
//!
//! ## Usage
//!
//! ```ignore
//! use tests::mock_infrastructure::{linear_chain_ids, test_client, RestMockBuilder};
//!
//! let mut gateway = RestMockBuilder::new().await;
//! gateway.mock_chain(&linear_chain_ids(5), 2).await;
//!
//! let chain = test_client(2).fetch_chain(&gateway.node()).await?;
//! ```

pub mod rest_mock;

pub use rest_mock::RestMockBuilder;
pub use test_helpers::*;
