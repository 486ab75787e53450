//! Client side of a ledger node's REST gateway.
//!
//! - [`client`]: the HTTP client ([`RestClient`]) and its settings
//! - [`query`]: resource paths and list query parameters
//! - [`discovery`]: finding sibling nodes through `/peers`
//! - [`errors`]: the error type, separating transport failures from gateway answers

pub mod client;
pub mod discovery;
pub mod errors;
pub mod query;

pub use client::{RestClient, RestClientConfig};
pub use discovery::{discover_nodes, gateway_address_for_peer};
pub use errors::{codes, ApiErrorCategory, RestError};
pub use query::{ListQuery, Resource, Wait};
