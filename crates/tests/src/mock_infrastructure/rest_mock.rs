//! REST Gateway Mock Builder
//!
//! Wraps mockito to serve gateway-shaped responses, including paginated listings.

use super::test_helpers::{blocks_newest_first, error_body};
use chainprobe_core::types::NodeAddress;
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};

/// Builder for a mock ledger REST gateway.
///
/// Paginated mocks expect the client to send `limit={page_size}` on every page,
/// and `start={token}` on every page after the first.
pub struct RestMockBuilder {
    server: ServerGuard,
    mocks: Vec<Mock>,
}

impl RestMockBuilder {
    /// Creates a new builder with a fresh mockito server.
    pub async fn new() -> Self {
        Self { server: Server::new_async().await, mocks: Vec::new() }
    }

    /// Returns the URL of the mock server.
    #[must_use]
    pub fn url(&self) -> String {
        self.server.url()
    }

    /// The mock server as a node address.
    #[must_use]
    pub fn node(&self) -> NodeAddress {
        NodeAddress::parse(&self.server.url()).expect("mockito URL is a valid node address")
    }

    /// Asserts that every registered mock was hit as often as expected.
    pub async fn assert_all(&self) {
        for mock in &self.mocks {
            mock.assert_async().await;
        }
    }

    /// Mocks `GET {path}` with a query matcher, status and JSON body.
    pub async fn mock_get(
        &mut self,
        path: &str,
        query: Matcher,
        status: usize,
        body: &Value,
    ) -> &mut Self {
        let mock = self
            .server
            .mock("GET", path)
            .match_query(query)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        self.mocks.push(mock);
        self
    }

    /// Mocks `GET {path}` returning a raw, non-JSON body.
    pub async fn mock_raw(&mut self, path: &str, status: usize, body: &str) -> &mut Self {
        let mock = self
            .server
            .mock("GET", path)
            .match_query(Matcher::Any)
            .with_status(status)
            .with_header("content-type", "text/html")
            .with_body(body)
            .create_async()
            .await;

        self.mocks.push(mock);
        self
    }

    /// Mocks an error envelope on `GET {path}` for any query.
    pub async fn mock_error(
        &mut self,
        path: &str,
        status: usize,
        code: i64,
        title: &str,
        message: &str,
    ) -> &mut Self {
        self.mock_get(path, Matcher::Any, status, &error_body(code, title, message)).await
    }

    /// Serves `records` from `path` in pages of `page_size`.
    ///
    /// The continuation token of each page is the first record's `header_signature`
    /// when present, otherwise `p{n}`.
    pub async fn mock_paginated(
        &mut self,
        path: &str,
        records: &[Value],
        page_size: usize,
    ) -> &mut Self {
        let chunks: Vec<&[Value]> = if records.is_empty() {
            vec![&[]]
        } else {
            records.chunks(page_size.max(1)).collect()
        };

        let tokens: Vec<String> = chunks
            .iter()
            .enumerate()
            .map(|(n, chunk)| {
                chunk
                    .first()
                    .and_then(|r| r.get("header_signature"))
                    .and_then(Value::as_str)
                    .map_or_else(|| format!("p{n}"), str::to_string)
            })
            .collect();

        for (n, chunk) in chunks.iter().enumerate() {
            let query = if n == 0 {
                Matcher::Regex(format!("^limit={page_size}$"))
            } else {
                Matcher::Regex(format!("^start={}&limit={page_size}$", tokens[n]))
            };

            let mut paging = json!({"start": if n == 0 { Value::Null } else { json!(tokens[n]) }, "limit": page_size});
            if let Some(next) = tokens.get(n + 1) {
                paging["next_position"] = json!(next);
                paging["next"] = json!(format!("{}{path}?start={next}&limit={page_size}", self.url()));
            }

            let body = json!({
                "data": chunk,
                "head": records.first().and_then(|r| r.get("header_signature")).cloned().unwrap_or(Value::Null),
                "link": format!("{}{path}", self.url()),
                "paging": paging
            });
            self.mock_get(path, query, 200, &body).await;
        }
        self
    }

    /// Serves a chain, given genesis first, from `/blocks` in pages of `page_size`.
    pub async fn mock_chain(&mut self, ids: &[String], page_size: usize) -> &mut Self {
        let blocks = blocks_newest_first(ids);
        self.mock_paginated("/blocks", &blocks, page_size).await
    }

    /// Mocks `/peers` listing the given validator endpoints.
    pub async fn mock_peers(&mut self, peers: &[&str]) -> &mut Self {
        let url = self.url();
        self.mock_get("/peers", Matcher::Any, 200, &json!({"data": peers, "link": format!("{url}/peers")}))
            .await
    }

    /// Mocks `GET /blocks/{id}`.
    pub async fn mock_block(&mut self, id: &str, block: &Value) -> &mut Self {
        let url = self.url();
        self.mock_get(
            &format!("/blocks/{id}"),
            Matcher::Any,
            200,
            &json!({"data": block, "link": format!("{url}/blocks/{id}")}),
        )
        .await
    }
}
