use crate::{
    pagination::{PagedCollectionFetcher, PaginationConfig, PaginationError},
    rest::{
        query::{ListQuery, Resource, Wait},
        ApiErrorCategory, RestError,
    },
    types::{
        ApiErrorBody, BatchStatus, Block, Chain, ListingOrder, NodeAddress, Page,
        ResourceEnvelope,
    },
};
use reqwest::{Client, ClientBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Configuration for the REST gateway client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestClientConfig {
    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// TCP connect timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,

    /// Idle connections kept per node (default: 16).
    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,

    /// Bytes of a non-JSON error body kept in [`RestError::Http`] (default: 256).
    #[serde(default = "default_max_error_body_bytes")]
    pub max_error_body_bytes: usize,

    /// Order in which the gateway lists `/blocks`.
    #[serde(default)]
    pub listing_order: ListingOrder,
}

fn default_request_timeout_seconds() -> u64 {
    30
}

fn default_connect_timeout_seconds() -> u64 {
    5
}

fn default_pool_max_idle_per_host() -> usize {
    16
}

fn default_max_error_body_bytes() -> usize {
    256
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: default_request_timeout_seconds(),
            connect_timeout_seconds: default_connect_timeout_seconds(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
            max_error_body_bytes: default_max_error_body_bytes(),
            listing_order: ListingOrder::default(),
        }
    }
}

/// HTTP client for a ledger node's REST gateway.
///
/// Every call names the node it talks to, so one client serves a whole network.
/// Requests are never retried here; polling belongs to the caller (see
/// [`ConsensusMonitor`](crate::consensus::ConsensusMonitor)).
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    config: RestClientConfig,
    fetcher: PagedCollectionFetcher,
}

impl RestClient {
    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to build.
    pub fn new() -> Result<Self, RestError> {
        Self::with_config(RestClientConfig::default(), PaginationConfig::default())
    }

    /// Creates a client with the given transport and pagination settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to build.
    pub fn with_config(
        config: RestClientConfig,
        pagination: PaginationConfig,
    ) -> Result<Self, RestError> {
        let client = ClientBuilder::new()
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("chainprobe/", env!("CARGO_PKG_VERSION")))
            .tcp_keepalive(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "failed to build http client");
                RestError::ConnectionFailed(format!("HTTP client build failed: {e}"))
            })?;

        Ok(Self { client, config, fetcher: PagedCollectionFetcher::new(pagination) })
    }

    #[must_use]
    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    #[must_use]
    pub fn pagination(&self) -> &PaginationConfig {
        self.fetcher.config()
    }

    /// Sanitizes network errors so node internals do not leak into reports.
    fn sanitize_network_error(error: &reqwest::Error) -> String {
        if error.is_connect() {
            "connection refused or unreachable".to_string()
        } else if error.is_timeout() {
            "connection timed out".to_string()
        } else if error.is_request() {
            "request failed".to_string()
        } else if error.is_body() {
            "response body error".to_string()
        } else if error.is_decode() {
            "response decode error".to_string()
        } else if error.is_redirect() {
            "too many redirects".to_string()
        } else {
            "network error".to_string()
        }
    }

    fn map_transport_error(error: reqwest::Error) -> RestError {
        if error.is_timeout() {
            RestError::Timeout
        } else if error.is_connect() || error.is_request() {
            RestError::ConnectionFailed(Self::sanitize_network_error(&error))
        } else {
            RestError::Network(error)
        }
    }

    /// Turns a non-2xx body into the gateway's error object when it has one.
    fn error_from_body(&self, status: u16, body: &[u8]) -> RestError {
        if let Ok(ApiErrorBody { error }) = serde_json::from_slice::<ApiErrorBody>(body) {
            return RestError::Api {
                status,
                code: error.code,
                title: error.title,
                message: error.message,
            };
        }

        let raw_text = String::from_utf8_lossy(body);
        let max = self.config.max_error_body_bytes;
        let text = if raw_text.len() > max {
            let mut end = max;
            while !raw_text.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated)", &raw_text[..end])
        } else {
            raw_text.into_owned()
        };
        RestError::Http(status, text)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, RestError> {
        tracing::trace!(url = %url, "GET");

        let response =
            self.client.get(url.clone()).send().await.map_err(Self::map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(Self::map_transport_error)?;

        if !status.is_success() {
            let error = self.error_from_body(status.as_u16(), &body);
            tracing::debug!(
                url = %url,
                status = status.as_u16(),
                category = error.api_category().map_or("none", ApiErrorCategory::as_str),
                error = %error,
                "request rejected"
            );
            return Err(error);
        }

        serde_json::from_slice(&body).map_err(|e| RestError::Decode(format!("{}: {e}", url.path())))
    }

    fn resource_url(
        node: &NodeAddress,
        resource: Resource,
        id: Option<&str>,
    ) -> Result<Url, RestError> {
        let mut url = node.endpoint(resource.path())?;
        if let Some(id) = id {
            if id.is_empty() {
                return Err(RestError::InvalidRequest(format!("empty {resource} id")));
            }
            url.path_segments_mut()
                .map_err(|()| RestError::InvalidRequest(format!("{node} cannot be a base URL")))?
                .push(id);
        }
        Ok(url)
    }

    /// Applies the configured page size unless the query sets its own limit.
    fn paged_query(&self, query: &ListQuery) -> ListQuery {
        let mut query = query.clone();
        if query.limit.is_none() {
            query.limit = self.fetcher.config().page_size;
        }
        query
    }

    /// Fetches one page of `resource`, continuing at `start` when given.
    ///
    /// # Errors
    ///
    /// Returns [`RestError`] for transport failures, gateway errors, or a body
    /// that is not a page of `T`.
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        node: &NodeAddress,
        resource: Resource,
        query: &ListQuery,
        start: Option<&str>,
    ) -> Result<Page<T>, RestError> {
        let mut url = Self::resource_url(node, resource, None)?;
        query.apply(&mut url, start);
        self.get_json(url).await
    }

    /// Fetches every record of `resource`, following continuation tokens.
    ///
    /// Collections the gateway does not paginate are read in a single request.
    ///
    /// # Errors
    ///
    /// See [`PagedCollectionFetcher::fetch_all`].
    pub async fn list_all<T: DeserializeOwned>(
        &self,
        node: &NodeAddress,
        resource: Resource,
        query: &ListQuery,
    ) -> Result<Vec<T>, PaginationError> {
        if !resource.is_paginated() {
            let page = self.fetch_page::<T>(node, resource, query, None).await.map_err(|source| {
                PaginationError::FetchFailed { node: node.clone(), page: 1, source }
            })?;
            return Ok(page.data);
        }

        let query = self.paged_query(query);
        let query = &query;
        self.fetcher
            .fetch_all(node, move |start: Option<String>| async move {
                self.fetch_page::<T>(node, resource, query, start.as_deref()).await
            })
            .await
    }

    /// Fetches a node's whole chain, ordered genesis to tip.
    ///
    /// # Errors
    ///
    /// See [`PagedCollectionFetcher::fetch_all`].
    pub async fn fetch_chain(&self, node: &NodeAddress) -> Result<Chain, PaginationError> {
        let blocks: Vec<Block> = self.list_all(node, Resource::Blocks, &ListQuery::new()).await?;
        tracing::debug!(node = %node, blocks = blocks.len(), "chain fetched");
        Ok(Chain::from_listing(blocks, self.config.listing_order))
    }

    /// Total number of records in `resource` across all pages.
    ///
    /// # Errors
    ///
    /// See [`PagedCollectionFetcher::fetch_all`].
    pub async fn count(
        &self,
        node: &NodeAddress,
        resource: Resource,
    ) -> Result<usize, PaginationError> {
        let records: Vec<serde_json::Value> =
            self.list_all(node, resource, &ListQuery::new()).await?;
        Ok(records.len())
    }

    async fn get_resource<T: DeserializeOwned>(
        &self,
        node: &NodeAddress,
        resource: Resource,
        id: &str,
    ) -> Result<ResourceEnvelope<T>, RestError> {
        let url = Self::resource_url(node, resource, Some(id))?;
        self.get_json(url).await
    }

    /// `GET /blocks/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError`] on transport, gateway, or decode failure.
    pub async fn get_block(&self, node: &NodeAddress, id: &str) -> Result<Block, RestError> {
        Ok(self.get_resource::<Block>(node, Resource::Blocks, id).await?.data)
    }

    /// `GET /batches/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError`] on transport, gateway, or decode failure.
    pub async fn get_batch(
        &self,
        node: &NodeAddress,
        id: &str,
    ) -> Result<serde_json::Value, RestError> {
        Ok(self.get_resource(node, Resource::Batches, id).await?.data)
    }

    /// `GET /transactions/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError`] on transport, gateway, or decode failure.
    pub async fn get_transaction(
        &self,
        node: &NodeAddress,
        id: &str,
    ) -> Result<serde_json::Value, RestError> {
        Ok(self.get_resource(node, Resource::Transactions, id).await?.data)
    }

    /// `GET /state/{address}`. The entry's data is returned base64-encoded, as served.
    ///
    /// # Errors
    ///
    /// Returns [`RestError`] on transport, gateway, or decode failure.
    pub async fn get_state_entry(
        &self,
        node: &NodeAddress,
        address: &str,
    ) -> Result<ResourceEnvelope<String>, RestError> {
        self.get_resource(node, Resource::State, address).await
    }

    /// `GET /peers`: validator endpoints the node is connected to.
    ///
    /// # Errors
    ///
    /// Returns [`RestError`] on transport, gateway, or decode failure.
    pub async fn get_peers(&self, node: &NodeAddress) -> Result<Vec<String>, RestError> {
        let page: Page<String> = self.fetch_page(node, Resource::Peers, &ListQuery::new(), None).await?;
        Ok(page.data)
    }

    /// `GET /receipts?id=...`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError`] on transport, gateway, or decode failure, and
    /// [`RestError::InvalidRequest`] when `transaction_ids` is empty.
    pub async fn get_receipts(
        &self,
        node: &NodeAddress,
        transaction_ids: &[String],
    ) -> Result<Vec<serde_json::Value>, RestError> {
        if transaction_ids.is_empty() {
            return Err(RestError::InvalidRequest("no transaction ids given".to_string()));
        }
        let query = ListQuery::new().ids(transaction_ids.iter().cloned());
        let page: Page = self.fetch_page(node, Resource::Receipts, &query, None).await?;
        Ok(page.data)
    }

    /// `GET /batch_statuses?id=...[&wait]`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError`] on transport, gateway, or decode failure, and
    /// [`RestError::InvalidRequest`] when `batch_ids` is empty.
    pub async fn get_batch_statuses(
        &self,
        node: &NodeAddress,
        batch_ids: &[String],
        wait: Option<Wait>,
    ) -> Result<Vec<BatchStatus>, RestError> {
        if batch_ids.is_empty() {
            return Err(RestError::InvalidRequest("no batch ids given".to_string()));
        }
        let mut query = ListQuery::new().ids(batch_ids.iter().cloned());
        query.wait = wait;
        let page: Page<BatchStatus> =
            self.fetch_page(node, Resource::BatchStatuses, &query, None).await?;
        Ok(page.data)
    }
}
