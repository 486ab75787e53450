//! Node discovery through a seed node's `/peers` list.

use crate::{
    rest::{RestClient, RestError},
    types::NodeAddress,
};
use std::collections::HashSet;
use url::Url;

/// Maps a validator peer endpoint such as `tcp://10.0.0.5:8800` to the REST
/// gateway on the same host, `http://10.0.0.5:{rest_api_port}`.
///
/// # Errors
///
/// Returns [`RestError::InvalidAddress`] if the endpoint has no host.
pub fn gateway_address_for_peer(
    endpoint: &str,
    rest_api_port: u16,
) -> Result<NodeAddress, RestError> {
    let endpoint = endpoint.trim();
    let with_scheme =
        if endpoint.contains("://") { endpoint.to_string() } else { format!("tcp://{endpoint}") };

    let url = Url::parse(&with_scheme)
        .map_err(|e| RestError::InvalidAddress(format!("peer endpoint {endpoint}: {e}")))?;
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| RestError::InvalidAddress(format!("peer endpoint {endpoint}: missing host")))?;

    NodeAddress::parse(&format!("http://{host}:{rest_api_port}"))
}

/// Lists every gateway reachable through `seed`: one per peer, then the seed itself.
///
/// Duplicates are dropped, keeping first occurrence. Peer entries that cannot be
/// mapped to an address are skipped with a warning.
///
/// # Errors
///
/// Returns the [`RestError`] of the `/peers` request when the seed cannot be queried.
pub async fn discover_nodes(
    client: &RestClient,
    seed: &NodeAddress,
    rest_api_port: u16,
) -> Result<Vec<NodeAddress>, RestError> {
    let peers = client.get_peers(seed).await?;

    let mut candidates = Vec::with_capacity(peers.len() + 1);
    for peer in &peers {
        match gateway_address_for_peer(peer, rest_api_port) {
            Ok(node) => candidates.push(node),
            Err(e) => tracing::warn!(seed = %seed, peer = %peer, error = %e, "skipping peer"),
        }
    }
    candidates.push(seed.clone());

    let nodes = dedup_preserving_order(candidates);
    tracing::info!(seed = %seed, peers = peers.len(), nodes = nodes.len(), "nodes discovered");
    Ok(nodes)
}

pub(crate) fn dedup_preserving_order(nodes: Vec<NodeAddress>) -> Vec<NodeAddress> {
    let mut seen = HashSet::with_capacity(nodes.len());
    nodes.into_iter().filter(|node| seen.insert(node.clone())).collect()
}
