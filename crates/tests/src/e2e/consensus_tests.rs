//! Network Consensus Tests
//!
//! Checks that every discovered node agrees on the block behind the tip.

use super::fixtures::setup;
use chainprobe_core::consensus::{ConsensusMonitor, ConsensusVerdict};
use serial_test::serial;
use std::sync::Arc;

#[tokio::test]
#[serial]
async fn test_nodes_agree_behind_tip() {
    let fixtures = setup().await;
    let config = fixtures.config();
    let nodes = fixtures.nodes().await.expect("Failed to resolve nodes");
    println!("Checking {} node(s): {nodes:?}", nodes.len());

    let monitor = ConsensusMonitor::from_config(
        Arc::new(fixtures.client().clone()),
        &config.consensus,
        config.monitor.clone(),
    );
    let verdict = monitor
        .wait_for_agreement(&nodes, config.consensus.block_offset_from_tip)
        .await
        .expect("valid node list");

    match verdict {
        ConsensusVerdict::Agree(agreement) => {
            println!("Agreed on {} across {} node(s)", agreement.block_id, agreement.compared.len());
        }
        ConsensusVerdict::Disagree(disagreement) => {
            panic!("Nodes disagree: {disagreement:#?}");
        }
        ConsensusVerdict::Indeterminate(indeterminate) => {
            panic!("Consensus inconclusive: {}", ConsensusVerdict::Indeterminate(indeterminate));
        }
    }
}

#[tokio::test]
#[serial]
async fn test_gateway_agrees_with_itself_at_tip() {
    let fixtures = setup().await;
    let monitor = ConsensusMonitor::from_config(
        Arc::new(fixtures.client().clone()),
        &fixtures.config().consensus,
        fixtures.config().monitor.clone(),
    );

    let verdict = monitor.check_once(&[fixtures.gateway().clone()], 0).await.expect("valid node list");

    assert!(verdict.is_agree(), "a single node always agrees with itself: {verdict}");
}
