//! Environment overrides of `ProbeConfig`.
//!
//! These tests mutate process environment variables and run serially.

use chainprobe_core::{config::ProbeConfig, types::ListingOrder};
use serial_test::serial;

const VARS: [&str; 5] = [
    "CHAINPROBE__NODES__SEED_URL",
    "CHAINPROBE__NODES__STATIC_URLS",
    "CHAINPROBE__PAGINATION__PAGE_SIZE",
    "CHAINPROBE__CONSENSUS__BLOCK_OFFSET_FROM_TIP",
    "CHAINPROBE__REST__LISTING_ORDER",
];

fn clear_vars() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_environment_overrides_defaults() {
    clear_vars();
    std::env::set_var("CHAINPROBE__NODES__SEED_URL", "http://10.0.0.4:8008");
    std::env::set_var("CHAINPROBE__NODES__STATIC_URLS", "http://10.0.0.8:8008,http://10.0.0.9:8008");
    std::env::set_var("CHAINPROBE__PAGINATION__PAGE_SIZE", "50");
    std::env::set_var("CHAINPROBE__CONSENSUS__BLOCK_OFFSET_FROM_TIP", "3");
    std::env::set_var("CHAINPROBE__REST__LISTING_ORDER", "oldest_first");

    let config = ProbeConfig::from_file("does/not/exist.toml");
    clear_vars();
    let config = config.unwrap();

    assert_eq!(config.nodes.seed_url, "http://10.0.0.4:8008");
    assert_eq!(config.nodes.static_urls, vec!["http://10.0.0.8:8008", "http://10.0.0.9:8008"]);
    assert_eq!(config.pagination.page_size, Some(50));
    assert_eq!(config.consensus.block_offset_from_tip, 3);
    assert_eq!(config.rest.listing_order, ListingOrder::OldestFirst);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_vars();

    let config = ProbeConfig::from_file("does/not/exist.toml").unwrap();

    assert_eq!(config, ProbeConfig::default());
}
