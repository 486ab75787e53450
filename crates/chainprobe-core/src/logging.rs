//! Tracing subscriber setup.

use crate::config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATES: [&str; 2] = ["chainprobe_core", "tests"];

/// Filter used when `RUST_LOG` is unset: `warn` globally, `level` for this workspace.
#[must_use]
pub fn default_filter(level: &str) -> String {
    let mut directives = vec!["warn".to_string()];
    directives.extend(CRATES.iter().map(|krate| format!("{krate}={level}")));
    directives.join(",")
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over `config.level`.
///
/// Returns `false` if a subscriber was already installed, so test binaries can
/// call this from every test.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter = match std::env::var("RUST_LOG") {
        Ok(level) if matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error") => {
            EnvFilter::new(default_filter(&level))
        }
        Ok(_) => EnvFilter::try_from_env("RUST_LOG")
            .unwrap_or_else(|_| EnvFilter::new(default_filter(&config.level))),
        Err(_) => EnvFilter::new(default_filter(&config.level)),
    };

    let registry = tracing_subscriber::registry().with(filter);

    if config.format.as_str() == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer().json();
        registry.with(fmt_layer).try_init().is_ok()
    } else {
        // "pretty" and any other format default to pretty logging
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .with_target(false);
        registry.with(fmt_layer).try_init().is_ok()
    }
}
