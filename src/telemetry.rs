// src/telemetry.rs
// =============================================================================
// Logging setup. Everything is emitted through `tracing`; this module installs
// the subscriber that formats it.
// =============================================================================

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Logs go to stderr so that `--json` output on stdout stays parseable.
// RUST_LOG overrides the default filter.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,rules_link_guardian=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
