// src/telemetry.rs
// =============================================================================
// Logging setup.
//
// Results (URLs, forms, ...) go to stdout. Everything else - progress,
// failed requests, warnings - goes through `tracing` to stderr, so the
// results can be piped into other tools untouched.
//
// RUST_LOG always wins; otherwise --debug / --verbose pick the level.
// =============================================================================

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init(debug: bool, verbose: bool) {
    let default_filter = if debug {
        "warn,scope_spider=debug"
    } else if verbose {
        "warn,scope_spider=info"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
