mod balance;
mod categorize;
mod config;
mod error;
mod import;
mod models;
mod normalize;
mod pipeline;
mod reconcile;
mod run;
mod store;

use anyhow::Result;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Log to stderr; `RUST_LOG` overrides the default `ledgersync=info`.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("ledgersync=info"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

fn main() -> Result<()> {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();
    run::as_cli(&args)
}
