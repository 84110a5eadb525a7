//! Windowed viewer binary running the built-in demo engine.
//!
//! Run with:
//!   cargo run
//!
//! Controls:
//!   T -- train one generation (fitness summary is logged)
//!   Escape -- quit
//!
//! Logging is controlled via `RUST_LOG` (e.g. `RUST_LOG=flockview=debug`).

use tracing_subscriber::EnvFilter;

use flockview::demo::DemoEngine;
use flockview::driver::DriverConfig;

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    flockview::render::run_windowed(DemoEngine::new(), DriverConfig::default())
}
