//! Modserve - serve installed npm packages as AMD modules
//!
//! # Features
//! - Package entry resolution from `node_modules` with per-package overrides
//! - CommonJS entry files wrapped in `define` on the fly
//! - Script/style bundles assembled from literal and glob path specs
//! - Font lookup and static file fallback

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use modserve_lib::Cli;

/// Initialize the logging/tracing system
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("modserve=debug,modserve_lib=debug,tower_http=debug"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("modserve=info,modserve_lib=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    cli.execute().await
}
