//! Serve command implementation

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tracing::info;

use crate::config::Config;
use crate::resolver::{PackageResolver, ResolverOptions};
use crate::server::Server;

/// Serve package modules, fonts and static files
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind to (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,
}

impl ServeCommand {
    pub async fn execute(&self, config_path: &str) -> Result<()> {
        info!("Loading configuration from {}", config_path);
        let config = Config::load_or_default(config_path)?;

        let packages_root = config.packages_root();
        let packages = PackageResolver::new(ResolverOptions::from(&config))
            .resolve(&packages_root)
            .context("Failed to resolve installed packages")?;

        let options = ServerOptions {
            host: self.host.clone().unwrap_or_else(|| config.server.host.clone()),
            port: self.port.unwrap_or(config.server.port),
        };

        eprintln!(
            "{} Serving {} package(s) at {}\n",
            "→".blue(),
            packages.len().to_string().cyan(),
            format!("http://{}:{}", options.host, options.port).cyan().underline()
        );
        eprintln!(
            "  {} Modules under {}",
            "•".dimmed(),
            "/module/<name>.js".yellow()
        );
        eprintln!(
            "  {} Press {} to stop\n",
            "•".dimmed(),
            "Ctrl+C".yellow()
        );

        let server = Server::new(Arc::new(config), Arc::new(packages), options);
        server.start().await
    }
}

/// Server options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub host: String,
    pub port: u16,
}
