//! Packages command implementation

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::config::Config;
use crate::resolver::{PackageResolver, ResolverOptions};

/// List resolved packages
#[derive(Args, Debug)]
pub struct PackagesCommand {
    /// Print the map as JSON
    #[arg(long)]
    pub json: bool,
}

impl PackagesCommand {
    pub async fn execute(&self, config_path: &str) -> Result<()> {
        let config = Config::load_or_default(config_path)?;

        let packages = PackageResolver::new(ResolverOptions::from(&config))
            .resolve(&config.packages_root())
            .context("Failed to resolve installed packages")?;
        let entries = packages.entries();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        for entry in &entries {
            println!("{} {} {}", entry.name.cyan(), "→".dimmed(), entry.entry_path.display());
        }
        eprintln!("\n{} {} package(s)", "✓".green(), entries.len());

        Ok(())
    }
}
