//! Init command implementation

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::config::Config;

/// Write a default configuration
#[derive(Args, Debug)]
pub struct InitCommand {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

impl InitCommand {
    pub async fn execute(&self, config_path: &str) -> Result<()> {
        let path = Path::new(config_path);

        if path.exists() && !self.force {
            anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
        }

        let mut config = Config::default();
        config.bundle.paths = vec![
            "wwwroot/styles/*.css".to_string(),
            "wwwroot/scripts/**/*.js".to_string(),
        ];

        let content = format!("# Modserve configuration\n\n{}", config.to_toml()?);
        fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        eprintln!("  {} Created {}", "✓".green(), path.display().to_string().cyan());

        Ok(())
    }
}
