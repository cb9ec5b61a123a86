//! Bundle command implementation

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tracing::info;

use crate::bundler::BundleAssembler;
use crate::config::Config;
use crate::transform::Passthrough;
use crate::utils::{format_duration, format_size};

/// Assemble the configured bundle
#[derive(Args, Debug)]
pub struct BundleCommand {
    /// Output directory (overrides bundle.outdir)
    #[arg(short, long)]
    pub outdir: Option<PathBuf>,

    /// Skip script minification
    #[arg(long)]
    pub no_minify: bool,
}

impl BundleCommand {
    pub async fn execute(&self, config_path: &str) -> Result<()> {
        let start = Instant::now();

        info!("Loading configuration from {}", config_path);
        let config = Config::load_or_default(config_path)?;

        if config.bundle.paths.is_empty() {
            anyhow::bail!("No bundle.paths configured in {}", config_path);
        }

        eprintln!("{} Bundling {} path spec(s)...", "→".blue(), config.bundle.paths.len());

        let assembler = if self.no_minify {
            BundleAssembler::new(Arc::new(Passthrough))
        } else {
            BundleAssembler::from_config(&config)
        };
        let specs = config.bundle_paths();
        let result = tokio::task::spawn_blocking(move || assembler.assemble_paths(&specs))
            .await
            .context("Bundle task failed")?
            .context("Failed to assemble bundle")?;

        let output_dir = self.outdir.clone().unwrap_or_else(|| config.output_dir());
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

        let outputs = [
            (output_dir.join("scripts.html"), &result.scripts),
            (output_dir.join("styles.css"), &result.styles),
        ];

        eprintln!(
            "\n{} Built bundle in {}\n",
            "✓".green().bold(),
            format_duration(start.elapsed())
        );

        for (path, content) in &outputs {
            fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;

            eprintln!(
                "  {} {} {}",
                "•".dimmed(),
                path.display().to_string().cyan(),
                format_size(content.len()).dimmed()
            );
        }

        eprintln!();

        Ok(())
    }
}
