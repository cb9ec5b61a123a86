//! Command-line interface for Modserve
//!
//! Provides the main CLI structure using clap with subcommands for:
//! - `serve`: Serve packages as AMD modules alongside the public directory
//! - `bundle`: Assemble the configured script and style bundle
//! - `packages`: Show the resolved package map
//! - `init`: Write a default configuration file

mod bundle;
mod init;
mod packages;
mod serve;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

pub use bundle::BundleCommand;
pub use init::InitCommand;
pub use packages::PackagesCommand;
pub use serve::{ServeCommand, ServerOptions};

/// Modserve - serve installed packages as AMD modules and bundle page assets
#[derive(Parser, Debug)]
#[command(name = "modserve")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to modserve.toml config file
    #[arg(short, long, global = true, default_value = "modserve.toml", env = "MODSERVE_CONFIG")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve package modules, fonts and static files
    Serve(ServeCommand),

    /// Assemble the configured bundle into the output directory
    Bundle(BundleCommand),

    /// List resolved packages and their entry files
    Packages(PackagesCommand),

    /// Write a default modserve.toml
    Init(InitCommand),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Serve(cmd) => {
                print_banner();
                cmd.execute(&self.config).await
            }
            Commands::Bundle(cmd) => {
                print_banner();
                cmd.execute(&self.config).await
            }
            Commands::Packages(cmd) => cmd.execute(&self.config).await,
            Commands::Init(cmd) => cmd.execute(&self.config).await,
        }
    }
}

/// Print the Modserve banner
fn print_banner() {
    eprintln!(
        "\n{} {}\n",
        "Modserve".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
