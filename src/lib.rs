//! Modserve library
//!
//! Resolves installed package entry points, serves them on demand as AMD
//! modules, and assembles static script/style bundles from path patterns.

pub mod bundler;
pub mod cli;
pub mod config;
pub mod error;
pub mod fonts;
pub mod module;
pub mod resolver;
pub mod server;
pub mod transform;
pub mod utils;

pub use bundler::{BundleAssembler, BundleResult, PathSpec};
pub use cli::Cli;
pub use config::Config;
pub use error::{Error, Result};
pub use module::{ModuleServer, ServeOutcome};
pub use resolver::{PackageMap, PackageResolver};
