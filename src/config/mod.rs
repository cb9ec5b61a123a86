//! Configuration handling for Modserve
//!
//! Parses and manages modserve.toml configuration files.

mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use schema::*;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Project metadata
    #[serde(default)]
    pub project: ProjectConfig,

    /// Installed-packages resolution
    #[serde(default)]
    pub packages: PackagesConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Static bundle settings
    #[serde(default)]
    pub bundle: BundleConfig,

    /// Root directory (computed from config file location)
    #[serde(skip)]
    pub root: PathBuf,
}

impl Config {
    /// Load configuration from a file path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let canonical_path = absolute(path.as_ref())?;

        let content = fs::read_to_string(&canonical_path)
            .with_context(|| format!("Failed to read config file: {}", canonical_path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", canonical_path.display()))?;

        // Set root directory to the directory containing the config file
        config.root = canonical_path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        config.validate()?;

        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let canonical_path = absolute(path.as_ref())?;

        if canonical_path.exists() {
            return Self::load(canonical_path);
        }

        debug!("No config at {}, using defaults", canonical_path.display());
        let mut config = Self::default();
        config.root = canonical_path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.packages.root.trim().is_empty() {
            anyhow::bail!("packages.root must not be empty");
        }

        if self.server.public_dir.trim().is_empty() {
            anyhow::bail!("server.public_dir must not be empty");
        }

        if self.server.port == 0 {
            anyhow::bail!("server.port must be non-zero");
        }

        if let Some(index) = self.bundle.paths.iter().position(|p| p.trim().is_empty()) {
            anyhow::bail!("bundle.paths[{}] is empty", index);
        }

        Ok(())
    }

    /// Get the absolute installed-packages directory
    pub fn packages_root(&self) -> PathBuf {
        self.root.join(&self.packages.root)
    }

    /// Get the absolute public web-asset directory
    pub fn public_dir(&self) -> PathBuf {
        self.root.join(&self.server.public_dir)
    }

    /// Get the absolute font directories
    pub fn font_dirs(&self) -> Vec<PathBuf> {
        self.server.font_dirs.iter().map(|d| self.root.join(d)).collect()
    }

    /// Get the bundle path specifications rooted at the project directory
    pub fn bundle_paths(&self) -> Vec<String> {
        self.bundle
            .paths
            .iter()
            .map(|p| self.root.join(p).display().to_string())
            .collect()
    }

    /// Get the absolute bundle output directory
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.bundle.outdir)
    }

    /// Render this configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_load_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("modserve.toml");
        fs::write(&path, "[bundle]\npaths = [\"wwwroot/app.js\"]\n").unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.root, dir.path());
        assert_eq!(config.packages.root, "node_modules");
        assert_eq!(config.packages.exclude, vec![".bin", "@types"]);
        assert_eq!(config.packages.replace.get("got").map(String::as_str), Some("wwwroot/got.js"));
        assert_eq!(config.server.public_dir, "wwwroot");
        assert!(config.bundle.minify);
        assert_eq!(config.packages_root(), dir.path().join("node_modules"));
        assert_eq!(
            config.bundle_paths(),
            vec![dir.path().join("wwwroot/app.js").display().to_string()]
        );
    }

    #[test]
    fn test_load_rejects_empty_bundle_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("modserve.toml");
        fs::write(&path, "[bundle]\npaths = [\"a.js\", \"  \"]\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("bundle.paths[1]"));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(dir.path().join("modserve.toml")).unwrap();

        assert_eq!(config.root, dir.path());
        assert_eq!(config.server.port, 5000);
        assert!(config.bundle.paths.is_empty());
    }

    #[test]
    fn test_toml_round_trip_keeps_overrides() {
        let config = Config::default();
        let rendered = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();

        assert_eq!(parsed.packages.multi_build, vec!["vue"]);
        assert_eq!(parsed.packages.build_variants, vec![".common", ".runtime"]);
    }
}
