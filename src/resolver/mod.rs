//! Package resolution
//!
//! Scans the installed-packages directory once at startup and maps every
//! loadable package to the file its manifest designates as the main module.

mod package_map;

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::utils::normalize_separators;

pub use package_map::{PackageEntry, PackageMap};

/// Manifest file read from every package directory
const MANIFEST: &str = "package.json";

/// Rules applied while resolving entry files
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Directory names skipped outright
    pub exclude: Vec<String>,

    /// Name fragments marking multi-build libraries
    pub multi_build: Vec<String>,

    /// Suffixes removed from multi-build main paths
    pub build_variants: Vec<String>,

    /// Extension appended when a main path has none
    pub default_extension: String,

    /// Packages whose entry is forced to a project-local file
    pub replacements: HashMap<String, PathBuf>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ResolverOptions {
    fn from(config: &Config) -> Self {
        let packages = &config.packages;
        Self {
            exclude: packages.exclude.clone(),
            multi_build: packages.multi_build.clone(),
            build_variants: packages.build_variants.clone(),
            default_extension: packages.default_extension.clone(),
            replacements: packages
                .replace
                .iter()
                .map(|(name, path)| (name.clone(), config.root.join(path)))
                .collect(),
        }
    }
}

/// Resolves installed packages into a [`PackageMap`]
pub struct PackageResolver {
    options: ResolverOptions,
}

impl PackageResolver {
    /// Create a new resolver
    pub fn new(options: ResolverOptions) -> Self {
        Self { options }
    }

    /// Resolve every package directly below `packages_root`
    ///
    /// Only a missing root is an error. Packages without a usable entry file
    /// are left out of the map.
    pub fn resolve(&self, packages_root: &Path) -> Result<PackageMap> {
        if !packages_root.is_dir() {
            return Err(Error::PackagesRootMissing {
                path: packages_root.to_path_buf(),
            });
        }

        let mut map = PackageMap::default();

        let walker = WalkDir::new(packages_root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable package directory: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            if self.is_excluded(&name) {
                debug!("Skipping non-runtime directory: {}", name);
                continue;
            }

            match self.resolve_package(packages_root, &name) {
                Ok(Some(package)) => {
                    debug!("Resolved package {} -> {}", package.name, package.entry_path.display());
                    map.insert(package);
                }
                Ok(None) => debug!("Skipping package without entry file: {}", name),
                Err(e) => warn!("Skipping package {}: {}", name, e),
            }
        }

        info!("Resolved {} package(s) from {}", map.len(), packages_root.display());

        Ok(map)
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.options.exclude.iter().any(|excluded| excluded == name)
    }

    /// Resolve a single package directory
    fn resolve_package(&self, packages_root: &Path, name: &str) -> Result<Option<PackageEntry>> {
        if let Some(replacement) = self.options.replacements.get(name) {
            debug!("Forcing {} to {}", name, replacement.display());
            return Ok(existing_entry(name, PathBuf::from(normalize_separators(replacement))));
        }

        let package_dir = packages_root.join(name);
        let declared = read_main(&package_dir.join(MANIFEST))?;

        let main = match declared {
            Some(main) if self.is_multi_build(name) => self.strip_build_variants(&main),
            Some(main) => main,
            None => format!("index.{}", self.options.default_extension),
        };
        let main = main.strip_prefix("./").unwrap_or(&main);

        let ext = &self.options.default_extension;
        let mut entry_path = PathBuf::from(normalize_separators(&package_dir.join(main)));
        if entry_path.extension().is_none() {
            let with_ext = entry_path.with_extension(ext);
            // `<main>/index` only when `<main>.<ext>` is absent
            entry_path = if !with_ext.is_file() && entry_path.is_dir() {
                entry_path.join(format!("index.{}", ext))
            } else {
                with_ext
            };
        }

        Ok(existing_entry(name, entry_path))
    }

    fn is_multi_build(&self, name: &str) -> bool {
        self.options.multi_build.iter().any(|fragment| name.contains(fragment.as_str()))
    }

    fn strip_build_variants(&self, main: &str) -> String {
        self.options
            .build_variants
            .iter()
            .fold(main.to_string(), |main, variant| main.replace(variant.as_str(), ""))
    }
}

/// Read the `"main"` field of a manifest; a missing manifest declares nothing
fn read_main(manifest: &Path) -> Result<Option<String>> {
    let content = match fs::read_to_string(manifest) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::read(manifest, e)),
    };

    let value: serde_json::Value = serde_json::from_str(&content).map_err(|source| Error::Manifest {
        path: manifest.to_path_buf(),
        source,
    })?;

    Ok(value
        .get("main")
        .and_then(|main| main.as_str())
        .filter(|main| !main.trim().is_empty())
        .map(str::to_string))
}

fn existing_entry(name: &str, entry_path: PathBuf) -> Option<PackageEntry> {
    entry_path.is_file().then(|| PackageEntry {
        name: name.to_string(),
        entry_path,
    })
}
