//! Package name to entry file mapping

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// A resolved package and the file it designates as its main module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageEntry {
    /// Package name (directory base name)
    pub name: String,

    /// Entry file, with forward-slash separators
    pub entry_path: PathBuf,
}

/// Resolved packages, keyed by name
///
/// Built once by [`PackageResolver`](super::PackageResolver) and read-only
/// afterwards; share it behind an `Arc`.
#[derive(Debug, Default, Clone)]
pub struct PackageMap {
    entries: HashMap<String, PathBuf>,
}

impl PackageMap {
    pub(crate) fn insert(&mut self, entry: PackageEntry) {
        self.entries.insert(entry.name, entry.entry_path);
    }

    /// Look up the entry file for a package
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.entries.get(name).map(PathBuf::as_path)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, sorted by package name
    pub fn entries(&self) -> Vec<PackageEntry> {
        let mut entries: Vec<PackageEntry> = self
            .entries
            .iter()
            .map(|(name, path)| PackageEntry {
                name: name.clone(),
                entry_path: path.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }
}

impl FromIterator<PackageEntry> for PackageMap {
    fn from_iter<I: IntoIterator<Item = PackageEntry>>(iter: I) -> Self {
        let mut map = PackageMap::default();
        for entry in iter {
            map.insert(entry);
        }
        map
    }
}
