//! Font lookup by file name
//!
//! Stylesheets reference fonts as `/fonts/<file>`; the files themselves live
//! in the public directory or inside installed icon-font packages.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::utils::normalize_separators;

/// Font file name to path
#[derive(Debug, Default, Clone)]
pub struct FontMap {
    fonts: HashMap<String, PathBuf>,
}

impl FontMap {
    /// Walk each directory recursively; earlier directories win on name clashes
    pub fn scan<P: AsRef<Path>>(dirs: &[P]) -> Self {
        let mut fonts = HashMap::new();

        for dir in dirs {
            let dir = dir.as_ref();
            if !dir.is_dir() {
                warn!("Font directory not found: {}", dir.display());
                continue;
            }

            for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
                if !entry.file_type().is_file() {
                    continue;
                }
                let name = entry.file_name().to_string_lossy().to_string();
                fonts
                    .entry(name)
                    .or_insert_with(|| PathBuf::from(normalize_separators(entry.path())));
            }
        }

        debug!("Mapped {} font file(s)", fonts.len());
        Self { fonts }
    }

    /// Find a font by the file name of a request path
    pub fn get(&self, request_path: &str) -> Option<&Path> {
        let name = Path::new(request_path).file_name()?.to_str()?;
        self.fonts.get(name).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}
