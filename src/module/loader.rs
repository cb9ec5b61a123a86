//! On-demand module serving for package entry files

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use super::ModuleContent;
use crate::error::{Error, Result};
use crate::resolver::PackageMap;
use crate::utils::is_contained;

/// What the HTTP layer should send back for a module request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServeOutcome {
    /// Module text wrapped in memory
    Generated(String),

    /// Entry file is already an AMD module; transmit it directly
    File(PathBuf),

    /// Not a known package; look the request up under the public directory
    Static(PathBuf),

    /// Request points outside the public directory
    NotFound,
}

/// Derive a package name from a request path (`/vue.js` -> `vue`)
pub fn module_name(request_path: &str) -> String {
    let name = request_path.replace('/', "");
    match name.strip_suffix(".js") {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}

/// Serves resolved package entry files as AMD modules
#[derive(Debug, Clone)]
pub struct ModuleServer {
    packages: Arc<PackageMap>,
    public_dir: PathBuf,
}

impl ModuleServer {
    /// Create a module server over a resolved package map
    pub fn new(packages: Arc<PackageMap>, public_dir: impl Into<PathBuf>) -> Self {
        Self {
            packages,
            public_dir: public_dir.into(),
        }
    }

    /// Decide how to answer a module request
    ///
    /// Read failures on a mapped entry file are returned to the caller.
    pub async fn serve(&self, request_path: &str) -> Result<ServeOutcome> {
        let name = module_name(request_path);
        debug!("Request module: {}", name);

        if let Some(entry) = self.packages.get(&name) {
            debug!("Found package: {}", entry.display());

            let bytes = tokio::fs::read(entry)
                .await
                .map_err(|e| Error::read(entry, e))?;
            let content = ModuleContent::from_bytes(&bytes);

            if content.wrapped {
                return Ok(ServeOutcome::File(entry.to_path_buf()));
            }
            return Ok(ServeOutcome::Generated(content.into_module()));
        }

        let relative = Path::new(request_path.trim_start_matches('/'));
        if !is_contained(relative) {
            warn!("Refusing module request outside public directory: {}", request_path);
            return Ok(ServeOutcome::NotFound);
        }

        let file = self.public_dir.join(relative);
        debug!("Looking for: {}", file.display());
        Ok(ServeOutcome::Static(file))
    }
}
