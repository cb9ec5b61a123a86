//! Configuration schema definitions

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Project metadata configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name, used as the default page title
    #[serde(default = "default_name")]
    pub name: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self { name: default_name() }
    }
}

fn default_name() -> String {
    "my-app".to_string()
}

/// Installed-packages resolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagesConfig {
    /// Installed-packages root directory
    #[serde(default = "default_packages_root")]
    pub root: String,

    /// Directory names that never hold loadable runtime packages
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Package name fragments identifying multi-build libraries
    #[serde(default = "default_multi_build")]
    pub multi_build: Vec<String>,

    /// Build-variant suffixes stripped from multi-build main paths
    #[serde(default = "default_build_variants")]
    pub build_variants: Vec<String>,

    /// Extension appended to extension-less main paths
    #[serde(default = "default_extension")]
    pub default_extension: String,

    /// Packages forced to a project-local entry file
    #[serde(default = "default_replace")]
    pub replace: HashMap<String, String>,
}

impl Default for PackagesConfig {
    fn default() -> Self {
        Self {
            root: default_packages_root(),
            exclude: default_exclude(),
            multi_build: default_multi_build(),
            build_variants: default_build_variants(),
            default_extension: default_extension(),
            replace: default_replace(),
        }
    }
}

fn default_packages_root() -> String {
    "node_modules".to_string()
}

fn default_exclude() -> Vec<String> {
    vec![".bin".to_string(), "@types".to_string()]
}

fn default_multi_build() -> Vec<String> {
    vec!["vue".to_string()]
}

fn default_build_variants() -> Vec<String> {
    vec![".common".to_string(), ".runtime".to_string()]
}

fn default_extension() -> String {
    "js".to_string()
}

fn default_replace() -> HashMap<String, String> {
    let mut map = HashMap::new();
    map.insert("got".to_string(), "wwwroot/got.js".to_string());
    map
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Public web-asset directory used for static fallback
    #[serde(default = "default_public_dir")]
    pub public_dir: String,

    /// Directories scanned recursively for font files
    #[serde(default = "default_font_dirs")]
    pub font_dirs: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_dir: default_public_dir(),
            font_dirs: default_font_dirs(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_public_dir() -> String {
    "wwwroot".to_string()
}

fn default_font_dirs() -> Vec<String> {
    vec![
        "wwwroot/styles".to_string(),
        "node_modules/font-awesome/fonts".to_string(),
    ]
}

/// Static bundle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Ordered path specifications (literal, `*` or `**`)
    #[serde(default)]
    pub paths: Vec<String>,

    /// Minify scripts before embedding them
    #[serde(default = "default_true")]
    pub minify: bool,

    /// Output directory for `modserve bundle`
    #[serde(default = "default_outdir")]
    pub outdir: String,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            minify: true,
            outdir: default_outdir(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_outdir() -> String {
    "dist".to_string()
}
