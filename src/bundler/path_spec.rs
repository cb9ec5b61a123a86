//! Path specification classification and expansion

use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobBuilder, GlobMatcher};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// A bundle path specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSpec {
    /// A concrete file
    Literal(PathBuf),

    /// `*` pattern matched against files directly inside `dir`
    SingleLevelGlob { dir: PathBuf, pattern: String },

    /// `**` pattern matched against files anywhere below `dir`
    RecursiveGlob { dir: PathBuf, pattern: String },
}

impl PathSpec {
    /// Classify a specification string
    pub fn parse(spec: &str) -> Self {
        let Some(star) = spec.find('*') else {
            return PathSpec::Literal(PathBuf::from(spec));
        };

        // base directory is the last complete directory before the first wildcard
        let split = spec[..star].rfind(['/', '\\']).map_or(0, |sep| sep + 1);
        let dir = match spec[..split].trim_end_matches(['/', '\\']) {
            "" if split > 0 => PathBuf::from("/"),
            "" => PathBuf::from("."),
            dir => PathBuf::from(dir),
        };
        let pattern = spec[split..].to_string();

        if spec.contains("**") {
            PathSpec::RecursiveGlob { dir, pattern }
        } else {
            PathSpec::SingleLevelGlob { dir, pattern }
        }
    }

    /// Expand into concrete file paths
    ///
    /// Files are returned sorted by name within each directory.
    pub fn expand(&self) -> Result<Vec<PathBuf>> {
        match self {
            PathSpec::Literal(path) => Ok(vec![path.clone()]),
            PathSpec::SingleLevelGlob { dir, pattern } => {
                let matcher = compile(pattern)?;
                walk(dir, Some(1), |relative| matcher.is_match(relative))
            }
            PathSpec::RecursiveGlob { dir, pattern } => {
                let matcher = compile(&recursive_pattern(pattern))?;
                walk(dir, None, |relative| matcher.is_match(relative))
            }
        }
    }
}

impl From<&str> for PathSpec {
    fn from(spec: &str) -> Self {
        PathSpec::parse(spec)
    }
}

/// Classify and expand a specification string
pub fn expand(spec: &str) -> Result<Vec<PathBuf>> {
    PathSpec::parse(spec).expand()
}

fn compile(pattern: &str) -> Result<GlobMatcher> {
    let glob: Glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| Error::InvalidPattern {
            spec: pattern.to_string(),
            source,
        })?;
    Ok(glob.compile_matcher())
}

/// `**.js` means `**/*.js`; globset only accepts `**` as a whole component
fn recursive_pattern(pattern: &str) -> String {
    match pattern.strip_prefix("**") {
        Some("") => "**/*".to_string(),
        Some(rest) if !rest.starts_with('/') => format!("**/*{}", rest),
        _ => pattern.to_string(),
    }
}

fn walk(dir: &Path, max_depth: Option<usize>, matches: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let mut walker = WalkDir::new(dir).min_depth(1).sort_by_file_name();
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            Error::read(path, io::Error::from(e))
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
        if matches(relative) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
