//! Static bundle assembly
//!
//! Expands an ordered list of path specifications and concatenates the
//! files into two buffers: minified scripts wrapped in inline `<script>`
//! tags, and raw stylesheet text.

mod path_spec;

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::transform::{Minifier, Passthrough, StripMinifier};
use crate::utils::decode_text;

pub use path_spec::{expand, PathSpec};

/// Assembled bundle output
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BundleResult {
    /// Inline `<script>` markup, one line per script file
    pub scripts: String,

    /// Stylesheet text, one entry per stylesheet file
    pub styles: String,
}

impl BundleResult {
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty() && self.styles.is_empty()
    }
}

/// Builds [`BundleResult`]s from path specifications
pub struct BundleAssembler {
    /// Script minifier
    minifier: Arc<dyn Minifier>,
}

impl BundleAssembler {
    /// Create an assembler using the given minifier
    pub fn new(minifier: Arc<dyn Minifier>) -> Self {
        Self { minifier }
    }

    /// Create an assembler honouring `bundle.minify`
    pub fn from_config(config: &Config) -> Self {
        if config.bundle.minify {
            Self::new(Arc::new(StripMinifier))
        } else {
            Self::new(Arc::new(Passthrough))
        }
    }

    /// Assemble a bundle from classified specifications
    ///
    /// Any unreadable file aborts the whole pass.
    pub fn assemble(&self, specs: &[PathSpec]) -> Result<BundleResult> {
        let start = Instant::now();
        let mut result = BundleResult::default();
        let mut count = 0;

        for spec in specs {
            for file in spec.expand()? {
                self.process_file(&file, &mut result)?;
                count += 1;
            }
        }

        info!("Bundled {} file(s) in {:?}", count, start.elapsed());

        Ok(result)
    }

    /// Classify specification strings, then assemble them
    pub fn assemble_paths<S: AsRef<str>>(&self, specs: &[S]) -> Result<BundleResult> {
        let specs: Vec<PathSpec> = specs.iter().map(|s| PathSpec::parse(s.as_ref())).collect();
        self.assemble(&specs)
    }

    fn process_file(&self, path: &Path, result: &mut BundleResult) -> Result<()> {
        let bytes = fs::read(path).map_err(|e| Error::read(path, e))?;
        let text = decode_text(&bytes);

        if is_script(path) {
            debug!("Bundling script: {}", path.display());
            result.scripts.push_str("<script>");
            result.scripts.push_str(&self.minifier.minify(&text));
            result.scripts.push_str("</script>\n");
        } else {
            debug!("Bundling stylesheet: {}", path.display());
            result.styles.push_str(&text);
            result.styles.push('\n');
        }

        Ok(())
    }
}

fn is_script(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("js")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    struct Upper;

    impl Minifier for Upper {
        fn minify(&self, source: &str) -> String {
            source.to_uppercase()
        }
    }

    fn write(root: &Path, relative: &str, content: &str) -> String {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path.display().to_string()
    }

    #[test]
    fn test_scripts_follow_input_order() {
        let dir = TempDir::new().unwrap();
        let b = write(dir.path(), "b.js", "var b;");
        let a = write(dir.path(), "a.js", "var a;");

        let result = BundleAssembler::new(Arc::new(Upper)).assemble_paths(&[b, a]).unwrap();

        assert_eq!(result.scripts, "<script>VAR B;</script>\n<script>VAR A;</script>\n");
        assert!(result.styles.is_empty());
    }

    #[test]
    fn test_styles_are_not_minified() {
        let dir = TempDir::new().unwrap();
        let css = write(dir.path(), "site.css", "body {  color: red; }");

        let result = BundleAssembler::new(Arc::new(Upper)).assemble_paths(&[css]).unwrap();

        assert_eq!(result.styles, "body {  color: red; }\n");
        assert!(result.scripts.is_empty());
    }

    #[test]
    fn test_legacy_encodings_and_byte_order_marks_are_tolerated() {
        let dir = TempDir::new().unwrap();
        let css = dir.path().join("legacy.css");
        fs::write(&css, b"/* \xa9 vendor */ p{}").unwrap();
        let js = dir.path().join("bom.js");
        fs::write(&js, "\u{feff}run()").unwrap();

        let result = BundleAssembler::new(Arc::new(Passthrough))
            .assemble_paths(&[css.display().to_string(), js.display().to_string()])
            .unwrap();

        assert_eq!(result.styles, "/* \u{fffd} vendor */ p{}\n");
        assert_eq!(result.scripts, "<script>run()</script>\n");
    }

    #[test]
    fn test_globs_and_literals_mix() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "styles/a.css", ".a{}");
        write(dir.path(), "styles/nested/b.css", ".b{}");
        write(dir.path(), "scripts/lib/x.js", "x()");
        let main = write(dir.path(), "main.js", "main()");

        let specs = vec![
            format!("{}/styles/*.css", dir.path().display()),
            format!("{}/scripts/**/*.js", dir.path().display()),
            main,
        ];
        let result = BundleAssembler::new(Arc::new(Passthrough)).assemble_paths(&specs).unwrap();

        assert_eq!(result.styles, ".a{}\n");
        assert_eq!(result.scripts, "<script>x()</script>\n<script>main()</script>\n");
    }

    #[test]
    fn test_missing_file_fails_whole_pass() {
        let dir = TempDir::new().unwrap();
        let ok = write(dir.path(), "ok.js", "ok()");
        let missing = dir.path().join("missing.js").display().to_string();

        let err = BundleAssembler::new(Arc::new(Passthrough))
            .assemble_paths(&[ok, missing])
            .unwrap_err();

        assert!(matches!(err, Error::Read { .. }));
    }
}
