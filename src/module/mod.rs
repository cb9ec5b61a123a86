//! AMD module wrapping
//!
//! Package entry files are served to the browser as AMD modules. Files that
//! already call `define` are passed through; anything else (CommonJS, plain
//! scripts) is wrapped in a `define` envelope exposing `require`, `exports`
//! and `module`.

mod loader;

use std::borrow::Cow;

use crate::utils::decode_text;

pub use loader::{module_name, ModuleServer, ServeOutcome};

/// Token every AMD module source starts with
pub const DEFINE_TOKEN: &str = "define";

const ENVELOPE_START: &str = "define(function (require, exports, module) {\n";
const ENVELOPE_END: &str = "\n});";

/// Check whether source is already an AMD module
pub fn is_wrapped(source: &str) -> bool {
    source.starts_with(DEFINE_TOKEN)
}

/// Wrap source in the AMD envelope unless it already is a module
pub fn wrap(source: &str) -> Cow<'_, str> {
    if is_wrapped(source) {
        Cow::Borrowed(source)
    } else {
        Cow::Owned(format!("{}{}{}", ENVELOPE_START, source, ENVELOPE_END))
    }
}

/// Raw module source along with its wrapping state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleContent {
    pub text: String,
    pub wrapped: bool,
}

impl ModuleContent {
    pub fn new(text: String) -> Self {
        let text = match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        };
        let wrapped = is_wrapped(&text);
        Self { text, wrapped }
    }

    /// Decode raw file bytes, tolerating a byte order mark and invalid UTF-8
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(decode_text(bytes))
    }

    /// Text ready to hand to an AMD loader
    pub fn into_module(self) -> String {
        if self.wrapped {
            self.text
        } else {
            wrap(&self.text).into_owned()
        }
    }
}
