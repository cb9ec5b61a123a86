//! Script minification
//!
//! The bundler only sees the [`Minifier`] trait, so the stripping minifier
//! below can be swapped for a real one or for a pass-through in tests.

/// Pure text-to-text script minifier
pub trait Minifier: Send + Sync {
    fn minify(&self, source: &str) -> String;
}

/// Leaves scripts untouched
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl Minifier for Passthrough {
    fn minify(&self, source: &str) -> String {
        source.to_string()
    }
}

/// Strips comments and collapses whitespace outside of string, template and
/// regex literals. Line breaks inside a whitespace run are kept so automatic
/// semicolon insertion still applies.
#[derive(Debug, Default, Clone, Copy)]
pub struct StripMinifier;

impl Minifier for StripMinifier {
    fn minify(&self, source: &str) -> String {
        let mut result = String::with_capacity(source.len());
        let mut chars = source.chars().peekable();
        // pending whitespace run: None, Some(false) = spaces, Some(true) = had newline
        let mut pending: Option<bool> = None;

        while let Some(c) = chars.next() {
            if c.is_whitespace() {
                pending = Some(pending.unwrap_or(false) || c == '\n');
                continue;
            }

            if c == '/' {
                match chars.peek() {
                    Some('/') => {
                        for next in chars.by_ref() {
                            if next == '\n' {
                                pending = Some(true);
                                break;
                            }
                        }
                        continue;
                    }
                    Some('*') => {
                        chars.next();
                        let mut prev = ' ';
                        for next in chars.by_ref() {
                            if prev == '*' && next == '/' {
                                break;
                            }
                            prev = next;
                        }
                        pending.get_or_insert(false);
                        continue;
                    }
                    _ => {}
                }
            }

            if let Some(newline) = pending.take() {
                if !result.is_empty() {
                    result.push(if newline { '\n' } else { ' ' });
                }
            }

            if c == '"' || c == '\'' || c == '`' {
                result.push(c);
                copy_literal(&mut chars, &mut result, c);
                continue;
            }

            if c == '/' && starts_regex(&result) {
                result.push(c);
                copy_regex(&mut chars, &mut result);
                continue;
            }

            result.push(c);
        }

        result
    }
}

/// Copy a quoted literal up to and including its closing quote
fn copy_literal(chars: &mut impl Iterator<Item = char>, out: &mut String, quote: char) {
    let mut escaped = false;
    for c in chars {
        out.push(c);
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            break;
        }
    }
}

fn copy_regex(chars: &mut impl Iterator<Item = char>, out: &mut String) {
    let mut escaped = false;
    let mut in_class = false;
    for c in chars {
        out.push(c);
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => break,
            '\n' => break,
            _ => {}
        }
    }
}

/// A slash starts a regex literal when no operand precedes it
fn starts_regex(emitted: &str) -> bool {
    let emitted = emitted.trim_end();
    // postfix increment/decrement closes an operand
    if emitted.ends_with("++") || emitted.ends_with("--") {
        return false;
    }
    match emitted.chars().last() {
        None => true,
        Some(prev) => "(,=:[!&|?{};+-*%<>~^".contains(prev) || emitted.ends_with("return"),
    }
}
