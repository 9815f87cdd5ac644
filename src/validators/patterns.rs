//! Compiled `pattern` facet cache
//!
//! XSD regular expressions are close to, but not the same as, the `regex`
//! dialect. A small subset is rewritten before compiling and the result is
//! memoized per validator, keyed by the facet text as written in the schema.

use papaya::HashMap as PapayaMap;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

/// Facet pattern that does not compile after translation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid pattern: {pattern}")]
pub struct PatternError {
    /// Facet pattern as written in the schema
    pub pattern: String,
    /// Compiler diagnostic for the translated expression
    pub reason: String,
}

/// XSD multi-character escapes and their `regex` equivalents
///
/// Order matters: `\i\c*` must be rewritten before the lone `\c`.
const ESCAPES: &[(&str, &str)] = &[
    (r"\i\c*", "[a-zA-Z_][a-zA-Z0-9_]*"),
    (r"\c", "[a-zA-Z0-9_]"),
    (r"\d", "[0-9]"),
    (r"\w", "[a-zA-Z0-9_]"),
];

/// Rewrite an XSD facet pattern into an anchored `regex` expression
///
/// The pattern is scanned one escape at a time, so an escaped backslash
/// (`\\`) is copied through and never starts a rewrite.
pub fn translate_pattern(pattern: &str) -> String {
    let mut body = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(pos) = rest.find('\\') {
        body.push_str(&rest[..pos]);
        let escape = &rest[pos..];

        match ESCAPES.iter().find(|(from, _)| escape.starts_with(from)) {
            Some((from, to)) => {
                body.push_str(to);
                rest = &escape[from.len()..];
            }
            None => {
                let len = escape[1..].chars().next().map_or(1, |c| 1 + c.len_utf8());
                body.push_str(&escape[..len]);
                rest = &escape[len..];
            }
        }
    }
    body.push_str(rest);

    format!("^(?:{})$", body)
}

/// Concurrent memo table of compiled facet patterns
///
/// Entries are never evicted. Two threads missing on the same key may both
/// compile; the later insert wins and both results are equivalent.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: PapayaMap<String, Regex>,
}

impl PatternCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiled, anchored form of `pattern`
    pub fn compile(&self, pattern: &str) -> Result<Regex, PatternError> {
        let guard = self.compiled.pin();
        if let Some(regex) = guard.get(pattern) {
            return Ok(regex.clone());
        }

        let translated = translate_pattern(pattern);
        debug!(pattern, translated = %translated, "compiling facet pattern");
        let regex = Regex::new(&translated).map_err(|e| PatternError {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        guard.insert(pattern.to_string(), regex.clone());
        Ok(regex)
    }

    /// Whether `value` fully matches `pattern`
    pub fn is_match(&self, pattern: &str, value: &str) -> Result<bool, PatternError> {
        Ok(self.compile(pattern)?.is_match(value))
    }

    /// Number of distinct facet patterns compiled so far
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    /// Whether nothing has been compiled yet
    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}
