//! Compiled regular expressions with Python `re.match` / `re.search` semantics.

use regex::Regex;

use crate::config::ConfigError;

/// A validated regular expression, compiled once.
///
/// A *matching* pattern is anchored at the start of the subject but not at
/// the end. A *searching* pattern may match anywhere.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    compiled: Regex,
}

impl Pattern {
    /// Compiles a pattern that must match at the start of the subject.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRegex`] if `raw` is not a valid regex.
    pub fn matching(raw: &str) -> Result<Self, ConfigError> {
        Self::compile(raw, &format!("^(?:{raw})"))
    }

    /// Compiles a pattern that may match anywhere in the subject.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRegex`] if `raw` is not a valid regex.
    pub fn searching(raw: &str) -> Result<Self, ConfigError> {
        Self::compile(raw, raw)
    }

    fn compile(raw: &str, effective: &str) -> Result<Self, ConfigError> {
        let compiled = Regex::new(effective).map_err(|e| ConfigError::InvalidRegex {
            pattern: raw.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            raw: raw.to_string(),
            compiled,
        })
    }

    /// Tests `subject` against this pattern.
    #[must_use]
    pub fn is_match(&self, subject: &str) -> bool {
        self.compiled.is_match(subject)
    }

    /// The pattern as written in the configuration.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
