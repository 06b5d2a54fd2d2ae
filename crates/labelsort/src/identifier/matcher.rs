use regex::Regex;

use crate::error::ConfigError;

/// Finds the first identifier code in recognized text.
///
/// An identifier is the configured literal prefix followed by one or more
/// ASCII word characters. The prefix may occur anywhere in the text.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Regex,
}

impl PatternMatcher {
    pub fn new(prefix: &str) -> Result<Self, ConfigError> {
        let pattern = format!("{}[A-Za-z0-9_]+", regex::escape(prefix));
        let regex = Regex::new(&pattern).map_err(|e| ConfigError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { regex })
    }

    /// Returns the leftmost identifier, or `None` when the text has no match.
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex.find(text).map(|m| m.as_str())
    }
}
