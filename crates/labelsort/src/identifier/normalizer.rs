use regex::Regex;

use crate::error::ConfigError;

/// Corrects OCR look-alike characters in the version segment of an identifier.
///
/// Only identifiers shaped `PREFIX + MARKER + VERSION + "_" + REST` are touched,
/// and only inside `VERSION`. Anything else is returned unchanged.
#[derive(Debug, Clone)]
pub struct PatternNormalizer {
    regex: Regex,
}

impl PatternNormalizer {
    pub fn new(prefix: &str, version_marker: &str) -> Result<Self, ConfigError> {
        let pattern = format!(
            r"(?s)^({}{})([^_]+)(_.*)$",
            regex::escape(prefix),
            regex::escape(version_marker)
        );
        let regex = Regex::new(&pattern).map_err(|e| ConfigError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { regex })
    }

    pub fn normalize(&self, identifier: &str) -> String {
        let Some(caps) = self.regex.captures(identifier) else {
            return identifier.to_string();
        };

        let head = &caps[1];
        let version: String = caps[2].chars().map(correct_confusable).collect();
        let rest = &caps[3];

        format!("{}{}{}", head, version, rest)
    }
}

fn correct_confusable(c: char) -> char {
    match c {
        'I' | 'i' | 'L' | 'l' => '1',
        'O' | 'o' => '0',
        other => other,
    }
}
