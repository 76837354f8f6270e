//! Extracting verification codes from email bodies.

use crate::{Email, Error, Result};
use regex::Regex;
use std::sync::LazyLock;

const DEFAULT_PATTERN: &str = r"Your code is: ([0-9]{3})(?:[^0-9]|$)";

static DEFAULT_CODE: LazyLock<CodePattern> = LazyLock::new(|| CodePattern {
    regex: Regex::new(DEFAULT_PATTERN).unwrap(),
});

/// Extract the three-digit code from `Your code is: NNN`.
///
/// Exactly three digits are accepted; `Your code is: 12` and
/// `Your code is: 1234` are both [`Error::CodeNotFound`].
///
/// # Examples
/// ```
/// assert_eq!(mailslurp_client::extract_code("Your code is: 123").unwrap(), "123");
/// assert!(mailslurp_client::extract_code("Your code is: 12").is_err());
/// ```
pub fn extract_code(body: &str) -> Result<&str> {
    DEFAULT_CODE.extract(body)
}

/// A compiled pattern whose first capture group is the code.
#[derive(Debug, Clone)]
pub struct CodePattern {
    regex: Regex,
}

impl CodePattern {
    /// Compile a custom pattern, e.g. `verification code is (\d+)`.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        if regex.captures_len() < 2 {
            return Err(Error::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "pattern needs a capture group for the code".to_string(),
            });
        }

        Ok(Self { regex })
    }

    /// First captured code in `body`.
    pub fn extract<'a>(&self, body: &'a str) -> Result<&'a str> {
        self.regex
            .captures(body)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| Error::CodeNotFound {
                pattern: self.regex.as_str().to_string(),
            })
    }
}

impl Email {
    /// Extract the default three-digit code from the body.
    pub fn extract_code(&self) -> Result<&str> {
        extract_code(&self.body)
    }
}
