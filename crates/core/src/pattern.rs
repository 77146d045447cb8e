//! Wildcard matching on base names
//!
//! Only `*` is special: it matches any run of characters (including none).
//! Anything else must match literally, so `*.rs`, `mod*`, `test_*_data.txt`
//! and `Cargo.toml` are all valid patterns.

use crate::error::FsError;
use std::fmt;
use std::str::FromStr;

/// A `*`-wildcard pattern matched against file base names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern {
    raw: String,
    parts: Vec<String>,
}

impl NamePattern {
    /// Parse a pattern
    pub fn new(pattern: &str) -> Result<Self, FsError> {
        if pattern.is_empty() {
            return Err(FsError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "pattern is empty".to_string(),
            });
        }
        if pattern.contains('/') || pattern.contains(std::path::MAIN_SEPARATOR) {
            return Err(FsError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "patterns match base names and cannot contain separators".to_string(),
            });
        }

        Ok(Self {
            raw: pattern.to_string(),
            parts: pattern.split('*').map(str::to_string).collect(),
        })
    }

    /// Check whether `name` matches
    pub fn matches(&self, name: &str) -> bool {
        // No wildcard: exact match
        if self.parts.len() == 1 {
            return name == self.parts[0];
        }

        let first = &self.parts[0];
        let last = &self.parts[self.parts.len() - 1];
        if name.len() < first.len() + last.len()
            || !name.starts_with(first.as_str())
            || !name.ends_with(last.as_str())
        {
            return false;
        }

        // Middle segments must appear in order between prefix and suffix
        let mut rest = &name[first.len()..name.len() - last.len()];
        for part in &self.parts[1..self.parts.len() - 1] {
            match rest.find(part.as_str()) {
                Some(idx) => rest = &rest[idx + part.len()..],
                None => return false,
            }
        }
        true
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for NamePattern {
    type Err = FsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
