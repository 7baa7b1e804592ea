//! Object labels
//!
//! Labels are the identity of scene objects. They are normalized to uppercase
//! on construction so `crate`, `Crate` and `CRATE` all address one object.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix reserved for objects parked during a rename transaction
const STAGING_PREFIX: &str = "__STAGE__";

const MAX_LABEL_LEN: usize = 64;

/// Reasons a string cannot be used as a label
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("label must not be empty")]
    Empty,
    #[error("label '{0}' is longer than 64 characters")]
    TooLong(String),
    #[error("label '{label}' contains invalid character '{ch}'")]
    InvalidChar { label: String, ch: char },
    #[error("label '{0}' uses the reserved '__' prefix")]
    Reserved(String),
}

/// A validated, uppercase object label
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Label(String);

impl Label {
    /// Normalize and validate a caller-supplied label
    pub fn new(raw: &str) -> Result<Self, LabelError> {
        let label = raw.trim().to_uppercase();
        if label.is_empty() {
            return Err(LabelError::Empty);
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(LabelError::TooLong(label));
        }
        if let Some(ch) = label
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(LabelError::InvalidChar { label, ch });
        }
        if label.starts_with("__") {
            return Err(LabelError::Reserved(label));
        }
        Ok(Self(label))
    }

    /// Label for the `index`-th generated object: A..Z, AA, AB, ...
    pub fn sequence(index: usize) -> Self {
        let mut n = index + 1;
        let mut out = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            out.push(b'A' + rem as u8);
            n = (n - 1) / 26;
        }
        out.reverse();
        Self(String::from_utf8_lossy(&out).into_owned())
    }

    /// Internal parking name; never accepted from callers
    pub(crate) fn staging(slot: usize) -> Self {
        Self(format!("{}{}", STAGING_PREFIX, slot))
    }

    pub fn is_staging(&self) -> bool {
        self.0.starts_with(STAGING_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Label {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Label::new(&value)
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.0
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_case_and_whitespace() {
        assert_eq!(Label::new("  crate_1 ").unwrap().as_str(), "CRATE_1");
    }

    #[test]
    fn test_rejects_bad_labels() {
        assert_eq!(Label::new("   "), Err(LabelError::Empty));
        assert!(matches!(
            Label::new("a b"),
            Err(LabelError::InvalidChar { ch: ' ', .. })
        ));
        assert!(matches!(Label::new("__stage__1"), Err(LabelError::Reserved(_))));
        assert!(matches!(
            Label::new(&"x".repeat(65)),
            Err(LabelError::TooLong(_))
        ));
    }

    #[test]
    fn test_sequence_labels() {
        assert_eq!(Label::sequence(0).as_str(), "A");
        assert_eq!(Label::sequence(25).as_str(), "Z");
        assert_eq!(Label::sequence(26).as_str(), "AA");
        assert_eq!(Label::sequence(27).as_str(), "AB");
        assert_eq!(Label::sequence(701).as_str(), "ZZ");
        assert_eq!(Label::sequence(702).as_str(), "AAA");
    }

    #[test]
    fn test_staging_labels_are_marked() {
        let staged = Label::staging(3);
        assert!(staged.is_staging());
        assert!(!Label::new("A").unwrap().is_staging());
        assert!(Label::new(staged.as_str()).is_err());
    }

    #[test]
    fn test_serde_validates() {
        let label: Label = serde_json::from_str("\"ramp_a_b\"").unwrap();
        assert_eq!(label.as_str(), "RAMP_A_B");
        assert!(serde_json::from_str::<Label>("\"\"").is_err());
    }
}
