//! Identity fields shared by every human actor.

use super::validation::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Name, email and age of an owner or reviewer.
///
/// Embedded by value in `Owner` and `Reviewer`; it has no storage of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Unchecked unless `validate()` is called.
    pub age: i32,
}

impl PersonInfo {
    /// Creates a person with all three fields set.
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: i32) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            age,
        }
    }

    /// Creates a person with only a name; email stays unset and age is zero.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Checks age sign and, when present, email shape.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.age < 0 {
            return Err(ValidationError::NegativeAge(self.age));
        }
        if let Some(email) = self.email.as_deref() {
            if !EMAIL_RE.is_match(email) {
                return Err(ValidationError::InvalidEmail(email.to_string()));
            }
        }
        Ok(())
    }
}
