//! Opt-in attribute validation.
//!
//! Entities accept any value on construction and assignment. These checks
//! run only when a caller asks for them (see `ServiceConfig::validate_writes`).

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lowest accepted review rating.
pub const MIN_RATING: i32 = 1;
/// Highest accepted review rating.
pub const MAX_RATING: i32 = 5;

/// Attribute-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Review rating is outside `MIN_RATING..=MAX_RATING`.
    RatingOutOfRange(i32),
    /// A count or amount attribute is below zero.
    NegativeAttribute { field: &'static str, value: i32 },
    /// Person age is below zero.
    NegativeAge(i32),
    /// Person email does not look like `local@domain.tld`.
    InvalidEmail(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RatingOutOfRange(value) => write!(
                f,
                "rating {value} is outside {MIN_RATING}..={MAX_RATING}"
            ),
            Self::NegativeAttribute { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            Self::NegativeAge(value) => write!(f, "age must not be negative, got {value}"),
            Self::InvalidEmail(value) => write!(f, "invalid email address `{value}`"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn non_negative(field: &'static str, value: i32) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::NegativeAttribute { field, value });
    }
    Ok(())
}

pub(crate) fn non_negative_opt(
    field: &'static str,
    value: Option<i32>,
) -> Result<(), ValidationError> {
    match value {
        Some(value) => non_negative(field, value),
        None => Ok(()),
    }
}
