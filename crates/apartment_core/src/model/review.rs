//! Review domain model.

use super::keys::{ApartmentKey, ReviewId, ReviewerKey};
use super::validation::{ValidationError, MAX_RATING, MIN_RATING};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Feedback written by one reviewer about one apartment.
///
/// `Review::default()` leaves every field unset, including `date`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Review {
    #[serde(skip_deserializing)]
    pub(crate) id: Option<ReviewId>,
    /// Expected within `1..=5`; only `validate()` enforces it.
    pub rating: i32,
    pub comment: Option<String>,
    pub date: Option<NaiveDate>,
    pub title: Option<String>,
    #[serde(skip)]
    pub(crate) reviewer: Option<ReviewerKey>,
    #[serde(skip)]
    pub(crate) apartment: Option<ApartmentKey>,
}

impl Review {
    /// Creates a review dated today (local calendar date).
    pub fn rated(rating: i32, comment: impl Into<String>) -> Self {
        Self {
            rating,
            comment: Some(comment.into()),
            date: Some(Local::now().date_naive()),
            ..Self::default()
        }
    }

    pub fn id(&self) -> Option<ReviewId> {
        self.id
    }

    pub fn reviewer(&self) -> Option<ReviewerKey> {
        self.reviewer
    }

    pub fn apartment(&self) -> Option<ApartmentKey> {
        self.apartment
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(ValidationError::RatingOutOfRange(self.rating));
        }
        Ok(())
    }
}
