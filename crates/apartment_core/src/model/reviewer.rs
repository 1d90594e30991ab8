//! Reviewer domain model.

use super::keys::{ReviewKey, ReviewerId};
use super::person::PersonInfo;
use super::validation::ValidationError;
use serde::{Deserialize, Serialize};

/// A person authoring zero or more reviews.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reviewer {
    #[serde(skip_deserializing)]
    pub(crate) id: Option<ReviewerId>,
    #[serde(flatten)]
    pub person: PersonInfo,
    #[serde(skip)]
    pub(crate) reviews: Vec<ReviewKey>,
}

impl Reviewer {
    pub fn new(person: PersonInfo) -> Self {
        Self {
            person,
            ..Self::default()
        }
    }

    pub fn id(&self) -> Option<ReviewerId> {
        self.id
    }

    /// Reviews written by this reviewer, in the order they were added.
    pub fn reviews(&self) -> &[ReviewKey] {
        &self.reviews
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.person.validate()
    }
}
