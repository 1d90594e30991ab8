//! Owner domain model.
//!
//! # Invariants
//! - `apartments` keeps insertion order and may hold the same key twice.
//! - Every key in `apartments` points at an apartment whose owner is this one.

use super::keys::{ApartmentKey, OwnerId};
use super::person::PersonInfo;
use super::validation::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A person holding zero or more apartments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Owner {
    #[serde(skip_deserializing)]
    pub(crate) id: Option<OwnerId>,
    #[serde(flatten)]
    pub person: PersonInfo,
    pub is_active: bool,
    pub is_business: bool,
    /// External legal identifier (national id, company registration).
    pub legal_owner_id: Option<String>,
    pub registration_date: Option<NaiveDate>,
    /// Stored as given; never derived from `registration_date`.
    pub days_as_owner: i32,
    #[serde(skip)]
    pub(crate) apartments: Vec<ApartmentKey>,
}

impl Owner {
    /// Creates an unsaved owner with no apartments.
    pub fn new(person: PersonInfo) -> Self {
        Self {
            person,
            ..Self::default()
        }
    }

    /// Persisted id, `None` until the first save.
    pub fn id(&self) -> Option<OwnerId> {
        self.id
    }

    /// Apartments held by this owner, in the order they were added.
    pub fn apartments(&self) -> &[ApartmentKey] {
        &self.apartments
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.person.validate()
    }
}
