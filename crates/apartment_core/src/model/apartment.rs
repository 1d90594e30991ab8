//! Apartment domain model.
//!
//! # Responsibility
//! - Hold the physical attributes of one rental unit.
//! - Reference its owner and reviews by graph key.
//!
//! # Invariants
//! - `owner`, when set, names an owner whose collection contains this key.
//! - `furnishing_status` is an open string; `FurnishingStatus` is advisory.

use super::keys::{ApartmentId, OwnerKey, ReviewKey};
use super::validation::{non_negative, non_negative_opt, ValidationError};
use serde::{Deserialize, Serialize};

/// Furnishing vocabulary observed in stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FurnishingStatus {
    Furnished,
    SemiFurnished,
    Unfurnished,
}

impl FurnishingStatus {
    /// Canonical stored spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Furnished => "furnished",
            Self::SemiFurnished => "semi-furnished",
            Self::Unfurnished => "unfurnished",
        }
    }

    /// Recognizes the known spellings, ignoring case and surrounding spaces.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "furnished" => Some(Self::Furnished),
            "semi-furnished" | "semifurnished" | "semi_furnished" => Some(Self::SemiFurnished),
            "unfurnished" => Some(Self::Unfurnished),
            _ => None,
        }
    }
}

/// A rental unit owned by at most one owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Apartment {
    #[serde(skip_deserializing)]
    pub(crate) id: Option<ApartmentId>,
    pub price: Option<i32>,
    /// Square meters.
    pub area: Option<i32>,
    pub bedroom_count: Option<i32>,
    pub bathroom_count: Option<i32>,
    pub story_count: Option<i32>,
    pub has_main_road_access: bool,
    pub has_guestroom: bool,
    pub has_basement: bool,
    pub has_hot_water: bool,
    pub has_heating: bool,
    pub has_air_conditioning: bool,
    pub parking_spaces: i32,
    pub is_in_preferred_area: bool,
    pub furnishing_status: Option<String>,
    #[serde(skip)]
    pub(crate) owner: Option<OwnerKey>,
    #[serde(skip)]
    pub(crate) reviews: Vec<ReviewKey>,
}

impl Apartment {
    pub fn id(&self) -> Option<ApartmentId> {
        self.id
    }

    pub fn owner(&self) -> Option<OwnerKey> {
        self.owner
    }

    pub fn reviews(&self) -> &[ReviewKey] {
        &self.reviews
    }

    /// Interprets `furnishing_status` against the known vocabulary.
    ///
    /// Returns `None` when unset or when the stored value is not recognized.
    pub fn furnishing_kind(&self) -> Option<FurnishingStatus> {
        self.furnishing_status
            .as_deref()
            .and_then(FurnishingStatus::parse)
    }

    pub fn set_furnishing(&mut self, status: FurnishingStatus) {
        self.furnishing_status = Some(status.as_str().to_string());
    }

    /// Rejects negative price, area, room, story and parking counts.
    pub fn validate(&self) -> Result<(), ValidationError> {
        non_negative_opt("price", self.price)?;
        non_negative_opt("area", self.area)?;
        non_negative_opt("bedroom_count", self.bedroom_count)?;
        non_negative_opt("bathroom_count", self.bathroom_count)?;
        non_negative_opt("story_count", self.story_count)?;
        non_negative("parking_spaces", self.parking_spaces)?;
        Ok(())
    }
}
