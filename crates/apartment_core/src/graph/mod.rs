//! Arena-backed entity graph.
//!
//! # Responsibility
//! - Own every in-memory entity in one table per type, keyed by graph key.
//! - Maintain both sides of owner/apartment, reviewer/review and
//!   apartment/review links in a single operation.
//! - Track persisted ids (identity map) and rows queued for deletion.
//!
//! # Invariants
//! - A link operation either updates both sides or changes nothing.
//! - A child is linked to at most one parent of each kind.
//! - Detaching a child from an owning collection deletes the child
//!   (orphan removal); deleting a parent deletes its children.
//!
//! # See also
//! - crate::repo for the persistence side of cascades.

mod links;

use crate::model::apartment::Apartment;
use crate::model::keys::{
    ApartmentId, ApartmentKey, OwnerId, OwnerKey, ReviewId, ReviewKey, ReviewerId, ReviewerKey,
};
use crate::model::owner::Owner;
use crate::model::review::Review;
use crate::model::reviewer::Reviewer;
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type GraphResult<T> = Result<T, GraphError>;

/// Errors from graph link operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    UnknownOwner(OwnerKey),
    UnknownReviewer(ReviewerKey),
    UnknownApartment(ApartmentKey),
    UnknownReview(ReviewKey),
    /// Apartment already belongs to a different owner.
    ApartmentHasOtherOwner {
        apartment: ApartmentKey,
        owner: OwnerKey,
    },
    /// Review is already authored by a different reviewer.
    ReviewHasOtherReviewer {
        review: ReviewKey,
        reviewer: ReviewerKey,
    },
    /// Review is already attached to a different apartment.
    ReviewHasOtherApartment {
        review: ReviewKey,
        apartment: ApartmentKey,
    },
}

impl Display for GraphError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownOwner(key) => write!(f, "unknown {key}"),
            Self::UnknownReviewer(key) => write!(f, "unknown {key}"),
            Self::UnknownApartment(key) => write!(f, "unknown {key}"),
            Self::UnknownReview(key) => write!(f, "unknown {key}"),
            Self::ApartmentHasOtherOwner { apartment, owner } => {
                write!(f, "{apartment} already belongs to {owner}")
            }
            Self::ReviewHasOtherReviewer { review, reviewer } => {
                write!(f, "{review} is already authored by {reviewer}")
            }
            Self::ReviewHasOtherApartment { review, apartment } => {
                write!(f, "{review} is already attached to {apartment}")
            }
        }
    }
}

impl Error for GraphError {}

/// Persisted rows whose in-memory entity was removed from the graph.
///
/// Flushed by the next repository save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingDeletions {
    pub owners: Vec<OwnerId>,
    pub reviewers: Vec<ReviewerId>,
    pub apartments: Vec<ApartmentId>,
    pub reviews: Vec<ReviewId>,
}

impl PendingDeletions {
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
            && self.reviewers.is_empty()
            && self.apartments.is_empty()
            && self.reviews.is_empty()
    }
}

/// In-memory unit of work holding one connected set of rental entities.
#[derive(Debug, Default)]
pub struct RentalGraph {
    owners: BTreeMap<OwnerKey, Owner>,
    reviewers: BTreeMap<ReviewerKey, Reviewer>,
    apartments: BTreeMap<ApartmentKey, Apartment>,
    reviews: BTreeMap<ReviewKey, Review>,
    next_slot: u32,
    owner_ids: HashMap<OwnerId, OwnerKey>,
    reviewer_ids: HashMap<ReviewerId, ReviewerKey>,
    apartment_ids: HashMap<ApartmentId, ApartmentKey>,
    review_ids: HashMap<ReviewId, ReviewKey>,
    pending: PendingDeletions,
}

impl RentalGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_slot(&mut self) -> u32 {
        let slot = self.next_slot;
        self.next_slot += 1;
        slot
    }

    /// Adds an owner as a new, unsaved entity.
    ///
    /// Any id or relationship carried by the value is discarded.
    pub fn insert_owner(&mut self, mut owner: Owner) -> OwnerKey {
        owner.id = None;
        owner.apartments.clear();
        let key = OwnerKey(self.next_slot());
        self.owners.insert(key, owner);
        key
    }

    /// Adds a reviewer as a new, unsaved entity.
    pub fn insert_reviewer(&mut self, mut reviewer: Reviewer) -> ReviewerKey {
        reviewer.id = None;
        reviewer.reviews.clear();
        let key = ReviewerKey(self.next_slot());
        self.reviewers.insert(key, reviewer);
        key
    }

    /// Adds an apartment as a new, unsaved and unowned entity.
    pub fn insert_apartment(&mut self, mut apartment: Apartment) -> ApartmentKey {
        apartment.id = None;
        apartment.owner = None;
        apartment.reviews.clear();
        let key = ApartmentKey(self.next_slot());
        self.apartments.insert(key, apartment);
        key
    }

    /// Adds a review as a new, unsaved and unattached entity.
    pub fn insert_review(&mut self, mut review: Review) -> ReviewKey {
        review.id = None;
        review.reviewer = None;
        review.apartment = None;
        let key = ReviewKey(self.next_slot());
        self.reviews.insert(key, review);
        key
    }

    pub fn owner(&self, key: OwnerKey) -> Option<&Owner> {
        self.owners.get(&key)
    }

    /// Edits an owner's attributes in place and returns what `edit` returns.
    ///
    /// The persisted id and the apartment collection are put back after
    /// `edit` runs, so even replacing the whole value keeps the owner keyed
    /// and linked.
    pub fn edit_owner<T>(
        &mut self,
        key: OwnerKey,
        edit: impl FnOnce(&mut Owner) -> T,
    ) -> GraphResult<T> {
        let owner = self
            .owners
            .get_mut(&key)
            .ok_or(GraphError::UnknownOwner(key))?;
        let id = owner.id;
        let apartments = owner.apartments.clone();
        let result = edit(owner);
        owner.id = id;
        owner.apartments = apartments;
        Ok(result)
    }

    pub fn reviewer(&self, key: ReviewerKey) -> Option<&Reviewer> {
        self.reviewers.get(&key)
    }

    /// Same contract as `edit_owner`.
    pub fn edit_reviewer<T>(
        &mut self,
        key: ReviewerKey,
        edit: impl FnOnce(&mut Reviewer) -> T,
    ) -> GraphResult<T> {
        let reviewer = self
            .reviewers
            .get_mut(&key)
            .ok_or(GraphError::UnknownReviewer(key))?;
        let id = reviewer.id;
        let reviews = reviewer.reviews.clone();
        let result = edit(reviewer);
        reviewer.id = id;
        reviewer.reviews = reviews;
        Ok(result)
    }

    pub fn apartment(&self, key: ApartmentKey) -> Option<&Apartment> {
        self.apartments.get(&key)
    }

    /// Same contract as `edit_owner`; the owner reference is kept as well.
    pub fn edit_apartment<T>(
        &mut self,
        key: ApartmentKey,
        edit: impl FnOnce(&mut Apartment) -> T,
    ) -> GraphResult<T> {
        let apartment = self
            .apartments
            .get_mut(&key)
            .ok_or(GraphError::UnknownApartment(key))?;
        let id = apartment.id;
        let owner = apartment.owner;
        let reviews = apartment.reviews.clone();
        let result = edit(apartment);
        apartment.id = id;
        apartment.owner = owner;
        apartment.reviews = reviews;
        Ok(result)
    }

    pub fn review(&self, key: ReviewKey) -> Option<&Review> {
        self.reviews.get(&key)
    }

    /// Same contract as `edit_owner`; both parent references are kept.
    pub fn edit_review<T>(
        &mut self,
        key: ReviewKey,
        edit: impl FnOnce(&mut Review) -> T,
    ) -> GraphResult<T> {
        let review = self
            .reviews
            .get_mut(&key)
            .ok_or(GraphError::UnknownReview(key))?;
        let id = review.id;
        let reviewer = review.reviewer;
        let apartment = review.apartment;
        let result = edit(review);
        review.id = id;
        review.reviewer = reviewer;
        review.apartment = apartment;
        Ok(result)
    }

    pub fn owners(&self) -> impl Iterator<Item = (OwnerKey, &Owner)> {
        self.owners.iter().map(|(key, owner)| (*key, owner))
    }

    pub fn reviewers(&self) -> impl Iterator<Item = (ReviewerKey, &Reviewer)> {
        self.reviewers.iter().map(|(key, reviewer)| (*key, reviewer))
    }

    pub fn apartments(&self) -> impl Iterator<Item = (ApartmentKey, &Apartment)> {
        self.apartments
            .iter()
            .map(|(key, apartment)| (*key, apartment))
    }

    pub fn reviews(&self) -> impl Iterator<Item = (ReviewKey, &Review)> {
        self.reviews.iter().map(|(key, review)| (*key, review))
    }

    /// Resolves a persisted owner id to its in-memory key.
    pub fn owner_key(&self, id: OwnerId) -> Option<OwnerKey> {
        self.owner_ids.get(&id).copied()
    }

    pub fn reviewer_key(&self, id: ReviewerId) -> Option<ReviewerKey> {
        self.reviewer_ids.get(&id).copied()
    }

    pub fn apartment_key(&self, id: ApartmentId) -> Option<ApartmentKey> {
        self.apartment_ids.get(&id).copied()
    }

    pub fn review_key(&self, id: ReviewId) -> Option<ReviewKey> {
        self.review_ids.get(&id).copied()
    }

    /// Rows that the next save will delete.
    pub fn pending_deletions(&self) -> &PendingDeletions {
        &self.pending
    }

    pub(crate) fn clear_pending_deletions(&mut self) {
        self.pending = PendingDeletions::default();
    }

    pub(crate) fn is_owner_pending_deletion(&self, id: OwnerId) -> bool {
        self.pending.owners.contains(&id)
    }

    pub(crate) fn is_reviewer_pending_deletion(&self, id: ReviewerId) -> bool {
        self.pending.reviewers.contains(&id)
    }

    pub(crate) fn is_apartment_pending_deletion(&self, id: ApartmentId) -> bool {
        self.pending.apartments.contains(&id)
    }

    pub(crate) fn is_review_pending_deletion(&self, id: ReviewId) -> bool {
        self.pending.reviews.contains(&id)
    }

    /// Registers a row loaded from storage; the caller links relationships.
    pub(crate) fn attach_loaded_owner(&mut self, id: OwnerId, mut owner: Owner) -> OwnerKey {
        owner.id = Some(id);
        owner.apartments.clear();
        let key = OwnerKey(self.next_slot());
        self.owners.insert(key, owner);
        self.owner_ids.insert(id, key);
        key
    }

    pub(crate) fn attach_loaded_reviewer(
        &mut self,
        id: ReviewerId,
        mut reviewer: Reviewer,
    ) -> ReviewerKey {
        reviewer.id = Some(id);
        reviewer.reviews.clear();
        let key = ReviewerKey(self.next_slot());
        self.reviewers.insert(key, reviewer);
        self.reviewer_ids.insert(id, key);
        key
    }

    pub(crate) fn attach_loaded_apartment(
        &mut self,
        id: ApartmentId,
        mut apartment: Apartment,
    ) -> ApartmentKey {
        apartment.id = Some(id);
        apartment.owner = None;
        apartment.reviews.clear();
        let key = ApartmentKey(self.next_slot());
        self.apartments.insert(key, apartment);
        self.apartment_ids.insert(id, key);
        key
    }

    pub(crate) fn attach_loaded_review(&mut self, id: ReviewId, mut review: Review) -> ReviewKey {
        review.id = Some(id);
        review.reviewer = None;
        review.apartment = None;
        let key = ReviewKey(self.next_slot());
        self.reviews.insert(key, review);
        self.review_ids.insert(id, key);
        key
    }

    /// Records the id assigned by a committed save.
    pub(crate) fn assign_owner_id(&mut self, key: OwnerKey, id: OwnerId) {
        if let Some(owner) = self.owners.get_mut(&key) {
            owner.id = Some(id);
            self.owner_ids.insert(id, key);
        }
    }

    pub(crate) fn assign_reviewer_id(&mut self, key: ReviewerKey, id: ReviewerId) {
        if let Some(reviewer) = self.reviewers.get_mut(&key) {
            reviewer.id = Some(id);
            self.reviewer_ids.insert(id, key);
        }
    }

    pub(crate) fn assign_apartment_id(&mut self, key: ApartmentKey, id: ApartmentId) {
        if let Some(apartment) = self.apartments.get_mut(&key) {
            apartment.id = Some(id);
            self.apartment_ids.insert(id, key);
        }
    }

    pub(crate) fn assign_review_id(&mut self, key: ReviewKey, id: ReviewId) {
        if let Some(review) = self.reviews.get_mut(&key) {
            review.id = Some(id);
            self.review_ids.insert(id, key);
        }
    }
}
