//! Relationship maintenance and cascading removal.

use super::{GraphError, GraphResult, RentalGraph};
use crate::model::keys::{
    ApartmentId, ApartmentKey, OwnerId, OwnerKey, ReviewId, ReviewKey, ReviewerId, ReviewerKey,
};

impl RentalGraph {
    /// Appends `apartment` to the owner's collection and points it back at
    /// `owner`.
    ///
    /// Adding the same apartment to the same owner again appends a second
    /// entry.
    ///
    /// # Errors
    /// - `UnknownOwner` / `UnknownApartment` when a key is not in the graph.
    /// - `ApartmentHasOtherOwner` when the apartment belongs to someone else.
    pub fn add_apartment(&mut self, owner: OwnerKey, apartment: ApartmentKey) -> GraphResult<()> {
        self.ensure_owner(owner)?;
        let current = self
            .apartments
            .get(&apartment)
            .ok_or(GraphError::UnknownApartment(apartment))?
            .owner;
        if let Some(current) = current.filter(|current| *current != owner) {
            return Err(GraphError::ApartmentHasOtherOwner {
                apartment,
                owner: current,
            });
        }

        if let Some(entry) = self.owners.get_mut(&owner) {
            entry.apartments.push(apartment);
        }
        if let Some(entry) = self.apartments.get_mut(&apartment) {
            entry.owner = Some(owner);
        }
        Ok(())
    }

    /// Appends `review` to the reviewer's collection and points it back at
    /// `reviewer`. Same contract as `add_apartment`.
    pub fn add_review_to_reviewer(
        &mut self,
        reviewer: ReviewerKey,
        review: ReviewKey,
    ) -> GraphResult<()> {
        self.ensure_reviewer(reviewer)?;
        let current = self
            .reviews
            .get(&review)
            .ok_or(GraphError::UnknownReview(review))?
            .reviewer;
        if let Some(current) = current.filter(|current| *current != reviewer) {
            return Err(GraphError::ReviewHasOtherReviewer {
                review,
                reviewer: current,
            });
        }

        if let Some(entry) = self.reviewers.get_mut(&reviewer) {
            entry.reviews.push(review);
        }
        if let Some(entry) = self.reviews.get_mut(&review) {
            entry.reviewer = Some(reviewer);
        }
        Ok(())
    }

    /// Appends `review` to the apartment's collection and points it back at
    /// `apartment`. Same contract as `add_apartment`.
    pub fn add_review_to_apartment(
        &mut self,
        apartment: ApartmentKey,
        review: ReviewKey,
    ) -> GraphResult<()> {
        self.ensure_apartment(apartment)?;
        let current = self
            .reviews
            .get(&review)
            .ok_or(GraphError::UnknownReview(review))?
            .apartment;
        if let Some(current) = current.filter(|current| *current != apartment) {
            return Err(GraphError::ReviewHasOtherApartment {
                review,
                apartment: current,
            });
        }

        if let Some(entry) = self.apartments.get_mut(&apartment) {
            entry.reviews.push(review);
        }
        if let Some(entry) = self.reviews.get_mut(&review) {
            entry.apartment = Some(apartment);
        }
        Ok(())
    }

    /// Detaches `apartment` from `owner` and deletes it with its reviews.
    ///
    /// Returns `false` when the apartment was not in the owner's collection.
    pub fn remove_apartment(
        &mut self,
        owner: OwnerKey,
        apartment: ApartmentKey,
    ) -> GraphResult<bool> {
        let held = self
            .owners
            .get(&owner)
            .ok_or(GraphError::UnknownOwner(owner))?
            .apartments
            .contains(&apartment);
        if !held {
            return Ok(false);
        }
        self.delete_apartment(apartment)?;
        Ok(true)
    }

    /// Detaches `review` from `reviewer` and deletes it.
    ///
    /// The review also leaves its apartment's collection.
    pub fn remove_review_from_reviewer(
        &mut self,
        reviewer: ReviewerKey,
        review: ReviewKey,
    ) -> GraphResult<bool> {
        let held = self
            .reviewers
            .get(&reviewer)
            .ok_or(GraphError::UnknownReviewer(reviewer))?
            .reviews
            .contains(&review);
        if !held {
            return Ok(false);
        }
        self.delete_review(review)?;
        Ok(true)
    }

    /// Detaches `review` from `apartment` and deletes it.
    pub fn remove_review_from_apartment(
        &mut self,
        apartment: ApartmentKey,
        review: ReviewKey,
    ) -> GraphResult<bool> {
        let held = self
            .apartments
            .get(&apartment)
            .ok_or(GraphError::UnknownApartment(apartment))?
            .reviews
            .contains(&review);
        if !held {
            return Ok(false);
        }
        self.delete_review(review)?;
        Ok(true)
    }

    /// Removes an owner together with its apartments and their reviews.
    pub fn delete_owner(&mut self, owner: OwnerKey) -> GraphResult<()> {
        let apartments = self
            .owners
            .get(&owner)
            .ok_or(GraphError::UnknownOwner(owner))?
            .apartments
            .clone();
        for apartment in apartments {
            if self.apartments.contains_key(&apartment) {
                self.delete_apartment(apartment)?;
            }
        }

        if let Some(removed) = self.owners.remove(&owner) {
            if let Some(id) = removed.id {
                self.owner_ids.remove(&id);
                self.pending.owners.push(id);
            }
        }
        Ok(())
    }

    /// Removes a reviewer together with its reviews.
    pub fn delete_reviewer(&mut self, reviewer: ReviewerKey) -> GraphResult<()> {
        let reviews = self
            .reviewers
            .get(&reviewer)
            .ok_or(GraphError::UnknownReviewer(reviewer))?
            .reviews
            .clone();
        for review in reviews {
            if self.reviews.contains_key(&review) {
                self.delete_review(review)?;
            }
        }

        if let Some(removed) = self.reviewers.remove(&reviewer) {
            if let Some(id) = removed.id {
                self.reviewer_ids.remove(&id);
                self.pending.reviewers.push(id);
            }
        }
        Ok(())
    }

    /// Removes an apartment and its reviews, detaching it from its owner.
    pub fn delete_apartment(&mut self, apartment: ApartmentKey) -> GraphResult<()> {
        let (owner, reviews) = {
            let entry = self
                .apartments
                .get(&apartment)
                .ok_or(GraphError::UnknownApartment(apartment))?;
            (entry.owner, entry.reviews.clone())
        };
        for review in reviews {
            if self.reviews.contains_key(&review) {
                self.delete_review(review)?;
            }
        }
        if let Some(parent) = owner.and_then(|owner| self.owners.get_mut(&owner)) {
            parent.apartments.retain(|held| *held != apartment);
        }

        if let Some(removed) = self.apartments.remove(&apartment) {
            if let Some(id) = removed.id {
                self.apartment_ids.remove(&id);
                self.pending.apartments.push(id);
            }
        }
        Ok(())
    }

    /// Removes a review, detaching it from its reviewer and apartment.
    pub fn delete_review(&mut self, review: ReviewKey) -> GraphResult<()> {
        let removed = self
            .reviews
            .remove(&review)
            .ok_or(GraphError::UnknownReview(review))?;
        if let Some(parent) = removed
            .reviewer
            .and_then(|reviewer| self.reviewers.get_mut(&reviewer))
        {
            parent.reviews.retain(|held| *held != review);
        }
        if let Some(parent) = removed
            .apartment
            .and_then(|apartment| self.apartments.get_mut(&apartment))
        {
            parent.reviews.retain(|held| *held != review);
        }
        if let Some(id) = removed.id {
            self.review_ids.remove(&id);
            self.pending.reviews.push(id);
        }
        Ok(())
    }

    /// Drops a row already deleted in storage, with the children its delete
    /// cascaded to. Nothing is queued for deletion.
    pub(crate) fn evict_owner(&mut self, id: OwnerId) -> GraphResult<()> {
        match self.owner_key(id) {
            Some(key) => self.without_queueing(|graph| graph.delete_owner(key)),
            None => Ok(()),
        }
    }

    pub(crate) fn evict_reviewer(&mut self, id: ReviewerId) -> GraphResult<()> {
        match self.reviewer_key(id) {
            Some(key) => self.without_queueing(|graph| graph.delete_reviewer(key)),
            None => Ok(()),
        }
    }

    pub(crate) fn evict_apartment(&mut self, id: ApartmentId) -> GraphResult<()> {
        match self.apartment_key(id) {
            Some(key) => self.without_queueing(|graph| graph.delete_apartment(key)),
            None => Ok(()),
        }
    }

    pub(crate) fn evict_review(&mut self, id: ReviewId) -> GraphResult<()> {
        match self.review_key(id) {
            Some(key) => self.without_queueing(|graph| graph.delete_review(key)),
            None => Ok(()),
        }
    }

    fn without_queueing(
        &mut self,
        remove: impl FnOnce(&mut Self) -> GraphResult<()>,
    ) -> GraphResult<()> {
        let queued = self.pending.clone();
        let result = remove(self);
        self.pending = queued;
        result
    }

    fn ensure_owner(&self, owner: OwnerKey) -> GraphResult<()> {
        if self.owners.contains_key(&owner) {
            Ok(())
        } else {
            Err(GraphError::UnknownOwner(owner))
        }
    }

    fn ensure_reviewer(&self, reviewer: ReviewerKey) -> GraphResult<()> {
        if self.reviewers.contains_key(&reviewer) {
            Ok(())
        } else {
            Err(GraphError::UnknownReviewer(reviewer))
        }
    }

    fn ensure_apartment(&self, apartment: ApartmentKey) -> GraphResult<()> {
        if self.apartments.contains_key(&apartment) {
            Ok(())
        } else {
            Err(GraphError::UnknownApartment(apartment))
        }
    }
}
