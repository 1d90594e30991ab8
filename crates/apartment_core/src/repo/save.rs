//! Cascading save of one graph root inside a single transaction.
//!
//! # Invariants
//! - Parents are written before children so foreign keys always resolve.
//! - Each entity is written at most once per save.
//! - New ids reach the graph only after commit; a failed save leaves the
//!   graph untouched.

use super::apartment_repo::{delete_apartment_cascade, insert_apartment_row, update_apartment_row};
use super::owner_repo::{delete_owner_cascade, insert_owner_row, update_owner_row};
use super::review_repo::{delete_review_row, insert_review_row, update_review_row};
use super::reviewer_repo::{delete_reviewer_cascade, insert_reviewer_row, update_reviewer_row};
use super::{RepoError, RepoResult};
use crate::graph::{GraphError, PendingDeletions, RentalGraph};
use crate::model::keys::{
    ApartmentId, ApartmentKey, OwnerId, OwnerKey, ReviewId, ReviewKey, ReviewerId, ReviewerKey,
};
use log::{error, info};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::collections::{HashMap, HashSet};
use std::time::Instant;

/// Entity a save starts from.
#[derive(Debug, Clone, Copy)]
pub(super) enum SaveRoot {
    Owner(OwnerKey),
    Reviewer(ReviewerKey),
    Apartment(ApartmentKey),
    Review(ReviewKey),
}

impl SaveRoot {
    fn entity(self) -> &'static str {
        match self {
            Self::Owner(_) => "owner",
            Self::Reviewer(_) => "reviewer",
            Self::Apartment(_) => "apartment",
            Self::Review(_) => "review",
        }
    }
}

pub(super) fn save_root(
    conn: &Connection,
    graph: &mut RentalGraph,
    root: SaveRoot,
) -> RepoResult<i64> {
    let started_at = Instant::now();
    match save_in_transaction(conn, graph, root) {
        Ok((id, inserted, deleted)) => {
            info!(
                "event=entity_save module=repo status=ok entity={} id={} inserted={} deleted={} duration_ms={}",
                root.entity(),
                id,
                inserted,
                deleted,
                started_at.elapsed().as_millis()
            );
            Ok(id)
        }
        Err(err) => {
            error!(
                "event=entity_save module=repo status=error entity={} duration_ms={} error={}",
                root.entity(),
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn save_in_transaction(
    conn: &Connection,
    graph: &mut RentalGraph,
    root: SaveRoot,
) -> RepoResult<(i64, usize, usize)> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let deleted = flush_deletions(&tx, graph.pending_deletions())?;

    let (id, staged) = {
        let mut session = SaveSession::new(&tx, graph);
        let id = match root {
            SaveRoot::Owner(key) => session.save_owner(key)?,
            SaveRoot::Reviewer(key) => session.save_reviewer(key)?,
            SaveRoot::Apartment(key) => session.save_apartment(key)?,
            SaveRoot::Review(key) => session.write_review(key)?,
        };
        (id, session.staged)
    };
    tx.commit()?;

    let inserted = staged.len();
    staged.apply(graph);
    graph.clear_pending_deletions();
    Ok((id, inserted, deleted))
}

/// Deletes every row queued in the graph without saving anything else.
pub(super) fn flush_pending(conn: &Connection, graph: &mut RentalGraph) -> RepoResult<usize> {
    if graph.pending_deletions().is_empty() {
        return Ok(0);
    }
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let deleted = flush_deletions(&tx, graph.pending_deletions())?;
    tx.commit()?;
    graph.clear_pending_deletions();
    info!("event=pending_flush module=repo status=ok deleted={deleted}");
    Ok(deleted)
}

fn flush_deletions(conn: &Connection, pending: &PendingDeletions) -> RepoResult<usize> {
    let mut deleted = 0;
    for id in &pending.reviews {
        deleted += delete_review_row(conn, *id)?;
    }
    for id in &pending.apartments {
        deleted += delete_apartment_cascade(conn, *id)?;
    }
    for id in &pending.reviewers {
        deleted += delete_reviewer_cascade(conn, *id)?;
    }
    for id in &pending.owners {
        deleted += delete_owner_cascade(conn, *id)?;
    }
    Ok(deleted)
}

/// Ids inserted by the running save, keyed by graph slot.
#[derive(Debug, Default)]
struct StagedIds {
    owners: HashMap<OwnerKey, OwnerId>,
    reviewers: HashMap<ReviewerKey, ReviewerId>,
    apartments: HashMap<ApartmentKey, ApartmentId>,
    reviews: HashMap<ReviewKey, ReviewId>,
}

impl StagedIds {
    fn len(&self) -> usize {
        self.owners.len() + self.reviewers.len() + self.apartments.len() + self.reviews.len()
    }

    fn apply(self, graph: &mut RentalGraph) {
        for (key, id) in self.owners {
            graph.assign_owner_id(key, id);
        }
        for (key, id) in self.reviewers {
            graph.assign_reviewer_id(key, id);
        }
        for (key, id) in self.apartments {
            graph.assign_apartment_id(key, id);
        }
        for (key, id) in self.reviews {
            graph.assign_review_id(key, id);
        }
    }
}

#[derive(Debug, Default)]
struct WrittenKeys {
    owners: HashSet<OwnerKey>,
    reviewers: HashSet<ReviewerKey>,
    apartments: HashSet<ApartmentKey>,
    reviews: HashSet<ReviewKey>,
}

struct SaveSession<'a> {
    conn: &'a Connection,
    graph: &'a RentalGraph,
    staged: StagedIds,
    written: WrittenKeys,
}

impl<'a> SaveSession<'a> {
    fn new(conn: &'a Connection, graph: &'a RentalGraph) -> Self {
        Self {
            conn,
            graph,
            staged: StagedIds::default(),
            written: WrittenKeys::default(),
        }
    }

    fn save_owner(&mut self, key: OwnerKey) -> RepoResult<OwnerId> {
        let graph = self.graph;
        let id = self.write_owner(key)?;
        if let Some(owner) = graph.owner(key) {
            for apartment in owner.apartments() {
                self.save_apartment(*apartment)?;
            }
        }
        Ok(id)
    }

    fn save_reviewer(&mut self, key: ReviewerKey) -> RepoResult<ReviewerId> {
        let graph = self.graph;
        let id = self.write_reviewer(key)?;
        if let Some(reviewer) = graph.reviewer(key) {
            for review in reviewer.reviews() {
                self.write_review(*review)?;
            }
        }
        Ok(id)
    }

    fn save_apartment(&mut self, key: ApartmentKey) -> RepoResult<ApartmentId> {
        let graph = self.graph;
        let id = self.write_apartment(key)?;
        if let Some(apartment) = graph.apartment(key) {
            for review in apartment.reviews() {
                self.write_review(*review)?;
            }
        }
        Ok(id)
    }

    fn owner_id(&self, key: OwnerKey) -> Option<OwnerId> {
        self.staged
            .owners
            .get(&key)
            .copied()
            .or_else(|| self.graph.owner(key).and_then(|owner| owner.id()))
    }

    fn reviewer_id(&self, key: ReviewerKey) -> Option<ReviewerId> {
        self.staged
            .reviewers
            .get(&key)
            .copied()
            .or_else(|| self.graph.reviewer(key).and_then(|reviewer| reviewer.id()))
    }

    fn apartment_id(&self, key: ApartmentKey) -> Option<ApartmentId> {
        self.staged
            .apartments
            .get(&key)
            .copied()
            .or_else(|| {
                self.graph
                    .apartment(key)
                    .and_then(|apartment| apartment.id())
            })
    }

    fn review_id(&self, key: ReviewKey) -> Option<ReviewId> {
        self.staged
            .reviews
            .get(&key)
            .copied()
            .or_else(|| self.graph.review(key).and_then(|review| review.id()))
    }

    /// Returns the parent's id, inserting its row first when it is new.
    fn ensure_owner(&mut self, key: OwnerKey) -> RepoResult<OwnerId> {
        match self.owner_id(key) {
            Some(id) => Ok(id),
            None => self.write_owner(key),
        }
    }

    fn ensure_reviewer(&mut self, key: ReviewerKey) -> RepoResult<ReviewerId> {
        match self.reviewer_id(key) {
            Some(id) => Ok(id),
            None => self.write_reviewer(key),
        }
    }

    fn ensure_apartment(&mut self, key: ApartmentKey) -> RepoResult<ApartmentId> {
        match self.apartment_id(key) {
            Some(id) => Ok(id),
            None => self.write_apartment(key),
        }
    }

    fn write_owner(&mut self, key: OwnerKey) -> RepoResult<OwnerId> {
        let graph = self.graph;
        let owner = graph.owner(key).ok_or(GraphError::UnknownOwner(key))?;
        let known = self.owner_id(key);
        if let Some(id) = known.filter(|_| self.written.owners.contains(&key)) {
            return Ok(id);
        }

        let id = match known {
            Some(id) => {
                if !update_owner_row(self.conn, id, owner)? {
                    return Err(RepoError::NotFound {
                        entity: "owner",
                        id,
                    });
                }
                id
            }
            None => {
                let id = insert_owner_row(self.conn, owner)?;
                self.staged.owners.insert(key, id);
                id
            }
        };
        self.written.owners.insert(key);
        Ok(id)
    }

    fn write_reviewer(&mut self, key: ReviewerKey) -> RepoResult<ReviewerId> {
        let graph = self.graph;
        let reviewer = graph
            .reviewer(key)
            .ok_or(GraphError::UnknownReviewer(key))?;
        let known = self.reviewer_id(key);
        if let Some(id) = known.filter(|_| self.written.reviewers.contains(&key)) {
            return Ok(id);
        }

        let id = match known {
            Some(id) => {
                if !update_reviewer_row(self.conn, id, reviewer)? {
                    return Err(RepoError::NotFound {
                        entity: "reviewer",
                        id,
                    });
                }
                id
            }
            None => {
                let id = insert_reviewer_row(self.conn, reviewer)?;
                self.staged.reviewers.insert(key, id);
                id
            }
        };
        self.written.reviewers.insert(key);
        Ok(id)
    }

    fn write_apartment(&mut self, key: ApartmentKey) -> RepoResult<ApartmentId> {
        let graph = self.graph;
        let apartment = graph
            .apartment(key)
            .ok_or(GraphError::UnknownApartment(key))?;
        let known = self.apartment_id(key);
        if let Some(id) = known.filter(|_| self.written.apartments.contains(&key)) {
            return Ok(id);
        }

        let owner_id = apartment
            .owner()
            .map(|owner| self.ensure_owner(owner))
            .transpose()?;
        let id = match known {
            Some(id) => {
                if !update_apartment_row(self.conn, id, apartment, owner_id)? {
                    return Err(RepoError::NotFound {
                        entity: "apartment",
                        id,
                    });
                }
                id
            }
            None => {
                let id = insert_apartment_row(self.conn, apartment, owner_id)?;
                self.staged.apartments.insert(key, id);
                id
            }
        };
        self.written.apartments.insert(key);
        Ok(id)
    }

    fn write_review(&mut self, key: ReviewKey) -> RepoResult<ReviewId> {
        let graph = self.graph;
        let review = graph.review(key).ok_or(GraphError::UnknownReview(key))?;
        let known = self.review_id(key);
        if let Some(id) = known.filter(|_| self.written.reviews.contains(&key)) {
            return Ok(id);
        }

        let reviewer_id = review
            .reviewer()
            .map(|reviewer| self.ensure_reviewer(reviewer))
            .transpose()?;
        let apartment_id = review
            .apartment()
            .map(|apartment| self.ensure_apartment(apartment))
            .transpose()?;
        let id = match known {
            Some(id) => {
                if !update_review_row(self.conn, id, review, reviewer_id, apartment_id)? {
                    return Err(RepoError::NotFound {
                        entity: "review",
                        id,
                    });
                }
                id
            }
            None => {
                let id = insert_review_row(self.conn, review, reviewer_id, apartment_id)?;
                self.staged.reviews.insert(key, id);
                id
            }
        };
        self.written.reviews.insert(key);
        Ok(id)
    }
}
