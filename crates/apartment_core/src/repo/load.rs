//! Loading rows into a `RentalGraph` through its identity map.
//!
//! # Invariants
//! - A row already present in the graph is never loaded twice.
//! - Rows queued for deletion, and rows whose parent is queued for deletion,
//!   are treated as absent.
//! - Loading a parent loads every child row it does not hold yet; a child's
//!   other parents are loaded without their own children.

use super::apartment_repo::select_apartment_row;
use super::owner_repo::select_owner_row;
use super::review_repo::select_review_row;
use super::reviewer_repo::select_reviewer_row;
use super::{query_ids, RepoResult};
use crate::graph::RentalGraph;
use crate::model::keys::{
    ApartmentId, ApartmentKey, OwnerId, OwnerKey, ReviewId, ReviewKey, ReviewerId, ReviewerKey,
};
use rusqlite::Connection;

pub(super) fn load_owner(
    conn: &Connection,
    graph: &mut RentalGraph,
    id: OwnerId,
) -> RepoResult<Option<OwnerKey>> {
    let Some(key) = ensure_owner_loaded(conn, graph, id)? else {
        return Ok(None);
    };
    let apartment_ids = query_ids(
        conn,
        "SELECT id FROM apartments WHERE owner_id = ?1 ORDER BY id ASC;",
        [id],
    )?;
    for apartment_id in apartment_ids {
        load_apartment(conn, graph, apartment_id)?;
    }
    Ok(Some(key))
}

pub(super) fn load_reviewer(
    conn: &Connection,
    graph: &mut RentalGraph,
    id: ReviewerId,
) -> RepoResult<Option<ReviewerKey>> {
    let Some(key) = ensure_reviewer_loaded(conn, graph, id)? else {
        return Ok(None);
    };
    let review_ids = query_ids(
        conn,
        "SELECT id FROM reviews WHERE reviewer_id = ?1 ORDER BY id ASC;",
        [id],
    )?;
    for review_id in review_ids {
        load_review(conn, graph, review_id)?;
    }
    Ok(Some(key))
}

pub(super) fn load_apartment(
    conn: &Connection,
    graph: &mut RentalGraph,
    id: ApartmentId,
) -> RepoResult<Option<ApartmentKey>> {
    let Some(key) = ensure_apartment_loaded(conn, graph, id)? else {
        return Ok(None);
    };
    let review_ids = query_ids(
        conn,
        "SELECT id FROM reviews WHERE apartment_id = ?1 ORDER BY id ASC;",
        [id],
    )?;
    for review_id in review_ids {
        load_review(conn, graph, review_id)?;
    }
    Ok(Some(key))
}

pub(super) fn load_review(
    conn: &Connection,
    graph: &mut RentalGraph,
    id: ReviewId,
) -> RepoResult<Option<ReviewKey>> {
    if graph.is_review_pending_deletion(id) {
        return Ok(None);
    }
    if let Some(key) = graph.review_key(id) {
        return Ok(Some(key));
    }
    let Some(row) = select_review_row(conn, id)? else {
        return Ok(None);
    };

    let reviewer = match row.reviewer_id {
        Some(reviewer_id) => match ensure_reviewer_loaded(conn, graph, reviewer_id)? {
            Some(reviewer) => Some(reviewer),
            None => return Ok(None),
        },
        None => None,
    };
    let apartment = match row.apartment_id {
        Some(apartment_id) => match ensure_apartment_loaded(conn, graph, apartment_id)? {
            Some(apartment) => Some(apartment),
            None => return Ok(None),
        },
        None => None,
    };

    let key = graph.attach_loaded_review(id, row.review);
    if let Some(reviewer) = reviewer {
        graph.add_review_to_reviewer(reviewer, key)?;
    }
    if let Some(apartment) = apartment {
        graph.add_review_to_apartment(apartment, key)?;
    }
    Ok(Some(key))
}

fn ensure_owner_loaded(
    conn: &Connection,
    graph: &mut RentalGraph,
    id: OwnerId,
) -> RepoResult<Option<OwnerKey>> {
    if graph.is_owner_pending_deletion(id) {
        return Ok(None);
    }
    if let Some(key) = graph.owner_key(id) {
        return Ok(Some(key));
    }
    Ok(select_owner_row(conn, id)?.map(|owner| graph.attach_loaded_owner(id, owner)))
}

fn ensure_reviewer_loaded(
    conn: &Connection,
    graph: &mut RentalGraph,
    id: ReviewerId,
) -> RepoResult<Option<ReviewerKey>> {
    if graph.is_reviewer_pending_deletion(id) {
        return Ok(None);
    }
    if let Some(key) = graph.reviewer_key(id) {
        return Ok(Some(key));
    }
    Ok(select_reviewer_row(conn, id)?.map(|reviewer| graph.attach_loaded_reviewer(id, reviewer)))
}

fn ensure_apartment_loaded(
    conn: &Connection,
    graph: &mut RentalGraph,
    id: ApartmentId,
) -> RepoResult<Option<ApartmentKey>> {
    if graph.is_apartment_pending_deletion(id) {
        return Ok(None);
    }
    if let Some(key) = graph.apartment_key(id) {
        return Ok(Some(key));
    }
    let Some((apartment, owner_id)) = select_apartment_row(conn, id)? else {
        return Ok(None);
    };

    let owner = match owner_id {
        Some(owner_id) => match ensure_owner_loaded(conn, graph, owner_id)? {
            Some(owner) => Some(owner),
            None => return Ok(None),
        },
        None => None,
    };

    let key = graph.attach_loaded_apartment(id, apartment);
    if let Some(owner) = owner {
        graph.add_apartment(owner, key)?;
    }
    Ok(Some(key))
}
