//! Review repository and `reviews` table mapping.
//!
//! A review row references at most one reviewer and one apartment. Both
//! parents own it exclusively: deleting either one deletes the review.

use super::load::load_review;
use super::save::{flush_pending, save_root, SaveRoot};
use super::{
    count_rows, ensure_connection_ready, query_ids, row_exists, EntityRepository, RepoError,
    RepoResult,
};
use crate::graph::RentalGraph;
use crate::model::keys::{ApartmentId, ReviewId, ReviewKey, ReviewerId};
use crate::model::review::Review;
use log::info;
use rusqlite::{params, Connection, Transaction, TransactionBehavior};

const REVIEW_COLUMNS: &[&str] = &[
    "id",
    "reviewer_id",
    "apartment_id",
    "rating",
    "comment",
    "review_date",
    "title",
];

/// Review row fields together with its parent ids.
pub(super) struct ReviewRow {
    pub review: Review,
    pub reviewer_id: Option<ReviewerId>,
    pub apartment_id: Option<ApartmentId>,
}

/// SQLite-backed review repository.
pub struct SqliteReviewRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReviewRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "reviews", REVIEW_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl EntityRepository for SqliteReviewRepository<'_> {
    type Key = ReviewKey;

    fn save(&self, graph: &mut RentalGraph, key: ReviewKey) -> RepoResult<ReviewId> {
        save_root(self.conn, graph, SaveRoot::Review(key))
    }

    fn find_by_id(&self, graph: &mut RentalGraph, id: ReviewId) -> RepoResult<Option<ReviewKey>> {
        load_review(self.conn, graph, id)
    }

    fn find_all(&self, graph: &mut RentalGraph) -> RepoResult<Vec<ReviewKey>> {
        let ids = query_ids(self.conn, "SELECT id FROM reviews ORDER BY id ASC;", [])?;
        let mut keys = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(key) = load_review(self.conn, graph, id)? {
                keys.push(key);
            }
        }
        Ok(keys)
    }

    fn delete_by_id(&self, graph: &mut RentalGraph, id: ReviewId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if delete_review_row(&tx, id)? == 0 {
            return Err(RepoError::NotFound {
                entity: "review",
                id,
            });
        }
        tx.commit()?;
        graph.evict_review(id)?;
        info!("event=entity_delete module=repo status=ok entity=review id={id}");
        Ok(())
    }

    fn flush(&self, graph: &mut RentalGraph) -> RepoResult<usize> {
        flush_pending(self.conn, graph)
    }

    fn exists_by_id(&self, id: ReviewId) -> RepoResult<bool> {
        row_exists(self.conn, "reviews", id)
    }

    fn count(&self) -> RepoResult<u64> {
        count_rows(self.conn, "reviews")
    }
}

pub(super) fn insert_review_row(
    conn: &Connection,
    review: &Review,
    reviewer_id: Option<ReviewerId>,
    apartment_id: Option<ApartmentId>,
) -> RepoResult<ReviewId> {
    conn.execute(
        "INSERT INTO reviews (
            reviewer_id,
            apartment_id,
            rating,
            comment,
            review_date,
            title
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        params![
            reviewer_id,
            apartment_id,
            review.rating,
            review.comment.as_deref(),
            review.date,
            review.title.as_deref(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(super) fn update_review_row(
    conn: &Connection,
    id: ReviewId,
    review: &Review,
    reviewer_id: Option<ReviewerId>,
    apartment_id: Option<ApartmentId>,
) -> RepoResult<bool> {
    let changed = conn.execute(
        "UPDATE reviews
         SET
            reviewer_id = ?1,
            apartment_id = ?2,
            rating = ?3,
            comment = ?4,
            review_date = ?5,
            title = ?6
         WHERE id = ?7;",
        params![
            reviewer_id,
            apartment_id,
            review.rating,
            review.comment.as_deref(),
            review.date,
            review.title.as_deref(),
            id,
        ],
    )?;
    Ok(changed > 0)
}

pub(super) fn select_review_row(conn: &Connection, id: ReviewId) -> RepoResult<Option<ReviewRow>> {
    let mut stmt = conn.prepare(
        "SELECT
            reviewer_id,
            apartment_id,
            rating,
            comment,
            review_date,
            title
         FROM reviews
         WHERE id = ?1;",
    )?;
    let mut rows = stmt.query([id])?;
    let Some(row) = rows.next()? else {
        return Ok(None);
    };
    Ok(Some(ReviewRow {
        review: Review {
            rating: row.get("rating")?,
            comment: row.get("comment")?,
            date: row.get("review_date")?,
            title: row.get("title")?,
            ..Review::default()
        },
        reviewer_id: row.get("reviewer_id")?,
        apartment_id: row.get("apartment_id")?,
    }))
}

pub(super) fn delete_review_row(conn: &Connection, id: ReviewId) -> RepoResult<usize> {
    let changed = conn.execute("DELETE FROM reviews WHERE id = ?1;", [id])?;
    Ok(changed)
}
