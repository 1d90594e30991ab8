//! Reviewer repository and `reviewers` table mapping.

use super::load::load_reviewer;
use super::save::{flush_pending, save_root, SaveRoot};
use super::{
    count_rows, ensure_connection_ready, query_ids, row_exists, EntityRepository, RepoError,
    RepoResult,
};
use crate::graph::RentalGraph;
use crate::model::keys::{ReviewerId, ReviewerKey};
use crate::model::person::PersonInfo;
use crate::model::reviewer::Reviewer;
use log::info;
use rusqlite::{params, Connection, Transaction, TransactionBehavior};

const REVIEWER_COLUMNS: &[&str] = &["id", "name", "email", "age"];

/// SQLite-backed reviewer repository.
pub struct SqliteReviewerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReviewerRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "reviewers", REVIEWER_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl EntityRepository for SqliteReviewerRepository<'_> {
    type Key = ReviewerKey;

    fn save(&self, graph: &mut RentalGraph, key: ReviewerKey) -> RepoResult<ReviewerId> {
        save_root(self.conn, graph, SaveRoot::Reviewer(key))
    }

    fn find_by_id(
        &self,
        graph: &mut RentalGraph,
        id: ReviewerId,
    ) -> RepoResult<Option<ReviewerKey>> {
        load_reviewer(self.conn, graph, id)
    }

    fn find_all(&self, graph: &mut RentalGraph) -> RepoResult<Vec<ReviewerKey>> {
        let ids = query_ids(self.conn, "SELECT id FROM reviewers ORDER BY id ASC;", [])?;
        let mut keys = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(key) = load_reviewer(self.conn, graph, id)? {
                keys.push(key);
            }
        }
        Ok(keys)
    }

    fn delete_by_id(&self, graph: &mut RentalGraph, id: ReviewerId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if delete_reviewer_cascade(&tx, id)? == 0 {
            return Err(RepoError::NotFound {
                entity: "reviewer",
                id,
            });
        }
        tx.commit()?;
        graph.evict_reviewer(id)?;
        info!("event=entity_delete module=repo status=ok entity=reviewer id={id}");
        Ok(())
    }

    fn flush(&self, graph: &mut RentalGraph) -> RepoResult<usize> {
        flush_pending(self.conn, graph)
    }

    fn exists_by_id(&self, id: ReviewerId) -> RepoResult<bool> {
        row_exists(self.conn, "reviewers", id)
    }

    fn count(&self) -> RepoResult<u64> {
        count_rows(self.conn, "reviewers")
    }
}

pub(super) fn insert_reviewer_row(conn: &Connection, reviewer: &Reviewer) -> RepoResult<ReviewerId> {
    conn.execute(
        "INSERT INTO reviewers (name, email, age) VALUES (?1, ?2, ?3);",
        params![
            reviewer.person.name.as_deref(),
            reviewer.person.email.as_deref(),
            reviewer.person.age,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(super) fn update_reviewer_row(
    conn: &Connection,
    id: ReviewerId,
    reviewer: &Reviewer,
) -> RepoResult<bool> {
    let changed = conn.execute(
        "UPDATE reviewers SET name = ?1, email = ?2, age = ?3 WHERE id = ?4;",
        params![
            reviewer.person.name.as_deref(),
            reviewer.person.email.as_deref(),
            reviewer.person.age,
            id,
        ],
    )?;
    Ok(changed > 0)
}

pub(super) fn select_reviewer_row(
    conn: &Connection,
    id: ReviewerId,
) -> RepoResult<Option<Reviewer>> {
    let mut stmt = conn.prepare("SELECT name, email, age FROM reviewers WHERE id = ?1;")?;
    let mut rows = stmt.query([id])?;
    match rows.next()? {
        Some(row) => Ok(Some(Reviewer::new(PersonInfo {
            name: row.get("name")?,
            email: row.get("email")?,
            age: row.get("age")?,
        }))),
        None => Ok(None),
    }
}

pub(super) fn delete_reviewer_cascade(conn: &Connection, id: ReviewerId) -> RepoResult<usize> {
    conn.execute("DELETE FROM reviews WHERE reviewer_id = ?1;", [id])?;
    let changed = conn.execute("DELETE FROM reviewers WHERE id = ?1;", [id])?;
    Ok(changed)
}
