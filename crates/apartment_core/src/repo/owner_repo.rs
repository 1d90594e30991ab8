//! Owner repository and `owners` table mapping.
//!
//! # Invariants
//! - Saving an owner cascades to its apartments and their reviews.
//! - Deleting an owner deletes its apartments' reviews, then its apartments,
//!   then the owner row.

use super::load::load_owner;
use super::save::{flush_pending, save_root, SaveRoot};
use super::{
    bool_to_int, count_rows, ensure_connection_ready, query_ids, read_flag, row_exists,
    EntityRepository, RepoError, RepoResult,
};
use crate::graph::RentalGraph;
use crate::model::keys::{OwnerId, OwnerKey};
use crate::model::owner::Owner;
use crate::model::person::PersonInfo;
use log::info;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const OWNER_COLUMNS: &[&str] = &[
    "id",
    "name",
    "email",
    "age",
    "is_active",
    "is_business",
    "legal_owner_id",
    "registration_date",
    "days_as_owner",
];

/// SQLite-backed owner repository.
pub struct SqliteOwnerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOwnerRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "owners", OWNER_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl EntityRepository for SqliteOwnerRepository<'_> {
    type Key = OwnerKey;

    fn save(&self, graph: &mut RentalGraph, key: OwnerKey) -> RepoResult<OwnerId> {
        save_root(self.conn, graph, SaveRoot::Owner(key))
    }

    fn find_by_id(&self, graph: &mut RentalGraph, id: OwnerId) -> RepoResult<Option<OwnerKey>> {
        load_owner(self.conn, graph, id)
    }

    fn find_all(&self, graph: &mut RentalGraph) -> RepoResult<Vec<OwnerKey>> {
        let ids = query_ids(self.conn, "SELECT id FROM owners ORDER BY id ASC;", [])?;
        let mut keys = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(key) = load_owner(self.conn, graph, id)? {
                keys.push(key);
            }
        }
        Ok(keys)
    }

    fn delete_by_id(&self, graph: &mut RentalGraph, id: OwnerId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = delete_owner_cascade(&tx, id)?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "owner",
                id,
            });
        }
        tx.commit()?;
        graph.evict_owner(id)?;
        info!("event=entity_delete module=repo status=ok entity=owner id={id}");
        Ok(())
    }

    fn flush(&self, graph: &mut RentalGraph) -> RepoResult<usize> {
        flush_pending(self.conn, graph)
    }

    fn exists_by_id(&self, id: OwnerId) -> RepoResult<bool> {
        row_exists(self.conn, "owners", id)
    }

    fn count(&self) -> RepoResult<u64> {
        count_rows(self.conn, "owners")
    }
}

pub(super) fn insert_owner_row(conn: &Connection, owner: &Owner) -> RepoResult<OwnerId> {
    conn.execute(
        "INSERT INTO owners (
            name,
            email,
            age,
            is_active,
            is_business,
            legal_owner_id,
            registration_date,
            days_as_owner
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
        params![
            owner.person.name.as_deref(),
            owner.person.email.as_deref(),
            owner.person.age,
            bool_to_int(owner.is_active),
            bool_to_int(owner.is_business),
            owner.legal_owner_id.as_deref(),
            owner.registration_date,
            owner.days_as_owner,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Returns `false` when no row has this id.
pub(super) fn update_owner_row(conn: &Connection, id: OwnerId, owner: &Owner) -> RepoResult<bool> {
    let changed = conn.execute(
        "UPDATE owners
         SET
            name = ?1,
            email = ?2,
            age = ?3,
            is_active = ?4,
            is_business = ?5,
            legal_owner_id = ?6,
            registration_date = ?7,
            days_as_owner = ?8
         WHERE id = ?9;",
        params![
            owner.person.name.as_deref(),
            owner.person.email.as_deref(),
            owner.person.age,
            bool_to_int(owner.is_active),
            bool_to_int(owner.is_business),
            owner.legal_owner_id.as_deref(),
            owner.registration_date,
            owner.days_as_owner,
            id,
        ],
    )?;
    Ok(changed > 0)
}

pub(super) fn select_owner_row(conn: &Connection, id: OwnerId) -> RepoResult<Option<Owner>> {
    let mut stmt = conn.prepare(
        "SELECT
            name,
            email,
            age,
            is_active,
            is_business,
            legal_owner_id,
            registration_date,
            days_as_owner
         FROM owners
         WHERE id = ?1;",
    )?;
    let mut rows = stmt.query([id])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_owner_row(row)?)),
        None => Ok(None),
    }
}

/// Returns the number of owner rows removed (0 or 1).
pub(super) fn delete_owner_cascade(conn: &Connection, id: OwnerId) -> RepoResult<usize> {
    conn.execute(
        "DELETE FROM reviews
         WHERE apartment_id IN (SELECT id FROM apartments WHERE owner_id = ?1);",
        [id],
    )?;
    conn.execute("DELETE FROM apartments WHERE owner_id = ?1;", [id])?;
    let changed = conn.execute("DELETE FROM owners WHERE id = ?1;", [id])?;
    Ok(changed)
}

fn parse_owner_row(row: &Row<'_>) -> RepoResult<Owner> {
    Ok(Owner {
        person: PersonInfo {
            name: row.get("name")?,
            email: row.get("email")?,
            age: row.get("age")?,
        },
        is_active: read_flag(row, "owners", "is_active")?,
        is_business: read_flag(row, "owners", "is_business")?,
        legal_owner_id: row.get("legal_owner_id")?,
        registration_date: row.get("registration_date")?,
        days_as_owner: row.get("days_as_owner")?,
        ..Owner::default()
    })
}
