//! Repository layer: SQLite persistence for the rental graph.
//!
//! # Responsibility
//! - Provide create-or-update, lookup, listing and cascading delete per
//!   entity type, keyed by numeric id.
//! - Move entities between storage rows and `RentalGraph` slots.
//!
//! # Invariants
//! - Ids are written back into the graph only after the transaction commits.
//! - Deleting a parent row first deletes every dependent row explicitly.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod apartment_repo;
mod load;
pub mod owner_repo;
pub mod review_repo;
pub mod reviewer_repo;
mod save;

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::graph::{GraphError, RentalGraph};
use rusqlite::{Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for rental persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Save or load touched a key the graph does not hold.
    Graph(GraphError),
    /// Row with this id does not exist.
    NotFound { entity: &'static str, id: i64 },
    /// Persisted data cannot be converted to a valid entity.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Graph(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted rental data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "rental repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "rental repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "rental repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Graph(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<GraphError> for RepoError {
    fn from(value: GraphError) -> Self {
        Self::Graph(value)
    }
}

/// CRUD contract shared by every entity repository.
///
/// Operations that return entities place them in the caller's graph and
/// hand back graph keys.
pub trait EntityRepository {
    /// Graph key type of the managed entity.
    type Key: Copy;

    /// Inserts the entity when it has no id, updates it otherwise, and
    /// cascades to its children. Flushes the graph's pending deletions in the
    /// same transaction. Returns the entity's id.
    fn save(&self, graph: &mut RentalGraph, key: Self::Key) -> RepoResult<i64>;

    /// Loads one row and its children into `graph`.
    ///
    /// Returns the existing key when the row is already loaded.
    fn find_by_id(&self, graph: &mut RentalGraph, id: i64) -> RepoResult<Option<Self::Key>>;

    /// Loads every row of this type, ordered by id.
    fn find_all(&self, graph: &mut RentalGraph) -> RepoResult<Vec<Self::Key>>;

    /// Deletes the row and its dependents from storage, then drops them from
    /// `graph` when loaded there.
    ///
    /// Other graphs holding the same rows are not touched.
    fn delete_by_id(&self, graph: &mut RentalGraph, id: i64) -> RepoResult<()>;

    /// Deletes the rows queued in `graph` by in-memory removals.
    ///
    /// Returns the number of rows removed.
    fn flush(&self, graph: &mut RentalGraph) -> RepoResult<usize>;

    fn exists_by_id(&self, id: i64) -> RepoResult<bool>;

    fn count(&self) -> RepoResult<u64>;
}

pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }

    for &column in columns {
        if !table_has_column(conn, table, column)? {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

pub(crate) fn read_flag(row: &Row<'_>, table: &str, column: &str) -> RepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {table}.{column}"
        ))),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn count_rows(conn: &Connection, table: &str) -> RepoResult<u64> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })?;
    Ok(count as u64)
}

pub(crate) fn row_exists(conn: &Connection, table: &str, id: i64) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Collects the `id` column of a single-column id query.
pub(crate) fn query_ids(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> RepoResult<Vec<i64>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next()? {
        ids.push(row.get(0)?);
    }
    Ok(ids)
}
