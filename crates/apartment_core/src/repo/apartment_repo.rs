//! Apartment repository and `apartments` table mapping.
//!
//! # Invariants
//! - `owner_id` is written from the apartment's graph owner; a saved owner
//!   is required before the apartment row is written.
//! - Deleting an apartment deletes its reviews first.

use super::load::load_apartment;
use super::save::{flush_pending, save_root, SaveRoot};
use super::{
    bool_to_int, count_rows, ensure_connection_ready, query_ids, read_flag, row_exists,
    EntityRepository, RepoError, RepoResult,
};
use crate::graph::RentalGraph;
use crate::model::apartment::Apartment;
use crate::model::keys::{ApartmentId, ApartmentKey, OwnerId};
use log::info;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const APARTMENT_COLUMNS: &[&str] = &[
    "id",
    "owner_id",
    "price",
    "area",
    "bedroom_count",
    "bathroom_count",
    "story_count",
    "has_main_road_access",
    "has_guestroom",
    "has_basement",
    "has_hot_water",
    "has_heating",
    "has_air_conditioning",
    "parking_spaces",
    "is_in_preferred_area",
    "furnishing_status",
];

const APARTMENT_SELECT_SQL: &str = "SELECT
    owner_id,
    price,
    area,
    bedroom_count,
    bathroom_count,
    story_count,
    has_main_road_access,
    has_guestroom,
    has_basement,
    has_hot_water,
    has_heating,
    has_air_conditioning,
    parking_spaces,
    is_in_preferred_area,
    furnishing_status
FROM apartments";

/// SQLite-backed apartment repository.
pub struct SqliteApartmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteApartmentRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "apartments", APARTMENT_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl EntityRepository for SqliteApartmentRepository<'_> {
    type Key = ApartmentKey;

    fn save(&self, graph: &mut RentalGraph, key: ApartmentKey) -> RepoResult<ApartmentId> {
        save_root(self.conn, graph, SaveRoot::Apartment(key))
    }

    fn find_by_id(
        &self,
        graph: &mut RentalGraph,
        id: ApartmentId,
    ) -> RepoResult<Option<ApartmentKey>> {
        load_apartment(self.conn, graph, id)
    }

    fn find_all(&self, graph: &mut RentalGraph) -> RepoResult<Vec<ApartmentKey>> {
        let ids = query_ids(self.conn, "SELECT id FROM apartments ORDER BY id ASC;", [])?;
        let mut keys = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(key) = load_apartment(self.conn, graph, id)? {
                keys.push(key);
            }
        }
        Ok(keys)
    }

    fn delete_by_id(&self, graph: &mut RentalGraph, id: ApartmentId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if delete_apartment_cascade(&tx, id)? == 0 {
            return Err(RepoError::NotFound {
                entity: "apartment",
                id,
            });
        }
        tx.commit()?;
        graph.evict_apartment(id)?;
        info!("event=entity_delete module=repo status=ok entity=apartment id={id}");
        Ok(())
    }

    fn flush(&self, graph: &mut RentalGraph) -> RepoResult<usize> {
        flush_pending(self.conn, graph)
    }

    fn exists_by_id(&self, id: ApartmentId) -> RepoResult<bool> {
        row_exists(self.conn, "apartments", id)
    }

    fn count(&self) -> RepoResult<u64> {
        count_rows(self.conn, "apartments")
    }
}

pub(super) fn insert_apartment_row(
    conn: &Connection,
    apartment: &Apartment,
    owner_id: Option<OwnerId>,
) -> RepoResult<ApartmentId> {
    conn.execute(
        "INSERT INTO apartments (
            owner_id,
            price,
            area,
            bedroom_count,
            bathroom_count,
            story_count,
            has_main_road_access,
            has_guestroom,
            has_basement,
            has_hot_water,
            has_heating,
            has_air_conditioning,
            parking_spaces,
            is_in_preferred_area,
            furnishing_status
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15);",
        params![
            owner_id,
            apartment.price,
            apartment.area,
            apartment.bedroom_count,
            apartment.bathroom_count,
            apartment.story_count,
            bool_to_int(apartment.has_main_road_access),
            bool_to_int(apartment.has_guestroom),
            bool_to_int(apartment.has_basement),
            bool_to_int(apartment.has_hot_water),
            bool_to_int(apartment.has_heating),
            bool_to_int(apartment.has_air_conditioning),
            apartment.parking_spaces,
            bool_to_int(apartment.is_in_preferred_area),
            apartment.furnishing_status.as_deref(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(super) fn update_apartment_row(
    conn: &Connection,
    id: ApartmentId,
    apartment: &Apartment,
    owner_id: Option<OwnerId>,
) -> RepoResult<bool> {
    let changed = conn.execute(
        "UPDATE apartments
         SET
            owner_id = ?1,
            price = ?2,
            area = ?3,
            bedroom_count = ?4,
            bathroom_count = ?5,
            story_count = ?6,
            has_main_road_access = ?7,
            has_guestroom = ?8,
            has_basement = ?9,
            has_hot_water = ?10,
            has_heating = ?11,
            has_air_conditioning = ?12,
            parking_spaces = ?13,
            is_in_preferred_area = ?14,
            furnishing_status = ?15
         WHERE id = ?16;",
        params![
            owner_id,
            apartment.price,
            apartment.area,
            apartment.bedroom_count,
            apartment.bathroom_count,
            apartment.story_count,
            bool_to_int(apartment.has_main_road_access),
            bool_to_int(apartment.has_guestroom),
            bool_to_int(apartment.has_basement),
            bool_to_int(apartment.has_hot_water),
            bool_to_int(apartment.has_heating),
            bool_to_int(apartment.has_air_conditioning),
            apartment.parking_spaces,
            bool_to_int(apartment.is_in_preferred_area),
            apartment.furnishing_status.as_deref(),
            id,
        ],
    )?;
    Ok(changed > 0)
}

/// Loads one apartment row with the id of its owner.
pub(super) fn select_apartment_row(
    conn: &Connection,
    id: ApartmentId,
) -> RepoResult<Option<(Apartment, Option<OwnerId>)>> {
    let mut stmt = conn.prepare(&format!("{APARTMENT_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    match rows.next()? {
        Some(row) => Ok(Some((parse_apartment_row(row)?, row.get("owner_id")?))),
        None => Ok(None),
    }
}

pub(super) fn delete_apartment_cascade(conn: &Connection, id: ApartmentId) -> RepoResult<usize> {
    conn.execute("DELETE FROM reviews WHERE apartment_id = ?1;", [id])?;
    let changed = conn.execute("DELETE FROM apartments WHERE id = ?1;", [id])?;
    Ok(changed)
}

fn parse_apartment_row(row: &Row<'_>) -> RepoResult<Apartment> {
    Ok(Apartment {
        price: row.get("price")?,
        area: row.get("area")?,
        bedroom_count: row.get("bedroom_count")?,
        bathroom_count: row.get("bathroom_count")?,
        story_count: row.get("story_count")?,
        has_main_road_access: read_flag(row, "apartments", "has_main_road_access")?,
        has_guestroom: read_flag(row, "apartments", "has_guestroom")?,
        has_basement: read_flag(row, "apartments", "has_basement")?,
        has_hot_water: read_flag(row, "apartments", "has_hot_water")?,
        has_heating: read_flag(row, "apartments", "has_heating")?,
        has_air_conditioning: read_flag(row, "apartments", "has_air_conditioning")?,
        parking_spaces: row.get("parking_spaces")?,
        is_in_preferred_area: read_flag(row, "apartments", "is_in_preferred_area")?,
        furnishing_status: row.get("furnishing_status")?,
        ..Apartment::default()
    })
}
