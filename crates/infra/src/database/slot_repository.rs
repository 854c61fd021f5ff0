//! SQLite-backed implementation of the `SlotRepository` port.
//!
//! The transition method is the engine's booking primitive: a conditional
//! UPDATE that only matches while the slot still holds the status the caller
//! read. Zero affected rows are disambiguated by re-reading the row into
//! `Conflict` (exists with another status) or `NotFound` (no such slot).
//! All queries run through the shared `DbManager` pool on the blocking
//! thread pool.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use slotline_core::SlotRepository;
use slotline_domain::{Result as DomainResult, Slot, SlotStatus, SlotlineError};
use tokio::task;

use super::manager::DbManager;
use super::rows::{parse_date, parse_enum};
use crate::errors::{map_join_error, map_sqlite_error};

/// SQLite-backed slot repository.
pub struct SqliteSlotRepository {
    db: Arc<DbManager>,
}

impl SqliteSlotRepository {
    /// Create a new repository backed by the shared `DbManager`.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SlotRepository for SqliteSlotRepository {
    async fn get_slot(
        &self,
        tenant_id: &str,
        date: NaiveDate,
        slot_number: i64,
    ) -> DomainResult<Slot> {
        let db = Arc::clone(&self.db);
        let tenant_id = tenant_id.to_owned();

        task::spawn_blocking(move || -> DomainResult<Slot> {
            let conn = db.get_connection()?;
            fetch_slot(&conn, &tenant_id, date, slot_number)?
                .ok_or_else(|| SlotlineError::NotFound(format!("slot {slot_number} on {date}")))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_slots(&self, tenant_id: &str, date: NaiveDate) -> DomainResult<Vec<Slot>> {
        let db = Arc::clone(&self.db);
        let tenant_id = tenant_id.to_owned();

        task::spawn_blocking(move || -> DomainResult<Vec<Slot>> {
            let conn = db.get_connection()?;
            let mut stmt = conn.prepare(SLOT_LIST_SQL).map_err(map_sqlite_error)?;
            let slots = stmt
                .query_map(params![tenant_id, date.to_string()], map_slot_row)
                .map_err(map_sqlite_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sqlite_error)?;
            Ok(slots)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn transition(
        &self,
        tenant_id: &str,
        date: NaiveDate,
        slot_number: i64,
        expected: SlotStatus,
        next: SlotStatus,
        appointment_id: Option<&str>,
    ) -> DomainResult<Slot> {
        let db = Arc::clone(&self.db);
        let tenant_id = tenant_id.to_owned();
        let appointment_id = appointment_id.map(ToString::to_string);

        task::spawn_blocking(move || -> DomainResult<Slot> {
            let conn = db.get_connection()?;
            transition_slot(
                &conn,
                &tenant_id,
                date,
                slot_number,
                expected,
                next,
                appointment_id.as_deref(),
            )
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_by_appointment(
        &self,
        tenant_id: &str,
        appointment_id: &str,
    ) -> DomainResult<Option<Slot>> {
        let db = Arc::clone(&self.db);
        let tenant_id = tenant_id.to_owned();
        let appointment_id = appointment_id.to_owned();

        task::spawn_blocking(move || -> DomainResult<Option<Slot>> {
            let conn = db.get_connection()?;
            conn.query_row(SLOT_BY_APPOINTMENT_SQL, params![tenant_id, appointment_id], map_slot_row)
                .optional()
                .map_err(map_sqlite_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn release_for_appointment(
        &self,
        tenant_id: &str,
        appointment_id: &str,
    ) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);
        let tenant_id = tenant_id.to_owned();
        let appointment_id = appointment_id.to_owned();

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let released = conn
                .execute(
                    SLOT_RELEASE_SQL,
                    params![Utc::now().timestamp(), tenant_id, appointment_id],
                )
                .map_err(map_sqlite_error)?;
            Ok(released > 0)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert_contiguous(
        &self,
        tenant_id: &str,
        date: NaiveDate,
        quantity: u32,
    ) -> DomainResult<Vec<Slot>> {
        let db = Arc::clone(&self.db);
        let tenant_id = tenant_id.to_owned();

        task::spawn_blocking(move || -> DomainResult<Vec<Slot>> {
            let mut conn = db.get_connection()?;
            // Immediate transaction: the MAX read and the inserts must not
            // interleave with a concurrent bulk call.
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(map_sqlite_error)?;

            let max: i64 = tx
                .query_row(MAX_SLOT_NUMBER_SQL, params![tenant_id, date.to_string()], |row| {
                    row.get(0)
                })
                .map_err(map_sqlite_error)?;

            let now = Utc::now().timestamp();
            let mut created = Vec::with_capacity(quantity as usize);
            for offset in 1..=i64::from(quantity) {
                let slot_number = max + offset;
                tx.execute(
                    SLOT_INSERT_SQL,
                    params![tenant_id, date.to_string(), slot_number, now, now],
                )
                .map_err(map_sqlite_error)?;
                created.push(Slot {
                    tenant_id: tenant_id.clone(),
                    date,
                    slot_number,
                    status: SlotStatus::Available,
                    appointment_id: None,
                    created_at: now,
                    updated_at: now,
                });
            }

            tx.commit().map_err(map_sqlite_error)?;
            Ok(created)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn delete_slot(
        &self,
        tenant_id: &str,
        date: NaiveDate,
        slot_number: i64,
    ) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let tenant_id = tenant_id.to_owned();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let deleted = conn
                .execute(SLOT_DELETE_SQL, params![tenant_id, date.to_string(), slot_number])
                .map_err(map_sqlite_error)?;
            if deleted == 1 {
                return Ok(());
            }
            // The guarded delete matched nothing: either the slot holds a
            // booking or it never existed.
            match fetch_slot(&conn, &tenant_id, date, slot_number)? {
                Some(_) => Err(SlotlineError::Validation(format!(
                    "slot {slot_number} on {date} is occupied and cannot be deleted"
                ))),
                None => Err(SlotlineError::NotFound(format!("slot {slot_number} on {date}"))),
            }
        })
        .await
        .map_err(map_join_error)?
    }
}

const SLOT_SELECT_SQL: &str = "SELECT
        tenant_id, date, slot_number, status, appointment_id, created_at, updated_at
    FROM slots
    WHERE tenant_id = ?1 AND date = ?2 AND slot_number = ?3";

const SLOT_LIST_SQL: &str = "SELECT
        tenant_id, date, slot_number, status, appointment_id, created_at, updated_at
    FROM slots
    WHERE tenant_id = ?1 AND date = ?2
    ORDER BY slot_number ASC";

const SLOT_BY_APPOINTMENT_SQL: &str = "SELECT
        tenant_id, date, slot_number, status, appointment_id, created_at, updated_at
    FROM slots
    WHERE tenant_id = ?1 AND appointment_id = ?2";

const SLOT_TRANSITION_SQL: &str = "UPDATE slots
    SET status = ?1, appointment_id = ?2, updated_at = ?3
    WHERE tenant_id = ?4 AND date = ?5 AND slot_number = ?6 AND status = ?7";

const SLOT_RELEASE_SQL: &str = "UPDATE slots
    SET status = 'available', appointment_id = NULL, updated_at = ?1
    WHERE tenant_id = ?2 AND appointment_id = ?3 AND status = 'occupied'";

const MAX_SLOT_NUMBER_SQL: &str =
    "SELECT COALESCE(MAX(slot_number), 0) FROM slots WHERE tenant_id = ?1 AND date = ?2";

const SLOT_INSERT_SQL: &str = "INSERT INTO slots
        (tenant_id, date, slot_number, status, appointment_id, created_at, updated_at)
    VALUES (?1, ?2, ?3, 'available', NULL, ?4, ?5)";

const SLOT_DELETE_SQL: &str = "DELETE FROM slots
    WHERE tenant_id = ?1 AND date = ?2 AND slot_number = ?3 AND status != 'occupied'";

/// Fetch one slot row by its natural key.
pub(crate) fn fetch_slot(
    conn: &Connection,
    tenant_id: &str,
    date: NaiveDate,
    slot_number: i64,
) -> DomainResult<Option<Slot>> {
    conn.query_row(SLOT_SELECT_SQL, params![tenant_id, date.to_string(), slot_number], map_slot_row)
        .optional()
        .map_err(map_sqlite_error)
}

/// Compare-and-swap a slot from `expected` to `next`.
///
/// Also used inside the reschedule and contract-booking transactions, which
/// pass their transaction handle as `conn` so a later failure rolls this
/// write back with everything else.
pub(crate) fn transition_slot(
    conn: &Connection,
    tenant_id: &str,
    date: NaiveDate,
    slot_number: i64,
    expected: SlotStatus,
    next: SlotStatus,
    appointment_id: Option<&str>,
) -> DomainResult<Slot> {
    let changed = conn
        .execute(
            SLOT_TRANSITION_SQL,
            params![
                next.to_string(),
                appointment_id,
                Utc::now().timestamp(),
                tenant_id,
                date.to_string(),
                slot_number,
                expected.to_string(),
            ],
        )
        .map_err(map_sqlite_error)?;

    if changed == 1 {
        return fetch_slot(conn, tenant_id, date, slot_number)?.ok_or_else(|| {
            SlotlineError::Internal(format!("slot {slot_number} on {date} vanished mid-transition"))
        });
    }

    match fetch_slot(conn, tenant_id, date, slot_number)? {
        Some(slot) => Err(SlotlineError::Conflict(format!(
            "slot {slot_number} on {date} expected {expected} but is {}",
            slot.status
        ))),
        None => Err(SlotlineError::NotFound(format!("slot {slot_number} on {date}"))),
    }
}

pub(crate) fn map_slot_row(row: &Row<'_>) -> rusqlite::Result<Slot> {
    Ok(Slot {
        tenant_id: row.get(0)?,
        date: parse_date(row.get(1)?, 1)?,
        slot_number: row.get(2)?,
        status: parse_enum(row.get(3)?, 3)?,
        appointment_id: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
