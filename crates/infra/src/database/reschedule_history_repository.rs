//! SQLite-backed implementation of the `RescheduleHistoryRepository` port.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Row};
use slotline_core::RescheduleHistoryRepository;
use slotline_domain::{RescheduleHistoryEntry, Result as DomainResult};
use tokio::task;

use super::manager::DbManager;
use super::rows::parse_date;
use crate::errors::{map_join_error, map_sqlite_error};

/// SQLite-backed reschedule history repository.
pub struct SqliteRescheduleHistoryRepository {
    db: Arc<DbManager>,
}

impl SqliteRescheduleHistoryRepository {
    /// Create a new repository backed by the shared `DbManager`.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RescheduleHistoryRepository for SqliteRescheduleHistoryRepository {
    async fn append(&self, entry: &RescheduleHistoryEntry) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let entry = entry.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                RESCHEDULE_HISTORY_INSERT_SQL,
                params![
                    entry.id,
                    entry.tenant_id,
                    entry.appointment_id,
                    entry.old_date.to_string(),
                    entry.old_slot_number,
                    entry.new_date.to_string(),
                    entry.new_slot_number,
                    entry.reason,
                    entry.actor_id,
                    entry.recorded_at,
                ],
            )
            .map_err(map_sqlite_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_for_appointment(
        &self,
        tenant_id: &str,
        appointment_id: &str,
    ) -> DomainResult<Vec<RescheduleHistoryEntry>> {
        let db = Arc::clone(&self.db);
        let tenant_id = tenant_id.to_owned();
        let appointment_id = appointment_id.to_owned();

        task::spawn_blocking(move || -> DomainResult<Vec<RescheduleHistoryEntry>> {
            let conn = db.get_connection()?;
            let mut stmt = conn.prepare(RESCHEDULE_HISTORY_LIST_SQL).map_err(map_sqlite_error)?;
            let entries = stmt
                .query_map(params![tenant_id, appointment_id], map_reschedule_history_row)
                .map_err(map_sqlite_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sqlite_error)?;
            Ok(entries)
        })
        .await
        .map_err(map_join_error)?
    }
}

const RESCHEDULE_HISTORY_INSERT_SQL: &str = "INSERT INTO reschedule_history
        (id, tenant_id, appointment_id, old_date, old_slot_number, new_date, new_slot_number,
         reason, actor_id, recorded_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

const RESCHEDULE_HISTORY_LIST_SQL: &str = "SELECT
        id, tenant_id, appointment_id, old_date, old_slot_number, new_date, new_slot_number,
        reason, actor_id, recorded_at
    FROM reschedule_history
    WHERE tenant_id = ?1 AND appointment_id = ?2
    ORDER BY recorded_at DESC, id DESC";

fn map_reschedule_history_row(row: &Row<'_>) -> rusqlite::Result<RescheduleHistoryEntry> {
    Ok(RescheduleHistoryEntry {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        appointment_id: row.get(2)?,
        old_date: parse_date(row.get(3)?, 3)?,
        old_slot_number: row.get(4)?,
        new_date: parse_date(row.get(5)?, 5)?,
        new_slot_number: row.get(6)?,
        reason: row.get(7)?,
        actor_id: row.get(8)?,
        recorded_at: row.get(9)?,
    })
}
