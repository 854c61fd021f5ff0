//! SQLite-backed implementation of the `EditHistoryRepository` port.
//!
//! Insert-only by construction. The table never sees an UPDATE or DELETE.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Row};
use slotline_core::EditHistoryRepository;
use slotline_domain::{EditHistoryEntry, Result as DomainResult};
use tokio::task;

use super::manager::DbManager;
use crate::errors::{map_join_error, map_sqlite_error};

/// SQLite-backed edit history repository.
pub struct SqliteEditHistoryRepository {
    db: Arc<DbManager>,
}

impl SqliteEditHistoryRepository {
    /// Create a new repository backed by the shared `DbManager`.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EditHistoryRepository for SqliteEditHistoryRepository {
    async fn append(&self, entry: &EditHistoryEntry) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let entry = entry.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                EDIT_HISTORY_INSERT_SQL,
                params![
                    entry.id,
                    entry.tenant_id,
                    entry.entity_id,
                    entry.field_name,
                    entry.old_value,
                    entry.new_value,
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

    async fn list_for_entity(
        &self,
        tenant_id: &str,
        entity_id: &str,
    ) -> DomainResult<Vec<EditHistoryEntry>> {
        let db = Arc::clone(&self.db);
        let tenant_id = tenant_id.to_owned();
        let entity_id = entity_id.to_owned();

        task::spawn_blocking(move || -> DomainResult<Vec<EditHistoryEntry>> {
            let conn = db.get_connection()?;
            let mut stmt = conn.prepare(EDIT_HISTORY_LIST_SQL).map_err(map_sqlite_error)?;
            let entries = stmt
                .query_map(params![tenant_id, entity_id], map_edit_history_row)
                .map_err(map_sqlite_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sqlite_error)?;
            Ok(entries)
        })
        .await
        .map_err(map_join_error)?
    }
}

const EDIT_HISTORY_INSERT_SQL: &str = "INSERT INTO edit_history
        (id, tenant_id, entity_id, field_name, old_value, new_value, actor_id, recorded_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

const EDIT_HISTORY_LIST_SQL: &str = "SELECT
        id, tenant_id, entity_id, field_name, old_value, new_value, actor_id, recorded_at
    FROM edit_history
    WHERE tenant_id = ?1 AND entity_id = ?2
    ORDER BY recorded_at DESC, id DESC";

fn map_edit_history_row(row: &Row<'_>) -> rusqlite::Result<EditHistoryEntry> {
    Ok(EditHistoryEntry {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        entity_id: row.get(2)?,
        field_name: row.get(3)?,
        old_value: row.get(4)?,
        new_value: row.get(5)?,
        actor_id: row.get(6)?,
        recorded_at: row.get(7)?,
    })
}
