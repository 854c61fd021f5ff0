//! SQLite-backed implementation of the `AppointmentTypeCatalog` port.
//!
//! The engine only asks whether a code is active. Maintaining the catalog
//! (seeding, retiring) happens through the inherent methods, which the admin
//! surface and tests use directly.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Row};
use slotline_core::AppointmentTypeCatalog;
use slotline_domain::{AppointmentType, Result as DomainResult};
use tokio::task;

use super::manager::DbManager;
use crate::errors::{map_join_error, map_sqlite_error};

/// SQLite-backed appointment type catalog.
pub struct SqliteCatalogRepository {
    db: Arc<DbManager>,
}

impl SqliteCatalogRepository {
    /// Create a new repository backed by the shared `DbManager`.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Insert or overwrite one appointment type definition.
    pub async fn upsert_type(&self, definition: &AppointmentType) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let definition = definition.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                TYPE_UPSERT_SQL,
                params![
                    definition.tenant_id,
                    definition.code,
                    definition.label,
                    i64::from(definition.disabled),
                ],
            )
            .map_err(map_sqlite_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    /// All type definitions of a tenant, enabled and disabled alike.
    pub async fn list_types(&self, tenant_id: &str) -> DomainResult<Vec<AppointmentType>> {
        let db = Arc::clone(&self.db);
        let tenant_id = tenant_id.to_owned();

        task::spawn_blocking(move || -> DomainResult<Vec<AppointmentType>> {
            let conn = db.get_connection()?;
            let mut stmt = conn.prepare(TYPE_LIST_SQL).map_err(map_sqlite_error)?;
            let types = stmt
                .query_map(params![tenant_id], map_type_row)
                .map_err(map_sqlite_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sqlite_error)?;
            Ok(types)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl AppointmentTypeCatalog for SqliteCatalogRepository {
    async fn is_active(&self, tenant_id: &str, code: &str) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);
        let tenant_id = tenant_id.to_owned();
        let code = code.to_owned();

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let active: i64 = conn
                .query_row(TYPE_ACTIVE_SQL, params![tenant_id, code], |row| row.get(0))
                .map_err(map_sqlite_error)?;
            Ok(active == 1)
        })
        .await
        .map_err(map_join_error)?
    }
}

const TYPE_UPSERT_SQL: &str = "INSERT INTO appointment_types (tenant_id, code, label, disabled)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT (tenant_id, code) DO UPDATE SET label = excluded.label, disabled = excluded.disabled";

const TYPE_ACTIVE_SQL: &str = "SELECT EXISTS (
        SELECT 1 FROM appointment_types WHERE tenant_id = ?1 AND code = ?2 AND disabled = 0
    )";

const TYPE_LIST_SQL: &str = "SELECT tenant_id, code, label, disabled
    FROM appointment_types
    WHERE tenant_id = ?1
    ORDER BY code ASC";

fn map_type_row(row: &Row<'_>) -> rusqlite::Result<AppointmentType> {
    Ok(AppointmentType {
        tenant_id: row.get(0)?,
        code: row.get(1)?,
        label: row.get(2)?,
        disabled: row.get::<_, i64>(3)? != 0,
    })
}
