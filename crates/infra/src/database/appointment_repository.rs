//! SQLite-backed implementation of the `AppointmentRepository` port.
//!
//! Reschedules run as one immediate transaction covering three writes:
//! release the old slot, move the appointment row, claim the new slot. Any
//! failure rolls the whole move back, so an appointment always occupies
//! exactly one slot.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use slotline_core::{AppointmentRepository, RescheduleMove};
use slotline_domain::{Appointment, AppointmentStatus, Result as DomainResult, SlotStatus, SlotlineError};
use tokio::task;

use super::manager::DbManager;
use super::rows::{parse_date, parse_enum};
use super::slot_repository::transition_slot;
use crate::errors::{map_join_error, map_sqlite_error};

/// SQLite-backed appointment repository.
pub struct SqliteAppointmentRepository {
    db: Arc<DbManager>,
}

impl SqliteAppointmentRepository {
    /// Create a new repository backed by the shared `DbManager`.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepository {
    async fn insert(&self, appointment: &Appointment) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let appointment = appointment.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            insert_appointment(&conn, &appointment)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, appointment: &Appointment) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let appointment = appointment.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    APPOINTMENT_UPDATE_SQL,
                    params![
                        appointment.date.to_string(),
                        appointment.slot_number,
                        appointment.client_name,
                        appointment.client_email,
                        appointment.client_phone,
                        appointment.appointment_type,
                        appointment.status.to_string(),
                        appointment.confirmation.to_string(),
                        appointment.technician_id,
                        appointment.contract_id,
                        appointment.origin,
                        appointment.sales_rep,
                        appointment.network,
                        appointment.notes,
                        appointment.client_code,
                        appointment.updated_at,
                        appointment.tenant_id,
                        appointment.id,
                    ],
                )
                .map_err(map_sqlite_error)?;

            if changed == 0 {
                return Err(SlotlineError::NotFound(format!("appointment {}", appointment.id)));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get(&self, tenant_id: &str, id: &str) -> DomainResult<Appointment> {
        let db = Arc::clone(&self.db);
        let tenant_id = tenant_id.to_owned();
        let id = id.to_owned();

        task::spawn_blocking(move || -> DomainResult<Appointment> {
            let conn = db.get_connection()?;
            query_appointment(&conn, &tenant_id, &id)?
                .ok_or_else(|| SlotlineError::NotFound(format!("appointment {id}")))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn delete(&self, tenant_id: &str, id: &str) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let tenant_id = tenant_id.to_owned();
        let id = id.to_owned();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let deleted = conn
                .execute(APPOINTMENT_DELETE_SQL, params![tenant_id, id])
                .map_err(map_sqlite_error)?;
            if deleted == 0 {
                return Err(SlotlineError::NotFound(format!("appointment {id}")));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_for_date(
        &self,
        tenant_id: &str,
        date: NaiveDate,
    ) -> DomainResult<Vec<Appointment>> {
        let db = Arc::clone(&self.db);
        let tenant_id = tenant_id.to_owned();

        task::spawn_blocking(move || -> DomainResult<Vec<Appointment>> {
            let conn = db.get_connection()?;
            let mut stmt = conn.prepare(APPOINTMENT_LIST_SQL).map_err(map_sqlite_error)?;
            let appointments = stmt
                .query_map(params![tenant_id, date.to_string()], map_appointment_row)
                .map_err(map_sqlite_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sqlite_error)?;
            Ok(appointments)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn execute_reschedule(
        &self,
        tenant_id: &str,
        mv: &RescheduleMove,
    ) -> DomainResult<Appointment> {
        let db = Arc::clone(&self.db);
        let tenant_id = tenant_id.to_owned();
        let mv = mv.clone();

        task::spawn_blocking(move || -> DomainResult<Appointment> {
            let mut conn = db.get_connection()?;
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(map_sqlite_error)?;

            transition_slot(
                &tx,
                &tenant_id,
                mv.old_date,
                mv.old_slot_number,
                SlotStatus::Occupied,
                SlotStatus::Available,
                None,
            )?;

            let moved = tx
                .execute(
                    APPOINTMENT_MOVE_SQL,
                    params![
                        mv.new_date.to_string(),
                        mv.new_slot_number,
                        AppointmentStatus::Rescheduled.to_string(),
                        Utc::now().timestamp(),
                        tenant_id,
                        mv.appointment_id,
                    ],
                )
                .map_err(map_sqlite_error)?;
            if moved == 0 {
                return Err(SlotlineError::NotFound(format!(
                    "appointment {}",
                    mv.appointment_id
                )));
            }

            transition_slot(
                &tx,
                &tenant_id,
                mv.new_date,
                mv.new_slot_number,
                SlotStatus::Available,
                SlotStatus::Occupied,
                Some(&mv.appointment_id),
            )?;

            let appointment = query_appointment(&tx, &tenant_id, &mv.appointment_id)?
                .ok_or_else(|| {
                    SlotlineError::NotFound(format!("appointment {}", mv.appointment_id))
                })?;

            tx.commit().map_err(map_sqlite_error)?;
            Ok(appointment)
        })
        .await
        .map_err(map_join_error)?
    }
}

const APPOINTMENT_SELECT_SQL: &str = "SELECT
        id, tenant_id, date, slot_number, client_name, client_email, client_phone,
        appointment_type, status, confirmation, technician_id, contract_id, origin,
        sales_rep, network, notes, client_code, created_at, updated_at
    FROM appointments
    WHERE tenant_id = ?1 AND id = ?2";

const APPOINTMENT_INSERT_SQL: &str = "INSERT INTO appointments
        (id, tenant_id, date, slot_number, client_name, client_email, client_phone,
         appointment_type, status, confirmation, technician_id, contract_id, origin,
         sales_rep, network, notes, client_code, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)";

const APPOINTMENT_UPDATE_SQL: &str = "UPDATE appointments
    SET date = ?1, slot_number = ?2, client_name = ?3, client_email = ?4, client_phone = ?5,
        appointment_type = ?6, status = ?7, confirmation = ?8, technician_id = ?9,
        contract_id = ?10, origin = ?11, sales_rep = ?12, network = ?13, notes = ?14,
        client_code = ?15, updated_at = ?16
    WHERE tenant_id = ?17 AND id = ?18";

const APPOINTMENT_MOVE_SQL: &str = "UPDATE appointments
    SET date = ?1, slot_number = ?2, status = ?3, updated_at = ?4
    WHERE tenant_id = ?5 AND id = ?6";

const APPOINTMENT_DELETE_SQL: &str =
    "DELETE FROM appointments WHERE tenant_id = ?1 AND id = ?2";

/// Insert one appointment row on an existing connection or transaction.
pub(crate) fn insert_appointment(
    conn: &Connection,
    appointment: &Appointment,
) -> DomainResult<()> {
    conn.execute(
        APPOINTMENT_INSERT_SQL,
        params![
            appointment.id,
            appointment.tenant_id,
            appointment.date.to_string(),
            appointment.slot_number,
            appointment.client_name,
            appointment.client_email,
            appointment.client_phone,
            appointment.appointment_type,
            appointment.status.to_string(),
            appointment.confirmation.to_string(),
            appointment.technician_id,
            appointment.contract_id,
            appointment.origin,
            appointment.sales_rep,
            appointment.network,
            appointment.notes,
            appointment.client_code,
            appointment.created_at,
            appointment.updated_at,
        ],
    )
    .map_err(map_sqlite_error)?;
    Ok(())
}

pub(crate) fn query_appointment(
    conn: &Connection,
    tenant_id: &str,
    id: &str,
) -> DomainResult<Option<Appointment>> {
    conn.query_row(APPOINTMENT_SELECT_SQL, params![tenant_id, id], map_appointment_row)
        .optional()
        .map_err(map_sqlite_error)
}

const APPOINTMENT_LIST_SQL: &str = "SELECT
        id, tenant_id, date, slot_number, client_name, client_email, client_phone,
        appointment_type, status, confirmation, technician_id, contract_id, origin,
        sales_rep, network, notes, client_code, created_at, updated_at
    FROM appointments
    WHERE tenant_id = ?1 AND date = ?2
    ORDER BY slot_number ASC";

fn map_appointment_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        date: parse_date(row.get(2)?, 2)?,
        slot_number: row.get(3)?,
        client_name: row.get(4)?,
        client_email: row.get(5)?,
        client_phone: row.get(6)?,
        appointment_type: row.get(7)?,
        status: parse_enum(row.get(8)?, 8)?,
        confirmation: parse_enum(row.get(9)?, 9)?,
        technician_id: row.get(10)?,
        contract_id: row.get(11)?,
        origin: row.get(12)?,
        sales_rep: row.get(13)?,
        network: row.get(14)?,
        notes: row.get(15)?,
        client_code: row.get(16)?,
        created_at: row.get(17)?,
        updated_at: row.get(18)?,
    })
}
