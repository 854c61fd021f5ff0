//! Port interfaces for appointment persistence and type validation

use async_trait::async_trait;
use chrono::NaiveDate;
use slotline_domain::{Appointment, Result};

/// The three-way move executed when an appointment is rescheduled.
///
/// Implementations must run all of it in one storage transaction: release
/// the old slot, move the appointment row, occupy the new slot. If any step
/// matches no row the whole transaction rolls back, so the system never ends
/// up with zero or two occupied slots for one appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RescheduleMove {
    pub appointment_id: String,
    pub old_date: NaiveDate,
    pub old_slot_number: i64,
    pub new_date: NaiveDate,
    pub new_slot_number: i64,
}

/// Trait for persisting appointments.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Insert a new appointment row.
    async fn insert(&self, appointment: &Appointment) -> Result<()>;

    /// Rewrite an existing row by (tenant, id). `NotFound` when absent.
    async fn update(&self, appointment: &Appointment) -> Result<()>;

    /// Fetch one appointment. `NotFound` when absent.
    async fn get(&self, tenant_id: &str, id: &str) -> Result<Appointment>;

    /// Physically remove a row. Only used to compensate a failed multi-step
    /// creation; regular lifecycle ends at `Cancelled`.
    async fn delete(&self, tenant_id: &str, id: &str) -> Result<()>;

    /// All appointments of a tenant on a date, ordered by slot number.
    async fn list_for_date(&self, tenant_id: &str, date: NaiveDate) -> Result<Vec<Appointment>>;

    /// Execute a reschedule move transactionally and return the appointment
    /// as written (new position, status `Rescheduled`).
    async fn execute_reschedule(
        &self,
        tenant_id: &str,
        mv: &RescheduleMove,
    ) -> Result<Appointment>;
}

/// Trait for validating appointment type codes against the tenant catalog.
///
/// The catalog itself is maintained elsewhere; the engine only asks one
/// question of it.
#[async_trait]
pub trait AppointmentTypeCatalog: Send + Sync {
    /// True when `code` exists for the tenant and is not disabled.
    async fn is_active(&self, tenant_id: &str, code: &str) -> Result<bool>;
}
