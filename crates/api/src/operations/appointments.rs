//! Appointment lifecycle operations
//!
//! Create, read, update, cancel and reschedule appointments. All writes go
//! through the appointment service so slot state and the audit trail stay
//! consistent.
//!
//! # Operations
//!
//! - `create_appointment` - Book a new appointment into an available slot
//! - `get_appointment` / `list_appointments` - Read access
//! - `update_appointment` - Whitelisted field edits with audit entries
//! - `cancel_appointment` - Terminal cancel, releases the slot
//! - `reschedule_appointment` - Atomic move to another slot

use chrono::NaiveDate;
use slotline_domain::{Appointment, AppointmentUpdate, NewAppointment, Result};
use tracing::info;

use crate::context::EngineContext;

// ============================================================================
// Operation: create_appointment
// ============================================================================

/// Book a new appointment into an available slot.
///
/// # Arguments
///
/// * `tenant_id` - Owning tenant
/// * `new` - Appointment payload; date and slot number select the slot
/// * `actor_id` - Who performed the action, recorded in the audit trail
///
/// # Returns
///
/// The persisted appointment with its slot claimed, or an error when the
/// slot is unavailable, the type is unknown, or a concurrent booking won.
pub async fn create_appointment(
    context: &EngineContext,
    tenant_id: &str,
    new: NewAppointment,
    actor_id: Option<&str>,
) -> Result<Appointment> {
    info!(tenant_id, date = %new.date, slot_number = new.slot_number, "creating appointment");
    context.appointment_service.create(tenant_id, new, actor_id).await
}

// ============================================================================
// Operations: reads
// ============================================================================

/// Fetch one appointment by id.
pub async fn get_appointment(
    context: &EngineContext,
    tenant_id: &str,
    id: &str,
) -> Result<Appointment> {
    context.appointment_service.get(tenant_id, id).await
}

/// All appointments of a tenant on a date, ordered by slot number.
pub async fn list_appointments(
    context: &EngineContext,
    tenant_id: &str,
    date: NaiveDate,
) -> Result<Vec<Appointment>> {
    context.appointment_service.list_for_date(tenant_id, date).await
}

// ============================================================================
// Operation: update_appointment
// ============================================================================

/// Apply a partial update to an appointment.
///
/// Only whitelisted fields can change; date and slot number cannot (use
/// [`reschedule_appointment`]). One audit entry is written per field whose
/// value actually changed.
pub async fn update_appointment(
    context: &EngineContext,
    tenant_id: &str,
    id: &str,
    update: AppointmentUpdate,
    actor_id: Option<&str>,
) -> Result<Appointment> {
    context.appointment_service.update(tenant_id, id, update, actor_id).await
}

// ============================================================================
// Operation: cancel_appointment
// ============================================================================

/// Cancel an appointment and release its slot.
///
/// Idempotent: cancelling an already cancelled appointment returns it
/// unchanged without further writes.
pub async fn cancel_appointment(
    context: &EngineContext,
    tenant_id: &str,
    id: &str,
    actor_id: Option<&str>,
) -> Result<Appointment> {
    info!(tenant_id, appointment_id = id, "cancelling appointment");
    context.appointment_service.cancel(tenant_id, id, actor_id).await
}

// ============================================================================
// Operation: reschedule_appointment
// ============================================================================

/// Move an appointment to another slot in one atomic step.
///
/// # Arguments
///
/// * `new_date` / `new_slot_number` - Target slot, which must be available
/// * `reason` - Optional free-text reason stored in the reschedule history
/// * `actor_id` - Who performed the action
///
/// # Returns
///
/// The appointment at its new position with status `Rescheduled`. On any
/// failure the old booking stands untouched.
pub async fn reschedule_appointment(
    context: &EngineContext,
    tenant_id: &str,
    id: &str,
    new_date: NaiveDate,
    new_slot_number: i64,
    reason: Option<&str>,
    actor_id: Option<&str>,
) -> Result<Appointment> {
    info!(
        tenant_id,
        appointment_id = id,
        %new_date,
        new_slot_number,
        "rescheduling appointment"
    );
    context
        .appointment_service
        .reschedule(tenant_id, id, new_date, new_slot_number, reason, actor_id)
        .await
}
