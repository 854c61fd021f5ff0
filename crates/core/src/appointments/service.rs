//! Appointment lifecycle service - core business logic

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use slotline_domain::constants::{FIELD_CREATION, FIELD_STATUS};
use slotline_domain::{
    Appointment, AppointmentStatus, AppointmentUpdate, ConfirmationState, NewAppointment, Result,
    RescheduleHistoryEntry, Slot, SlotStatus, SlotlineError,
};
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::ports::{AppointmentRepository, AppointmentTypeCatalog, RescheduleMove};
use crate::history::HistoryRecorder;
use crate::slots::ports::SlotRepository;

/// Appointment lifecycle service.
///
/// Coordinates appointment rows, slot transitions and the audit trail. All
/// validation runs before the first write; once writing has started, a
/// failure triggers compensation (create) or a transaction rollback
/// (reschedule) so no partial state survives.
pub struct AppointmentService {
    appointments: Arc<dyn AppointmentRepository>,
    slots: Arc<dyn SlotRepository>,
    catalog: Arc<dyn AppointmentTypeCatalog>,
    history: Arc<HistoryRecorder>,
}

impl AppointmentService {
    /// Create a new appointment service.
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        slots: Arc<dyn SlotRepository>,
        catalog: Arc<dyn AppointmentTypeCatalog>,
        history: Arc<HistoryRecorder>,
    ) -> Self {
        Self { appointments, slots, catalog, history }
    }

    /// Book a new appointment into an available slot.
    ///
    /// Order of writes: appointment row first, then the slot claim. If the
    /// claim loses a race, the freshly inserted row is deleted again
    /// (compensation) and the claim error surfaces verbatim.
    pub async fn create(
        &self,
        tenant_id: &str,
        new: NewAppointment,
        actor_id: Option<&str>,
    ) -> Result<Appointment> {
        self.ensure_active_type(tenant_id, &new.appointment_type).await?;

        let slot = self.slots.get_slot(tenant_id, new.date, new.slot_number).await?;
        ensure_bookable(&slot)?;

        let now = Utc::now().timestamp();
        let appointment = Appointment {
            id: Uuid::now_v7().to_string(),
            tenant_id: tenant_id.to_string(),
            date: new.date,
            slot_number: new.slot_number,
            client_name: new.client_name,
            client_email: new.client_email,
            client_phone: new.client_phone,
            appointment_type: new.appointment_type,
            status: AppointmentStatus::Pending,
            confirmation: ConfirmationState::PreScheduled,
            technician_id: new.technician_id,
            contract_id: new.contract_id,
            origin: new.origin,
            sales_rep: new.sales_rep,
            network: new.network,
            notes: new.notes,
            client_code: new.client_code,
            created_at: now,
            updated_at: now,
        };

        self.appointments.insert(&appointment).await?;

        let claim = self
            .slots
            .transition(
                tenant_id,
                appointment.date,
                appointment.slot_number,
                SlotStatus::Available,
                SlotStatus::Occupied,
                Some(&appointment.id),
            )
            .await;

        if let Err(claim_err) = claim {
            // Lost the race for the slot: undo the insert so no orphaned
            // appointment row survives, then surface the original error.
            if let Err(cleanup_err) = self.appointments.delete(tenant_id, &appointment.id).await {
                error!(
                    error = %cleanup_err,
                    appointment_id = %appointment.id,
                    "compensating delete failed after losing slot claim"
                );
            }
            return Err(claim_err);
        }

        self.history
            .record_change(
                tenant_id,
                &appointment.id,
                FIELD_CREATION,
                None,
                Some(&appointment.id),
                actor_id,
            )
            .await;

        Ok(appointment)
    }

    /// Fetch one appointment.
    pub async fn get(&self, tenant_id: &str, id: &str) -> Result<Appointment> {
        self.appointments.get(tenant_id, id).await
    }

    /// All appointments on a date, ordered by slot number.
    pub async fn list_for_date(&self, tenant_id: &str, date: NaiveDate) -> Result<Vec<Appointment>> {
        self.appointments.list_for_date(tenant_id, date).await
    }

    /// Edit the whitelisted fields of an appointment.
    ///
    /// Produces one edit history entry per field that actually changed;
    /// an update carrying only unchanged values writes nothing at all.
    /// Slot linkage is untouchable here: moving lives in `reschedule`.
    pub async fn update(
        &self,
        tenant_id: &str,
        id: &str,
        update: AppointmentUpdate,
        actor_id: Option<&str>,
    ) -> Result<Appointment> {
        let mut appointment = self.appointments.get(tenant_id, id).await?;

        if let Some(code) = &update.appointment_type {
            // Only a change of type needs catalog validation; carrying the
            // stored value through (even a retired one) stays legal.
            if *code != appointment.appointment_type {
                self.ensure_active_type(tenant_id, code).await?;
            }
        }

        let changes = appointment.apply_update(&update);
        if changes.is_empty() {
            return Ok(appointment);
        }

        appointment.updated_at = Utc::now().timestamp();
        self.appointments.update(&appointment).await?;
        self.history.record_changes(tenant_id, id, &changes, actor_id).await;

        Ok(appointment)
    }

    /// Cancel an appointment and release its slot.
    ///
    /// Idempotent: cancelling an already cancelled appointment returns the
    /// current row without writing anything (no duplicate history entry).
    /// Slot release is best-effort; an appointment whose slot was already
    /// released still cancels cleanly.
    pub async fn cancel(
        &self,
        tenant_id: &str,
        id: &str,
        actor_id: Option<&str>,
    ) -> Result<Appointment> {
        let mut appointment = self.appointments.get(tenant_id, id).await?;
        if appointment.is_cancelled() {
            return Ok(appointment);
        }

        let old_status = appointment.status;
        appointment.status = AppointmentStatus::Cancelled;
        appointment.confirmation = ConfirmationState::Cancelled;
        appointment.updated_at = Utc::now().timestamp();
        self.appointments.update(&appointment).await?;

        self.history
            .record_change(
                tenant_id,
                id,
                FIELD_STATUS,
                Some(&old_status.to_string()),
                Some(&AppointmentStatus::Cancelled.to_string()),
                actor_id,
            )
            .await;

        match self.slots.release_for_appointment(tenant_id, id).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(appointment_id = %id, "no occupied slot to release on cancel");
            }
            Err(err) => {
                // The appointment is already cancelled; a failed release is
                // repairable via the slot admin service and must not undo it.
                warn!(error = %err, appointment_id = %id, "slot release failed on cancel");
            }
        }

        Ok(appointment)
    }

    /// Move an appointment to a different slot.
    ///
    /// The audit entry is written first; if that fails nothing has moved.
    /// The move itself (release old slot, rewrite appointment, occupy new
    /// slot) then runs in one storage transaction, so a conflict rolls all
    /// three writes back together.
    pub async fn reschedule(
        &self,
        tenant_id: &str,
        id: &str,
        new_date: NaiveDate,
        new_slot_number: i64,
        reason: Option<&str>,
        actor_id: Option<&str>,
    ) -> Result<Appointment> {
        let appointment = self.appointments.get(tenant_id, id).await?;
        if appointment.is_cancelled() {
            return Err(SlotlineError::CannotRescheduleCancelled(id.to_string()));
        }
        if appointment.date == new_date && appointment.slot_number == new_slot_number {
            return Err(SlotlineError::Validation(format!(
                "appointment {id} already occupies slot {new_slot_number} on {new_date}"
            )));
        }

        let target = self.slots.get_slot(tenant_id, new_date, new_slot_number).await?;
        ensure_bookable(&target)?;

        let entry = RescheduleHistoryEntry {
            id: Uuid::now_v7().to_string(),
            tenant_id: tenant_id.to_string(),
            appointment_id: id.to_string(),
            old_date: appointment.date,
            old_slot_number: appointment.slot_number,
            new_date,
            new_slot_number,
            reason: reason.map(ToString::to_string),
            actor_id: actor_id.map(ToString::to_string),
            recorded_at: Utc::now().timestamp(),
        };
        self.history.record_reschedule(entry).await?;

        let mv = RescheduleMove {
            appointment_id: id.to_string(),
            old_date: appointment.date,
            old_slot_number: appointment.slot_number,
            new_date,
            new_slot_number,
        };
        self.appointments.execute_reschedule(tenant_id, &mv).await
    }

    async fn ensure_active_type(&self, tenant_id: &str, code: &str) -> Result<()> {
        if self.catalog.is_active(tenant_id, code).await? {
            Ok(())
        } else {
            Err(SlotlineError::Validation(format!(
                "unknown or disabled appointment type: {code}"
            )))
        }
    }
}

/// Reject booking into a slot that is not available, with a message naming
/// the actual state.
fn ensure_bookable(slot: &Slot) -> Result<()> {
    match slot.status {
        SlotStatus::Available => Ok(()),
        SlotStatus::Blocked => Err(SlotlineError::SlotUnavailable(format!(
            "slot {} on {} is blocked",
            slot.slot_number, slot.date
        ))),
        SlotStatus::Occupied => Err(SlotlineError::SlotUnavailable(format!(
            "slot {} on {} is already occupied",
            slot.slot_number, slot.date
        ))),
    }
}
