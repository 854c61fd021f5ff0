//! Slot administration service - core business logic

use std::sync::Arc;

use chrono::NaiveDate;
use slotline_domain::{Result, Slot, SlotStatus, SlotlineError};

use super::ports::SlotRepository;

/// Slot administration service.
///
/// Wraps the repository with state machine checks: every transition is
/// validated against the current status before the compare-and-swap runs, so
/// illegal moves surface as `InvalidTransition` instead of a bare conflict.
pub struct SlotService {
    slots: Arc<dyn SlotRepository>,
}

impl SlotService {
    /// Create a new slot service.
    pub fn new(slots: Arc<dyn SlotRepository>) -> Self {
        Self { slots }
    }

    /// Fetch one slot.
    pub async fn get(&self, tenant_id: &str, date: NaiveDate, slot_number: i64) -> Result<Slot> {
        self.slots.get_slot(tenant_id, date, slot_number).await
    }

    /// All slots on a date, ordered by slot number.
    pub async fn list_for_date(&self, tenant_id: &str, date: NaiveDate) -> Result<Vec<Slot>> {
        self.slots.list_slots(tenant_id, date).await
    }

    /// Take an available slot out of circulation.
    pub async fn block(&self, tenant_id: &str, date: NaiveDate, slot_number: i64) -> Result<Slot> {
        self.transition_to(tenant_id, date, slot_number, SlotStatus::Blocked).await
    }

    /// Return a blocked slot to circulation.
    pub async fn unblock(&self, tenant_id: &str, date: NaiveDate, slot_number: i64) -> Result<Slot> {
        self.transition_to(tenant_id, date, slot_number, SlotStatus::Available).await
    }

    /// Force an occupied slot back to available, clearing the booking link.
    ///
    /// Administrative escape hatch; the normal path is appointment
    /// cancellation, which releases the slot itself.
    pub async fn release(&self, tenant_id: &str, date: NaiveDate, slot_number: i64) -> Result<Slot> {
        self.transition_to(tenant_id, date, slot_number, SlotStatus::Available).await
    }

    /// Delete a slot that holds no booking.
    pub async fn delete(&self, tenant_id: &str, date: NaiveDate, slot_number: i64) -> Result<()> {
        self.slots.delete_slot(tenant_id, date, slot_number).await
    }

    /// Read the current status, reject illegal edges, then compare-and-swap
    /// from the status just read. A concurrent writer between the read and
    /// the swap loses cleanly with `Conflict`.
    async fn transition_to(
        &self,
        tenant_id: &str,
        date: NaiveDate,
        slot_number: i64,
        next: SlotStatus,
    ) -> Result<Slot> {
        let current = self.slots.get_slot(tenant_id, date, slot_number).await?;
        if !current.status.can_transition_to(next) {
            return Err(SlotlineError::InvalidTransition(format!(
                "slot {slot_number} on {date} cannot go from {} to {next}",
                current.status
            )));
        }
        self.slots.transition(tenant_id, date, slot_number, current.status, next, None).await
    }
}
