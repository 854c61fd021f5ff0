//! Port interfaces for the slot store
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use chrono::NaiveDate;
use slotline_domain::{Result, Slot, SlotStatus};

/// Trait for persisting and transitioning slots.
///
/// The `transition` method is the engine's concurrency control point: it must
/// be implemented as an atomic compare-and-swap so that two writers racing
/// for the same slot can never both succeed.
#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// Fetch one slot by its natural key. `NotFound` when absent.
    async fn get_slot(&self, tenant_id: &str, date: NaiveDate, slot_number: i64) -> Result<Slot>;

    /// All slots of a tenant on a date, ordered by slot number.
    async fn list_slots(&self, tenant_id: &str, date: NaiveDate) -> Result<Vec<Slot>>;

    /// Atomically move a slot from `expected` to `next`, setting or clearing
    /// the appointment link in the same write.
    ///
    /// When the conditional update matches no row, implementations must
    /// distinguish the two causes: the slot exists with a different status
    /// (`Conflict`) or it does not exist at all (`NotFound`). Returns the
    /// slot as written.
    async fn transition(
        &self,
        tenant_id: &str,
        date: NaiveDate,
        slot_number: i64,
        expected: SlotStatus,
        next: SlotStatus,
        appointment_id: Option<&str>,
    ) -> Result<Slot>;

    /// Find the slot currently occupied by the given appointment, if any.
    async fn find_by_appointment(
        &self,
        tenant_id: &str,
        appointment_id: &str,
    ) -> Result<Option<Slot>>;

    /// Release whichever occupied slot is linked to the appointment, clearing
    /// the link. Returns false when no slot was linked (already released).
    async fn release_for_appointment(&self, tenant_id: &str, appointment_id: &str) -> Result<bool>;

    /// Append `quantity` available slots for (tenant, date), numbered
    /// contiguously after the current maximum. Runs as a single write
    /// transaction so concurrent bulk calls cannot interleave numbering.
    async fn insert_contiguous(
        &self,
        tenant_id: &str,
        date: NaiveDate,
        quantity: u32,
    ) -> Result<Vec<Slot>>;

    /// Delete a slot that is not occupied. `Validation` when the slot holds a
    /// booking, `NotFound` when absent.
    async fn delete_slot(&self, tenant_id: &str, date: NaiveDate, slot_number: i64) -> Result<()>;
}
