//! Slot inventory operations
//!
//! # Operations
//!
//! - `provision_slots` - Bulk-create contiguously numbered slots for a day
//! - `get_slot` / `list_slots` - Read access
//! - `block_slot` / `unblock_slot` - Take slots out of or back into
//!   circulation
//! - `release_slot` - Administrative release of an occupied slot
//! - `delete_slot` - Remove a slot that holds no booking

use chrono::NaiveDate;
use slotline_domain::{Result, Slot};
use tracing::info;

use crate::context::EngineContext;

// ============================================================================
// Operation: provision_slots
// ============================================================================

/// Bulk-create available slots for a day.
///
/// # Arguments
///
/// * `date` - Target day; must not lie in the past or beyond the configured
///   provisioning horizon
/// * `quantity` - Number of slots, bounded per call
///
/// # Returns
///
/// The created slots, numbered contiguously after the day's current maximum.
pub async fn provision_slots(
    context: &EngineContext,
    tenant_id: &str,
    date: NaiveDate,
    quantity: u32,
) -> Result<Vec<Slot>> {
    context.provisioner.create_slots_in_bulk(tenant_id, date, quantity).await
}

// ============================================================================
// Operations: reads
// ============================================================================

/// Fetch one slot by its (date, number) position.
pub async fn get_slot(
    context: &EngineContext,
    tenant_id: &str,
    date: NaiveDate,
    slot_number: i64,
) -> Result<Slot> {
    context.slot_service.get(tenant_id, date, slot_number).await
}

/// All slots of a tenant on a date, ordered by slot number.
pub async fn list_slots(
    context: &EngineContext,
    tenant_id: &str,
    date: NaiveDate,
) -> Result<Vec<Slot>> {
    context.slot_service.list_for_date(tenant_id, date).await
}

// ============================================================================
// Operations: status management
// ============================================================================

/// Take an available slot out of circulation.
pub async fn block_slot(
    context: &EngineContext,
    tenant_id: &str,
    date: NaiveDate,
    slot_number: i64,
) -> Result<Slot> {
    info!(tenant_id, %date, slot_number, "blocking slot");
    context.slot_service.block(tenant_id, date, slot_number).await
}

/// Return a blocked slot to circulation.
pub async fn unblock_slot(
    context: &EngineContext,
    tenant_id: &str,
    date: NaiveDate,
    slot_number: i64,
) -> Result<Slot> {
    info!(tenant_id, %date, slot_number, "unblocking slot");
    context.slot_service.unblock(tenant_id, date, slot_number).await
}

/// Force an occupied slot back to available, clearing the booking link.
///
/// Administrative escape hatch; the normal path is appointment cancellation.
pub async fn release_slot(
    context: &EngineContext,
    tenant_id: &str,
    date: NaiveDate,
    slot_number: i64,
) -> Result<Slot> {
    info!(tenant_id, %date, slot_number, "releasing slot");
    context.slot_service.release(tenant_id, date, slot_number).await
}

// ============================================================================
// Operation: delete_slot
// ============================================================================

/// Delete a slot that holds no booking.
///
/// Occupied slots are refused; cancel or release the booking first.
pub async fn delete_slot(
    context: &EngineContext,
    tenant_id: &str,
    date: NaiveDate,
    slot_number: i64,
) -> Result<()> {
    context.slot_service.delete(tenant_id, date, slot_number).await
}
