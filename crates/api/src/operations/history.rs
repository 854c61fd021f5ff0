//! Audit trail read operations
//!
//! # Operations
//!
//! - `appointment_edit_history` - Field-level edits of an appointment,
//!   newest first
//! - `appointment_reschedule_history` - Slot moves of an appointment,
//!   newest first

use slotline_domain::{EditHistoryEntry, RescheduleHistoryEntry, Result};

use crate::context::EngineContext;

/// Field-level edit entries recorded for an appointment, newest first.
pub async fn appointment_edit_history(
    context: &EngineContext,
    tenant_id: &str,
    appointment_id: &str,
) -> Result<Vec<EditHistoryEntry>> {
    context.history.edit_history(tenant_id, appointment_id).await
}

/// Reschedule entries recorded for an appointment, newest first.
pub async fn appointment_reschedule_history(
    context: &EngineContext,
    tenant_id: &str,
    appointment_id: &str,
) -> Result<Vec<RescheduleHistoryEntry>> {
    context.history.reschedule_history(tenant_id, appointment_id).await
}
