//! Port interfaces for the audit trail
//!
//! Both repositories are append-only on purpose: no update or delete
//! functions exist, so implementations cannot be talked into rewriting the
//! past.

use async_trait::async_trait;
use slotline_domain::{EditHistoryEntry, RescheduleHistoryEntry, Result};

/// Trait for persisting field-level edit entries.
#[async_trait]
pub trait EditHistoryRepository: Send + Sync {
    /// Append one immutable entry.
    async fn append(&self, entry: &EditHistoryEntry) -> Result<()>;

    /// All entries for an entity, newest first.
    async fn list_for_entity(
        &self,
        tenant_id: &str,
        entity_id: &str,
    ) -> Result<Vec<EditHistoryEntry>>;
}

/// Trait for persisting reschedule entries.
#[async_trait]
pub trait RescheduleHistoryRepository: Send + Sync {
    /// Append one immutable entry.
    async fn append(&self, entry: &RescheduleHistoryEntry) -> Result<()>;

    /// All entries for an appointment, newest first.
    async fn list_for_appointment(
        &self,
        tenant_id: &str,
        appointment_id: &str,
    ) -> Result<Vec<RescheduleHistoryEntry>>;
}
