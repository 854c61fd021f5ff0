//! History recorder - core business logic

use std::sync::Arc;

use chrono::Utc;
use slotline_domain::{
    EditHistoryEntry, FieldChange, RescheduleHistoryEntry, Result,
};
use tracing::warn;
use uuid::Uuid;

use super::ports::{EditHistoryRepository, RescheduleHistoryRepository};

/// Writes the immutable audit trail.
///
/// Edit entries are best-effort: a failed insert is logged and swallowed so
/// that an audit hiccup never rolls back the business mutation it describes.
/// Reschedule entries are the opposite: they are written before the move and
/// a failure aborts the whole reschedule.
pub struct HistoryRecorder {
    edits: Arc<dyn EditHistoryRepository>,
    reschedules: Arc<dyn RescheduleHistoryRepository>,
}

impl HistoryRecorder {
    /// Create a new recorder.
    pub fn new(
        edits: Arc<dyn EditHistoryRepository>,
        reschedules: Arc<dyn RescheduleHistoryRepository>,
    ) -> Self {
        Self { edits, reschedules }
    }

    /// Record one field change, best-effort.
    ///
    /// Values are null-normalized first: `None`, the literal string "null"
    /// and the empty string all mean "no value". Entries whose normalized
    /// old and new values are equal are skipped entirely.
    pub async fn record_change(
        &self,
        tenant_id: &str,
        entity_id: &str,
        field: &str,
        old: Option<&str>,
        new: Option<&str>,
        actor_id: Option<&str>,
    ) {
        let old = normalize(old);
        let new = normalize(new);
        if old == new {
            return;
        }

        let entry = EditHistoryEntry {
            id: Uuid::now_v7().to_string(),
            tenant_id: tenant_id.to_string(),
            entity_id: entity_id.to_string(),
            field_name: field.to_string(),
            old_value: old,
            new_value: new,
            actor_id: actor_id.map(ToString::to_string),
            recorded_at: Utc::now().timestamp(),
        };

        if let Err(err) = self.edits.append(&entry).await {
            warn!(
                error = %err,
                entity_id,
                field,
                "failed to record edit history entry"
            );
        }
    }

    /// Record a batch of detected field changes, best-effort.
    pub async fn record_changes(
        &self,
        tenant_id: &str,
        entity_id: &str,
        changes: &[FieldChange],
        actor_id: Option<&str>,
    ) {
        for change in changes {
            self.record_change(
                tenant_id,
                entity_id,
                change.field,
                change.old.as_deref(),
                change.new.as_deref(),
                actor_id,
            )
            .await;
        }
    }

    /// Record a reschedule entry. Unlike edit entries this propagates
    /// failures: the caller runs it before mutating anything, so an abort
    /// here leaves the system untouched.
    pub async fn record_reschedule(&self, entry: RescheduleHistoryEntry) -> Result<()> {
        self.reschedules.append(&entry).await
    }

    /// Edit history for an entity, newest first.
    pub async fn edit_history(
        &self,
        tenant_id: &str,
        entity_id: &str,
    ) -> Result<Vec<EditHistoryEntry>> {
        self.edits.list_for_entity(tenant_id, entity_id).await
    }

    /// Reschedule history for an appointment, newest first.
    pub async fn reschedule_history(
        &self,
        tenant_id: &str,
        appointment_id: &str,
    ) -> Result<Vec<RescheduleHistoryEntry>> {
        self.reschedules.list_for_appointment(tenant_id, appointment_id).await
    }
}

/// Null-normalize a recorded value: absent, "null" and "" all mean absent.
fn normalize(value: Option<&str>) -> Option<String> {
    match value {
        None => None,
        Some(v) if v.is_empty() || v.eq_ignore_ascii_case("null") => None,
        Some(v) => Some(v.to_string()),
    }
}
