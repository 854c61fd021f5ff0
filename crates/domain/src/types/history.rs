//! History model types
//!
//! The audit trail consists of two append-only tables: field-level edit
//! entries and reschedule entries. Neither is ever updated or deleted by the
//! engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One immutable field-level change on an entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditHistoryEntry {
    pub id: String,
    pub tenant_id: String,
    /// Id of the changed entity (today always an appointment id).
    pub entity_id: String,
    /// Display label of the changed field, e.g. "technicianId".
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub actor_id: Option<String>,
    pub recorded_at: i64,
}

/// One immutable before/after record of an appointment move.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RescheduleHistoryEntry {
    pub id: String,
    pub tenant_id: String,
    pub appointment_id: String,
    pub old_date: NaiveDate,
    pub old_slot_number: i64,
    pub new_date: NaiveDate,
    pub new_slot_number: i64,
    pub reason: Option<String>,
    pub actor_id: Option<String>,
    pub recorded_at: i64,
}

/// A single detected field difference, produced by
/// [`Appointment::apply_update`](crate::types::appointment::Appointment::apply_update)
/// and consumed by the history recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: &'static str,
    pub old: Option<String>,
    pub new: Option<String>,
}
