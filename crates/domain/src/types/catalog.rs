//! Appointment type catalog types
//!
//! The catalog itself is owned by an external admin surface; the engine only
//! reads it to validate appointment type codes. Retired codes are kept for
//! historical rows and marked `disabled` instead of being deleted.

use serde::{Deserialize, Serialize};

/// One appointment type definition in a tenant's catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppointmentType {
    pub tenant_id: String,
    /// Stable code referenced by appointments, e.g. "installation".
    pub code: String,
    pub label: String,
    /// Disabled codes fail validation for new bookings but stay resolvable
    /// for existing rows.
    pub disabled: bool,
}
