//! Slot model types
//!
//! A slot is one bookable unit of installation capacity on a given day,
//! identified by (tenant_id, date, slot_number). Slots are the concurrency
//! control point of the engine: every booking claims exactly one slot via a
//! compare-and-swap status transition.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One bookable unit of capacity on a given day.
///
/// Identity (tenant, date, number) is immutable after creation; only the
/// status, the appointment link and `updated_at` ever change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Slot {
    pub tenant_id: String,
    pub date: NaiveDate,
    /// 1-based position within the day, contiguous per (tenant, date).
    pub slot_number: i64,
    pub status: SlotStatus,
    /// Set exactly when `status == Occupied`.
    pub appointment_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Slot lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Occupied,
    Blocked,
}

crate::impl_domain_status_conversions!(SlotStatus {
    Available => "available",
    Occupied => "occupied",
    Blocked => "blocked"
});

impl SlotStatus {
    /// Whether `self -> next` is a legal edge of the slot state machine.
    ///
    /// Legal edges: available->occupied (booking), occupied->available
    /// (cancellation/release), available->blocked and blocked->available
    /// (administrative). A blocked slot must be unblocked before it can be
    /// booked, and an occupied slot must be released before it can be
    /// blocked.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Available, Self::Occupied)
                | (Self::Occupied, Self::Available)
                | (Self::Available, Self::Blocked)
                | (Self::Blocked, Self::Available)
        )
    }
}

impl Slot {
    /// Whether this slot can currently accept a booking.
    #[must_use]
    pub fn is_bookable(&self) -> bool {
        self.status == SlotStatus::Available
    }
}
