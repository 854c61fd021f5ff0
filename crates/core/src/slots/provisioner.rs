//! Bulk slot provisioning - core business logic

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use slotline_domain::constants::{MAX_BULK_SLOTS, MIN_BULK_SLOTS};
use slotline_domain::{Result, SchedulingConfig, Slot, SlotlineError};
use tracing::info;

use super::ports::SlotRepository;

/// Creates batches of future slots with contiguous numbering.
pub struct SlotProvisioner {
    slots: Arc<dyn SlotRepository>,
    horizon_days: i64,
}

impl SlotProvisioner {
    /// Create a new provisioner bounded by the configured horizon.
    pub fn new(slots: Arc<dyn SlotRepository>, config: &SchedulingConfig) -> Self {
        Self { slots, horizon_days: config.provisioning_horizon_days }
    }

    /// Append `quantity` available slots to (tenant, date).
    ///
    /// Numbering continues after the current maximum for that day and never
    /// reuses or renumbers: provisioning 10 then 5 slots yields numbers 1-10
    /// and 11-15. Past dates and dates beyond the horizon are rejected before
    /// anything is written.
    pub async fn create_slots_in_bulk(
        &self,
        tenant_id: &str,
        date: NaiveDate,
        quantity: u32,
    ) -> Result<Vec<Slot>> {
        if !(MIN_BULK_SLOTS..=MAX_BULK_SLOTS).contains(&quantity) {
            return Err(SlotlineError::Validation(format!(
                "quantity must be between {MIN_BULK_SLOTS} and {MAX_BULK_SLOTS}, got {quantity}"
            )));
        }

        let today = Utc::now().date_naive();
        if date < today {
            return Err(SlotlineError::Validation(format!(
                "cannot provision slots for past date {date}"
            )));
        }
        let horizon = today + Duration::days(self.horizon_days);
        if date > horizon {
            return Err(SlotlineError::Validation(format!(
                "date {date} is beyond the provisioning horizon ({horizon})"
            )));
        }

        let created = self.slots.insert_contiguous(tenant_id, date, quantity).await?;
        info!(
            tenant_id,
            %date,
            count = created.len(),
            first = created.first().map_or(0, |s| s.slot_number),
            "provisioned slots"
        );
        Ok(created)
    }
}
