//! Appointment model types
//!
//! An appointment is a client-facing booking occupying exactly one slot.
//! Appointments never move silently: a change of date or slot number always
//! goes through the reschedule flow, which records the old and new position.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{
    FIELD_CLIENT_CODE, FIELD_CONFIRMATION, FIELD_NETWORK, FIELD_NOTES, FIELD_ORIGIN,
    FIELD_SALES_REP, FIELD_STATUS, FIELD_TECHNICIAN_ID, FIELD_TYPE,
};
use crate::types::history::FieldChange;

/// A booked visit occupying one slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Appointment {
    pub id: String,
    pub tenant_id: String,
    /// Current position; previous positions live in reschedule history.
    pub date: NaiveDate,
    pub slot_number: i64,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    /// Code validated against the tenant's appointment type catalog.
    pub appointment_type: String,
    pub status: AppointmentStatus,
    pub confirmation: ConfirmationState,
    pub technician_id: Option<String>,
    /// Present when this booking was created together with a contract.
    pub contract_id: Option<String>,
    pub origin: Option<String>,
    pub sales_rep: Option<String>,
    pub network: Option<String>,
    pub notes: Option<String>,
    pub client_code: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Appointment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Completed,
    Rescheduled,
    Cancelled,
}

crate::impl_domain_status_conversions!(AppointmentStatus {
    Pending => "pending",
    Completed => "completed",
    Rescheduled => "rescheduled",
    Cancelled => "cancelled"
});

/// Client confirmation progress, tracked independently of the lifecycle
/// status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfirmationState {
    PreScheduled,
    Confirmed,
    Cancelled,
}

crate::impl_domain_status_conversions!(ConfirmationState {
    PreScheduled => "pre-scheduled",
    Confirmed => "confirmed",
    Cancelled => "cancelled"
});

/// Payload for creating an appointment.
///
/// The engine assigns the id and timestamps; status starts at `Pending` and
/// confirmation at `PreScheduled`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewAppointment {
    pub date: NaiveDate,
    pub slot_number: i64,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub appointment_type: String,
    pub technician_id: Option<String>,
    pub contract_id: Option<String>,
    pub origin: Option<String>,
    pub sales_rep: Option<String>,
    pub network: Option<String>,
    pub notes: Option<String>,
    pub client_code: Option<String>,
}

/// Partial update for an appointment.
///
/// `None` leaves the stored value untouched; fields cannot be cleared back
/// to null through this payload. Date and slot number are deliberately
/// absent: moving an appointment is only possible via reschedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppointmentUpdate {
    pub appointment_type: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub confirmation: Option<ConfirmationState>,
    pub technician_id: Option<String>,
    pub origin: Option<String>,
    pub sales_rep: Option<String>,
    pub network: Option<String>,
    pub notes: Option<String>,
    pub client_code: Option<String>,
}

impl Appointment {
    /// Whether this appointment has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status == AppointmentStatus::Cancelled
    }

    /// Apply the whitelisted fields of `update`, returning one change record
    /// per field whose value actually differs from the stored one.
    ///
    /// Unchanged fields produce no record and are not written back, so the
    /// edit history only ever reflects real changes.
    pub fn apply_update(&mut self, update: &AppointmentUpdate) -> Vec<FieldChange> {
        let mut changes = Vec::new();

        if let Some(appointment_type) = &update.appointment_type {
            if *appointment_type != self.appointment_type {
                changes.push(FieldChange {
                    field: FIELD_TYPE,
                    old: Some(self.appointment_type.clone()),
                    new: Some(appointment_type.clone()),
                });
                self.appointment_type = appointment_type.clone();
            }
        }

        if let Some(status) = update.status {
            if status != self.status {
                changes.push(FieldChange {
                    field: FIELD_STATUS,
                    old: Some(self.status.to_string()),
                    new: Some(status.to_string()),
                });
                self.status = status;
            }
        }

        if let Some(confirmation) = update.confirmation {
            if confirmation != self.confirmation {
                changes.push(FieldChange {
                    field: FIELD_CONFIRMATION,
                    old: Some(self.confirmation.to_string()),
                    new: Some(confirmation.to_string()),
                });
                self.confirmation = confirmation;
            }
        }

        apply_text_field(
            &mut self.technician_id,
            update.technician_id.as_deref(),
            FIELD_TECHNICIAN_ID,
            &mut changes,
        );
        apply_text_field(&mut self.origin, update.origin.as_deref(), FIELD_ORIGIN, &mut changes);
        apply_text_field(
            &mut self.sales_rep,
            update.sales_rep.as_deref(),
            FIELD_SALES_REP,
            &mut changes,
        );
        apply_text_field(&mut self.network, update.network.as_deref(), FIELD_NETWORK, &mut changes);
        apply_text_field(&mut self.notes, update.notes.as_deref(), FIELD_NOTES, &mut changes);
        apply_text_field(
            &mut self.client_code,
            update.client_code.as_deref(),
            FIELD_CLIENT_CODE,
            &mut changes,
        );

        changes
    }
}

/// Overwrite an optional text field when the incoming value differs,
/// recording the old/new pair.
fn apply_text_field(
    current: &mut Option<String>,
    incoming: Option<&str>,
    field: &'static str,
    changes: &mut Vec<FieldChange>,
) {
    if let Some(value) = incoming {
        if current.as_deref() != Some(value) {
            changes.push(FieldChange {
                field,
                old: current.clone(),
                new: Some(value.to_string()),
            });
            *current = Some(value.to_string());
        }
    }
}
