//! Contract model types
//!
//! A contract records a sale (plan plus optional add-ons). Contracts can be
//! created standalone or together with an installation appointment; in the
//! latter case the appointment row carries the `contract_id` link and the
//! whole unit persists or rolls back atomically.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A signed sale for a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contract {
    pub id: String,
    pub tenant_id: String,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub plan_code: Option<String>,
    pub sales_rep: Option<String>,
    pub created_at: i64,
}

/// One purchased add-on line on a contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContractAddon {
    pub id: String,
    pub tenant_id: String,
    pub contract_id: String,
    pub addon_code: String,
    pub quantity: i64,
}

/// A contract joined with its add-on lines, as returned by reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContractWithAddons {
    pub contract: Contract,
    pub addons: Vec<ContractAddon>,
}

/// Result of a contract creation: the persisted contract, its add-ons and,
/// when a booking was requested, the appointment that claimed the slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContractBookingOutcome {
    pub contract: Contract,
    pub addons: Vec<ContractAddon>,
    pub appointment: Option<crate::types::appointment::Appointment>,
}

/// Payload for creating a contract, optionally booking an installation
/// appointment in the same unit of work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewContract {
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub plan_code: Option<String>,
    pub sales_rep: Option<String>,
    pub addons: Vec<NewContractAddon>,
    /// When set, the contract, its add-ons, the appointment and the slot
    /// claim all persist or all roll back together.
    pub booking: Option<ContractBooking>,
}

/// One add-on line in a contract creation payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewContractAddon {
    pub addon_code: String,
    pub quantity: i64,
}

/// Slot claim requested together with a contract. Client identity for the
/// appointment comes from the contract itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContractBooking {
    pub date: NaiveDate,
    pub slot_number: i64,
    pub appointment_type: String,
    pub technician_id: Option<String>,
    pub notes: Option<String>,
}
