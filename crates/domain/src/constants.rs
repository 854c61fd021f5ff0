//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! engine.

// Bulk provisioning bounds
pub const MIN_BULK_SLOTS: u32 = 1;
pub const MAX_BULK_SLOTS: u32 = 50;
pub const DEFAULT_PROVISIONING_HORIZON_DAYS: i64 = 365;

// Field labels recorded in the edit history. These are the names the audit
// UI renders, kept stable independently of the Rust field names.
pub const FIELD_CREATION: &str = "creation";
pub const FIELD_TYPE: &str = "type";
pub const FIELD_STATUS: &str = "status";
pub const FIELD_CONFIRMATION: &str = "confirmationState";
pub const FIELD_TECHNICIAN_ID: &str = "technicianId";
pub const FIELD_ORIGIN: &str = "origin";
pub const FIELD_SALES_REP: &str = "salesRep";
pub const FIELD_NETWORK: &str = "network";
pub const FIELD_NOTES: &str = "notes";
pub const FIELD_CLIENT_CODE: &str = "clientCode";
