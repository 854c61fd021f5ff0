//! Domain types and models
//!
//! Everything the scheduling engine persists or passes across ports: slots,
//! appointments, contracts, history entries and the appointment type catalog.

pub mod appointment;
pub mod catalog;
pub mod contract;
pub mod history;
pub mod slot;

// Re-export the full model surface for convenience
pub use appointment::{
    Appointment, AppointmentStatus, AppointmentUpdate, ConfirmationState, NewAppointment,
};
pub use catalog::AppointmentType;
pub use contract::{
    Contract, ContractAddon, ContractBooking, ContractBookingOutcome, ContractWithAddons,
    NewContract, NewContractAddon,
};
pub use history::{EditHistoryEntry, FieldChange, RescheduleHistoryEntry};
pub use slot::{Slot, SlotStatus};
