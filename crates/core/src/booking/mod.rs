//! Contract-linked booking: contract repository port and the unit-of-work
//! service.

pub mod ports;
pub mod service;

pub use service::ContractBookingService;
