//! Appointment manager: repository/catalog ports and the booking lifecycle
//! service.

pub mod ports;
pub mod service;

pub use service::AppointmentService;
