//! # Slotline Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for every persisted entity
//! - Use cases and services (booking, cancellation, rescheduling,
//!   provisioning, audit recording)
//!
//! ## Architecture Principles
//! - Only depends on `slotline-domain`
//! - No database or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod appointments;
pub mod booking;
pub mod history;
pub mod slots;

// Re-export specific items to avoid ambiguity
pub use appointments::ports::{AppointmentRepository, AppointmentTypeCatalog, RescheduleMove};
pub use appointments::AppointmentService;
pub use booking::ports::ContractRepository;
pub use booking::ContractBookingService;
pub use history::ports::{EditHistoryRepository, RescheduleHistoryRepository};
pub use history::HistoryRecorder;
pub use slots::ports::SlotRepository;
pub use slots::{SlotProvisioner, SlotService};
