//! Database implementations

pub mod appointment_repository;
pub mod catalog_repository;
pub mod contract_repository;
pub mod edit_history_repository;
pub mod manager;
pub mod pool;
pub mod reschedule_history_repository;
mod rows;
pub mod slot_repository;

pub use appointment_repository::*;
pub use catalog_repository::*;
pub use contract_repository::*;
pub use edit_history_repository::*;
pub use manager::*;
pub use pool::*;
pub use reschedule_history_repository::*;
pub use slot_repository::*;
