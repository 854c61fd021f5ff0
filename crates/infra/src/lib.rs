//! # Slotline Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite-backed repositories for slots, appointments, contracts and history
//! - Connection pooling and schema management
//! - Configuration loading from environment variables and files
//!
//! ## Architecture
//! - Implements traits defined in `slotline-core`
//! - Depends on `slotline-domain` and `slotline-core`
//! - Contains all "impure" code (I/O, SQLite access)

pub mod config;
pub mod database;
pub mod errors;

// Re-export commonly used items
pub use database::*;
pub use errors::*;
