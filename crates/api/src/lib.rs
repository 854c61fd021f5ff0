//! # Slotline API
//!
//! Embeddable engine surface - context wiring and operations.
//!
//! This crate contains:
//! - The engine context (dependency injection)
//! - Operation functions (host application → engine bridge)
//! - Telemetry initialisation and health checks
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Provides the operations a host portal calls

pub mod context;
pub mod operations;
pub mod utils;

// Re-export for convenience
pub use context::*;
pub use operations::*;
pub use utils::telemetry::init_telemetry;
