//! Shared helpers for the engine surface

pub mod health;
pub mod telemetry;
