//! Infrastructure error handling
//!
//! Conversions from storage and runtime errors into domain errors.

pub mod conversions;

pub use conversions::InfraError;
pub(crate) use conversions::{map_join_error, map_pool_error, map_sqlite_error};
