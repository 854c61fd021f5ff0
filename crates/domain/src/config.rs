//! Engine configuration structures
//!
//! Plain data carried from the loader (environment variables or config file)
//! into the database manager and the provisioning service.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PROVISIONING_HORIZON_DAYS;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub database: DatabaseConfig,
    pub scheduling: SchedulingConfig,
}

/// SQLite database settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Path to the database file.
    pub path: String,
    /// Maximum connections held by the pool.
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "slotline.db".to_string(), pool_size: 8 }
    }
}

/// Slot provisioning settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchedulingConfig {
    /// How far into the future slots may be provisioned, in days.
    pub provisioning_horizon_days: i64,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self { provisioning_horizon_days: DEFAULT_PROVISIONING_HORIZON_DAYS }
    }
}
