//! Shared fixtures for operation-level integration tests.

#![allow(dead_code)]

use chrono::{Duration, NaiveDate, Utc};
use slotline_api::context::EngineContext;
use slotline_domain::{
    AppointmentType, Config, DatabaseConfig, NewAppointment, SchedulingConfig,
};
use tempfile::TempDir;

pub const TENANT: &str = "tenant-a";
pub const OTHER_TENANT: &str = "tenant-b";
pub const INSTALL_TYPE: &str = "installation";

/// Fully wired engine over a fresh temporary database.
pub struct TestEngine {
    pub context: EngineContext,
    /// Keep the temporary directory alive for the lifetime of the engine.
    _temp_dir: TempDir,
}

/// Create an engine context over a fresh database, with the installation
/// appointment type seeded for [`TENANT`].
pub async fn setup_engine() -> TestEngine {
    let temp_dir = TempDir::new().expect("failed to create temporary database directory");
    let config = Config {
        database: DatabaseConfig {
            path: temp_dir.path().join("slotline.db").to_string_lossy().into_owned(),
            pool_size: 8,
        },
        scheduling: SchedulingConfig::default(),
    };

    let context =
        EngineContext::new_with_config(config).await.expect("failed to initialise engine context");

    context
        .catalog
        .upsert_type(&AppointmentType {
            tenant_id: TENANT.to_owned(),
            code: INSTALL_TYPE.to_owned(),
            label: "Installation".to_owned(),
            disabled: false,
        })
        .await
        .expect("failed to seed appointment type");

    TestEngine { context, _temp_dir: temp_dir }
}

/// A date `days` from today; negative values land in the past.
pub fn future_date(days: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(days)
}

/// A minimal valid appointment payload for (date, slot_number).
pub fn make_new_appointment(date: NaiveDate, slot_number: i64) -> NewAppointment {
    NewAppointment {
        date,
        slot_number,
        client_name: "Dana Smith".to_owned(),
        client_email: Some("dana@example.com".to_owned()),
        client_phone: None,
        appointment_type: INSTALL_TYPE.to_owned(),
        technician_id: None,
        contract_id: None,
        origin: Some("portal".to_owned()),
        sales_rep: None,
        network: None,
        notes: None,
        client_code: None,
    }
}
