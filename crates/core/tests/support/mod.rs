//! Shared test helpers for `slotline-core` integration tests.
//!
//! These helpers provide reusable fixtures and in-memory mocks so that the
//! service tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod repositories;

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use slotline_core::{
    AppointmentService, ContractBookingService, HistoryRecorder, SlotProvisioner, SlotService,
};
use slotline_domain::{NewAppointment, SchedulingConfig, Slot, SlotStatus};

use self::repositories::{
    InMemoryAppointmentRepository, InMemoryContractRepository, InMemoryEditHistoryRepository,
    InMemoryRescheduleHistoryRepository, InMemorySlotRepository, StaticCatalog,
};

pub const TENANT: &str = "tenant-a";
pub const OTHER_TENANT: &str = "tenant-b";
pub const INSTALL_TYPE: &str = "installation";

/// A date `days` ahead of today; provisioning and most flows reject the past,
/// so fixtures always look forward.
pub fn future_date(days: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(days)
}

pub fn make_slot(tenant_id: &str, date: NaiveDate, slot_number: i64, status: SlotStatus) -> Slot {
    Slot {
        tenant_id: tenant_id.to_string(),
        date,
        slot_number,
        status,
        appointment_id: None,
        created_at: 0,
        updated_at: 0,
    }
}

pub fn make_new_appointment(date: NaiveDate, slot_number: i64) -> NewAppointment {
    NewAppointment {
        date,
        slot_number,
        client_name: "Dana Smith".to_string(),
        client_email: Some("dana@example.com".to_string()),
        client_phone: None,
        appointment_type: INSTALL_TYPE.to_string(),
        technician_id: None,
        contract_id: None,
        origin: None,
        sales_rep: None,
        network: None,
        notes: None,
        client_code: None,
    }
}

/// Everything a service test needs: the concrete mocks (for seeding and
/// inspection) plus fully wired services.
pub struct TestServices {
    pub slots: Arc<InMemorySlotRepository>,
    pub appointments: Arc<InMemoryAppointmentRepository>,
    pub contracts: Arc<InMemoryContractRepository>,
    pub edit_history: Arc<InMemoryEditHistoryRepository>,
    pub reschedule_history: Arc<InMemoryRescheduleHistoryRepository>,
    pub catalog: Arc<StaticCatalog>,
    pub recorder: Arc<HistoryRecorder>,
    pub slot_service: SlotService,
    pub appointment_service: AppointmentService,
    pub booking_service: ContractBookingService,
    pub provisioner: SlotProvisioner,
}

/// Wire every service against fresh in-memory stores.
///
/// The catalog starts with one active type (`installation`) for the default
/// tenant; tests needing more seed the catalog directly.
pub fn build_services() -> TestServices {
    let slots = Arc::new(InMemorySlotRepository::new());
    let appointments = Arc::new(InMemoryAppointmentRepository::new(Arc::clone(&slots)));
    let contracts = Arc::new(InMemoryContractRepository::new(
        Arc::clone(&slots),
        Arc::clone(&appointments),
    ));
    let edit_history = Arc::new(InMemoryEditHistoryRepository::new());
    let reschedule_history = Arc::new(InMemoryRescheduleHistoryRepository::new());
    let catalog = Arc::new(StaticCatalog::new().with_type(TENANT, INSTALL_TYPE));

    let recorder = Arc::new(HistoryRecorder::new(
        edit_history.clone(),
        reschedule_history.clone(),
    ));

    let slot_service = SlotService::new(slots.clone());
    let appointment_service = AppointmentService::new(
        appointments.clone(),
        slots.clone(),
        catalog.clone(),
        Arc::clone(&recorder),
    );
    let booking_service = ContractBookingService::new(
        contracts.clone(),
        slots.clone(),
        catalog.clone(),
        Arc::clone(&recorder),
    );
    let provisioner =
        SlotProvisioner::new(slots.clone(), &SchedulingConfig::default());

    TestServices {
        slots,
        appointments,
        contracts,
        edit_history,
        reschedule_history,
        catalog,
        recorder,
        slot_service,
        appointment_service,
        booking_service,
        provisioner,
    }
}
