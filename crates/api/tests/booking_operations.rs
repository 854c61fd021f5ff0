//! Integration tests for contract booking operations.
//!
//! Covered operations: `create_contract`, `get_contract`.

mod support;

use slotline_api::operations::{
    appointment_edit_history, create_appointment, create_contract, get_contract, get_slot,
    list_appointments, provision_slots,
};
use slotline_domain::{
    ContractBooking, NewContract, NewContractAddon, SlotStatus, SlotlineError,
};
use support::{future_date, make_new_appointment, setup_engine, INSTALL_TYPE, TENANT};

fn make_new_contract() -> NewContract {
    NewContract {
        client_name: "Jordan Reyes".to_owned(),
        client_email: Some("jordan@example.com".to_owned()),
        client_phone: None,
        plan_code: Some("fiber-300".to_owned()),
        sales_rep: Some("rep-7".to_owned()),
        addons: vec![
            NewContractAddon { addon_code: "static-ip".to_owned(), quantity: 1 },
            NewContractAddon { addon_code: "mesh-node".to_owned(), quantity: 2 },
        ],
        booking: None,
    }
}

fn with_booking(mut new: NewContract, date: chrono::NaiveDate, slot_number: i64) -> NewContract {
    new.booking = Some(ContractBooking {
        date,
        slot_number,
        appointment_type: INSTALL_TYPE.to_owned(),
        technician_id: Some("tech-9".to_owned()),
        notes: Some("second floor".to_owned()),
    });
    new
}

// ============================================================================
// create_contract
// ============================================================================

#[tokio::test]
async fn test_contract_without_booking_persists_contract_and_addons() {
    let engine = setup_engine().await;
    let ctx = &engine.context;

    let outcome = create_contract(ctx, TENANT, make_new_contract(), Some("rep-7")).await.unwrap();
    assert!(outcome.appointment.is_none());
    assert_eq!(outcome.addons.len(), 2);

    let fetched = get_contract(ctx, TENANT, &outcome.contract.id).await.unwrap();
    assert_eq!(fetched.contract, outcome.contract);
    assert_eq!(fetched.addons.len(), 2);
    assert!(fetched.addons.iter().all(|addon| addon.contract_id == outcome.contract.id));
}

#[tokio::test]
async fn test_contract_with_booking_claims_slot_and_links_appointment() {
    let engine = setup_engine().await;
    let ctx = &engine.context;
    let date = future_date(7);
    provision_slots(ctx, TENANT, date, 1).await.unwrap();

    let outcome =
        create_contract(ctx, TENANT, with_booking(make_new_contract(), date, 1), Some("rep-7"))
            .await
            .unwrap();

    let appointment = outcome.appointment.expect("booking should create an appointment");
    assert_eq!(appointment.contract_id.as_deref(), Some(outcome.contract.id.as_str()));
    assert_eq!(appointment.client_name, "Jordan Reyes");
    assert_eq!(appointment.sales_rep.as_deref(), Some("rep-7"));
    assert_eq!(appointment.technician_id.as_deref(), Some("tech-9"));

    let slot = get_slot(ctx, TENANT, date, 1).await.unwrap();
    assert_eq!(slot.status, SlotStatus::Occupied);
    assert_eq!(slot.appointment_id.as_deref(), Some(appointment.id.as_str()));

    let trail = appointment_edit_history(ctx, TENANT, &appointment.id).await.unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].field_name, "creation");
}

#[tokio::test]
async fn test_contract_booking_rejects_taken_slot_without_writing() {
    let engine = setup_engine().await;
    let ctx = &engine.context;
    let date = future_date(7);
    provision_slots(ctx, TENANT, date, 1).await.unwrap();
    let existing =
        create_appointment(ctx, TENANT, make_new_appointment(date, 1), None).await.unwrap();

    let err = create_contract(ctx, TENANT, with_booking(make_new_contract(), date, 1), None)
        .await
        .unwrap_err();
    assert!(matches!(err, SlotlineError::SlotUnavailable(_)), "got {err:?}");

    // Only the pre-existing booking remains; the slot link is untouched.
    assert_eq!(list_appointments(ctx, TENANT, date).await.unwrap().len(), 1);
    let slot = get_slot(ctx, TENANT, date, 1).await.unwrap();
    assert_eq!(slot.appointment_id.as_deref(), Some(existing.id.as_str()));
}

#[tokio::test]
async fn test_contract_rejects_blank_client_name() {
    let engine = setup_engine().await;
    let ctx = &engine.context;

    let mut new = make_new_contract();
    new.client_name = "   ".to_owned();

    let err = create_contract(ctx, TENANT, new, None).await.unwrap_err();
    assert!(matches!(err, SlotlineError::Validation(_)), "got {err:?}");
}

// ============================================================================
// get_contract
// ============================================================================

#[tokio::test]
async fn test_get_contract_is_tenant_scoped() {
    let engine = setup_engine().await;
    let ctx = &engine.context;

    let outcome = create_contract(ctx, TENANT, make_new_contract(), None).await.unwrap();

    let err = get_contract(ctx, "tenant-b", &outcome.contract.id).await.unwrap_err();
    assert!(matches!(err, SlotlineError::NotFound(_)), "got {err:?}");
}
