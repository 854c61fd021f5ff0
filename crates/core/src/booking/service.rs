//! Contract-linked booking service - core business logic

use std::sync::Arc;

use chrono::Utc;
use slotline_domain::constants::FIELD_CREATION;
use slotline_domain::{
    Appointment, AppointmentStatus, ConfirmationState, Contract, ContractAddon,
    ContractBookingOutcome, ContractWithAddons, NewContract, Result, SlotStatus, SlotlineError,
};
use tracing::info;
use uuid::Uuid;

use super::ports::ContractRepository;
use crate::appointments::ports::AppointmentTypeCatalog;
use crate::history::HistoryRecorder;
use crate::slots::ports::SlotRepository;

/// Creates contracts, optionally booking an installation appointment in the
/// same unit of work.
///
/// When a booking is requested, contract, add-ons, appointment and slot
/// claim persist together or not at all: the repository runs them in one
/// transaction and a lost slot race rolls everything back.
pub struct ContractBookingService {
    contracts: Arc<dyn ContractRepository>,
    slots: Arc<dyn SlotRepository>,
    catalog: Arc<dyn AppointmentTypeCatalog>,
    history: Arc<HistoryRecorder>,
}

impl ContractBookingService {
    /// Create a new contract booking service.
    pub fn new(
        contracts: Arc<dyn ContractRepository>,
        slots: Arc<dyn SlotRepository>,
        catalog: Arc<dyn AppointmentTypeCatalog>,
        history: Arc<HistoryRecorder>,
    ) -> Self {
        Self { contracts, slots, catalog, history }
    }

    /// Persist a new contract, with or without a slot booking.
    pub async fn create_contract(
        &self,
        tenant_id: &str,
        new: NewContract,
        actor_id: Option<&str>,
    ) -> Result<ContractBookingOutcome> {
        validate_contract(&new)?;

        let now = Utc::now().timestamp();
        let contract = Contract {
            id: Uuid::now_v7().to_string(),
            tenant_id: tenant_id.to_string(),
            client_name: new.client_name.clone(),
            client_email: new.client_email.clone(),
            client_phone: new.client_phone.clone(),
            plan_code: new.plan_code.clone(),
            sales_rep: new.sales_rep.clone(),
            created_at: now,
        };
        let addons: Vec<ContractAddon> = new
            .addons
            .iter()
            .map(|addon| ContractAddon {
                id: Uuid::now_v7().to_string(),
                tenant_id: tenant_id.to_string(),
                contract_id: contract.id.clone(),
                addon_code: addon.addon_code.clone(),
                quantity: addon.quantity,
            })
            .collect();

        let Some(booking) = &new.booking else {
            self.contracts.create(&contract, &addons).await?;
            info!(contract_id = %contract.id, "contract created without booking");
            return Ok(ContractBookingOutcome { contract, addons, appointment: None });
        };

        // Validate type and slot before any row is written; the transaction
        // inside create_with_booking re-checks the slot atomically.
        self.ensure_active_type(tenant_id, &booking.appointment_type).await?;
        let slot = self.slots.get_slot(tenant_id, booking.date, booking.slot_number).await?;
        match slot.status {
            SlotStatus::Available => {}
            SlotStatus::Blocked => {
                return Err(SlotlineError::SlotUnavailable(format!(
                    "slot {} on {} is blocked",
                    booking.slot_number, booking.date
                )));
            }
            SlotStatus::Occupied => {
                return Err(SlotlineError::SlotUnavailable(format!(
                    "slot {} on {} is already occupied",
                    booking.slot_number, booking.date
                )));
            }
        }

        let appointment = Appointment {
            id: Uuid::now_v7().to_string(),
            tenant_id: tenant_id.to_string(),
            date: booking.date,
            slot_number: booking.slot_number,
            client_name: new.client_name.clone(),
            client_email: new.client_email.clone(),
            client_phone: new.client_phone.clone(),
            appointment_type: booking.appointment_type.clone(),
            status: AppointmentStatus::Pending,
            confirmation: ConfirmationState::PreScheduled,
            technician_id: booking.technician_id.clone(),
            contract_id: Some(contract.id.clone()),
            origin: None,
            sales_rep: new.sales_rep.clone(),
            network: None,
            notes: booking.notes.clone(),
            client_code: None,
            created_at: now,
            updated_at: now,
        };

        self.contracts.create_with_booking(&contract, &addons, &appointment).await?;

        self.history
            .record_change(
                tenant_id,
                &appointment.id,
                FIELD_CREATION,
                None,
                Some(&appointment.id),
                actor_id,
            )
            .await;

        info!(
            contract_id = %contract.id,
            appointment_id = %appointment.id,
            "contract created with booking"
        );
        Ok(ContractBookingOutcome { contract, addons, appointment: Some(appointment) })
    }

    /// Fetch a contract with its add-ons.
    pub async fn get_contract(&self, tenant_id: &str, id: &str) -> Result<ContractWithAddons> {
        self.contracts.get_with_addons(tenant_id, id).await
    }

    async fn ensure_active_type(&self, tenant_id: &str, code: &str) -> Result<()> {
        if self.catalog.is_active(tenant_id, code).await? {
            Ok(())
        } else {
            Err(SlotlineError::Validation(format!(
                "unknown or disabled appointment type: {code}"
            )))
        }
    }
}

fn validate_contract(new: &NewContract) -> Result<()> {
    if new.client_name.trim().is_empty() {
        return Err(SlotlineError::Validation("client name must not be empty".to_string()));
    }
    for addon in &new.addons {
        if addon.quantity < 1 {
            return Err(SlotlineError::Validation(format!(
                "add-on {} must have a quantity of at least 1",
                addon.addon_code
            )));
        }
    }
    Ok(())
}
