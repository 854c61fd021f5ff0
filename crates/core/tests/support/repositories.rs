//! Mock repository implementations for testing
//!
//! Provides in-memory mocks for all core repository ports, enabling
//! deterministic unit tests without database dependencies. The slot mock
//! honours the compare-and-swap contract of the real adapter, including the
//! Conflict/NotFound distinction, and can be armed to fail a transition on
//! demand to simulate lost races.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use slotline_core::{
    AppointmentRepository, AppointmentTypeCatalog, ContractRepository, EditHistoryRepository,
    RescheduleHistoryRepository, RescheduleMove, SlotRepository,
};
use slotline_domain::{
    Appointment, AppointmentStatus, Contract, ContractAddon, ContractWithAddons, EditHistoryEntry,
    RescheduleHistoryEntry, Result as DomainResult, Slot, SlotStatus, SlotlineError,
};

type SlotKey = (String, NaiveDate, i64);

/// In-memory mock for `SlotRepository`.
///
/// `fail_transition_after(n)` arms a one-shot failure: the next `n`
/// transitions succeed, the one after that returns `Conflict`. This is how
/// tests simulate a concurrent writer winning a slot race at a precise
/// point in a flow.
pub struct InMemorySlotRepository {
    slots: Mutex<HashMap<SlotKey, Slot>>,
    fail_after: Mutex<Option<u32>>,
}

impl InMemorySlotRepository {
    pub fn new() -> Self {
        Self { slots: Mutex::new(HashMap::new()), fail_after: Mutex::new(None) }
    }

    /// Put a slot into the store, replacing any previous row.
    pub fn seed(&self, slot: Slot) {
        let key = (slot.tenant_id.clone(), slot.date, slot.slot_number);
        self.slots.lock().expect("slot store poisoned").insert(key, slot);
    }

    /// Arm a simulated race: the next `successes` transitions run normally,
    /// the one after fails with `Conflict`.
    pub fn fail_transition_after(&self, successes: u32) {
        *self.fail_after.lock().expect("slot store poisoned") = Some(successes);
    }

    /// Direct snapshot of a slot for assertions.
    pub fn snapshot(&self, tenant_id: &str, date: NaiveDate, slot_number: i64) -> Option<Slot> {
        let key = (tenant_id.to_string(), date, slot_number);
        self.slots.lock().expect("slot store poisoned").get(&key).cloned()
    }

    fn should_fail_now(&self) -> bool {
        let mut guard = self.fail_after.lock().expect("slot store poisoned");
        match guard.as_mut() {
            Some(0) => {
                *guard = None;
                true
            }
            Some(n) => {
                *n -= 1;
                false
            }
            None => false,
        }
    }
}

#[async_trait]
impl SlotRepository for InMemorySlotRepository {
    async fn get_slot(
        &self,
        tenant_id: &str,
        date: NaiveDate,
        slot_number: i64,
    ) -> DomainResult<Slot> {
        let key = (tenant_id.to_string(), date, slot_number);
        self.slots
            .lock()
            .expect("slot store poisoned")
            .get(&key)
            .cloned()
            .ok_or_else(|| SlotlineError::NotFound(format!("slot {slot_number} on {date}")))
    }

    async fn list_slots(&self, tenant_id: &str, date: NaiveDate) -> DomainResult<Vec<Slot>> {
        let mut slots: Vec<Slot> = self
            .slots
            .lock()
            .expect("slot store poisoned")
            .values()
            .filter(|slot| slot.tenant_id == tenant_id && slot.date == date)
            .cloned()
            .collect();
        slots.sort_by_key(|slot| slot.slot_number);
        Ok(slots)
    }

    async fn transition(
        &self,
        tenant_id: &str,
        date: NaiveDate,
        slot_number: i64,
        expected: SlotStatus,
        next: SlotStatus,
        appointment_id: Option<&str>,
    ) -> DomainResult<Slot> {
        if self.should_fail_now() {
            return Err(SlotlineError::Conflict(
                "simulated concurrent slot claim".to_string(),
            ));
        }

        let key = (tenant_id.to_string(), date, slot_number);
        let mut slots = self.slots.lock().expect("slot store poisoned");
        match slots.get_mut(&key) {
            None => Err(SlotlineError::NotFound(format!("slot {slot_number} on {date}"))),
            Some(slot) if slot.status == expected => {
                slot.status = next;
                slot.appointment_id = appointment_id.map(ToString::to_string);
                slot.updated_at = Utc::now().timestamp();
                Ok(slot.clone())
            }
            Some(slot) => Err(SlotlineError::Conflict(format!(
                "slot {slot_number} on {date} expected {expected} but is {}",
                slot.status
            ))),
        }
    }

    async fn find_by_appointment(
        &self,
        tenant_id: &str,
        appointment_id: &str,
    ) -> DomainResult<Option<Slot>> {
        Ok(self
            .slots
            .lock()
            .expect("slot store poisoned")
            .values()
            .find(|slot| {
                slot.tenant_id == tenant_id
                    && slot.appointment_id.as_deref() == Some(appointment_id)
            })
            .cloned())
    }

    async fn release_for_appointment(
        &self,
        tenant_id: &str,
        appointment_id: &str,
    ) -> DomainResult<bool> {
        let mut slots = self.slots.lock().expect("slot store poisoned");
        for slot in slots.values_mut() {
            if slot.tenant_id == tenant_id
                && slot.status == SlotStatus::Occupied
                && slot.appointment_id.as_deref() == Some(appointment_id)
            {
                slot.status = SlotStatus::Available;
                slot.appointment_id = None;
                slot.updated_at = Utc::now().timestamp();
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn insert_contiguous(
        &self,
        tenant_id: &str,
        date: NaiveDate,
        quantity: u32,
    ) -> DomainResult<Vec<Slot>> {
        let mut slots = self.slots.lock().expect("slot store poisoned");
        let max = slots
            .values()
            .filter(|slot| slot.tenant_id == tenant_id && slot.date == date)
            .map(|slot| slot.slot_number)
            .max()
            .unwrap_or(0);

        let now = Utc::now().timestamp();
        let mut created = Vec::with_capacity(quantity as usize);
        for offset in 1..=i64::from(quantity) {
            let slot = Slot {
                tenant_id: tenant_id.to_string(),
                date,
                slot_number: max + offset,
                status: SlotStatus::Available,
                appointment_id: None,
                created_at: now,
                updated_at: now,
            };
            slots.insert((tenant_id.to_string(), date, slot.slot_number), slot.clone());
            created.push(slot);
        }
        Ok(created)
    }

    async fn delete_slot(
        &self,
        tenant_id: &str,
        date: NaiveDate,
        slot_number: i64,
    ) -> DomainResult<()> {
        let key = (tenant_id.to_string(), date, slot_number);
        let mut slots = self.slots.lock().expect("slot store poisoned");
        match slots.get(&key) {
            None => Err(SlotlineError::NotFound(format!("slot {slot_number} on {date}"))),
            Some(slot) if slot.status == SlotStatus::Occupied => {
                Err(SlotlineError::Validation(format!(
                    "slot {slot_number} on {date} is occupied and cannot be deleted"
                )))
            }
            Some(_) => {
                slots.remove(&key);
                Ok(())
            }
        }
    }
}

/// In-memory mock for `AppointmentRepository`.
///
/// Holds a handle to the slot mock so `execute_reschedule` can model the
/// real adapter's all-or-nothing transaction, including rolling the released
/// slot back when the new claim fails.
pub struct InMemoryAppointmentRepository {
    rows: Mutex<HashMap<(String, String), Appointment>>,
    slots: Arc<InMemorySlotRepository>,
}

impl InMemoryAppointmentRepository {
    pub fn new(slots: Arc<InMemorySlotRepository>) -> Self {
        Self { rows: Mutex::new(HashMap::new()), slots }
    }

    /// Number of stored appointment rows.
    pub fn count(&self) -> usize {
        self.rows.lock().expect("appointment store poisoned").len()
    }

    /// Direct snapshot of a row for assertions.
    pub fn stored(&self, tenant_id: &str, id: &str) -> Option<Appointment> {
        let key = (tenant_id.to_string(), id.to_string());
        self.rows.lock().expect("appointment store poisoned").get(&key).cloned()
    }

    fn write_row(&self, appointment: &Appointment) {
        let key = (appointment.tenant_id.clone(), appointment.id.clone());
        self.rows
            .lock()
            .expect("appointment store poisoned")
            .insert(key, appointment.clone());
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn insert(&self, appointment: &Appointment) -> DomainResult<()> {
        let key = (appointment.tenant_id.clone(), appointment.id.clone());
        let mut rows = self.rows.lock().expect("appointment store poisoned");
        if rows.contains_key(&key) {
            return Err(SlotlineError::Conflict(format!(
                "appointment {} already exists",
                appointment.id
            )));
        }
        rows.insert(key, appointment.clone());
        Ok(())
    }

    async fn update(&self, appointment: &Appointment) -> DomainResult<()> {
        let key = (appointment.tenant_id.clone(), appointment.id.clone());
        let mut rows = self.rows.lock().expect("appointment store poisoned");
        if !rows.contains_key(&key) {
            return Err(SlotlineError::NotFound(format!("appointment {}", appointment.id)));
        }
        rows.insert(key, appointment.clone());
        Ok(())
    }

    async fn get(&self, tenant_id: &str, id: &str) -> DomainResult<Appointment> {
        let key = (tenant_id.to_string(), id.to_string());
        self.rows
            .lock()
            .expect("appointment store poisoned")
            .get(&key)
            .cloned()
            .ok_or_else(|| SlotlineError::NotFound(format!("appointment {id}")))
    }

    async fn delete(&self, tenant_id: &str, id: &str) -> DomainResult<()> {
        let key = (tenant_id.to_string(), id.to_string());
        let mut rows = self.rows.lock().expect("appointment store poisoned");
        rows.remove(&key)
            .map(|_| ())
            .ok_or_else(|| SlotlineError::NotFound(format!("appointment {id}")))
    }

    async fn list_for_date(
        &self,
        tenant_id: &str,
        date: NaiveDate,
    ) -> DomainResult<Vec<Appointment>> {
        let mut rows: Vec<Appointment> = self
            .rows
            .lock()
            .expect("appointment store poisoned")
            .values()
            .filter(|row| row.tenant_id == tenant_id && row.date == date)
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.slot_number);
        Ok(rows)
    }

    async fn execute_reschedule(
        &self,
        tenant_id: &str,
        mv: &RescheduleMove,
    ) -> DomainResult<Appointment> {
        let current = self.get(tenant_id, &mv.appointment_id).await?;

        self.slots
            .transition(
                tenant_id,
                mv.old_date,
                mv.old_slot_number,
                SlotStatus::Occupied,
                SlotStatus::Available,
                None,
            )
            .await?;

        let claim = self
            .slots
            .transition(
                tenant_id,
                mv.new_date,
                mv.new_slot_number,
                SlotStatus::Available,
                SlotStatus::Occupied,
                Some(&mv.appointment_id),
            )
            .await;

        if let Err(err) = claim {
            // Model the transaction rollback: re-occupy the old slot so the
            // world looks exactly as before the call.
            let _ = self
                .slots
                .transition(
                    tenant_id,
                    mv.old_date,
                    mv.old_slot_number,
                    SlotStatus::Available,
                    SlotStatus::Occupied,
                    Some(&mv.appointment_id),
                )
                .await;
            return Err(err);
        }

        let mut moved = current;
        moved.date = mv.new_date;
        moved.slot_number = mv.new_slot_number;
        moved.status = AppointmentStatus::Rescheduled;
        moved.updated_at = Utc::now().timestamp();
        self.write_row(&moved);
        Ok(moved)
    }
}

/// In-memory mock for `ContractRepository`.
///
/// `create_with_booking` claims the slot first; when the claim fails nothing
/// else is written, which is exactly the observable behaviour of the real
/// adapter's rolled-back transaction.
pub struct InMemoryContractRepository {
    contracts: Mutex<HashMap<(String, String), Contract>>,
    addons: Mutex<Vec<ContractAddon>>,
    slots: Arc<InMemorySlotRepository>,
    appointments: Arc<InMemoryAppointmentRepository>,
}

impl InMemoryContractRepository {
    pub fn new(
        slots: Arc<InMemorySlotRepository>,
        appointments: Arc<InMemoryAppointmentRepository>,
    ) -> Self {
        Self {
            contracts: Mutex::new(HashMap::new()),
            addons: Mutex::new(Vec::new()),
            slots,
            appointments,
        }
    }

    pub fn contract_count(&self) -> usize {
        self.contracts.lock().expect("contract store poisoned").len()
    }

    pub fn addon_count(&self) -> usize {
        self.addons.lock().expect("contract store poisoned").len()
    }

    fn write(&self, contract: &Contract, addons: &[ContractAddon]) {
        let key = (contract.tenant_id.clone(), contract.id.clone());
        self.contracts.lock().expect("contract store poisoned").insert(key, contract.clone());
        self.addons.lock().expect("contract store poisoned").extend(addons.iter().cloned());
    }
}

#[async_trait]
impl ContractRepository for InMemoryContractRepository {
    async fn create(&self, contract: &Contract, addons: &[ContractAddon]) -> DomainResult<()> {
        self.write(contract, addons);
        Ok(())
    }

    async fn create_with_booking(
        &self,
        contract: &Contract,
        addons: &[ContractAddon],
        appointment: &Appointment,
    ) -> DomainResult<()> {
        // Slot claim first: when it fails, no row below is written, the
        // in-memory equivalent of rolling back the whole transaction.
        self.slots
            .transition(
                &appointment.tenant_id,
                appointment.date,
                appointment.slot_number,
                SlotStatus::Available,
                SlotStatus::Occupied,
                Some(&appointment.id),
            )
            .await?;

        self.write(contract, addons);
        self.appointments.write_row(appointment);
        Ok(())
    }

    async fn get_with_addons(
        &self,
        tenant_id: &str,
        id: &str,
    ) -> DomainResult<ContractWithAddons> {
        let key = (tenant_id.to_string(), id.to_string());
        let contract = self
            .contracts
            .lock()
            .expect("contract store poisoned")
            .get(&key)
            .cloned()
            .ok_or_else(|| SlotlineError::NotFound(format!("contract {id}")))?;
        let addons = self
            .addons
            .lock()
            .expect("contract store poisoned")
            .iter()
            .filter(|addon| addon.tenant_id == tenant_id && addon.contract_id == id)
            .cloned()
            .collect();
        Ok(ContractWithAddons { contract, addons })
    }
}

/// In-memory mock for `EditHistoryRepository` with a switchable failure mode
/// for exercising the recorder's best-effort behaviour.
pub struct InMemoryEditHistoryRepository {
    entries: Mutex<Vec<EditHistoryEntry>>,
    fail_appends: AtomicBool,
}

impl InMemoryEditHistoryRepository {
    pub fn new() -> Self {
        Self { entries: Mutex::new(Vec::new()), fail_appends: AtomicBool::new(false) }
    }

    /// Make every subsequent append fail.
    pub fn fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    /// All recorded entries in insertion order.
    pub fn entries(&self) -> Vec<EditHistoryEntry> {
        self.entries.lock().expect("history store poisoned").clone()
    }

    /// Entries for one entity in insertion order.
    pub fn entries_for(&self, entity_id: &str) -> Vec<EditHistoryEntry> {
        self.entries
            .lock()
            .expect("history store poisoned")
            .iter()
            .filter(|entry| entry.entity_id == entity_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EditHistoryRepository for InMemoryEditHistoryRepository {
    async fn append(&self, entry: &EditHistoryEntry) -> DomainResult<()> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(SlotlineError::Database("simulated history outage".to_string()));
        }
        self.entries.lock().expect("history store poisoned").push(entry.clone());
        Ok(())
    }

    async fn list_for_entity(
        &self,
        tenant_id: &str,
        entity_id: &str,
    ) -> DomainResult<Vec<EditHistoryEntry>> {
        let entries = self.entries.lock().expect("history store poisoned");
        Ok(entries
            .iter()
            .rev()
            .filter(|entry| entry.tenant_id == tenant_id && entry.entity_id == entity_id)
            .cloned()
            .collect())
    }
}

/// In-memory mock for `RescheduleHistoryRepository` with the same switchable
/// failure mode.
pub struct InMemoryRescheduleHistoryRepository {
    entries: Mutex<Vec<RescheduleHistoryEntry>>,
    fail_appends: AtomicBool,
}

impl InMemoryRescheduleHistoryRepository {
    pub fn new() -> Self {
        Self { entries: Mutex::new(Vec::new()), fail_appends: AtomicBool::new(false) }
    }

    /// Make every subsequent append fail.
    pub fn fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    /// All recorded entries in insertion order.
    pub fn entries(&self) -> Vec<RescheduleHistoryEntry> {
        self.entries.lock().expect("history store poisoned").clone()
    }
}

#[async_trait]
impl RescheduleHistoryRepository for InMemoryRescheduleHistoryRepository {
    async fn append(&self, entry: &RescheduleHistoryEntry) -> DomainResult<()> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(SlotlineError::Database("simulated history outage".to_string()));
        }
        self.entries.lock().expect("history store poisoned").push(entry.clone());
        Ok(())
    }

    async fn list_for_appointment(
        &self,
        tenant_id: &str,
        appointment_id: &str,
    ) -> DomainResult<Vec<RescheduleHistoryEntry>> {
        let entries = self.entries.lock().expect("history store poisoned");
        Ok(entries
            .iter()
            .rev()
            .filter(|entry| {
                entry.tenant_id == tenant_id && entry.appointment_id == appointment_id
            })
            .cloned()
            .collect())
    }
}

/// In-memory appointment type catalog.
pub struct StaticCatalog {
    // (tenant, code) -> disabled flag
    types: Mutex<HashMap<(String, String), bool>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self { types: Mutex::new(HashMap::new()) }
    }

    /// Builder: add an active type.
    pub fn with_type(self, tenant_id: &str, code: &str) -> Self {
        self.types
            .lock()
            .expect("catalog poisoned")
            .insert((tenant_id.to_string(), code.to_string()), false);
        self
    }

    /// Builder: add a disabled type.
    pub fn with_disabled_type(self, tenant_id: &str, code: &str) -> Self {
        self.types
            .lock()
            .expect("catalog poisoned")
            .insert((tenant_id.to_string(), code.to_string()), true);
        self
    }

    /// Flip an existing type to disabled.
    pub fn disable(&self, tenant_id: &str, code: &str) {
        if let Some(disabled) = self
            .types
            .lock()
            .expect("catalog poisoned")
            .get_mut(&(tenant_id.to_string(), code.to_string()))
        {
            *disabled = true;
        }
    }
}

#[async_trait]
impl AppointmentTypeCatalog for StaticCatalog {
    async fn is_active(&self, tenant_id: &str, code: &str) -> DomainResult<bool> {
        let types = self.types.lock().expect("catalog poisoned");
        Ok(matches!(types.get(&(tenant_id.to_string(), code.to_string())), Some(false)))
    }
}
