//! Port interfaces for contract persistence

use async_trait::async_trait;
use slotline_domain::{Appointment, Contract, ContractAddon, ContractWithAddons, Result};

/// Trait for persisting contracts and their add-on lines.
#[async_trait]
pub trait ContractRepository: Send + Sync {
    /// Persist a contract and its add-ons in one transaction.
    async fn create(&self, contract: &Contract, addons: &[ContractAddon]) -> Result<()>;

    /// Persist contract, add-ons and appointment, and claim the
    /// appointment's slot, all in one transaction.
    ///
    /// The slot claim is a compare-and-swap on available; when it matches no
    /// row the implementation must roll the entire transaction back and
    /// report why (occupied/blocked -> `SlotUnavailable` or `Conflict`,
    /// vanished -> `NotFound`). After a rollback none of the four writes
    /// survive.
    async fn create_with_booking(
        &self,
        contract: &Contract,
        addons: &[ContractAddon],
        appointment: &Appointment,
    ) -> Result<()>;

    /// Fetch a contract with its add-on lines. `NotFound` when absent.
    async fn get_with_addons(&self, tenant_id: &str, id: &str) -> Result<ContractWithAddons>;
}
