//! Contract booking operations
//!
//! # Operations
//!
//! - `create_contract` - Persist a sale, optionally claiming a slot for the
//!   installation appointment in the same unit of work
//! - `get_contract` - Contract with its add-on lines

use slotline_domain::{ContractBookingOutcome, ContractWithAddons, NewContract, Result};
use tracing::info;

use crate::context::EngineContext;

// ============================================================================
// Operation: create_contract
// ============================================================================

/// Create a contract, optionally booking an installation appointment.
///
/// Without a booking this is a plain insert of contract and add-ons. With a
/// booking, contract, add-ons, appointment and slot claim all persist or all
/// roll back together; losing the slot race leaves no contract behind.
pub async fn create_contract(
    context: &EngineContext,
    tenant_id: &str,
    new: NewContract,
    actor_id: Option<&str>,
) -> Result<ContractBookingOutcome> {
    info!(tenant_id, with_booking = new.booking.is_some(), "creating contract");
    context.booking_service.create_contract(tenant_id, new, actor_id).await
}

// ============================================================================
// Operation: get_contract
// ============================================================================

/// Fetch a contract with its add-on lines.
pub async fn get_contract(
    context: &EngineContext,
    tenant_id: &str,
    id: &str,
) -> Result<ContractWithAddons> {
    context.booking_service.get_contract(tenant_id, id).await
}
