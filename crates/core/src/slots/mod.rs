//! Slot store: repository port, admin service and bulk provisioner.

pub mod ports;
pub mod provisioner;
pub mod service;

pub use provisioner::SlotProvisioner;
pub use service::SlotService;
