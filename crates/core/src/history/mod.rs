//! Audit trail: history repository ports and the recorder service.

pub mod ports;
pub mod recorder;

pub use recorder::HistoryRecorder;
