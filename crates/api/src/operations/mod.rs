//! Engine operations - host application entry points
//!
//! Thin async functions over the context services. Hosts embed the engine by
//! building an [`EngineContext`](crate::context::EngineContext) and calling
//! these; every operation is tenant-scoped by its first argument after the
//! context.

pub mod appointments;
pub mod booking;
pub mod history;
pub mod slots;

pub use appointments::*;
pub use booking::*;
pub use history::*;
pub use slots::*;
