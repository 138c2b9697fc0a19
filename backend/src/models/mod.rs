//! Domain models for the ticket desk simulator

pub mod customer;
pub mod desk;
pub mod event;

// Re-exports
pub use customer::{Customer, CustomerError, CustomerId, CustomerStage};
pub use desk::{Access, DeskId, ResourceError, ServiceDesk};
pub use event::{Event, EventLog};
