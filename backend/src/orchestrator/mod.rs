//! Orchestrator - main simulation loop
//!
//! Owns the scheduler, desks, customers and event log, and resumes one
//! customer at a time until no wakeups remain.
//!
//! See `engine.rs` for full implementation.

pub mod engine;


// Re-export main types for convenience
pub use engine::{Orchestrator, OrchestratorConfig, RunSummary, SimulationError};
