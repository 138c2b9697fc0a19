//! Ticket Desk Simulator Core - Rust Engine
//!
//! Discrete-event simulation of customers queueing at ticket desks, with
//! deterministic execution.
//!
//! # Architecture
//!
//! - **core**: Logical clock and event scheduler
//! - **models**: Domain types (ServiceDesk, Customer, Event)
//! - **policy**: Desk selection policies (shortest queue)
//! - **arrivals**: When customers enter the hall
//! - **orchestrator**: Main simulation loop
//! - **trace**: JSON trace artifact and its validation
//! - **report**: Per-desk statistics and throughput projections
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All time values are u64 milliseconds
//! 2. All randomness is deterministic (seeded RNG)
//! 3. Wakeups fire in (due time, schedule order); ties never depend on hashing
//!
//! # Example
//!
//! ```
//! use ticket_desk_simulator_core_rs::{Orchestrator, OrchestratorConfig};
//!
//! let config = OrchestratorConfig {
//!     num_desks: 2,
//!     num_customers: 5,
//!     rng_seed: Some(7),
//!     ..OrchestratorConfig::default()
//! };
//! let mut sim = Orchestrator::new(config).unwrap();
//! let summary = sim.run().unwrap();
//!
//! assert_eq!(summary.customers_served, 5);
//! assert!(sim.trace().validate().is_ok());
//! ```

// Module declarations
pub mod arrivals;
pub mod core;
pub mod models;
pub mod orchestrator;
pub mod policy;
pub mod report;
pub mod rng;
pub mod trace;

// Re-exports for convenience
pub use arrivals::ArrivalPattern;
pub use core::scheduler::{ScheduledWakeup, Scheduler, SchedulerError};
pub use core::time::{DelayRange, SimClock, SimTime};
pub use models::{
    customer::{Customer, CustomerError, CustomerId, CustomerStage},
    desk::{Access, DeskId, ResourceError, ServiceDesk},
    event::{Event, EventLog},
};
pub use orchestrator::{Orchestrator, OrchestratorConfig, RunSummary, SimulationError};
pub use policy::{QueueMetric, SelectionPolicy, ShortestQueuePolicy};
pub use report::{DeskReport, DeskStats, ReportError, Throughput};
pub use rng::{RngManager, DEFAULT_SEED};
pub use trace::{validate_trace, TraceDocument, TraceError, TraceRecord};
