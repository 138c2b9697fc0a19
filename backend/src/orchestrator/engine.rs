//! Orchestrator Engine
//!
//! Main simulation loop integrating all components:
//! - Customer arrivals (deterministic schedule)
//! - Desk selection (shortest-queue policy)
//! - Desk contention (capacity-1 desks with FIFO lines)
//! - Timed stages (walking, service, post-service delay)
//! - Event logging (complete customer history)
//!
//! # Architecture
//!
//! ```text
//! Orchestrator::new:
//!   validate config → build desks and customers → schedule arrivals
//!
//! Orchestrator::run, until the scheduler is empty:
//!   1. Pop earliest (due, seq) wakeup; clock jumps to `due`
//!   2. Resume that customer according to its stage:
//!        Pending     → ARRIVAL, pick desk, request access
//!                        granted → WALK_TO_DESK, sleep(walk)
//!                        queued  → CUSTOMER_WAITING, sleep until granted
//!        Queueing    → WALK_TO_DESK, sleep(walk)
//!        Approaching → confirm occupancy, sleep(service)
//!        Servicing   → sleep(post-service delay)
//!        PostService → BUY_TICKETS, CUSTOMER_LEAVES, release desk,
//!                      wake next in line at the same instant
//! ```
//!
//! Only one customer is resumed at a time, and the orchestrator owns every
//! desk, customer, the scheduler and the log, so `&mut self` serialises all
//! shared-state access.
//!
//! # Example
//!
//! ```rust
//! use ticket_desk_simulator_core_rs::orchestrator::{Orchestrator, OrchestratorConfig};
//!
//! let config = OrchestratorConfig {
//!     num_desks: 1,
//!     num_customers: 3,
//!     service_duration: 3.0,
//!     rng_seed: Some(7),
//!     ..Default::default()
//! };
//!
//! let mut orchestrator = Orchestrator::new(config).unwrap();
//! let summary = orchestrator.run().unwrap();
//!
//! assert_eq!(summary.customers_served, 3);
//! assert_eq!(orchestrator.event_log().events_of_type("CUSTOMER_WAITING").len(), 2);
//! ```

use crate::arrivals::ArrivalPattern;
use crate::core::scheduler::{Scheduler, SchedulerError};
use crate::core::time::{seconds_to_millis, DelayRange, MillisRange, SimTime, MAX_DELAY_MILLIS};
use crate::models::customer::{Customer, CustomerError, CustomerId, CustomerStage};
use crate::models::desk::{Access, DeskId, ResourceError, ServiceDesk};
use crate::models::event::{Event, EventLog};
use crate::policy::{QueueMetric, SelectionPolicy, ShortestQueuePolicy};
use crate::rng::RngManager;
use crate::trace::TraceDocument;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete orchestrator configuration
///
/// Durations are in seconds. Missing fields take the defaults: 4 desks,
/// 25 customers, 3 s of service, walking and paperwork drawn from 0.5 to 2.0 s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrchestratorConfig {
    /// Number of desks (service points)
    pub num_desks: usize,

    /// Number of customers to simulate
    pub num_customers: usize,

    /// Fixed time a desk spends serving one customer (seconds)
    pub service_duration: f64,

    /// RNG seed; `None` uses `rng::DEFAULT_SEED`
    pub rng_seed: Option<u64>,

    /// Walking time from the line to the desk
    pub walk_time: DelayRange,

    /// Payment/paperwork time after service
    pub post_service_delay: DelayRange,

    /// When customers arrive
    pub arrivals: ArrivalPattern,

    /// How the selection policy measures queue length
    pub queue_metric: QueueMetric,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            num_desks: 4,
            num_customers: 25,
            service_duration: 3.0,
            rng_seed: None,
            walk_time: DelayRange::new(0.5, 2.0),
            post_service_delay: DelayRange::new(0.5, 2.0),
            arrivals: ArrivalPattern::Simultaneous,
            queue_metric: QueueMetric::InLine,
        }
    }
}

/// Configuration after validation, in simulation units
#[derive(Debug, Clone, Copy)]
struct Timings {
    service_ms: u64,
    walk_time: MillisRange,
    post_service_delay: MillisRange,
}

/// Simulation error types
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    /// Configuration rejected before the run started
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Scheduler misuse or a wakeup past the end of the timeline
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    /// Desk occupancy invariant violated
    #[error("Resource consistency error: {0}")]
    ResourceConsistency(#[from] ResourceError),

    /// Customer lifecycle violated
    #[error("Customer lifecycle error: {0}")]
    Customer(#[from] CustomerError),

    #[error("Unknown customer: {0}")]
    UnknownCustomer(CustomerId),

    #[error("Unknown desk: {0}")]
    UnknownDesk(DeskId),

    /// A wakeup arrived for a customer that should not have one
    #[error("Customer {customer} woken in stage {stage}")]
    UnexpectedStage {
        customer: CustomerId,
        stage: CustomerStage,
    },
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Customers that reached `Departed`
    pub customers_served: usize,

    /// Events in the log
    pub events_recorded: usize,

    /// Clock value when the last wakeup ran
    pub end_time: SimTime,
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Owns the whole simulation and drives the run loop
///
/// # Determinism
///
/// All randomness comes from `rng_manager` (seeded xorshift64*) and every
/// tie is broken by scheduling order, so the same configuration always
/// produces the same event log.
pub struct Orchestrator {
    config: OrchestratorConfig,

    timings: Timings,

    scheduler: Scheduler,

    rng_manager: RngManager,

    policy: Box<dyn SelectionPolicy>,

    /// Desk `id` lives at index `id - 1`
    desks: Vec<ServiceDesk>,

    /// Customer `id` lives at index `id - 1`
    customers: Vec<Customer>,

    event_log: EventLog,
}

impl Orchestrator {
    /// Create new orchestrator from configuration
    ///
    /// Validates the configuration, creates desks `1..=num_desks` and
    /// customers `1..=num_customers`, and schedules every arrival.
    pub fn new(config: OrchestratorConfig) -> Result<Self, SimulationError> {
        let timings = Self::validate_config(&config)?;
        let arrivals = config
            .arrivals
            .to_schedule()
            .ok_or_else(|| SimulationError::InvalidConfig(range_rule("arrivals gap")))?;

        let mut rng_manager = RngManager::from_seed(config.rng_seed);
        let policy: Box<dyn SelectionPolicy> =
            Box::new(ShortestQueuePolicy::new(config.queue_metric));

        let desks = (1..=config.num_desks as DeskId)
            .map(ServiceDesk::new)
            .collect();
        let customers: Vec<Customer> = (1..=config.num_customers as CustomerId)
            .map(Customer::new)
            .collect();

        let mut scheduler = Scheduler::new();
        let arrival_times = arrivals
            .arrival_times(customers.len(), &mut rng_manager)
            .ok_or_else(|| {
                SimulationError::InvalidConfig(
                    "arrival times run past the end of the timeline".to_string(),
                )
            })?;
        for (customer, at) in customers.iter().zip(arrival_times) {
            scheduler.schedule_at(at, customer.id())?;
        }

        if config.num_customers == 0 {
            warn!("num_customers is 0; the run will produce an empty trace");
        }

        Ok(Self {
            config,
            timings,
            scheduler,
            rng_manager,
            policy,
            desks,
            customers,
            event_log: EventLog::new(),
        })
    }

    /// Validate configuration
    fn validate_config(config: &OrchestratorConfig) -> Result<Timings, SimulationError> {
        if config.num_desks == 0 {
            return Err(SimulationError::InvalidConfig(
                "num_desks must be > 0".to_string(),
            ));
        }

        if DeskId::try_from(config.num_desks).is_err() {
            return Err(SimulationError::InvalidConfig(format!(
                "num_desks must be <= {}",
                DeskId::MAX
            )));
        }

        if CustomerId::try_from(config.num_customers).is_err() {
            return Err(SimulationError::InvalidConfig(format!(
                "num_customers must be <= {}",
                CustomerId::MAX
            )));
        }

        if !(config.service_duration.is_finite() && config.service_duration > 0.0) {
            return Err(SimulationError::InvalidConfig(format!(
                "service_duration must be a positive number of seconds, got {}",
                config.service_duration
            )));
        }

        let service_ms = seconds_to_millis(config.service_duration).ok_or_else(|| {
            SimulationError::InvalidConfig(format!(
                "service_duration must be at most {}ms, got {} seconds",
                MAX_DELAY_MILLIS, config.service_duration
            ))
        })?;

        if service_ms == 0 {
            return Err(SimulationError::InvalidConfig(
                "service_duration must be at least 1ms".to_string(),
            ));
        }

        let walk_time = config
            .walk_time
            .to_millis()
            .ok_or_else(|| SimulationError::InvalidConfig(range_rule("walk_time")))?;

        let post_service_delay = config
            .post_service_delay
            .to_millis()
            .ok_or_else(|| SimulationError::InvalidConfig(range_rule("post_service_delay")))?;

        Ok(Timings {
            service_ms,
            walk_time,
            post_service_delay,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Current simulation time
    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    pub fn desks(&self) -> &[ServiceDesk] {
        &self.desks
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Wakeups still waiting in the scheduler
    pub fn pending_wakeups(&self) -> usize {
        self.scheduler.len()
    }

    /// Whether every scheduled wakeup has run
    pub fn is_finished(&self) -> bool {
        self.scheduler.is_empty()
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Consume the orchestrator, keeping only the event log
    pub fn into_event_log(self) -> EventLog {
        self.event_log
    }

    /// Serializable trace of the run so far
    pub fn trace(&self) -> TraceDocument {
        TraceDocument::from_log(self.desks.len(), &self.event_log)
    }

    pub fn customer(&self, id: CustomerId) -> Result<&Customer, SimulationError> {
        id.checked_sub(1)
            .and_then(|index| self.customers.get(index as usize))
            .ok_or(SimulationError::UnknownCustomer(id))
    }

    fn customer_mut(&mut self, id: CustomerId) -> Result<&mut Customer, SimulationError> {
        id.checked_sub(1)
            .and_then(|index| self.customers.get_mut(index as usize))
            .ok_or(SimulationError::UnknownCustomer(id))
    }

    pub fn desk(&self, id: DeskId) -> Result<&ServiceDesk, SimulationError> {
        id.checked_sub(1)
            .and_then(|index| self.desks.get(index as usize))
            .ok_or(SimulationError::UnknownDesk(id))
    }

    fn desk_mut(&mut self, id: DeskId) -> Result<&mut ServiceDesk, SimulationError> {
        id.checked_sub(1)
            .and_then(|index| self.desks.get_mut(index as usize))
            .ok_or(SimulationError::UnknownDesk(id))
    }

    // ========================================================================
    // Run Loop
    // ========================================================================

    /// Run until no wakeups remain
    ///
    /// Any error aborts the run; the event log then holds everything recorded
    /// up to the failing step.
    pub fn run(&mut self) -> Result<RunSummary, SimulationError> {
        info!(
            desks = self.desks.len(),
            customers = self.customers.len(),
            service_ms = self.timings.service_ms,
            "starting simulation run"
        );

        while self.step()?.is_some() {}

        let summary = RunSummary {
            customers_served: self
                .customers
                .iter()
                .filter(|c| c.stage() == CustomerStage::Departed)
                .count(),
            events_recorded: self.event_log.len(),
            end_time: self.now(),
        };

        info!(
            served = summary.customers_served,
            events = summary.events_recorded,
            end_time = %summary.end_time,
            "simulation finished"
        );
        Ok(summary)
    }

    /// Run the single next wakeup
    ///
    /// Returns the time it ran at, or `None` when the scheduler is empty.
    pub fn step(&mut self) -> Result<Option<SimTime>, SimulationError> {
        let Some(wakeup) = self.scheduler.pop_next()? else {
            return Ok(None);
        };
        self.resume(wakeup.customer)?;
        Ok(Some(wakeup.due))
    }

    fn resume(&mut self, id: CustomerId) -> Result<(), SimulationError> {
        match self.customer(id)?.stage() {
            CustomerStage::Pending => self.arrive(id),
            CustomerStage::Queueing => self.begin_approach(id),
            CustomerStage::Approaching => self.acquire_and_serve(id),
            CustomerStage::Servicing => self.finish_service(id),
            CustomerStage::PostService => self.depart(id),
            stage => Err(SimulationError::UnexpectedStage {
                customer: id,
                stage,
            }),
        }
    }

    /// Suspend `id` for `delay_ms` milliseconds
    fn suspend(&mut self, id: CustomerId, delay_ms: u64) -> Result<(), SimulationError> {
        let delay = i64::try_from(delay_ms)
            .map_err(|_| SchedulerError::DelayOutOfRange { delay_ms })?;
        self.scheduler.schedule(delay, id)?;
        Ok(())
    }

    // ========================================================================
    // Customer Stages
    // ========================================================================

    fn arrive(&mut self, id: CustomerId) -> Result<(), SimulationError> {
        let now = self.now();
        self.customer_mut(id)?.arrive(now)?;
        self.event_log.record(Event::CustomerArrival {
            time: now,
            customer_id: id,
        });

        let index = self
            .policy
            .pick(&self.desks)
            .ok_or_else(|| SimulationError::InvalidConfig("no desks to choose from".to_string()))?;
        let desk = &mut self.desks[index];
        let desk_id = desk.id();
        let access = desk.request_access(id);
        self.customer_mut(id)?.bind_desk(desk_id)?;

        match access {
            Access::Granted => self.begin_approach(id),
            Access::Queued { position } => {
                self.customer_mut(id)?.enter(CustomerStage::Queueing)?;
                self.event_log.record(Event::CustomerWaiting {
                    time: now,
                    customer_id: id,
                    desk_id,
                });
                debug!(customer = id, desk = desk_id, position, time = %now, "customer waiting");
                Ok(())
            }
        }
    }

    fn begin_approach(&mut self, id: CustomerId) -> Result<(), SimulationError> {
        let now = self.now();
        let customer = self.customer_mut(id)?;
        customer.enter(CustomerStage::Approaching)?;
        let desk_id = customer.bound_desk()?;

        self.event_log.record(Event::WalkToDesk {
            time: now,
            customer_id: id,
            desk_id,
        });

        let walk_ms = self.timings.walk_time.sample(&mut self.rng_manager);
        debug!(customer = id, desk = desk_id, walk_ms, time = %now, "walking to desk");
        self.suspend(id, walk_ms)
    }

    /// Confirms the grant obtained at arrival or on release, then starts service
    fn acquire_and_serve(&mut self, id: CustomerId) -> Result<(), SimulationError> {
        let now = self.now();
        let desk_id = self.customer(id)?.bound_desk()?;
        self.desk(desk_id)?.confirm_occupant(id)?;

        let customer = self.customer_mut(id)?;
        customer.acquire(now)?;
        customer.enter(CustomerStage::Servicing)?;
        debug!(
            customer = id,
            desk = desk_id,
            wait_ms = ?customer.wait_millis(),
            time = %now,
            "service started"
        );

        self.suspend(id, self.timings.service_ms)
    }

    fn finish_service(&mut self, id: CustomerId) -> Result<(), SimulationError> {
        self.customer_mut(id)?.enter(CustomerStage::PostService)?;
        let delay_ms = self.timings.post_service_delay.sample(&mut self.rng_manager);
        self.suspend(id, delay_ms)
    }

    fn depart(&mut self, id: CustomerId) -> Result<(), SimulationError> {
        let now = self.now();
        let customer = self.customer_mut(id)?;
        customer.enter(CustomerStage::Departed)?;
        let desk_id = customer.bound_desk()?;
        let arrived_at = customer.arrived_at();

        self.event_log.record(Event::BuyTickets {
            time: now,
            customer_id: id,
            desk_id,
        });
        self.event_log.record(Event::CustomerLeaves {
            time: now,
            customer_id: id,
            desk_id,
        });

        if let Some(next) = self.desk_mut(desk_id)?.release(id)? {
            // Granted inside release; resume at this same instant
            self.scheduler.schedule(0, next)?;
            debug!(desk = desk_id, customer = next, time = %now, "desk handed to next in line");
        }

        debug!(
            customer = id,
            desk = desk_id,
            cycle_ms = ?arrived_at.map(|t| now.since(t)),
            time = %now,
            "customer left"
        );
        Ok(())
    }
}

/// Validation message for a `DelayRange` field
fn range_rule(field: &str) -> String {
    format!("{} must satisfy 0 <= min <= max <= {}ms", field, MAX_DELAY_MILLIS)
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("now", &self.now())
            .field("desks", &self.desks.len())
            .field("customers", &self.customers.len())
            .field("pending_wakeups", &self.scheduler.len())
            .field("events", &self.event_log.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
