//! Event logging for the customer lifecycle.
//!
//! The event log is the only output of a run. It records every process-level
//! transition in the order it happened; events at the same instant keep their
//! emission order. Downstream consumers (trace writer, statistics report)
//! read it after the run.
//!
//! # Event Types
//!
//! - **CustomerArrival**: customer entered the hall
//! - **CustomerWaiting**: chosen desk was busy, customer joined its line
//! - **WalkToDesk**: desk granted, customer walks to it
//! - **BuyTickets**: service and paperwork finished
//! - **CustomerLeaves**: customer released the desk and left
//!
//! # Example
//!
//! ```rust
//! use ticket_desk_simulator_core_rs::models::event::{Event, EventLog};
//! use ticket_desk_simulator_core_rs::SimTime;
//!
//! let mut log = EventLog::new();
//! log.record(Event::CustomerArrival { time: SimTime::ZERO, customer_id: 1 });
//! log.record(Event::WalkToDesk { time: SimTime::ZERO, customer_id: 1, desk_id: 1 });
//!
//! assert_eq!(log.events_for_customer(1).len(), 2);
//! ```

use crate::core::time::SimTime;
use crate::models::customer::CustomerId;
use crate::models::desk::DeskId;

/// Simulation event capturing a customer stage transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Customer arrived; no desk chosen yet
    CustomerArrival { time: SimTime, customer_id: CustomerId },

    /// Chosen desk was busy; customer is waiting in its line
    CustomerWaiting {
        time: SimTime,
        customer_id: CustomerId,
        desk_id: DeskId,
    },

    /// Customer holds the desk and is walking to it
    WalkToDesk {
        time: SimTime,
        customer_id: CustomerId,
        desk_id: DeskId,
    },

    /// Transaction completed at the desk
    BuyTickets {
        time: SimTime,
        customer_id: CustomerId,
        desk_id: DeskId,
    },

    /// Customer released the desk and left
    CustomerLeaves {
        time: SimTime,
        customer_id: CustomerId,
        desk_id: DeskId,
    },
}

impl Event {
    pub const ARRIVAL: &'static str = "CUSTOMER_ARRIVAL";
    pub const WAITING: &'static str = "CUSTOMER_WAITING";
    pub const WALK_TO_DESK: &'static str = "WALK_TO_DESK";
    pub const BUY_TICKETS: &'static str = "BUY_TICKETS";
    pub const LEAVES: &'static str = "CUSTOMER_LEAVES";

    /// When the event happened
    pub fn time(&self) -> SimTime {
        match self {
            Event::CustomerArrival { time, .. }
            | Event::CustomerWaiting { time, .. }
            | Event::WalkToDesk { time, .. }
            | Event::BuyTickets { time, .. }
            | Event::CustomerLeaves { time, .. } => *time,
        }
    }

    /// Wire name of the event kind
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::CustomerArrival { .. } => Self::ARRIVAL,
            Event::CustomerWaiting { .. } => Self::WAITING,
            Event::WalkToDesk { .. } => Self::WALK_TO_DESK,
            Event::BuyTickets { .. } => Self::BUY_TICKETS,
            Event::CustomerLeaves { .. } => Self::LEAVES,
        }
    }

    pub fn customer_id(&self) -> CustomerId {
        match self {
            Event::CustomerArrival { customer_id, .. }
            | Event::CustomerWaiting { customer_id, .. }
            | Event::WalkToDesk { customer_id, .. }
            | Event::BuyTickets { customer_id, .. }
            | Event::CustomerLeaves { customer_id, .. } => *customer_id,
        }
    }

    /// Desk the event refers to; arrivals have none
    pub fn desk_id(&self) -> Option<DeskId> {
        match self {
            Event::CustomerArrival { .. } => None,
            Event::CustomerWaiting { desk_id, .. }
            | Event::WalkToDesk { desk_id, .. }
            | Event::BuyTickets { desk_id, .. }
            | Event::CustomerLeaves { desk_id, .. } => Some(*desk_id),
        }
    }
}

/// Append-only event recorder.
///
/// A thin wrapper around `Vec<Event>` with query helpers. It holds no
/// references back into the simulation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append an event; order is preserved exactly as recorded
    pub fn record(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The full ordered sequence, read-only
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Hand the ordered sequence to a consumer
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// Events recorded at exactly `time`
    pub fn events_at(&self, time: SimTime) -> Vec<&Event> {
        self.events.iter().filter(|e| e.time() == time).collect()
    }

    /// Events of one kind, by wire name
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn events_for_customer(&self, customer_id: CustomerId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.customer_id() == customer_id)
            .collect()
    }

    pub fn events_for_desk(&self, desk_id: DeskId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.desk_id() == Some(desk_id))
            .collect()
    }
}
