//! Desk Selection Policy Module
//!
//! An arriving customer picks a desk exactly once, before it observes any
//! contention of its own. The choice is a snapshot heuristic: customers
//! arriving later may make an earlier choice look poor.
//!
//! # Policy Interface
//!
//! All policies implement the `SelectionPolicy` trait:
//! ```rust
//! use ticket_desk_simulator_core_rs::policy::SelectionPolicy;
//! use ticket_desk_simulator_core_rs::models::desk::ServiceDesk;
//!
//! struct AlwaysFirst;
//!
//! impl SelectionPolicy for AlwaysFirst {
//!     fn pick(&self, desks: &[ServiceDesk]) -> Option<usize> {
//!         if desks.is_empty() { None } else { Some(0) }
//!     }
//! }
//! ```
//!
//! Available policies:
//! 1. **ShortestQueue**: fewest customers in line, lowest index on ties

use crate::models::desk::ServiceDesk;
use serde::{Deserialize, Serialize};

pub mod shortest_queue;

pub use shortest_queue::ShortestQueuePolicy;

/// Chooses a desk for an arriving customer
pub trait SelectionPolicy: Send + Sync {
    /// Index into `desks` of the chosen desk, or `None` if there are none
    fn pick(&self, desks: &[ServiceDesk]) -> Option<usize>;
}

/// How queue length is measured when comparing desks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueMetric {
    /// Waiting customers plus the one being served
    #[default]
    InLine,
    /// Waiting customers only; an occupied desk with nobody waiting counts as empty
    Waiting,
}

impl QueueMetric {
    /// Queue length of `desk` under this metric
    pub fn measure(self, desk: &ServiceDesk) -> usize {
        match self {
            QueueMetric::InLine => desk.in_line(),
            QueueMetric::Waiting => desk.queue_len(),
        }
    }
}
