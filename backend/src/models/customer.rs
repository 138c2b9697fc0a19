//! Customer process model
//!
//! A customer is an explicit state machine. Each suspension point (waiting in
//! line, walking, being served, paying) is represented by its stage plus
//! either a pending scheduler wakeup or membership of a desk's wait list.
//!
//! # Stage order
//!
//! ```text
//! Pending → Arrived ─┬────────────→ Approaching → Acquire → Servicing → PostService → Departed
//!                    └→ Queueing ──┘
//! ```

use crate::core::time::SimTime;
use crate::models::desk::DeskId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Customer identifier, 1-based
pub type CustomerId = u32;

/// Lifecycle stage of a customer process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStage {
    /// Created, arrival not yet due
    Pending,
    /// Arrived and choosing a desk
    Arrived,
    /// In a desk's wait list
    Queueing,
    /// Desk granted, walking to it
    Approaching,
    /// Confirming occupancy of the desk
    Acquire,
    /// Being served for the fixed service duration
    Servicing,
    /// Paying / paperwork after service
    PostService,
    /// Left the system
    Departed,
}

impl CustomerStage {
    /// Whether `next` directly follows `self` in the lifecycle
    pub fn can_advance_to(self, next: CustomerStage) -> bool {
        use CustomerStage::*;
        matches!(
            (self, next),
            (Pending, Arrived)
                | (Arrived, Queueing)
                | (Arrived, Approaching)
                | (Queueing, Approaching)
                | (Approaching, Acquire)
                | (Acquire, Servicing)
                | (Servicing, PostService)
                | (PostService, Departed)
        )
    }
}

impl fmt::Display for CustomerStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Errors raised by customer state transitions
#[derive(Debug, Error, PartialEq)]
pub enum CustomerError {
    #[error("Customer {customer}: invalid transition {from} -> {to}")]
    InvalidTransition {
        customer: CustomerId,
        from: CustomerStage,
        to: CustomerStage,
    },

    #[error("Customer {customer} is already bound to desk {desk}")]
    AlreadyBound { customer: CustomerId, desk: DeskId },

    #[error("Customer {customer} has no desk")]
    Unbound { customer: CustomerId },
}

/// One simulated customer
///
/// # Example
/// ```
/// use ticket_desk_simulator_core_rs::models::customer::{Customer, CustomerStage};
/// use ticket_desk_simulator_core_rs::SimTime;
///
/// let mut customer = Customer::new(1);
/// customer.arrive(SimTime::ZERO).unwrap();
/// customer.bind_desk(2).unwrap();
/// customer.enter(CustomerStage::Approaching).unwrap();
/// assert_eq!(customer.desk(), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    id: CustomerId,
    stage: CustomerStage,
    desk: Option<DeskId>,
    arrived_at: Option<SimTime>,
    acquired_at: Option<SimTime>,
}

impl Customer {
    pub fn new(id: CustomerId) -> Self {
        Self {
            id,
            stage: CustomerStage::Pending,
            desk: None,
            arrived_at: None,
            acquired_at: None,
        }
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn stage(&self) -> CustomerStage {
        self.stage
    }

    /// Desk bound at selection time
    pub fn desk(&self) -> Option<DeskId> {
        self.desk
    }

    /// Bound desk, or an error if selection has not happened yet
    pub fn bound_desk(&self) -> Result<DeskId, CustomerError> {
        self.desk.ok_or(CustomerError::Unbound { customer: self.id })
    }

    pub fn arrived_at(&self) -> Option<SimTime> {
        self.arrived_at
    }

    pub fn acquired_at(&self) -> Option<SimTime> {
        self.acquired_at
    }

    /// Milliseconds between arrival and confirmed desk occupancy
    pub fn wait_millis(&self) -> Option<u64> {
        Some(self.acquired_at?.since(self.arrived_at?))
    }

    /// Move to the next stage, rejecting anything out of lifecycle order
    pub fn enter(&mut self, next: CustomerStage) -> Result<(), CustomerError> {
        if !self.stage.can_advance_to(next) {
            return Err(CustomerError::InvalidTransition {
                customer: self.id,
                from: self.stage,
                to: next,
            });
        }
        self.stage = next;
        Ok(())
    }

    /// Enter `Arrived` and stamp the arrival time
    pub fn arrive(&mut self, now: SimTime) -> Result<(), CustomerError> {
        self.enter(CustomerStage::Arrived)?;
        self.arrived_at = Some(now);
        Ok(())
    }

    /// Enter `Acquire` and stamp the acquisition time
    pub fn acquire(&mut self, now: SimTime) -> Result<(), CustomerError> {
        self.enter(CustomerStage::Acquire)?;
        self.acquired_at = Some(now);
        Ok(())
    }

    /// Bind the customer to a desk; the binding never changes afterwards
    pub fn bind_desk(&mut self, desk: DeskId) -> Result<(), CustomerError> {
        if let Some(bound) = self.desk {
            return Err(CustomerError::AlreadyBound {
                customer: self.id,
                desk: bound,
            });
        }
        self.desk = Some(desk);
        Ok(())
    }
}
