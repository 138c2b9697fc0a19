//! Service desk (capacity-1 resource)
//!
//! Each desk serves one customer at a time and keeps an unbounded FIFO wait
//! list. Access is granted synchronously when the desk is idle and nobody is
//! waiting; otherwise the requester joins the back of the line. Releasing the
//! desk hands it to the head of the line at the same instant.
//!
//! # Critical Invariants
//!
//! 1. At most one occupant
//! 2. A waiter is granted only when the desk is free and it heads the line
//! 3. Only the occupant may release the desk

use crate::models::customer::CustomerId;
use std::collections::VecDeque;
use thiserror::Error;

/// Desk identifier, 1-based
pub type DeskId = u32;

/// Occupancy invariant violations
#[derive(Debug, Error, PartialEq)]
pub enum ResourceError {
    #[error("Desk {desk} already occupied by customer {occupant}, cannot grant customer {requester}")]
    AlreadyOccupied {
        desk: DeskId,
        occupant: CustomerId,
        requester: CustomerId,
    },

    #[error("Customer {customer} does not occupy desk {desk} (occupant: {occupant:?})")]
    NotOccupant {
        desk: DeskId,
        customer: CustomerId,
        occupant: Option<CustomerId>,
    },
}

/// Outcome of an access request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Desk was idle; the requester now occupies it
    Granted,
    /// Requester joined the wait list at this 0-based position
    Queued { position: usize },
}

/// A ticket desk
///
/// # Example
/// ```
/// use ticket_desk_simulator_core_rs::models::desk::{Access, ServiceDesk};
///
/// let mut desk = ServiceDesk::new(1);
/// assert_eq!(desk.request_access(10), Access::Granted);
/// assert_eq!(desk.request_access(11), Access::Queued { position: 0 });
///
/// // Releasing hands the desk straight to the next in line
/// assert_eq!(desk.release(10).unwrap(), Some(11));
/// assert_eq!(desk.occupant(), Some(11));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDesk {
    id: DeskId,
    occupant: Option<CustomerId>,
    wait_list: VecDeque<CustomerId>,
    served: usize,
}

impl ServiceDesk {
    pub fn new(id: DeskId) -> Self {
        Self {
            id,
            occupant: None,
            wait_list: VecDeque::new(),
            served: 0,
        }
    }

    pub fn id(&self) -> DeskId {
        self.id
    }

    pub fn occupant(&self) -> Option<CustomerId> {
        self.occupant
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Customers waiting for the desk (not counting the occupant)
    pub fn queue_len(&self) -> usize {
        self.wait_list.len()
    }

    /// Customers committed to the desk: waiting plus the occupant
    pub fn in_line(&self) -> usize {
        self.wait_list.len() + usize::from(self.is_occupied())
    }

    /// Waiting customers, head first
    pub fn wait_list(&self) -> impl Iterator<Item = CustomerId> + '_ {
        self.wait_list.iter().copied()
    }

    /// Number of customers that have released this desk
    pub fn served(&self) -> usize {
        self.served
    }

    /// Ask for the desk
    ///
    /// Grants immediately when the desk is idle and nobody is waiting;
    /// otherwise appends the customer to the wait list.
    pub fn request_access(&mut self, customer: CustomerId) -> Access {
        if self.occupant.is_none() && self.wait_list.is_empty() {
            self.occupant = Some(customer);
            return Access::Granted;
        }
        self.wait_list.push_back(customer);
        Access::Queued {
            position: self.wait_list.len() - 1,
        }
    }

    /// Confirm that `customer` holds the desk
    pub fn confirm_occupant(&self, customer: CustomerId) -> Result<(), ResourceError> {
        if self.occupant == Some(customer) {
            Ok(())
        } else {
            Err(ResourceError::NotOccupant {
                desk: self.id,
                customer,
                occupant: self.occupant,
            })
        }
    }

    /// Release the desk held by `customer`
    ///
    /// If anyone is waiting, the head of the line becomes the occupant before
    /// this returns, and its id is returned so the caller can resume it.
    pub fn release(&mut self, customer: CustomerId) -> Result<Option<CustomerId>, ResourceError> {
        self.confirm_occupant(customer)?;
        self.occupant = None;
        self.served += 1;

        match self.wait_list.pop_front() {
            Some(next) => {
                self.grant(next)?;
                Ok(Some(next))
            }
            None => Ok(None),
        }
    }

    fn grant(&mut self, customer: CustomerId) -> Result<(), ResourceError> {
        if let Some(occupant) = self.occupant {
            return Err(ResourceError::AlreadyOccupied {
                desk: self.id,
                occupant,
                requester: customer,
            });
        }
        self.occupant = Some(customer);
        Ok(())
    }
}
