//! Event scheduler
//!
//! A min-heap of pending customer wakeups keyed by `(due, seq)`. `seq` is a
//! monotonically increasing counter assigned at scheduling time, so two
//! wakeups due at the same instant are resumed in the order they were
//! scheduled. The scheduler is the only component that advances the clock.

use crate::core::time::{SimClock, SimTime};
use crate::models::customer::CustomerId;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use thiserror::Error;

/// Errors raised by the scheduler
///
/// All of these indicate a logic defect in the caller or a configuration
/// that slipped past validation; a correct run never sees them.
#[derive(Debug, Error, PartialEq)]
pub enum SchedulerError {
    #[error("Negative scheduling delay requested: {delay_ms}ms")]
    InvalidDelay { delay_ms: i64 },

    #[error("Scheduling delay of {delay_ms}ms exceeds i64::MAX milliseconds")]
    DelayOutOfRange { delay_ms: u64 },

    #[error("Wakeup {delay_ms}ms after {now} is past the end of the timeline")]
    TimeOverflow { now: SimTime, delay_ms: u64 },

    #[error("Cannot schedule in the past: requested {requested}, now {now}")]
    InPast { requested: SimTime, now: SimTime },

    #[error("Clock regression: now {now}, next due {due}")]
    ClockRegression { now: SimTime, due: SimTime },
}

/// A suspended customer waiting for its next stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledWakeup {
    pub due: SimTime,
    pub seq: u64,
    pub customer: CustomerId,
}

impl Ord for ScheduledWakeup {
    // Reversed so `BinaryHeap` pops the earliest (due, seq) first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for ScheduledWakeup {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Deterministic discrete-event scheduler
///
/// # Example
/// ```
/// use ticket_desk_simulator_core_rs::Scheduler;
///
/// let mut scheduler = Scheduler::new();
/// scheduler.schedule(1_500, 2).unwrap();
/// scheduler.schedule(500, 1).unwrap();
///
/// let first = scheduler.pop_next().unwrap().unwrap();
/// assert_eq!(first.customer, 1);
/// assert_eq!(scheduler.now().as_millis(), 500);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    clock: SimClock,
    queue: BinaryHeap<ScheduledWakeup>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            clock: SimClock::new(),
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Current simulation time
    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    /// Resume `customer` after `delay_ms` milliseconds
    ///
    /// Returns the sequence id assigned to the wakeup.
    pub fn schedule(&mut self, delay_ms: i64, customer: CustomerId) -> Result<u64, SchedulerError> {
        if delay_ms < 0 {
            return Err(SchedulerError::InvalidDelay { delay_ms });
        }
        let now = self.now();
        let delay_ms = delay_ms as u64;
        let due = now
            .offset(delay_ms)
            .ok_or(SchedulerError::TimeOverflow { now, delay_ms })?;
        Ok(self.push(due, customer))
    }

    /// Resume `customer` at an absolute time no earlier than now
    pub fn schedule_at(
        &mut self,
        at: SimTime,
        customer: CustomerId,
    ) -> Result<u64, SchedulerError> {
        if at < self.now() {
            return Err(SchedulerError::InPast {
                requested: at,
                now: self.now(),
            });
        }
        Ok(self.push(at, customer))
    }

    fn push(&mut self, due: SimTime, customer: CustomerId) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(ScheduledWakeup { due, seq, customer });
        seq
    }

    /// Pop the earliest wakeup and advance the clock to its due time
    ///
    /// Returns `Ok(None)` once nothing is left to run.
    pub fn pop_next(&mut self) -> Result<Option<ScheduledWakeup>, SchedulerError> {
        let Some(wakeup) = self.queue.pop() else {
            return Ok(None);
        };
        let now = self.clock.now();
        self.clock
            .advance_to(wakeup.due)
            .map_err(|due| SchedulerError::ClockRegression { now, due })?;
        Ok(Some(wakeup))
    }

    /// Peek at the next wakeup without running it
    pub fn peek_next(&self) -> Option<&ScheduledWakeup> {
        self.queue.peek()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_delay_rejected() {
        let mut scheduler = Scheduler::new();
        assert_eq!(
            scheduler.schedule(-1, 1),
            Err(SchedulerError::InvalidDelay { delay_ms: -1 })
        );
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_equal_due_times_keep_scheduling_order() {
        let mut scheduler = Scheduler::new();
        for customer in [3, 1, 2] {
            scheduler.schedule(100, customer).unwrap();
        }

        let order: Vec<CustomerId> = std::iter::from_fn(|| scheduler.pop_next().unwrap())
            .map(|w| w.customer)
            .collect();
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[test]
    fn test_clock_follows_popped_wakeups() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(300, 1).unwrap();
        scheduler.schedule(100, 2).unwrap();

        scheduler.pop_next().unwrap();
        assert_eq!(scheduler.now(), SimTime::from_millis(100));

        // Scheduled relative to the advanced clock
        scheduler.schedule(50, 3).unwrap();
        let next = scheduler.pop_next().unwrap().unwrap();
        assert_eq!(next.customer, 3);
        assert_eq!(next.due, SimTime::from_millis(150));
    }

    #[test]
    fn test_schedule_at_rejects_past() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(200, 1).unwrap();
        scheduler.pop_next().unwrap();

        let err = scheduler.schedule_at(SimTime::from_millis(100), 2).unwrap_err();
        assert!(matches!(err, SchedulerError::InPast { .. }));
    }

    #[test]
    fn test_due_time_past_end_of_timeline_rejected() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_at(SimTime::from_millis(u64::MAX - 10), 1).unwrap();
        scheduler.pop_next().unwrap();

        assert_eq!(
            scheduler.schedule(11, 2),
            Err(SchedulerError::TimeOverflow {
                now: SimTime::from_millis(u64::MAX - 10),
                delay_ms: 11,
            })
        );
        assert!(scheduler.is_empty());
        assert!(scheduler.schedule(10, 2).is_ok());
    }

    #[test]
    fn test_empty_scheduler_pops_none() {
        let mut scheduler = Scheduler::new();
        assert_eq!(scheduler.pop_next(), Ok(None));
        assert_eq!(scheduler.now(), SimTime::ZERO);
    }
}
