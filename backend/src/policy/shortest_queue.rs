//! Shortest-queue policy
//!
//! Picks the desk with the fewest customers in line. Ties go to the lowest
//! index, so with all desks idle the first desk wins.

use super::{QueueMetric, SelectionPolicy};
use crate::models::desk::ServiceDesk;

/// Shortest-queue-with-lowest-index heuristic
///
/// # Example
///
/// ```
/// use ticket_desk_simulator_core_rs::policy::{QueueMetric, SelectionPolicy, ShortestQueuePolicy};
/// use ticket_desk_simulator_core_rs::models::desk::ServiceDesk;
///
/// let mut desks = vec![ServiceDesk::new(1), ServiceDesk::new(2)];
/// desks[0].request_access(1);
///
/// let policy = ShortestQueuePolicy::new(QueueMetric::InLine);
/// assert_eq!(policy.pick(&desks), Some(1));
///
/// // Counting only waiters, the busy first desk still looks empty
/// let literal = ShortestQueuePolicy::new(QueueMetric::Waiting);
/// assert_eq!(literal.pick(&desks), Some(0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestQueuePolicy {
    metric: QueueMetric,
}

impl ShortestQueuePolicy {
    pub fn new(metric: QueueMetric) -> Self {
        Self { metric }
    }

    pub fn metric(&self) -> QueueMetric {
        self.metric
    }
}

impl SelectionPolicy for ShortestQueuePolicy {
    fn pick(&self, desks: &[ServiceDesk]) -> Option<usize> {
        // min_by_key returns the first minimum, which gives the index tie-break
        desks
            .iter()
            .enumerate()
            .min_by_key(|(_, desk)| self.metric.measure(desk))
            .map(|(index, _)| index)
    }
}
