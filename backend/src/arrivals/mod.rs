//! Customer arrival schedules.
//!
//! Decides when each customer enters the hall. By default everyone is present
//! at time zero; a random inter-arrival gap can be configured instead. All
//! draws go through the run's seeded RNG, so arrivals are deterministic.
//!
//! # Example
//!
//! ```
//! use ticket_desk_simulator_core_rs::arrivals::ArrivalPattern;
//! use ticket_desk_simulator_core_rs::core::time::DelayRange;
//! use ticket_desk_simulator_core_rs::RngManager;
//!
//! let pattern = ArrivalPattern::UniformGap { gap: DelayRange::new(1.0, 1.0) };
//! let schedule = pattern.to_schedule().unwrap();
//! let mut rng = RngManager::new(42);
//!
//! let times: Vec<u64> = schedule
//!     .arrival_times(3, &mut rng)
//!     .unwrap()
//!     .iter()
//!     .map(|t| t.as_millis())
//!     .collect();
//! assert_eq!(times, vec![0, 1_000, 2_000]);
//! ```

use crate::core::time::{DelayRange, MillisRange, SimTime};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};

/// Configured arrival pattern
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArrivalPattern {
    /// Every customer arrives at time zero, in id order
    #[default]
    Simultaneous,

    /// First customer at time zero, then one per uniformly random gap
    UniformGap { gap: DelayRange },
}

impl ArrivalPattern {
    /// Validate and convert to milliseconds
    ///
    /// Returns `None` if the gap interval is invalid.
    pub fn to_schedule(&self) -> Option<ArrivalSchedule> {
        match self {
            ArrivalPattern::Simultaneous => Some(ArrivalSchedule::Simultaneous),
            ArrivalPattern::UniformGap { gap } => gap.to_millis().map(ArrivalSchedule::UniformGap),
        }
    }
}

/// Validated arrival pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalSchedule {
    Simultaneous,
    UniformGap(MillisRange),
}

impl ArrivalSchedule {
    /// Arrival time of each of `count` customers, in customer id order
    ///
    /// Times are non-decreasing. Returns `None` if the accumulated gaps run
    /// past the end of the timeline.
    pub fn arrival_times(&self, count: usize, rng: &mut RngManager) -> Option<Vec<SimTime>> {
        match self {
            ArrivalSchedule::Simultaneous => Some(vec![SimTime::ZERO; count]),
            ArrivalSchedule::UniformGap(gap) => {
                let mut times = Vec::with_capacity(count);
                let mut next = SimTime::ZERO;
                for i in 0..count {
                    if i > 0 {
                        next = next.offset(gap.sample(rng))?;
                    }
                    times.push(next);
                }
                Some(times)
            }
        }
    }
}
