//! Logical time for the simulation
//!
//! Simulation time is an integer count of milliseconds since the start of the
//! run. Configuration speaks in seconds (`f64`) and is converted exactly once,
//! during validation. Integer time keeps event ordering exact and replays
//! byte-identical.

use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Milliseconds per simulated second
pub const MILLIS_PER_SECOND: u64 = 1_000;

/// Longest single delay the scheduler accepts, in milliseconds
pub const MAX_DELAY_MILLIS: u64 = i64::MAX as u64;

/// A point on the simulation timeline, in milliseconds since start
///
/// # Example
/// ```
/// use ticket_desk_simulator_core_rs::SimTime;
///
/// let t = SimTime::from_millis(1_234);
/// assert_eq!(t.as_millis(), 1_234);
/// assert_eq!(t.as_rounded_seconds(), 1.23);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTime(u64);

impl SimTime {
    /// Simulation start
    pub const ZERO: SimTime = SimTime(0);

    pub fn from_millis(millis: u64) -> Self {
        SimTime(millis)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Time in seconds, rounded to two decimal places
    ///
    /// This is the precision used in the serialized trace.
    pub fn as_rounded_seconds(&self) -> f64 {
        (self.0 as f64 / 10.0).round() / 100.0
    }

    /// Add a non-negative offset; `None` past the end of the timeline
    pub fn offset(&self, millis: u64) -> Option<SimTime> {
        self.0.checked_add(millis).map(SimTime)
    }

    /// Milliseconds elapsed since `earlier` (zero if `earlier` is later)
    pub fn since(&self, earlier: SimTime) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.0 as f64 / MILLIS_PER_SECOND as f64)
    }
}

/// Convert a configured duration in seconds to whole milliseconds
///
/// Returns `None` for negative, NaN or infinite input and for durations
/// longer than `MAX_DELAY_MILLIS`. Values are rounded to the nearest
/// millisecond.
///
/// # Example
/// ```
/// use ticket_desk_simulator_core_rs::core::time::seconds_to_millis;
///
/// assert_eq!(seconds_to_millis(0.5), Some(500));
/// assert_eq!(seconds_to_millis(-1.0), None);
/// assert_eq!(seconds_to_millis(1e16), None);
/// ```
pub fn seconds_to_millis(seconds: f64) -> Option<u64> {
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    let millis = (seconds * MILLIS_PER_SECOND as f64).round();
    // i64::MAX is not representable; as f64 it rounds up to 2^63
    if millis >= MAX_DELAY_MILLIS as f64 {
        return None;
    }
    Some(millis as u64)
}

/// A configured interval of seconds for uniformly random durations
///
/// # Example
/// ```
/// use ticket_desk_simulator_core_rs::core::time::DelayRange;
///
/// let walk = DelayRange::new(0.5, 2.0);
/// let millis = walk.to_millis().unwrap();
/// assert_eq!((millis.min, millis.max), (500, 2_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min: f64,
    pub max: f64,
}

impl DelayRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Same duration every time
    pub fn fixed(seconds: f64) -> Self {
        Self::new(seconds, seconds)
    }

    /// Convert to milliseconds; `None` if either bound is invalid or min > max
    pub fn to_millis(&self) -> Option<MillisRange> {
        let min = seconds_to_millis(self.min)?;
        let max = seconds_to_millis(self.max)?;
        (min <= max).then_some(MillisRange { min, max })
    }
}

/// Validated random-duration interval in milliseconds (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MillisRange {
    pub min: u64,
    pub max: u64,
}

impl MillisRange {
    /// Draw one duration uniformly from the interval
    pub fn sample(&self, rng: &mut RngManager) -> u64 {
        rng.uniform_millis(self.min, self.max)
    }
}

/// Logical clock owned by the scheduler
///
/// The clock never moves backwards. It is advanced only when the scheduler
/// pops the next due wakeup.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    now: SimTime,
}

impl SimClock {
    pub fn new() -> Self {
        Self { now: SimTime::ZERO }
    }

    /// Current simulation time
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Move the clock forward to `target`
    ///
    /// Returns the rejected target if it lies in the past; the clock is left
    /// unchanged in that case.
    pub fn advance_to(&mut self, target: SimTime) -> Result<(), SimTime> {
        if target < self.now {
            return Err(target);
        }
        self.now = target;
        Ok(())
    }
}
