//! xorshift64* random number generator
//!
//! Every random duration in a run (walking time, post-service delay, arrival
//! gaps) is drawn from one seeded generator owned by the orchestrator. Same
//! seed and same configuration give the same trace.

use serde::{Deserialize, Serialize};

/// Seed used when the configuration does not name one
pub const DEFAULT_SEED: u64 = 42;

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use ticket_desk_simulator_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let walk_ms = rng.uniform_millis(500, 2_000);
/// assert!((500..=2_000).contains(&walk_ms));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// A zero seed is mapped to 1 (xorshift has no zero state).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Create an RNG from an optional configured seed
    pub fn from_seed(seed: Option<u64>) -> Self {
        Self::new(seed.unwrap_or(DEFAULT_SEED))
    }

    /// Generate next random u64 value
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate random value in range [min, max)
    ///
    /// # Panics
    /// Panics if min >= max
    pub fn range(&mut self, min: u64, max: u64) -> u64 {
        assert!(min < max, "min must be less than max");
        min + self.next() % (max - min)
    }

    /// Draw a duration uniformly from the closed interval [min_ms, max_ms]
    ///
    /// A degenerate interval returns `min_ms` without consuming a draw.
    ///
    /// # Panics
    /// Panics if min_ms > max_ms; configuration validation rules this out.
    pub fn uniform_millis(&mut self, min_ms: u64, max_ms: u64) -> u64 {
        assert!(min_ms <= max_ms, "min_ms must not exceed max_ms");
        if min_ms == max_ms {
            return min_ms;
        }
        self.range(min_ms, max_ms.saturating_add(1))
    }

    /// Current internal state
    pub fn get_state(&self) -> u64 {
        self.state
    }
}
