// Event ID generation
//
// IDs are random 63-bit positive integers. They are not checked against
// storage; a collision surfaces as a persistence error on insert.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

/// Identifier of a recorded event, always in `1..=i64::MAX`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(i64);

impl EventId {
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of fresh event IDs
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> EventId;
}

/// Random ID generator backed by a seedable RNG
pub struct RandomIdGenerator {
    rng: Mutex<StdRng>,
}

impl RandomIdGenerator {
    /// Seed from OS entropy
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Seed explicitly (deterministic sequence, for tests)
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> EventId {
        // A poisoned lock still holds a usable RNG
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        EventId(rng.gen_range(1..=i64::MAX))
    }
}

impl fmt::Debug for RandomIdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomIdGenerator").finish_non_exhaustive()
    }
}

/// Hands out 1, 2, 3, ... (or from a chosen start)
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicI64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Start the sequence at `first` (clamped to 1)
    pub fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first.max(1)),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> EventId {
        let value = self.next.fetch_add(1, Ordering::Relaxed);
        EventId(value.max(1))
    }
}
