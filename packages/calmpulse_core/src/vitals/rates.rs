//! Heart-rate draw sources for the vitals simulator.
//!
//! The simulator never touches a RNG directly. Each tick pulls one draw
//! from a `HeartRateSource`, so tests can script exact sequences and
//! reproduce every alert scenario deterministically.

use std::collections::VecDeque;
use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One heart-rate draw per simulator tick, in BPM.
pub trait HeartRateSource: Send {
    fn next_bpm(&mut self) -> u16;
}

/// Uniform random draws over a closed BPM interval. The production source.
pub struct UniformHeartRate {
    range: RangeInclusive<u16>,
    rng: StdRng,
}

impl UniformHeartRate {
    pub fn new(range: RangeInclusive<u16>) -> Self {
        Self {
            range,
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded variant for reproducible runs.
    pub fn seeded(range: RangeInclusive<u16>, seed: u64) -> Self {
        Self {
            range,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for UniformHeartRate {
    fn default() -> Self {
        Self::new(70..=160)
    }
}

impl HeartRateSource for UniformHeartRate {
    fn next_bpm(&mut self) -> u16 {
        self.rng.gen_range(self.range.clone())
    }
}

/// Replays a fixed sequence, holding the last value once exhausted.
pub struct ScriptedHeartRate {
    remaining: VecDeque<u16>,
    last: u16,
}

impl ScriptedHeartRate {
    pub fn new(draws: impl IntoIterator<Item = u16>) -> Self {
        Self {
            remaining: draws.into_iter().collect(),
            // Resting fallback, only reachable when constructed empty.
            last: 80,
        }
    }
}

impl HeartRateSource for ScriptedHeartRate {
    fn next_bpm(&mut self) -> u16 {
        match self.remaining.pop_front() {
            Some(bpm) => {
                self.last = bpm;
                bpm
            }
            None => self.last,
        }
    }
}
