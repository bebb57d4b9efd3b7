//! Internal random number generator implementation based on PCG32.
//!
//! This module provides a minimal, high-quality PRNG so the crate does not
//! need to pull in the `rand` dependency tree for what amounts to three
//! operations: raw 32/64-bit output, index picks for shuffling, and uniform
//! inclusive draws over the roll range.
//!
//! # PCG32 Algorithm
//!
//! PCG (Permuted Congruential Generator) is a family of simple, fast,
//! space-efficient, statistically good algorithms for random number
//! generation. PCG32 specifically has 64 bits of state, produces 32-bit
//! output, has a period of 2^64 and passes TestU01.
//!
//! Reference: <https://www.pcg-random.org/>
//!
//! # Usage
//!
//! ```rust
//! use tumbler::rng::{Pcg32, Rng, SeedableRng};
//!
//! // Seeded RNG for deterministic behavior
//! let mut rng = Pcg32::seed_from_u64(12345);
//! let roll = rng.gen_range_i64_inclusive(1..=6);
//! assert!((1..=6).contains(&roll));
//! ```

use crate::{
    report_violation,
    telemetry::{ViolationKind, ViolationSeverity},
};

/// PCG32 random number generator.
///
/// A minimal implementation of the PCG-XSH-RR variant with 64-bit state.
/// Statistically solid and fast, but NOT cryptographically secure — exactly
/// what a roll animation needs and nothing more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pcg32 {
    state: u64,
    inc: u64,
}

/// Default increment for single-stream PCG32, from the PCG paper.
const PCG_DEFAULT_INCREMENT: u64 = 1442695040888963407;

/// Standard multiplier for the 64-bit-state LCG step.
const PCG_MULTIPLIER: u64 = 6364136223846793005;

impl Pcg32 {
    /// Creates a new PCG32 generator with the given state and stream.
    ///
    /// The stream (increment) selects between independent sequences. The
    /// increment must be odd; it is made odd by OR-ing with 1.
    #[must_use]
    pub const fn new(state: u64, stream: u64) -> Self {
        let inc = (stream << 1) | 1;
        // Standard PCG seeding: start from 0, advance once, add the seed,
        // advance again. The step is inlined because const fns cannot call
        // the non-const next_u32.
        let mut pcg = Self { state: 0, inc };
        pcg.state = pcg.state.wrapping_mul(PCG_MULTIPLIER).wrapping_add(pcg.inc);
        pcg.state = pcg.state.wrapping_add(state);
        pcg.state = pcg.state.wrapping_mul(PCG_MULTIPLIER).wrapping_add(pcg.inc);
        pcg
    }

    /// Generates the next 32-bit random value.
    #[inline]
    #[must_use]
    pub fn next_u32(&mut self) -> u32 {
        let old_state = self.state;
        self.state = old_state
            .wrapping_mul(PCG_MULTIPLIER)
            .wrapping_add(self.inc);
        // XSH-RR output permutation: xor-shift high bits, then random rotate
        let xorshifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rot = (old_state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Generates the next 64-bit random value by combining two 32-bit values.
    #[inline]
    #[must_use]
    pub fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.next_u32());
        let low = u64::from(self.next_u32());
        (high << 32) | low
    }
}

/// Trait for seeding random number generators.
pub trait SeedableRng: Sized {
    /// Creates a new RNG seeded from a 64-bit value.
    ///
    /// Different seeds produce different (statistically independent)
    /// sequences. Use a fixed seed whenever reproducible rolls are needed.
    #[must_use]
    fn seed_from_u64(seed: u64) -> Self;

    /// Creates a new RNG with a seed derived from system timing.
    ///
    /// Sufficient entropy for roll unpredictability, NOT cryptographically
    /// secure.
    #[must_use]
    fn from_entropy() -> Self;
}

impl SeedableRng for Pcg32 {
    fn seed_from_u64(seed: u64) -> Self {
        Self::new(seed, PCG_DEFAULT_INCREMENT)
    }

    fn from_entropy() -> Self {
        Self::seed_from_u64(timing_entropy_seed())
    }
}

/// Trait for random number generation.
///
/// Provides the draws the roll engine needs on top of raw 32/64-bit output.
pub trait Rng {
    /// Returns the next 32-bit random value.
    fn next_u32(&mut self) -> u32;

    /// Returns the next 64-bit random value.
    fn next_u64(&mut self) -> u64;

    /// Generates a random `usize` value in the given range `[low, high)`.
    ///
    /// Used for index picks: shuffle swaps and duplicate injection.
    ///
    /// # Empty Range Behavior
    /// If `range.is_empty()`, reports a violation via telemetry and returns
    /// `range.start`.
    fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        let span = range.end.wrapping_sub(range.start);
        if span == 0 {
            report_violation!(
                ViolationSeverity::Error,
                ViolationKind::Configuration,
                "gen_range_usize called with empty range [{}..{})",
                range.start,
                range.end
            );
            return range.start;
        }

        if span <= u32::MAX as usize {
            // 32-bit rejection sampling; covers every cycle this crate can
            // materialize
            let threshold = (span as u32).wrapping_neg() % (span as u32);
            loop {
                let random_value = self.next_u32();
                if random_value >= threshold {
                    return range
                        .start
                        .wrapping_add((random_value % span as u32) as usize);
                }
            }
        } else {
            let span64 = span as u64;
            let threshold = span64.wrapping_neg() % span64;
            loop {
                let random_value = self.next_u64();
                if random_value >= threshold {
                    return range.start.wrapping_add((random_value % span64) as usize);
                }
            }
        }
    }

    /// Generates a random `i64` value in the given inclusive range
    /// `[low, high]`.
    ///
    /// This is the authoritative roll draw: uniform and unbiased via
    /// rejection sampling.
    ///
    /// # Empty Range Behavior
    /// If `start > end`, reports a violation via telemetry and returns
    /// `start`.
    fn gen_range_i64_inclusive(&mut self, range: std::ops::RangeInclusive<i64>) -> i64 {
        let start = *range.start();
        let end = *range.end();
        if start > end {
            report_violation!(
                ViolationSeverity::Error,
                ViolationKind::Configuration,
                "gen_range_i64_inclusive called with invalid range [{}..={}]",
                start,
                end
            );
            return start;
        }

        // Span as u64, computed in i128 so extreme bounds cannot overflow
        let span = (end as i128 - start as i128 + 1) as u64;

        // span == 0 means the range covers all 2^64 representable offsets
        if span == 0 {
            return self.next_u64() as i64;
        }

        let threshold = span.wrapping_neg() % span;
        loop {
            let random_value = self.next_u64();
            if random_value >= threshold {
                return start.wrapping_add((random_value % span) as i64);
            }
        }
    }
}

impl Rng for Pcg32 {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        Self::next_u32(self)
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        Self::next_u64(self)
    }
}

/// Gets a timing-based seed for RNG initialization.
///
/// Combines high-precision timing (via `web_time::Instant`, so wasm hosts
/// work too) with thread identity. Intentionally non-deterministic; for
/// reproducible rolls use [`Pcg32::seed_from_u64`] with a fixed seed.
fn timing_entropy_seed() -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    use web_time::Instant;

    let now = Instant::now();

    let thread_hash = {
        let mut hasher = DefaultHasher::new();
        std::thread::current().id().hash(&mut hasher);
        hasher.finish()
    };

    let timing_hash = {
        let mut hasher = DefaultHasher::new();
        now.elapsed().as_nanos().hash(&mut hasher);
        hasher.finish()
    };

    thread_hash
        .wrapping_mul(timing_hash)
        .wrapping_add(0x9e3779b97f4a7c15)
}
