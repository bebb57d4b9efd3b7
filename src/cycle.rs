//! The best-effort no-duplicate roll cycle generator.
//!
//! A **cycle** is one full shuffled pass over the roll range: every value of
//! `[min, max]` appears at least once, and two to three extra duplicate
//! entries are injected so consecutive cycles don't feel like a fixed
//! permutation. Popping from the cycle, with an emitted-set check to skip
//! values already produced this pass, yields rolls that cover the whole
//! range before repeats set in — *best effort*, not a strict guarantee: once
//! only injected repeats remain, a value can legitimately show up twice
//! within one cycle. That leak is intentional and preserved.

use std::collections::HashSet;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::range::RollRange;
use crate::report_violation;
use crate::rng::{Pcg32, Rng, SeedableRng};
use crate::telemetry::{ViolationKind, ViolationSeverity};

/// Backing buffer for a cycle.
///
/// Picker ranges are typically dice-sized, so the buffer lives on the stack
/// until a range actually needs more room.
pub type CycleBuf = SmallVec<[i64; 16]>;

/// Fewest duplicate entries injected into a cycle.
const REPEAT_COUNT_MIN: usize = 2;
/// Most duplicate entries injected into a cycle.
const REPEAT_COUNT_MAX: usize = 3;

/// Builds one shuffled cycle for `range`.
///
/// The cycle starts as the base sequence `[min, min+1, ..., max]` (size `N`),
/// gets `clamp(N / 3, 2, 3)` uniformly picked duplicate entries appended
/// (picks are drawn from the growing sequence, so a later pick can duplicate
/// an earlier injection), and is then Fisher–Yates shuffled.
///
/// Guarantees: every value of the range appears at least once; the length is
/// exactly `N + clamp(N / 3, 2, 3)`; the order is uniformly random.
#[must_use]
pub fn build_cycle(rng: &mut Pcg32, range: RollRange) -> CycleBuf {
    let mut cycle: CycleBuf = range.as_inclusive().collect();

    let repeat_count = (range.span() as usize / 3).clamp(REPEAT_COUNT_MIN, REPEAT_COUNT_MAX);
    for _ in 0..repeat_count {
        let pick = cycle[rng.gen_range_usize(0..cycle.len())];
        cycle.push(pick);
    }

    // Fisher-Yates: swap index i with a uniform j in [0, i]
    for i in (1..cycle.len()).rev() {
        let j = rng.gen_range_usize(0..i + 1);
        cycle.swap(i, j);
    }

    cycle
}

/// Produces roll values over a bounded range, cycling so that every value is
/// seen before repeats set in (best effort, see the module docs).
///
/// The generator owns its range, the pending cycle, the set of values
/// already emitted this pass, and its PRNG. It is a plain synchronous state
/// machine: no I/O, no blocking, no locking — mutate it from whichever
/// single place drives your rolls.
///
/// # Example
///
/// ```
/// use tumbler::{RollCycleGenerator, RollRange};
///
/// let range = RollRange::new(1, 5).unwrap();
/// let mut generator = RollCycleGenerator::with_seed(range, 42);
///
/// // Drain one full cycle: every value of 1..=5 appears
/// let mut seen = std::collections::HashSet::new();
/// while generator.remaining_in_cycle() > 0 {
///     seen.insert(generator.next_value(true));
/// }
/// assert_eq!(seen.len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct RollCycleGenerator {
    range: RollRange,
    cycle: CycleBuf,
    emitted: HashSet<i64>,
    rng: Pcg32,
}

impl RollCycleGenerator {
    /// Creates a generator for `range` with an entropy-seeded PRNG and an
    /// eagerly built first cycle.
    #[must_use]
    pub fn new(range: RollRange) -> Self {
        Self::from_rng(range, Pcg32::from_entropy())
    }

    /// Creates a generator with a fixed seed, for reproducible rolls.
    #[must_use]
    pub fn with_seed(range: RollRange, seed: u64) -> Self {
        Self::from_rng(range, Pcg32::seed_from_u64(seed))
    }

    fn from_rng(range: RollRange, rng: Pcg32) -> Self {
        let mut generator = Self {
            range,
            cycle: CycleBuf::new(),
            emitted: HashSet::new(),
            rng,
        };
        generator.rebuild();
        generator
    }

    /// Replaces the range and eagerly rebuilds the cycle for it, discarding
    /// the pending cycle and the emitted set.
    pub fn reset(&mut self, range: RollRange) {
        debug!(%range, "generator reset");
        self.range = range;
        self.rebuild();
    }

    /// Rebuilds the cycle from scratch for the current range. Also the
    /// history-reset hook: a cleared history starts a fresh pass.
    pub fn restart_cycle(&mut self) {
        self.rebuild();
    }

    /// Produces the next roll.
    ///
    /// With `no_duplicate` set, pops from the current cycle, skipping values
    /// already emitted this pass while the cycle still has entries; rebuilds
    /// the cycle (and forgets emitted values) once it has drained. Without
    /// it, returns an independent uniform draw over the range and leaves the
    /// cycle untouched.
    ///
    /// Total over every valid generator state: always returns a value within
    /// the range.
    pub fn next_value(&mut self, no_duplicate: bool) -> i64 {
        if !no_duplicate {
            return self.rng.gen_range_i64_inclusive(self.range.as_inclusive());
        }

        if self.cycle.is_empty() {
            debug!(range = %self.range, "cycle exhausted, rebuilding");
            self.rebuild();
        }

        let Some(mut candidate) = self.cycle.pop() else {
            // rebuild() always yields at least span + 2 entries
            report_violation!(
                ViolationSeverity::Critical,
                ViolationKind::CycleState,
                "freshly rebuilt cycle is empty for range {}",
                self.range
            );
            return self.rng.gen_range_i64_inclusive(self.range.as_inclusive());
        };

        // Skip candidates already emitted this pass; whatever is left when
        // the cycle runs dry is accepted, repeat or not.
        while self.emitted.contains(&candidate) {
            match self.cycle.pop() {
                Some(next) => candidate = next,
                None => break,
            }
        }

        self.emitted.insert(candidate);
        trace!(
            value = candidate,
            remaining = self.cycle.len(),
            "no-duplicate roll"
        );
        candidate
    }

    /// The range this generator rolls over.
    #[must_use]
    pub const fn range(&self) -> RollRange {
        self.range
    }

    /// Entries left in the current cycle before the next rebuild.
    #[must_use]
    pub fn remaining_in_cycle(&self) -> usize {
        self.cycle.len()
    }

    /// How many distinct values have been emitted in the current pass.
    #[must_use]
    pub fn emitted_this_cycle(&self) -> usize {
        self.emitted.len()
    }

    fn rebuild(&mut self) {
        self.cycle = build_cycle(&mut self.rng, self.range);
        self.emitted.clear();
        trace!(
            range = %self.range,
            cycle_len = self.cycle.len(),
            "cycle rebuilt"
        );
    }
}

// #########
// # TESTS #
// #########

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn range(min: i64, max: i64) -> RollRange {
        RollRange::new(min, max).unwrap()
    }

    #[test]
    fn test_build_cycle_covers_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        for (min, max) in [(1, 5), (0, 1), (-3, 3), (10, 100)] {
            let cycle = build_cycle(&mut rng, range(min, max));
            for value in min..=max {
                assert!(
                    cycle.contains(&value),
                    "cycle for [{min}, {max}] is missing {value}"
                );
            }
        }
    }

    #[test]
    fn test_build_cycle_length() {
        let mut rng = Pcg32::seed_from_u64(2);

        // N = 5 -> floor(5/3) = 1 -> clamped up to 2 extras
        assert_eq!(build_cycle(&mut rng, range(1, 5)).len(), 7);
        // N = 2 -> floor(2/3) = 0 -> clamped up to 2 extras
        assert_eq!(build_cycle(&mut rng, range(1, 2)).len(), 4);
        // N = 9 -> floor(9/3) = 3 -> exactly 3 extras
        assert_eq!(build_cycle(&mut rng, range(1, 9)).len(), 12);
        // N = 100 -> floor(100/3) = 33 -> clamped down to 3 extras
        assert_eq!(build_cycle(&mut rng, range(1, 100)).len(), 103);
    }

    #[test]
    fn test_build_cycle_scenario_one_to_five() {
        // reset(1, 5): cycle of length 7, {1..5} each at least once,
        // exactly 2 extra duplicate entries
        let mut rng = Pcg32::seed_from_u64(3);
        let cycle = build_cycle(&mut rng, range(1, 5));
        assert_eq!(cycle.len(), 7);

        let mut counts = std::collections::HashMap::new();
        for value in &cycle {
            assert!((1..=5).contains(value));
            *counts.entry(*value).or_insert(0usize) += 1;
        }
        assert_eq!(counts.len(), 5);
        let extras: usize = counts.values().map(|c| c - 1).sum();
        assert_eq!(extras, 2);
    }

    #[test]
    fn test_build_cycle_values_stay_in_range() {
        for seed in 0..50u64 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let cycle = build_cycle(&mut rng, range(-7, 11));
            assert!(cycle.iter().all(|v| (-7..=11).contains(v)));
        }
    }

    #[test]
    fn test_full_cycle_emits_every_value_before_rebuild() {
        let r = range(1, 20);
        let mut generator = RollCycleGenerator::with_seed(r, 77);

        let mut seen = HashSet::new();
        while generator.remaining_in_cycle() > 0 {
            seen.insert(generator.next_value(true));
        }
        for value in 1..=20 {
            assert!(seen.contains(&value), "value {value} never emitted");
        }
    }

    #[test]
    fn test_generator_cycles_indefinitely() {
        let mut generator = RollCycleGenerator::with_seed(range(1, 3), 5);

        // Far more rolls than one cycle holds; every roll stays in range
        for _ in 0..100 {
            let value = generator.next_value(true);
            assert!((1..=3).contains(&value));
        }
    }

    #[test]
    fn test_free_mode_bounds() {
        let mut generator = RollCycleGenerator::with_seed(range(-5, 5), 6);

        for _ in 0..1000 {
            let value = generator.next_value(false);
            assert!((-5..=5).contains(&value));
        }
    }

    #[test]
    fn test_free_mode_leaves_cycle_untouched() {
        let mut generator = RollCycleGenerator::with_seed(range(1, 5), 7);
        let before = generator.remaining_in_cycle();

        for _ in 0..25 {
            let _ = generator.next_value(false);
        }
        assert_eq!(generator.remaining_in_cycle(), before);
        assert_eq!(generator.emitted_this_cycle(), 0);
    }

    #[test]
    fn test_reset_is_eager_and_clears_state() {
        let mut generator = RollCycleGenerator::with_seed(range(1, 5), 8);
        let _ = generator.next_value(true);
        let _ = generator.next_value(true);
        assert!(generator.emitted_this_cycle() > 0);

        generator.reset(range(1, 9));
        assert_eq!(generator.range(), range(1, 9));
        // Eager rebuild: full cycle for the new range is already there
        assert_eq!(generator.remaining_in_cycle(), 12);
        assert_eq!(generator.emitted_this_cycle(), 0);

        // reset followed immediately by a roll returns an in-range value
        let value = generator.next_value(true);
        assert!((1..=9).contains(&value));
    }

    #[test]
    fn test_restart_cycle_forgets_emitted() {
        let mut generator = RollCycleGenerator::with_seed(range(1, 5), 9);
        let first = generator.next_value(true);
        generator.restart_cycle();
        assert_eq!(generator.emitted_this_cycle(), 0);
        assert_eq!(generator.remaining_in_cycle(), 7);
        let _ = first;
    }

    #[test]
    fn test_repeats_only_after_exhaustion_pressure() {
        // Within a single drained pass, a value appears at most twice: the
        // emitted-set skip only gives way once the cycle is down to
        // injected repeats.
        for seed in 0..20u64 {
            let mut generator = RollCycleGenerator::with_seed(range(1, 6), seed);
            let mut counts = std::collections::HashMap::new();
            while generator.remaining_in_cycle() > 0 {
                *counts.entry(generator.next_value(true)).or_insert(0usize) += 1;
            }
            assert!(counts.values().all(|&c| c <= 2), "seed {seed}: {counts:?}");
        }
    }

    #[test]
    fn test_deterministic_with_seed() {
        let mut a = RollCycleGenerator::with_seed(range(1, 100), 4242);
        let mut b = RollCycleGenerator::with_seed(range(1, 100), 4242);

        for _ in 0..300 {
            assert_eq!(a.next_value(true), b.next_value(true));
        }
    }
}
