//! The spin schedule: fixed-tick animation timing for a roll.
//!
//! A spin is host-driven: the engine never sleeps or spawns timers. The host
//! runs its own periodic timer at [`SpinConfig::tick_interval`] and calls
//! [`RollSession::tick`](crate::RollSession::tick) once per firing; the
//! schedule decides when the configured duration has elapsed and the roll
//! settles. Cancelling simply drops the pending schedule — the final draw
//! never happens.

use serde::{Deserialize, Serialize};
use web_time::Duration;

/// Default tick interval for spin previews.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);
/// Default spin duration when no timed duration is configured.
pub const DEFAULT_SPIN_DURATION: Duration = Duration::from_millis(500);
/// Shortest configurable timed spin, in seconds.
pub const MIN_TIMED_SPIN_SECS: u64 = 1;
/// Longest configurable timed spin, in seconds.
pub const MAX_TIMED_SPIN_SECS: u64 = 10;

/// Configuration for the spin schedule.
///
/// # Example
///
/// ```
/// use tumbler::SpinConfig;
///
/// // The default quick roll: 100ms ticks for half a second
/// let quick = SpinConfig::default();
/// assert_eq!(quick, SpinConfig::quick());
///
/// // A timed three-second spin; out-of-range requests are clamped to the
/// // supported 1..=10 seconds
/// let timed = SpinConfig::timed(3);
/// let clamped = SpinConfig::timed(99);
/// assert_eq!(clamped, SpinConfig::timed(10));
/// # let _ = (timed, clamped);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinConfig {
    /// How often the host samples a preview value while spinning.
    ///
    /// Default: 100 ms.
    pub tick_interval: Duration,
    /// How long the spin runs before the authoritative roll settles.
    ///
    /// Default: 500 ms.
    pub duration: Duration,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            duration: DEFAULT_SPIN_DURATION,
        }
    }
}

impl SpinConfig {
    /// Creates a new `SpinConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The quick roll preset: half a second of spinning.
    #[must_use]
    pub fn quick() -> Self {
        Self::default()
    }

    /// A timed spin of `seconds`, clamped to
    /// [`MIN_TIMED_SPIN_SECS`]..=[`MAX_TIMED_SPIN_SECS`].
    #[must_use]
    pub fn timed(seconds: u64) -> Self {
        let seconds = seconds.clamp(MIN_TIMED_SPIN_SECS, MAX_TIMED_SPIN_SECS);
        Self {
            duration: Duration::from_secs(seconds),
            ..Self::default()
        }
    }
}

/// A running spin: elapsed tick time against a fixed duration.
#[derive(Debug, Clone)]
pub(crate) struct SpinTimer {
    tick_interval: Duration,
    duration: Duration,
    elapsed: Duration,
}

impl SpinTimer {
    /// Arms a timer from `config`. A zero tick interval would never
    /// terminate, so it is clamped to at least 1 ms.
    pub(crate) fn new(config: &SpinConfig) -> Self {
        Self {
            tick_interval: config.tick_interval.max(Duration::from_millis(1)),
            duration: config.duration,
            elapsed: Duration::ZERO,
        }
    }

    /// Advances by one tick interval. Returns `true` once the configured
    /// duration has been reached and the roll should settle.
    pub(crate) fn advance(&mut self) -> bool {
        self.elapsed = self.elapsed.saturating_add(self.tick_interval);
        self.elapsed >= self.duration
    }

    /// Tick time accumulated so far.
    pub(crate) fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
