//! The host-facing roll session.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cycle::RollCycleGenerator;
use crate::error::{TumblerError, TumblerResult};
use crate::history::RollHistory;
use crate::range::RollRange;
use crate::report_violation_to;
use crate::spin::{SpinConfig, SpinTimer};
use crate::telemetry::{ViolationKind, ViolationObserver, ViolationSeverity};

/// Behavior switches for a session, the engine-side subset of a picker app's
/// settings screen.
///
/// UI-only settings (theme, haptics) stay in the host; these are the ones
/// that change what the engine produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RollSettings {
    /// Best-effort avoid repeating a value until the rest of the range has
    /// been rolled (see [`RollCycleGenerator`]).
    pub no_duplicate: bool,
    /// Keep history sorted ascending instead of in roll order.
    pub sort_history: bool,
    /// Timing of the spin animation.
    #[serde(default)]
    pub spin: SpinConfig,
}

/// What a [`tick`](RollSession::tick) produced.
///
/// The host renders `Spinning` previews as they come and treats the single
/// `Settled` value as the authoritative result of the roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollEvent {
    /// A non-authoritative preview drawn while the spin is running.
    Spinning {
        /// The preview value to display.
        value: i64,
    },
    /// The spin finished; exactly one of these ends every uncancelled spin.
    Settled {
        /// The authoritative roll, already recorded in history.
        value: i64,
    },
}

/// A running roll session: range, cycle generator, history, settings,
/// current value and the active spin, owned in one place and driven
/// synchronously by the host.
///
/// Construct one through [`SessionBuilder`](crate::SessionBuilder). The
/// session is single-threaded by design; every mutation happens inside a
/// host call, so there is nothing to lock.
///
/// # Example
///
/// ```
/// use tumbler::SessionBuilder;
///
/// let mut session = SessionBuilder::new().with_seed(1).start_session();
///
/// // No range yet: rolling is an error, not a panic
/// assert!(session.roll().is_err());
///
/// session.set_range(1, 10).unwrap();
/// let value = session.roll().unwrap();
/// assert!((1..=10).contains(&value));
/// assert_eq!(session.history().values(), &[value]);
/// ```
pub struct RollSession {
    generator: Option<RollCycleGenerator>,
    history: RollHistory,
    settings: RollSettings,
    spin: Option<SpinTimer>,
    current: Option<i64>,
    seed: Option<u64>,
    violation_observer: Option<Arc<dyn ViolationObserver>>,
}

impl std::fmt::Debug for RollSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Destructure so the compiler flags this impl when fields change
        let Self {
            generator,
            history,
            settings,
            spin,
            current,
            seed,
            violation_observer,
        } = self;

        f.debug_struct("RollSession")
            .field("generator", generator)
            .field("history", history)
            .field("settings", settings)
            .field("spin", spin)
            .field("current", current)
            .field("seed", seed)
            .field("has_violation_observer", &violation_observer.is_some())
            .finish()
    }
}

impl RollSession {
    pub(crate) fn new(
        range: Option<RollRange>,
        settings: RollSettings,
        seed: Option<u64>,
        violation_observer: Option<Arc<dyn ViolationObserver>>,
    ) -> Self {
        let generator = range.map(|r| Self::make_generator(r, seed));
        let mut history = RollHistory::new();
        history.set_sort_enabled(settings.sort_history);
        Self {
            generator,
            history,
            settings,
            spin: None,
            current: None,
            seed,
            violation_observer,
        }
    }

    fn make_generator(range: RollRange, seed: Option<u64>) -> RollCycleGenerator {
        match seed {
            Some(seed) => RollCycleGenerator::with_seed(range, seed),
            None => RollCycleGenerator::new(range),
        }
    }

    /// Sets or replaces the roll range.
    ///
    /// Cancels any active spin, eagerly resets the cycle generator for the
    /// new range, and clears both history and the current value — a range
    /// change starts the session over.
    ///
    /// # Errors
    /// - [`InvalidRange`] if `min >= max`
    /// - [`RangeTooLarge`] if the range spans more values than cycles support
    ///
    /// [`InvalidRange`]: TumblerError::InvalidRange
    /// [`RangeTooLarge`]: TumblerError::RangeTooLarge
    pub fn set_range(&mut self, min: i64, max: i64) -> TumblerResult<()> {
        let range = RollRange::new(min, max)?;
        debug!(%range, "session range set");

        self.cancel_spin();
        match &mut self.generator {
            Some(generator) => generator.reset(range),
            None => self.generator = Some(Self::make_generator(range, self.seed)),
        }
        self.history.clear();
        self.current = None;
        Ok(())
    }

    /// Rolls immediately, without animation: one authoritative draw,
    /// recorded in history and stored as the current value.
    ///
    /// # Errors
    /// - [`RangeNotSet`](TumblerError::RangeNotSet) before a valid
    ///   [`set_range`](Self::set_range)
    pub fn roll(&mut self) -> TumblerResult<i64> {
        let no_duplicate = self.settings.no_duplicate;
        let generator = self.generator.as_mut().ok_or(TumblerError::RangeNotSet)?;

        let value = generator.next_value(no_duplicate);
        self.history.record(value);
        self.current = Some(value);
        trace!(value, no_duplicate, "roll settled");
        Ok(value)
    }

    /// Arms a spin using the configured [`SpinConfig`].
    ///
    /// The host then calls [`tick`](Self::tick) once per tick interval until
    /// the roll settles, or [`cancel_spin`](Self::cancel_spin) to abandon it.
    ///
    /// # Errors
    /// - [`RangeNotSet`](TumblerError::RangeNotSet) before a valid range
    /// - [`SpinInProgress`](TumblerError::SpinInProgress) while another spin
    ///   is active
    pub fn begin_spin(&mut self) -> TumblerResult<()> {
        if self.generator.is_none() {
            return Err(TumblerError::RangeNotSet);
        }
        if self.spin.is_some() {
            return Err(TumblerError::SpinInProgress);
        }
        self.spin = Some(SpinTimer::new(&self.settings.spin));
        debug!(config = ?self.settings.spin, "spin armed");
        Ok(())
    }

    /// Advances an active spin by one tick.
    ///
    /// Returns a [`RollEvent::Spinning`] preview while the spin runs, then a
    /// single [`RollEvent::Settled`] carrying the authoritative value (drawn
    /// exactly once, at settle time). Returns `None` when no spin is active.
    #[must_use = "the returned event carries the value to display"]
    pub fn tick(&mut self) -> Option<RollEvent> {
        let timer = self.spin.as_mut()?;
        let finished = timer.advance();
        let elapsed = timer.elapsed();

        let Some(generator) = self.generator.as_mut() else {
            // Unreachable: begin_spin refuses to arm without a generator,
            // and set_range cancels the spin before touching it
            report_violation_to!(
                self.violation_observer.as_ref(),
                ViolationSeverity::Critical,
                ViolationKind::Scheduling,
                "spin active without a generator; dropping the spin"
            );
            self.spin = None;
            return None;
        };

        if finished {
            self.spin = None;
            let value = generator.next_value(self.settings.no_duplicate);
            self.history.record(value);
            self.current = Some(value);
            debug!(value, ?elapsed, "spin settled");
            Some(RollEvent::Settled { value })
        } else {
            // Previews are independent uniform draws; cycle state is only
            // touched by the settling draw
            let value = generator.next_value(false);
            self.current = Some(value);
            trace!(value, ?elapsed, "spin preview");
            Some(RollEvent::Spinning { value })
        }
    }

    /// Abandons the active spin, if any, without drawing a final value or
    /// touching cycle state or history. Returns whether a spin was active.
    pub fn cancel_spin(&mut self) -> bool {
        let was_active = self.spin.take().is_some();
        if was_active {
            debug!("spin cancelled");
        }
        was_active
    }

    /// Clears the history and starts a fresh cycle pass, keeping the range.
    pub fn reset_history(&mut self) {
        debug!("history reset");
        self.history.clear();
        if let Some(generator) = self.generator.as_mut() {
            generator.restart_cycle();
        }
    }

    /// Clears the displayed value only (the "refresh" button).
    pub fn clear_value(&mut self) {
        self.current = None;
    }

    /// Toggles best-effort no-duplicate rolling.
    pub fn set_no_duplicate(&mut self, enabled: bool) {
        self.settings.no_duplicate = enabled;
    }

    /// Toggles ascending history sort (affects subsequent appends).
    pub fn set_sort_history(&mut self, enabled: bool) {
        self.settings.sort_history = enabled;
        self.history.set_sort_enabled(enabled);
    }

    /// Replaces the spin timing configuration. Takes effect on the next
    /// [`begin_spin`](Self::begin_spin); an active spin keeps its schedule.
    pub fn set_spin_config(&mut self, config: SpinConfig) {
        self.settings.spin = config;
    }

    /// The active range, if one has been set.
    #[must_use]
    pub fn range(&self) -> Option<RollRange> {
        self.generator.as_ref().map(RollCycleGenerator::range)
    }

    /// The currently displayed value, if any.
    #[must_use]
    pub const fn current_value(&self) -> Option<i64> {
        self.current
    }

    /// The session's roll history.
    #[must_use]
    pub const fn history(&self) -> &RollHistory {
        &self.history
    }

    /// Whether a spin is currently running.
    #[must_use]
    pub const fn is_spinning(&self) -> bool {
        self.spin.is_some()
    }

    /// The current behavior switches.
    #[must_use]
    pub const fn settings(&self) -> RollSettings {
        self.settings
    }
}
