//! Builder for [`RollSession`]s.

use std::sync::Arc;

use crate::error::TumblerResult;
use crate::range::RollRange;
use crate::session::{RollSession, RollSettings};
use crate::spin::SpinConfig;
use crate::telemetry::ViolationObserver;

/// The [`SessionBuilder`] builds [`RollSession`]s.
///
/// Set the values you care about, then call
/// [`start_session`](Self::start_session) to consume the builder. Every
/// setting has a sensible default; a session can even start without a range
/// and receive one later through [`RollSession::set_range`].
///
/// # Example
///
/// ```
/// use tumbler::{SessionBuilder, SpinConfig};
///
/// let session = SessionBuilder::new()
///     .with_range(1, 20)
///     .unwrap()
///     .with_no_duplicate(true)
///     .with_sort_history(true)
///     .with_spin_config(SpinConfig::timed(2))
///     .start_session();
/// assert!(session.range().is_some());
/// ```
#[derive(Default)]
#[must_use = "SessionBuilder must be consumed by calling start_session"]
pub struct SessionBuilder {
    range: Option<RollRange>,
    settings: RollSettings,
    seed: Option<u64>,
    violation_observer: Option<Arc<dyn ViolationObserver>>,
}

impl std::fmt::Debug for SessionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self {
            range,
            settings,
            seed,
            violation_observer,
        } = self;

        f.debug_struct("SessionBuilder")
            .field("range", range)
            .field("settings", settings)
            .field("seed", seed)
            .field("has_violation_observer", &violation_observer.is_some())
            .finish()
    }
}

impl SessionBuilder {
    /// Construct a new builder with all values set to their defaults.
    pub fn new() -> Self {
        Self {
            range: None,
            settings: RollSettings::default(),
            seed: None,
            violation_observer: None,
        }
    }

    /// Sets the initial roll range, validated eagerly.
    ///
    /// # Errors
    /// - [`InvalidRange`] if `min >= max`
    /// - [`RangeTooLarge`] if the range spans more values than cycles
    ///   support
    ///
    /// [`InvalidRange`]: crate::TumblerError::InvalidRange
    /// [`RangeTooLarge`]: crate::TumblerError::RangeTooLarge
    pub fn with_range(mut self, min: i64, max: i64) -> TumblerResult<Self> {
        self.range = Some(RollRange::new(min, max)?);
        Ok(self)
    }

    /// Enables best-effort no-duplicate rolling. Default is off.
    pub fn with_no_duplicate(mut self, enabled: bool) -> Self {
        self.settings.no_duplicate = enabled;
        self
    }

    /// Keeps history sorted ascending. Default is roll order.
    pub fn with_sort_history(mut self, enabled: bool) -> Self {
        self.settings.sort_history = enabled;
        self
    }

    /// Sets the spin timing configuration. Default is
    /// [`SpinConfig::quick`].
    pub fn with_spin_config(mut self, config: SpinConfig) -> Self {
        self.settings.spin = config;
        self
    }

    /// Seeds the session's PRNG for reproducible rolls. By default the PRNG
    /// is seeded from entropy.
    ///
    /// The seed also survives later [`RollSession::set_range`] calls that
    /// have to create a fresh generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Installs an observer for specification violations. Defaults to
    /// logging through `tracing`.
    pub fn with_violation_observer(mut self, observer: Arc<dyn ViolationObserver>) -> Self {
        self.violation_observer = Some(observer);
        self
    }

    /// Consumes the builder and starts the session.
    #[must_use]
    pub fn start_session(self) -> RollSession {
        RollSession::new(self.range, self.settings, self.seed, self.violation_observer)
    }
}
