//! # Tumbler
//!
//! Tumbler is the engine behind "random number roller" apps: the user picks a
//! bounded integer range, taps a button, watches an optional spin animation,
//! and receives exactly one authoritative value per roll. The crate owns the
//! logic only — range validation, the no-repeat roll cycle, roll history, and
//! the spin schedule — and is driven synchronously by a host UI. There is no
//! rendering, no persistence and no I/O in here.
//!
//! Instead of registering callbacks, a [`RollSession`] hands the host
//! [`RollEvent`]s to act on: the host calls [`RollSession::tick`] once per
//! tick interval and displays whatever comes back.
//!
//! ```
//! use tumbler::{RollEvent, SessionBuilder};
//!
//! let mut session = SessionBuilder::new()
//!     .with_seed(7)
//!     .with_range(1, 6)
//!     .unwrap()
//!     .with_no_duplicate(true)
//!     .start_session();
//!
//! session.begin_spin().unwrap();
//! loop {
//!     match session.tick() {
//!         Some(RollEvent::Spinning { value }) => { /* render the preview */ let _ = value; }
//!         Some(RollEvent::Settled { value }) => {
//!             assert!((1..=6).contains(&value));
//!             break;
//!         }
//!         None => unreachable!("an armed spin always ends in a settle"),
//!     }
//! }
//! assert_eq!(session.history().len(), 1);
//! ```
//!
//! The core algorithm — the best-effort no-duplicate cycle — is available on
//! its own as [`RollCycleGenerator`] for hosts that bring their own state
//! management.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub use builder::SessionBuilder;
pub use cycle::RollCycleGenerator;
pub use error::{TumblerError, TumblerResult};
pub use history::RollHistory;
pub use range::{RollRange, MAX_RANGE_SPAN};
pub use session::{RollEvent, RollSession, RollSettings};
pub use spin::SpinConfig;

pub mod builder;
pub mod cycle;
pub mod error;
pub mod history;
pub mod prelude;
pub mod range;
/// Internal random number generator module based on PCG32.
///
/// Provides a minimal, high-quality PRNG in place of the `rand` crate.
/// See the module documentation for usage details.
pub mod rng;
pub mod session;
pub mod spin;
pub mod telemetry;

/// Internal module exposing implementation details for testing and benchmarks.
///
/// # ⚠️ WARNING: No Stability Guarantees
///
/// **This module is NOT part of the public API.** Everything here is subject
/// to change without notice and exists only so integration tests, property
/// tests and benchmarks can exercise components directly:
///
/// - **`build_cycle`**: cycle construction, tested against its coverage and
///   length invariants without going through a generator or session
///
/// Do not depend on anything in this module from application code.
#[doc(hidden)]
pub mod __internal {
    pub use crate::cycle::{build_cycle, CycleBuf};
}
