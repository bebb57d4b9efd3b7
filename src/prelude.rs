//! Convenient re-exports for common usage.
//!
//! ```rust
//! use tumbler::prelude::*;
//!
//! let mut session = SessionBuilder::new()
//!     .with_range(1, 6)
//!     .unwrap()
//!     .start_session();
//! let value = session.roll().unwrap();
//! assert!((1..=6).contains(&value));
//! ```

// Session types
pub use crate::builder::SessionBuilder;
pub use crate::session::{RollEvent, RollSession, RollSettings};

// Core algorithm
pub use crate::cycle::RollCycleGenerator;

// Fundamental types and constants
pub use crate::range::{RollRange, MAX_RANGE_SPAN};

// History
pub use crate::history::RollHistory;

// Spin configuration
pub use crate::spin::SpinConfig;

// Error handling
pub use crate::error::{TumblerError, TumblerResult};
