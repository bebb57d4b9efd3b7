//! Error types returned by this library.

use std::error::Error;
use std::fmt;
use std::fmt::Display;

/// Convenience alias for results returned by this library.
pub type TumblerResult<T> = std::result::Result<T, TumblerError>;

/// This enum contains all error messages this library can return. Most fallible
/// API functions will generally return a [`TumblerResult`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TumblerError {
    /// The requested range is invalid. Ranges must satisfy `min < max`.
    InvalidRange {
        /// The lower bound that was requested.
        min: i64,
        /// The upper bound that was requested.
        max: i64,
    },
    /// The requested range is valid but too wide for a cycle to be
    /// materialized in memory.
    RangeTooLarge {
        /// The number of values the range spans.
        span: u64,
        /// The maximum supported span ([`MAX_RANGE_SPAN`]).
        ///
        /// [`MAX_RANGE_SPAN`]: crate::MAX_RANGE_SPAN
        max_span: u64,
    },
    /// A roll or spin was requested before any valid range was set.
    RangeNotSet,
    /// A spin was requested while another spin is still running. Cancel the
    /// active spin or let it settle first.
    SpinInProgress,
    /// An internal error occurred that should not happen under normal
    /// operation. If you encounter this error, please report it as a bug.
    InternalError {
        /// A description of the internal error.
        context: String,
    },
}

impl Display for TumblerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TumblerError::InvalidRange { min, max } => {
                write!(f, "Invalid range [{}, {}]: min must be less than max.", min, max)
            }
            TumblerError::RangeTooLarge { span, max_span } => {
                write!(
                    f,
                    "Range spans {} values, which exceeds the supported maximum of {}.",
                    span, max_span
                )
            }
            TumblerError::RangeNotSet => {
                write!(f, "No range has been set. Call set_range before rolling.")
            }
            TumblerError::SpinInProgress => {
                write!(f, "A spin is already in progress.")
            }
            TumblerError::InternalError { context } => {
                write!(f, "Internal error (please report as bug): {}", context)
            }
        }
    }
}

impl Error for TumblerError {}
