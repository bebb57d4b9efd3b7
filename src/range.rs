//! The validated roll range type.

use serde::{Deserialize, Serialize};

use crate::error::{TumblerError, TumblerResult};

/// The widest range a cycle will be materialized for, in number of values.
///
/// A cycle holds every value of the range in memory at once, so the span has
/// to be bounded somewhere; 2^20 values (an 8 MiB cycle buffer) is far beyond
/// anything a picker UI presents while still refusing pathological input
/// like `[i64::MIN, i64::MAX]` with a clean error.
pub const MAX_RANGE_SPAN: u64 = 1 << 20;

/// An inclusive integer range `[min, max]` to roll over.
///
/// Construction through [`RollRange::new`] is the single validation point of
/// the crate: a `RollRange` that exists is always well-formed (`min < max`,
/// span within [`MAX_RANGE_SPAN`]), so everything downstream — the cycle
/// generator, the session, the spin — can assume a valid range and never
/// re-check it.
///
/// # Example
///
/// ```
/// use tumbler::RollRange;
///
/// let dice = RollRange::new(1, 6).unwrap();
/// assert_eq!(dice.span(), 6);
/// assert!(dice.contains(4));
/// assert!(RollRange::new(6, 1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RangeBounds", into = "RangeBounds")]
pub struct RollRange {
    min: i64,
    max: i64,
}

/// Wire shape for [`RollRange`]; deserialization funnels through
/// [`RollRange::new`] so serde cannot produce an unvalidated range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RangeBounds {
    min: i64,
    max: i64,
}

impl TryFrom<RangeBounds> for RollRange {
    type Error = TumblerError;

    fn try_from(bounds: RangeBounds) -> TumblerResult<Self> {
        Self::new(bounds.min, bounds.max)
    }
}

impl From<RollRange> for RangeBounds {
    fn from(range: RollRange) -> Self {
        Self {
            min: range.min,
            max: range.max,
        }
    }
}

impl RollRange {
    /// Creates a validated range.
    ///
    /// # Errors
    /// - [`InvalidRange`] if `min >= max`
    /// - [`RangeTooLarge`] if the range spans more than [`MAX_RANGE_SPAN`]
    ///   values
    ///
    /// [`InvalidRange`]: TumblerError::InvalidRange
    /// [`RangeTooLarge`]: TumblerError::RangeTooLarge
    pub fn new(min: i64, max: i64) -> TumblerResult<Self> {
        if min >= max {
            return Err(TumblerError::InvalidRange { min, max });
        }
        // i128 keeps the span math exact for bounds near the i64 limits
        let span = (max as i128 - min as i128 + 1) as u64;
        if span > MAX_RANGE_SPAN {
            return Err(TumblerError::RangeTooLarge {
                span,
                max_span: MAX_RANGE_SPAN,
            });
        }
        Ok(Self { min, max })
    }

    /// The inclusive lower bound.
    #[must_use]
    pub const fn min(&self) -> i64 {
        self.min
    }

    /// The inclusive upper bound.
    #[must_use]
    pub const fn max(&self) -> i64 {
        self.max
    }

    /// The number of distinct values in the range (`max - min + 1`).
    #[must_use]
    pub fn span(&self) -> u64 {
        (self.max as i128 - self.min as i128 + 1) as u64
    }

    /// Whether `value` lies within the range, bounds included.
    #[must_use]
    pub const fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }

    /// The range as a standard inclusive range, for iteration and draws.
    #[must_use]
    pub const fn as_inclusive(&self) -> std::ops::RangeInclusive<i64> {
        self.min..=self.max
    }
}

impl std::fmt::Display for RollRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}
