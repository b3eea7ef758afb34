use crate::errors::{Error, Result};
use crate::times;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::cmp::Ordering;

/// A range of time `[start, end]`, as milliseconds since the Unix epoch.
///
/// Although both bounds are stored, overlap tests treat the end as exclusive:
/// ```txt
///    [0 ----- 10]
///             [10 ----- 20]     do not intersect
///    [0 ------ 11]
///             [10 ----- 20]     intersect
/// ```
///
/// Two notions of "same" coexist and must not be confused:
///   * `==` compares both bounds.
///   * [`Interval::compare`] only looks at the start, so `[0, 5]` and
///     `[0, 9]` compare as `Ordering::Equal` although they are not `==`.
/// For that reason this type does not implement `PartialOrd` or `Ord`; sort
/// with `compare` explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    start: i64,
    end: i64,
}

impl Interval {
    /// Create a new interval.  Fails with [`Error::InvalidRange`] when start
    /// is after end.  A single instant (`start == end`) is valid.
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if start > end {
            log::debug!("rejecting interval with start {start} > end {end}");
            return Err(Error::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Create a new interval from calendar timestamps.  Sub-millisecond
    /// precision is truncated.
    pub fn from_datetimes<Tz: TimeZone>(
        start: &DateTime<Tz>,
        end: &DateTime<Tz>,
    ) -> Result<Self> {
        Self::new(times::to_millis(start), times::to_millis(end))
    }

    #[must_use]
    pub fn start_millis(&self) -> i64 {
        self.start
    }

    #[must_use]
    pub fn end_millis(&self) -> i64 {
        self.end
    }

    /// The start as a calendar timestamp.  This fails only for timestamps
    /// that chrono cannot represent.
    pub fn start(&self) -> Result<DateTime<Utc>> {
        times::from_millis(self.start)
    }

    /// The end as a calendar timestamp.
    pub fn end(&self) -> Result<DateTime<Utc>> {
        times::from_millis(self.end)
    }

    /// Number of milliseconds between start and end.  Never overflows, even
    /// for `[i64::MIN, i64::MAX]`.
    #[must_use]
    pub fn elapsed_millis(&self) -> u64 {
        self.end.abs_diff(self.start)
    }

    /// Duration between start and end, saturating at `TimeDelta::MAX` for
    /// spans that chrono cannot represent.
    #[must_use]
    pub fn elapsed(&self) -> TimeDelta {
        i64::try_from(self.elapsed_millis())
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .unwrap_or(TimeDelta::MAX)
    }

    /// Whether the timestamp is in `[start, end]`, both bounds included.
    #[must_use]
    pub fn contains(&self, timestamp: i64) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    /// Whether self contains all instants of other.
    #[must_use]
    pub fn contains_interval(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two intervals overlap.  An interval ending exactly where
    /// the other one starts does not count.
    #[must_use]
    pub fn intersects_with(&self, other: &Interval) -> bool {
        (self.start <= other.start && self.end > other.start)
            || (other.start <= self.start && other.end > self.start)
    }

    /// Same as [`Interval::intersects_with`], for callers that may not have
    /// a second interval.
    pub fn try_intersects_with(
        &self,
        other: Option<&Interval>,
    ) -> Result<bool> {
        other
            .map(|o| self.intersects_with(o))
            .ok_or_else(|| missing("other"))
    }

    /// The smallest interval that contains both a and b.
    /// The two intervals do not need to intersect: whatever lies between them
    /// is silently included in the result.
    /// ```txt
    ///      [---a---]   [----b----]
    ///      [---------------------]    merge
    /// ```
    #[must_use]
    pub fn merge(a: &Interval, b: &Interval) -> Interval {
        Interval {
            start: a.start.min(b.start),
            end: a.end.max(b.end),
        }
    }

    /// Same as [`Interval::merge`], failing if either interval is missing.
    pub fn try_merge(
        a: Option<&Interval>,
        b: Option<&Interval>,
    ) -> Result<Interval> {
        match (a, b) {
            (Some(a), Some(b)) => Ok(Interval::merge(a, b)),
            (None, _) => Err(missing("a")),
            (_, None) => Err(missing("b")),
        }
    }

    /// Order two intervals by their start only.  The end is ignored, so this
    /// is not consistent with `==`.
    #[must_use]
    pub fn compare(&self, other: &Interval) -> Ordering {
        self.start.cmp(&other.start)
    }

    /// Compare with a value of unknown type.  Anything that is not an
    /// `Interval` is an error.
    pub fn compare_value(&self, other: &dyn Any) -> Result<Ordering> {
        other
            .downcast_ref::<Interval>()
            .map(|o| self.compare(o))
            .ok_or_else(|| {
                Error::InvalidArgument(
                    "cannot compare an interval with another type".into(),
                )
            })
    }

    /// Equality with a value of unknown type.  Unlike
    /// [`Interval::compare_value`], a missing value or a value of another
    /// type is simply not equal.
    #[must_use]
    pub fn equals(&self, other: Option<&dyn Any>) -> bool {
        other
            .and_then(|o| o.downcast_ref::<Interval>())
            .is_some_and(|o| o == self)
    }
}

fn missing(name: &str) -> Error {
    Error::InvalidArgument(format!("{name} must not be absent"))
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Unchecked serialized form, validated through [`Interval::new`].
#[derive(Deserialize)]
struct RawInterval {
    start: i64,
    end: i64,
}

impl TryFrom<RawInterval> for Interval {
    type Error = Error;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Interval::new(raw.start, raw.end)
    }
}
