use crate::errors::{Error, Result};
use crate::intervals::Interval;
use chrono::{DateTime, TimeZone, Utc};

/// Number of milliseconds since the Unix epoch for the given timestamp.
/// Timestamps before the epoch are negative.
#[must_use]
pub fn to_millis<Tz: TimeZone>(time: &DateTime<Tz>) -> i64 {
    time.timestamp_millis()
}

/// Convert milliseconds since the Unix epoch back to a calendar timestamp.
/// chrono only supports a range of about 262,000 years around the epoch, so
/// the most extreme `i64` values cannot be converted.
pub fn from_millis(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
        Error::InvalidArgument(format!(
            "timestamp {millis}ms is out of the supported calendar range"
        ))
    })
}

/// A period of time that ends at some "now".
/// Such a period can be stored in configuration files, for instance
/// as "the last three months".  That way, when we evaluate it at some point
/// in the future, it still covers the three months preceding that point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    Days(u64),
    Months(u32),
    Years(u32),
}

impl Lookback {
    /// The first instant of the period, relative to `now`.
    /// Months and years are calendar-aware: one month before March 31st is
    /// the last day of February.
    pub fn since<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<DateTime<Tz>> {
        let start = match self {
            Lookback::Days(count) => {
                now.clone().checked_sub_days(chrono::Days::new(*count))
            }
            Lookback::Months(count) => {
                now.clone().checked_sub_months(chrono::Months::new(*count))
            }
            Lookback::Years(count) => count
                .checked_mul(12)
                .and_then(|m| {
                    now.clone().checked_sub_months(chrono::Months::new(m))
                }),
        };
        start.ok_or_else(|| {
            Error::InvalidArgument(format!(
                "{self:?} before {} is not a valid date",
                now.naive_utc()
            ))
        })
    }

    /// Compute the interval `[now - period, now]`.  The period itself doesn't
    /// depend on a specific "now", so it can be reused.
    pub fn to_interval<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<Interval> {
        Interval::from_datetimes(&self.since(now)?, now)
    }
}
