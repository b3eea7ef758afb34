//! Helpers to assign time-series samples to intervals.
//!
//! Buckets produced here are back-to-back: the end of one bucket is the start
//! of the next one.  Since the end of an interval is exclusive when testing
//! for intersection, consecutive buckets never intersect.
//! ```text
//!    [------------------ interval -------------]
//!    [--- b0 ---]
//!               [--- b1 ---]
//!                          [--- b2 ---]
//!                                     [- b3 ---]   truncated
//! ```

use crate::errors::{Error, Result};
use crate::intervals::Interval;
use itertools::Itertools;

fn check_width(width_ms: i64) -> Result<()> {
    if width_ms <= 0 {
        return Err(Error::InvalidArgument(format!(
            "bucket width must be positive, got {width_ms}ms"
        )));
    }
    Ok(())
}

/// Split the interval into consecutive buckets of `width_ms` milliseconds.
/// The last bucket is truncated at the end of the interval.  A zero-length
/// interval results in a single zero-length bucket.
pub fn split(interval: &Interval, width_ms: i64) -> Result<Vec<Interval>> {
    check_width(width_ms)?;
    let end = interval.end_millis();
    let mut result = Vec::new();
    let mut start = interval.start_millis();
    loop {
        let bucket_end =
            start.checked_add(width_ms).map_or(end, |e| e.min(end));
        result.push(Interval::new(start, bucket_end)?);
        if bucket_end == end {
            break;
        }
        start = bucket_end;
    }
    log::trace!("split {interval} into {} buckets", result.len());
    Ok(result)
}

/// The bucket `[k * width, (k + 1) * width]` that the timestamp falls into.
/// Buckets are aligned on the epoch, including for negative timestamps.  A
/// timestamp exactly on a boundary belongs to the bucket that starts there.
pub fn aligned(timestamp: i64, width_ms: i64) -> Result<Interval> {
    check_width(width_ms)?;
    let start = timestamp
        .div_euclid(width_ms)
        .checked_mul(width_ms)
        .ok_or_else(|| overflow(timestamp, width_ms))?;
    let end = start
        .checked_add(width_ms)
        .ok_or_else(|| overflow(timestamp, width_ms))?;
    Interval::new(start, end)
}

fn overflow(timestamp: i64, width_ms: i64) -> Error {
    Error::InvalidArgument(format!(
        "no {width_ms}ms bucket can hold timestamp {timestamp}"
    ))
}

/// Sort the intervals and merge every group of intersecting ones.
/// Intervals that merely touch (`[0, 10]` and `[10, 20]`) are kept separate.
/// Duplicates are removed.
#[must_use]
pub fn coalesce<I>(intervals: I) -> Vec<Interval>
where
    I: IntoIterator<Item = Interval>,
{
    let sorted = intervals
        .into_iter()
        .sorted_by(|a, b| {
            a.compare(b)
                .then_with(|| a.end_millis().cmp(&b.end_millis()))
        })
        .collect::<Vec<_>>();
    let result = sorted
        .iter()
        .copied()
        .dedup()
        .coalesce(|a, b| {
            if a.intersects_with(&b) {
                Ok(Interval::merge(&a, &b))
            } else {
                Err((a, b))
            }
        })
        .collect::<Vec<_>>();
    log::trace!("coalesced {} intervals into {}", sorted.len(), result.len());
    result
}
