//! Immutable time intervals, used to bucket time-series samples and to test
//! whether two ranges of samples overlap.
//!
//! Timestamps are stored as milliseconds since the Unix epoch.  Calendar
//! conversions go through chrono, see [`times`].
//!
//! ```
//! use sample_buckets::Interval;
//!
//! let a = Interval::new(100, 200).unwrap();
//! let b = Interval::new(150, 300).unwrap();
//! assert!(a.intersects_with(&b));
//! assert_eq!(Interval::merge(&a, &b), Interval::new(100, 300).unwrap());
//!
//! // Back-to-back intervals do not intersect
//! let c = Interval::new(200, 250).unwrap();
//! assert!(!a.intersects_with(&c));
//! ```

pub mod buckets;
pub mod errors;
pub mod intervals;
pub mod times;

pub use crate::errors::{Error, Result};
pub use crate::intervals::Interval;
