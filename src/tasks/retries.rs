//! # Retry counter bound to a single task.
//!
//! [`Retries`] tracks how many times a task has asked to be retried and
//! refuses once the configured bound is exceeded.
//!
//! ## Rules
//! - `max` must be greater than zero (checked at construction).
//! - `retries` never exceeds `max`; the increment that would exceed it fails with
//!   [`RetriesError::Exceeded`] and leaves the counter at `max`.
//! - A counter belongs to exactly one task; [`Retries::reset`] is the owner's
//!   way to prepare for an independent run.
//!
//! ## Example
//! ```rust
//! use taskchain::{Retries, RetriesError};
//!
//! let mut r = Retries::new(2).unwrap();
//! r.increase().unwrap();
//! r.increase().unwrap();
//! assert_eq!(r.increase(), Err(RetriesError::Exceeded { max: 2, tried: 3 }));
//! assert_eq!(r.retries(), 2);
//!
//! assert!(Retries::new(0).is_err());
//! ```

use crate::error::RetriesError;

/// Bounded retry counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Retries {
    max: u32,
    retries: u32,
}

impl Retries {
    /// Creates a counter allowing at most `max` retries.
    ///
    /// Fails with [`RetriesError::Invalid`] when `max <= 0` or `max > u32::MAX`.
    pub fn new(max: i64) -> Result<Self, RetriesError> {
        match u32::try_from(max) {
            Ok(bound) if bound > 0 => Ok(Self {
                max: bound,
                retries: 0,
            }),
            _ => Err(RetriesError::Invalid { max }),
        }
    }

    /// Records one more retry.
    pub fn increase(&mut self) -> Result<(), RetriesError> {
        let tried = self.retries.saturating_add(1);
        if tried > self.max {
            return Err(RetriesError::Exceeded {
                max: self.max,
                tried,
            });
        }
        self.retries = tried;
        Ok(())
    }

    /// Sets the counter back to zero.
    pub fn reset(&mut self) {
        self.retries = 0;
    }

    /// Retries recorded so far.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Maximum allowed retries.
    pub fn max_retries(&self) -> u32 {
        self.max
    }
}

impl TryFrom<i64> for Retries {
    type Error = RetriesError;

    fn try_from(max: i64) -> Result<Self, Self::Error> {
        Retries::new(max)
    }
}

impl TryFrom<i32> for Retries {
    type Error = RetriesError;

    fn try_from(max: i32) -> Result<Self, Self::Error> {
        Retries::new(i64::from(max))
    }
}

impl TryFrom<u32> for Retries {
    type Error = RetriesError;

    fn try_from(max: u32) -> Result<Self, Self::Error> {
        Retries::new(i64::from(max))
    }
}
