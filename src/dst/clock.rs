//! SimClock - Simulated Time
//!
//! TigerStyle: time is an offset that only ever moves forward.

use chrono::Utc;
use crate::error::{NestError, NestResult};

/// Where the clock's base time comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockMode {
    /// Follows real time, plus any explicit steps
    Wall,
    /// Frozen base, moves only through explicit steps
    Manual,
}

impl ClockMode {
    fn base_secs(self) -> i64 {
        match self {
            Self::Wall => Utc::now().timestamp(),
            Self::Manual => 0,
        }
    }
}

/// A simulated clock for the nest.
///
/// TigerStyle:
/// - `now = base - start_offset`
/// - Stepping forward lowers `start_offset`
/// - Time never goes backwards through this API
#[derive(Debug, Clone)]
pub struct SimClock {
    mode: ClockMode,
    /// Base time at which the simulation started, minus all steps taken
    start_offset: i64,
}

impl SimClock {
    /// Create a clock reading zero seconds.
    ///
    /// # Example
    /// ```
    /// use nest_sim::dst::{ClockMode, SimClock};
    /// let clock = SimClock::new(ClockMode::Manual);
    /// assert_eq!(clock.now_secs(), 0);
    /// ```
    #[must_use]
    pub fn new(mode: ClockMode) -> Self {
        Self {
            mode,
            start_offset: mode.base_secs(),
        }
    }

    /// Logical start offset in seconds.
    #[must_use]
    pub fn start_offset(&self) -> i64 {
        self.start_offset
    }

    /// Elapsed simulated seconds.
    #[must_use]
    pub fn now_secs(&self) -> i64 {
        self.mode.base_secs().saturating_sub(self.start_offset)
    }

    /// Step time forward by `delta` seconds.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `delta` is negative or would carry time
    /// past `i64::MAX`; the clock is unchanged.
    ///
    /// # Returns
    /// The new current time.
    pub fn advance_secs(&mut self, delta: i64) -> NestResult<i64> {
        if delta < 0 {
            return Err(NestError::InvalidArgument(format!(
                "cannot step time backwards by {delta} seconds"
            )));
        }

        let base = self.mode.base_secs();
        let old_time = base.saturating_sub(self.start_offset);
        let new_time = old_time.checked_add(delta).ok_or_else(|| {
            NestError::InvalidArgument(format!(
                "stepping {delta} seconds from {old_time} overflows the clock"
            ))
        })?;
        self.start_offset = base.saturating_sub(new_time);

        // Postcondition
        debug_assert!(new_time >= old_time, "time must not go backwards");

        Ok(new_time)
    }
}
