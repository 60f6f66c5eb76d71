//! Clock adapter.
//!
//! The domain takes time as plain values (monotonic milliseconds, an
//! optional wall-clock triple), so this is the only file that touches a
//! real clock.

use std::time::Instant;

use chrono::{Datelike, Local, Timelike};

use crate::app::ports::WallTime;

pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Monotonic milliseconds since construction.  Immune to wall-clock
    /// steps, so dispense timing cannot be stretched by an NTP jump.
    pub fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Local wall-clock time for the scheduler and daily rollover.
    pub fn wall_time(&self) -> Option<WallTime> {
        let now = Local::now();
        Some(WallTime {
            hour: now.hour() as u8,
            minute: now.minute() as u8,
            day: now.num_days_from_ce(),
        })
    }

    /// Unix timestamp for remote records.
    pub fn unix_ts(&self) -> i64 {
        Local::now().timestamp()
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}
