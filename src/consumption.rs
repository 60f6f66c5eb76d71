//! Daily water consumption accounting.
//!
//! Every completed water fill is assumed drunk and added to a running
//! daily total; the total resets at midnight (wall-day change).  The
//! per-bird figure feeds the hydration alert.
//!
//! Volatile by design: a restart loses the partial day and the next
//! day's accounting starts clean.

use log::info;

pub struct WaterConsumptionTracker {
    total_ml_today: u32,
    /// Day ordinal the running total belongs to.  `None` until the first
    /// record or rollover check with a valid wall clock.
    day: Option<i32>,
}

impl Default for WaterConsumptionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl WaterConsumptionTracker {
    pub fn new() -> Self {
        Self {
            total_ml_today: 0,
            day: None,
        }
    }

    /// Add a delivered volume to today's total.
    pub fn record(&mut self, ml: u32, day: i32) {
        self.roll_if_new_day(day);
        self.total_ml_today = self.total_ml_today.saturating_add(ml);
    }

    /// Reset the total if the wall day moved on.  Returns true on a
    /// rollover so the caller can refresh derived state.
    pub fn roll_if_new_day(&mut self, day: i32) -> bool {
        match self.day {
            Some(d) if d == day => false,
            Some(_) => {
                info!(
                    "water consumption: day rollover, yesterday's total {}ml",
                    self.total_ml_today
                );
                self.total_ml_today = 0;
                self.day = Some(day);
                true
            }
            None => {
                self.day = Some(day);
                false
            }
        }
    }

    pub fn total_today(&self) -> u32 {
        self.total_ml_today
    }

    /// Millilitres per bird today; zero for an empty flock.
    pub fn per_bird(&self, chicken_count: u32) -> u32 {
        if chicken_count == 0 {
            return 0;
        }
        self.total_ml_today / chicken_count
    }
}
