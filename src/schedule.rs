//! Hourly dispense scheduling.
//!
//! A [`ScheduleTable`] is a 24-slot hour bitmap pulled from the remote
//! store; a [`ScheduleEngine`] polls the table against wall-clock time
//! and fires each enabled hour at most once, at minute zero.
//!
//! The engine only produces the trigger; whether the dispense actually
//! starts is the coordinator's call (a fire that lands in a cooldown is
//! simply lost for that hour, never queued).

use log::warn;
use serde_json::Value;

use crate::app::ports::WallTime;

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Which hours of the day a dispense should fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleTable {
    hours: [bool; 24],
}

impl ScheduleTable {
    pub const fn empty() -> Self {
        Self { hours: [false; 24] }
    }

    /// Parse a remote schedule document.  The document is a sparse map of
    /// hour to flag (`{"6": true, "18": true}`); hours absent from the
    /// map stay disabled.  Unusable keys or values are skipped with a
    /// diagnostic so one typo cannot drop the whole table.
    pub fn from_remote_json(doc: &Value) -> Self {
        let mut table = Self::empty();
        let Some(map) = doc.as_object() else {
            if !doc.is_null() {
                warn!("schedule document is not an object, ignoring");
            }
            return table;
        };
        for (key, value) in map {
            let Ok(hour) = key.parse::<usize>() else {
                warn!("schedule key {key:?} is not an hour, skipping");
                continue;
            };
            if hour >= 24 {
                warn!("schedule hour {hour} out of range, skipping");
                continue;
            }
            match value.as_bool() {
                Some(flag) => table.hours[hour] = flag,
                None => warn!("schedule hour {hour} has non-boolean value, skipping"),
            }
        }
        table
    }

    pub fn set_hour(&mut self, hour: u8, enabled: bool) {
        if let Some(slot) = self.hours.get_mut(usize::from(hour)) {
            *slot = enabled;
        }
    }

    pub fn is_enabled(&self, hour: u8) -> bool {
        usize::from(hour) < 24 && self.hours[usize::from(hour)]
    }

    pub fn enabled_count(&self) -> usize {
        self.hours.iter().filter(|h| **h).count()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// At-most-once-per-hour firing logic for one schedule table.
pub struct ScheduleEngine {
    last_triggered_hour: Option<u8>,
}

impl Default for ScheduleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleEngine {
    pub fn new() -> Self {
        Self {
            last_triggered_hour: None,
        }
    }

    /// Mark the boot hour as already handled.  Without this, restarting
    /// at 06:40 would fire the 06:00 slot forty minutes late.
    pub fn seed_boot_hour(&mut self, hour: u8) {
        self.last_triggered_hour = Some(hour);
    }

    /// Poll once per tick.  Returns the hour to fire, or `None`.
    ///
    /// The latch clears as soon as the wall hour moves on, so the same
    /// slot fires again the next day.  Minute zero is the gate; if every
    /// minute-zero tick is missed (remote hiccup, long sync stall) that
    /// hour's slot is skipped rather than fired late.
    pub fn poll(&mut self, wall: WallTime, table: &ScheduleTable) -> Option<u8> {
        if self.last_triggered_hour.is_some_and(|h| h != wall.hour) {
            self.last_triggered_hour = None;
        }
        if !table.is_enabled(wall.hour) || wall.minute != 0 {
            return None;
        }
        if self.last_triggered_hour == Some(wall.hour) {
            return None;
        }
        self.last_triggered_hour = Some(wall.hour);
        Some(wall.hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wall(hour: u8, minute: u8, day: i32) -> WallTime {
        WallTime { hour, minute, day }
    }

    #[test]
    fn parses_sparse_remote_document() {
        let t = ScheduleTable::from_remote_json(&json!({"6": true, "18": true, "12": false}));
        assert!(t.is_enabled(6));
        assert!(t.is_enabled(18));
        assert!(!t.is_enabled(12));
        assert!(!t.is_enabled(7));
        assert_eq!(t.enabled_count(), 2);
    }

    #[test]
    fn bad_entries_are_skipped_not_fatal() {
        let t = ScheduleTable::from_remote_json(&json!({
            "6": true,
            "banana": true,
            "25": true,
            "18": "yes"
        }));
        assert!(t.is_enabled(6));
        assert!(!t.is_enabled(18));
        assert_eq!(t.enabled_count(), 1);
    }

    #[test]
    fn non_object_document_yields_empty_table() {
        assert_eq!(
            ScheduleTable::from_remote_json(&json!([6, 18])),
            ScheduleTable::empty()
        );
        assert_eq!(
            ScheduleTable::from_remote_json(&Value::Null),
            ScheduleTable::empty()
        );
    }

    #[test]
    fn fires_once_per_enabled_hour() {
        let mut table = ScheduleTable::empty();
        table.set_hour(6, true);
        let mut e = ScheduleEngine::new();

        assert_eq!(e.poll(wall(6, 0, 1), &table), Some(6));
        // Every remaining tick of minute zero, and the rest of the hour:
        // silent.
        assert_eq!(e.poll(wall(6, 0, 1), &table), None);
        assert_eq!(e.poll(wall(6, 30, 1), &table), None);
    }

    #[test]
    fn minute_gate() {
        let mut table = ScheduleTable::empty();
        table.set_hour(6, true);
        let mut e = ScheduleEngine::new();
        assert_eq!(e.poll(wall(6, 1, 1), &table), None);
        assert_eq!(e.poll(wall(6, 59, 1), &table), None);
    }

    #[test]
    fn disabled_hour_never_fires() {
        let table = ScheduleTable::empty();
        let mut e = ScheduleEngine::new();
        assert_eq!(e.poll(wall(6, 0, 1), &table), None);
    }

    #[test]
    fn refires_next_day() {
        let mut table = ScheduleTable::empty();
        table.set_hour(6, true);
        let mut e = ScheduleEngine::new();

        assert_eq!(e.poll(wall(6, 0, 1), &table), Some(6));
        // Hour moves on, clearing the latch.
        assert_eq!(e.poll(wall(7, 0, 1), &table), None);
        // Next day, same slot.
        assert_eq!(e.poll(wall(6, 0, 2), &table), Some(6));
    }

    #[test]
    fn consecutive_enabled_hours_each_fire() {
        let mut table = ScheduleTable::empty();
        table.set_hour(6, true);
        table.set_hour(7, true);
        let mut e = ScheduleEngine::new();
        assert_eq!(e.poll(wall(6, 0, 1), &table), Some(6));
        assert_eq!(e.poll(wall(7, 0, 1), &table), Some(7));
    }

    #[test]
    fn boot_hour_seed_blocks_stale_fire() {
        let mut table = ScheduleTable::empty();
        table.set_hour(6, true);
        let mut e = ScheduleEngine::new();
        e.seed_boot_hour(6);

        // Booted mid-hour: even a minute-zero poll of the boot hour is
        // swallowed.
        assert_eq!(e.poll(wall(6, 0, 1), &table), None);
        // The next occurrence fires normally.
        assert_eq!(e.poll(wall(7, 0, 1), &table), None);
        assert_eq!(e.poll(wall(6, 0, 2), &table), Some(6));
    }
}
