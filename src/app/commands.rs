//! Commands the remote sync layer hands to the application service.
//!
//! Each remote control flag or settings change is translated into one of
//! these; the service answers with an ack so the sync layer knows when a
//! one-shot flag may be cleared upstream.

use crate::app::ports::Output;
use crate::config::{FeedingProfile, WaterSettings};
use crate::dispense::DispenseResource;
use crate::schedule::ScheduleTable;

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Start a dispense.  `None` duration means "use the configured
    /// default" (recommended ration time for feed, fill duration for
    /// water).
    Dispense {
        resource: DispenseResource,
        duration_secs: Option<f32>,
    },
    SetAutomation(bool),
    /// Direct output control; honoured only while automation is off.
    SetManualOutput { output: Output, on: bool },
    UpdateFeedingProfile(FeedingProfile),
    UpdateWaterSettings(WaterSettings),
    UpdateSchedule {
        resource: DispenseResource,
        table: ScheduleTable,
    },
}

/// Whether a command took effect.  `Rejected` is normal operation for a
/// dispense that lands on a busy coordinator; the sync layer leaves the
/// remote flag set so the user's intent is retried once the resource
/// frees up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAck {
    Accepted,
    Rejected,
}
