//! Structured application events.
//!
//! Everything operationally interesting funnels through [`AppEvent`]:
//! dispense lifecycle, alert edges, actuator changes, mode switches.
//! Sinks turn them into log lines and remote event-feed entries; the
//! `kind()` strings are the wire vocabulary the control plane's UI keys
//! on, so they are stable.

use crate::alerts::AlertKind;
use crate::app::ports::Output;
use crate::dispense::{DispenseResource, TriggerSource};

/// What caused an actuator level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCause {
    Automatic,
    Manual,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Controller came up and the control loop is about to start.
    Started,
    /// Automation mode flipped.
    ModeChanged { automation: bool },
    AlertRaised {
        kind: AlertKind,
        description: String,
    },
    AlertResolved {
        kind: AlertKind,
        description: String,
    },
    DispenseStarted {
        resource: DispenseResource,
        source: TriggerSource,
        amount: u32,
        duration_secs: f32,
    },
    DispenseCompleted {
        resource: DispenseResource,
        amount: u32,
        duration_secs: f32,
    },
    /// Watchdog ceiling killed a dispense.
    DispenseForcedStop {
        resource: DispenseResource,
        elapsed_secs: f32,
    },
    ActuatorChanged {
        output: Output,
        on: bool,
        cause: ChangeCause,
    },
    ScheduleTriggered {
        resource: DispenseResource,
        hour: u8,
    },
}

impl AppEvent {
    /// Wire kind string for the remote event feed.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Started | Self::ModeChanged { .. } => "system",
            Self::AlertRaised { kind, .. } => kind.event_kind(),
            Self::AlertResolved { .. } => "resolved",
            Self::DispenseStarted { resource, .. } => match resource {
                DispenseResource::Feed => "feeding",
                DispenseResource::Water => "waterFilling",
            },
            Self::DispenseCompleted { resource, .. } => match resource {
                DispenseResource::Feed => "feedingComplete",
                DispenseResource::Water => "waterFillComplete",
            },
            Self::DispenseForcedStop { .. } => "forcedStop",
            Self::ActuatorChanged { cause, .. } => match cause {
                ChangeCause::Automatic => "automatic",
                ChangeCause::Manual => "manual",
            },
            Self::ScheduleTriggered { resource, .. } => match resource {
                DispenseResource::Feed => "scheduledFeeding",
                DispenseResource::Water => "scheduledWaterFill",
            },
        }
    }

    /// Human-readable description for log lines and the event feed.
    pub fn description(&self) -> String {
        match self {
            Self::Started => "controller started".to_string(),
            Self::ModeChanged { automation } => {
                format!(
                    "automation {}",
                    if *automation { "enabled" } else { "disabled" }
                )
            }
            Self::AlertRaised { description, .. }
            | Self::AlertResolved { description, .. } => description.clone(),
            Self::DispenseStarted {
                resource,
                source,
                amount,
                duration_secs,
            } => format!(
                "{} dispensing {}{} over {:.1}s ({})",
                resource.label(),
                amount,
                resource.unit(),
                duration_secs,
                source.label()
            ),
            Self::DispenseCompleted {
                resource,
                amount,
                duration_secs,
            } => format!(
                "{} dispensed {}{} in {:.1}s",
                resource.label(),
                amount,
                resource.unit(),
                duration_secs
            ),
            Self::DispenseForcedStop {
                resource,
                elapsed_secs,
            } => format!(
                "{} forced stop after {:.1}s at the watchdog ceiling",
                resource.label(),
                elapsed_secs
            ),
            Self::ActuatorChanged { output, on, cause } => format!(
                "{} {} ({})",
                output.label(),
                if *on { "on" } else { "off" },
                match cause {
                    ChangeCause::Automatic => "automatic",
                    ChangeCause::Manual => "manual",
                }
            ),
            Self::ScheduleTriggered { resource, hour } => {
                format!("{} schedule fired for {hour:02}:00", resource.label())
            }
        }
    }
}
