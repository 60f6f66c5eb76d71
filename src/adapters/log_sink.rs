//! Log-only event sink, for tests and headless runs without a remote.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::AlertRaised { .. } | AppEvent::DispenseForcedStop { .. } => {
                warn!("{}: {}", event.kind(), event.description());
            }
            _ => info!("{}: {}", event.kind(), event.description()),
        }
    }
}
