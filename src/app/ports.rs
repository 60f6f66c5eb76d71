//! Port traits: the hexagonal boundary between the control core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensor hub, relay/servo drivers, remote store, event
//! sinks) implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the control core never touches hardware
//! or the network directly.

use serde_json::Value;

use crate::error::{ActuatorError, RemoteError, SensorError};

// ───────────────────────────────────────────────────────────────
// Sensor snapshot
// ───────────────────────────────────────────────────────────────

/// A point-in-time snapshot of every sensor in the enclosure.
/// One per tick; read-only to every component.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorSnapshot {
    /// Enclosure air temperature (°C).
    pub temperature_c: f32,
    /// Relative humidity (%).
    pub humidity_pct: f32,
    /// Feed hopper level (0–100 %).
    pub food_level_pct: u8,
    /// Main water tank level (0–100 %).
    pub water_main_pct: u8,
    /// Drinker level (0–100 %).
    pub water_drinker_pct: u8,
    /// Unix timestamp of the reading.
    pub taken_at: i64,
}

impl SensorSnapshot {
    /// Safe sentinel used when the sensor driver fails: zeroed fields,
    /// the same shape the sensor hub reports on a failed probe read.
    pub fn sentinel(taken_at: i64) -> Self {
        Self {
            taken_at,
            ..Self::default()
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Wall-clock time
// ───────────────────────────────────────────────────────────────

/// Local wall-clock time, as much of it as the scheduler and the daily
/// rollover need.  `None` at the call sites means the platform clock is
/// not (yet) synced; time-of-day features simply skip that tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallTime {
    /// Hour of day, 0–23.
    pub hour: u8,
    /// Minute of hour, 0–59.
    pub minute: u8,
    /// Day ordinal (days since an arbitrary epoch); only compared for
    /// equality to detect midnight rollover.
    pub day: i32,
}

// ───────────────────────────────────────────────────────────────
// Physical outputs
// ───────────────────────────────────────────────────────────────

/// The four physical outputs the controller owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Fan,
    Heat,
    Pump,
    Feeder,
}

impl Output {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fan => "fan",
            Self::Heat => "heat lamp",
            Self::Pump => "water pump",
            Self::Feeder => "feeder",
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per tick.
///
/// Implementations must be bounded-time; a failed read returns an error
/// and the service substitutes [`SensorSnapshot::sentinel`] rather than
/// failing the tick.
pub trait SensorPort {
    fn read_all(&mut self) -> Result<SensorSnapshot, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: one method per physical output.  All methods are
/// idempotent; re-asserting the current state is the service's way of
/// self-healing drift and retrying failed commands.
pub trait ActuatorPort {
    fn set_fan(&mut self, on: bool) -> Result<(), ActuatorError>;
    fn set_heat(&mut self, on: bool) -> Result<(), ActuatorError>;
    fn set_pump(&mut self, on: bool) -> Result<(), ActuatorError>;
    /// Open (`true`) or close (`false`) the feed gate.
    fn set_feeder(&mut self, open: bool) -> Result<(), ActuatorError>;

    /// Kill every output for safe shutdown.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (log, remote event
/// feed, both).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Remote control-plane port
// ───────────────────────────────────────────────────────────────

/// Typed access to the remote store carrying commands, settings and
/// telemetry.  Paths are slash-separated (`controls/feed`,
/// `waterSettings/flowRate`, ...).
///
/// `get_*` return `Ok(None)` when the path is absent; absence is not an
/// error.  Every `Err` is survivable: callers fall back to their cached
/// value and surface a diagnostic.
pub trait RemotePort {
    fn get_bool(&mut self, path: &str) -> Result<Option<bool>, RemoteError>;
    fn get_u32(&mut self, path: &str) -> Result<Option<u32>, RemoteError>;
    fn get_f32(&mut self, path: &str) -> Result<Option<f32>, RemoteError>;
    fn get_json(&mut self, path: &str) -> Result<Option<Value>, RemoteError>;

    fn set_bool(&mut self, path: &str, value: bool) -> Result<(), RemoteError>;
    fn set_u32(&mut self, path: &str, value: u32) -> Result<(), RemoteError>;
    fn set_f32(&mut self, path: &str, value: f32) -> Result<(), RemoteError>;

    /// Append an entry to the remote event feed (`events/<ts>`).
    fn push_event(&mut self, kind: &str, description: &str, timestamp: i64)
    -> Result<(), RemoteError>;

    /// Write a JSON record at an explicit path (analytics, history).
    fn push_record(&mut self, path: &str, record: &Value) -> Result<(), RemoteError>;
}
