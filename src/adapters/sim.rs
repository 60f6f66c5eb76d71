//! Simulation adapters: synthetic sensors, logged actuators and an
//! in-memory remote store.
//!
//! These back the default binary so the whole control loop can run on a
//! desk, and double as the integration-test harness.

use std::collections::HashMap;

use log::{debug, info};
use serde_json::{Value, json};

use crate::app::ports::{ActuatorPort, RemotePort, SensorPort, SensorSnapshot};
use crate::error::{ActuatorError, RemoteError, SensorError};

// ---------------------------------------------------------------------------
// Simulated hardware
// ---------------------------------------------------------------------------

/// Deterministic drifting enclosure model.
///
/// Temperature oscillates slowly through both thresholds, the feed
/// hopper drains, and the drinker refills while the pump runs.
pub struct SimHardware {
    tick: u64,
    temperature_c: f32,
    food_level_pct: f32,
    water_main_pct: f32,
    water_drinker_pct: f32,

    fan: bool,
    heat: bool,
    pump: bool,
    feeder: bool,
}

impl SimHardware {
    pub fn new() -> Self {
        Self {
            tick: 0,
            temperature_c: 28.0,
            food_level_pct: 90.0,
            water_main_pct: 95.0,
            water_drinker_pct: 60.0,
            fan: false,
            heat: false,
            pump: false,
            feeder: false,
        }
    }

    fn step(&mut self) {
        self.tick += 1;

        // Slow thermal drift, pushed back by the active output.
        let drift = (self.tick as f32 / 120.0).sin() * 0.08;
        self.temperature_c += drift;
        if self.fan {
            self.temperature_c -= 0.05;
        }
        if self.heat {
            self.temperature_c += 0.05;
        }

        if self.feeder {
            self.food_level_pct = (self.food_level_pct - 0.5).max(0.0);
        }
        if self.pump {
            self.water_main_pct = (self.water_main_pct - 0.2).max(0.0);
            self.water_drinker_pct = (self.water_drinker_pct + 1.0).min(100.0);
        } else {
            // The flock drinks.
            self.water_drinker_pct = (self.water_drinker_pct - 0.02).max(0.0);
        }
    }
}

impl Default for SimHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for SimHardware {
    fn read_all(&mut self) -> Result<SensorSnapshot, SensorError> {
        self.step();
        Ok(SensorSnapshot {
            temperature_c: self.temperature_c,
            humidity_pct: 55.0,
            food_level_pct: self.food_level_pct as u8,
            water_main_pct: self.water_main_pct as u8,
            water_drinker_pct: self.water_drinker_pct as u8,
            taken_at: 0,
        })
    }
}

impl ActuatorPort for SimHardware {
    fn set_fan(&mut self, on: bool) -> Result<(), ActuatorError> {
        if self.fan != on {
            debug!("sim: fan -> {on}");
        }
        self.fan = on;
        Ok(())
    }

    fn set_heat(&mut self, on: bool) -> Result<(), ActuatorError> {
        if self.heat != on {
            debug!("sim: heat lamp -> {on}");
        }
        self.heat = on;
        Ok(())
    }

    fn set_pump(&mut self, on: bool) -> Result<(), ActuatorError> {
        if self.pump != on {
            debug!("sim: pump -> {on}");
        }
        self.pump = on;
        Ok(())
    }

    fn set_feeder(&mut self, open: bool) -> Result<(), ActuatorError> {
        if self.feeder != open {
            debug!("sim: feed gate -> {open}");
        }
        self.feeder = open;
        Ok(())
    }

    fn all_off(&mut self) {
        self.fan = false;
        self.heat = false;
        self.pump = false;
        self.feeder = false;
        info!("sim: all outputs off");
    }
}

// ---------------------------------------------------------------------------
// In-memory remote store
// ---------------------------------------------------------------------------

/// Path-keyed in-memory stand-in for the remote control plane.
pub struct MemoryRemote {
    store: HashMap<String, Value>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
        }
    }

    /// Pre-load a value, e.g. to script a command flag in a demo run.
    pub fn put(&mut self, path: &str, value: Value) {
        self.store.insert(path.to_string(), value);
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        self.store.get(path)
    }
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl RemotePort for MemoryRemote {
    fn get_bool(&mut self, path: &str) -> Result<Option<bool>, RemoteError> {
        Ok(self.store.get(path).and_then(Value::as_bool))
    }

    fn get_u32(&mut self, path: &str) -> Result<Option<u32>, RemoteError> {
        Ok(self.store.get(path).and_then(Value::as_u64).map(|n| n as u32))
    }

    fn get_f32(&mut self, path: &str) -> Result<Option<f32>, RemoteError> {
        Ok(self.store.get(path).and_then(Value::as_f64).map(|n| n as f32))
    }

    fn get_json(&mut self, path: &str) -> Result<Option<Value>, RemoteError> {
        Ok(self.store.get(path).cloned())
    }

    fn set_bool(&mut self, path: &str, value: bool) -> Result<(), RemoteError> {
        self.put(path, Value::Bool(value));
        Ok(())
    }

    fn set_u32(&mut self, path: &str, value: u32) -> Result<(), RemoteError> {
        self.put(path, json!(value));
        Ok(())
    }

    fn set_f32(&mut self, path: &str, value: f32) -> Result<(), RemoteError> {
        self.put(path, json!(value));
        Ok(())
    }

    fn push_event(
        &mut self,
        kind: &str,
        description: &str,
        timestamp: i64,
    ) -> Result<(), RemoteError> {
        self.put(
            &format!("events/{timestamp}/{kind}"),
            json!({"kind": kind, "description": description, "timestamp": timestamp}),
        );
        Ok(())
    }

    fn push_record(&mut self, path: &str, record: &Value) -> Result<(), RemoteError> {
        self.put(path, record.clone());
        Ok(())
    }
}
