//! Environment control: fan, heat lamp and drinker top-up pump targets.
//!
//! Stateless threshold logic re-derived from the current snapshot every
//! tick.  There is deliberately no hysteresis band: the actuation targets
//! follow the thresholds directly, and only the state *changes* are
//! reported as events (the applied-state cache below is what keeps the
//! event feed quiet between edges).

use heapless::Vec as HVec;

use crate::app::ports::{Output, SensorSnapshot};
use crate::config::SystemConfig;

/// Desired on/off level for each environment-owned output this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvTargets {
    pub fan: bool,
    pub heat: bool,
    pub pump: bool,
}

/// One output changed level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvChange {
    pub output: Output,
    pub on: bool,
}

/// Threshold controller for temperature and drinker top-up.
pub struct EnvironmentController {
    applied: EnvTargets,
}

impl Default for EnvironmentController {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentController {
    pub fn new() -> Self {
        Self {
            applied: EnvTargets::default(),
        }
    }

    /// Derive this tick's targets and the edges relative to what was last
    /// applied.
    ///
    /// Temperature bands: above `temp_high_c` the fan runs and the lamp
    /// is off, below `temp_low_c` the lamp runs and the fan is off, in
    /// between both are off.  The bands cannot overlap (config
    /// validation enforces high > low) so fan and heat are mutually
    /// exclusive by construction.
    ///
    /// Drinker top-up: pump on while the drinker is below its threshold
    /// and the main tank is above its own, off otherwise.  While a timed
    /// water fill owns the pump (`water_busy`), the top-up rule is
    /// suppressed: the target keeps its previous value and no edge is
    /// reported, so the fill's pump usage never shows up as an
    /// environment event.
    pub fn apply(
        &mut self,
        snap: &SensorSnapshot,
        cfg: &SystemConfig,
        water_busy: bool,
    ) -> (EnvTargets, HVec<EnvChange, 3>) {
        let mut target = EnvTargets {
            fan: snap.temperature_c > cfg.temp_high_c,
            heat: snap.temperature_c < cfg.temp_low_c,
            pump: snap.water_drinker_pct < cfg.water_drinker_low_pct
                && snap.water_main_pct > cfg.water_main_low_pct,
        };
        if water_busy {
            target.pump = self.applied.pump;
        }

        let mut changes = HVec::new();
        if target.fan != self.applied.fan {
            let _ = changes.push(EnvChange {
                output: Output::Fan,
                on: target.fan,
            });
        }
        if target.heat != self.applied.heat {
            let _ = changes.push(EnvChange {
                output: Output::Heat,
                on: target.heat,
            });
        }
        if target.pump != self.applied.pump {
            let _ = changes.push(EnvChange {
                output: Output::Pump,
                on: target.pump,
            });
        }

        self.applied = target;
        (target, changes)
    }

    /// Targets as of the last `apply`.
    pub fn applied(&self) -> EnvTargets {
        self.applied
    }
}
