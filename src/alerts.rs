//! Edge-triggered alert tracking.
//!
//! Each alert condition is re-evaluated every tick against the current
//! snapshot, but an event is emitted only on the transition edge (clear
//! to active, active to clear).  A condition that stays true for an hour
//! produces exactly one raise event, not 3600.
//!
//! Alert state is volatile and rebuilt from live sensor data within one
//! tick of a restart, so nothing is persisted.

use heapless::Vec as HVec;

use crate::app::ports::SensorSnapshot;
use crate::config::SystemConfig;

/// The alert conditions the controller tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    HighTemperature,
    LowTemperature,
    LowFood,
    LowWaterMain,
    LowWaterDrinker,
    LowHydration,
}

impl AlertKind {
    pub const COUNT: usize = 6;

    const fn index(self) -> usize {
        match self {
            Self::HighTemperature => 0,
            Self::LowTemperature => 1,
            Self::LowFood => 2,
            Self::LowWaterMain => 3,
            Self::LowWaterDrinker => 4,
            Self::LowHydration => 5,
        }
    }

    /// Key under `alerts/` in the remote store.
    pub const fn remote_key(self) -> &'static str {
        match self {
            Self::HighTemperature => "highTemperature",
            Self::LowTemperature => "lowTemperature",
            Self::LowFood => "lowFood",
            Self::LowWaterMain => "lowWaterMain",
            Self::LowWaterDrinker => "lowWaterDrinker",
            Self::LowHydration => "lowHydration",
        }
    }

    /// Kind string used in the remote event feed for a raise.
    pub const fn event_kind(self) -> &'static str {
        self.remote_key()
    }
}

/// One alert edge: the condition at `kind` just became active or clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertTransition {
    pub kind: AlertKind,
    pub now_active: bool,
    /// Human-readable description carrying the measured value and the
    /// threshold it crossed.
    pub description: String,
}

/// Tracks which alert conditions are currently active and reports edges.
pub struct AlertTracker {
    active: [bool; AlertKind::COUNT],
}

impl Default for AlertTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertTracker {
    pub fn new() -> Self {
        Self {
            active: [false; AlertKind::COUNT],
        }
    }

    /// Re-evaluate the five sensor-driven conditions against `snap`.
    /// Returns only the edges; steady state produces nothing.
    pub fn evaluate(
        &mut self,
        snap: &SensorSnapshot,
        cfg: &SystemConfig,
    ) -> HVec<AlertTransition, 5> {
        let mut out = HVec::new();

        self.eval(
            &mut out,
            AlertKind::HighTemperature,
            snap.temperature_c > cfg.temp_high_c,
            || {
                format!(
                    "temperature {:.1}C above {:.1}C",
                    snap.temperature_c, cfg.temp_high_c
                )
            },
            || {
                format!(
                    "temperature {:.1}C back below {:.1}C",
                    snap.temperature_c, cfg.temp_high_c
                )
            },
        );
        self.eval(
            &mut out,
            AlertKind::LowTemperature,
            snap.temperature_c < cfg.temp_low_c,
            || {
                format!(
                    "temperature {:.1}C below {:.1}C",
                    snap.temperature_c, cfg.temp_low_c
                )
            },
            || {
                format!(
                    "temperature {:.1}C back above {:.1}C",
                    snap.temperature_c, cfg.temp_low_c
                )
            },
        );
        self.eval(
            &mut out,
            AlertKind::LowFood,
            snap.food_level_pct < cfg.food_low_pct,
            || {
                format!(
                    "food level {}% below {}%",
                    snap.food_level_pct, cfg.food_low_pct
                )
            },
            || {
                format!(
                    "food level {}% back above {}%",
                    snap.food_level_pct, cfg.food_low_pct
                )
            },
        );
        self.eval(
            &mut out,
            AlertKind::LowWaterMain,
            snap.water_main_pct < cfg.water_main_low_pct,
            || {
                format!(
                    "main tank {}% below {}%",
                    snap.water_main_pct, cfg.water_main_low_pct
                )
            },
            || {
                format!(
                    "main tank {}% back above {}%",
                    snap.water_main_pct, cfg.water_main_low_pct
                )
            },
        );
        self.eval(
            &mut out,
            AlertKind::LowWaterDrinker,
            snap.water_drinker_pct < cfg.water_drinker_low_pct,
            || {
                format!(
                    "drinker {}% below {}%",
                    snap.water_drinker_pct, cfg.water_drinker_low_pct
                )
            },
            || {
                format!(
                    "drinker {}% back above {}%",
                    snap.water_drinker_pct, cfg.water_drinker_low_pct
                )
            },
        );

        out
    }

    /// Hydration is driven by the consumption tracker, not the snapshot,
    /// so it has its own entry point.  The caller skips this entirely
    /// when the flock count is zero.
    pub fn update_hydration(
        &mut self,
        per_bird_ml: u32,
        threshold_ml: u32,
    ) -> Option<AlertTransition> {
        let kind = AlertKind::LowHydration;
        let condition = per_bird_ml < threshold_ml;
        let was = self.active[kind.index()];
        if condition == was {
            return None;
        }
        self.active[kind.index()] = condition;
        let description = if condition {
            format!("water intake {per_bird_ml}ml/bird below {threshold_ml}ml")
        } else {
            format!("water intake {per_bird_ml}ml/bird back above {threshold_ml}ml")
        };
        Some(AlertTransition {
            kind,
            now_active: condition,
            description,
        })
    }

    pub fn is_active(&self, kind: AlertKind) -> bool {
        self.active[kind.index()]
    }

    fn eval(
        &mut self,
        out: &mut HVec<AlertTransition, 5>,
        kind: AlertKind,
        condition: bool,
        raise_desc: impl FnOnce() -> String,
        clear_desc: impl FnOnce() -> String,
    ) {
        let was = self.active[kind.index()];
        if condition == was {
            return;
        }
        self.active[kind.index()] = condition;
        let description = if condition { raise_desc() } else { clear_desc() };
        // Capacity equals the number of conditions evaluated per pass.
        let _ = out.push(AlertTransition {
            kind,
            now_active: condition,
            description,
        });
    }
}
