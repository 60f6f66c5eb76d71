//! System configuration parameters
//!
//! All tunable parameters for the coop controller.  Thresholds and rates
//! come from the deployed enclosure's field calibration; the feeding
//! profile and water settings are runtime-mutable via the remote
//! settings pull.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Feeding profile
// ---------------------------------------------------------------------------

/// Flock age group.  Determines the daily ration per bird.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroup {
    Chick,
    Grower,
    Adult,
}

impl AgeGroup {
    /// Daily ration in grams per bird.
    pub const fn grams_per_bird_per_day(self) -> u32 {
        match self {
            Self::Chick => 50,
            Self::Grower => 100,
            Self::Adult => 150,
        }
    }

    /// Lenient parse of a remote settings string.  Unknown strings are
    /// rejected rather than defaulted, so a typo in the control plane
    /// cannot silently change the ration.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chick" => Some(Self::Chick),
            "grower" => Some(Self::Grower),
            "adult" => Some(Self::Adult),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Chick => "chick",
            Self::Grower => "grower",
            Self::Adult => "adult",
        }
    }
}

/// Who is being fed.  Mutated only by the remote settings pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedingProfile {
    pub age_group: AgeGroup,
    pub chicken_count: u32,
}

impl Default for FeedingProfile {
    fn default() -> Self {
        Self {
            age_group: AgeGroup::Adult,
            chicken_count: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// Water settings
// ---------------------------------------------------------------------------

/// Drinker refill settings.  Mutated only by the remote settings pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterSettings {
    /// Pump delivery rate (ml per second of run time).
    pub flow_rate_ml_per_sec: u32,
    /// Default fill duration for scheduled and unparameterised fills.
    pub fill_duration_secs: u32,
    /// Whether scheduled water fills are enabled at all.
    pub auto_enabled: bool,
}

impl Default for WaterSettings {
    fn default() -> Self {
        Self {
            flow_rate_ml_per_sec: 100,
            fill_duration_secs: 30,
            auto_enabled: true,
        }
    }
}

// ---------------------------------------------------------------------------
// SystemConfig
// ---------------------------------------------------------------------------

/// Core system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Environment thresholds ---
    /// Fan turns on above this temperature (°C).
    pub temp_high_c: f32,
    /// Heat lamp turns on below this temperature (°C).
    pub temp_low_c: f32,
    /// Low-food alert threshold (%).
    pub food_low_pct: u8,
    /// Low main-tank alert threshold (%); the pump refuses to refill the
    /// drinker below this.
    pub water_main_low_pct: u8,
    /// Low drinker alert / refill threshold (%).
    pub water_drinker_low_pct: u8,
    /// Daily water-per-bird floor (ml) below which hydration is alerted.
    pub hydration_alert_ml_per_bird: u32,

    // --- Feeder ---
    /// Calibrated feed rate through the open gate (grams per second).
    pub feed_grams_per_sec: u32,
    /// Mandatory idle period after a feed dispense (seconds).
    pub feed_cooldown_secs: u32,
    /// Watchdog ceiling for a single feed dispense (seconds).
    pub feed_max_run_secs: u32,

    // --- Water dispensing ---
    /// Mandatory idle period after a water fill (seconds).
    pub water_cooldown_secs: u32,
    /// Watchdog ceiling for a single water fill (seconds).
    pub water_max_run_secs: u32,

    // --- Runtime-mutable settings (remote pull) ---
    pub feeding: FeedingProfile,
    pub water: WaterSettings,

    // --- Timing ---
    /// Control loop interval (milliseconds).
    pub tick_interval_ms: u32,
    /// History record interval (seconds).
    pub history_interval_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Environment
            temp_high_c: 32.0,
            temp_low_c: 24.0,
            food_low_pct: 20,
            water_main_low_pct: 10,
            water_drinker_low_pct: 5,
            hydration_alert_ml_per_bird: 120,

            // Feeder
            feed_grams_per_sec: 50,
            feed_cooldown_secs: 30,
            feed_max_run_secs: 30,

            // Water dispensing
            water_cooldown_secs: 30,
            water_max_run_secs: 60,

            // Runtime-mutable settings
            feeding: FeedingProfile::default(),
            water: WaterSettings::default(),

            // Timing
            tick_interval_ms: 1000, // 1 Hz
            history_interval_secs: 300,
        }
    }
}

impl SystemConfig {
    /// Range-check the configuration.  Rejected rather than clamped, so a
    /// bad remote update cannot disable the safety ceilings.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::Error;
        if self.temp_high_c <= self.temp_low_c {
            return Err(Error::Config("temp_high_c must exceed temp_low_c"));
        }
        if self.feed_grams_per_sec == 0 {
            return Err(Error::Config("feed_grams_per_sec must be non-zero"));
        }
        if self.water.flow_rate_ml_per_sec == 0 {
            return Err(Error::Config("flow_rate_ml_per_sec must be non-zero"));
        }
        if self.feed_max_run_secs == 0 || self.water_max_run_secs == 0 {
            return Err(Error::Config("watchdog ceilings must be non-zero"));
        }
        if self.water.fill_duration_secs > self.water_max_run_secs {
            return Err(Error::Config(
                "fill_duration_secs must not exceed water_max_run_secs",
            ));
        }
        if self.food_low_pct > 100 || self.water_main_low_pct > 100 || self.water_drinker_low_pct > 100
        {
            return Err(Error::Config("percentage thresholds must be 0-100"));
        }
        if self.tick_interval_ms == 0 {
            return Err(Error::Config("tick_interval_ms must be non-zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = SystemConfig::default();
        assert!(c.validate().is_ok());
        assert!(c.temp_high_c > c.temp_low_c);
        // The feed ceiling must cover a full default-flock ration.
        let ration = c.feeding.age_group.grams_per_bird_per_day() * c.feeding.chicken_count;
        assert!(c.feed_max_run_secs * c.feed_grams_per_sec >= ration);
        assert!(c.water_max_run_secs >= c.water.fill_duration_secs);
        assert!(c.feed_grams_per_sec > 0);
        assert!(c.water.flow_rate_ml_per_sec > 0);
    }

    #[test]
    fn watchdog_ceiling_covers_default_fill() {
        let c = SystemConfig::default();
        assert!(
            c.water_max_run_secs >= 2 * c.water.fill_duration_secs,
            "water watchdog should be a generous multiple of the default fill"
        );
    }

    #[test]
    fn invalid_thresholds_rejected() {
        let c = SystemConfig {
            temp_high_c: 20.0,
            temp_low_c: 24.0,
            ..Default::default()
        };
        assert!(c.validate().is_err());

        let c = SystemConfig {
            feed_grams_per_sec: 0,
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn age_group_rations_increase_with_age() {
        assert!(
            AgeGroup::Chick.grams_per_bird_per_day() < AgeGroup::Grower.grams_per_bird_per_day()
        );
        assert!(
            AgeGroup::Grower.grams_per_bird_per_day() < AgeGroup::Adult.grams_per_bird_per_day()
        );
    }

    #[test]
    fn age_group_parse_is_lenient_on_case_strict_on_content() {
        assert_eq!(AgeGroup::parse("  Adult "), Some(AgeGroup::Adult));
        assert_eq!(AgeGroup::parse("CHICK"), Some(AgeGroup::Chick));
        assert_eq!(AgeGroup::parse("adolescent"), None);
        assert_eq!(AgeGroup::parse(""), None);
    }

    #[test]
    fn serde_roundtrip() {
        let c = SystemConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: SystemConfig = serde_json::from_str(&json).unwrap();
        assert!((c.temp_high_c - c2.temp_high_c).abs() < 0.001);
        assert_eq!(c.feeding, c2.feeding);
        assert_eq!(c.water, c2.water);
    }

    #[test]
    fn age_group_serialises_lowercase() {
        let json = serde_json::to_string(&AgeGroup::Grower).unwrap();
        assert_eq!(json, "\"grower\"");
    }
}
