//! The application service: owns every domain component and runs the
//! per-tick orchestration.
//!
//! A tick is two phases so the caller can interleave remote traffic at
//! the right points:
//!
//! 1. [`AppService::observe`]: read sensors, update alert edges.
//! 2. [`AppService::control`]: advance the dispense machines, poll the
//!    schedules, derive environment targets and drive the outputs.
//!
//! Everything here is synchronous and bounded; the service never blocks
//! on hardware or the network.

use heapless::Vec as HVec;
use log::warn;

use crate::alerts::{AlertKind, AlertTracker, AlertTransition};
use crate::app::commands::{AppCommand, CommandAck};
use crate::app::events::{AppEvent, ChangeCause};
use crate::app::ports::{ActuatorPort, EventSink, Output, SensorPort, SensorSnapshot, WallTime};
use crate::config::SystemConfig;
use crate::consumption::WaterConsumptionTracker;
use crate::dispense::{
    self, DispenseCompletion, DispenseCoordinator, DispenseResource, DispenseStatus, RequestAck,
    TriggerSource,
};
use crate::environment::{EnvTargets, EnvironmentController};
use crate::schedule::{ScheduleEngine, ScheduleTable};

// ---------------------------------------------------------------------------
// Driver views over the actuator port
// ---------------------------------------------------------------------------

// Each coordinator sees only the one output it owns.

struct FeederDrv<'a, A: ActuatorPort>(&'a mut A);

impl<A: ActuatorPort> dispense::DispenseDriver for FeederDrv<'_, A> {
    fn set_on(&mut self, on: bool) -> Result<(), crate::error::ActuatorError> {
        self.0.set_feeder(on)
    }
}

struct PumpDrv<'a, A: ActuatorPort>(&'a mut A);

impl<A: ActuatorPort> dispense::DispenseDriver for PumpDrv<'_, A> {
    fn set_on(&mut self, on: bool) -> Result<(), crate::error::ActuatorError> {
        self.0.set_pump(on)
    }
}

// ---------------------------------------------------------------------------
// Output snapshot
// ---------------------------------------------------------------------------

/// Current commanded level of every physical output, for state publishing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputStates {
    pub fan: bool,
    pub heat: bool,
    pub pump: bool,
    pub feeder: bool,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

pub struct AppService {
    config: SystemConfig,

    alerts: AlertTracker,
    env: EnvironmentController,
    feed: DispenseCoordinator,
    water: DispenseCoordinator,
    feed_schedule: ScheduleEngine,
    water_schedule: ScheduleEngine,
    feed_table: ScheduleTable,
    water_table: ScheduleTable,
    consumption: WaterConsumptionTracker,

    automation_enabled: bool,
    /// Operator-set levels, honoured only while automation is off.
    manual: EnvTargets,

    last_snapshot: SensorSnapshot,
    tick_count: u64,
}

impl AppService {
    pub fn new(config: SystemConfig) -> crate::error::Result<Self> {
        config.validate()?;
        let feed = DispenseCoordinator::new(
            DispenseResource::Feed,
            config.feed_cooldown_secs,
            config.feed_max_run_secs,
        );
        let water = DispenseCoordinator::new(
            DispenseResource::Water,
            config.water_cooldown_secs,
            config.water_max_run_secs,
        );
        Ok(Self {
            config,
            alerts: AlertTracker::new(),
            env: EnvironmentController::new(),
            feed,
            water,
            feed_schedule: ScheduleEngine::new(),
            water_schedule: ScheduleEngine::new(),
            feed_table: ScheduleTable::empty(),
            water_table: ScheduleTable::empty(),
            consumption: WaterConsumptionTracker::new(),
            automation_enabled: true,
            manual: EnvTargets::default(),
            last_snapshot: SensorSnapshot::default(),
            tick_count: 0,
        })
    }

    /// One-time startup: seed the schedule latches with the boot hour so
    /// a mid-hour restart cannot re-fire an already-handled slot.
    pub fn start(&mut self, wall: Option<WallTime>, sink: &mut impl EventSink) {
        if let Some(w) = wall {
            self.feed_schedule.seed_boot_hour(w.hour);
            self.water_schedule.seed_boot_hour(w.hour);
            self.consumption.roll_if_new_day(w.day);
        }
        sink.emit(&AppEvent::Started);
    }

    // ── Phase 1: observation ──────────────────────────────────

    /// Read the sensors and update alert state.  A failed read degrades
    /// to a sentinel snapshot; the tick always proceeds.
    pub fn observe(&mut self, hw: &mut impl SensorPort, unix_ts: i64, sink: &mut impl EventSink) {
        self.last_snapshot = match hw.read_all() {
            Ok(snap) => snap,
            Err(e) => {
                warn!("sensor read failed ({e}), using sentinel");
                SensorSnapshot::sentinel(unix_ts)
            }
        };

        let edges = self.alerts.evaluate(&self.last_snapshot, &self.config);
        for edge in &edges {
            Self::emit_alert(sink, edge);
        }
    }

    // ── Phase 2: control ──────────────────────────────────────

    /// Advance every actuation machine by one tick and drive the outputs.
    /// Returns the dispenses that completed this tick so the sync layer
    /// can record them remotely.
    pub fn control(
        &mut self,
        now_ms: u64,
        wall: Option<WallTime>,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> HVec<DispenseCompletion, 2> {
        let mut completions: HVec<DispenseCompletion, 2> = HVec::new();

        // Daily rollover first so completions land in the right day.
        if let Some(w) = wall {
            if self.consumption.roll_if_new_day(w.day) {
                self.refresh_hydration(sink);
            }
        }

        // Dispense machines.
        if let Some(done) = self.feed.poll(now_ms, &mut FeederDrv(hw)) {
            Self::emit_completion(sink, &done);
            let _ = completions.push(done);
        }
        if let Some(done) = self.water.poll(now_ms, &mut PumpDrv(hw)) {
            Self::emit_completion(sink, &done);
            if !done.forced {
                if let Some(w) = wall {
                    self.consumption.record(done.amount, w.day);
                    self.refresh_hydration(sink);
                }
            }
            let _ = completions.push(done);
        }

        // Schedules.
        if let Some(w) = wall {
            if let Some(hour) = self.feed_schedule.poll(w, &self.feed_table) {
                sink.emit(&AppEvent::ScheduleTriggered {
                    resource: DispenseResource::Feed,
                    hour,
                });
                self.start_dispense(DispenseResource::Feed, None, TriggerSource::Scheduled, now_ms, hw, sink);
            }
            if self.config.water.auto_enabled {
                if let Some(hour) = self.water_schedule.poll(w, &self.water_table) {
                    sink.emit(&AppEvent::ScheduleTriggered {
                        resource: DispenseResource::Water,
                        hour,
                    });
                    self.start_dispense(DispenseResource::Water, None, TriggerSource::Scheduled, now_ms, hw, sink);
                }
            }
        }

        // Environment targets (automation only) and output drive.
        if self.automation_enabled {
            let water_busy = self.water.status() != DispenseStatus::Idle;
            let (_, changes) = self.env.apply(&self.last_snapshot, &self.config, water_busy);
            for c in &changes {
                sink.emit(&AppEvent::ActuatorChanged {
                    output: c.output,
                    on: c.on,
                    cause: ChangeCause::Automatic,
                });
            }
        }
        self.apply_actuators(hw);

        self.tick_count += 1;
        completions
    }

    /// Convenience wrapper for callers with a combined hardware handle.
    pub fn tick<H: SensorPort + ActuatorPort>(
        &mut self,
        now_ms: u64,
        unix_ts: i64,
        wall: Option<WallTime>,
        hw: &mut H,
        sink: &mut impl EventSink,
    ) -> HVec<DispenseCompletion, 2> {
        self.observe(hw, unix_ts, sink);
        self.control(now_ms, wall, hw, sink)
    }

    // ── Commands ──────────────────────────────────────────────

    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        now_ms: u64,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> CommandAck {
        match cmd {
            AppCommand::Dispense {
                resource,
                duration_secs,
            } => self.start_dispense(resource, duration_secs, TriggerSource::Manual, now_ms, hw, sink),

            AppCommand::SetAutomation(enabled) => {
                if enabled != self.automation_enabled {
                    self.automation_enabled = enabled;
                    if !enabled {
                        // Manual mode starts from the current levels so
                        // the flip itself changes nothing physically.
                        self.manual = self.env.applied();
                    }
                    sink.emit(&AppEvent::ModeChanged { automation: enabled });
                }
                CommandAck::Accepted
            }

            AppCommand::SetManualOutput { output, on } => {
                if self.automation_enabled {
                    warn!("manual {} command ignored while automation is on", output.label());
                    return CommandAck::Rejected;
                }
                let slot = match output {
                    Output::Fan => &mut self.manual.fan,
                    Output::Heat => &mut self.manual.heat,
                    Output::Pump => &mut self.manual.pump,
                    // The feed gate is only ever driven by its
                    // coordinator; direct control would bypass the
                    // watchdog.
                    Output::Feeder => return CommandAck::Rejected,
                };
                if *slot != on {
                    *slot = on;
                    sink.emit(&AppEvent::ActuatorChanged {
                        output,
                        on,
                        cause: ChangeCause::Manual,
                    });
                }
                self.apply_actuators(hw);
                CommandAck::Accepted
            }

            AppCommand::UpdateFeedingProfile(profile) => {
                if profile.chicken_count == 0 {
                    warn!("feeding profile with zero birds rejected");
                    return CommandAck::Rejected;
                }
                self.config.feeding = profile;
                CommandAck::Accepted
            }

            AppCommand::UpdateWaterSettings(mut settings) => {
                if settings.flow_rate_ml_per_sec == 0 || settings.fill_duration_secs == 0 {
                    warn!("water settings with zero rate/duration rejected");
                    return CommandAck::Rejected;
                }
                if settings.fill_duration_secs > self.config.water_max_run_secs {
                    warn!(
                        "fill duration {}s clamped to watchdog ceiling {}s",
                        settings.fill_duration_secs, self.config.water_max_run_secs
                    );
                    settings.fill_duration_secs = self.config.water_max_run_secs;
                }
                self.config.water = settings;
                CommandAck::Accepted
            }

            AppCommand::UpdateSchedule { resource, table } => {
                match resource {
                    DispenseResource::Feed => self.feed_table = table,
                    DispenseResource::Water => self.water_table = table,
                }
                CommandAck::Accepted
            }
        }
    }

    // ── Internals ─────────────────────────────────────────────

    fn start_dispense(
        &mut self,
        resource: DispenseResource,
        duration_secs: Option<f32>,
        source: TriggerSource,
        now_ms: u64,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> CommandAck {
        let (duration, rate) = match resource {
            DispenseResource::Feed => {
                let rate = self.config.feed_grams_per_sec;
                let duration = duration_secs.unwrap_or_else(|| {
                    dispense::feed_duration_for_grams(
                        dispense::recommended_feed_grams(&self.config.feeding),
                        rate,
                    )
                });
                (duration, rate)
            }
            DispenseResource::Water => {
                let rate = self.config.water.flow_rate_ml_per_sec;
                let duration =
                    duration_secs.unwrap_or(self.config.water.fill_duration_secs as f32);
                (duration, rate)
            }
        };

        let ack = match resource {
            DispenseResource::Feed => {
                self.feed.request(now_ms, duration, source, rate, &mut FeederDrv(hw))
            }
            DispenseResource::Water => {
                self.water.request(now_ms, duration, source, rate, &mut PumpDrv(hw))
            }
        };

        match ack {
            RequestAck::Accepted {
                amount,
                duration_secs,
            } => {
                sink.emit(&AppEvent::DispenseStarted {
                    resource,
                    source,
                    amount,
                    duration_secs,
                });
                CommandAck::Accepted
            }
            RequestAck::Busy => CommandAck::Rejected,
        }
    }

    /// Drive every output to its required level for this tick.
    ///
    /// Ownership rules: the feed gate belongs to its coordinator and is
    /// closed whenever no dispense runs.  The pump belongs to the water
    /// coordinator while a fill runs (the coordinator drives it during
    /// its own poll); only when that machine is idle do the environment
    /// or manual targets reach it.  Fan and heat always follow the
    /// environment (automation) or manual targets.
    fn apply_actuators(&mut self, hw: &mut impl ActuatorPort) {
        let targets = if self.automation_enabled {
            self.env.applied()
        } else {
            self.manual
        };

        if let Err(e) = hw.set_fan(targets.fan) {
            warn!("fan command failed ({e})");
        }
        if let Err(e) = hw.set_heat(targets.heat) {
            warn!("heat lamp command failed ({e})");
        }
        if self.water.status() == DispenseStatus::Idle {
            if let Err(e) = hw.set_pump(targets.pump) {
                warn!("pump command failed ({e})");
            }
        }
        if self.feed.status() == DispenseStatus::Idle {
            if let Err(e) = hw.set_feeder(false) {
                warn!("feed gate close failed ({e})");
            }
        }
    }

    fn refresh_hydration(&mut self, sink: &mut impl EventSink) {
        let count = self.config.feeding.chicken_count;
        if count == 0 {
            return;
        }
        let per_bird = self.consumption.per_bird(count);
        if let Some(edge) = self
            .alerts
            .update_hydration(per_bird, self.config.hydration_alert_ml_per_bird)
        {
            Self::emit_alert(sink, &edge);
        }
    }

    fn emit_alert(sink: &mut impl EventSink, edge: &AlertTransition) {
        let event = if edge.now_active {
            AppEvent::AlertRaised {
                kind: edge.kind,
                description: edge.description.clone(),
            }
        } else {
            AppEvent::AlertResolved {
                kind: edge.kind,
                description: edge.description.clone(),
            }
        };
        sink.emit(&event);
    }

    fn emit_completion(sink: &mut impl EventSink, done: &DispenseCompletion) {
        if done.forced {
            sink.emit(&AppEvent::DispenseForcedStop {
                resource: done.resource,
                elapsed_secs: done.elapsed_secs,
            });
        } else {
            sink.emit(&AppEvent::DispenseCompleted {
                resource: done.resource,
                amount: done.amount,
                duration_secs: done.elapsed_secs,
            });
        }
    }

    // ── Queries (state publishing) ────────────────────────────

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn automation_enabled(&self) -> bool {
        self.automation_enabled
    }

    pub fn last_snapshot(&self) -> &SensorSnapshot {
        &self.last_snapshot
    }

    pub fn feed_status(&self) -> DispenseStatus {
        self.feed.status()
    }

    pub fn water_status(&self) -> DispenseStatus {
        self.water.status()
    }

    pub fn alert_active(&self, kind: AlertKind) -> bool {
        self.alerts.is_active(kind)
    }

    pub fn water_total_today_ml(&self) -> u32 {
        self.consumption.total_today()
    }

    pub fn water_per_bird_ml(&self) -> u32 {
        self.consumption.per_bird(self.config.feeding.chicken_count)
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Commanded level of every output, derived from the owning machine.
    pub fn output_states(&self) -> OutputStates {
        let targets = if self.automation_enabled {
            self.env.applied()
        } else {
            self.manual
        };
        OutputStates {
            fan: targets.fan,
            heat: targets.heat,
            pump: self.water.output_on()
                || (self.water.status() == DispenseStatus::Idle && targets.pump),
            feeder: self.feed.output_on(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ActuatorError, SensorError};

    /// Combined sensor + actuator mock.
    struct MockHw {
        snap: SensorSnapshot,
        fail_read: bool,
        fan: bool,
        heat: bool,
        pump: bool,
        feeder: bool,
    }

    impl MockHw {
        fn new() -> Self {
            Self {
                snap: SensorSnapshot {
                    temperature_c: 28.0,
                    humidity_pct: 50.0,
                    food_level_pct: 80,
                    water_main_pct: 80,
                    water_drinker_pct: 80,
                    taken_at: 0,
                },
                fail_read: false,
                fan: false,
                heat: false,
                pump: false,
                feeder: false,
            }
        }
    }

    impl SensorPort for MockHw {
        fn read_all(&mut self) -> Result<SensorSnapshot, SensorError> {
            if self.fail_read {
                Err(SensorError::ReadFailed)
            } else {
                Ok(self.snap)
            }
        }
    }

    impl ActuatorPort for MockHw {
        fn set_fan(&mut self, on: bool) -> Result<(), ActuatorError> {
            self.fan = on;
            Ok(())
        }
        fn set_heat(&mut self, on: bool) -> Result<(), ActuatorError> {
            self.heat = on;
            Ok(())
        }
        fn set_pump(&mut self, on: bool) -> Result<(), ActuatorError> {
            self.pump = on;
            Ok(())
        }
        fn set_feeder(&mut self, open: bool) -> Result<(), ActuatorError> {
            self.feeder = open;
            Ok(())
        }
        fn all_off(&mut self) {
            self.fan = false;
            self.heat = false;
            self.pump = false;
            self.feeder = false;
        }
    }

    struct VecSink(Vec<AppEvent>);

    impl EventSink for VecSink {
        fn emit(&mut self, event: &AppEvent) {
            self.0.push(event.clone());
        }
    }

    fn service() -> AppService {
        AppService::new(SystemConfig::default()).unwrap()
    }

    fn wall(hour: u8, minute: u8, day: i32) -> Option<WallTime> {
        Some(WallTime { hour, minute, day })
    }

    #[test]
    fn manual_feed_runs_and_closes_gate() {
        let mut svc = service();
        let mut hw = MockHw::new();
        let mut sink = VecSink(Vec::new());

        let ack = svc.handle_command(
            AppCommand::Dispense {
                resource: DispenseResource::Feed,
                duration_secs: Some(2.0),
            },
            0,
            &mut hw,
            &mut sink,
        );
        assert_eq!(ack, CommandAck::Accepted);
        assert!(hw.feeder, "gate open immediately");
        assert!(matches!(sink.0.last(), Some(AppEvent::DispenseStarted { .. })));

        svc.tick(1_000, 1, wall(10, 30, 1), &mut hw, &mut sink);
        assert!(hw.feeder);
        svc.tick(2_000, 2, wall(10, 30, 1), &mut hw, &mut sink);
        assert!(!hw.feeder, "gate closed at planned duration");
        assert_eq!(svc.feed_status(), DispenseStatus::Cooldown);
    }

    #[test]
    fn duplicate_dispense_rejected_while_busy() {
        let mut svc = service();
        let mut hw = MockHw::new();
        let mut sink = VecSink(Vec::new());
        let cmd = AppCommand::Dispense {
            resource: DispenseResource::Feed,
            duration_secs: Some(5.0),
        };
        assert_eq!(
            svc.handle_command(cmd.clone(), 0, &mut hw, &mut sink),
            CommandAck::Accepted
        );
        assert_eq!(
            svc.handle_command(cmd, 1_000, &mut hw, &mut sink),
            CommandAck::Rejected
        );
    }

    #[test]
    fn fill_owns_pump_then_hands_back_to_environment() {
        let mut svc = service();
        let mut hw = MockHw::new();
        let mut sink = VecSink(Vec::new());

        // Drinker low: environment wants the pump on.
        hw.snap.water_drinker_pct = 2;
        svc.tick(0, 0, wall(10, 30, 1), &mut hw, &mut sink);
        assert!(hw.pump, "top-up engaged");

        // A manual fill takes over.
        svc.handle_command(
            AppCommand::Dispense {
                resource: DispenseResource::Water,
                duration_secs: Some(5.0),
            },
            1_000,
            &mut hw,
            &mut sink,
        );
        svc.tick(2_000, 2, wall(10, 30, 1), &mut hw, &mut sink);
        assert!(hw.pump, "pump on during fill");

        // Fill completes at 6s; the drinker is now full, so the pump
        // goes off and stays off through cooldown.
        hw.snap.water_drinker_pct = 90;
        svc.tick(6_000, 6, wall(10, 30, 1), &mut hw, &mut sink);
        assert!(!hw.pump);
        assert_eq!(svc.water_status(), DispenseStatus::Cooldown);
        svc.tick(7_000, 7, wall(10, 30, 1), &mut hw, &mut sink);
        assert!(!hw.pump);
    }

    #[test]
    fn water_completion_feeds_consumption_tracking() {
        let mut svc = service();
        let mut hw = MockHw::new();
        let mut sink = VecSink(Vec::new());

        svc.handle_command(
            AppCommand::Dispense {
                resource: DispenseResource::Water,
                duration_secs: Some(30.0),
            },
            0,
            &mut hw,
            &mut sink,
        );
        svc.tick(30_000, 30, wall(10, 30, 1), &mut hw, &mut sink);
        // 30s at 100 ml/s.
        assert_eq!(svc.water_total_today_ml(), 3_000);
        assert_eq!(svc.water_per_bird_ml(), 300);
    }

    #[test]
    fn scheduled_feed_fires_at_minute_zero() {
        let mut svc = service();
        let mut hw = MockHw::new();
        let mut sink = VecSink(Vec::new());
        svc.start(wall(5, 30, 1), &mut sink);
        svc.handle_command(
            AppCommand::UpdateSchedule {
                resource: DispenseResource::Feed,
                table: {
                    let mut t = ScheduleTable::empty();
                    t.set_hour(6, true);
                    t
                },
            },
            0,
            &mut hw,
            &mut sink,
        );

        svc.tick(0, 0, wall(5, 59, 1), &mut hw, &mut sink);
        assert!(!hw.feeder);

        svc.tick(1_000, 1, wall(6, 0, 1), &mut hw, &mut sink);
        assert!(hw.feeder, "scheduled feed opened the gate");
        assert!(sink
            .0
            .iter()
            .any(|e| matches!(e, AppEvent::ScheduleTriggered { resource: DispenseResource::Feed, hour: 6 })));

        // Default flock: 10 adults at 150 g = 1500 g at 50 g/s = 30 s.
        svc.tick(16_000, 16, wall(6, 0, 1), &mut hw, &mut sink);
        assert!(hw.feeder, "still dispensing the full ration");
        svc.tick(31_000, 31, wall(6, 0, 1), &mut hw, &mut sink);
        assert!(!hw.feeder);
    }

    #[test]
    fn boot_hour_is_not_refired() {
        let mut svc = service();
        let mut hw = MockHw::new();
        let mut sink = VecSink(Vec::new());
        svc.start(wall(6, 40, 1), &mut sink);
        svc.handle_command(
            AppCommand::UpdateSchedule {
                resource: DispenseResource::Feed,
                table: {
                    let mut t = ScheduleTable::empty();
                    t.set_hour(6, true);
                    t
                },
            },
            0,
            &mut hw,
            &mut sink,
        );
        svc.tick(0, 0, wall(6, 0, 1), &mut hw, &mut sink);
        assert!(!hw.feeder, "boot hour slot already consumed");
    }

    #[test]
    fn water_schedule_respects_auto_enabled() {
        let mut svc = service();
        let mut hw = MockHw::new();
        let mut sink = VecSink(Vec::new());
        svc.handle_command(
            AppCommand::UpdateWaterSettings(crate::config::WaterSettings {
                auto_enabled: false,
                ..Default::default()
            }),
            0,
            &mut hw,
            &mut sink,
        );
        svc.handle_command(
            AppCommand::UpdateSchedule {
                resource: DispenseResource::Water,
                table: {
                    let mut t = ScheduleTable::empty();
                    t.set_hour(8, true);
                    t
                },
            },
            0,
            &mut hw,
            &mut sink,
        );
        svc.tick(0, 0, wall(8, 0, 1), &mut hw, &mut sink);
        assert_eq!(svc.water_status(), DispenseStatus::Idle);
        assert!(!hw.pump);
    }

    #[test]
    fn automation_gates_environment_and_manual_control() {
        let mut svc = service();
        let mut hw = MockHw::new();
        let mut sink = VecSink(Vec::new());

        // Manual fan rejected while automation is on.
        assert_eq!(
            svc.handle_command(
                AppCommand::SetManualOutput {
                    output: Output::Fan,
                    on: true
                },
                0,
                &mut hw,
                &mut sink,
            ),
            CommandAck::Rejected
        );

        svc.handle_command(AppCommand::SetAutomation(false), 0, &mut hw, &mut sink);
        assert!(!svc.automation_enabled());

        // Hot enclosure, but automation is off: fan stays down until the
        // operator says so.
        hw.snap.temperature_c = 40.0;
        svc.tick(1_000, 1, wall(10, 30, 1), &mut hw, &mut sink);
        assert!(!hw.fan);

        assert_eq!(
            svc.handle_command(
                AppCommand::SetManualOutput {
                    output: Output::Fan,
                    on: true
                },
                2_000,
                &mut hw,
                &mut sink,
            ),
            CommandAck::Accepted
        );
        assert!(hw.fan);
    }

    #[test]
    fn sensor_failure_degrades_to_sentinel() {
        let mut svc = service();
        let mut hw = MockHw::new();
        let mut sink = VecSink(Vec::new());
        hw.fail_read = true;
        svc.tick(0, 42, wall(10, 30, 1), &mut hw, &mut sink);
        assert_eq!(svc.last_snapshot().taken_at, 42);
        assert_eq!(svc.last_snapshot().temperature_c, 0.0);
        // Sentinel zeroes trip the cold and low-level alerts; the tick
        // itself survives.
        assert!(svc.alert_active(AlertKind::LowTemperature));
    }

    #[test]
    fn manual_feeder_control_is_refused() {
        let mut svc = service();
        let mut hw = MockHw::new();
        let mut sink = VecSink(Vec::new());
        svc.handle_command(AppCommand::SetAutomation(false), 0, &mut hw, &mut sink);
        assert_eq!(
            svc.handle_command(
                AppCommand::SetManualOutput {
                    output: Output::Feeder,
                    on: true
                },
                0,
                &mut hw,
                &mut sink,
            ),
            CommandAck::Rejected
        );
    }

    #[test]
    fn output_states_reflect_owning_machines() {
        let mut svc = service();
        let mut hw = MockHw::new();
        let mut sink = VecSink(Vec::new());
        svc.handle_command(
            AppCommand::Dispense {
                resource: DispenseResource::Feed,
                duration_secs: Some(5.0),
            },
            0,
            &mut hw,
            &mut sink,
        );
        let states = svc.output_states();
        assert!(states.feeder);
        assert!(!states.pump);
        assert_eq!(states, OutputStates {
            fan: false,
            heat: false,
            pump: false,
            feeder: true,
        });
    }
}
