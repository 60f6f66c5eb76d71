//! Timed actuation state machine for a single dispensing resource.
//!
//! One [`DispenseCoordinator`] instance exists per resource (feed gate,
//! drinker pump) and is the single source of truth for whether that
//! output is physically dispensing.  The machine is polled once per tick
//! and never sleeps; a dispense is state carried across ticks, so the
//! sensor/alert/sync loop keeps running at full rate while the gate is
//! open.
//!
//! ```text
//!  IDLE ──request() accepted──▶ DISPENSING
//!    ▲                              │
//!    │             [elapsed ≥ planned]  [elapsed ≥ watchdog ceiling]
//!    │                              ▼       ▼ (forced stop, distinct event)
//!    └──[now ≥ cooldown_until]── COOLDOWN
//! ```
//!
//! Invariant: the physical output is ON iff the status is `Dispensing`.
//! `poll` re-asserts the expected output level on every tick, which both
//! self-heals driver drift and retries a previously failed command.

use log::{info, warn};

use crate::config::FeedingProfile;
use crate::error::ActuatorError;

// ---------------------------------------------------------------------------
// Resource identity and trigger provenance
// ---------------------------------------------------------------------------

/// Which dispensing resource a coordinator owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispenseResource {
    Feed,
    Water,
}

impl DispenseResource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Feed => "feed",
            Self::Water => "water",
        }
    }

    /// Unit of the dispensed amount.
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Feed => "g",
            Self::Water => "ml",
        }
    }
}

/// Where a trigger came from.  Manual and Scheduled triggers are
/// serialised through the same single-flight acceptance path, so the two
/// sources can never double-fire the same resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    Manual,
    Scheduled,
}

impl TriggerSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Scheduled => "scheduled",
        }
    }
}

// ---------------------------------------------------------------------------
// Status, acks and completions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispenseStatus {
    Idle,
    Dispensing,
    Cooldown,
}

/// Outcome of [`DispenseCoordinator::request`].  `Accepted` doubles as the
/// "command consumed" acknowledgement: the caller may clear the remote
/// trigger flag the moment it sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RequestAck {
    Accepted {
        /// Amount expected over the accepted duration (g or ml).
        amount: u32,
        /// Accepted duration, clamped to the watchdog ceiling.
        duration_secs: f32,
    },
    /// Already dispensing, still cooling down, or the duration was
    /// unusable.  The trigger is ignored; nothing changes.
    Busy,
}

/// Returned by [`DispenseCoordinator::poll`] when a dispense ends, for
/// consumption tracking and analytics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispenseCompletion {
    pub resource: DispenseResource,
    pub source: TriggerSource,
    /// Estimated amount actually delivered (g or ml).  For a forced stop
    /// this is the rate times the full run time, since the output was on the
    /// whole time.
    pub amount: u32,
    /// Seconds the output was actually commanded on.
    pub elapsed_secs: f32,
    /// True when the watchdog ceiling killed the run.  Operators must be
    /// able to tell "finished" from "watchdog killed it".
    pub forced: bool,
}

// ---------------------------------------------------------------------------
// Driver seam
// ---------------------------------------------------------------------------

/// The single output this coordinator owns.  A thin view over one
/// [`ActuatorPort`](crate::app::ports::ActuatorPort) method.
pub trait DispenseDriver {
    fn set_on(&mut self, on: bool) -> Result<(), ActuatorError>;
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

/// Single-resource timed actuation state machine.
///
/// Owns all job state for its resource; everything is volatile and reset
/// on restart.  All times are monotonic milliseconds supplied by the
/// caller, so the machine is fully deterministic under test.
pub struct DispenseCoordinator {
    resource: DispenseResource,
    status: DispenseStatus,
    /// Monotonic ms when the current dispense started.
    started_at_ms: u64,
    /// Accepted run time for the current dispense.
    planned_ms: u64,
    /// Earliest monotonic ms at which a new trigger may be accepted.
    cooldown_until_ms: u64,
    /// Trigger provenance of the current/last dispense.
    source: TriggerSource,
    /// Amount computed at acceptance (g or ml).
    amount: u32,
    /// Linear rate the amount was computed with (per second).
    rate_per_sec: u32,

    // -- Fixed bounds (from config, not remote-mutable) --
    cooldown_ms: u64,
    max_run_ms: u64,
}

impl DispenseCoordinator {
    pub fn new(resource: DispenseResource, cooldown_secs: u32, max_run_secs: u32) -> Self {
        Self {
            resource,
            status: DispenseStatus::Idle,
            started_at_ms: 0,
            planned_ms: 0,
            cooldown_until_ms: 0,
            source: TriggerSource::Manual,
            amount: 0,
            rate_per_sec: 0,
            cooldown_ms: u64::from(cooldown_secs) * 1000,
            max_run_ms: u64::from(max_run_secs) * 1000,
        }
    }

    // ── Triggering ────────────────────────────────────────────

    /// Request a dispense of `duration_secs` at `rate_per_sec`.
    ///
    /// Accepted only from `Idle` and outside the cooldown window; the
    /// acceptance is a one-shot edge, so an at-least-once remote flag
    /// observed again on the next tick lands in `Busy` and cannot start a
    /// second run.  On acceptance the output is commanded on immediately
    /// (a failed command is retried by the next `poll`).
    pub fn request(
        &mut self,
        now_ms: u64,
        duration_secs: f32,
        source: TriggerSource,
        rate_per_sec: u32,
        driver: &mut impl DispenseDriver,
    ) -> RequestAck {
        match self.status {
            DispenseStatus::Dispensing => {
                info!(
                    "{}: trigger ({}) ignored, already dispensing",
                    self.resource.label(),
                    source.label()
                );
                return RequestAck::Busy;
            }
            DispenseStatus::Cooldown => {
                info!(
                    "{}: trigger ({}) ignored, cooling down for {} more ms",
                    self.resource.label(),
                    source.label(),
                    self.cooldown_until_ms.saturating_sub(now_ms)
                );
                return RequestAck::Busy;
            }
            DispenseStatus::Idle => {}
        }
        // Idle can still be inside the cooldown window after a restartless
        // transition; re-check the clock rather than trusting the status.
        if now_ms < self.cooldown_until_ms {
            return RequestAck::Busy;
        }
        if !(duration_secs > 0.0) || rate_per_sec == 0 {
            warn!(
                "{}: trigger ({}) rejected, unusable duration {:.2}s / rate {}",
                self.resource.label(),
                source.label(),
                duration_secs,
                rate_per_sec
            );
            return RequestAck::Busy;
        }

        // Clamp to the watchdog ceiling so planned ≤ ceiling always holds.
        let max_secs = self.max_run_ms as f32 / 1000.0;
        let duration_secs = duration_secs.min(max_secs);

        self.started_at_ms = now_ms;
        self.planned_ms = (duration_secs * 1000.0) as u64;
        self.source = source;
        self.rate_per_sec = rate_per_sec;
        self.amount = (duration_secs * rate_per_sec as f32) as u32;
        self.status = DispenseStatus::Dispensing;

        info!(
            "{}: dispensing {}{} over {:.1}s ({})",
            self.resource.label(),
            self.amount,
            self.resource.unit(),
            duration_secs,
            source.label()
        );

        if let Err(e) = driver.set_on(true) {
            // Stay in Dispensing: poll re-asserts ON next tick and the
            // watchdog bounds the total exposure either way.
            warn!("{}: output ON failed ({e}), will retry", self.resource.label());
        }

        RequestAck::Accepted {
            amount: self.amount,
            duration_secs,
        }
    }

    // ── Per-tick polling ──────────────────────────────────────

    /// Advance the machine by one tick.  Bounded work: read the clock,
    /// compare, issue at most one driver command.
    pub fn poll(
        &mut self,
        now_ms: u64,
        driver: &mut impl DispenseDriver,
    ) -> Option<DispenseCompletion> {
        match self.status {
            DispenseStatus::Idle => None,

            DispenseStatus::Dispensing => {
                let elapsed = now_ms.saturating_sub(self.started_at_ms);

                if elapsed >= self.planned_ms {
                    // Normal completion, but only once the output is
                    // verifiably commanded off.  A failed OFF leaves the
                    // machine in Dispensing so the command is retried next
                    // tick, with the watchdog as the hard backstop.
                    match driver.set_on(false) {
                        Ok(()) => Some(self.finish(elapsed, false)),
                        Err(e) => {
                            warn!(
                                "{}: output OFF failed ({e}), retrying next tick",
                                self.resource.label()
                            );
                            if elapsed >= self.max_run_ms {
                                Some(self.finish(elapsed, true))
                            } else {
                                None
                            }
                        }
                    }
                } else if elapsed >= self.max_run_ms {
                    // Watchdog ceiling.  The stop is unconditional: the
                    // OFF command is issued even if the driver already
                    // reports off, and the transition happens even if the
                    // command fails (Cooldown keeps re-asserting OFF).
                    if let Err(e) = driver.set_on(false) {
                        warn!("{}: forced-stop OFF failed ({e})", self.resource.label());
                    }
                    Some(self.finish(elapsed, true))
                } else {
                    // Mid-dispense: re-assert ON (self-heal / retry).
                    if let Err(e) = driver.set_on(true) {
                        warn!("{}: output ON failed ({e})", self.resource.label());
                    }
                    None
                }
            }

            DispenseStatus::Cooldown => {
                if now_ms >= self.cooldown_until_ms {
                    self.status = DispenseStatus::Idle;
                    info!("{}: cooldown complete, idle", self.resource.label());
                } else if let Err(e) = driver.set_on(false) {
                    warn!("{}: output OFF failed ({e})", self.resource.label());
                }
                None
            }
        }
    }

    fn finish(&mut self, elapsed_ms: u64, forced: bool) -> DispenseCompletion {
        self.status = DispenseStatus::Cooldown;
        self.cooldown_until_ms = self.started_at_ms + elapsed_ms + self.cooldown_ms;

        let elapsed_secs = elapsed_ms as f32 / 1000.0;
        let amount = if forced {
            // The output was on for the whole run; estimate what actually
            // came out rather than reporting the planned amount.
            (elapsed_secs * self.rate_per_sec as f32) as u32
        } else {
            self.amount
        };

        if forced {
            warn!(
                "{}: FORCED STOP after {:.1}s (ceiling {:.1}s), cooling down",
                self.resource.label(),
                elapsed_secs,
                self.max_run_ms as f32 / 1000.0
            );
        } else {
            info!(
                "{}: dispense complete ({}{} over {:.1}s), cooling down",
                self.resource.label(),
                amount,
                self.resource.unit(),
                elapsed_secs
            );
        }

        DispenseCompletion {
            resource: self.resource,
            source: self.source,
            amount,
            elapsed_secs,
            forced,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn status(&self) -> DispenseStatus {
        self.status
    }

    pub fn resource(&self) -> DispenseResource {
        self.resource
    }

    /// Required physical output level for this tick.
    pub fn output_on(&self) -> bool {
        self.status == DispenseStatus::Dispensing
    }

    /// Monotonic ms until a new trigger can be accepted (0 when ready).
    pub fn cooldown_remaining_ms(&self, now_ms: u64) -> u64 {
        self.cooldown_until_ms.saturating_sub(now_ms)
    }
}

// ---------------------------------------------------------------------------
// Amount calculations (pure, independent of the state machine)
// ---------------------------------------------------------------------------

/// Grams delivered by holding the gate open for `duration_secs`.
pub fn feed_grams(duration_secs: f32, grams_per_sec: u32) -> u32 {
    (duration_secs * grams_per_sec as f32) as u32
}

/// Gate-open time needed to deliver `grams`.
pub fn feed_duration_for_grams(grams: u32, grams_per_sec: u32) -> f32 {
    if grams_per_sec == 0 {
        return 0.0;
    }
    grams as f32 / grams_per_sec as f32
}

/// Daily recommended ration for the whole flock.
pub fn recommended_feed_grams(profile: &FeedingProfile) -> u32 {
    profile.age_group.grams_per_bird_per_day() * profile.chicken_count
}

/// Millilitres delivered by running the pump for `duration_secs`.
pub fn water_volume_ml(duration_secs: f32, flow_ml_per_sec: u32) -> u32 {
    (duration_secs * flow_ml_per_sec as f32) as u32
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
