//! coopctl: unattended actuation coordination for a livestock enclosure.
//!
//! The controller owns four physical outputs (feed gate, water pump, fan,
//! heat lamp) and keeps the flock fed, watered and in a safe temperature
//! band without anyone on site.  A remote control plane supplies command
//! flags, settings and schedules; the controller keeps running on cached
//! state when it is unreachable.
//!
//! Layering:
//!
//! - domain components ([`dispense`], [`environment`], [`schedule`],
//!   [`alerts`], [`consumption`]) are pure state machines fed plain
//!   values,
//! - [`app`] wires them together behind port traits and talks to the
//!   remote store,
//! - [`adapters`] bind the ports to a concrete platform.

pub mod adapters;
pub mod alerts;
pub mod app;
pub mod config;
pub mod consumption;
pub mod dispense;
pub mod environment;
pub mod error;
pub mod schedule;
