//! Adapters binding the port traits to a concrete platform.
//!
//! The default binary wires the simulation adapters; a hardware build
//! swaps in its own [`SensorPort`](crate::app::ports::SensorPort) and
//! [`ActuatorPort`](crate::app::ports::ActuatorPort) implementations.

pub mod log_sink;
pub mod sim;
pub mod time;
