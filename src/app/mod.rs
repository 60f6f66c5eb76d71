//! Application layer: ports, events, commands, the orchestrating service
//! and the remote sync loop.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
pub mod sync;
