//! Simulation binary: runs the full control loop against the synthetic
//! enclosure and the in-memory remote store at 1 Hz.

use std::thread;
use std::time::Duration;

use anyhow::Context;
use log::info;

use coopctl::adapters::sim::{MemoryRemote, SimHardware};
use coopctl::adapters::time::SystemClock;
use coopctl::app::service::AppService;
use coopctl::app::sync::{EventBuffer, RemoteSync};
use coopctl::config::SystemConfig;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SystemConfig::default();
    let tick = Duration::from_millis(u64::from(config.tick_interval_ms));

    let mut service = AppService::new(config).context("invalid configuration")?;
    let mut hw = SimHardware::new();
    let mut remote = MemoryRemote::new();
    let mut sync = RemoteSync::new();
    let mut events = EventBuffer::new();
    let clock = SystemClock::new();

    info!("coopctl starting (simulation)");
    sync.startup(&mut service, &mut remote, &mut hw, &mut events);
    service.start(clock.wall_time(), &mut events);

    loop {
        let now_ms = clock.now_ms();
        let unix_ts = clock.unix_ts();
        let wall = clock.wall_time();

        service.observe(&mut hw, unix_ts, &mut events);
        sync.publish_readings(&service, &mut remote);
        sync.flush_events(&mut events, &mut remote, unix_ts);

        sync.pull(&mut service, &mut remote, &mut hw, &mut events, now_ms);

        let completions = service.control(now_ms, wall, &mut hw, &mut events);

        sync.record_dispenses(&completions, &mut remote, unix_ts);
        sync.publish_states(&service, &mut remote);
        sync.maybe_push_history(&service, &mut remote, unix_ts);
        sync.flush_events(&mut events, &mut remote, unix_ts);

        thread::sleep(tick);
    }
}
