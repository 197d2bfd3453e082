//! Headless burst simulation.
//!
//! Runs the engine at a fixed frame rate on a manual clock, triggering bursts
//! at random points, and logs what the renderer would draw.
//!
//! ```text
//! burstfx-sim [config.toml] [seconds]
//! RUST_LOG=debug burstfx-sim
//! ```

use burstfx::prelude::*;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const FRAME: Duration = Duration::from_micros(16_667);
const TRIGGER_EVERY: u32 = 20;
const FRAMES_PER_SECOND: u32 = 60;

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    if let Err(e) = run() {
        error!("burstfx-sim failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> burstfx::Result<()> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => EngineConfig::load(&path)?,
        None => EngineConfig::default(),
    };
    let seconds: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(5);

    info!(capacity = config.capacity, mode = ?config.integration, seconds, "starting simulation");

    let mut engine = BurstEngine::with_clock(config, ManualClock::new())?;
    let frames = frame_count(seconds);
    let mut peak = 0;

    for frame in 0..frames {
        if frame % TRIGGER_EVERY == 0 {
            let origin = engine.spawn_random();
            info!(frame, x = origin.x, y = origin.y, z = origin.z, "burst");
        }
        engine.clock().advance_by(FRAME);
        engine.tick()?;

        let stats = *engine.stats();
        peak = peak.max(stats.active_count);
        if frame % FRAMES_PER_SECOND == FRAMES_PER_SECOND - 1 {
            info!(
                second = (frame + 1) / FRAMES_PER_SECOND,
                emissions = stats.live_emissions,
                active = stats.active_count,
                dropped = stats.dropped,
                utilization = %format!("{:.0}%", stats.utilization() * 100.0),
                "frame stats"
            );
        }
    }

    info!(peak_active = peak, "simulation finished");
    Ok(())
}

/// Frames to simulate for `seconds`, saturating for absurd durations.
fn frame_count(seconds: u32) -> u32 {
    seconds.saturating_mul(FRAMES_PER_SECOND)
}
