//! # burstfx - burst particle emissions
//!
//! A small CPU particle engine for short-lived "burst" effects (fireworks,
//! sparks, confetti). Each trigger spawns a fixed group of particles that fly
//! out under gravity and drag, fade, and are reclaimed when the burst expires.
//! Every tick the live particles are compacted into a fixed-capacity buffer
//! the renderer can draw directly.
//!
//! ## Quick Start
//!
//! ```ignore
//! use burstfx::prelude::*;
//!
//! let mut engine = BurstEngine::new(EngineConfig::default())?;
//! engine.spawn(Vec3::new(0.0, 2.0, 0.0))?;
//!
//! loop {
//!     engine.tick()?;
//!     let view = engine.buffer_view()?;
//!     renderer.draw_points(view.active_positions(), view.active_colors());
//! }
//! ```
//!
//! ## Core Concepts
//!
//! | Piece | Role |
//! |-------|------|
//! | [`Particle`] | position, velocity, life, color, size |
//! | [`Emission`] | one burst; hard duration independent of particle life |
//! | [`EmissionSet`] | live bursts, oldest first |
//! | [`Integrator`] | gravity, drag, position, life decay, color fade |
//! | [`ParticleBuffer`] | flat position/color arrays sized for the worst case |
//! | [`compact`] | rewrites the buffer from live particles, oldest burst first |
//! | [`BurstEngine`] | owns all of the above; `spawn` / `advance` / `buffer_view` |
//!
//! ## Tick order
//!
//! `advance(now)` sweeps expired bursts, integrates what is left, then
//! compacts. When more particles are alive than the buffer holds, the newest
//! bursts are truncated for that tick (see [`compactor`]).
//!
//! ## Time
//!
//! Timestamps are [`std::time::Duration`]s since the engine clock's epoch.
//! Use [`time::ManualClock`] to drive time by hand.

pub mod buffer;
pub mod compactor;
pub mod config;
pub mod emission;
pub mod engine;
pub mod error;
#[cfg(feature = "gpu")]
pub mod gpu;
pub mod integrator;
pub mod palette;
pub mod particle;
pub mod spawn;
pub mod stats;
pub mod time;

pub use buffer::{BufferView, ParticleBuffer};
pub use compactor::{compact, CompactReport};
pub use config::{EngineConfig, TriggerRegion};
pub use emission::{Emission, EmissionSet};
pub use engine::BurstEngine;
pub use error::{EngineError, Result};
pub use glam::Vec3;
pub use integrator::{IntegrationMode, Integrator};
pub use palette::{BurstPalette, DEFAULT_PALETTE};
pub use particle::Particle;
pub use spawn::{BurstContext, BurstShape};
pub use stats::TickStats;
pub use time::{Clock, ManualClock, MonotonicClock};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use burstfx::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffer::BufferView;
    pub use crate::config::EngineConfig;
    pub use crate::engine::BurstEngine;
    pub use crate::error::{EngineError, Result};
    pub use crate::integrator::IntegrationMode;
    pub use crate::stats::TickStats;
    pub use crate::time::{Clock, ManualClock, MonotonicClock};
    pub use crate::Vec3;
}
