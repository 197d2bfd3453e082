//! The burst engine: one instance owns the emission set and particle buffer.
//!
//! The engine is a pure per-tick state transformer. The host decides when to
//! spawn and when to tick; the engine never schedules work, blocks, or touches
//! rendering or input.
//!
//! ```ignore
//! let mut engine = BurstEngine::new(EngineConfig::default())?;
//!
//! // input layer
//! engine.spawn(Vec3::new(0.0, 2.0, 0.0))?;
//!
//! // render loop, once per frame
//! engine.tick()?;
//! let view = engine.buffer_view()?;
//! draw_points(view.active_positions(), view.active_colors());
//! ```
//!
//! Per tick, [`BurstEngine::advance`] runs the expiry sweep, then the
//! integrator, then the compactor. Expired emissions are therefore never
//! integrated or drawn in the tick they expire.

use crate::buffer::{BufferView, ParticleBuffer};
use crate::compactor;
use crate::config::EngineConfig;
use crate::emission::{Emission, EmissionSet};
use crate::error::{EngineError, Result};
use crate::integrator::Integrator;
use crate::spawn::{BurstContext, BurstShape};
use crate::stats::TickStats;
use crate::time::{Clock, MonotonicClock};
use glam::Vec3;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Particle burst engine.
///
/// Generic over its [`Clock`] so tests and replays can drive time by hand.
#[derive(Debug)]
pub struct BurstEngine<C: Clock = MonotonicClock> {
    config: EngineConfig,
    shape: BurstShape,
    integrator: Integrator,
    emissions: EmissionSet,
    buffer: Option<ParticleBuffer>,
    rng: BurstContext,
    clock: C,
    last_tick: Option<Duration>,
    stats: TickStats,
}

impl BurstEngine<MonotonicClock> {
    /// Build an engine on the wall clock.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_clock(config, MonotonicClock::new())
    }
}

impl<C: Clock> BurstEngine<C> {
    /// Build an engine on a custom clock. Validates the configuration and
    /// allocates the particle buffer.
    pub fn with_clock(config: EngineConfig, clock: C) -> Result<Self> {
        config.validate()?;
        let shape = BurstShape::from_config(&config)
            .ok_or_else(|| EngineError::InvalidConfig("palette must contain at least one color".into()))?;
        let integrator = Integrator::from_config(&config);
        let rng = BurstContext::from_seed(config.seed);
        let buffer = ParticleBuffer::new(config.capacity);
        debug!(
            capacity = config.capacity,
            particles_per_emission = config.particles_per_emission,
            mode = ?config.integration,
            "burst engine created"
        );

        Ok(Self {
            stats: TickStats {
                capacity: config.capacity,
                ..Default::default()
            },
            config,
            shape,
            integrator,
            emissions: EmissionSet::new(),
            buffer: Some(buffer),
            rng,
            clock,
            last_tick: None,
        })
    }

    // =========================================================================
    // SPAWNING
    // =========================================================================

    /// Spawn a burst at `origin`, stamped with the engine clock's time and a
    /// random palette color.
    ///
    /// Fails with [`EngineError::InvalidArgument`] if any coordinate is NaN or
    /// infinite; nothing is spawned in that case.
    pub fn spawn(&mut self, origin: Vec3) -> Result<()> {
        let now = self.clock.now();
        self.spawn_with(origin, now, None)
    }

    /// Spawn a burst with an explicit spawn timestamp.
    pub fn spawn_at(&mut self, origin: Vec3, now: Duration) -> Result<()> {
        self.spawn_with(origin, now, None)
    }

    /// Spawn a burst using palette color `palette_index` (wrapping).
    pub fn spawn_colored(&mut self, origin: Vec3, palette_index: usize) -> Result<()> {
        let now = self.clock.now();
        self.spawn_with(origin, now, Some(palette_index))
    }

    /// Spawn a burst at a random point in the configured trigger region.
    ///
    /// Returns the chosen origin.
    pub fn spawn_random(&mut self) -> Vec3 {
        let origin = self.rng.random_in_region(&self.shape.trigger_region);
        let now = self.clock.now();
        self.emissions
            .spawn(origin, now, None, &self.shape, &mut self.rng);
        origin
    }

    fn spawn_with(&mut self, origin: Vec3, now: Duration, palette_index: Option<usize>) -> Result<()> {
        if !origin.is_finite() {
            warn!(?origin, "rejected burst with non-finite origin");
            return Err(EngineError::invalid_argument(
                "origin",
                format!("coordinates must be finite, got {origin}"),
            ));
        }
        self.emissions
            .spawn(origin, now, palette_index, &self.shape, &mut self.rng);
        Ok(())
    }

    // =========================================================================
    // TICKING
    // =========================================================================

    /// Run one simulation tick at `now`.
    ///
    /// Call at most once per rendered frame. `now` must not go backwards;
    /// an equal timestamp is accepted and behaves as a tick where no time
    /// passed.
    pub fn advance(&mut self, now: Duration) -> Result<()> {
        let buffer = self.buffer.as_mut().ok_or(EngineError::NotInitialized)?;
        if let Some(last) = self.last_tick {
            if now < last {
                return Err(EngineError::NonMonotonicTime { last, now });
            }
        }

        let expired = self.emissions.sweep_expired(now);
        self.integrator.step(&mut self.emissions, now);
        let report = compactor::compact(&self.emissions, buffer);

        if report.dropped > 0 && !self.stats.is_saturated() {
            warn!(
                capacity = buffer.capacity(),
                dropped = report.dropped,
                "particle buffer full; newest bursts truncated"
            );
        } else if report.dropped == 0 && self.stats.is_saturated() {
            debug!("particle buffer no longer saturated");
        }

        self.stats = TickStats {
            now,
            expired,
            live_emissions: self.emissions.len(),
            live_particles: report.written + report.dropped,
            active_count: report.written,
            dropped: report.dropped,
            capacity: buffer.capacity(),
        };
        self.last_tick = Some(now);
        trace!(
            now_ms = now.as_millis() as u64,
            active = report.written,
            emissions = self.emissions.len(),
            "tick"
        );
        Ok(())
    }

    /// Run one tick at the engine clock's current time.
    pub fn tick(&mut self) -> Result<()> {
        let now = self.clock.now();
        self.advance(now)
    }

    // =========================================================================
    // OUTPUT
    // =========================================================================

    /// Read-only view of the particle buffer, valid until the next tick.
    pub fn buffer_view(&self) -> Result<BufferView<'_>> {
        self.buffer
            .as_ref()
            .map(ParticleBuffer::view)
            .ok_or(EngineError::NotInitialized)
    }

    /// Slots to draw after the last tick.
    pub fn active_count(&self) -> Result<usize> {
        self.buffer
            .as_ref()
            .map(ParticleBuffer::active_count)
            .ok_or(EngineError::NotInitialized)
    }

    /// Statistics of the last tick.
    #[inline]
    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Drop every live emission. The buffer keeps last tick's contents until
    /// the next `advance`.
    pub fn clear(&mut self) {
        debug!(dropped = self.emissions.len(), "clearing all emissions");
        self.emissions.clear();
    }

    /// Free the particle buffer and all emissions, e.g. when the render
    /// context is lost. `advance` and `buffer_view` fail with
    /// [`EngineError::NotInitialized`] until [`allocate`](Self::allocate).
    pub fn release(&mut self) {
        debug!("releasing particle buffer");
        self.buffer = None;
        self.emissions.clear();
        self.stats = TickStats {
            capacity: self.config.capacity,
            ..Default::default()
        };
    }

    /// Allocate a fresh, zeroed particle buffer. No-op if one exists.
    pub fn allocate(&mut self) {
        if self.buffer.is_none() {
            debug!(capacity = self.config.capacity, "allocating particle buffer");
            self.buffer = Some(ParticleBuffer::new(self.config.capacity));
        }
    }

    /// Whether the particle buffer is allocated.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.buffer.is_some()
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Live emissions, oldest first.
    pub fn emissions(&self) -> &[Emission] {
        self.emissions.as_slice()
    }

    /// Number of live emissions.
    #[inline]
    pub fn emission_count(&self) -> usize {
        self.emissions.len()
    }

    /// The configuration the engine was built with.
    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The engine's clock.
    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Timestamp of the last successful tick.
    #[inline]
    pub fn last_tick(&self) -> Option<Duration> {
        self.last_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrator::IntegrationMode;
    use crate::time::ManualClock;

    fn engine(capacity: usize, per_emission: usize) -> BurstEngine<ManualClock> {
        let config = EngineConfig::default()
            .with_capacity(capacity)
            .with_particles_per_emission(per_emission)
            .with_seed(7);
        BurstEngine::with_clock(config, ManualClock::new()).unwrap()
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = BurstEngine::with_clock(EngineConfig::default().with_capacity(0), ManualClock::new());
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_spawn_uses_clock_time() {
        let mut engine = engine(10, 5);
        engine.clock().set(Duration::from_millis(250));
        engine.spawn(Vec3::ZERO).unwrap();
        assert_eq!(engine.emissions()[0].spawn_time(), Duration::from_millis(250));
    }

    #[test]
    fn test_non_finite_origin_rejected() {
        let mut engine = engine(10, 5);
        let err = engine.spawn(Vec3::new(f32::NAN, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument { what: "origin", .. }));
        assert!(engine.spawn_at(Vec3::new(0.0, f32::INFINITY, 0.0), Duration::ZERO).is_err());
        assert_eq!(engine.emission_count(), 0);
    }

    #[test]
    fn test_spawn_colored_picks_palette_entry() {
        let mut engine = engine(10, 5);
        engine.spawn_colored(Vec3::ZERO, 2).unwrap();
        let expected = crate::palette::rgb_from_hex(engine.config().palette[2]);
        assert_eq!(engine.emissions()[0].color(), expected);
    }

    #[test]
    fn test_spawn_random_stays_in_region() {
        let mut engine = engine(100, 5);
        let region = engine.config().trigger_region;
        for _ in 0..20 {
            let origin = engine.spawn_random();
            for axis in 0..3 {
                assert!(origin[axis] >= region.min[axis] && origin[axis] <= region.max[axis]);
            }
        }
        assert_eq!(engine.emission_count(), 20);
    }

    #[test]
    fn test_advance_rejects_backwards_time() {
        let mut engine = engine(10, 5);
        engine.advance(Duration::from_millis(100)).unwrap();
        engine.advance(Duration::from_millis(100)).unwrap();
        let err = engine.advance(Duration::from_millis(50)).unwrap_err();
        assert!(matches!(err, EngineError::NonMonotonicTime { .. }));
        assert_eq!(engine.last_tick(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn test_release_then_advance_fails_until_allocated() {
        let mut engine = engine(10, 5);
        engine.spawn(Vec3::ZERO).unwrap();
        engine.release();

        assert!(!engine.is_initialized());
        assert!(matches!(engine.advance(Duration::from_millis(16)), Err(EngineError::NotInitialized)));
        assert!(matches!(engine.buffer_view(), Err(EngineError::NotInitialized)));
        assert_eq!(engine.emission_count(), 0);

        engine.allocate();
        engine.advance(Duration::from_millis(16)).unwrap();
        assert_eq!(engine.active_count().unwrap(), 0);
    }

    #[test]
    fn test_stats_track_truncation() {
        let mut engine = engine(10, 6);
        engine.spawn_at(Vec3::ZERO, Duration::ZERO).unwrap();
        engine.spawn_at(Vec3::ZERO, Duration::ZERO).unwrap();
        engine.advance(Duration::from_millis(16)).unwrap();

        let stats = *engine.stats();
        assert_eq!(stats.active_count, 10);
        assert_eq!(stats.dropped, 2);
        assert_eq!(stats.live_particles, 12);
        assert_eq!(stats.live_emissions, 2);
        assert!(stats.is_saturated());
    }

    #[test]
    fn test_tick_reads_clock() {
        let mut engine = engine(10, 5);
        engine.spawn(Vec3::ZERO).unwrap();
        engine.clock().advance_by(Duration::from_millis(3000));
        engine.tick().unwrap();
        assert_eq!(engine.emission_count(), 0);
        assert_eq!(engine.stats().expired, 1);
    }

    #[test]
    fn test_clear_drops_emissions() {
        let mut engine = engine(10, 5);
        engine.spawn(Vec3::ZERO).unwrap();
        engine.clear();
        engine.advance(Duration::from_millis(16)).unwrap();
        assert_eq!(engine.active_count().unwrap(), 0);
    }

    #[test]
    fn test_frame_coupled_engine_moves_particles() {
        let config = EngineConfig::default()
            .with_capacity(50)
            .with_particles_per_emission(5)
            .with_integration(IntegrationMode::FrameCoupled)
            .with_seed(1);
        let mut engine = BurstEngine::with_clock(config, ManualClock::new()).unwrap();
        engine.spawn_at(Vec3::ZERO, Duration::ZERO).unwrap();
        engine.advance(Duration::from_millis(16)).unwrap();

        let view = engine.buffer_view().unwrap();
        assert_eq!(view.active_count(), 5);
        for slot in 0..5 {
            // vertical launch speed is at least 1.0, so every particle rose
            assert!(view.position(slot).unwrap().y > 0.0);
        }
    }
}
