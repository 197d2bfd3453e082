//! Burst shaping: random launch velocities, colors, sizes and trigger points.
//!
//! [`BurstShape`] holds the fixed parameters of every burst (resolved from
//! [`EngineConfig`]); [`BurstContext`] owns the RNG and turns a shape plus an
//! origin into fresh particles.

use crate::config::{EngineConfig, TriggerRegion};
use crate::palette::BurstPalette;
use crate::particle::Particle;
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Fixed per-burst parameters.
#[derive(Debug, Clone)]
pub struct BurstShape {
    /// Particles created per burst.
    pub count: usize,
    /// Hard lifetime of the emission.
    pub duration: Duration,
    /// Half-range of the x/z launch velocity.
    pub horizontal_speed: f32,
    /// Vertical launch velocity range (min, max).
    pub vertical_speed: (f32, f32),
    /// Particle size range (min, max).
    pub size: (f32, f32),
    /// Base colors to pick from.
    pub palette: BurstPalette,
    /// Box for random trigger origins.
    pub trigger_region: TriggerRegion,
}

impl BurstShape {
    /// Resolve the shape from a configuration. Returns `None` if the palette
    /// is empty; call [`EngineConfig::validate`] first to get a proper error.
    pub fn from_config(config: &EngineConfig) -> Option<Self> {
        Some(Self {
            count: config.particles_per_emission,
            duration: config.duration(),
            horizontal_speed: config.horizontal_speed,
            vertical_speed: (config.vertical_speed_min, config.vertical_speed_max),
            size: (config.size_min, config.size_max),
            palette: BurstPalette::from_hex(&config.palette)?,
            trigger_region: config.trigger_region,
        })
    }
}

/// RNG-backed helpers for spawning bursts.
///
/// ```ignore
/// let mut ctx = BurstContext::seeded(7);
/// let color = ctx.pick_color(&shape.palette);
/// let particles = ctx.burst(&shape, Vec3::new(0.0, 2.0, 0.0), color);
/// ```
#[derive(Debug, Clone)]
pub struct BurstContext {
    rng: SmallRng,
}

impl BurstContext {
    /// Seed from the system time, so bursts differ between runs.
    pub fn from_time() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::seeded(seed)
    }

    /// Seed deterministically.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Use the configured seed if any, otherwise the system time.
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_time, Self::seeded)
    }

    // ========== Random primitives ==========

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max]`. `min == max` returns `min`.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        self.rng.gen_range(min..=max)
    }

    // ========== Burst helpers ==========

    /// Launch velocity: symmetric on x/z, positive-biased on y.
    pub fn launch_velocity(&mut self, shape: &BurstShape) -> Vec3 {
        let h = shape.horizontal_speed;
        let (v_min, v_max) = shape.vertical_speed;
        Vec3::new(
            self.random_range(-h, h),
            self.random_range(v_min, v_max),
            self.random_range(-h, h),
        )
    }

    /// Random index into a palette.
    pub fn pick_color_index(&mut self, palette: &BurstPalette) -> usize {
        self.rng.gen_range(0..palette.len())
    }

    /// Random palette color.
    pub fn pick_color(&mut self, palette: &BurstPalette) -> Vec3 {
        let index = self.pick_color_index(palette);
        palette.get(index)
    }

    /// Random point inside the trigger region.
    pub fn random_in_region(&mut self, region: &TriggerRegion) -> Vec3 {
        Vec3::new(
            self.random_range(region.min[0], region.max[0]),
            self.random_range(region.min[1], region.max[1]),
            self.random_range(region.min[2], region.max[2]),
        )
    }

    /// Create `shape.count` particles at `origin`, all sharing `color`.
    pub fn burst(&mut self, shape: &BurstShape, origin: Vec3, color: Vec3) -> Vec<Particle> {
        let (size_min, size_max) = shape.size;
        (0..shape.count)
            .map(|_| {
                let velocity = self.launch_velocity(shape);
                let size = self.random_range(size_min, size_max);
                Particle::new(origin, velocity, color, size)
            })
            .collect()
    }
}
