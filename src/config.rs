//! Engine configuration.
//!
//! All constants are read once when the engine is built and stay fixed for
//! its lifetime. Configure in code with the `with_*` builder methods, or load
//! a TOML file:
//!
//! ```toml
//! capacity = 500
//! particles_per_emission = 30
//! duration_ms = 2500
//! integration = "frame_coupled"
//! palette = [0xFF6B6B, 0x4ECDC4]
//! ```
//!
//! Missing keys fall back to [`EngineConfig::default`], which reproduces the
//! firework effect this engine was built for.

use crate::error::{EngineError, Result};
use crate::integrator::IntegrationMode;
use crate::palette::DEFAULT_PALETTE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Axis-aligned box that random triggers pick their origin from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerRegion {
    /// Minimum corner.
    pub min: [f32; 3],
    /// Maximum corner.
    pub max: [f32; 3],
}

impl Default for TriggerRegion {
    fn default() -> Self {
        Self {
            min: [-2.0, 1.5, -1.5],
            max: [2.0, 3.5, 1.5],
        }
    }
}

/// Construction-time constants for [`crate::BurstEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum simultaneously renderable particles (particle buffer slots).
    pub capacity: usize,
    /// Particles created by each emission.
    pub particles_per_emission: usize,
    /// Hard lifetime of an emission in milliseconds.
    pub duration_ms: u64,
    /// Seconds for a particle's life to decay from 1 to 0.
    pub life_span_secs: f32,
    /// Vertical velocity lost per reference tick.
    pub gravity: f32,
    /// Velocity scale per reference tick, in `(0, 1]`.
    pub drag: f32,
    /// Color scale per reference tick, in `(0, 1]`.
    pub color_fade: f32,
    /// Position step used by [`IntegrationMode::FrameCoupled`], in seconds.
    pub fixed_step: f32,
    /// Tick rate (Hz) the per-tick constants above are expressed against.
    pub reference_rate: f32,
    /// Horizontal launch velocity is drawn from `[-h, h]` on x and z.
    pub horizontal_speed: f32,
    /// Lower bound of the vertical launch velocity.
    pub vertical_speed_min: f32,
    /// Upper bound of the vertical launch velocity.
    pub vertical_speed_max: f32,
    /// Lower bound of the per-particle size.
    pub size_min: f32,
    /// Upper bound of the per-particle size.
    pub size_max: f32,
    /// Emission base colors as `0xRRGGBB`.
    pub palette: Vec<u32>,
    /// Region used by [`crate::BurstEngine::spawn_random`].
    pub trigger_region: TriggerRegion,
    /// Fixed RNG seed; `None` seeds from the system time.
    pub seed: Option<u64>,
    /// How velocity, position and color fade are integrated.
    pub integration: IntegrationMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            particles_per_emission: 50,
            duration_ms: 3000,
            life_span_secs: 3.0,
            gravity: 0.01,
            drag: 0.995,
            color_fade: 0.998,
            fixed_step: 0.016,
            reference_rate: 60.0,
            horizontal_speed: 3.0,
            vertical_speed_min: 1.0,
            vertical_speed_max: 5.0,
            size_min: 0.05,
            size_max: 0.15,
            palette: DEFAULT_PALETTE.to_vec(),
            trigger_region: TriggerRegion::default(),
            seed: None,
            integration: IntegrationMode::default(),
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Set the particle buffer capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the number of particles per emission.
    pub fn with_particles_per_emission(mut self, count: usize) -> Self {
        self.particles_per_emission = count;
        self
    }

    /// Set the hard emission lifetime.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = duration.as_millis() as u64;
        self
    }

    /// Set the particle life span in seconds.
    pub fn with_life_span(mut self, secs: f32) -> Self {
        self.life_span_secs = secs;
        self
    }

    /// Set gravity, drag and color fade (all per reference tick).
    pub fn with_physics(mut self, gravity: f32, drag: f32, color_fade: f32) -> Self {
        self.gravity = gravity;
        self.drag = drag;
        self.color_fade = color_fade;
        self
    }

    /// Set the launch velocity ranges.
    pub fn with_launch_speed(mut self, horizontal: f32, vertical_min: f32, vertical_max: f32) -> Self {
        self.horizontal_speed = horizontal;
        self.vertical_speed_min = vertical_min;
        self.vertical_speed_max = vertical_max;
        self
    }

    /// Replace the palette.
    pub fn with_palette(mut self, palette: impl Into<Vec<u32>>) -> Self {
        self.palette = palette.into();
        self
    }

    /// Set the random trigger region.
    pub fn with_trigger_region(mut self, min: [f32; 3], max: [f32; 3]) -> Self {
        self.trigger_region = TriggerRegion { min, max };
        self
    }

    /// Fix the RNG seed for reproducible bursts.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Choose the integration mode.
    pub fn with_integration(mut self, mode: IntegrationMode) -> Self {
        self.integration = mode;
        self
    }

    /// Hard emission lifetime as a [`Duration`].
    #[inline]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Check every constant. Called by the engine constructor.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(invalid("capacity must be greater than zero"));
        }
        if self.particles_per_emission == 0 {
            return Err(invalid("particles_per_emission must be greater than zero"));
        }
        if self.duration_ms == 0 {
            return Err(invalid("duration_ms must be greater than zero"));
        }
        if !(self.life_span_secs.is_finite() && self.life_span_secs > 0.0) {
            return Err(invalid("life_span_secs must be positive and finite"));
        }
        if !self.gravity.is_finite() {
            return Err(invalid("gravity must be finite"));
        }
        if !unit_factor(self.drag) {
            return Err(invalid("drag must be in (0, 1]"));
        }
        if !unit_factor(self.color_fade) {
            return Err(invalid("color_fade must be in (0, 1]"));
        }
        if !(self.fixed_step.is_finite() && self.fixed_step > 0.0) {
            return Err(invalid("fixed_step must be positive and finite"));
        }
        if !(self.reference_rate.is_finite() && self.reference_rate > 0.0) {
            return Err(invalid("reference_rate must be positive and finite"));
        }
        if !(self.horizontal_speed.is_finite() && self.horizontal_speed >= 0.0) {
            return Err(invalid("horizontal_speed must be finite and non-negative"));
        }
        if !sampleable_span(-self.horizontal_speed, self.horizontal_speed) {
            return Err(invalid("horizontal_speed is too large to sample from"));
        }
        ordered_range("vertical_speed", self.vertical_speed_min, self.vertical_speed_max)?;
        ordered_range("size", self.size_min, self.size_max)?;
        for axis in 0..3 {
            ordered_range(
                "trigger_region",
                self.trigger_region.min[axis],
                self.trigger_region.max[axis],
            )?;
        }
        if self.palette.is_empty() {
            return Err(invalid("palette must contain at least one color"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> EngineError {
    EngineError::InvalidConfig(msg.to_string())
}

fn unit_factor(value: f32) -> bool {
    value > 0.0 && value <= 1.0
}

fn ordered_range(name: &str, min: f32, max: f32) -> Result<()> {
    if !(min.is_finite() && max.is_finite() && min <= max) {
        return Err(EngineError::InvalidConfig(format!(
            "{name} range must be finite with min <= max (got {min}..{max})"
        )));
    }
    if !sampleable_span(min, max) {
        return Err(EngineError::InvalidConfig(format!(
            "{name} range {min}..{max} is too wide to sample from"
        )));
    }
    Ok(())
}

/// Uniform float sampling scales by `max - min`, which must stay well inside
/// `f32` range.
fn sampleable_span(min: f32, max: f32) -> bool {
    max - min < f32::MAX / 2.0
}
