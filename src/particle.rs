//! The particle record.

use glam::Vec3;

/// One simulated point of a burst.
///
/// Plain data; all behavior lives in the integrator and compactor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position in the effect anchor's local space.
    pub position: Vec3,
    /// Velocity in units per second.
    pub velocity: Vec3,
    /// Remaining visibility in `[0, 1]`. Starts at 1, never increases.
    pub life: f32,
    /// RGB color. Starts in `[0, 1]` and is only ever scaled down.
    pub color: Vec3,
    /// Point size hint for the renderer.
    pub size: f32,
}

impl Particle {
    /// A fresh particle at full life.
    pub fn new(position: Vec3, velocity: Vec3, color: Vec3, size: f32) -> Self {
        Self {
            position,
            velocity,
            life: 1.0,
            color,
            size,
        }
    }

    /// Whether the particle should still be drawn.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Color premultiplied by remaining life, as written to the buffer.
    #[inline]
    pub fn faded_color(&self) -> Vec3 {
        self.color * self.life
    }
}
