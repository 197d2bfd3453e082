//! Physics integrator.
//!
//! Every tick, each particle of each live emission goes through the same five
//! steps, in order:
//!
//! 1. gravity pulls the vertical velocity down,
//! 2. drag scales the whole velocity,
//! 3. position moves along the velocity,
//! 4. life decays from wall-clock age: `max(0, 1 - age / life_span)`,
//! 5. color fades multiplicatively.
//!
//! Nothing is removed here. Particles at zero life stay in their emission
//! until the emission itself expires; the compactor skips them.
//!
//! # Integration modes
//!
//! | Mode | Steps 1-3 and 5 | Visible speed depends on tick rate |
//! |------|-----------------|------------------------------------|
//! | [`IntegrationMode::FrameCoupled`] | fixed per-tick constants, position uses `fixed_step` | yes |
//! | [`IntegrationMode::TimeScaled`] | constants rescaled by the real delta since the emission's last step | no |
//!
//! `TimeScaled` is the default. The per-tick constants are treated as
//! "per tick at `reference_rate` Hz": over a delta `dt`, gravity becomes
//! `gravity * rate * dt` and the factors become `drag.powf(rate * dt)` and
//! `color_fade.powf(rate * dt)`. At exactly the reference rate both modes
//! apply the same gravity, drag and fade; the position step differs only by
//! `fixed_step` versus `1 / rate`. Life decay is wall-clock based in both.

use crate::config::EngineConfig;
use crate::emission::{Emission, EmissionSet};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How steps 1-3 and 5 account for time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationMode {
    /// Fixed per-tick constants; motion speed follows the host's frame rate.
    FrameCoupled,
    /// Constants scaled by the real time between ticks.
    #[default]
    TimeScaled,
}

/// Advances particles by one tick.
#[derive(Debug, Clone, Copy)]
pub struct Integrator {
    mode: IntegrationMode,
    gravity: f32,
    drag: f32,
    color_fade: f32,
    fixed_step: f32,
    reference_rate: f32,
    life_span_secs: f32,
}

impl Integrator {
    /// Take the physics constants from a configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            mode: config.integration,
            gravity: config.gravity,
            drag: config.drag,
            color_fade: config.color_fade,
            fixed_step: config.fixed_step,
            reference_rate: config.reference_rate,
            life_span_secs: config.life_span_secs,
        }
    }

    /// The active mode.
    #[inline]
    pub fn mode(&self) -> IntegrationMode {
        self.mode
    }

    /// Step every emission in the set to `now`.
    pub fn step(&self, emissions: &mut EmissionSet, now: Duration) {
        for emission in emissions.iter_mut() {
            self.step_emission(emission, now);
        }
    }

    /// Step one emission to `now`.
    pub fn step_emission(&self, emission: &mut Emission, now: Duration) {
        let dt = now.saturating_sub(emission.last_step).as_secs_f32();
        let age = emission.age(now).as_secs_f32();
        let life = self.life_at(age);

        let (gravity, drag, fade, step) = match self.mode {
            IntegrationMode::FrameCoupled => (self.gravity, self.drag, self.color_fade, self.fixed_step),
            IntegrationMode::TimeScaled => {
                let ticks = dt * self.reference_rate;
                (
                    self.gravity * ticks,
                    self.drag.powf(ticks),
                    self.color_fade.powf(ticks),
                    dt,
                )
            }
        };

        for p in emission.particles_mut() {
            p.velocity.y -= gravity;
            p.velocity *= drag;
            p.position += p.velocity * step;
            // min() keeps life non-increasing even if spawn_time was stamped late
            p.life = life.min(p.life);
            p.color *= fade;
        }

        emission.last_step = emission.last_step.max(now);
    }

    /// Life remaining `age_secs` after spawn, clamped to `[0, 1]`.
    #[inline]
    pub fn life_at(&self, age_secs: f32) -> f32 {
        (1.0 - age_secs / self.life_span_secs).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Particle;
    use glam::Vec3;

    const EPS: f32 = 1e-5;

    fn single(velocity: Vec3) -> Emission {
        let p = Particle::new(Vec3::ZERO, velocity, Vec3::ONE, 0.1);
        Emission::new(vec![p], Duration::ZERO, Duration::from_secs(3), Vec3::ONE)
    }

    fn integrator(mode: IntegrationMode) -> Integrator {
        Integrator::from_config(&EngineConfig::default().with_integration(mode))
    }

    #[test]
    fn test_frame_coupled_single_tick() {
        let integrator = integrator(IntegrationMode::FrameCoupled);
        let mut emission = single(Vec3::new(1.0, 2.0, 0.0));

        integrator.step_emission(&mut emission, Duration::from_millis(16));

        let p = emission.particles()[0];
        let vy = (2.0 - 0.01) * 0.995;
        let vx = 1.0 * 0.995;
        assert!((p.velocity.y - vy).abs() < EPS);
        assert!((p.velocity.x - vx).abs() < EPS);
        assert!((p.position.y - vy * 0.016).abs() < EPS);
        assert!((p.position.x - vx * 0.016).abs() < EPS);
        assert!((p.color.x - 0.998).abs() < EPS);
    }

    #[test]
    fn test_frame_coupled_ignores_elapsed_time() {
        let integrator = integrator(IntegrationMode::FrameCoupled);
        let mut short = single(Vec3::Y);
        let mut long = single(Vec3::Y);

        integrator.step_emission(&mut short, Duration::from_millis(1));
        integrator.step_emission(&mut long, Duration::from_millis(500));

        assert_eq!(short.particles()[0].position, long.particles()[0].position);
        assert_eq!(short.particles()[0].color, long.particles()[0].color);
    }

    #[test]
    fn test_time_scaled_matches_frame_coupled_at_reference_rate() {
        let coupled = integrator(IntegrationMode::FrameCoupled);
        let scaled = integrator(IntegrationMode::TimeScaled);
        let mut a = single(Vec3::new(0.5, 3.0, -0.5));
        let mut b = single(Vec3::new(0.5, 3.0, -0.5));

        let tick = Duration::from_secs_f64(1.0 / 60.0);
        let mut now = Duration::ZERO;
        for _ in 0..30 {
            now += tick;
            coupled.step_emission(&mut a, now);
            scaled.step_emission(&mut b, now);
        }

        let (pa, pb) = (a.particles()[0], b.particles()[0]);
        assert!((pa.velocity - pb.velocity).length() < 1e-3);
        assert!((pa.color - pb.color).length() < 1e-3);
    }

    #[test]
    fn test_time_scaled_independent_of_tick_rate() {
        let scaled = integrator(IntegrationMode::TimeScaled);
        let mut fast = single(Vec3::new(1.0, 4.0, 0.0));
        let mut slow = single(Vec3::new(1.0, 4.0, 0.0));

        for i in 1..=120 {
            scaled.step_emission(&mut fast, Duration::from_secs_f64(i as f64 / 120.0));
        }
        for i in 1..=30 {
            scaled.step_emission(&mut slow, Duration::from_secs_f64(i as f64 / 30.0));
        }

        let (pf, ps) = (fast.particles()[0], slow.particles()[0]);
        assert!((pf.velocity - ps.velocity).length() < 1e-2);
        assert!((pf.color - ps.color).length() < 1e-3);
        // Explicit Euler differs slightly in position with step size
        assert!((pf.position - ps.position).length() < 0.1);
    }

    #[test]
    fn test_zero_delta_does_not_move() {
        let scaled = integrator(IntegrationMode::TimeScaled);
        let mut emission = single(Vec3::new(1.0, 1.0, 1.0));
        scaled.step_emission(&mut emission, Duration::ZERO);

        let p = emission.particles()[0];
        assert_eq!(p.position, Vec3::ZERO);
        assert_eq!(p.velocity, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(p.life, 1.0);
    }

    #[test]
    fn test_life_half_at_half_span() {
        let integrator = integrator(IntegrationMode::FrameCoupled);
        let mut emission = single(Vec3::ZERO);
        integrator.step_emission(&mut emission, Duration::from_millis(1500));
        assert!((emission.particles()[0].life - 0.5).abs() < EPS);
    }

    #[test]
    fn test_life_clamps_at_zero_and_never_rises() {
        let integrator = integrator(IntegrationMode::TimeScaled);
        let mut emission = single(Vec3::ZERO);

        let mut previous = 1.0;
        for ms in (0..=4000).step_by(250) {
            integrator.step_emission(&mut emission, Duration::from_millis(ms));
            let life = emission.particles()[0].life;
            assert!(life <= previous);
            assert!(life >= 0.0);
            previous = life;
        }
        assert_eq!(previous, 0.0);
    }

    #[test]
    fn test_life_reaches_zero_exactly_at_span() {
        let integrator = integrator(IntegrationMode::FrameCoupled);
        assert_eq!(integrator.life_at(3.0), 0.0);
        assert_eq!(integrator.life_at(10.0), 0.0);
        assert_eq!(integrator.life_at(0.0), 1.0);
    }

    #[test]
    fn test_step_visits_every_emission() {
        let integrator = integrator(IntegrationMode::FrameCoupled);
        let mut set = EmissionSet::new();
        set.push(single(Vec3::Y));
        set.push(single(Vec3::Y));

        integrator.step(&mut set, Duration::from_millis(16));

        for emission in &set {
            assert!(emission.particles()[0].position.y > 0.0);
        }
    }
}
