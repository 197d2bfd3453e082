//! Emissions and the live emission set.
//!
//! An [`Emission`] is one triggered burst: a fixed group of particles that
//! share a spawn time, a hard duration and a base color. The [`EmissionSet`]
//! keeps live emissions in insertion order. That order is load-bearing: the
//! compactor fills buffer slots in it, so older bursts win under overload.

use crate::particle::Particle;
use crate::spawn::{BurstContext, BurstShape};
use glam::Vec3;
use std::time::Duration;
use tracing::debug;

/// One burst of particles.
#[derive(Debug, Clone)]
pub struct Emission {
    particles: Vec<Particle>,
    spawn_time: Duration,
    duration: Duration,
    color: Vec3,
    /// Timestamp of the last integration step (spawn time before the first).
    pub(crate) last_step: Duration,
}

impl Emission {
    /// Wrap already-built particles. The particle count is fixed from here on.
    pub fn new(particles: Vec<Particle>, spawn_time: Duration, duration: Duration, color: Vec3) -> Self {
        Self {
            particles,
            spawn_time,
            duration,
            color,
            last_step: spawn_time,
        }
    }

    /// Particles in spawn order.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable particles for the integrator. A slice, so the count cannot change.
    #[inline]
    pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// When the emission was created.
    #[inline]
    pub fn spawn_time(&self) -> Duration {
        self.spawn_time
    }

    /// Hard lifetime.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Base color shared by all particles at spawn.
    #[inline]
    pub fn color(&self) -> Vec3 {
        self.color
    }

    /// Time since spawn; zero if `now` precedes the spawn time.
    #[inline]
    pub fn age(&self, now: Duration) -> Duration {
        now.saturating_sub(self.spawn_time)
    }

    /// Whether the hard lifetime has run out, regardless of particle life.
    #[inline]
    pub fn is_expired(&self, now: Duration) -> bool {
        self.age(now) >= self.duration
    }

    /// Number of particles with life left.
    pub fn live_particles(&self) -> usize {
        self.particles.iter().filter(|p| p.is_alive()).count()
    }
}

/// Live emissions, oldest first.
#[derive(Debug, Default, Clone)]
pub struct EmissionSet {
    emissions: Vec<Emission>,
}

impl EmissionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a burst at `origin` and append it.
    ///
    /// `palette_index` picks the base color; `None` picks one at random.
    /// Origins are not checked here; the engine rejects non-finite ones.
    pub fn spawn(
        &mut self,
        origin: Vec3,
        now: Duration,
        palette_index: Option<usize>,
        shape: &BurstShape,
        ctx: &mut BurstContext,
    ) {
        let color = match palette_index {
            Some(index) => shape.palette.get(index),
            None => ctx.pick_color(&shape.palette),
        };
        let particles = ctx.burst(shape, origin, color);
        debug!(
            ?origin,
            particles = particles.len(),
            spawn_ms = now.as_millis() as u64,
            "spawned emission"
        );
        self.push(Emission::new(particles, now, shape.duration, color));
    }

    /// Append an already-built emission.
    pub fn push(&mut self, emission: Emission) {
        self.emissions.push(emission);
    }

    /// Remove every emission whose hard lifetime has elapsed at `now`.
    ///
    /// Returns the number removed. Survivors keep their relative order.
    pub fn sweep_expired(&mut self, now: Duration) -> usize {
        let before = self.emissions.len();
        self.emissions.retain(|e| !e.is_expired(now));
        let removed = before - self.emissions.len();
        if removed > 0 {
            debug!(removed, remaining = self.emissions.len(), "swept expired emissions");
        }
        removed
    }

    /// Drop every emission.
    pub fn clear(&mut self) {
        self.emissions.clear();
    }

    /// Number of live emissions.
    #[inline]
    pub fn len(&self) -> usize {
        self.emissions.len()
    }

    /// Whether no emission is live.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.emissions.is_empty()
    }

    /// Total particles with life left, across all emissions.
    pub fn live_particles(&self) -> usize {
        self.emissions.iter().map(Emission::live_particles).sum()
    }

    /// Emissions in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Emission> {
        self.emissions.iter()
    }

    /// Emissions in insertion order, for the integrator.
    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Emission> {
        self.emissions.iter_mut()
    }

    /// Emissions as a slice.
    pub fn as_slice(&self) -> &[Emission] {
        &self.emissions
    }
}

impl<'a> IntoIterator for &'a EmissionSet {
    type Item = &'a Emission;
    type IntoIter = std::slice::Iter<'a, Emission>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
