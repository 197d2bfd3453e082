//! Compaction of live particles into the particle buffer.
//!
//! Each tick the buffer is zeroed, then emissions are walked oldest first and
//! particles in spawn order. Every particle with life left is written into
//! the next free slot as `(position, color * life)`.
//!
//! # Overflow policy
//!
//! When the buffer fills up, the remaining live particles are skipped for this
//! tick. They are not destroyed and will be written again once older bursts
//! expire. Since the walk is oldest first, the newest burst is always the
//! first to be truncated. This is the engine's only backpressure and it is not
//! an error: the host sees it as `active_count == capacity` and in
//! [`CompactReport::dropped`].

use crate::buffer::ParticleBuffer;
use crate::emission::EmissionSet;

/// Outcome of one compaction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompactReport {
    /// Slots written (the new active count).
    pub written: usize,
    /// Live particles skipped because the buffer was full.
    pub dropped: usize,
}

/// Rewrite `buffer` from the live particles in `emissions`.
pub fn compact(emissions: &EmissionSet, buffer: &mut ParticleBuffer) -> CompactReport {
    buffer.reset();

    let mut dropped = 0;
    for emission in emissions {
        for particle in emission.particles().iter().filter(|p| p.is_alive()) {
            if !buffer.push(particle.position, particle.faded_color()) {
                dropped += 1;
            }
        }
    }

    CompactReport {
        written: buffer.active_count(),
        dropped,
    }
}
