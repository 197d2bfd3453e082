//! Per-tick statistics.

use std::time::Duration;

/// Snapshot of the engine after the last `advance`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Timestamp of the tick.
    pub now: Duration,
    /// Emissions removed by this tick's expiry sweep.
    pub expired: usize,
    /// Emissions still live after the sweep.
    pub live_emissions: usize,
    /// Particles with life left across all live emissions.
    pub live_particles: usize,
    /// Slots written to the buffer.
    pub active_count: usize,
    /// Live particles skipped because the buffer was full.
    pub dropped: usize,
    /// Buffer capacity.
    pub capacity: usize,
}

impl TickStats {
    /// Whether this tick truncated output.
    #[inline]
    pub fn is_saturated(&self) -> bool {
        self.dropped > 0
    }

    /// Fraction of buffer slots in use, in `[0, 1]`.
    pub fn utilization(&self) -> f32 {
        if self.capacity == 0 {
            0.0
        } else {
            self.active_count as f32 / self.capacity as f32
        }
    }
}
