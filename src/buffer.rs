//! Fixed-capacity particle buffer.
//!
//! Two flat `f32` arrays, three floats per slot, allocated once at the worst
//! case size and rewritten every tick by the compactor. Only the first
//! `active_count` slots hold data; the rest are zero and must not be drawn.
//!
//! The layout is exactly what a vertex buffer wants, so [`BufferView`] can
//! hand out the raw bytes through `bytemuck` without copying.

use glam::Vec3;

/// Floats per slot in each attribute array.
pub const COMPONENTS: usize = 3;

/// Renderable particle attributes, owned by the engine.
#[derive(Debug, Clone)]
pub struct ParticleBuffer {
    positions: Box<[f32]>,
    colors: Box<[f32]>,
    capacity: usize,
    active_count: usize,
}

impl ParticleBuffer {
    /// Allocate a zeroed buffer with `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            positions: vec![0.0; capacity * COMPONENTS].into_boxed_slice(),
            colors: vec![0.0; capacity * COMPONENTS].into_boxed_slice(),
            capacity,
            active_count: 0,
        }
    }

    /// Number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of leading slots holding data this tick.
    #[inline]
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Whether every slot is taken.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.active_count >= self.capacity
    }

    /// Zero both arrays and reset the active range.
    pub fn reset(&mut self) {
        self.positions.fill(0.0);
        self.colors.fill(0.0);
        self.active_count = 0;
    }

    /// Write into the next free slot.
    ///
    /// Returns `false` without writing when the buffer is full.
    #[inline]
    pub fn push(&mut self, position: Vec3, color: Vec3) -> bool {
        if self.is_full() {
            return false;
        }
        let base = self.active_count * COMPONENTS;
        position.write_to_slice(&mut self.positions[base..base + COMPONENTS]);
        color.write_to_slice(&mut self.colors[base..base + COMPONENTS]);
        self.active_count += 1;
        true
    }

    /// Read-only snapshot for the renderer.
    pub fn view(&self) -> BufferView<'_> {
        BufferView {
            positions: &self.positions,
            colors: &self.colors,
            active_count: self.active_count,
        }
    }
}

/// Borrowed, read-only view of a [`ParticleBuffer`].
///
/// Valid until the next `advance`; the borrow checker enforces that.
#[derive(Debug, Clone, Copy)]
pub struct BufferView<'a> {
    positions: &'a [f32],
    colors: &'a [f32],
    active_count: usize,
}

impl<'a> BufferView<'a> {
    /// Full position array, `capacity * 3` floats.
    #[inline]
    pub fn positions(&self) -> &'a [f32] {
        self.positions
    }

    /// Full color array, `capacity * 3` floats.
    #[inline]
    pub fn colors(&self) -> &'a [f32] {
        self.colors
    }

    /// Number of slots to draw.
    #[inline]
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Total slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.positions.len() / COMPONENTS
    }

    /// Positions of the drawable slots only.
    #[inline]
    pub fn active_positions(&self) -> &'a [f32] {
        &self.positions[..self.active_count * COMPONENTS]
    }

    /// Colors of the drawable slots only.
    #[inline]
    pub fn active_colors(&self) -> &'a [f32] {
        &self.colors[..self.active_count * COMPONENTS]
    }

    /// Position in `slot`, if the slot is inside the buffer.
    pub fn position(&self, slot: usize) -> Option<Vec3> {
        slot_vec(self.positions, slot)
    }

    /// Color in `slot`, if the slot is inside the buffer.
    pub fn color(&self, slot: usize) -> Option<Vec3> {
        slot_vec(self.colors, slot)
    }

    /// Drawable positions as raw bytes, ready for a vertex buffer upload.
    #[inline]
    pub fn position_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.active_positions())
    }

    /// Drawable colors as raw bytes, ready for a vertex buffer upload.
    #[inline]
    pub fn color_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.active_colors())
    }

    /// Whether every float in both arrays is zero.
    pub fn is_zeroed(&self) -> bool {
        self.positions.iter().chain(self.colors.iter()).all(|&v| v == 0.0)
    }
}

fn slot_vec(data: &[f32], slot: usize) -> Option<Vec3> {
    let base = slot.checked_mul(COMPONENTS)?;
    let end = base.checked_add(COMPONENTS)?;
    data.get(base..end).map(Vec3::from_slice)
}
