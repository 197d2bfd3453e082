//! wgpu upload helpers (feature `gpu`).
//!
//! The engine only produces flat CPU arrays. These helpers own a pair of
//! vertex buffers sized for the engine's capacity and copy the active range
//! into them each frame; the host draws `0..draw_count` instances with
//! [`ParticleGpuBuffers::layouts`].

use crate::buffer::{BufferView, COMPONENTS};
use crate::error::{EngineError, Result};

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
const SLOT_STRIDE: wgpu::BufferAddress = (COMPONENTS * std::mem::size_of::<f32>()) as wgpu::BufferAddress;

/// GPU-side copies of the particle buffer.
pub struct ParticleGpuBuffers {
    /// Positions, `@location(0)`.
    pub positions: wgpu::Buffer,
    /// Premultiplied colors, `@location(1)`.
    pub colors: wgpu::Buffer,
    capacity: usize,
}

impl ParticleGpuBuffers {
    /// Create vertex buffers with room for `capacity` particles.
    pub fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let size = capacity as wgpu::BufferAddress * SLOT_STRIDE;
        let positions = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Burst Position Buffer"),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let colors = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Burst Color Buffer"),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            positions,
            colors,
            capacity,
        }
    }

    /// Particles these buffers can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Copy the active range of `view` and return the instance count to draw.
    pub fn upload(&self, queue: &wgpu::Queue, view: &BufferView<'_>) -> Result<u32> {
        let count = view.active_count();
        if count > self.capacity {
            return Err(EngineError::invalid_argument(
                "view",
                format!("{count} active particles exceed GPU capacity {}", self.capacity),
            ));
        }
        if count > 0 {
            queue.write_buffer(&self.positions, 0, view.position_bytes());
            queue.write_buffer(&self.colors, 0, view.color_bytes());
        }
        Ok(count as u32)
    }

    /// Instance-stepped layouts for the position and color buffers, in
    /// binding order.
    pub fn layouts() -> [wgpu::VertexBufferLayout<'static>; 2] {
        [
            wgpu::VertexBufferLayout {
                array_stride: SLOT_STRIDE,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &POSITION_ATTRIBUTES,
            },
            wgpu::VertexBufferLayout {
                array_stride: SLOT_STRIDE,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &COLOR_ATTRIBUTES,
            },
        ]
    }
}
