//! CPU mirrors of GPU-side layouts.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::{VertexBufferLayout, VertexStepMode};

/// Positions only: the loader's flat `[x, y, z, ...]` buffer is uploaded as is.
pub const POSITION_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: (3 * std::mem::size_of::<f32>()) as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &wgpu::vertex_attr_array![0 => Float32x3],
};

/// Per-frame uniform block (16-byte aligned).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniforms {
    pub mvp: [[f32; 4]; 4],
    /// RGB fill color, `w` unused.
    pub color: [f32; 4],
}

impl FrameUniforms {
    pub fn new(mvp: Mat4, color: [f32; 3]) -> Self {
        let [r, g, b] = color;
        Self {
            mvp: mvp.to_cols_array_2d(),
            color: [r, g, b, 1.0],
        }
    }
}
