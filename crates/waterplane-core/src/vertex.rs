//! Interleaved vertex format shared by the mesh builder and the GPU upload.

use std::mem::{offset_of, size_of};

use glam::Vec3;

/// One vertex of the water surface mesh.
///
/// Layout must match the vertex attributes declared by the water shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Byte distance between consecutive vertices.
    pub const STRIDE: usize = size_of::<Self>();
    /// Byte offset of the position attribute.
    pub const POSITION_OFFSET: usize = offset_of!(Self, position);
    /// Byte offset of the normal attribute.
    pub const NORMAL_OFFSET: usize = offset_of!(Self, normal);
    /// Byte offset of the texture coordinate attribute.
    pub const TEX_COORD_OFFSET: usize = offset_of!(Self, tex_coord);

    /// Normal shared by every vertex of a flat surface.
    pub const UP: [f32; 3] = [0.0, 1.0, 0.0];

    /// Creates a vertex on the flat surface with an upward normal.
    pub fn flat(position: Vec3, tex_coord: [f32; 2]) -> Self {
        Self {
            position: position.to_array(),
            normal: Self::UP,
            tex_coord,
        }
    }
}
