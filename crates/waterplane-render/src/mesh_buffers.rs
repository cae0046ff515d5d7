//! Upload of the surface grid into vertex and index buffers.

use waterplane_core::{GridMesh, Vertex};
use wgpu::util::DeviceExt;

/// Vertex attributes of [`Vertex`]: position, normal, texture coordinate.
const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
    wgpu::VertexAttribute {
        offset: Vertex::POSITION_OFFSET as wgpu::BufferAddress,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3,
    },
    wgpu::VertexAttribute {
        offset: Vertex::NORMAL_OFFSET as wgpu::BufferAddress,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32x3,
    },
    wgpu::VertexAttribute {
        offset: Vertex::TEX_COORD_OFFSET as wgpu::BufferAddress,
        shader_location: 2,
        format: wgpu::VertexFormat::Float32x2,
    },
];

/// Layout of the interleaved vertex stream, shared by every water pipeline.
pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: Vertex::STRIDE as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

/// Vertex, triangle index and edge index buffers of one surface mesh.
pub struct MeshBuffers {
    /// Interleaved vertex stream.
    pub vertex_buffer: wgpu::Buffer,
    /// Triangle list indices.
    pub index_buffer: wgpu::Buffer,
    /// Line list indices for wireframe drawing.
    pub edge_index_buffer: wgpu::Buffer,
    /// Number of triangle indices.
    pub num_indices: u32,
    /// Number of edge indices.
    pub num_edge_indices: u32,
}

impl MeshBuffers {
    /// Uploads the full vertex and index streams of `mesh`.
    ///
    /// Allocation failures surface through the device's uncaptured error handler.
    pub fn upload(device: &wgpu::Device, mesh: &GridMesh) -> Self {
        let edges = mesh.wireframe_indices();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Water Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Water Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        });

        let edge_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Water Edge Index Buffer"),
            contents: bytemuck::cast_slice(&edges),
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        });

        log::debug!(
            "uploaded water mesh: {} vertices, {} indices, {} edge indices",
            mesh.vertex_count(),
            mesh.indices.len(),
            edges.len()
        );

        Self {
            vertex_buffer,
            index_buffer,
            edge_index_buffer,
            num_indices: mesh.indices.len() as u32,
            num_edge_indices: edges.len() as u32,
        }
    }

    /// Frees the GPU memory of all three buffers.
    pub fn destroy(&self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
        self.edge_index_buffer.destroy();
    }
}
