//! GPU resources of one water surface and its draw call.

use glam::Mat4;
use waterplane_core::{DrawMode, FrameUniforms, GridMesh, RasterImage};
use wgpu::util::DeviceExt;

use crate::mesh_buffers::MeshBuffers;
use crate::render_target::RenderTarget;
use crate::texture::DistortionTexture;
use crate::water_pipeline::{
    WaterPipeline, DUDV_SAMPLER_SLOT, DUDV_TEXTURE_SLOT, REFLECTION_TEXTURE_SLOT,
    REFRACTION_TEXTURE_SLOT, TARGET_SAMPLER_SLOT,
};

/// GPU representation of the water uniforms.
/// Note: Layout must match WGSL `WaterUniforms` exactly (288 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct WaterUniforms {
    /// `MVP`
    pub mvp: [[f32; 4]; 4],
    /// `model`
    pub model: [[f32; 4]; 4],
    /// `view`
    pub view: [[f32; 4]; 4],
    /// `projection`
    pub projection: [[f32; 4]; 4],
    /// `viewPos`
    pub view_pos: [f32; 3],
    /// `waveFactor`
    pub wave_factor: f32,
    /// `distortionStrength`
    pub distortion_strength: f32,
    pub _padding: [f32; 3],
}

impl Default for WaterUniforms {
    fn default() -> Self {
        Self {
            mvp: Mat4::IDENTITY.to_cols_array_2d(),
            model: Mat4::IDENTITY.to_cols_array_2d(),
            view: Mat4::IDENTITY.to_cols_array_2d(),
            projection: Mat4::IDENTITY.to_cols_array_2d(),
            view_pos: [0.0; 3],
            wave_factor: 0.0,
            distortion_strength: 0.0,
            _padding: [0.0; 3],
        }
    }
}

impl WaterUniforms {
    pub fn new(frame: &FrameUniforms, distortion_strength: f32) -> Self {
        Self {
            mvp: frame.mvp.to_cols_array_2d(),
            model: frame.model.to_cols_array_2d(),
            view: frame.view.to_cols_array_2d(),
            projection: frame.projection.to_cols_array_2d(),
            view_pos: frame.view_position.to_array(),
            wave_factor: frame.wave_factor,
            distortion_strength,
            _padding: [0.0; 3],
        }
    }
}

/// Every GPU handle owned by one water surface.
///
/// Released exactly once, either by [`WaterRenderData::release`] or on drop.
pub struct WaterRenderData {
    /// Vertex, index and edge index buffers.
    pub mesh: MeshBuffers,
    /// Target the scene above the water is rendered into.
    pub reflection: RenderTarget,
    /// Target the scene below the water is rendered into.
    pub refraction: RenderTarget,
    /// Scrolling distortion map.
    pub distortion: DistortionTexture,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
    released: bool,
}

impl WaterRenderData {
    /// Uploads the mesh, allocates both render targets at `viewport` size and uploads
    /// the distortion image.
    ///
    /// Bind groups are created against `pipeline`'s layouts; draw with that pipeline or
    /// one built by [`WaterPipeline`] on the same device.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pipeline: &WaterPipeline,
        mesh: &GridMesh,
        viewport: (u32, u32),
        distortion_image: &RasterImage,
    ) -> Self {
        let mesh = MeshBuffers::upload(device, mesh);
        let reflection = RenderTarget::new(device, viewport.0, viewport.1, "Reflection");
        let refraction = RenderTarget::new(device, viewport.0, viewport.1, "Refraction");
        let distortion = DistortionTexture::new(device, queue, distortion_image);

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Water Uniform Buffer"),
            contents: bytemuck::cast_slice(&[WaterUniforms::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Water Uniform Bind Group"),
            layout: &pipeline.uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Water Texture Bind Group"),
            layout: &pipeline.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: REFLECTION_TEXTURE_SLOT,
                    resource: wgpu::BindingResource::TextureView(reflection.color_view()),
                },
                wgpu::BindGroupEntry {
                    binding: REFRACTION_TEXTURE_SLOT,
                    resource: wgpu::BindingResource::TextureView(refraction.color_view()),
                },
                wgpu::BindGroupEntry {
                    binding: DUDV_TEXTURE_SLOT,
                    resource: wgpu::BindingResource::TextureView(&distortion.view),
                },
                wgpu::BindGroupEntry {
                    binding: TARGET_SAMPLER_SLOT,
                    resource: wgpu::BindingResource::Sampler(reflection.sampler()),
                },
                wgpu::BindGroupEntry {
                    binding: DUDV_SAMPLER_SLOT,
                    resource: wgpu::BindingResource::Sampler(&distortion.sampler),
                },
            ],
        });

        Self {
            mesh,
            reflection,
            refraction,
            distortion,
            uniform_buffer,
            uniform_bind_group,
            texture_bind_group,
            released: false,
        }
    }

    /// Writes this frame's uniforms. Does nothing once released.
    pub fn update_uniforms(&self, queue: &wgpu::Queue, uniforms: &WaterUniforms) {
        if self.released {
            return;
        }
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[*uniforms]));
    }

    /// Records the draw of the surface into `pass`.
    ///
    /// Textures are bound at their slots on every call. After a wireframe draw the fill
    /// pipeline is set again so later draws in the pass do not inherit line rasterization.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, pipeline: &WaterPipeline, mode: DrawMode) {
        if self.released {
            log::debug!("skipping draw of released water render data");
            return;
        }

        pass.set_pipeline(pipeline.pipeline_for(mode));
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_bind_group(1, &self.texture_bind_group, &[]);
        pass.set_vertex_buffer(0, self.mesh.vertex_buffer.slice(..));

        match mode {
            DrawMode::Shaded => {
                pass.set_index_buffer(self.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..self.mesh.num_indices, 0, 0..1);
            }
            DrawMode::Wireframe => {
                pass.set_index_buffer(
                    self.mesh.edge_index_buffer.slice(..),
                    wgpu::IndexFormat::Uint32,
                );
                pass.draw_indexed(0..self.mesh.num_edge_indices, 0, 0..1);
                pass.set_pipeline(&pipeline.fill_pipeline);
            }
        }
    }

    /// Destroys the mesh buffers, both render targets, the distortion texture and the
    /// uniform buffer. Later calls do nothing.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.mesh.destroy();
        self.reflection.destroy();
        self.refraction.destroy();
        self.distortion.destroy();
        self.uniform_buffer.destroy();
        self.released = true;
        log::debug!("released water surface GPU resources");
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for WaterRenderData {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_water_uniforms_size() {
        // 4 matrices + viewPos + waveFactor + distortionStrength + padding to 16 bytes
        assert_eq!(std::mem::size_of::<WaterUniforms>(), 4 * 64 + 12 + 4 + 4 + 12);
        assert_eq!(std::mem::size_of::<WaterUniforms>() % 16, 0);
    }

    #[test]
    fn test_water_uniforms_default() {
        let uniforms = WaterUniforms::default();
        assert_eq!(uniforms.mvp, Mat4::IDENTITY.to_cols_array_2d());
        assert_eq!(uniforms.wave_factor, 0.0);
    }

    #[test]
    fn test_water_uniforms_from_frame() {
        let model = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let view = Mat4::look_at_rh(Vec3::new(0.0, 5.0, 5.0), Vec3::ZERO, Vec3::Y);
        let projection = Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0);
        let frame = FrameUniforms {
            model,
            view,
            projection,
            mvp: projection * view * model,
            view_position: Vec3::new(0.0, 5.0, 5.0),
            wave_factor: 0.42,
        };
        let uniforms = WaterUniforms::new(&frame, 0.02);
        assert_eq!(uniforms.model, model.to_cols_array_2d());
        assert_eq!(uniforms.mvp, frame.mvp.to_cols_array_2d());
        assert_eq!(uniforms.view_pos, [0.0, 5.0, 5.0]);
        assert_eq!(uniforms.wave_factor, 0.42);
        assert_eq!(uniforms.distortion_strength, 0.02);
    }
}
