//! Render pipelines for drawing water surfaces.

use std::num::NonZeroU64;

use pollster::FutureExt;
use waterplane_core::DrawMode;

use crate::error::{RenderError, RenderResult};
use crate::mesh_buffers::vertex_layout;
use crate::shader::{ShaderBuilder, WATER_SHADER_NAMES, WATER_SHADER_SOURCE};
use crate::water_render::WaterUniforms;

/// Texture slot of the reflection target.
pub const REFLECTION_TEXTURE_SLOT: u32 = 0;
/// Texture slot of the refraction target.
pub const REFRACTION_TEXTURE_SLOT: u32 = 1;
/// Texture slot of the distortion texture.
pub const DUDV_TEXTURE_SLOT: u32 = 2;
/// Sampler slot shared by the reflection and refraction targets.
pub const TARGET_SAMPLER_SLOT: u32 = 3;
/// Sampler slot of the distortion texture.
pub const DUDV_SAMPLER_SLOT: u32 = 4;

/// The shader program used to draw water surfaces, one pipeline per draw mode.
pub struct WaterPipeline {
    /// Filled triangles.
    pub fill_pipeline: wgpu::RenderPipeline,
    /// Triangle edges as lines.
    pub wireframe_pipeline: wgpu::RenderPipeline,
    /// Group 0: water uniforms.
    pub uniform_bind_group_layout: wgpu::BindGroupLayout,
    /// Group 1: reflection, refraction and distortion textures with their samplers.
    pub texture_bind_group_layout: wgpu::BindGroupLayout,
}

impl WaterPipeline {
    /// Builds the pipelines from the bundled water shader.
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
    ) -> RenderResult<Self> {
        Self::from_source(device, WATER_SHADER_SOURCE, color_format, depth_format)
    }

    /// Builds the pipelines from caller-supplied WGSL.
    ///
    /// The source must declare every name in [`WATER_SHADER_NAMES`] and the `vs_main` and
    /// `fs_main` entry points; otherwise [`RenderError::UnresolvedShaderNames`] is returned
    /// before anything is compiled.
    pub fn from_source(
        device: &wgpu::Device,
        source: &str,
        color_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
    ) -> RenderResult<Self> {
        let builder = ShaderBuilder::new()
            .with_source(source)
            .with_label("Water Shader")
            .require_names(WATER_SHADER_NAMES);
        let shader = builder.build_module(device)?;

        let uniform_bind_group_layout = create_uniform_bind_group_layout(device);
        let texture_bind_group_layout = create_texture_bind_group_layout(device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Water Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout, &texture_bind_group_layout],
            push_constant_ranges: &[],
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let create = |label: &str, topology: wgpu::PrimitiveTopology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(builder.vertex_entry()),
                    buffers: &[vertex_layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(builder.fragment_entry()),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: color_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
                    format,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let fill_pipeline = create("Water Fill Pipeline", wgpu::PrimitiveTopology::TriangleList);
        let wireframe_pipeline =
            create("Water Wireframe Pipeline", wgpu::PrimitiveTopology::LineList);

        if let Some(error) = device.pop_error_scope().block_on() {
            return Err(RenderError::PipelineCreationFailed(error.to_string()));
        }

        log::debug!("created water pipelines for {color_format:?}");

        Ok(Self {
            fill_pipeline,
            wireframe_pipeline,
            uniform_bind_group_layout,
            texture_bind_group_layout,
        })
    }

    /// The pipeline that rasterizes `mode`.
    pub fn pipeline_for(&self, mode: DrawMode) -> &wgpu::RenderPipeline {
        match mode {
            DrawMode::Shaded => &self.fill_pipeline,
            DrawMode::Wireframe => &self.wireframe_pipeline,
        }
    }
}

fn create_uniform_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Water Uniform Bind Group Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(std::mem::size_of::<WaterUniforms>() as u64),
            },
            count: None,
        }],
    })
}

fn create_texture_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let texture_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    };
    let sampler_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    };

    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Water Texture Bind Group Layout"),
        entries: &[
            texture_entry(REFLECTION_TEXTURE_SLOT),
            texture_entry(REFRACTION_TEXTURE_SLOT),
            texture_entry(DUDV_TEXTURE_SLOT),
            sampler_entry(TARGET_SAMPLER_SLOT),
            sampler_entry(DUDV_SAMPLER_SLOT),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_slots_are_consecutive() {
        assert_eq!(REFLECTION_TEXTURE_SLOT, 0);
        assert_eq!(REFRACTION_TEXTURE_SLOT, REFLECTION_TEXTURE_SLOT + 1);
        assert_eq!(DUDV_TEXTURE_SLOT, REFRACTION_TEXTURE_SLOT + 1);
    }
}
