//! Rendering backend for waterplane.
//!
//! This crate provides the wgpu side of a water surface:
//! - GPU context acquisition and mesh buffer upload
//! - Reflection/refraction render targets and the distortion texture
//! - The water shader, name validation and pipelines
//! - The per-surface resource bundle and its draw call

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Mesh sizes are bounded by u32 indices
#![allow(clippy::cast_possible_truncation)]

pub mod capture;
pub mod error;
pub mod gpu;
pub mod mesh_buffers;
pub mod render_target;
pub mod shader;
pub mod texture;
pub mod water_pipeline;
pub mod water_render;

pub use capture::{read_texture_rgba8, save_png};
pub use error::{RenderError, RenderResult};
pub use gpu::GpuContext;
pub use mesh_buffers::{vertex_layout, MeshBuffers};
pub use render_target::{RenderTarget, TARGET_COLOR_FORMAT, TARGET_DEPTH_FORMAT};
pub use shader::{ShaderBuilder, WATER_SHADER_NAMES, WATER_SHADER_SOURCE};
pub use texture::DistortionTexture;
pub use water_pipeline::{
    WaterPipeline, DUDV_SAMPLER_SLOT, DUDV_TEXTURE_SLOT, REFLECTION_TEXTURE_SLOT,
    REFRACTION_TEXTURE_SLOT, TARGET_SAMPLER_SLOT,
};
pub use water_render::{WaterRenderData, WaterUniforms};
