//! waterplane: a reflective water surface for wgpu scenes.
//!
//! A [`WaterSurface`] is a flat grid mesh placed on a world cell. It owns two
//! off-screen render targets, one for the scene reflected above the water and one
//! for the scene seen through it, plus a distortion ("dudv") texture that the
//! water shader scrolls over time to ripple both.
//!
//! # Frame flow
//!
//! 1. Render the scene above the water into [`WaterSurface::reflection_target`], using
//!    [`WaterSurface::reflection_view`] as the view matrix.
//! 2. Render the scene below the water into [`WaterSurface::refraction_target`].
//! 3. Draw the surface into the final image with [`WaterSurface::draw`].
//!
//! # Quick Start
//!
//! ```no_run
//! use waterplane::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let config = WaterConfig::default();
//!     let dudv = RasterImage::load_ppm_or_empty("textures/dudv.ppm");
//!     render_to_file("water.png", 800, 600, &config, &dudv, 60)?;
//!     Ok(())
//! }
//! ```

// Viewport sizes are small and converted to f32 on purpose
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod headless;
mod surface;

pub use headless::{render_to_file, render_to_image};
pub use surface::WaterSurface;

// Re-export core types
pub use waterplane_core::{
    error::{Result, WaterError},
    reflected_camera_position, reflected_view, reflection_clip_plane, refraction_clip_plane,
    DrawMode, FrameInputs, FrameUniforms, GridMesh, RasterError, RasterImage, SurfaceState,
    Vertex, WaterConfig, DEFAULT_GRID_RESOLUTION, DEFAULT_SURFACE_SIZE, DEFAULT_WAVE_SPEED,
    Mat4, Vec2, Vec3, Vec4,
};

// Re-export render types
pub use waterplane_render::{
    GpuContext, RenderError, RenderTarget, ShaderBuilder, WaterPipeline, WaterUniforms,
    TARGET_COLOR_FORMAT, TARGET_DEPTH_FORMAT, WATER_SHADER_NAMES,
};

/// Initializes `env_logger` once; later calls do nothing.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
