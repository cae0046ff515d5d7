//! Core abstractions for waterplane.
//!
//! This crate holds everything about a water surface that does not need a GPU:
//! - [`Vertex`] and the [`GridMesh`] builder for the flat surface mesh
//! - [`RasterImage`], a minimal PPM reader/writer for the distortion texture
//! - [`SurfaceState`], the per-surface placement, draw mode and wave phase
//! - [`WaterConfig`] and the planar reflection helpers used by the scene passes

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Grid coordinates are small and converted to f32 on purpose
#![allow(clippy::cast_precision_loss)]

pub mod config;
pub mod error;
pub mod frame;
pub mod grid;
pub mod raster;
pub mod reflection;
pub mod surface;
pub mod vertex;

pub use config::{WaterConfig, DEFAULT_GRID_RESOLUTION, DEFAULT_SURFACE_SIZE, DEFAULT_WAVE_SPEED};
pub use error::{Result, WaterError};
pub use frame::{FrameInputs, FrameUniforms};
pub use grid::{GridMesh, MAX_GRID_VERTICES};
pub use raster::{RasterError, RasterImage};
pub use reflection::{
    reflected_camera_position, reflected_view, reflection_clip_plane, refraction_clip_plane,
    water_reflection_matrix,
};
pub use surface::{DrawMode, SurfaceState};
pub use vertex::Vertex;

// Re-export glam types for convenience
pub use glam::{Mat4, Vec2, Vec3, Vec4};
