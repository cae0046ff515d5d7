//! Error types for waterplane.

use thiserror::Error;

use crate::raster::RasterError;

/// The main error type for waterplane operations.
#[derive(Error, Debug)]
pub enum WaterError {
    /// Grid resolution below the two vertices per side a quad needs.
    #[error("grid resolution must be at least 2, got {0}")]
    InvalidResolution(u32),

    /// Grid resolution whose vertex count does not fit in 32-bit indices.
    #[error("grid resolution {0} produces more vertices than 32-bit indices can address")]
    MeshTooLarge(u32),

    /// Surface size that is not a positive finite number.
    #[error("surface size must be positive and finite, got {0}")]
    InvalidSurfaceSize(f32),

    /// Wave speed that is not a finite number.
    #[error("wave speed must be finite, got {0}")]
    InvalidWaveSpeed(f32),

    /// Failed to load the distortion image.
    #[error("image load error: {0}")]
    ImageLoad(#[from] RasterError),

    /// Rendering error.
    #[error("render error: {0}")]
    RenderError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for waterplane operations.
pub type Result<T> = std::result::Result<T, WaterError>;
