//! Errors raised by the wgpu side of a water surface.

use thiserror::Error;

/// Failures while acquiring the device, building pipelines or reading frames back.
#[derive(Error, Debug)]
pub enum RenderError {
    /// No adapter matched the request (no GPU and no software fallback).
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// The adapter refused to open a device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// Missing source or WGSL the device rejected.
    #[error("shader compilation failed: {0}")]
    ShaderCompilationFailed(String),

    /// The shader source does not declare names the water surface binds by name.
    #[error("shader does not declare: {}", .0.join(", "))]
    UnresolvedShaderNames(Vec<String>),

    /// The device rejected a water pipeline.
    #[error("pipeline creation failed: {0}")]
    PipelineCreationFailed(String),

    /// Mapping a readback buffer failed.
    #[error("GPU buffer mapping failed")]
    BufferMapFailed,

    /// Failed to write an image file.
    #[error("image save failed: {0}")]
    ImageSaveFailed(#[from] image::ImageError),

    /// Pixel data does not match the image dimensions.
    #[error("invalid image data")]
    InvalidImageData,
}

/// Result alias for [`RenderError`].
pub type RenderResult<T> = std::result::Result<T, RenderError>;
