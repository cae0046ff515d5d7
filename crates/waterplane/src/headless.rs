//! Headless rendering API for waterplane.
//!
//! Renders a single water surface to an image buffer or file without opening a
//! window. Useful for integration tests and for previewing a configuration.

use std::path::Path;

use glam::Vec3;
use pollster::FutureExt;
use waterplane_core::{FrameInputs, RasterImage, Result, WaterConfig, WaterError};
use waterplane_render::{
    read_texture_rgba8, save_png, GpuContext, RenderTarget, WaterPipeline, TARGET_COLOR_FORMAT,
    TARGET_DEPTH_FORMAT,
};

use crate::surface::WaterSurface;

/// Clear color of the reflection target (sky).
const SKY_COLOR: wgpu::Color = wgpu::Color {
    r: 0.55,
    g: 0.75,
    b: 0.95,
    a: 1.0,
};

/// Clear color of the refraction target (water bed).
const BED_COLOR: wgpu::Color = wgpu::Color {
    r: 0.10,
    g: 0.30,
    b: 0.22,
    a: 1.0,
};

/// Clear color of the final image.
const BACKGROUND_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.03,
    a: 1.0,
};

/// Simulated seconds between frames.
const FRAME_DELTA: f32 = 1.0 / 60.0;

fn render_error(context: &str, e: impl std::fmt::Display) -> WaterError {
    WaterError::RenderError(format!("{context}: {e}"))
}

/// Renders `frames` frames of a water surface centered in view and returns the last one.
///
/// The reflection and refraction targets are cleared to flat sky and water-bed colors,
/// then the surface is drawn into an off-screen image of `width` x `height`.
/// The returned buffer holds `width * height * 4` RGBA bytes, row-by-row from the top.
/// A zero `width`, `height` or `frames` is rejected before any GPU work.
pub fn render_to_image(
    width: u32,
    height: u32,
    config: &WaterConfig,
    distortion_image: &RasterImage,
    frames: u32,
) -> Result<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(WaterError::RenderError(format!(
            "image size must be non-zero, got {width}x{height}"
        )));
    }
    if frames == 0 {
        return Err(WaterError::RenderError("at least one frame must be rendered".into()));
    }

    let gpu = GpuContext::new_headless()
        .block_on()
        .map_err(|e| render_error("failed to create headless context", e))?;

    let pipeline = WaterPipeline::new(&gpu.device, TARGET_COLOR_FORMAT, Some(TARGET_DEPTH_FORMAT))
        .map_err(|e| render_error("failed to create water pipeline", e))?;

    let mut surface = WaterSurface::new(
        &gpu,
        &pipeline,
        0,
        0,
        (width, height),
        config,
        distortion_image,
    )?;
    let screen = RenderTarget::new(&gpu.device, width, height, "Screen");

    let size = config.surface_size;
    let aspect = width as f32 / height as f32;
    let frame = FrameInputs::look_at(
        Vec3::new(0.0, size * 0.6, size * 0.9),
        Vec3::new(0.0, surface.height(), 0.0),
        std::f32::consts::FRAC_PI_3,
        aspect,
        FRAME_DELTA,
    );

    for _ in 0..frames {
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("water frame encoder"),
            });

        // Scene passes. There is no scene besides the water, so they only clear.
        drop(surface.reflection_target().begin_pass(&mut encoder, SKY_COLOR));
        drop(surface.refraction_target().begin_pass(&mut encoder, BED_COLOR));

        {
            let mut pass = screen.begin_pass(&mut encoder, BACKGROUND_COLOR);
            surface.draw(&gpu.queue, &mut pass, &pipeline, &frame);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
    }

    log::debug!(
        "rendered {frames} headless frame(s), wave phase {}",
        surface.wave_phase()
    );

    read_texture_rgba8(&gpu.device, &gpu.queue, screen.color_texture())
        .map_err(|e| render_error("failed to read back frame", e))
}

/// Renders like [`render_to_image`] and saves the result as a PNG file.
pub fn render_to_file(
    path: impl AsRef<Path>,
    width: u32,
    height: u32,
    config: &WaterConfig,
    distortion_image: &RasterImage,
    frames: u32,
) -> Result<()> {
    let pixels = render_to_image(width, height, config, distortion_image, frames)?;
    save_png(path.as_ref(), &pixels, width, height)
        .map_err(|e| render_error("failed to save image", e))?;
    log::info!("saved water render to {}", path.as_ref().display());
    Ok(())
}
