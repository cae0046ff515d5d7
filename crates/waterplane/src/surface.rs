//! The water surface entity.

use glam::Mat4;
use waterplane_core::{
    reflected_view, DrawMode, FrameInputs, GridMesh, RasterImage, Result, SurfaceState,
    WaterConfig,
};
use waterplane_render::{GpuContext, RenderTarget, WaterPipeline, WaterRenderData, WaterUniforms};

/// One placed water surface: its state and every GPU resource it owns.
///
/// GPU resources are released when the surface is dropped, or earlier through
/// [`WaterSurface::release`].
pub struct WaterSurface {
    state: SurfaceState,
    render_data: WaterRenderData,
    distortion_strength: f32,
}

impl WaterSurface {
    /// Creates a surface on grid cell `(cell_x, cell_z)`.
    ///
    /// Builds and uploads the grid mesh, allocates the reflection and refraction targets at
    /// `viewport` size, and uploads `distortion_image` (an empty image gives an undistorted
    /// surface).
    pub fn new(
        gpu: &GpuContext,
        pipeline: &WaterPipeline,
        cell_x: i32,
        cell_z: i32,
        viewport: (u32, u32),
        config: &WaterConfig,
        distortion_image: &RasterImage,
    ) -> Result<Self> {
        config.validate()?;
        let mesh = GridMesh::build(config.grid_resolution, config.surface_size)?;
        let state = SurfaceState::new(cell_x, cell_z, config);
        let render_data = WaterRenderData::new(
            &gpu.device,
            &gpu.queue,
            pipeline,
            &mesh,
            viewport,
            distortion_image,
        );

        log::info!(
            "created water surface at cell ({cell_x}, {cell_z}), height {}",
            state.height()
        );

        Ok(Self {
            state,
            render_data,
            distortion_strength: config.distortion_strength,
        })
    }

    /// Like [`WaterSurface::new`], reading the distortion image from `config.dudv_path`.
    ///
    /// A missing or unreadable file is logged and treated as no distortion data.
    pub fn from_config(
        gpu: &GpuContext,
        pipeline: &WaterPipeline,
        cell_x: i32,
        cell_z: i32,
        viewport: (u32, u32),
        config: &WaterConfig,
    ) -> Result<Self> {
        let image = config
            .dudv_path
            .as_ref()
            .map_or_else(RasterImage::empty, RasterImage::load_ppm_or_empty);
        Self::new(gpu, pipeline, cell_x, cell_z, viewport, config, &image)
    }

    /// Advances the wave phase, writes this frame's uniforms and records the draw.
    ///
    /// Call once per frame, after the reflection and refraction targets have been
    /// rendered and while `pass` targets the final image. A released surface records
    /// nothing and keeps its wave phase.
    pub fn draw(
        &mut self,
        queue: &wgpu::Queue,
        pass: &mut wgpu::RenderPass<'_>,
        pipeline: &WaterPipeline,
        frame: &FrameInputs,
    ) {
        if self.render_data.is_released() {
            log::warn!("skipping draw of a released water surface");
            return;
        }
        let frame_uniforms = self.state.prepare_frame(frame);
        self.render_data.update_uniforms(
            queue,
            &WaterUniforms::new(&frame_uniforms, self.distortion_strength),
        );
        self.render_data.draw(pass, pipeline, self.state.draw_mode());
    }

    /// Switches between shaded and wireframe drawing.
    pub fn toggle_draw_mode(&mut self) -> DrawMode {
        self.state.toggle_draw_mode()
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.state.draw_mode()
    }

    /// Y of the water plane.
    pub fn height(&self) -> f32 {
        self.state.height()
    }

    pub fn set_height(&mut self, height: f32) {
        self.state.set_height(height);
    }

    pub fn wave_phase(&self) -> f32 {
        self.state.wave_phase()
    }

    pub fn state(&self) -> &SurfaceState {
        &self.state
    }

    /// View matrix for the reflection pass, mirrored across this surface's plane.
    pub fn reflection_view(&self, view: Mat4) -> Mat4 {
        reflected_view(view, self.state.height())
    }

    /// Render the scene above the water into this target before drawing the surface.
    pub fn reflection_target(&self) -> &RenderTarget {
        &self.render_data.reflection
    }

    /// Render the scene below the water into this target before drawing the surface.
    pub fn refraction_target(&self) -> &RenderTarget {
        &self.render_data.refraction
    }

    /// Size of the uploaded distortion texture.
    pub fn distortion_dimensions(&self) -> (u32, u32) {
        self.render_data.distortion.dimensions()
    }

    /// Releases every GPU resource now. Drawing afterwards records and writes nothing.
    pub fn release(&mut self) {
        self.render_data.release();
    }

    pub fn is_released(&self) -> bool {
        self.render_data.is_released()
    }
}
