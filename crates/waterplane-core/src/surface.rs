//! CPU-side state of a water surface: placement, draw mode and wave phase.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::WaterConfig;
use crate::frame::{FrameInputs, FrameUniforms};

/// How the surface mesh is rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrawMode {
    /// Filled, shaded triangles.
    #[default]
    Shaded,
    /// Triangle outlines only.
    Wireframe,
}

impl DrawMode {
    /// The other mode.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Shaded => Self::Wireframe,
            Self::Wireframe => Self::Shaded,
        }
    }
}

/// Placement and animation state of one water surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceState {
    transform: Mat4,
    wave_phase: f32,
    wave_speed: f32,
    draw_mode: DrawMode,
}

impl SurfaceState {
    /// Places a surface on the grid cell `(cell_x, cell_z)`.
    ///
    /// The translation is `(cell_x * size - size / 2, 0, cell_z * size - size / 2)`, so the
    /// mesh (which spans `[0, size]` locally) is centered on the cell origin.
    pub fn new(cell_x: i32, cell_z: i32, config: &WaterConfig) -> Self {
        Self {
            transform: Self::placement(cell_x, cell_z, config.surface_size),
            wave_phase: 0.0,
            wave_speed: config.wave_speed,
            draw_mode: DrawMode::default(),
        }
    }

    /// World transform for a surface of edge `size` on cell `(cell_x, cell_z)`.
    pub fn placement(cell_x: i32, cell_z: i32, size: f32) -> Mat4 {
        let half = size / 2.0;
        Mat4::from_translation(Vec3::new(
            cell_x as f32 * size - half,
            0.0,
            cell_z as f32 * size - half,
        ))
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// World-space translation of the surface.
    pub fn translation(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }

    /// Y of the water plane. The transform is never rotated.
    pub fn height(&self) -> f32 {
        self.transform.w_axis.y
    }

    /// Moves the water plane vertically, keeping its cell placement.
    pub fn set_height(&mut self, height: f32) {
        self.transform.w_axis.y = height;
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    /// Switches between shaded and wireframe drawing.
    pub fn toggle_draw_mode(&mut self) -> DrawMode {
        self.draw_mode = self.draw_mode.toggled();
        self.draw_mode
    }

    pub fn wave_phase(&self) -> f32 {
        self.wave_phase
    }

    pub fn wave_speed(&self) -> f32 {
        self.wave_speed
    }

    /// Advances the wave phase by `wave_speed * delta_time` and returns it.
    ///
    /// The phase accumulates without wrapping.
    pub fn advance_wave(&mut self, delta_time: f32) -> f32 {
        self.wave_phase += self.wave_speed * delta_time;
        self.wave_phase
    }

    /// Computes this frame's shader inputs, advancing the wave phase once.
    pub fn prepare_frame(&mut self, frame: &FrameInputs) -> FrameUniforms {
        let model = self.transform;
        let mvp = frame.projection * frame.view * model;
        let wave_factor = self.advance_wave(frame.delta_time);

        FrameUniforms {
            model,
            view: frame.view,
            projection: frame.projection,
            mvp,
            view_position: frame.camera_position,
            wave_factor,
        }
    }
}
