//! Per-frame inputs supplied by the host application, and the values derived from them.

use glam::{Mat4, Vec3};

/// Camera and timing state polled from the window/context layer each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInputs {
    pub view: Mat4,
    pub projection: Mat4,
    /// Camera position in world space.
    pub camera_position: Vec3,
    /// Seconds since the previous frame.
    pub delta_time: f32,
}

impl Default for FrameInputs {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            camera_position: Vec3::ZERO,
            delta_time: 0.0,
        }
    }
}

impl FrameInputs {
    /// Builds inputs for a camera at `eye` looking at `target`, Y up, right-handed.
    pub fn look_at(eye: Vec3, target: Vec3, fov_y: f32, aspect: f32, delta_time: f32) -> Self {
        Self {
            view: Mat4::look_at_rh(eye, target, Vec3::Y),
            projection: Mat4::perspective_rh(fov_y, aspect, 0.1, 1000.0),
            camera_position: eye,
            delta_time,
        }
    }
}

/// Shader inputs for one draw of a water surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    /// `projection * view * model`.
    pub mvp: Mat4,
    pub view_position: Vec3,
    /// Wave phase after this frame's advance.
    pub wave_factor: f32,
}
