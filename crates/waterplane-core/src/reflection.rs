//! Planar reflection utilities for the reflection and refraction scene passes.

use glam::{Mat4, Vec3, Vec4};

/// Reflection across the horizontal water plane `y = height`.
///
/// Keeps X and Z and maps `y` to `2 * height - y`.
pub fn water_reflection_matrix(height: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, 2.0 * height, 0.0))
        * Mat4::from_scale(Vec3::new(1.0, -1.0, 1.0))
}

/// View matrix for rendering the scene into the reflection target.
///
/// The world is mirrored across the water plane before the regular view is applied,
/// which flips triangle winding: the reflection pass must cull front faces or none.
pub fn reflected_view(view: Mat4, height: f32) -> Mat4 {
    view * water_reflection_matrix(height)
}

/// Camera position mirrored below the water plane.
pub fn reflected_camera_position(position: Vec3, height: f32) -> Vec3 {
    Vec3::new(position.x, 2.0 * height - position.y, position.z)
}

/// Clip plane `(a, b, c, d)` keeping geometry above the water (`dot(plane, p) >= 0`).
pub fn reflection_clip_plane(height: f32) -> Vec4 {
    Vec4::new(0.0, 1.0, 0.0, -height)
}

/// Clip plane keeping geometry below the water.
pub fn refraction_clip_plane(height: f32) -> Vec4 {
    Vec4::new(0.0, -1.0, 0.0, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_water_reflection_at_sea_level_flips_y() {
        let reflected = water_reflection_matrix(0.0).transform_point3(Vec3::new(1.0, 2.0, 3.0));
        assert!(reflected.abs_diff_eq(Vec3::new(1.0, -2.0, 3.0), 1e-5));
    }

    #[test]
    fn test_water_reflection_at_height() {
        let mat = water_reflection_matrix(1.0);

        // Distance from plane is 2, so reflected should be 2 below plane
        let reflected = mat.transform_point3(Vec3::new(0.0, 3.0, 0.0));
        assert!((reflected.y - (-1.0)).abs() < 0.001);
    }

    #[test]
    fn test_reflection_is_involution() {
        let mat = water_reflection_matrix(2.5);
        let double = mat * mat;
        assert!(double.abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }

    #[test]
    fn test_reflected_camera_matches_matrix() {
        let height = -3.0;
        let eye = Vec3::new(4.0, 10.0, -2.0);
        let by_matrix = water_reflection_matrix(height).transform_point3(eye);
        let direct = reflected_camera_position(eye, height);
        assert!(by_matrix.abs_diff_eq(direct, 1e-4));
    }

    #[test]
    fn test_reflected_view_sees_mirrored_point() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 5.0, 10.0), Vec3::ZERO, Vec3::Y);
        let point = Vec3::new(1.0, 2.0, 0.0);
        let mirrored = Vec3::new(1.0, -2.0, 0.0);
        let a = reflected_view(view, 0.0).transform_point3(point);
        let b = view.transform_point3(mirrored);
        assert!(a.abs_diff_eq(b, 1e-4));
    }

    #[test]
    fn test_clip_planes() {
        let height = 2.0;
        let above = Vec4::new(0.0, 3.0, 0.0, 1.0);
        let below = Vec4::new(0.0, 1.0, 0.0, 1.0);

        assert!(reflection_clip_plane(height).dot(above) > 0.0);
        assert!(reflection_clip_plane(height).dot(below) < 0.0);
        assert!(refraction_clip_plane(height).dot(below) > 0.0);
        assert!(refraction_clip_plane(height).dot(above) < 0.0);
    }
}
