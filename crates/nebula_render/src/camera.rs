//! Fixed perspective camera
//!
//! The animation is viewed from a fixed point on the +Z axis looking at
//! the origin. The camera's distance to the origin doubles as the scalar
//! the simulation uses to project particles into pointer space.

use nebula_math::{mat4, Mat4};

/// Perspective camera at (0, 0, distance) looking down -Z
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    /// Distance from the viewpoint to the origin
    pub distance: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            distance: 5.0,
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// Combined view-projection matrix for the given aspect ratio
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let proj = mat4::perspective(self.fov.to_radians(), aspect, self.near, self.far);
        let view = mat4::translation(0.0, 0.0, -self.distance);
        mat4::mul(proj, view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_math::Vec3;

    #[test]
    fn test_origin_projects_to_screen_center() {
        let camera = Camera::default();
        let clip = mat4::transform_point(camera.view_proj(16.0 / 9.0), Vec3::ZERO);
        assert!(clip.x.abs() < 1e-5);
        assert!(clip.y.abs() < 1e-5);
        assert!(clip.z > 0.0 && clip.z < 1.0);
    }

    #[test]
    fn test_right_of_center_projects_right() {
        let camera = Camera::default();
        let clip = mat4::transform_point(camera.view_proj(1.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(clip.x > 0.0);
    }
}
