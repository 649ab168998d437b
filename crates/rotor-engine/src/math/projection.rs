use glam::Mat4;

/// Aspect ratio of a drawable, or `None` when it is degenerate.
///
/// A zero width or height (minimized window, collapsed surface) would put
/// NaN or infinity into the projection, so callers keep their previous
/// projection instead.
pub fn aspect_ratio(width: u32, height: u32) -> Option<f32> {
    if width == 0 || height == 0 {
        return None;
    }
    Some(width as f32 / height as f32)
}

/// Perspective projection parameters, fixed per demo.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub const fn new(fov_y_degrees: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y_degrees,
            near,
            far,
        }
    }

    /// Right-handed perspective matrix with `[0, 1]` clip depth.
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), aspect, self.near, self.far)
    }

    /// Projection for a drawable of `width x height` pixels, if its aspect is valid.
    pub fn for_size(&self, width: u32, height: u32) -> Option<Mat4> {
        aspect_ratio(width, height).map(|aspect| self.matrix(aspect))
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(60.0, 1.0, 10.0)
    }
}
