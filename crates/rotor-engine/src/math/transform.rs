use glam::{Mat4, Vec3};

/// Milliseconds in the "per minute" rotation speed unit.
pub const MS_PER_MINUTE: f64 = 60_000.0;

/// Rotation angle in radians after `elapsed_ms` of session time.
///
/// `angle = (elapsed_ms / 60000) * speed * π`, so `speed` is measured in
/// half-turns per minute. Computed in `f64` and narrowed once; there is no
/// wrapping to `[0, 2π)`, which keeps the angle a pure function of time.
#[inline]
pub fn rotation_angle(elapsed_ms: f64, speed: f32) -> f32 {
    ((elapsed_ms / MS_PER_MINUTE) * speed as f64 * std::f64::consts::PI) as f32
}

/// Rotation of `angle` radians about `axis`, starting from identity.
///
/// The axis is normalized here. A zero-length (or non-finite) axis yields
/// identity rather than NaN.
pub fn world_rotation(angle: f32, axis: Vec3) -> Mat4 {
    match axis.try_normalize() {
        Some(axis) => Mat4::from_axis_angle(axis, angle),
        None => Mat4::IDENTITY,
    }
}

/// World matrix for a placed object: translate by `offset`, then rotate.
pub fn object_world(offset: Vec3, angle: f32, axis: Vec3) -> Mat4 {
    Mat4::from_translation(offset) * world_rotation(angle, axis)
}

/// The world/view/projection triple uploaded to the transform uniform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub world: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

impl Transform {
    /// Identity world with the given view and projection.
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self {
            world: Mat4::IDENTITY,
            view,
            projection,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY)
    }
}
