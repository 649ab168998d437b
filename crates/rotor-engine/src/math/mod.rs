//! Transform helpers.
//!
//! Conventions (glam, right-handed):
//! - world matrices are rebuilt from identity every frame, never accumulated
//! - projection maps depth to `[0, 1]` as wgpu expects
//! - matrices are column-major, uploaded as `[[f32; 4]; 4]`

mod camera;
mod projection;
mod transform;

pub use camera::{CameraRig, CameraState, CAMERA_STEP};
pub use projection::{aspect_ratio, Projection};
pub use transform::{object_world, rotation_angle, world_rotation, Transform, MS_PER_MINUTE};
