use bytemuck::{Pod, Zeroable};

use crate::math::Transform;
use crate::scene::LightingState;

/// Matches WGSL `struct Transforms { mWorld, mView, mProjection }`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TransformUniform {
    pub world: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl From<&Transform> for TransformUniform {
    fn from(t: &Transform) -> Self {
        Self {
            world: t.world.to_cols_array_2d(),
            view: t.view.to_cols_array_2d(),
            projection: t.projection.to_cols_array_2d(),
        }
    }
}

/// Matches WGSL `struct Lighting { ambient, lightDirection, lightColor }`.
///
/// Each `vec3<f32>` is 16-byte aligned in the uniform address space.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LightingUniform {
    pub ambient: [f32; 3],
    _pad0: f32,
    pub light_direction: [f32; 3],
    _pad1: f32,
    pub light_color: [f32; 3],
    _pad2: f32,
}

impl From<&LightingState> for LightingUniform {
    fn from(l: &LightingState) -> Self {
        Self {
            ambient: l.ambient.to_array(),
            _pad0: 0.0,
            light_direction: l.normalized_direction().to_array(),
            _pad1: 0.0,
            light_color: l.light_color.to_array(),
            _pad2: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};

    #[test]
    fn sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<TransformUniform>(), 192);
        assert_eq!(std::mem::size_of::<LightingUniform>(), 48);
    }

    #[test]
    fn transform_is_column_major() {
        let mut t = Transform::default();
        t.world = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let u = TransformUniform::from(&t);
        assert_eq!(u.world[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(u.view, Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn lighting_direction_is_normalized() {
        let l = LightingState {
            light_direction: Vec3::new(0.0, 0.0, -4.0),
            ..LightingState::default()
        };
        let u = LightingUniform::from(&l);
        assert_eq!(u.light_direction, [0.0, 0.0, -1.0]);
        assert_eq!(u.ambient, [0.2, 0.2, 0.2]);
    }

    #[test]
    fn lighting_bytes_place_fields_at_16_byte_offsets() {
        let u = LightingUniform::from(&LightingState::default());
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&u));
        assert_eq!(&floats[0..3], &u.ambient);
        assert_eq!(&floats[4..7], &u.light_direction);
        assert_eq!(&floats[8..11], &u.light_color);
    }
}
