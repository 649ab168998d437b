use glam::{IVec3, Mat4, Vec3};

use crate::input::{Direction, Movement};

/// Distance the camera moves per frame for each held direction.
pub const CAMERA_STEP: f32 = 0.2;

/// Fixed camera parameters: where it starts, where it looks, and how far one
/// step moves it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraRig {
    pub origin: Vec3,
    /// Look direction (look-to convention); need not be normalized.
    pub look_dir: Vec3,
    pub up: Vec3,
    pub step: f32,
}

impl CameraRig {
    /// Camera at `origin` looking down -Z with +Y up.
    pub fn looking_down_z(origin: Vec3) -> Self {
        Self {
            origin,
            look_dir: Vec3::NEG_Z,
            up: Vec3::Y,
            step: CAMERA_STEP,
        }
    }

    /// Current eye position.
    ///
    /// Computed from whole step counts, so holding a key for N frames lands
    /// exactly on `origin + N * step` instead of accumulating rounding error.
    pub fn position(&self, state: &CameraState) -> Vec3 {
        self.origin + state.steps.as_vec3() * self.step
    }

    /// View matrix for the current eye position (look-from / look-to / up).
    pub fn view(&self, state: &CameraState) -> Mat4 {
        Mat4::look_to_rh(self.position(state), self.look_dir, self.up)
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::looking_down_z(Vec3::new(0.0, 0.0, 5.0))
    }
}

/// Integrated camera offset, in whole steps along each axis.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct CameraState {
    pub steps: IVec3,
}

impl CameraState {
    /// Applies one frame of movement: one step per held direction.
    ///
    /// Opposite directions held together cancel out.
    pub fn integrate(self, movement: Movement) -> Self {
        let delta = Direction::ALL
            .into_iter()
            .filter(|d| movement.held(*d))
            .map(step_offset)
            .fold(IVec3::ZERO, |acc, d| acc + d);

        Self {
            steps: self.steps + delta,
        }
    }
}

fn step_offset(direction: Direction) -> IVec3 {
    match direction {
        Direction::Forward => IVec3::new(0, 0, -1),
        Direction::Back => IVec3::new(0, 0, 1),
        Direction::Left => IVec3::new(-1, 0, 0),
        Direction::Right => IVec3::new(1, 0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(dirs: &[Direction]) -> Movement {
        let mut m = Movement::default();
        for d in dirs {
            m.set(*d, true);
        }
        m
    }

    #[test]
    fn holding_forward_moves_minus_step_per_frame() {
        let rig = CameraRig::default();
        let mut state = CameraState::default();
        let n = 37;
        for _ in 0..n {
            state = state.integrate(holding(&[Direction::Forward]));
        }

        assert_eq!(state.steps, IVec3::new(0, 0, -n));
        let pos = rig.position(&state);
        assert_eq!(pos.z, 5.0 + (-(n as f32)) * 0.2);
        assert!((pos.z - 5.0 - (-0.2 * n as f32)).abs() < 1e-5);
        assert_eq!(pos.x, 0.0);
    }

    #[test]
    fn no_input_leaves_camera_in_place() {
        let state = CameraState::default().integrate(Movement::default());
        assert_eq!(state, CameraState::default());
    }

    #[test]
    fn opposite_directions_cancel() {
        let state = CameraState::default()
            .integrate(holding(&[Direction::Left, Direction::Right, Direction::Forward]));
        assert_eq!(state.steps, IVec3::new(0, 0, -1));
    }

    #[test]
    fn view_places_origin_in_front_of_camera() {
        let rig = CameraRig::default();
        let view = rig.view(&CameraState::default());

        // World origin is 5 units ahead, i.e. at -Z in view space.
        let p = view.transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-6));
    }

    #[test]
    fn moving_right_shifts_scene_left_in_view() {
        let rig = CameraRig::default();
        let state = CameraState::default().integrate(holding(&[Direction::Right]));
        let p = rig.view(&state).transform_point3(Vec3::ZERO);
        assert!((p.x + 0.2).abs() < 1e-6);
    }
}
