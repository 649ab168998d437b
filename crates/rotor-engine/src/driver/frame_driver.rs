use glam::{Mat4, Vec3};

use super::config::{DemoConfig, Motion};
use super::plan::{DrawCall, FramePlan};
use super::state::SessionState;
use crate::input::{InputState, KeyBindings, Movement};
use crate::math::{object_world, rotation_angle, world_rotation, CameraRig};
use crate::scene::{Color, GeometryBuffer};
use crate::time::FrameTime;

/// Turns elapsed time and input into a [`FramePlan`], once per refresh.
///
/// Holds the CPU copy of the base geometry so recolored or scaled copies can
/// be produced for upload. Angles depend only on elapsed session time; the
/// camera moves a fixed step per frame per held direction.
pub struct FrameDriver {
    motion: Motion,
    camera: Option<CameraRig>,
    fixed_view: Mat4,
    clear: Color,
    palette: Vec<Color>,
    key_bindings: KeyBindings,
    base: GeometryBuffer,
}

impl FrameDriver {
    pub fn new(config: &DemoConfig, base: GeometryBuffer) -> Self {
        if !config.palette.is_empty() && base.colors().is_none() {
            log::warn!(
                "demo '{}' has a palette but its geometry carries no colors; clicks will be ignored",
                config.name
            );
        }
        Self {
            motion: config.motion.clone(),
            camera: config.camera,
            fixed_view: config.view.matrix(),
            clear: config.clear_color,
            palette: config.palette.clone(),
            key_bindings: config.key_bindings.clone(),
            base,
        }
    }

    pub fn initial_state(&self) -> SessionState {
        SessionState::default()
    }

    pub fn base(&self) -> &GeometryBuffer {
        &self.base
    }

    /// Advances one frame.
    ///
    /// Input is read once, at the top of the tick. Returns the next session
    /// state together with the work for this frame.
    pub fn tick(
        &mut self,
        state: SessionState,
        time: &FrameTime,
        input: &InputState,
    ) -> (SessionState, FramePlan) {
        let mut next = state;
        next.frames += 1;

        let movement = Movement::sample(input, &self.key_bindings);
        let recolored = self.apply_clicks(&mut next, input.clicks);

        let elapsed_ms = time.elapsed_ms();
        let count = self.base.draw_count();
        let draws: Vec<DrawCall> = match &self.motion {
            Motion::Spin(spin) => {
                let angle = rotation_angle(elapsed_ms, spin.speed);
                next.angles = vec![angle];
                vec![DrawCall {
                    world: world_rotation(angle, spin.axis),
                    upload: recolored.then(|| self.base.interleaved()),
                    count,
                }]
            }
            Motion::Objects(objects) => {
                next.angles = objects
                    .iter()
                    .map(|o| rotation_angle(elapsed_ms, o.spin.speed))
                    .collect();
                objects
                    .iter()
                    .zip(&next.angles)
                    .map(|(o, angle)| DrawCall {
                        world: object_world(o.offset, *angle, o.spin.axis),
                        upload: Some(self.base.scaled(o.scale).interleaved()),
                        count,
                    })
                    .collect()
            }
        };

        let view = match &self.camera {
            Some(rig) => {
                next.camera = next.camera.integrate(movement);
                rig.view(&next.camera)
            }
            None => self.fixed_view,
        };

        log::trace!(
            "frame {} t={:.1}ms draws={} camera={:?}",
            next.frames,
            elapsed_ms,
            draws.len(),
            next.camera.steps
        );

        (
            next,
            FramePlan {
                clear: self.clear,
                view,
                draws,
            },
        )
    }

    /// Applies clicks not yet seen to the palette. Returns whether the base
    /// geometry's colors changed.
    fn apply_clicks(&mut self, state: &mut SessionState, clicks: u32) -> bool {
        if clicks == state.clicks {
            return false;
        }
        state.clicks = clicks;
        if self.palette.is_empty() || clicks == 0 {
            return false;
        }

        let index = (clicks as usize - 1) % self.palette.len();
        let color = self.palette[index];
        match self.base.fill_color(color) {
            Ok(()) => {
                state.palette_index = Some(index);
                log::debug!("recolored to palette entry {index}: {color:?}");
                true
            }
            Err(_) => false,
        }
    }

    /// Camera eye for `state`, when the demo has a camera.
    pub fn camera_position(&self, state: &SessionState) -> Option<Vec3> {
        self.camera.as_ref().map(|rig| rig.position(&state.camera))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::driver::{ObjectDescriptor, Spin};
    use crate::input::{ButtonState, InputEvent, Key, KeyState, MouseButton};
    use crate::render::ShaderSource;
    use crate::scene::{shapes, DrawCount};

    fn shaders() -> ShaderSource {
        ShaderSource::new("test", "", "")
    }

    fn at_ms(ms: u64, frame: u64) -> FrameTime {
        FrameTime::at(Duration::from_millis(ms), frame)
    }

    fn three_cubes() -> DemoConfig {
        let geometry = shapes::color_box(&shapes::FACE_COLORS);
        DemoConfig::new("cubes", shaders(), geometry).with_objects(vec![
            ObjectDescriptor {
                offset: Vec3::new(-2.0, 0.0, 0.0),
                scale: 0.2,
                spin: Spin::new(90.0, Vec3::Y),
            },
            ObjectDescriptor {
                offset: Vec3::ZERO,
                scale: 0.7,
                spin: Spin::new(70.0, Vec3::X),
            },
            ObjectDescriptor {
                offset: Vec3::new(2.0, 0.0, 0.0),
                scale: 0.4,
                spin: Spin::new(25.0, Vec3::new(1.0, 0.0, 1.0)),
            },
        ])
    }

    fn driver(config: &DemoConfig) -> FrameDriver {
        let base = config.geometry.resolve().unwrap();
        FrameDriver::new(config, base)
    }

    fn click(input: &mut InputState) {
        for state in [ButtonState::Pressed, ButtonState::Released] {
            input.apply_event(&InputEvent::MouseButton {
                button: MouseButton::Left,
                state,
            });
        }
    }

    // ── spin ────────────────────────────────────────────────────────────

    #[test]
    fn spin_issues_one_draw_without_upload() {
        let config = DemoConfig::new("tri", shaders(), shapes::triangle()).with_spin(23.0, Vec3::Y);
        let mut d = driver(&config);
        let (state, plan) = d.tick(d.initial_state(), &at_ms(1000, 0), &InputState::default());

        assert_eq!(plan.draws.len(), 1);
        assert_eq!(plan.upload_count(), 0);
        assert_eq!(plan.draws[0].count, DrawCount::Vertices(3));
        assert_eq!(plan.clear, Color::CANVAS);
        assert_eq!(state.frames, 1);
        assert_eq!(state.angles, vec![rotation_angle(1000.0, 23.0)]);
    }

    #[test]
    fn same_elapsed_time_gives_identical_world() {
        let config = three_cubes();
        let mut a = driver(&config);
        let mut b = driver(&config);
        let input = InputState::default();

        // different histories, same timestamp
        let (s, _) = a.tick(a.initial_state(), &at_ms(16, 0), &input);
        let (_, pa) = a.tick(s, &at_ms(5000, 1), &input);
        let (_, pb) = b.tick(b.initial_state(), &at_ms(5000, 0), &input);

        for (x, y) in pa.draws.iter().zip(&pb.draws) {
            assert_eq!(x.world.to_cols_array(), y.world.to_cols_array());
        }
    }

    #[test]
    fn world_is_rebuilt_not_accumulated() {
        let config = DemoConfig::new("tri", shaders(), shapes::triangle()).with_spin(90.0, Vec3::Y);
        let mut d = driver(&config);
        let input = InputState::default();
        let mut state = d.initial_state();
        for i in 0..10 {
            state = d.tick(state, &at_ms(i * 16, i), &input).0;
        }
        let (_, plan) = d.tick(state, &at_ms(2000, 10), &input);
        let expected = world_rotation(rotation_angle(2000.0, 90.0), Vec3::Y);
        assert_eq!(plan.draws[0].world, expected);
    }

    // ── objects ─────────────────────────────────────────────────────────

    #[test]
    fn three_cubes_upload_scaled_copies_before_each_draw() {
        let config = three_cubes();
        let mut d = driver(&config);
        let base = d.base().clone();
        let (_, plan) = d.tick(d.initial_state(), &at_ms(500, 0), &InputState::default());

        assert_eq!(plan.draws.len(), 3);
        assert_eq!(plan.upload_count(), 3);
        for (draw, scale) in plan.draws.iter().zip([0.2, 0.7, 0.4]) {
            assert_eq!(draw.count, DrawCount::Indexed(36));
            assert_eq!(draw.upload.as_ref(), Some(&base.scaled(scale).interleaved()));
        }
    }

    #[test]
    fn object_world_translates_then_rotates() {
        let config = three_cubes();
        let mut d = driver(&config);
        let (state, plan) = d.tick(d.initial_state(), &at_ms(750, 0), &InputState::default());

        assert_eq!(state.angles.len(), 3);
        let left = &plan.draws[0];
        assert_eq!(left.world, object_world(Vec3::new(-2.0, 0.0, 0.0), state.angles[0], Vec3::Y));
        // translation column is untouched by the rotation
        assert_eq!(left.world.w_axis.truncate(), Vec3::new(-2.0, 0.0, 0.0));
    }

    // ── camera ──────────────────────────────────────────────────────────

    #[test]
    fn holding_forward_moves_camera_by_step_per_frame() {
        let config = DemoConfig::new("cam", shaders(), shapes::color_box(&shapes::FACE_COLORS))
            .with_camera(CameraRig::default());
        let mut d = driver(&config);
        let mut input = InputState::default();
        input.apply_event(&InputEvent::Key {
            key: Key::W,
            state: KeyState::Pressed,
            repeat: false,
        });

        let start = d.camera_position(&d.initial_state()).unwrap();
        let mut state = d.initial_state();
        let n = 7;
        for i in 0..n {
            state = d.tick(state, &at_ms(i * 16, i), &input).0;
        }
        let end = d.camera_position(&state).unwrap();
        assert!((end.z - (start.z - 0.2 * n as f32)).abs() < 1e-5);
        assert_eq!(end.x, start.x);
    }

    #[test]
    fn camera_view_tracks_position() {
        let rig = CameraRig::default();
        let config = DemoConfig::new("cam", shaders(), shapes::triangle()).with_camera(rig);
        let mut d = driver(&config);
        let mut input = InputState::default();
        input.apply_event(&InputEvent::Key {
            key: Key::D,
            state: KeyState::Pressed,
            repeat: false,
        });
        let (state, plan) = d.tick(d.initial_state(), &at_ms(0, 0), &input);
        assert_eq!(plan.view, rig.view(&state.camera));
        assert_eq!(state.camera.steps.x, 1);
    }

    #[test]
    fn without_camera_view_is_fixed() {
        let config = DemoConfig::new("tri", shaders(), shapes::triangle());
        let mut d = driver(&config);
        let mut input = InputState::default();
        input.apply_event(&InputEvent::Key {
            key: Key::W,
            state: KeyState::Pressed,
            repeat: false,
        });
        let (state, plan) = d.tick(d.initial_state(), &at_ms(0, 0), &input);
        assert_eq!(plan.view, config.view.matrix());
        assert_eq!(state.camera, Default::default());
    }

    // ── recolor ─────────────────────────────────────────────────────────

    #[test]
    fn click_recolors_and_reuploads_once() {
        let red = Color::rgb(1.0, 0.0, 0.0);
        let blue = Color::rgb(0.0, 0.0, 1.0);
        let config = DemoConfig::new("tri", shaders(), shapes::triangle()).with_palette(vec![red, blue]);
        let mut d = driver(&config);
        let positions = d.base().positions().to_vec();
        let mut input = InputState::default();

        click(&mut input);
        let (state, plan) = d.tick(d.initial_state(), &at_ms(0, 0), &input);
        assert_eq!(state.palette_index, Some(0));
        assert_eq!(plan.upload_count(), 1);
        assert_eq!(d.base().colors(), Some(red.rgb_array().repeat(3).as_slice()));
        assert_eq!(d.base().positions(), positions.as_slice());

        // no new click, no upload
        let (state, plan) = d.tick(state, &at_ms(16, 1), &input);
        assert_eq!(plan.upload_count(), 0);

        click(&mut input);
        let (state, _) = d.tick(state, &at_ms(32, 2), &input);
        assert_eq!(state.palette_index, Some(1));
        assert_eq!(d.base().colors(), Some(blue.rgb_array().repeat(3).as_slice()));
    }

    #[test]
    fn palette_wraps() {
        let config = DemoConfig::new("tri", shaders(), shapes::triangle())
            .with_palette(vec![Color::rgb(1.0, 0.0, 0.0), Color::rgb(0.0, 1.0, 0.0)]);
        let mut d = driver(&config);
        let mut input = InputState::default();
        for _ in 0..3 {
            click(&mut input);
        }
        let (state, _) = d.tick(d.initial_state(), &at_ms(0, 0), &input);
        assert_eq!(state.clicks, 3);
        assert_eq!(state.palette_index, Some(0));
    }

    #[test]
    fn clicks_without_palette_change_nothing() {
        let config = DemoConfig::new("tri", shaders(), shapes::triangle());
        let mut d = driver(&config);
        let before = d.base().clone();
        let mut input = InputState::default();
        click(&mut input);
        let (state, plan) = d.tick(d.initial_state(), &at_ms(0, 0), &input);
        assert_eq!(state.palette_index, None);
        assert_eq!(plan.upload_count(), 0);
        assert_eq!(d.base(), &before);
    }
}
