use glam::{Mat4, Vec3};

use crate::input::KeyBindings;
use crate::math::{CameraRig, Projection};
use crate::render::{BindingSlot, ShaderSource, TextureSource};
use crate::scene::{Color, GeometrySource, LightingState};

/// Rotation speed and axis.
///
/// `speed` is in half-turns per minute: the angle after `t` ms is
/// `(t / 60000) * speed * π`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Spin {
    pub speed: f32,
    pub axis: Vec3,
}

impl Spin {
    pub const fn new(speed: f32, axis: Vec3) -> Self {
        Self { speed, axis }
    }
}

/// One placed copy of the base geometry.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ObjectDescriptor {
    pub offset: Vec3,
    pub scale: f32,
    pub spin: Spin,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Motion {
    /// The geometry spins in place; one draw per frame.
    Spin(Spin),
    /// Each object gets a scaled copy of the geometry, uploaded into the shared
    /// vertex buffer right before its own draw.
    Objects(Vec<ObjectDescriptor>),
}

/// Fixed look-at view, used when the demo has no camera input.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewConfig {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl ViewConfig {
    pub fn matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

impl Default for ViewConfig {
    /// Five units behind the origin on -Z, looking at it.
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, -5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

/// Complete description of one demo.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub name: String,
    pub shaders: ShaderSource,
    pub geometry: GeometrySource,
    pub motion: Motion,
    /// Keyboard-driven camera. Replaces `view` when set.
    pub camera: Option<CameraRig>,
    pub view: ViewConfig,
    pub projection: Projection,
    pub lighting: Option<LightingState>,
    pub texture: Option<TextureSource>,
    pub clear_color: Color,
    pub cull_back_faces: bool,
    /// Colors cycled by primary-button clicks. Empty disables recoloring.
    pub palette: Vec<Color>,
    pub key_bindings: KeyBindings,
}

impl DemoConfig {
    /// A demo spinning `geometry` about +Y at 25 half-turns per minute.
    pub fn new(
        name: impl Into<String>,
        shaders: ShaderSource,
        geometry: impl Into<GeometrySource>,
    ) -> Self {
        Self {
            name: name.into(),
            shaders,
            geometry: geometry.into(),
            motion: Motion::Spin(Spin::new(25.0, Vec3::Y)),
            camera: None,
            view: ViewConfig::default(),
            projection: Projection::default(),
            lighting: None,
            texture: None,
            clear_color: Color::CANVAS,
            cull_back_faces: true,
            palette: Vec::new(),
            key_bindings: KeyBindings::default(),
        }
    }

    pub fn with_spin(mut self, speed: f32, axis: Vec3) -> Self {
        self.motion = Motion::Spin(Spin::new(speed, axis));
        self
    }

    pub fn with_objects(mut self, objects: Vec<ObjectDescriptor>) -> Self {
        self.motion = Motion::Objects(objects);
        self
    }

    pub fn with_camera(mut self, rig: CameraRig) -> Self {
        self.camera = Some(rig);
        self
    }

    pub fn with_view(mut self, eye: Vec3, target: Vec3, up: Vec3) -> Self {
        self.view = ViewConfig { eye, target, up };
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_lighting(mut self, lighting: LightingState) -> Self {
        self.lighting = Some(lighting);
        self
    }

    pub fn with_texture(mut self, texture: TextureSource) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn with_back_face_culling(mut self, cull: bool) -> Self {
        self.cull_back_faces = cull;
        self
    }

    pub fn with_palette(mut self, palette: Vec<Color>) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_key_bindings(mut self, bindings: KeyBindings) -> Self {
        self.key_bindings = bindings;
        self
    }

    /// Resource slots the scene will bind for this configuration.
    pub fn provided_slots(&self) -> Vec<BindingSlot> {
        let mut slots = vec![BindingSlot::Transforms];
        if self.lighting.is_some() {
            slots.push(BindingSlot::Lighting);
        }
        if self.texture.is_some() {
            slots.extend([BindingSlot::Texture, BindingSlot::Sampler]);
        }
        slots
    }

    /// View matrix before any input has been applied.
    pub fn initial_view(&self) -> Mat4 {
        match &self.camera {
            Some(rig) => rig.view(&Default::default()),
            None => self.view.matrix(),
        }
    }

    /// Number of draws issued per frame.
    pub fn draws_per_frame(&self) -> usize {
        match &self.motion {
            Motion::Spin(_) => 1,
            Motion::Objects(objects) => objects.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::shapes;

    fn config() -> DemoConfig {
        DemoConfig::new("t", ShaderSource::new("t", "", ""), shapes::triangle())
    }

    #[test]
    fn defaults() {
        let c = config();
        assert_eq!(c.clear_color, Color::CANVAS);
        assert!(c.cull_back_faces);
        assert_eq!(c.provided_slots(), vec![BindingSlot::Transforms]);
        assert_eq!(c.draws_per_frame(), 1);
    }

    #[test]
    fn slots_follow_lighting_and_texture() {
        let c = config()
            .with_lighting(LightingState::default())
            .with_texture(TextureSource::Rgba {
                width: 1,
                height: 1,
                pixels: vec![0; 4],
            });
        assert_eq!(
            c.provided_slots(),
            vec![
                BindingSlot::Transforms,
                BindingSlot::Lighting,
                BindingSlot::Texture,
                BindingSlot::Sampler
            ]
        );
    }

    #[test]
    fn camera_overrides_fixed_view() {
        let fixed = config();
        assert_eq!(fixed.initial_view(), ViewConfig::default().matrix());

        let rig = CameraRig::default();
        let cam = config().with_camera(rig);
        assert_eq!(cam.initial_view(), rig.view(&Default::default()));
    }

    #[test]
    fn default_view_looks_at_origin_from_negative_z() {
        let view = ViewConfig::default().matrix();
        let origin = view.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-5);
    }
}
