use std::path::PathBuf;

use glam::Vec3;
use rotor_engine::driver::{DemoConfig, ObjectDescriptor, Spin};
use rotor_engine::math::CameraRig;
use rotor_engine::render::TextureSource;
use rotor_engine::scene::{shapes, Color, GeometrySource, LightingState};

use crate::shaders;

/// Path of a file under this crate's `assets/`.
pub fn asset_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("assets")
        .join(name)
}

/// Colors cycled by clicking.
pub fn click_palette() -> Vec<Color> {
    vec![
        Color::from_u8(230, 57, 70),
        Color::from_u8(42, 157, 143),
        Color::from_u8(233, 196, 106),
        Color::from_u8(69, 123, 157),
    ]
}

/// RGB triangle spinning about Y; both sides visible. Click to recolor.
pub fn triangle() -> DemoConfig {
    DemoConfig::new("triangle", shaders::color(), shapes::triangle())
        .with_spin(23.0, Vec3::Y)
        .with_back_face_culling(false)
        .with_palette(click_palette())
}

/// Crate-textured box tumbling about the (1, 0, 1) diagonal.
pub fn textured_cube() -> DemoConfig {
    DemoConfig::new("textured-cube", shaders::textured(), shapes::textured_box())
        .with_spin(25.0, Vec3::new(1.0, 0.0, 1.0))
        .with_texture(TextureSource::File(asset_path("crate.png")))
}

/// Box loaded from a mesh file, textured and lit by one directional light.
pub fn lit_cube() -> DemoConfig {
    DemoConfig::new(
        "lit-cube",
        shaders::lit(),
        GeometrySource::MeshFile(asset_path("cube.json")),
    )
    .with_spin(70.0, Vec3::Y)
    .with_texture(TextureSource::File(asset_path("crate.png")))
    .with_lighting(LightingState::default())
}

/// Colored box with a WASD / arrow-key camera.
pub fn camera() -> DemoConfig {
    DemoConfig::new(
        "camera",
        shaders::color(),
        shapes::color_box(&shapes::FACE_COLORS),
    )
    .with_spin(90.0, Vec3::Y)
    .with_camera(CameraRig::default())
}

/// Three boxes sharing one vertex buffer, each scaled, placed and spun on its own.
pub fn spinning_cubes() -> DemoConfig {
    let objects = vec![
        ObjectDescriptor {
            offset: Vec3::new(-2.0, 0.0, 0.0),
            scale: 0.2,
            spin: Spin::new(90.0, Vec3::Y),
        },
        ObjectDescriptor {
            offset: Vec3::ZERO,
            scale: 0.7,
            spin: Spin::new(70.0, Vec3::new(1.0, 1.0, 0.0)),
        },
        ObjectDescriptor {
            offset: Vec3::new(2.0, 0.0, 0.0),
            scale: 0.4,
            spin: Spin::new(25.0, Vec3::X),
        },
    ];
    DemoConfig::new(
        "spinning-cubes",
        shaders::color(),
        shapes::color_box(&shapes::FACE_COLORS),
    )
    .with_objects(objects)
    .with_palette(click_palette())
}

/// Every preset, in the order the binaries are listed.
pub fn all() -> Vec<DemoConfig> {
    vec![
        triangle(),
        textured_cube(),
        lit_cube(),
        camera(),
        spinning_cubes(),
    ]
}
