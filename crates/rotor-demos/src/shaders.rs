//! WGSL sources for the demos.
//!
//! Vertex stages share `transforms.wgsl`, which declares the transform
//! uniform and `to_clip`.

use rotor_engine::render::ShaderSource;

const TRANSFORMS: &str = include_str!("../shaders/transforms.wgsl");

const COLOR_VS: &str = include_str!("../shaders/color.vert.wgsl");
const COLOR_FS: &str = include_str!("../shaders/color.frag.wgsl");
const TEXTURED_VS: &str = include_str!("../shaders/textured.vert.wgsl");
const TEXTURED_FS: &str = include_str!("../shaders/textured.frag.wgsl");
const LIT_VS: &str = include_str!("../shaders/lit.vert.wgsl");
const LIT_FS: &str = include_str!("../shaders/lit.frag.wgsl");

fn with_transforms(vertex: &str) -> String {
    format!("{TRANSFORMS}\n{vertex}")
}

/// Per-vertex color.
pub fn color() -> ShaderSource {
    ShaderSource::new("color", with_transforms(COLOR_VS), COLOR_FS)
}

/// Texture sampled at per-vertex coordinates.
pub fn textured() -> ShaderSource {
    ShaderSource::new("textured", with_transforms(TEXTURED_VS), TEXTURED_FS)
}

/// Texture modulated by ambient plus one directional light.
pub fn lit() -> ShaderSource {
    ShaderSource::new("lit", with_transforms(LIT_VS), LIT_FS)
}
