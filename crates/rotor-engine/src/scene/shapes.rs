//! Built-in geometry.
//!
//! The box is 24 vertices (4 per face, so every face gets its own texture
//! coordinates, normals and colors) with 36 counter-clockwise indices.

use super::{Color, GeometryBuffer};

#[rustfmt::skip]
const BOX_POSITIONS: [f32; 72] = [
    // Top
    -1.0, 1.0, -1.0,   -1.0, 1.0, 1.0,    1.0, 1.0, 1.0,     1.0, 1.0, -1.0,
    // Left
    -1.0, 1.0, 1.0,    -1.0, -1.0, 1.0,   -1.0, -1.0, -1.0,  -1.0, 1.0, -1.0,
    // Right
    1.0, 1.0, 1.0,     1.0, -1.0, 1.0,    1.0, -1.0, -1.0,   1.0, 1.0, -1.0,
    // Front
    1.0, 1.0, 1.0,     1.0, -1.0, 1.0,    -1.0, -1.0, 1.0,   -1.0, 1.0, 1.0,
    // Back
    1.0, 1.0, -1.0,    1.0, -1.0, -1.0,   -1.0, -1.0, -1.0,  -1.0, 1.0, -1.0,
    // Bottom
    -1.0, -1.0, -1.0,  -1.0, -1.0, 1.0,   1.0, -1.0, 1.0,    1.0, -1.0, -1.0,
];

#[rustfmt::skip]
const BOX_TEX_COORDS: [f32; 48] = [
    0.0, 0.0,  0.0, 1.0,  1.0, 1.0,  1.0, 0.0, // Top
    0.0, 0.0,  1.0, 0.0,  1.0, 1.0,  0.0, 1.0, // Left
    1.0, 1.0,  0.0, 1.0,  0.0, 0.0,  1.0, 0.0, // Right
    1.0, 1.0,  1.0, 0.0,  0.0, 0.0,  0.0, 1.0, // Front
    0.0, 0.0,  0.0, 1.0,  1.0, 1.0,  1.0, 0.0, // Back
    1.0, 1.0,  1.0, 0.0,  0.0, 0.0,  0.0, 1.0, // Bottom
];

#[rustfmt::skip]
const BOX_INDICES: [u16; 36] = [
    0, 1, 2,     0, 2, 3,    // Top
    5, 4, 6,     6, 4, 7,    // Left
    8, 9, 10,    8, 10, 11,  // Right
    13, 12, 14,  15, 14, 12, // Front
    16, 17, 18,  16, 18, 19, // Back
    21, 20, 22,  22, 20, 23, // Bottom
];

/// Outward normal per face, in face order.
const FACE_NORMALS: [[f32; 3]; 6] = [
    [0.0, 1.0, 0.0],
    [-1.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
    [0.0, -1.0, 0.0],
];

/// Default color per face, in face order.
pub const FACE_COLORS: [Color; 6] = [
    Color::rgb(0.5, 0.5, 0.5),
    Color::rgb(0.75, 0.25, 0.5),
    Color::rgb(0.25, 0.25, 0.75),
    Color::rgb(1.0, 0.0, 0.15),
    Color::rgb(0.0, 1.0, 0.15),
    Color::rgb(0.5, 0.5, 1.0),
];

fn per_face(values: &[[f32; 3]; 6]) -> Vec<f32> {
    values.iter().flat_map(|v| v.repeat(4)).collect()
}

/// Single triangle with red, green and blue corners. Drawn without indices.
pub fn triangle() -> GeometryBuffer {
    #[rustfmt::skip]
    let positions = vec![
        0.0, 0.5, 0.0,
        -0.5, -0.5, 0.0,
        0.5, -0.5, 0.0,
    ];
    #[rustfmt::skip]
    let colors = vec![
        1.0, 0.0, 0.0,
        0.0, 1.0, 0.0,
        0.0, 0.0, 1.0,
    ];
    GeometryBuffer::new(positions).with_colors(colors)
}

/// Unit box (-1..1) with per-face texture coordinates.
pub fn textured_box() -> GeometryBuffer {
    GeometryBuffer::new(BOX_POSITIONS.to_vec())
        .with_tex_coords(BOX_TEX_COORDS.to_vec())
        .with_indices(BOX_INDICES.to_vec())
}

/// Unit box with per-face colors.
pub fn color_box(face_colors: &[Color; 6]) -> GeometryBuffer {
    let colors = face_colors.map(Color::rgb_array);
    GeometryBuffer::new(BOX_POSITIONS.to_vec())
        .with_colors(per_face(&colors))
        .with_indices(BOX_INDICES.to_vec())
}

/// Unit box with texture coordinates and outward face normals.
pub fn lit_box() -> GeometryBuffer {
    textured_box().with_normals(per_face(&FACE_NORMALS))
}
