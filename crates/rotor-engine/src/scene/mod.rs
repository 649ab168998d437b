//! CPU-side scene data: geometry, built-in shapes, mesh assets, lighting.
//!
//! Geometry is kept attribute-major on the CPU and interleaved only when it
//! is uploaded, so recoloring or rescaling never touches unrelated attributes.

mod color;
mod geometry;
mod lighting;
pub mod mesh;
pub mod shapes;

pub use color::Color;
pub use geometry::{Attribute, DrawCount, GeometryBuffer, GeometryError, VertexLayout};
pub use lighting::LightingState;
pub use mesh::{GeometrySource, MeshAsset, MeshBuffer};
