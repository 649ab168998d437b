//! Mesh assets.
//!
//! A mesh file is JSON with one buffer per attribute, each carrying its item
//! size (components per vertex) and item count:
//!
//! ```json
//! {
//!   "vertices":      { "item_size": 3, "item_count": 3, "data": [0, 1, 0, -1, -1, 0, 1, -1, 0] },
//!   "indices":       { "item_size": 1, "item_count": 3, "data": [0, 1, 2] },
//!   "texture_coords": null,
//!   "normals":       { "item_size": 3, "item_count": 3, "data": [0, 0, 1, 0, 0, 1, 0, 0, 1] }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{Attribute, GeometryBuffer};
use crate::SetupError;

/// One attribute or index buffer of a mesh asset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MeshBuffer<T> {
    pub item_size: u32,
    pub item_count: u32,
    pub data: Vec<T>,
}

impl<T> MeshBuffer<T> {
    fn check(&self, name: &str, item_size: u32) -> Result<(), String> {
        if self.item_size != item_size {
            return Err(format!(
                "{name}: item size {} (expected {item_size})",
                self.item_size
            ));
        }
        let expected = self.item_size as usize * self.item_count as usize;
        if self.data.len() != expected {
            return Err(format!(
                "{name}: {} values for {} items of size {}",
                self.data.len(),
                self.item_count,
                self.item_size
            ));
        }
        Ok(())
    }
}

/// Decoded mesh asset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MeshAsset {
    pub vertices: MeshBuffer<f32>,
    #[serde(default)]
    pub indices: Option<MeshBuffer<u16>>,
    #[serde(default, alias = "texturecoords")]
    pub texture_coords: Option<MeshBuffer<f32>>,
    #[serde(default)]
    pub normals: Option<MeshBuffer<f32>>,
}

impl MeshAsset {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads and decodes a mesh file.
    pub fn load(path: &Path) -> Result<Self, SetupError> {
        let asset = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|e| SetupError::asset(&asset, e))?;
        Self::from_json_str(&text).map_err(|e| SetupError::asset(&asset, e))
    }

    /// Checks buffer shapes and converts to geometry.
    pub fn into_geometry(self) -> Result<GeometryBuffer, String> {
        self.vertices
            .check("vertices", Attribute::Position.components())?;
        let mut geometry = GeometryBuffer::new(self.vertices.data);

        if let Some(uv) = self.texture_coords {
            uv.check("texture_coords", Attribute::TexCoord.components())?;
            geometry = geometry.with_tex_coords(uv.data);
        }
        if let Some(normals) = self.normals {
            normals.check("normals", Attribute::Normal.components())?;
            geometry = geometry.with_normals(normals.data);
        }
        if let Some(indices) = self.indices {
            indices.check("indices", 1)?;
            geometry = geometry.with_indices(indices.data);
        }

        geometry.validate().map_err(|e| e.to_string())?;
        Ok(geometry)
    }
}

/// Where a demo's geometry comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometrySource {
    /// Geometry built in code.
    Inline(GeometryBuffer),
    /// Mesh asset file, loaded once before scene setup.
    MeshFile(PathBuf),
}

impl GeometrySource {
    /// Produces validated geometry, loading the asset if needed.
    pub fn resolve(&self) -> Result<GeometryBuffer, SetupError> {
        match self {
            GeometrySource::Inline(geometry) => {
                geometry
                    .validate()
                    .map_err(|e| SetupError::asset("inline geometry", e))?;
                Ok(geometry.clone())
            }
            GeometrySource::MeshFile(path) => {
                let geometry = MeshAsset::load(path)?
                    .into_geometry()
                    .map_err(|e| SetupError::asset(path.display().to_string(), e))?;
                log::info!(
                    "loaded mesh {} ({} vertices)",
                    path.display(),
                    geometry.vertex_count()
                );
                Ok(geometry)
            }
        }
    }
}

impl From<GeometryBuffer> for GeometrySource {
    fn from(geometry: GeometryBuffer) -> Self {
        GeometrySource::Inline(geometry)
    }
}
