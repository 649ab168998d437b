use std::fmt;

use super::Color;

/// Per-vertex attribute kinds.
///
/// Shader locations are fixed per attribute so one shader convention serves
/// every geometry: a shader reading `@location(2)` always gets texture
/// coordinates, whichever other attributes are present.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Attribute {
    Position,
    Color,
    TexCoord,
    Normal,
}

impl Attribute {
    /// Interleaving order within a vertex.
    pub const ORDER: [Attribute; 4] = [
        Attribute::Position,
        Attribute::Color,
        Attribute::TexCoord,
        Attribute::Normal,
    ];

    /// Number of `f32` components.
    pub const fn components(self) -> u32 {
        match self {
            Attribute::Position => 3,
            Attribute::Color => 3,
            Attribute::TexCoord => 2,
            Attribute::Normal => 3,
        }
    }

    pub const fn shader_location(self) -> u32 {
        match self {
            Attribute::Position => 0,
            Attribute::Color => 1,
            Attribute::TexCoord => 2,
            Attribute::Normal => 3,
        }
    }

    pub const fn format(self) -> wgpu::VertexFormat {
        match self.components() {
            2 => wgpu::VertexFormat::Float32x2,
            _ => wgpu::VertexFormat::Float32x3,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Attribute::Position => "position",
            Attribute::Color => "color",
            Attribute::TexCoord => "texture coordinate",
            Attribute::Normal => "normal",
        };
        f.write_str(name)
    }
}

/// Malformed geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Attribute data length is not a multiple of its component count.
    Ragged { attribute: Attribute, len: usize },
    /// Attribute describes a different number of vertices than positions do.
    VertexCountMismatch {
        attribute: Attribute,
        expected: usize,
        actual: usize,
    },
    /// Index refers past the last vertex.
    IndexOutOfRange { index: u16, vertex_count: usize },
    /// Index list length is not a whole, non-zero number of triangles.
    PartialTriangle { indices: usize },
    /// Operation needs an attribute the geometry does not carry.
    MissingAttribute(Attribute),
    Empty,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::Ragged { attribute, len } => write!(
                f,
                "{attribute} data has {len} floats, not a multiple of {}",
                attribute.components()
            ),
            GeometryError::VertexCountMismatch {
                attribute,
                expected,
                actual,
            } => write!(f, "{attribute} data covers {actual} vertices, expected {expected}"),
            GeometryError::IndexOutOfRange {
                index,
                vertex_count,
            } => write!(f, "index {index} out of range for {vertex_count} vertices"),
            GeometryError::PartialTriangle { indices } => {
                write!(f, "{indices} indices do not form whole triangles")
            }
            GeometryError::MissingAttribute(attribute) => {
                write!(f, "geometry has no {attribute} attribute")
            }
            GeometryError::Empty => f.write_str("geometry has no vertices"),
        }
    }
}

impl std::error::Error for GeometryError {}

/// How a geometry is drawn: over its index list, or over raw vertices.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawCount {
    Indexed(u32),
    Vertices(u32),
}

/// Vertex buffer layout derived from the attributes a geometry carries.
///
/// Built from the same attribute list that drives [`GeometryBuffer::interleaved`],
/// so stride and offsets always agree with the uploaded bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexLayout {
    pub stride: wgpu::BufferAddress,
    pub attributes: Vec<wgpu::VertexAttribute>,
}

impl VertexLayout {
    fn for_attributes(present: &[Attribute]) -> Self {
        let mut offset = 0;
        let mut attributes = Vec::with_capacity(present.len());
        for attr in present {
            attributes.push(wgpu::VertexAttribute {
                format: attr.format(),
                offset,
                shader_location: attr.shader_location(),
            });
            offset += attr.components() as wgpu::BufferAddress * 4;
        }
        Self {
            stride: offset,
            attributes,
        }
    }

    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }

    /// Component count fed to `location`, if any attribute feeds it.
    pub fn components_at(&self, location: u32) -> Option<u32> {
        self.attributes
            .iter()
            .find(|a| a.shader_location == location)
            .map(|a| (a.format.size() / 4) as u32)
    }
}

/// Vertex attributes plus an optional triangle index list.
///
/// Positions are mandatory; color, texture coordinate and normal data are
/// optional. Call [`validate`](Self::validate) before uploading data that did
/// not come from the built-in shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryBuffer {
    positions: Vec<f32>,
    colors: Option<Vec<f32>>,
    tex_coords: Option<Vec<f32>>,
    normals: Option<Vec<f32>>,
    indices: Option<Vec<u16>>,
}

impl GeometryBuffer {
    pub fn new(positions: Vec<f32>) -> Self {
        Self {
            positions,
            colors: None,
            tex_coords: None,
            normals: None,
            indices: None,
        }
    }

    pub fn with_colors(mut self, colors: Vec<f32>) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn with_tex_coords(mut self, tex_coords: Vec<f32>) -> Self {
        self.tex_coords = Some(tex_coords);
        self
    }

    pub fn with_normals(mut self, normals: Vec<f32>) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn with_indices(mut self, indices: Vec<u16>) -> Self {
        self.indices = Some(indices);
        self
    }

    fn data(&self, attribute: Attribute) -> Option<&[f32]> {
        match attribute {
            Attribute::Position => Some(&self.positions),
            Attribute::Color => self.colors.as_deref(),
            Attribute::TexCoord => self.tex_coords.as_deref(),
            Attribute::Normal => self.normals.as_deref(),
        }
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> Option<&[f32]> {
        self.colors.as_deref()
    }

    pub fn indices(&self) -> Option<&[u16]> {
        self.indices.as_deref()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Attributes present, in interleaving order.
    pub fn attributes(&self) -> Vec<Attribute> {
        Attribute::ORDER
            .into_iter()
            .filter(|a| self.data(*a).is_some())
            .collect()
    }

    pub fn has(&self, attribute: Attribute) -> bool {
        self.data(attribute).is_some()
    }

    pub fn layout(&self) -> VertexLayout {
        VertexLayout::for_attributes(&self.attributes())
    }

    pub fn draw_count(&self) -> DrawCount {
        match &self.indices {
            Some(indices) => DrawCount::Indexed(indices.len() as u32),
            None => DrawCount::Vertices(self.vertex_count() as u32),
        }
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        let vertex_count = self.vertex_count();
        if vertex_count == 0 {
            return Err(GeometryError::Empty);
        }

        for attribute in self.attributes() {
            let Some(data) = self.data(attribute) else { continue };
            let n = attribute.components() as usize;
            if data.len() % n != 0 {
                return Err(GeometryError::Ragged {
                    attribute,
                    len: data.len(),
                });
            }
            if data.len() / n != vertex_count {
                return Err(GeometryError::VertexCountMismatch {
                    attribute,
                    expected: vertex_count,
                    actual: data.len() / n,
                });
            }
        }

        let partial = self
            .indices
            .as_ref()
            .filter(|indices| indices.is_empty() || indices.len() % 3 != 0);
        if let Some(indices) = partial {
            return Err(GeometryError::PartialTriangle {
                indices: indices.len(),
            });
        }

        if let Some(bad) = self
            .indices
            .iter()
            .flatten()
            .find(|i| **i as usize >= vertex_count)
        {
            return Err(GeometryError::IndexOutOfRange {
                index: *bad,
                vertex_count,
            });
        }

        Ok(())
    }

    /// Vertex data interleaved in [`Attribute::ORDER`], matching [`layout`](Self::layout).
    pub fn interleaved(&self) -> Vec<f32> {
        let present: Vec<(&[f32], usize)> = self
            .attributes()
            .into_iter()
            .filter_map(|a| self.data(a).map(|d| (d, a.components() as usize)))
            .collect();

        let stride: usize = present.iter().map(|(_, n)| n).sum();
        let mut out = Vec::with_capacity(stride * self.vertex_count());
        for v in 0..self.vertex_count() {
            for (data, n) in &present {
                out.extend_from_slice(&data[v * n..(v + 1) * n]);
            }
        }
        out
    }

    /// Copy with every position multiplied by `factor`. Other attributes are shared as-is.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            positions: self.positions.iter().map(|p| p * factor).collect(),
            ..self.clone()
        }
    }

    /// Replaces the color data wholesale.
    pub fn recolor(&mut self, colors: Vec<f32>) -> Result<(), GeometryError> {
        if self.colors.is_none() {
            return Err(GeometryError::MissingAttribute(Attribute::Color));
        }
        if colors.len() != self.vertex_count() * 3 {
            return Err(GeometryError::VertexCountMismatch {
                attribute: Attribute::Color,
                expected: self.vertex_count(),
                actual: colors.len() / 3,
            });
        }
        self.colors = Some(colors);
        Ok(())
    }

    /// Recolors every vertex with `color`.
    pub fn fill_color(&mut self, color: Color) -> Result<(), GeometryError> {
        let colors = color.rgb_array().repeat(self.vertex_count());
        self.recolor(colors)
    }
}
