//! # Procedural Geometry Generation
//!
//! Everything the scene draws is generated here: boxes, surfaces of
//! revolution, extruded text and line helpers. No model files are loaded.
//!
//! ## Supported Shapes
//!
//! - **Box**: subdivided box with per-face normals and UVs
//! - **Lathe**: a 2D profile revolved around the Y axis
//! - **Text**: glyph outlines triangulated and extruded along Z, optionally bent
//! - **Axes**: coloured line segments marking the X, Y and Z axes
//!
//! ## Usage
//!
//! ```rust
//! use acorn_scene::gfx::geometry::{generate_box, generate_lathe};
//! use cgmath::Vector2;
//!
//! let floor = generate_box(100.0, 100.0, 5.0, 1, 1, 1);
//! let vase = generate_lathe(&[Vector2::new(1.0, 0.0), Vector2::new(0.5, 2.0)], 12);
//! assert!(floor.is_valid() && vase.is_valid());
//! ```

pub mod lathe;
pub mod primitives;
pub mod text;
pub mod triangulate;

pub use lathe::*;
pub use primitives::*;
pub use text::{generate_text, GlyphOutline, GlyphSource, TextOptions};

use std::collections::HashSet;

use cgmath::{InnerSpace, Vector3, Zero};

use crate::gfx::scene::vertex::Vertex3D;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v), origin at the top-left of the image
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Optional per-vertex colours, either empty or one per vertex
    pub colors: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding), or index pairs for line geometry
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            colors: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Non-empty, attribute arrays line up and every index is in range.
    pub fn is_valid(&self) -> bool {
        let count = self.vertices.len();
        count > 0
            && !self.indices.is_empty()
            && self.normals.len() == count
            && self.tex_coords.len() == count
            && (self.colors.is_empty() || self.colors.len() == count)
            && self.indices.iter().all(|&index| (index as usize) < count)
    }

    /// Smooth normals: area weighted average of the faces sharing each vertex.
    pub fn compute_vertex_normals(&mut self) {
        let mut accumulated = vec![Vector3::<f32>::zero(); self.vertices.len()];

        for triangle in self.indices.chunks_exact(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
            let pa = Vector3::from(self.vertices[a]);
            let pb = Vector3::from(self.vertices[b]);
            let pc = Vector3::from(self.vertices[c]);
            let face_normal = (pb - pa).cross(pc - pa);
            accumulated[a] += face_normal;
            accumulated[b] += face_normal;
            accumulated[c] += face_normal;
        }

        self.normals = accumulated
            .into_iter()
            .map(|normal| {
                if normal.magnitude2() > 0.0 {
                    normal.normalize().into()
                } else {
                    [0.0, 1.0, 0.0]
                }
            })
            .collect();
    }

    /// Index pairs for every distinct triangle edge, for wireframe drawing.
    pub fn edge_indices(&self) -> Vec<u32> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();

        for triangle in self.indices.chunks_exact(3) {
            for (a, b) in [
                (triangle[0], triangle[1]),
                (triangle[1], triangle[2]),
                (triangle[2], triangle[0]),
            ] {
                if seen.insert((a.min(b), a.max(b))) {
                    edges.push(a);
                    edges.push(b);
                }
            }
        }

        edges
    }

    /// Convert to the interleaved vertex format used by the renderer
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                uv: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
                color: self.colors.get(i).copied().unwrap_or([1.0, 1.0, 1.0]),
            })
            .collect()
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}
