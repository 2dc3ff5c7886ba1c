//! Material definitions for the forward renderer
//!
//! A [`Material`] is a plain description of how a surface is shaded. The GPU
//! side (uniform buffer, texture bind group) is created by the render engine
//! when the scene is uploaded, so materials can be built and inspected without
//! a device.

use std::sync::Arc;

/// Linear RGB colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Builds a colour from a `0xRRGGBB` literal.
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }
}

/// Shading model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Diffuse + specular from the scene light, plus emissive.
    Phong,
    /// Flat colour, ignores lights.
    Basic,
}

/// Which triangle faces are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

/// Surface description shared by meshes and line segments.
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub shading: Shading,
    pub color: Color,
    pub emissive: Color,
    pub specular: Color,
    pub shininess: f32,
    pub opacity: f32,
    /// Draw triangle edges instead of filled triangles.
    pub wireframe: bool,
    pub side: Side,
    /// Multiplied with the base colour; sampled with the geometry's UVs.
    pub map: Option<Arc<image::RgbaImage>>,
    /// Multiply the base colour by per-vertex colours.
    pub vertex_colors: bool,
}

impl Material {
    /// Lit material with the default specular response.
    pub fn phong(name: &str, color: Color) -> Self {
        Self {
            name: name.to_string(),
            shading: Shading::Phong,
            color,
            emissive: Color::BLACK,
            specular: Color::from_hex(0x111111),
            shininess: 30.0,
            opacity: 1.0,
            wireframe: false,
            side: Side::Front,
            map: None,
            vertex_colors: false,
        }
    }

    /// Unlit material.
    pub fn basic(name: &str, color: Color) -> Self {
        Self {
            shading: Shading::Basic,
            specular: Color::BLACK,
            ..Self::phong(name, color)
        }
    }

    /// Builder pattern: Set emissive colour
    pub fn with_emissive(mut self, emissive: Color) -> Self {
        self.emissive = emissive;
        self
    }

    /// Builder pattern: Render as wireframe
    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    /// Builder pattern: Set face culling side
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Builder pattern: Set texture map
    pub fn with_map(mut self, map: Arc<image::RgbaImage>) -> Self {
        self.map = Some(map);
        self
    }

    /// Builder pattern: Enable per-vertex colours
    pub fn with_vertex_colors(mut self) -> Self {
        self.vertex_colors = true;
        self
    }

    pub fn is_lit(&self) -> bool {
        self.shading == Shading::Phong
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_split_into_channels() {
        let green = Color::from_hex(0x74C947);
        assert!((green.r - 0x74 as f32 / 255.0).abs() < 1e-6);
        assert!((green.g - 0xC9 as f32 / 255.0).abs() < 1e-6);
        assert!((green.b - 0x47 as f32 / 255.0).abs() < 1e-6);
        assert_eq!(Color::from_hex(0xffffff), Color::WHITE);
    }

    #[test]
    fn basic_materials_are_unlit() {
        let cube = Material::basic("cube", Color::from_hex(0x0fffff)).with_wireframe(true);
        assert!(!cube.is_lit());
        assert!(cube.wireframe);
        assert_eq!(cube.side, Side::Front);
    }
}
