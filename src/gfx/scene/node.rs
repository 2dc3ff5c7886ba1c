//! Scene nodes and their transforms

use std::sync::Arc;

use cgmath::{Matrix4, Rad, Vector3};

use crate::gfx::{
    geometry::GeometryData,
    resources::material::{Color, Material},
};

/// Position, rotation and scale of a node.
///
/// Rotation is Euler angles in radians applied in X, Y, Z order, so the model
/// matrix is `T * Rx * Ry * Rz * S`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

/// Light shining uniformly from the node's position towards the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub cast_shadow: bool,
    /// How much a fully shadowed receiver is darkened, 0..=1.
    pub shadow_darkness: f32,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    DirectionalLight(DirectionalLight),
    /// Triangle mesh drawn once per material, in order.
    Mesh {
        geometry: Arc<GeometryData>,
        materials: Vec<Material>,
        cast_shadow: bool,
        receive_shadow: bool,
    },
    /// Index pairs drawn as lines.
    LineSegments {
        geometry: Arc<GeometryData>,
        material: Material,
    },
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
}

impl SceneNode {
    pub fn new(name: &str, kind: NodeKind) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::default(),
            kind,
        }
    }

    pub fn light(name: &str, light: DirectionalLight) -> Self {
        Self::new(name, NodeKind::DirectionalLight(light))
    }

    pub fn mesh(name: &str, geometry: Arc<GeometryData>, materials: Vec<Material>) -> Self {
        Self::new(
            name,
            NodeKind::Mesh {
                geometry,
                materials,
                cast_shadow: false,
                receive_shadow: false,
            },
        )
    }

    pub fn line_segments(name: &str, geometry: Arc<GeometryData>, material: Material) -> Self {
        Self::new(name, NodeKind::LineSegments { geometry, material })
    }

    /// Builder pattern: Set position
    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.transform.position = position;
        self
    }

    /// Builder pattern: Set Euler rotation in radians
    pub fn with_rotation(mut self, rotation: Vector3<f32>) -> Self {
        self.transform.rotation = rotation;
        self
    }

    /// Builder pattern: Set uniform scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.transform.scale = Vector3::new(scale, scale, scale);
        self
    }

    /// Builder pattern: Set shadow flags (meshes only)
    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        if let NodeKind::Mesh {
            cast_shadow,
            receive_shadow,
            ..
        } = &mut self.kind
        {
            *cast_shadow = cast;
            *receive_shadow = receive;
        }
        self
    }

    pub fn geometry(&self) -> Option<&Arc<GeometryData>> {
        match &self.kind {
            NodeKind::Mesh { geometry, .. } | NodeKind::LineSegments { geometry, .. } => {
                Some(geometry)
            }
            NodeKind::DirectionalLight(_) => None,
        }
    }

    /// Materials in draw order; empty for lights.
    pub fn materials(&self) -> &[Material] {
        match &self.kind {
            NodeKind::Mesh { materials, .. } => materials,
            NodeKind::LineSegments { material, .. } => std::slice::from_ref(material),
            NodeKind::DirectionalLight(_) => &[],
        }
    }

    /// Returns why the node cannot be added to a scene, if anything.
    pub fn validate(&self) -> Result<(), &'static str> {
        match &self.kind {
            NodeKind::DirectionalLight(light) => {
                if light.intensity < 0.0 {
                    return Err("light intensity is negative");
                }
            }
            NodeKind::Mesh {
                geometry,
                materials,
                ..
            } => {
                if !geometry.is_valid() || geometry.indices.len() % 3 != 0 {
                    return Err("mesh geometry is empty or malformed");
                }
                if materials.is_empty() {
                    return Err("mesh has no material");
                }
            }
            NodeKind::LineSegments { geometry, .. } => {
                if !geometry.is_valid() || geometry.indices.len() % 2 != 0 {
                    return Err("line geometry is empty or malformed");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_box;
    use cgmath::{Vector4, Zero};
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn transform_applies_scale_then_rotation_then_translation() {
        let transform = Transform {
            position: Vector3::new(0.0, -5.0, 0.0),
            rotation: Vector3::new(-FRAC_PI_2, 0.0, 0.0),
            scale: Vector3::new(2.0, 2.0, 2.0),
        };
        // +y rotated by -90 degrees about x lands on -z
        let p = transform.matrix() * Vector4::new(0.0, 1.0, 0.0, 1.0);
        assert!((p.x).abs() < 1e-5);
        assert!((p.y + 5.0).abs() < 1e-5);
        assert!((p.z + 2.0).abs() < 1e-5);
    }

    #[test]
    fn meshes_need_geometry_and_material() {
        let geometry = Arc::new(generate_box(1.0, 1.0, 1.0, 1, 1, 1));
        let bare = SceneNode::mesh("bare", geometry.clone(), Vec::new());
        assert!(bare.validate().is_err());

        let empty = SceneNode::mesh(
            "empty",
            Arc::new(GeometryData::new()),
            vec![Material::basic("m", Color::WHITE)],
        );
        assert!(empty.validate().is_err());

        let cube = SceneNode::mesh("cube", geometry, vec![Material::basic("m", Color::WHITE)])
            .with_shadows(true, false);
        assert!(cube.validate().is_ok());
        assert!(matches!(
            cube.kind,
            NodeKind::Mesh {
                cast_shadow: true,
                receive_shadow: false,
                ..
            }
        ));
    }

    #[test]
    fn lights_have_no_geometry() {
        let light = SceneNode::light(
            "light",
            DirectionalLight {
                color: Color::WHITE,
                intensity: 1.0,
                cast_shadow: true,
                shadow_darkness: 0.5,
            },
        );
        assert!(light.geometry().is_none());
        assert!(light.materials().is_empty());
        assert_eq!(light.transform.position, Vector3::zero());
    }
}
