use log::debug;

use super::node::{DirectionalLight, NodeKind, SceneNode};
use crate::error::{Result, ShowcaseError};

/// Handle to a node, valid for the scene that returned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// Ordered collection of scene nodes
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and appends a node.
    pub fn add(&mut self, node: SceneNode) -> Result<NodeId> {
        node.validate().map_err(|reason| ShowcaseError::InvalidNode {
            name: node.name.clone(),
            reason,
        })?;

        debug!(
            "Adding node '{}' ({} material(s))",
            node.name,
            node.materials().len()
        );
        self.nodes.push(node);
        Ok(NodeId(self.nodes.len() - 1))
    }

    pub fn get(&self, id: NodeId) -> Result<&SceneNode> {
        self.nodes.get(id.0).ok_or(ShowcaseError::UnknownNode(id.0))
    }

    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut SceneNode> {
        self.nodes
            .get_mut(id.0)
            .ok_or(ShowcaseError::UnknownNode(id.0))
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(NodeId)
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First directional light, with the node carrying its position.
    pub fn directional_light(&self) -> Option<(&SceneNode, &DirectionalLight)> {
        self.nodes.iter().find_map(|node| match &node.kind {
            NodeKind::DirectionalLight(light) => Some((node, light)),
            _ => None,
        })
    }

    /// Gets all node names, in insertion order
    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.iter().map(|node| node.name.as_str()).collect()
    }

    /// Gets statistics about the scene
    pub fn statistics(&self) -> SceneStatistics {
        let mut statistics = SceneStatistics {
            node_count: self.nodes.len(),
            ..Default::default()
        };

        for node in &self.nodes {
            statistics.draw_passes += node.materials().len();
            if let Some(geometry) = node.geometry() {
                statistics.total_vertices += geometry.vertex_count();
                if let NodeKind::Mesh { .. } = node.kind {
                    statistics.total_triangles += geometry.triangle_count();
                }
            }
        }

        statistics
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub node_count: usize,
    pub draw_passes: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}
