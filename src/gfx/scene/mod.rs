//! # Scene Management Module
//!
//! The scene is a flat list of named nodes under an implicit root: a
//! directional light, meshes and line segments. Nodes own plain descriptions
//! (geometry, materials, transform); GPU resources are created from them by the
//! render engine.
//!
//! ## Key Components
//!
//! - [`Scene`] - Ordered node container with validation on insert
//! - [`SceneNode`] / [`NodeKind`] - What a node draws or emits
//! - [`Transform`] - Position, Euler rotation and scale
//! - [`Vertex3D`] - GPU vertex layout

pub mod node;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use node::{DirectionalLight, NodeKind, SceneNode, Transform};
pub use scene::{NodeId, Scene, SceneStatistics};
pub use vertex::Vertex3D;
