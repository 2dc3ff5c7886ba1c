//! # Graphics Module
//!
//! Camera, geometry, scene graph, resources and the wgpu renderer.
//!
//! - **Camera System** ([`camera`]) - perspective camera and trackball controls
//! - **Geometry** ([`geometry`]) - boxes, lathes, extruded text and axes
//! - **Scene Management** ([`scene`]) - flat, ordered list of nodes
//! - **Resource Management** ([`resources`]) - materials, textures and global uniforms
//! - **Rendering Pipeline** ([`rendering`]) - forward Phong shading with shadow mapping
//! - **Overlay** ([`ui`]) - Dear ImGui integration
//!
//! ```no_run
//! use acorn_scene::gfx::{geometry::generate_box, scene::{Scene, SceneNode}};
//! use acorn_scene::gfx::resources::{Color, Material};
//! use std::sync::Arc;
//!
//! let mut scene = Scene::new();
//! scene
//!     .add(SceneNode::mesh(
//!         "crate",
//!         Arc::new(generate_box(1.0, 1.0, 1.0, 1, 1, 1)),
//!         vec![Material::phong("crate", Color::WHITE)],
//!     ))
//!     .unwrap();
//! ```

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod ui;

// Re-export commonly used types
pub use camera::{PerspectiveCamera, TrackballControls};
pub use rendering::render_engine::RenderEngine;
