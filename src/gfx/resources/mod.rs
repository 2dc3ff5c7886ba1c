// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles materials, textures and the global uniform bind group.

pub mod global_bindings;
pub mod material;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{GlobalBindings, GlobalUBO, GlobalUBOContent, LightState, ShadowSettings};
pub use material::{Color, Material, Shading, Side};
pub use texture_resource::TextureResource;
