//! Acorn Scene
//!
//! A small wgpu scene demo: a lathed acorn spinning above a wooden floor,
//! a line of bent, extruded text, a wireframe bounding cube and coordinate
//! axes, watched by a camera that orbits the origin while trackball controls
//! let the user rotate, zoom and pan. A frame counter sits in the corner.

pub mod app;
pub mod assets;
pub mod config;
pub mod error;
pub mod gfx;
pub mod performance;
pub mod showcase;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::AcornApp;
pub use config::ShowcaseConfig;
pub use error::{Result, ShowcaseError};
pub use showcase::Showcase;
