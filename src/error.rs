//! Error type shared by the scene composer, asset loading and the renderer.
//!
//! Every failure during startup is fatal: the error travels back to `main`,
//! gets logged and the process exits. During the frame loop an error stops the
//! loop because the next frame is only scheduled after a successful render.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShowcaseError {
    #[error("failed to load texture '{path}'")]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to read font '{name}' from '{path}'")]
    FontRead {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("font '{name}' at '{path}' is not a valid TrueType/OpenType font")]
    FontParse { name: String, path: PathBuf },

    #[error("scene node '{name}' is invalid: {reason}")]
    InvalidNode { name: String, reason: &'static str },

    #[error("no scene node with id {0}")]
    UnknownNode(usize),

    #[error("no suitable GPU adapter")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create surface")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to open GPU device")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface error while rendering a frame")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("render pipeline '{0}' is not available")]
    MissingPipeline(String),

    #[error("overlay rendering failed: {0}")]
    Overlay(String),

    #[error("event loop error")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window")]
    Window(#[from] winit::error::OsError),
}

pub type Result<T, E = ShowcaseError> = std::result::Result<T, E>;
