#![allow(dead_code)]

use std::sync::Arc;

use acorn_scene::{
    assets::SceneAssets,
    gfx::{
        camera::PerspectiveCamera,
        geometry::{GlyphOutline, GlyphSource},
        scene::Scene,
    },
    performance::PerformanceMonitor,
    showcase::FrameRenderer,
    Result, ShowcaseError,
};
use cgmath::{Vector2, Vector3};
use image::{Rgba, RgbaImage};

/// Every visible character is a filled square; spaces only advance.
pub struct SquareGlyphs;

impl GlyphSource for SquareGlyphs {
    fn glyph(&self, ch: char, size: f32, _curve_segments: u32) -> GlyphOutline {
        if ch.is_whitespace() {
            return GlyphOutline {
                contours: Vec::new(),
                advance: size * 0.5,
            };
        }
        let s = size * 0.6;
        GlyphOutline {
            contours: vec![vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(s, 0.0),
                Vector2::new(s, s),
                Vector2::new(0.0, s),
            ]],
            advance: size * 0.7,
        }
    }
}

pub fn test_assets() -> SceneAssets {
    SceneAssets {
        floor_texture: Arc::new(RgbaImage::from_pixel(2, 2, Rgba([200, 150, 90, 255]))),
        font: Box::new(SquareGlyphs),
    }
}

/// What the renderer saw when a frame was drawn.
#[derive(Debug, Clone, Copy)]
pub struct FrameRecord {
    pub camera_position: Vector3<f32>,
    pub acorn_spin: f32,
}

#[derive(Default)]
pub struct RecordingRenderer {
    pub frames: Vec<FrameRecord>,
    /// Fail on this zero-based frame.
    pub fail_at: Option<usize>,
}

impl RecordingRenderer {
    pub fn failing_at(frame: usize) -> Self {
        Self {
            frames: Vec::new(),
            fail_at: Some(frame),
        }
    }
}

impl FrameRenderer for RecordingRenderer {
    fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
        _stats: &mut PerformanceMonitor,
    ) -> Result<()> {
        if self.fail_at == Some(self.frames.len()) {
            return Err(ShowcaseError::Overlay("device lost".to_string()));
        }
        let acorn = scene
            .find("acorn")
            .and_then(|id| scene.get(id).ok())
            .map(|node| node.transform.rotation.z)
            .unwrap_or_default();
        self.frames.push(FrameRecord {
            camera_position: camera.position,
            acorn_spin: acorn,
        });
        Ok(())
    }
}
