//! Loading of the floor texture and the text font from disk.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use cgmath::Vector2;
use image::RgbaImage;
use log::info;
use rusttype::{Font, OutlineBuilder, Scale};

use crate::{
    config::AssetConfig,
    error::{Result, ShowcaseError},
    gfx::geometry::text::{GlyphOutline, GlyphSource},
};

/// Decodes an image file into RGBA8.
pub fn load_texture(path: impl AsRef<Path>) -> Result<Arc<RgbaImage>> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|source| ShowcaseError::Texture {
        path: path.to_path_buf(),
        source,
    })?;
    let image = image.to_rgba8();
    info!(
        "Loaded texture '{}' ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(Arc::new(image))
}

/// Glyph outlines read from a TrueType/OpenType font.
pub struct FontGlyphs {
    name: String,
    font: Font<'static>,
}

impl fmt::Debug for FontGlyphs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontGlyphs").field("name", &self.name).finish()
    }
}

impl FontGlyphs {
    pub fn load(name: &str, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = std::fs::read(&path).map_err(|source| ShowcaseError::FontRead {
            name: name.to_string(),
            path: path.clone(),
            source,
        })?;
        let font = Font::try_from_vec(data).ok_or_else(|| ShowcaseError::FontParse {
            name: name.to_string(),
            path: path.clone(),
        })?;
        info!("Loaded font '{}' from '{}'", name, path.display());
        Ok(Self {
            name: name.to_string(),
            font,
        })
    }

    /// Scale at which one em measures `size` units.
    fn em_scale(&self, size: f32) -> Scale {
        let metrics = self.font.v_metrics_unscaled();
        let height = metrics.ascent - metrics.descent;
        let units_per_em = f32::from(self.font.units_per_em().max(1));
        Scale::uniform(size * height / units_per_em)
    }
}

impl GlyphSource for FontGlyphs {
    fn glyph(&self, ch: char, size: f32, curve_segments: u32) -> GlyphOutline {
        let glyph = self.font.glyph(ch).scaled(self.em_scale(size));
        let advance = glyph.h_metrics().advance_width;

        let mut builder = ContourBuilder::new(curve_segments);
        // Whitespace has no outline; the advance is still used.
        glyph.build_outline(&mut builder);

        GlyphOutline {
            contours: builder.finish(),
            advance,
        }
    }

    fn kerning(&self, left: char, right: char, size: f32) -> f32 {
        self.font.pair_kerning(self.em_scale(size), left, right)
    }
}

/// Flattens outline commands into closed polylines, converting rusttype's
/// y-down coordinates to y-up.
struct ContourBuilder {
    curve_segments: u32,
    contours: Vec<Vec<Vector2<f32>>>,
    current: Vec<Vector2<f32>>,
    last: Vector2<f32>,
}

impl ContourBuilder {
    fn new(curve_segments: u32) -> Self {
        Self {
            curve_segments: curve_segments.max(1),
            contours: Vec::new(),
            current: Vec::new(),
            last: Vector2::new(0.0, 0.0),
        }
    }

    fn push(&mut self, point: Vector2<f32>) {
        self.current.push(point);
        self.last = point;
    }

    fn flush(&mut self) {
        let contour = std::mem::take(&mut self.current);
        if contour.len() >= 3 {
            self.contours.push(contour);
        }
    }

    fn finish(mut self) -> Vec<Vec<Vector2<f32>>> {
        self.flush();
        self.contours
    }
}

fn up(x: f32, y: f32) -> Vector2<f32> {
    Vector2::new(x, -y)
}

impl OutlineBuilder for ContourBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.flush();
        self.push(up(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(up(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let start = self.last;
        let control = up(x1, y1);
        let end = up(x, y);
        for step in 1..=self.curve_segments {
            let t = step as f32 / self.curve_segments as f32;
            let mt = 1.0 - t;
            self.push(start * (mt * mt) + control * (2.0 * mt * t) + end * (t * t));
        }
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let start = self.last;
        let (c1, c2, end) = (up(x1, y1), up(x2, y2), up(x, y));
        for step in 1..=self.curve_segments {
            let t = step as f32 / self.curve_segments as f32;
            let mt = 1.0 - t;
            self.push(
                start * (mt * mt * mt)
                    + c1 * (3.0 * mt * mt * t)
                    + c2 * (3.0 * mt * t * t)
                    + end * (t * t * t),
            );
        }
    }

    fn close(&mut self) {
        self.flush();
    }
}

/// Everything the composer reads from disk.
pub struct SceneAssets {
    pub floor_texture: Arc<RgbaImage>,
    pub font: Box<dyn GlyphSource>,
}

impl SceneAssets {
    pub fn load(config: &AssetConfig, font_name: &str) -> Result<Self> {
        let floor_texture = load_texture(&config.floor_texture)?;
        let font = FontGlyphs::load(font_name, config.font_path(font_name))?;
        Ok(Self {
            floor_texture,
            font: Box::new(font),
        })
    }
}
