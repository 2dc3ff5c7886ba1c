//! Staging configuration for the acorn scene.
//!
//! Everything here is plain data with defaults that reproduce the demo as it
//! was staged: camera placement, light, controls tuning, animation steps and
//! asset locations. There is no file or command line layer; callers that want
//! a different setup build a [`ShowcaseConfig`] with the `with_*` helpers.

use std::path::{Path, PathBuf};

use cgmath::Vector3;

use crate::gfx::resources::material::Color;

/// Top level configuration, one section per concern.
#[derive(Debug, Clone, Default)]
pub struct ShowcaseConfig {
    pub window: WindowConfig,
    pub renderer: RendererConfig,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub controls: ControlsConfig,
    pub animation: AnimationConfig,
    pub assets: AssetConfig,
}

impl ShowcaseConfig {
    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    pub fn with_renderer(mut self, renderer: RendererConfig) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_light(mut self, light: LightConfig) -> Self {
        self.light = light;
        self
    }

    pub fn with_controls(mut self, controls: ControlsConfig) -> Self {
        self.controls = controls;
        self
    }

    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }

    pub fn with_assets(mut self, assets: AssetConfig) -> Self {
        self.assets = assets;
        self
    }
}

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Acorns".to_string(),
            width: 1200,
            height: 800,
        }
    }
}

/// How shadow map lookups are filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowMapType {
    /// Single hardware comparison tap.
    Basic,
    /// 3x3 percentage-closer filtering.
    PcfSoft,
}

#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Request a surface that can be composited with transparency.
    pub alpha: bool,
    pub clear_color: Color,
    pub clear_alpha: f32,
    pub shadow_map_enabled: bool,
    pub shadow_map_type: ShadowMapType,
    pub vsync: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            alpha: true,
            clear_color: Color::from_hex(0x000000),
            clear_alpha: 1.0,
            shadow_map_enabled: true,
            shadow_map_type: ShadowMapType::PcfSoft,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Position used while orienting the camera during setup.
    pub initial_position: Vector3<f32>,
    /// Position the camera rests at once setup completes.
    pub final_position: Vector3<f32>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 75.0,
            near: 1.0,
            far: 10000.0,
            initial_position: Vector3::new(30.0, 40.0, 120.0),
            final_position: Vector3::new(0.0, 60.0, 50.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LightConfig {
    pub color: Color,
    pub intensity: f32,
    /// Light position; normalized into a direction towards the light.
    pub position: Vector3<f32>,
    pub cast_shadow: bool,
    pub shadow_darkness: f32,
    pub shadow_camera_near: f32,
    pub shadow_camera_far: f32,
    /// Half extent of the orthographic shadow frustum.
    pub shadow_camera_extent: f32,
    /// Distance from the origin at which the shadow camera is placed.
    pub shadow_camera_distance: f32,
    pub shadow_map_size: u32,
    pub shadow_bias: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            color: Color::from_hex(0xffffff),
            intensity: 1.0,
            position: Vector3::new(1.0, 1.0, 1.0),
            cast_shadow: true,
            shadow_darkness: 0.5,
            shadow_camera_near: 0.01,
            shadow_camera_far: 1000.0,
            shadow_camera_extent: 300.0,
            shadow_camera_distance: 400.0,
            shadow_map_size: 2048,
            shadow_bias: 0.0005,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ControlsConfig {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub no_rotate: bool,
    pub no_zoom: bool,
    pub no_pan: bool,
    pub static_moving: bool,
    /// Only consulted when `static_moving` is false.
    pub dynamic_damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            rotate_speed: 1.0,
            zoom_speed: 0.2,
            pan_speed: 0.8,
            no_rotate: false,
            no_zoom: false,
            no_pan: false,
            static_moving: true,
            dynamic_damping_factor: 0.3,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnimationConfig {
    /// Radians removed from the acorn's z rotation every frame.
    pub acorn_spin_step: f32,
    /// Angle of the per-frame camera orbit step, in radians.
    pub orbit_step: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            acorn_spin_step: 0.02,
            orbit_step: 0.01,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssetConfig {
    pub floor_texture: PathBuf,
    /// Directory holding `<name>_regular.ttf` font files.
    pub font_dir: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            floor_texture: PathBuf::from("assets/images/wood-floor.jpg"),
            font_dir: PathBuf::from("assets/fonts"),
        }
    }
}

impl AssetConfig {
    /// Creates a config rooted at `root`, keeping the default relative layout.
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            floor_texture: root.join("images/wood-floor.jpg"),
            font_dir: root.join("fonts"),
        }
    }

    /// Resolves a font name such as `helvetiker` to its file.
    pub fn font_path(&self, name: &str) -> PathBuf {
        self.font_dir.join(format!("{name}_regular.ttf"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_staging() {
        let config = ShowcaseConfig::default();
        assert_eq!(config.camera.fov_deg, 75.0);
        assert_eq!(config.camera.final_position, Vector3::new(0.0, 60.0, 50.0));
        assert!(config.controls.static_moving);
        assert_eq!(config.controls.dynamic_damping_factor, 0.3);
        assert_eq!(config.animation.orbit_step, 0.01);
        assert_eq!(config.renderer.shadow_map_type, ShadowMapType::PcfSoft);
    }

    #[test]
    fn font_names_resolve_inside_font_dir() {
        let assets = AssetConfig::rooted_at("/data");
        assert_eq!(
            assets.font_path("helvetiker"),
            PathBuf::from("/data/fonts/helvetiker_regular.ttf")
        );
        assert_eq!(assets.floor_texture, PathBuf::from("/data/images/wood-floor.jpg"));
    }
}
