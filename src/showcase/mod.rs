//! # Acorn Showcase
//!
//! Composes the demo scene once at startup and animates it every frame.
//!
//! The scene holds, in order: a directional light, a textured floor, a large
//! wireframe cube, a lathed acorn, a line of extruded text and the axes
//! helper. Each frame the acorn spins about its own long axis (local Z) and
//! the camera takes one step along its orbit before the trackball controls
//! apply any pointer input.
//!
//! Rendering and frame scheduling are injected through [`FrameRenderer`] and
//! [`FrameScheduler`], so the whole loop runs without a window in tests.

pub mod acorn;
pub mod frame;

pub use acorn::acorn_profile;
pub use frame::{orbit_step, FrameBudget, FrameRenderer, FrameScheduler};

use std::{f32::consts::FRAC_PI_2, sync::Arc};

use cgmath::{InnerSpace, Vector3, Zero};
use log::{debug, info};

use crate::{
    assets::SceneAssets,
    config::{AnimationConfig, ShowcaseConfig},
    error::Result,
    gfx::{
        camera::{PerspectiveCamera, TrackballControls},
        geometry::{generate_axes, generate_box, generate_lathe, generate_text, TextOptions},
        resources::material::{Color, Material, Side},
        scene::{DirectionalLight, NodeId, Scene, SceneNode},
    },
    performance::PerformanceMonitor,
};

pub const TEXT: &str = "Acorns - Invest the Change.";
pub const TEXT_FONT: &str = "helvetiker";

const ACORN_COLOR: u32 = 0x74C947;
const TEXT_COLOR: u32 = 0x9a71f6;
const SOLID_EMISSIVE: u32 = 0x005500;
const WIRE_EMISSIVE: u32 = 0x001100;
const CUBE_COLOR: u32 = 0x0fffff;

const LATHE_SEGMENTS: u32 = 40;
/// X rotation of the acorn, in radians. Wraps to about +91 degrees, which
/// turns the lathe's +Z height axis downwards so the stem hangs on top.
const ACORN_TILT: f32 = -300.0;
const AXES_LENGTH: f32 = 1000.0;

/// Everything the frame loop mutates, owned by the host.
pub struct Showcase {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub controls: TrackballControls,
    pub stats: PerformanceMonitor,
    acorn: NodeId,
    animation: AnimationConfig,
}

/// Black wireframe drawn over a solid pass.
fn wire_overlay(name: &str) -> Material {
    Material::phong(name, Color::from_hex(0x000000))
        .with_emissive(Color::from_hex(WIRE_EMISSIVE))
        .with_wireframe(true)
}

impl Showcase {
    /// Builds the scene. `viewport` is read once; resizes do not touch the
    /// camera aspect or the controls.
    pub fn compose(
        config: &ShowcaseConfig,
        assets: &SceneAssets,
        viewport: (u32, u32),
    ) -> Result<Self> {
        let (width, height) = viewport;
        let mut scene = Scene::new();

        let mut camera = PerspectiveCamera::new(
            config.camera.fov_deg,
            width as f32 / height.max(1) as f32,
            config.camera.near,
            config.camera.far,
        );
        camera.set_position(config.camera.initial_position);
        camera.look_at(Vector3::zero());

        let light = &config.light;
        let direction = if light.position.is_zero() {
            Vector3::unit_y()
        } else {
            light.position.normalize()
        };
        scene.add(
            SceneNode::light(
                "light",
                DirectionalLight {
                    color: light.color,
                    intensity: light.intensity,
                    cast_shadow: light.cast_shadow,
                    shadow_darkness: light.shadow_darkness,
                },
            )
            .with_position(direction),
        )?;

        scene.add(
            SceneNode::mesh(
                "floor",
                Arc::new(generate_box(100.0, 100.0, 5.0, 1, 1, 1)),
                vec![Material::phong("floor", Color::from_hex(0xffffff))
                    .with_map(assets.floor_texture.clone())
                    .with_side(Side::Double)],
            )
            .with_rotation(Vector3::new(-FRAC_PI_2, 0.0, 0.0))
            .with_position(Vector3::new(0.0, -5.0, 0.0))
            .with_shadows(true, false),
        )?;

        scene.add(SceneNode::mesh(
            "cube",
            Arc::new(generate_box(500.0, 500.0, 500.0, 32, 32, 32)),
            vec![Material::basic("cube", Color::from_hex(CUBE_COLOR)).with_wireframe(true)],
        ))?;

        let acorn = scene.add(
            SceneNode::mesh(
                "acorn",
                Arc::new(generate_lathe(&acorn_profile(), LATHE_SEGMENTS)),
                vec![
                    Material::phong("acorn", Color::from_hex(ACORN_COLOR))
                        .with_emissive(Color::from_hex(SOLID_EMISSIVE)),
                    wire_overlay("acorn wireframe"),
                ],
            )
            .with_rotation(Vector3::new(ACORN_TILT, 0.0, 0.0))
            .with_scale(5.0)
            .with_position(Vector3::new(0.0, 40.0, 0.0))
            .with_shadows(true, false),
        )?;

        let text = generate_text(
            TEXT,
            assets.font.as_ref(),
            &TextOptions {
                size: 3.0,
                depth: 1.0,
                curve_segments: 3,
                bend: true,
            },
        );
        debug!(
            "Text geometry: {} vertices, {} triangles",
            text.vertex_count(),
            text.triangle_count()
        );
        scene.add(
            SceneNode::mesh(
                "text",
                Arc::new(text),
                vec![
                    Material::phong("text", Color::from_hex(TEXT_COLOR))
                        .with_emissive(Color::from_hex(SOLID_EMISSIVE)),
                    wire_overlay("text wireframe"),
                ],
            )
            .with_position(Vector3::new(-25.0, 1.0, 0.0))
            .with_shadows(true, false),
        )?;

        // Final resting place; the first placement only set the orientation.
        camera.set_position(config.camera.final_position);

        scene.add(SceneNode::line_segments(
            "axes",
            Arc::new(generate_axes(AXES_LENGTH)),
            Material::basic("axes", Color::WHITE).with_vertex_colors(),
        ))?;

        let stats = PerformanceMonitor::new();
        let controls = TrackballControls::new(&config.controls, width, height);

        let statistics = scene.statistics();
        info!(
            "Scene composed: {} nodes, {} draw passes, {} triangles",
            statistics.node_count, statistics.draw_passes, statistics.total_triangles
        );
        debug!("Scene order: {:?}", scene.node_names());

        Ok(Self {
            scene,
            camera,
            controls,
            stats,
            acorn,
            animation: config.animation.clone(),
        })
    }

    /// Handle of the spinning acorn node.
    pub fn acorn(&self) -> NodeId {
        self.acorn
    }
}
