//! Global uniform bindings for camera and scene data
//!
//! Manages the uniform buffer and bind group for per-frame state shared by
//! every draw: camera matrices, the directional light and the shadow camera
//! used for shadow mapping.

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, Vector3, Zero};

use crate::{
    config::{LightConfig, RendererConfig, ShadowMapType},
    gfx::{
        camera::camera_utils::{to_columns, CameraUniform, OPENGL_TO_WGPU_MATRIX},
        resources::material::Color,
        scene::{DirectionalLight, Scene},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in the shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_proj: [[f32; 4]; 4],
    light_view_proj: [[f32; 4]; 4],
    view_position: [f32; 4],
    /// Unit vector pointing towards the light.
    light_direction: [f32; 4],
    /// rgb colour, a = intensity
    light_color: [f32; 4],
    /// x = darkness, y = map size, z = depth bias, w = mode (0 off, 1 basic, 2 pcf)
    shadow: [f32; 4],
}
// Total: 64 + 64 + 16 * 4 = 192 bytes

/// Shadow camera and filtering parameters, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSettings {
    pub enabled: bool,
    pub pcf: bool,
    pub map_size: u32,
    pub bias: f32,
    pub near: f32,
    pub far: f32,
    pub extent: f32,
    pub distance: f32,
}

impl ShadowSettings {
    pub fn new(renderer: &RendererConfig, light: &LightConfig) -> Self {
        Self {
            enabled: renderer.shadow_map_enabled,
            pcf: renderer.shadow_map_type == ShadowMapType::PcfSoft,
            map_size: light.shadow_map_size.max(1),
            bias: light.shadow_bias,
            near: light.shadow_camera_near,
            far: light.shadow_camera_far,
            extent: light.shadow_camera_extent,
            distance: light.shadow_camera_distance,
        }
    }

    /// Orthographic view-projection of a camera placed `distance` along the
    /// light direction, looking at the origin.
    pub fn light_view_proj(&self, direction: Vector3<f32>) -> Matrix4<f32> {
        let eye = Point3::from_vec(direction * self.distance);
        // Keep the up vector away from the viewing axis.
        let up = if direction.y.abs() > 0.99 {
            Vector3::unit_z()
        } else {
            Vector3::unit_y()
        };
        let view = Matrix4::look_at_rh(eye, Point3::origin(), up);
        let projection = cgmath::ortho(
            -self.extent,
            self.extent,
            -self.extent,
            self.extent,
            self.near,
            self.far,
        );
        OPENGL_TO_WGPU_MATRIX * projection * view
    }
}

/// Light state pulled from the scene each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightState {
    pub direction: Vector3<f32>,
    pub color: Color,
    pub intensity: f32,
    pub cast_shadow: bool,
    pub shadow_darkness: f32,
}

impl LightState {
    /// Uses the scene's first directional light, or darkness if it has none.
    pub fn from_scene(scene: &Scene) -> Self {
        match scene.directional_light() {
            Some((node, light)) => Self::new(node.transform.position, light),
            None => Self {
                direction: Vector3::unit_y(),
                color: Color::BLACK,
                intensity: 0.0,
                cast_shadow: false,
                shadow_darkness: 0.0,
            },
        }
    }

    pub fn new(position: Vector3<f32>, light: &DirectionalLight) -> Self {
        let direction = if position.is_zero() {
            Vector3::unit_y()
        } else {
            position.normalize()
        };
        Self {
            direction,
            color: light.color,
            intensity: light.intensity,
            cast_shadow: light.cast_shadow,
            shadow_darkness: light.shadow_darkness,
        }
    }
}

impl GlobalUBOContent {
    pub fn new(camera: CameraUniform, light: &LightState, shadows: &ShadowSettings) -> Self {
        let mode = match (shadows.enabled && light.cast_shadow, shadows.pcf) {
            (false, _) => 0.0,
            (true, false) => 1.0,
            (true, true) => 2.0,
        };

        Self {
            view_proj: camera.view_proj,
            light_view_proj: to_columns(shadows.light_view_proj(light.direction)),
            view_position: camera.view_position,
            light_direction: light.direction.extend(0.0).into(),
            light_color: [light.color.r, light.color.g, light.color.b, light.intensity],
            shadow: [
                light.shadow_darkness,
                shadows.map_size as f32,
                shadows.bias,
                mode,
            ],
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Manages bind group layouts and bind groups for global uniforms
///
/// Bound to slot 0 in all render pipelines.
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
