//! WGPU-based forward renderer for the acorn scene
//!
//! Each frame runs a depth-only shadow pass from the directional light, then
//! the main pass that draws every node once per material, then an optional
//! overlay callback that renders on top of the finished image.

use std::{collections::HashMap, sync::Arc};

use bytemuck::Zeroable;
use cgmath::Matrix4;
use log::{debug, info, warn};
use wgpu::{Device, PrimitiveTopology, TextureFormat};

use crate::{
    config::ShowcaseConfig,
    error::Result,
    gfx::{
        camera::{camera_utils::to_columns, PerspectiveCamera},
        resources::{
            global_bindings::{
                GlobalBindings, GlobalUBO, GlobalUBOContent, LightState, ShadowSettings,
            },
            material::{Material, Side},
            texture_resource::TextureResource,
        },
        scene::{NodeId, NodeKind, Scene},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

use super::pipeline_manager::{
    cull_mode_for, pipeline_name, PipelineConfig, PipelineManager, LINES, MESH_BACK, MESH_DOUBLE,
    MESH_FRONT, SHADOW,
};
use super::render_pass_ext::{DrawMesh, GpuMesh};

/// Per-draw uniform content
///
/// MUST match the `Draw` struct in the shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniformContent {
    model: [[f32; 4]; 4],
    /// rgb colour, a = opacity
    color: [f32; 4],
    /// rgb emissive, a = shininess
    emissive: [f32; 4],
    specular: [f32; 4],
    /// x = use map, y = lit, z = receive shadow, w = vertex colours
    flags: [f32; 4],
}
// Total: 64 + 16 * 4 = 128 bytes

fn flag(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}

impl DrawUniformContent {
    pub fn new(model: Matrix4<f32>, material: &Material, receive_shadow: bool) -> Self {
        let color = material.color;
        let emissive = material.emissive;
        let specular = material.specular;
        Self {
            model: to_columns(model),
            color: [color.r, color.g, color.b, material.opacity],
            emissive: [emissive.r, emissive.g, emissive.b, material.shininess],
            specular: [specular.r, specular.g, specular.b, 0.0],
            flags: [
                flag(material.map.is_some()),
                flag(material.is_lit()),
                flag(receive_shadow && material.is_lit()),
                flag(material.vertex_colors),
            ],
        }
    }
}

/// One node drawn with one of its materials
struct DrawItem {
    node: NodeId,
    material: usize,
    mesh: usize,
    pipeline: &'static str,
    cast_shadow: bool,
    receive_shadow: bool,
    uniform: UniformBuffer<DrawUniformContent>,
    bind_group: wgpu::BindGroup,
}

/// Owns the surface, the uploaded scene and every pipeline it is drawn with
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,

    shadow_map: TextureResource,
    shadow_bind_group: wgpu::BindGroup,
    shadow_settings: ShadowSettings,

    draw_layout: BindGroupLayoutWithDesc,
    white_pixel: TextureResource,
    textures: Vec<TextureResource>,
    meshes: Vec<GpuMesh>,
    draws: Vec<DrawItem>,
    clear_color: wgpu::Color,
}

impl RenderEngine {
    /// Opens a device for `window` and builds the pipelines. Call
    /// [`Self::upload_scene`] before the first frame.
    ///
    /// Picks a non-sRGB surface format so hex colours are written as authored,
    /// creates the depth buffer and shadow map and builds every pipeline.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        showcase: &ShowcaseConfig,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let alpha_mode = if showcase.renderer.alpha {
            surface_capabilities
                .alpha_modes
                .iter()
                .copied()
                .find(|mode| {
                    matches!(
                        mode,
                        wgpu::CompositeAlphaMode::PreMultiplied
                            | wgpu::CompositeAlphaMode::PostMultiplied
                    )
                })
                .unwrap_or(surface_capabilities.alpha_modes[0])
        } else {
            surface_capabilities.alpha_modes[0]
        };

        let present_mode = if !showcase.renderer.vsync
            && surface_capabilities
                .present_modes
                .contains(&wgpu::PresentMode::Immediate)
        {
            wgpu::PresentMode::Immediate
        } else {
            wgpu::PresentMode::Fifo
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let shadow_settings = ShadowSettings::new(&showcase.renderer, &showcase.light);
        let shadow_map = TextureResource::create_shadow_map(&device, shadow_settings.map_size);

        let shadow_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::shadow_map())
            .next_binding_fragment(binding_types::comparison_sampler())
            .create(&device, "Shadow Bind Group Layout");
        let shadow_bind_group = BindGroupBuilder::new(&shadow_layout)
            .texture(&shadow_map.view)
            .sampler(&shadow_map.sampler)
            .create(&device, "Shadow Bind Group");

        let draw_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .next_binding_fragment(binding_types::color_texture())
            .next_binding_fragment(binding_types::filtering_sampler())
            .create(&device, "Draw Bind Group Layout");

        let global_ubo = GlobalUBO::new(&device, "Globals", &GlobalUBOContent::zeroed());
        let global_bindings = GlobalBindings::new(&device, &global_ubo);

        let white_pixel = TextureResource::white_pixel(&device, &queue);

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("phong", include_str!("phong.wgsl"));
        pipeline_manager.load_shader("shadow", include_str!("shadow_pass.wgsl"));

        let main_layouts = vec![
            global_bindings.bind_group_layout().clone(),
            draw_layout.layout.clone(),
            shadow_layout.layout.clone(),
        ];

        for (name, side) in [
            (MESH_FRONT, Side::Front),
            (MESH_BACK, Side::Back),
            (MESH_DOUBLE, Side::Double),
        ] {
            pipeline_manager.register(
                name,
                PipelineConfig::new("phong")
                    .with_color_format(format)
                    .with_depth_format(TextureResource::DEPTH_FORMAT)
                    .with_cull_mode(cull_mode_for(side))
                    .with_bind_group_layouts(main_layouts.clone()),
            );
        }

        pipeline_manager.register(
            LINES,
            PipelineConfig::new("phong")
                .with_color_format(format)
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_topology(PrimitiveTopology::LineList)
                .with_cull_mode(None)
                .with_bind_group_layouts(main_layouts),
        );

        // No culling so open meshes still occlude light from behind.
        pipeline_manager.register(
            SHADOW,
            PipelineConfig::new("shadow")
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_depth_bias(wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 2.0,
                    clamp: 0.0,
                })
                .with_cull_mode(None)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    draw_layout.layout.clone(),
                ]),
        );

        pipeline_manager.build_pending()?;
        debug!("{} pipelines ready", pipeline_manager.len());

        let clear = showcase.renderer.clear_color;

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            shadow_map,
            shadow_bind_group,
            shadow_settings,
            draw_layout,
            white_pixel,
            textures: Vec::new(),
            meshes: Vec::new(),
            draws: Vec::new(),
            clear_color: wgpu::Color {
                r: clear.r as f64,
                g: clear.g as f64,
                b: clear.b as f64,
                a: showcase.renderer.clear_alpha as f64,
            },
        })
    }

    /// Uploads geometry and textures for every drawable node
    ///
    /// Geometry shared between nodes through the same `Arc` is uploaded once
    /// per topology. Node transforms and material colours are re-read every
    /// frame, so only structural changes need another upload.
    pub fn upload_scene(&mut self, scene: &Scene) {
        self.textures.clear();
        self.meshes.clear();
        self.draws.clear();

        let mut mesh_cache: HashMap<(usize, bool), usize> = HashMap::new();
        let mut texture_cache: HashMap<usize, usize> = HashMap::new();

        for (index, node) in scene.nodes().iter().enumerate() {
            let (geometry, cast_shadow, receive_shadow, lines) = match &node.kind {
                NodeKind::DirectionalLight(_) => continue,
                NodeKind::Mesh {
                    geometry,
                    cast_shadow,
                    receive_shadow,
                    ..
                } => (geometry, *cast_shadow, *receive_shadow, false),
                NodeKind::LineSegments { geometry, .. } => (geometry, false, false, true),
            };

            for (material_index, material) in node.materials().iter().enumerate() {
                let topology = if lines || material.wireframe {
                    PrimitiveTopology::LineList
                } else {
                    PrimitiveTopology::TriangleList
                };

                let key = (
                    Arc::as_ptr(geometry) as usize,
                    topology == PrimitiveTopology::LineList,
                );
                let mesh = match mesh_cache.get(&key) {
                    Some(&mesh) => mesh,
                    None => {
                        let indices = if !lines && material.wireframe {
                            geometry.edge_indices()
                        } else {
                            geometry.indices.clone()
                        };
                        self.meshes.push(GpuMesh::new(
                            &self.device,
                            geometry,
                            &indices,
                            topology,
                            &node.name,
                        ));
                        mesh_cache.insert(key, self.meshes.len() - 1);
                        self.meshes.len() - 1
                    }
                };

                let texture = match &material.map {
                    Some(map) => {
                        let key = Arc::as_ptr(map) as usize;
                        let slot = match texture_cache.get(&key) {
                            Some(&slot) => slot,
                            None => {
                                self.textures.push(TextureResource::from_image(
                                    &self.device,
                                    &self.queue,
                                    map,
                                    &material.name,
                                ));
                                texture_cache.insert(key, self.textures.len() - 1);
                                self.textures.len() - 1
                            }
                        };
                        &self.textures[slot]
                    }
                    None => &self.white_pixel,
                };

                let uniform = UniformBuffer::new(
                    &self.device,
                    &format!("{} uniform", node.name),
                    &DrawUniformContent::new(node.transform.matrix(), material, receive_shadow),
                );
                let bind_group = BindGroupBuilder::new(&self.draw_layout)
                    .resource(uniform.binding_resource())
                    .texture(&texture.view)
                    .sampler(&texture.sampler)
                    .create(&self.device, &format!("{} / {}", node.name, material.name));

                self.draws.push(DrawItem {
                    node: NodeId(index),
                    material: material_index,
                    mesh,
                    pipeline: pipeline_name(material, topology),
                    cast_shadow,
                    receive_shadow,
                    uniform,
                    bind_group,
                });
            }
        }

        info!(
            "Uploaded scene: {} draws, {} meshes, {} textures",
            self.draws.len(),
            self.meshes.len(),
            self.textures.len()
        );
    }

    /// Renders one frame of `scene` seen through `camera`
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    /// The overlay callback records its own pass into the frame's encoder.
    pub fn render_frame<F>(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
        ui_callback: Option<F>,
    ) -> Result<()>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView) -> Result<()>,
    {
        let light = LightState::from_scene(scene);
        self.global_ubo.write(
            &self.queue,
            &GlobalUBOContent::new(camera.uniform(), &light, &self.shadow_settings),
        );
        for draw in &mut self.draws {
            let node = scene.get(draw.node)?;
            if let Some(material) = node.materials().get(draw.material) {
                draw.uniform.write(
                    &self.queue,
                    &DrawUniformContent::new(node.transform.matrix(), material, draw.receive_shadow),
                );
            }
        }

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out waiting for the next surface texture");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // PASS 1: Shadow depth from the light
        if self.shadow_settings.enabled && light.cast_shadow {
            let shadow_pipeline = self.pipeline_manager.get(SHADOW)?;
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Depth Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            shadow_pass.set_pipeline(shadow_pipeline);
            shadow_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            for draw in self.draws.iter().filter(|draw| draw.cast_shadow) {
                let mesh = &self.meshes[draw.mesh];
                if mesh.topology != PrimitiveTopology::TriangleList {
                    continue;
                }
                shadow_pass.set_bind_group(1, &draw.bind_group, &[]);
                shadow_pass.draw_mesh(mesh);
            }
        }

        // PASS 2: Main scene
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
            render_pass.set_bind_group(2, &self.shadow_bind_group, &[]);

            for draw in &self.draws {
                render_pass.set_pipeline(self.pipeline_manager.get(draw.pipeline)?);
                render_pass.set_bind_group(1, &draw.bind_group, &[]);
                render_pass.draw_mesh(&self.meshes[draw.mesh]);
            }
        }

        // PASS 3: Overlay
        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            )?;
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Resizes the surface and recreates the depth buffer
    ///
    /// Zero sized requests (minimised windows) are ignored. The shadow map
    /// keeps its fixed resolution.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::material::Color;
    use cgmath::SquareMatrix;

    #[test]
    fn draw_uniform_matches_shader_layout() {
        assert_eq!(std::mem::size_of::<DrawUniformContent>(), 128);
    }

    #[test]
    fn flags_follow_the_material() {
        let phong = Material::phong("floor", Color::WHITE);
        let content = DrawUniformContent::new(Matrix4::identity(), &phong, true);
        assert_eq!(content.flags, [0.0, 1.0, 1.0, 0.0]);
        assert_eq!(content.emissive[3], 30.0);

        let axes = Material::basic("axes", Color::WHITE).with_vertex_colors();
        let content = DrawUniformContent::new(Matrix4::identity(), &axes, true);
        // Unlit materials never receive shadows.
        assert_eq!(content.flags, [0.0, 0.0, 0.0, 1.0]);
    }
}
