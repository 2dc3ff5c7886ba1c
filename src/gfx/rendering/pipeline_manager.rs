//! Named render pipelines
//!
//! Pipelines are registered as [`PipelineConfig`]s and built together once
//! their shaders are loaded. Materials find theirs through [`pipeline_name`],
//! which only depends on the culled side and on whether lines are drawn.

use std::{collections::HashMap, sync::Arc};
use wgpu::*;

use crate::{
    error::{Result, ShowcaseError},
    gfx::{
        resources::material::{Material, Side},
        scene::vertex::Vertex3D,
    },
};

pub const MESH_FRONT: &str = "Mesh/Front";
pub const MESH_BACK: &str = "Mesh/Back";
pub const MESH_DOUBLE: &str = "Mesh/Double";
pub const LINES: &str = "Lines";
pub const SHADOW: &str = "Shadow";

/// Faces culled for a material side. Front faces wind counter-clockwise.
pub fn cull_mode_for(side: Side) -> Option<Face> {
    match side {
        Side::Front => Some(Face::Back),
        Side::Back => Some(Face::Front),
        Side::Double => None,
    }
}

/// Pipeline a material is drawn with.
pub fn pipeline_name(material: &Material, topology: PrimitiveTopology) -> &'static str {
    if topology == PrimitiveTopology::LineList {
        return LINES;
    }
    match material.side {
        Side::Front => MESH_FRONT,
        Side::Back => MESH_BACK,
        Side::Double => MESH_DOUBLE,
    }
}

/// Everything needed to build one pipeline. Without colour targets the
/// fragment stage is left out (depth-only passes).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub shader: String,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub topology: PrimitiveTopology,
    pub cull_mode: Option<Face>,
    pub depth_format: Option<TextureFormat>,
    pub depth_bias: DepthBiasState,
    pub color_targets: Vec<Option<ColorTargetState>>,
}

impl PipelineConfig {
    /// Triangle list with back faces culled and no attachments yet.
    pub fn new(shader: &str) -> Self {
        Self {
            shader: shader.to_string(),
            bind_group_layouts: Vec::new(),
            topology: PrimitiveTopology::TriangleList,
            cull_mode: Some(Face::Back),
            depth_format: None,
            depth_bias: DepthBiasState::default(),
            color_targets: Vec::new(),
        }
    }

    pub fn is_depth_only(&self) -> bool {
        self.color_targets.is_empty()
    }

    pub fn with_color_format(mut self, format: TextureFormat) -> Self {
        self.color_targets = vec![Some(ColorTargetState {
            format,
            blend: Some(BlendState::ALPHA_BLENDING),
            write_mask: ColorWrites::ALL,
        })];
        self
    }

    pub fn with_depth_format(mut self, format: TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    pub fn with_depth_bias(mut self, bias: DepthBiasState) -> Self {
        self.depth_bias = bias;
        self
    }

    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    pub fn with_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }
}

/// Owns shader modules and the render pipelines built from them
pub struct PipelineManager {
    device: Arc<Device>,
    shaders: HashMap<String, ShaderModule>,
    pending: Vec<(String, PipelineConfig)>,
    pipelines: HashMap<String, RenderPipeline>,
}

impl PipelineManager {
    pub fn new(device: Arc<Device>) -> Self {
        Self {
            device,
            shaders: HashMap::new(),
            pending: Vec::new(),
            pipelines: HashMap::new(),
        }
    }

    pub fn load_shader(&mut self, name: &str, source: &str) {
        let module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });
        self.shaders.insert(name.to_string(), module);
    }

    /// Queues a pipeline; nothing is created until [`Self::build_pending`].
    pub fn register(&mut self, name: &str, config: PipelineConfig) {
        self.pending.push((name.to_string(), config));
    }

    /// Builds every queued pipeline. Fails on the first one whose shader was
    /// never loaded.
    pub fn build_pending(&mut self) -> Result<()> {
        for (name, config) in std::mem::take(&mut self.pending) {
            let pipeline = self.build(&name, &config)?;
            log::debug!("Created pipeline '{}'", name);
            self.pipelines.insert(name, pipeline);
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&RenderPipeline> {
        self.pipelines
            .get(name)
            .ok_or_else(|| ShowcaseError::MissingPipeline(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    fn build(&self, name: &str, config: &PipelineConfig) -> Result<RenderPipeline> {
        let shader = self
            .shaders
            .get(&config.shader)
            .ok_or_else(|| ShowcaseError::MissingPipeline(format!("{name} ({})", config.shader)))?;

        let layouts: Vec<&BindGroupLayout> = config.bind_group_layouts.iter().collect();
        let layout = self
            .device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some(name),
                bind_group_layouts: &layouts,
                push_constant_ranges: &[],
            });

        let fragment = (!config.is_depth_only()).then(|| FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &config.color_targets,
            compilation_options: PipelineCompilationOptions::default(),
        });

        Ok(self
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some(name),
                layout: Some(&layout),
                vertex: VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex3D::desc()],
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment,
                primitive: PrimitiveState {
                    topology: config.topology,
                    front_face: FrontFace::Ccw,
                    cull_mode: config.cull_mode,
                    ..Default::default()
                },
                depth_stencil: config.depth_format.map(|format| DepthStencilState {
                    format,
                    depth_write_enabled: true,
                    depth_compare: CompareFunction::LessEqual,
                    stencil: StencilState::default(),
                    bias: config.depth_bias,
                }),
                multisample: MultisampleState::default(),
                multiview: None,
                cache: None,
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::material::Color;

    #[test]
    fn sides_cull_the_opposite_faces() {
        assert_eq!(cull_mode_for(Side::Front), Some(Face::Back));
        assert_eq!(cull_mode_for(Side::Back), Some(Face::Front));
        assert_eq!(cull_mode_for(Side::Double), None);
    }

    #[test]
    fn materials_pick_pipelines_by_side_and_topology() {
        let lathe = Material::phong("acorn", Color::WHITE).with_side(Side::Double);
        assert_eq!(pipeline_name(&lathe, PrimitiveTopology::TriangleList), MESH_DOUBLE);
        assert_eq!(pipeline_name(&lathe, PrimitiveTopology::LineList), LINES);

        let floor = Material::phong("floor", Color::WHITE).with_side(Side::Back);
        assert_eq!(pipeline_name(&floor, PrimitiveTopology::TriangleList), MESH_BACK);
    }

    #[test]
    fn configs_without_colour_targets_are_depth_only() {
        let shadow = PipelineConfig::new("shadow");
        assert!(shadow.is_depth_only());
        let mesh = shadow.with_color_format(TextureFormat::Bgra8Unorm);
        assert!(!mesh.is_depth_only());
    }
}
