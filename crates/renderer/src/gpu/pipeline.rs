//! Shader program building and the per-program resource bundle.
//!
//! Each stage is compiled under its own validation error scope so driver
//! diagnostics surface as [`RendererError::ShaderCompile`] instead of an
//! uncaptured device error; pipeline creation plays the role of linking and
//! gets the same treatment. Stage modules are dropped as soon as the
//! pipeline exists.

use std::borrow::Cow;

use fractal::{Formula, FractalConfig, UniformLayout, UniformValues};
use wgpu::naga::ShaderStage;

use crate::error::{RendererError, ShaderStageKind};

/// Resources shared by every program the renderer ever builds.
pub(crate) struct PipelineShared {
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl PipelineShared {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("fractal uniform layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });
        Self { bind_group_layout }
    }
}

/// One compiled program and the resources whose lifetime is tied to it: the
/// uniform buffer, its bind group, the staged uniform block with its
/// resolved name → offset map, and the formula the program was compiled
/// from. Replaced wholesale on recompilation; the handle map is never
/// reused across programs, and uniform pushes always go through the
/// program's own formula so a surviving program is never fed another
/// kind's values.
pub(crate) struct FractalPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group: wgpu::BindGroup,
    pub uniform_buffer: wgpu::Buffer,
    pub values: UniformValues,
    pub formula: &'static dyn Formula,
}

impl FractalPipeline {
    pub(crate) fn build(
        device: &wgpu::Device,
        shared: &PipelineShared,
        surface_format: wgpu::TextureFormat,
        formula: &'static dyn Formula,
        config: &FractalConfig,
    ) -> Result<Self, RendererError> {
        let sources = fractal::instantiate(formula, config)?;

        let vertex = compile_stage(device, ShaderStageKind::Vertex, &sources.vertex)?;
        let fragment = compile_stage(device, ShaderStageKind::Fragment, &sources.fragment)?;

        let layout = UniformLayout::for_program(formula.uniforms());
        let values = UniformValues::new(layout);

        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("fractal uniforms"),
            size: values.bytes().len() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("fractal uniform bind group"),
            layout: &shared.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(RendererError::ResourceCreation(error.to_string()));
        }

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("fractal pipeline layout"),
            bind_group_layouts: &[&shared.bind_group_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("fractal pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex,
                entry_point: Some("main"),
                buffers: &[crate::quad::QuadVertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment,
                entry_point: Some("main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });
        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(RendererError::ShaderLink {
                log: error.to_string(),
            });
        }

        Ok(Self {
            pipeline,
            bind_group,
            uniform_buffer,
            values,
            formula,
        })
    }
}

/// Compiles one GLSL stage, surfacing the driver log on rejection. The
/// module is the only side effect; externally owned bindings are untouched.
fn compile_stage(
    device: &wgpu::Device,
    stage: ShaderStageKind,
    source: &str,
) -> Result<wgpu::ShaderModule, RendererError> {
    let naga_stage = match stage {
        ShaderStageKind::Vertex => ShaderStage::Vertex,
        ShaderStageKind::Fragment => ShaderStage::Fragment,
    };

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(match stage {
            ShaderStageKind::Vertex => "fractal vertex stage",
            ShaderStageKind::Fragment => "fractal fragment stage",
        }),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(source),
            stage: naga_stage,
            defines: &[],
        },
    });
    match pollster::block_on(device.pop_error_scope()) {
        Some(error) => Err(RendererError::ShaderCompile {
            stage,
            log: error.to_string(),
        }),
        None => Ok(module),
    }
}
