//! Render pipelines.
//!
//! wgpu bakes stencil and write-mask state into the pipeline, so the scene is
//! drawn with one pipeline per distinct [`PipelineKey`]. The stencil reference
//! itself is dynamic and set per draw.

use crate::data_structures::{
    material::{Material, StencilCompare, StencilTag},
    model::{ModelVertex, Vertex},
    texture::Texture,
};

/// The pipeline relevant part of a [`Material`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub stencil_test: bool,
    pub compare: StencilCompare,
    pub colour_write: bool,
    pub depth_write: bool,
    pub double_sided: bool,
}

impl PipelineKey {
    pub fn of(material: &Material) -> Self {
        let tag = &material.stencil;
        Self {
            stencil_test: tag.write_enabled,
            compare: tag.compare,
            colour_write: tag.colour_write,
            depth_write: tag.depth_write,
            double_sided: material.double_sided,
        }
    }

    fn stencil_state(&self) -> wgpu::StencilState {
        StencilTag {
            write_enabled: self.stencil_test,
            reference: 0,
            compare: self.compare,
            colour_write: self.colour_write,
            depth_write: self.depth_write,
        }
        .to_wgpu()
    }

    fn write_mask(&self) -> wgpu::ColorWrites {
        if self.colour_write {
            wgpu::ColorWrites::ALL
        } else {
            wgpu::ColorWrites::empty()
        }
    }
}

pub fn model_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("model_bind_group_layout"),
    })
}

pub fn mk_stencil_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    model_bind_group_layout: &wgpu::BindGroupLayout,
    key: PipelineKey,
) -> wgpu::RenderPipeline {
    let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Stencil Pipeline Layout"),
        bind_group_layouts: &[camera_bind_group_layout, model_bind_group_layout],
        push_constant_ranges: &[],
    });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Stencil Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("stencil_shader.wgsl").into()),
    };

    mk_render_pipeline(
        device,
        &render_pipeline_layout,
        color_format,
        key,
        &[ModelVertex::desc()],
        shader,
    )
}

pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    key: PipelineKey,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: wgpu::ShaderModuleDescriptor,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(shader);

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some(&format!("Render Pipeline {:?}", key)),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: key.write_mask(),
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: if key.double_sided {
                None
            } else {
                Some(wgpu::Face::Back)
            },
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: Texture::DEPTH_FORMAT,
            depth_write_enabled: key.depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: key.stencil_state(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}
