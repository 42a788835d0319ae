//! Bind group layouts and render pipelines.

use crate::texture::Texture;
use crate::vertex::{OverlayVertex, Vertex};

/// Single uniform buffer at binding 0, visible to both stages.
fn uniform_layout(device: &wgpu::Device, label: &str, dynamic: bool) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: dynamic,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

pub fn create_camera_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    uniform_layout(device, "Camera Bind Group Layout", false)
}

/// Terrain and water material uniforms share this shape.
pub fn create_material_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    uniform_layout(device, "Material Bind Group Layout", false)
}

/// Per-draw model uniform addressed by dynamic offset.
pub fn create_model_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    uniform_layout(device, "Model Bind Group Layout", true)
}

pub fn create_overlay_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Overlay Bind Group Layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

struct PipelineDesc<'a> {
    label: &'a str,
    source: &'a str,
    bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    vertex_layout: wgpu::VertexBufferLayout<'static>,
    blend: wgpu::BlendState,
    cull_mode: Option<wgpu::Face>,
    depth: Option<(bool, wgpu::CompareFunction)>,
}

fn build_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    desc: PipelineDesc<'_>,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(desc.label),
        source: wgpu::ShaderSource::Wgsl(desc.source.into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(desc.label),
        bind_group_layouts: desc.bind_group_layouts,
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[desc.vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(desc.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: desc.cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: desc.depth.map(|(write, compare)| wgpu::DepthStencilState {
            format: Texture::DEPTH_FORMAT,
            depth_write_enabled: write,
            depth_compare: compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

pub fn create_terrain_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    camera_layout: &wgpu::BindGroupLayout,
    material_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    build_pipeline(
        device,
        format,
        PipelineDesc {
            label: "Terrain Pipeline",
            source: include_str!("shaders/terrain.wgsl"),
            bind_group_layouts: &[camera_layout, material_layout],
            vertex_layout: Vertex::layout(),
            blend: wgpu::BlendState::REPLACE,
            cull_mode: Some(wgpu::Face::Back),
            depth: Some((true, wgpu::CompareFunction::Less)),
        },
    )
}

/// Translucent water: depth-tested against terrain but does not write depth.
pub fn create_water_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    camera_layout: &wgpu::BindGroupLayout,
    material_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    build_pipeline(
        device,
        format,
        PipelineDesc {
            label: "Water Pipeline",
            source: include_str!("shaders/water.wgsl"),
            bind_group_layouts: &[camera_layout, material_layout],
            vertex_layout: Vertex::layout(),
            blend: wgpu::BlendState::ALPHA_BLENDING,
            cull_mode: Some(wgpu::Face::Back),
            depth: Some((false, wgpu::CompareFunction::Less)),
        },
    )
}

/// Imported models: winding varies between exporters, so no culling.
pub fn create_model_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    camera_layout: &wgpu::BindGroupLayout,
    model_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    build_pipeline(
        device,
        format,
        PipelineDesc {
            label: "Model Pipeline",
            source: include_str!("shaders/model.wgsl"),
            bind_group_layouts: &[camera_layout, model_layout],
            vertex_layout: Vertex::layout(),
            blend: wgpu::BlendState::REPLACE,
            cull_mode: None,
            depth: Some((true, wgpu::CompareFunction::Less)),
        },
    )
}

pub fn create_overlay_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    overlay_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    build_pipeline(
        device,
        format,
        PipelineDesc {
            label: "Overlay Pipeline",
            source: include_str!("shaders/overlay.wgsl"),
            bind_group_layouts: &[overlay_layout],
            vertex_layout: OverlayVertex::layout(),
            blend: wgpu::BlendState::ALPHA_BLENDING,
            cull_mode: None,
            depth: None,
        },
    )
}
