//! Main renderer managing wgpu state and rendering.

use crate::{
    assets::{AssetBundle, ModelKind},
    atlas::IconAtlas,
    camera::{Camera, CameraUniform},
    mesh::Mesh,
    pipeline::{
        create_camera_bind_group_layout, create_material_bind_group_layout,
        create_model_bind_group_layout, create_model_pipeline, create_overlay_bind_group_layout,
        create_overlay_pipeline, create_terrain_pipeline, create_water_pipeline,
    },
    texture::Texture,
    vertex::OverlayVertex,
};
use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use engine_core::Transform;
use std::collections::HashMap;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// Byte stride between per-draw model uniforms (the default
/// `min_uniform_buffer_offset_alignment`).
const MODEL_SLOT_STRIDE: u64 = 256;
/// Model draws available per frame.
const MAX_MODEL_DRAWS: u32 = 16;

/// Terrain shader uniform (must match terrain.wgsl TerrainUniform).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TerrainUniform {
    pub sun_direction: [f32; 4],
    /// x = top of the light grass band, y = bottom of the dark grass band (world Y)
    pub bands: [f32; 4],
    /// x = fog start, y = fog end
    pub fog: [f32; 4],
    pub sky_color: [f32; 4],
}

impl Default for TerrainUniform {
    fn default() -> Self {
        Self {
            sun_direction: [0.5, 1.0, 0.3, 0.0],
            bands: [2.5, 9.0, 0.0, 0.0],
            fog: [250.0, 900.0, 0.0, 0.0],
            sky_color: [0.127, 0.301, 0.846, 1.0],
        }
    }
}

/// Water shader uniform (must match water.wgsl WaterUniform).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct WaterUniform {
    /// x = vertical offset, y = time in seconds
    pub params: [f32; 4],
    pub color: [f32; 4],
    pub sun_direction: [f32; 4],
}

impl Default for WaterUniform {
    fn default() -> Self {
        Self {
            params: [0.0; 4],
            color: [0.0, 0.19, 1.0, 0.75],
            sun_direction: [0.5, 1.0, 0.3, 0.0],
        }
    }
}

/// Per-draw model uniform (must match model.wgsl ModelUniform).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    pub tint: [f32; 4],
}

/// Which camera a model is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSpace {
    /// Placed in the world (horse).
    World,
    /// Placed relative to the eye (hands, gun).
    View,
}

/// Main renderer state.
pub struct Renderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    pub window: Arc<Window>,

    // Pipelines
    terrain_pipeline: wgpu::RenderPipeline,
    water_pipeline: wgpu::RenderPipeline,
    model_pipeline: wgpu::RenderPipeline,
    overlay_pipeline: wgpu::RenderPipeline,

    // Cameras: world and eye-relative
    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    viewmodel_camera_buffer: wgpu::Buffer,
    viewmodel_camera_bind_group: wgpu::BindGroup,

    // Materials
    terrain_buffer: wgpu::Buffer,
    terrain_bind_group: wgpu::BindGroup,
    water_uniform: WaterUniform,
    water_buffer: wgpu::Buffer,
    water_bind_group: wgpu::BindGroup,

    // Models
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    /// Model uniform slots used this frame; each draw writes its own slot.
    model_draws: u32,
    models: HashMap<ModelKind, Mesh>,

    // Overlay
    overlay_bind_group: wgpu::BindGroup,
    icon_atlas: IconAtlas,

    // Depth buffer
    depth_texture: Texture,
}

impl Renderer {
    /// Create a new renderer for the given window and upload the asset bundle.
    pub async fn new(window: Arc<Window>, assets: &AssetBundle, vsync: bool) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        log::info!("Using GPU: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let camera_layout = create_camera_bind_group_layout(&device);
        let material_layout = create_material_bind_group_layout(&device);
        let model_layout = create_model_bind_group_layout(&device);
        let overlay_layout = create_overlay_bind_group_layout(&device);

        // Cameras
        let camera_uniform = CameraUniform::new();
        let (camera_buffer, camera_bind_group) =
            uniform_binding(&device, &camera_layout, "Camera", &camera_uniform);
        let (viewmodel_camera_buffer, viewmodel_camera_bind_group) =
            uniform_binding(&device, &camera_layout, "Viewmodel Camera", &camera_uniform);

        // Materials
        let (terrain_buffer, terrain_bind_group) =
            uniform_binding(&device, &material_layout, "Terrain", &TerrainUniform::default());
        let water_uniform = WaterUniform::default();
        let (water_buffer, water_bind_group) =
            uniform_binding(&device, &material_layout, "Water", &water_uniform);

        // Per-draw model slots
        let model_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Uniform Buffer"),
            size: MODEL_SLOT_STRIDE * MAX_MODEL_DRAWS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let model_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Bind Group"),
            layout: &model_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &model_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ModelUniform>() as u64),
                }),
            }],
        });

        let mut models = HashMap::new();
        for kind in ModelKind::ALL {
            if let Some(data) = assets.model(kind) {
                let label = format!("{:?}", kind);
                models.insert(kind, Mesh::new(&device, &label, &data.vertices, &data.indices));
            }
        }

        // Icon atlas for the inventory wheel
        let icon_atlas = IconAtlas::build(assets.icons());
        let atlas_texture = Texture::from_rgba(
            &device,
            &queue,
            "Icon Atlas",
            icon_atlas.image.width(),
            icon_atlas.image.height(),
            icon_atlas.image.as_raw(),
        );
        let overlay_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Overlay Bind Group"),
            layout: &overlay_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&atlas_texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&atlas_texture.sampler),
                },
            ],
        });

        let terrain_pipeline =
            create_terrain_pipeline(&device, config.format, &camera_layout, &material_layout);
        let water_pipeline =
            create_water_pipeline(&device, config.format, &camera_layout, &material_layout);
        let model_pipeline =
            create_model_pipeline(&device, config.format, &camera_layout, &model_layout);
        let overlay_pipeline = create_overlay_pipeline(&device, config.format, &overlay_layout);

        let depth_texture = Texture::create_depth_texture(&device, &config);

        log::info!(
            "Renderer ready: {}x{}, {} models, {} icons",
            config.width,
            config.height,
            models.len(),
            icon_atlas.len()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
            terrain_pipeline,
            water_pipeline,
            model_pipeline,
            overlay_pipeline,
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            viewmodel_camera_buffer,
            viewmodel_camera_bind_group,
            terrain_buffer,
            terrain_bind_group,
            water_uniform,
            water_buffer,
            water_bind_group,
            model_buffer,
            model_bind_group,
            model_draws: 0,
            models,
            overlay_bind_group,
            icon_atlas,
            depth_texture,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = Texture::create_depth_texture(&self.device, &self.config);
    }

    /// Update both the world and the eye-relative camera uniforms.
    pub fn update_camera(&mut self, camera: &Camera) {
        self.camera_uniform.update(camera);
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[self.camera_uniform]));

        let mut viewmodel = CameraUniform::new();
        viewmodel.update_viewmodel(camera);
        self.queue
            .write_buffer(&self.viewmodel_camera_buffer, 0, bytemuck::cast_slice(&[viewmodel]));
    }

    pub fn update_terrain(&mut self, uniform: &TerrainUniform) {
        self.queue
            .write_buffer(&self.terrain_buffer, 0, bytemuck::cast_slice(&[*uniform]));
    }

    /// Set the water bob offset and shimmer clock for this frame.
    pub fn update_water(&mut self, wave_offset: f32, time: f32) {
        self.water_uniform.params = [wave_offset, time, 0.0, 0.0];
        self.queue
            .write_buffer(&self.water_buffer, 0, bytemuck::cast_slice(&[self.water_uniform]));
    }

    /// Begin a new frame, returns the surface texture and command encoder.
    pub fn begin_frame(
        &mut self,
    ) -> Result<(wgpu::SurfaceTexture, wgpu::CommandEncoder), wgpu::SurfaceError> {
        self.model_draws = 0;
        let output = self.surface.get_current_texture()?;
        let encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        Ok((output, encoder))
    }

    /// Clear color and depth. First pass of every frame.
    pub fn clear(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, color: wgpu::Color) {
        let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Clear Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(color),
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
            timestamp_writes: None,
            occlusion_query_set: None,
        });
    }

    fn scene_pass<'a>(
        &'a self,
        encoder: &'a mut wgpu::CommandEncoder,
        view: &'a wgpu::TextureView,
        label: &'a str,
    ) -> wgpu::RenderPass<'a> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        })
    }

    /// Render the lit terrain mesh. Call after `clear`.
    pub fn render_terrain(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, mesh: &Mesh) {
        if mesh.is_empty() {
            return;
        }
        let mut render_pass = self.scene_pass(encoder, view, "Terrain Render Pass");
        render_pass.set_pipeline(&self.terrain_pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_bind_group(1, &self.terrain_bind_group, &[]);
        render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..mesh.num_indices, 0, 0..1);
    }

    /// Render river water. Call after `render_terrain` and `update_water`.
    pub fn render_water(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, mesh: &Mesh) {
        if mesh.is_empty() {
            return;
        }
        let mut render_pass = self.scene_pass(encoder, view, "Water Render Pass");
        render_pass.set_pipeline(&self.water_pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_bind_group(1, &self.water_bind_group, &[]);
        render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..mesh.num_indices, 0, 0..1);
    }

    /// Draw a loaded model. Returns `false` when the model is absent or the
    /// frame's model slots are used up.
    pub fn render_model(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        kind: ModelKind,
        transform: &Transform,
        tint: [f32; 4],
        space: ModelSpace,
    ) -> bool {
        if !self.models.contains_key(&kind) {
            return false;
        }
        if self.model_draws >= MAX_MODEL_DRAWS {
            log::warn!("Out of model slots this frame, skipping {:?}", kind);
            return false;
        }

        let slot = self.model_draws;
        self.model_draws += 1;
        let offset = slot as u64 * MODEL_SLOT_STRIDE;
        let uniform = ModelUniform {
            model: transform.to_matrix().to_cols_array_2d(),
            tint,
        };
        self.queue
            .write_buffer(&self.model_buffer, offset, bytemuck::cast_slice(&[uniform]));

        let camera_bind_group = match space {
            ModelSpace::World => &self.camera_bind_group,
            ModelSpace::View => &self.viewmodel_camera_bind_group,
        };
        let Some(mesh) = self.models.get(&kind) else {
            return false;
        };

        let mut render_pass = self.scene_pass(encoder, view, "Model Render Pass");
        render_pass.set_pipeline(&self.model_pipeline);
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_bind_group(1, &self.model_bind_group, &[offset as u32]);
        render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..mesh.num_indices, 0, 0..1);
        true
    }

    /// Clear the depth buffer so eye-relative models draw over the world.
    pub fn clear_depth(&self, encoder: &mut wgpu::CommandEncoder) {
        let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Viewmodel Depth Clear"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
    }

    /// Render screen-space overlay. Call as the very last pass before end_frame.
    pub fn render_overlay(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        vertices: &[OverlayVertex],
        indices: &[u32],
    ) {
        if vertices.is_empty() || indices.is_empty() {
            return;
        }

        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Overlay Vertex Buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Overlay Index Buffer"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Overlay Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.overlay_pipeline);
        render_pass.set_bind_group(0, &self.overlay_bind_group, &[]);
        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..indices.len() as u32, 0, 0..1);
    }

    /// End frame and present.
    pub fn end_frame(&self, output: wgpu::SurfaceTexture, encoder: wgpu::CommandEncoder) {
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    /// Atlas UVs for an inventory icon, if one was loaded.
    pub fn icon_uv(&self, name: &str) -> Option<[f32; 4]> {
        self.icon_atlas.uv_rect(name)
    }

    /// Get window dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Access the device for mesh creation.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }
}

fn uniform_binding<T: Pod>(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    name: &str,
    value: &T,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{name} Uniform Buffer")),
        contents: bytemuck::bytes_of(value),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{name} Bind Group")),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    });
    (buffer, bind_group)
}
