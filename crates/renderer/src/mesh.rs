//! GPU mesh storage.

use bytemuck::Pod;
use wgpu::util::DeviceExt;

/// A GPU mesh with vertex and index buffers.
pub struct Mesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
}

impl Mesh {
    /// Create a mesh from vertex and index data. `V` must share the [`crate::Vertex`] layout.
    pub fn new<V: Pod>(device: &wgpu::Device, label: &str, vertices: &[V], indices: &[u32]) -> Self {
        debug_assert_eq!(std::mem::size_of::<V>(), std::mem::size_of::<crate::Vertex>());

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: indices.len() as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.num_indices == 0
    }
}
