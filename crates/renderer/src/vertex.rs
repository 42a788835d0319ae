//! Vertex types and layouts for rendering.

use bytemuck::{Pod, Zeroable};

/// Lit-mesh vertex: position, normal and UV. Terrain, water and model meshes share
/// this layout, so any `#[repr(C)]` vertex with the same three fields can be uploaded.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coords,
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Normal
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // UV/Tex coords
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Screen-space overlay vertex (top-down map, HUD, inventory wheel).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct OverlayVertex {
    /// NDC position (x, y) in -1..1
    pub position: [f32; 2],
    /// UV into the icon atlas (negative x = solid color quad)
    pub tex_coords: [f32; 2],
    /// RGBA color
    pub color: [f32; 4],
}

impl OverlayVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OverlayVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Builds screen-space overlay geometry in pixel coordinates.
/// Rects are solid-color quads; icons sample the icon atlas.
pub struct OverlayBuilder {
    pub vertices: Vec<OverlayVertex>,
    pub indices: Vec<u32>,
    screen_w: f32,
    screen_h: f32,
}

impl OverlayBuilder {
    pub fn new(screen_w: f32, screen_h: f32) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            screen_w: screen_w.max(1.0),
            screen_h: screen_h.max(1.0),
        }
    }

    pub fn screen_size(&self) -> (f32, f32) {
        (self.screen_w, self.screen_h)
    }

    /// Number of quads emitted so far.
    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }

    /// Convert pixel coords to NDC.
    fn px_to_ndc(&self, px: f32, py: f32) -> [f32; 2] {
        [
            (px / self.screen_w) * 2.0 - 1.0,
            1.0 - (py / self.screen_h) * 2.0,
        ]
    }

    fn push_quad(&mut self, x: f32, y: f32, w: f32, h: f32, uv: [f32; 4], color: [f32; 4]) {
        let tl = self.px_to_ndc(x, y);
        let br = self.px_to_ndc(x + w, y + h);
        let base = self.vertices.len() as u32;
        let [u0, v0, u1, v1] = uv;
        self.vertices.push(OverlayVertex { position: [tl[0], tl[1]], tex_coords: [u0, v0], color });
        self.vertices.push(OverlayVertex { position: [br[0], tl[1]], tex_coords: [u1, v0], color });
        self.vertices.push(OverlayVertex { position: [br[0], br[1]], tex_coords: [u1, v1], color });
        self.vertices.push(OverlayVertex { position: [tl[0], br[1]], tex_coords: [u0, v1], color });
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Add a solid-color rectangle. Coordinates in pixels.
    pub fn add_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
        // sentinel: solid color
        self.push_quad(x, y, w, h, [-1.0, -1.0, -1.0, -1.0], color);
    }

    /// Add an atlas-textured rectangle. `uv` is `[u0, v0, u1, v1]`.
    pub fn add_icon(&mut self, x: f32, y: f32, w: f32, h: f32, uv: [f32; 4], tint: [f32; 4]) {
        self.push_quad(x, y, w, h, uv, tint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_maps_pixels_to_ndc() {
        let mut b = OverlayBuilder::new(800.0, 600.0);
        b.add_rect(0.0, 0.0, 400.0, 300.0, [1.0; 4]);
        assert_eq!(b.vertices[0].position, [-1.0, 1.0]);
        assert_eq!(b.vertices[2].position, [0.0, 0.0]);
        assert_eq!(b.indices, vec![0, 1, 2, 0, 2, 3]);
        assert!(b.vertices.iter().all(|v| v.tex_coords[0] < 0.0));
    }

    #[test]
    fn icon_carries_uvs() {
        let mut b = OverlayBuilder::new(100.0, 100.0);
        b.add_rect(0.0, 0.0, 1.0, 1.0, [0.0; 4]);
        b.add_icon(10.0, 10.0, 48.0, 48.0, [0.25, 0.0, 0.5, 1.0], [1.0; 4]);
        assert_eq!(b.quad_count(), 2);
        assert_eq!(b.vertices[4].tex_coords, [0.25, 0.0]);
        assert_eq!(b.vertices[6].tex_coords, [0.5, 1.0]);
        assert_eq!(&b.indices[6..], &[4, 5, 6, 4, 6, 7]);
    }
}
