//! Terrain and river-water mesh generation from a heightmap.
//!
//! Vertices are laid out in heightmap order (`x * height + z`), so a heightmap
//! sample and the vertex built from it share an index. Triangles wind
//! counter-clockwise seen from above (+Y), matching back-face culling.

use bytemuck::{Pod, Zeroable};
use engine_core::GridRect;
use glam::Vec3;
use thiserror::Error;

use crate::heightmap::Heightmap;
use crate::world::World;

/// Vertex for terrain and water meshes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("{width}x{height} grid has {count} vertices, more than a u32 index can address")]
    TooManyVertices { width: u32, height: u32, count: u64 },
}

/// Mesh tuning shared by the mesher, the camera and model placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshSettings {
    /// World units per grid cell on X and Z.
    pub scale: f32,
    /// World units per unit of heightmap elevation.
    pub height_scale: f32,
    /// Vertical component of the unnormalized normal; larger = flatter shading.
    pub normal_weight: f32,
    /// World Y of the river surface (independent of the terrain under it).
    pub water_level: f32,
    /// Quads per side of each river's water grid.
    pub water_subdivisions: u32,
    /// Peak vertical displacement of the water surface.
    pub wave_amplitude: f32,
    /// Angular speed of the water bob, radians per second.
    pub wave_speed: f32,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            scale: 2.0,
            height_scale: 0.5,
            normal_weight: 2.0,
            water_level: 2.0,
            water_subdivisions: 10,
            wave_amplitude: 0.15,
            wave_speed: 1.5,
        }
    }
}

impl MeshSettings {
    /// Vertical offset applied to the whole water mesh at time `t` (seconds).
    pub fn water_wave_offset(&self, t: f32) -> f32 {
        self.wave_amplitude * (t * self.wave_speed).sin()
    }

    /// World-space position of the terrain surface under a grid position.
    pub fn grid_to_world(&self, grid_x: f32, grid_y: f32, elevation: f32) -> Vec3 {
        Vec3::new(grid_x * self.scale, elevation * self.height_scale, grid_y * self.scale)
    }
}

/// Vertex and index buffers ready for GPU upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    pub vertices: Vec<TerrainVertex>,
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

/// Central-difference normal at `(x, z)`; neighbors outside the grid count as height 0.
pub fn estimate_normal(heights: &Heightmap, x: u32, z: u32, normal_weight: f32) -> Vec3 {
    let (x, z) = (x as i64, z as i64);
    let left = heights.get_or_zero(x - 1, z);
    let right = heights.get_or_zero(x + 1, z);
    let down = heights.get_or_zero(x, z - 1);
    let up = heights.get_or_zero(x, z + 1);
    Vec3::new(left - right, normal_weight, down - up).normalize()
}

/// Triangulate the whole heightmap into one lit mesh.
pub fn build_terrain(heights: &Heightmap, settings: &MeshSettings) -> Result<MeshBuffers, MeshError> {
    let (width, height) = (heights.width(), heights.height());
    let count = width as u64 * height as u64;
    if count > u32::MAX as u64 {
        return Err(MeshError::TooManyVertices { width, height, count });
    }

    let mut vertices = Vec::with_capacity(count as usize);
    for x in 0..width {
        for z in 0..height {
            let position = settings.grid_to_world(x as f32, z as f32, heights.get(x, z));
            let normal = estimate_normal(heights, x, z, settings.normal_weight);
            vertices.push(TerrainVertex {
                position: position.into(),
                normal: normal.into(),
                uv: [x as f32 / width as f32, z as f32 / height as f32],
            });
        }
    }

    let quads = width.saturating_sub(1) as usize * height.saturating_sub(1) as usize;
    let mut indices = Vec::with_capacity(quads * 6);
    for x in 0..width.saturating_sub(1) {
        for z in 0..height.saturating_sub(1) {
            let top_left = x * height + z;
            let top_right = (x + 1) * height + z;
            let bottom_left = top_left + 1;
            let bottom_right = top_right + 1;

            indices.extend_from_slice(&[top_left, bottom_left, top_right]);
            indices.extend_from_slice(&[top_right, bottom_left, bottom_right]);
        }
    }

    Ok(MeshBuffers { vertices, indices })
}

/// Flat subdivided water surface over every river rectangle.
///
/// The surface sits at `settings.water_level` regardless of the terrain below;
/// wave motion is a whole-mesh translation applied at draw time.
pub fn build_water(rivers: &[GridRect], settings: &MeshSettings) -> MeshBuffers {
    let n = settings.water_subdivisions.max(1);
    let per_side = n + 1;
    let mut mesh = MeshBuffers {
        vertices: Vec::with_capacity(rivers.len() * (per_side * per_side) as usize),
        indices: Vec::with_capacity(rivers.len() * (n * n * 6) as usize),
    };

    for river in rivers {
        let base = mesh.vertices.len() as u32;
        let step_x = river.width as f32 / n as f32;
        let step_z = river.height as f32 / n as f32;

        for i in 0..per_side {
            for j in 0..per_side {
                let gx = river.x as f32 + i as f32 * step_x;
                let gz = river.y as f32 + j as f32 * step_z;
                mesh.vertices.push(TerrainVertex {
                    position: [gx * settings.scale, settings.water_level, gz * settings.scale],
                    normal: [0.0, 1.0, 0.0],
                    uv: [i as f32 / n as f32, j as f32 / n as f32],
                });
            }
        }

        for i in 0..n {
            for j in 0..n {
                let top_left = base + i * per_side + j;
                let top_right = base + (i + 1) * per_side + j;
                let bottom_left = top_left + 1;
                let bottom_right = top_right + 1;

                mesh.indices.extend_from_slice(&[top_left, bottom_left, top_right]);
                mesh.indices.extend_from_slice(&[top_right, bottom_left, bottom_right]);
            }
        }
    }

    mesh
}

/// Builds the terrain and water meshes for a world exactly once.
///
/// The world never changes after generation, so the buffers are never
/// invalidated; later `build` calls return immediately.
#[derive(Debug, Default)]
pub struct TerrainMesher {
    settings: MeshSettings,
    terrain: MeshBuffers,
    water: MeshBuffers,
    built: bool,
}

impl TerrainMesher {
    pub fn new(settings: MeshSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Build both meshes on first call; no-op afterwards.
    pub fn build(&mut self, world: &World) -> Result<(), MeshError> {
        if self.built {
            return Ok(());
        }

        self.terrain = build_terrain(world.heightmap(), &self.settings)?;
        self.water = build_water(world.rivers(), &self.settings);
        self.built = true;

        log::info!(
            "Terrain mesh: {} vertices, {} triangles; water: {} vertices, {} triangles",
            self.terrain.vertices.len(),
            self.terrain.triangle_count(),
            self.water.vertices.len(),
            self.water.triangle_count()
        );
        Ok(())
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn settings(&self) -> &MeshSettings {
        &self.settings
    }

    pub fn terrain(&self) -> &MeshBuffers {
        &self.terrain
    }

    pub fn water(&self) -> &MeshBuffers {
        &self.water
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::WorldConfig;

    fn face_normal(mesh: &MeshBuffers, tri: [u32; 3]) -> Vec3 {
        let p = |i: u32| Vec3::from(mesh.vertices[i as usize].position);
        let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
        (b - a).cross(c - a)
    }

    #[test]
    fn flat_four_by_four_grid() {
        let heights = Heightmap::flat(4, 4, 0.0);
        let mesh = build_terrain(&heights, &MeshSettings::default()).unwrap();
        assert_eq!(mesh.vertices.len(), 16);
        assert_eq!(mesh.indices.len(), 6 * 3 * 3);
        for v in &mesh.vertices {
            assert_eq!(v.normal, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn index_count_and_bounds() {
        let world = World::generate(&WorldConfig { width: 37, height: 23, seed: Some(4) });
        let mesh = build_terrain(world.heightmap(), &MeshSettings::default()).unwrap();
        assert_eq!(mesh.indices.len(), 6 * 36 * 22);
        let count = mesh.vertices.len() as u32;
        for [a, b, c] in mesh.triangles() {
            assert!(a != b && b != c && a != c);
            assert!(a < count && b < count && c < count);
        }
    }

    #[test]
    fn normals_are_unit_length() {
        let world = World::generate(&WorldConfig { width: 30, height: 30, seed: Some(12) });
        let mesh = build_terrain(world.heightmap(), &MeshSettings::default()).unwrap();
        for v in &mesh.vertices {
            let len = Vec3::from(v.normal).length();
            assert!((len - 1.0).abs() < 1e-5, "normal length {len}");
        }
    }

    #[test]
    fn flat_triangles_face_up() {
        let mesh = build_terrain(&Heightmap::flat(5, 3, 1.0), &MeshSettings::default()).unwrap();
        for tri in mesh.triangles() {
            assert!(face_normal(&mesh, tri).y > 0.0);
        }
    }

    #[test]
    fn normal_tilts_away_from_slope() {
        // Height rises with x, so the surface faces toward -x.
        let heights = Heightmap::from_fn(5, 5, |x, _| x as f32);
        let n = estimate_normal(&heights, 2, 2, 2.0);
        assert!(n.x < 0.0);
        assert!(n.z.abs() < 1e-6);
        assert!(n.y > 0.0);
    }

    #[test]
    fn edge_neighbors_read_as_zero() {
        let heights = Heightmap::flat(3, 3, 4.0);
        // Left neighbor is outside the grid (0), right is 4.
        let n = estimate_normal(&heights, 0, 1, 2.0);
        let expected = Vec3::new(-4.0, 2.0, 0.0).normalize();
        assert!((n - expected).length() < 1e-6);
    }

    #[test]
    fn vertex_positions_and_uvs() {
        let heights = Heightmap::from_fn(4, 2, |x, z| (x + z) as f32);
        let settings = MeshSettings::default();
        let mesh = build_terrain(&heights, &settings).unwrap();
        let v = mesh.vertices[heights.index(3, 1)];
        assert_eq!(v.position, [6.0, 2.0, 2.0]);
        assert_eq!(v.uv, [0.75, 0.5]);
    }

    #[test]
    fn degenerate_grid_has_no_triangles() {
        let mesh = build_terrain(&Heightmap::flat(1, 5, 0.0), &MeshSettings::default()).unwrap();
        assert_eq!(mesh.vertices.len(), 5);
        assert!(mesh.is_empty());
    }

    #[test]
    fn water_grid_per_river() {
        let settings = MeshSettings::default();
        let rivers = [GridRect::new(0, 10, 50, 4), GridRect::new(20, 0, 4, 30)];
        let mesh = build_water(&rivers, &settings);
        assert_eq!(mesh.vertices.len(), 2 * 11 * 11);
        assert_eq!(mesh.indices.len(), 2 * 10 * 10 * 6);
        assert!(mesh.vertices.iter().all(|v| v.position[1] == settings.water_level));
        let count = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
        for tri in mesh.triangles() {
            assert!(face_normal(&mesh, tri).y > 0.0);
        }
    }

    #[test]
    fn water_spans_river_rectangle() {
        let settings = MeshSettings::default();
        let river = GridRect::new(5, 10, 20, 4);
        let mesh = build_water(&[river], &settings);
        let xs = mesh.vertices.iter().map(|v| v.position[0]);
        let zs = mesh.vertices.iter().map(|v| v.position[2]);
        let (min_x, max_x) = xs.fold((f32::MAX, f32::MIN), |(lo, hi), x| (lo.min(x), hi.max(x)));
        let (min_z, max_z) = zs.fold((f32::MAX, f32::MIN), |(lo, hi), z| (lo.min(z), hi.max(z)));
        assert_eq!((min_x, max_x), (10.0, 50.0));
        assert_eq!((min_z, max_z), (20.0, 28.0));
    }

    #[test]
    fn mesher_builds_once() {
        let world = World::generate(&WorldConfig { width: 40, height: 30, seed: Some(77) });
        let mut mesher = TerrainMesher::new(MeshSettings::default());
        assert!(!mesher.is_built());

        mesher.build(&world).unwrap();
        assert!(mesher.is_built());
        let terrain: Vec<u8> = bytemuck::cast_slice(&mesher.terrain().vertices).to_vec();
        let terrain_idx = mesher.terrain().indices.clone();
        let water: Vec<u8> = bytemuck::cast_slice(&mesher.water().vertices).to_vec();

        mesher.build(&world).unwrap();
        assert_eq!(bytemuck::cast_slice::<_, u8>(&mesher.terrain().vertices), &terrain[..]);
        assert_eq!(mesher.terrain().indices, terrain_idx);
        assert_eq!(bytemuck::cast_slice::<_, u8>(&mesher.water().vertices), &water[..]);
    }

    #[test]
    fn second_build_ignores_other_world() {
        let a = World::generate(&WorldConfig { width: 10, height: 10, seed: Some(1) });
        let b = World::generate(&WorldConfig { width: 20, height: 20, seed: Some(2) });
        let mut mesher = TerrainMesher::new(MeshSettings::default());
        mesher.build(&a).unwrap();
        mesher.build(&b).unwrap();
        assert_eq!(mesher.terrain().vertices.len(), 100);
    }

    #[test]
    fn full_size_world_fits_u32_indices() {
        let world = World::generate(&WorldConfig { seed: Some(0), ..Default::default() });
        let mesh = build_terrain(world.heightmap(), &MeshSettings::default()).unwrap();
        assert_eq!(mesh.vertices.len(), 800 * 600);
        assert_eq!(mesh.indices.iter().copied().max(), Some(800 * 600 - 1));
    }

    #[test]
    fn wave_offset_is_bounded() {
        let settings = MeshSettings::default();
        assert_eq!(settings.water_wave_offset(0.0), 0.0);
        for i in 0..100 {
            assert!(settings.water_wave_offset(i as f32 * 0.37).abs() <= settings.wave_amplitude);
        }
    }
}
