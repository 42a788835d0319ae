//! World generation: rolling-hill heightmap plus the fixed road, river and bridge layout.
//!
//! Heights follow `10·sin(x·0.01) + 10·cos(y·0.01) + noise` with noise uniform in
//! `[0, 2)`. Without a seed every run rolls new noise; pass `seed` for reproducible
//! terrain (tests, replays).

use engine_core::GridRect;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::heightmap::Heightmap;

/// Amplitude of each of the sine/cosine hill terms.
pub const HILL_AMPLITUDE: f64 = 10.0;
/// Spatial frequency of the hill terms, per cell.
pub const HILL_FREQUENCY: f64 = 0.01;
/// Exclusive upper bound of the per-cell noise.
pub const NOISE_BOUND: f64 = 2.0;

pub const ROAD_THICKNESS: i32 = 20;
pub const RIVER_THICKNESS: i32 = 24;
/// How far a bridge reaches onto each bank past the river edge.
pub const BRIDGE_MARGIN: i32 = 8;
/// Bridge extent along the river (the road it carries is 20 wide, plus railings).
pub const BRIDGE_SPAN: i32 = 60;

/// Ground above this height is drawn as dark hilltop grass.
pub const DARK_GRASS_ABOVE: f32 = 18.0;
/// Ground below this height is drawn as light meadow grass.
pub const LIGHT_GRASS_BELOW: f32 = 5.0;

/// Configuration for world generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldConfig {
    /// Grid cells along X.
    pub width: u32,
    /// Grid cells along Y (Z in 3D).
    pub height: u32,
    /// Noise seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            seed: None,
        }
    }
}

/// The deterministic part of the terrain at `(x, y)`, without noise.
#[inline]
pub fn hill_envelope(x: u32, y: u32) -> f64 {
    HILL_AMPLITUDE * (x as f64 * HILL_FREQUENCY).sin()
        + HILL_AMPLITUDE * (y as f64 * HILL_FREQUENCY).cos()
}

/// What covers a grid cell, in 2D draw priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Ground,
    River,
    Road,
    Bridge,
}

/// Grass tint band used by the top-down view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundShade {
    /// Low meadow (height < 5).
    Light,
    Regular,
    /// Hilltops (height > 18).
    Dark,
}

impl GroundShade {
    pub fn from_height(h: f32) -> Self {
        if h > DARK_GRASS_ABOVE {
            GroundShade::Dark
        } else if h < LIGHT_GRASS_BELOW {
            GroundShade::Light
        } else {
            GroundShade::Regular
        }
    }
}

/// Generated world: heightmap and feature rectangles. Read-only after construction.
#[derive(Debug, Clone)]
pub struct World {
    heights: Heightmap,
    roads: Vec<GridRect>,
    rivers: Vec<GridRect>,
    bridges: Vec<GridRect>,
}

impl World {
    /// Generate a world from configuration.
    pub fn generate(config: &WorldConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let heights = Self::generate_hills(config.width, config.height, &mut rng);
        let (w, h) = (config.width as i32, config.height as i32);

        let world = Self {
            heights,
            roads: Self::generate_roads(w, h),
            rivers: Self::generate_rivers(w, h),
            bridges: Self::generate_bridges(w, h),
        };

        if let Some((lo, hi)) = world.heights.range() {
            log::info!(
                "Generated {}x{} world (seed {:?}), heights {:.2}..{:.2}",
                config.width,
                config.height,
                config.seed,
                lo,
                hi
            );
        }
        world
    }

    fn generate_hills(width: u32, height: u32, rng: &mut StdRng) -> Heightmap {
        Heightmap::from_fn(width, height, |x, y| {
            let noise = rng.gen::<f64>() * NOISE_BOUND;
            (hill_envelope(x, y) + noise) as f32
        })
    }

    fn generate_roads(w: i32, h: i32) -> Vec<GridRect> {
        vec![
            // East-west road through the middle
            GridRect::new(0, h / 2 - ROAD_THICKNESS / 2, w, ROAD_THICKNESS),
            // North-south road through the middle
            GridRect::new(w / 2 - ROAD_THICKNESS / 2, 0, ROAD_THICKNESS, h),
        ]
    }

    fn generate_rivers(w: i32, h: i32) -> Vec<GridRect> {
        vec![
            GridRect::new(0, h / 3, w, RIVER_THICKNESS),
            GridRect::new(w / 3, 0, RIVER_THICKNESS, h),
        ]
    }

    fn generate_bridges(w: i32, h: i32) -> Vec<GridRect> {
        vec![
            // East-west road crossing the north-south river
            GridRect::new(
                w / 3 - BRIDGE_MARGIN,
                h / 2 - BRIDGE_SPAN / 2,
                RIVER_THICKNESS + 2 * BRIDGE_MARGIN,
                BRIDGE_SPAN,
            ),
            // North-south road crossing the east-west river
            GridRect::new(
                w / 2 - BRIDGE_SPAN / 2,
                h / 3 - BRIDGE_MARGIN,
                BRIDGE_SPAN,
                RIVER_THICKNESS + 2 * BRIDGE_MARGIN,
            ),
        ]
    }

    pub fn width(&self) -> u32 {
        self.heights.width()
    }

    pub fn height(&self) -> u32 {
        self.heights.height()
    }

    pub fn heightmap(&self) -> &Heightmap {
        &self.heights
    }

    pub fn roads(&self) -> &[GridRect] {
        &self.roads
    }

    pub fn rivers(&self) -> &[GridRect] {
        &self.rivers
    }

    pub fn bridges(&self) -> &[GridRect] {
        &self.bridges
    }

    /// Height at an in-grid cell.
    pub fn height_at(&self, x: u32, y: u32) -> f32 {
        self.heights.get(x, y)
    }

    /// Height at a signed cell, `0.0` outside the grid.
    pub fn height_or_zero(&self, x: i64, y: i64) -> f32 {
        self.heights.get_or_zero(x, y)
    }

    /// Height under a continuous grid position, clamped to the world edge.
    pub fn sample_height(&self, x: f32, y: f32) -> f32 {
        self.heights.sample_clamped(x, y)
    }

    /// What the top-down view shows at `(x, y)`.
    pub fn surface_at(&self, x: i32, y: i32) -> Surface {
        let hit = |rects: &[GridRect]| rects.iter().any(|r| r.contains(x, y));
        if hit(&self.bridges) {
            Surface::Bridge
        } else if hit(&self.roads) {
            Surface::Road
        } else if hit(&self.rivers) {
            Surface::River
        } else {
            Surface::Ground
        }
    }
}
