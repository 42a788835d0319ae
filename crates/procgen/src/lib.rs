//! Procedural generation for the world heightmap, feature layout, and terrain meshes.

pub mod heightmap;
pub mod mesh;
pub mod world;

pub use heightmap::*;
pub use mesh::*;
pub use world::*;
