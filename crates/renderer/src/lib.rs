//! Rendering system using wgpu for the frontier prototype.

pub mod assets;
pub mod atlas;
pub mod camera;
pub mod mesh;
pub mod pipeline;
pub mod renderer;
pub mod texture;
pub mod vertex;

pub use assets::*;
pub use atlas::*;
pub use camera::*;
pub use mesh::*;
pub use pipeline::*;
pub use renderer::*;
pub use texture::*;
pub use vertex::*;
