//! Asset bundle: models and inventory icons resolved once at startup.
//!
//! The bundle is an explicit value handed to the renderer and the overlay code.
//! A missing or broken file is logged and left out; nothing here fails the game.

use anyhow::{Context, Result};
use image::RgbaImage;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::vertex::Vertex;

/// Logical model names the game knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelKind {
    Horse,
    Hands,
    Gun,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [ModelKind::Horse, ModelKind::Hands, ModelKind::Gun];

    /// File stem under `models/`.
    pub fn file_stem(self) -> &'static str {
        match self {
            ModelKind::Horse => "horse",
            ModelKind::Hands => "fps_hands",
            ModelKind::Gun => "beretta_m9",
        }
    }
}

/// CPU-side triangle mesh read from a glTF file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl ModelData {
    /// Axis-aligned bounds `(min, max)`, or `None` when empty.
    pub fn bounds(&self) -> Option<(glam::Vec3, glam::Vec3)> {
        let mut iter = self.vertices.iter().map(|v| glam::Vec3::from(v.position));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }

    /// Uniform scale that makes the model `target_height` tall.
    pub fn scale_to_height(&self, target_height: f32) -> f32 {
        match self.bounds() {
            Some((lo, hi)) if hi.y - lo.y > f32::EPSILON => target_height / (hi.y - lo.y),
            _ => 1.0,
        }
    }
}

/// Resolved assets, keyed by logical name.
#[derive(Debug, Default)]
pub struct AssetBundle {
    models: HashMap<ModelKind, ModelData>,
    icons: BTreeMap<String, RgbaImage>,
}

impl AssetBundle {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every model and the icons for `item_names` from `root`.
    ///
    /// Layout: `root/models/<stem>.glb|.gltf`, `root/icons/<item lowercase>.png`.
    pub fn load(root: &Path, item_names: &[String]) -> Self {
        let mut bundle = Self::empty();

        for kind in ModelKind::ALL {
            let Some(path) = find_model_file(root, kind.file_stem()) else {
                log::warn!("Model {:?} not found under {:?}", kind, root.join("models"));
                continue;
            };
            match load_model(&path) {
                Ok(model) => {
                    log::info!(
                        "Loaded model {:?} from {:?} ({} vertices)",
                        kind,
                        path,
                        model.vertices.len()
                    );
                    bundle.insert_model(kind, model);
                }
                Err(e) => log::warn!("Failed to load model {:?}: {:#}", kind, e),
            }
        }

        for item in item_names {
            let path = root.join("icons").join(format!("{}.png", item.to_lowercase()));
            if !path.exists() {
                log::debug!("No icon for {} at {:?}", item, path);
                continue;
            }
            match image::open(&path) {
                Ok(img) => bundle.insert_icon(item, img.to_rgba8()),
                Err(e) => log::warn!("Failed to load icon {:?}: {}", path, e),
            }
        }

        bundle
    }

    pub fn insert_model(&mut self, kind: ModelKind, model: ModelData) {
        self.models.insert(kind, model);
    }

    pub fn insert_icon(&mut self, name: &str, icon: RgbaImage) {
        self.icons.insert(name.to_string(), icon);
    }

    pub fn model(&self, kind: ModelKind) -> Option<&ModelData> {
        self.models.get(&kind)
    }

    pub fn icon(&self, name: &str) -> Option<&RgbaImage> {
        self.icons.get(name)
    }

    /// Icons in name order.
    pub fn icons(&self) -> impl Iterator<Item = (&str, &RgbaImage)> {
        self.icons.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn find_model_file(root: &Path, stem: &str) -> Option<PathBuf> {
    ["glb", "gltf"]
        .iter()
        .map(|ext| root.join("models").join(format!("{stem}.{ext}")))
        .find(|p| p.exists())
}

/// Read every triangle primitive of a glTF file into one mesh.
pub fn load_model(path: &Path) -> Result<ModelData> {
    let (document, buffers, _images) =
        gltf::import(path).with_context(|| format!("reading {:?}", path))?;

    let mut model = ModelData::default();
    for mesh in document.meshes() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::debug!("Skipping non-triangle primitive in {:?}", path);
                continue;
            }
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<[f32; 3]> = positions.collect();
            let normals: Vec<[f32; 3]> = reader
                .read_normals()
                .map(|n| n.collect())
                .unwrap_or_else(|| vec![[0.0, 1.0, 0.0]; positions.len()]);
            let uvs: Vec<[f32; 2]> = reader
                .read_tex_coords(0)
                .map(|tc| tc.into_f32().collect())
                .unwrap_or_else(|| vec![[0.0, 0.0]; positions.len()]);

            let base = model.vertices.len() as u32;
            for (i, position) in positions.iter().enumerate() {
                let normal = normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]);
                let uv = uvs.get(i).copied().unwrap_or([0.0, 0.0]);
                model.vertices.push(Vertex::new(*position, normal, uv));
            }

            match reader.read_indices() {
                Some(indices) => model.indices.extend(indices.into_u32().map(|i| base + i)),
                None => model.indices.extend(base..base + positions.len() as u32),
            }
        }
    }

    anyhow::ensure!(!model.indices.is_empty(), "{:?} has no triangle geometry", path);
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_yields_empty_bundle() {
        let root = Path::new("definitely/not/a/real/asset/dir");
        let bundle = AssetBundle::load(root, &["Pistol".to_string()]);
        for kind in ModelKind::ALL {
            assert!(bundle.model(kind).is_none());
        }
        assert!(bundle.icon("Pistol").is_none());
        assert_eq!(bundle.icons().count(), 0);
    }

    #[test]
    fn load_model_reports_missing_file() {
        assert!(load_model(Path::new("nope/horse.glb")).is_err());
    }

    #[test]
    fn scale_to_height_uses_bounds() {
        let model = ModelData {
            vertices: vec![
                Vertex::new([0.0, -1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0]),
                Vertex::new([2.0, 3.0, 1.0], [0.0, 1.0, 0.0], [0.0, 0.0]),
            ],
            indices: vec![0, 1, 0],
        };
        let (lo, hi) = model.bounds().unwrap();
        assert_eq!(lo, glam::Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(hi, glam::Vec3::new(2.0, 3.0, 1.0));
        assert_eq!(model.scale_to_height(2.0), 0.5);
        assert_eq!(ModelData::default().scale_to_height(2.0), 1.0);
    }

    #[test]
    fn inserted_assets_are_resolvable() {
        let mut bundle = AssetBundle::empty();
        bundle.insert_icon("Rifle", RgbaImage::new(4, 4));
        bundle.insert_model(ModelKind::Gun, ModelData::default());
        assert!(bundle.icon("Rifle").is_some());
        assert!(bundle.model(ModelKind::Gun).is_some());
        assert!(bundle.model(ModelKind::Horse).is_none());
    }
}
