//! Icon atlas: every inventory icon packed into one texture strip.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::collections::HashMap;

/// Edge length of one atlas slot in pixels.
pub const ICON_SIZE: u32 = 48;

pub struct IconAtlas {
    pub image: RgbaImage,
    slots: HashMap<String, [f32; 4]>,
}

impl IconAtlas {
    /// Pack icons left to right, each resized to `ICON_SIZE` square.
    /// With no icons the atlas is a single white pixel so the overlay pipeline can still bind it.
    pub fn build<'a>(icons: impl IntoIterator<Item = (&'a str, &'a RgbaImage)>) -> Self {
        let icons: Vec<_> = icons.into_iter().collect();
        if icons.is_empty() {
            return Self {
                image: RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255])),
                slots: HashMap::new(),
            };
        }

        let count = icons.len() as u32;
        let mut image = RgbaImage::new(ICON_SIZE * count, ICON_SIZE);
        let mut slots = HashMap::with_capacity(icons.len());
        for (i, (name, icon)) in icons.into_iter().enumerate() {
            let resized = imageops::resize(icon, ICON_SIZE, ICON_SIZE, FilterType::Triangle);
            imageops::replace(&mut image, &resized, (i as u32 * ICON_SIZE) as i64, 0);
            let u0 = i as f32 / count as f32;
            let u1 = (i + 1) as f32 / count as f32;
            slots.insert(name.to_string(), [u0, 0.0, u1, 1.0]);
        }

        log::debug!("Packed {} icons into {}x{} atlas", count, image.width(), image.height());
        Self { image, slots }
    }

    /// `[u0, v0, u1, v1]` of an icon, if packed.
    pub fn uv_rect(&self, name: &str) -> Option<[f32; 4]> {
        self.slots.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_atlas_is_white_pixel() {
        let atlas = IconAtlas::build(std::iter::empty());
        assert!(atlas.is_empty());
        assert_eq!(atlas.image.dimensions(), (1, 1));
        assert_eq!(atlas.image.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn icons_get_side_by_side_slots() {
        let red = RgbaImage::from_pixel(16, 16, Rgba([255, 0, 0, 255]));
        let blue = RgbaImage::from_pixel(64, 32, Rgba([0, 0, 255, 255]));
        let atlas = IconAtlas::build([("Lasso", &red), ("Pistol", &blue)]);

        assert_eq!(atlas.len(), 2);
        assert_eq!(atlas.image.dimensions(), (ICON_SIZE * 2, ICON_SIZE));
        assert_eq!(atlas.uv_rect("Lasso"), Some([0.0, 0.0, 0.5, 1.0]));
        assert_eq!(atlas.uv_rect("Pistol"), Some([0.5, 0.0, 1.0, 1.0]));
        assert_eq!(atlas.uv_rect("Food"), None);

        assert_eq!(atlas.image.get_pixel(ICON_SIZE / 2, ICON_SIZE / 2), &Rgba([255, 0, 0, 255]));
        assert_eq!(
            atlas.image.get_pixel(ICON_SIZE + ICON_SIZE / 2, ICON_SIZE / 2),
            &Rgba([0, 0, 255, 255])
        );
    }
}
