//! Screen-space overlay: top-down map, radar, ammo counter and inventory wheel.
//!
//! Everything here only appends quads to an [`OverlayBuilder`]; nothing touches the GPU.

use engine_core::GridRect;
use glam::Vec2;
use procgen::{GroundShade, World};
use renderer::OverlayBuilder;

use crate::horse::Horse;
use crate::inventory::InventoryWheel;
use crate::player::Player;

const LIGHT_GREEN: [u8; 3] = [144, 238, 144];
const GREEN: [u8; 3] = [0, 128, 0];
const FOREST_GREEN: [u8; 3] = [34, 139, 34];
const WATER: [u8; 3] = [0, 120, 255];
const SIENNA: [u8; 3] = [160, 82, 45];
const SADDLE_BROWN: [u8; 3] = [139, 69, 19];
const PLAYER_BLUE: [u8; 3] = [0, 0, 255];
const HORSE_BROWN: [u8; 3] = [165, 42, 42];
const GOLD: [u8; 3] = [255, 215, 0];
const DARK_GRAY: [u8; 3] = [169, 169, 169];
const YELLOW: [u8; 3] = [255, 255, 0];
const GRAY: [u8; 3] = [128, 128, 128];
const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Ground is drawn in blocks of this many cells.
const GROUND_STEP: u32 = 8;
const RADAR_WIDTH: f32 = 160.0;
const RADAR_MARGIN: f32 = 10.0;
const WHEEL_RADIUS: f32 = 100.0;
const WHEEL_SLOT: f32 = 60.0;
const WHEEL_ICON: f32 = 48.0;

/// sRGB color to the linear values the sRGB swapchain expects.
pub fn srgb(rgb: [u8; 3], alpha: f32) -> [f32; 4] {
    let lin = |c: u8| {
        let c = c as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [lin(rgb[0]), lin(rgb[1]), lin(rgb[2]), alpha]
}

/// River brightness pulse, between 0.4 and 1.0.
pub fn water_pulse(time: f32) -> f32 {
    0.7 + 0.3 * (time * 2.0).sin()
}

fn ground_color(shade: GroundShade) -> [u8; 3] {
    match shade {
        GroundShade::Light => LIGHT_GREEN,
        GroundShade::Regular => GREEN,
        GroundShade::Dark => FOREST_GREEN,
    }
}

/// Uniform grid-to-pixel mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub origin: Vec2,
    pub scale: f32,
}

impl MapView {
    /// Fit a `world_size` grid into the pixel rectangle `(pos, size)`, centered.
    pub fn fit(world_size: Vec2, pos: Vec2, size: Vec2) -> Self {
        let scale = (size.x / world_size.x.max(1.0)).min(size.y / world_size.y.max(1.0));
        let origin = pos + (size - world_size * scale) * 0.5;
        Self { origin, scale }
    }

    pub fn to_screen(&self, p: Vec2) -> Vec2 {
        self.origin + p * self.scale
    }

    fn grid_rect(&self, b: &mut OverlayBuilder, r: &GridRect, color: [f32; 4]) {
        let p = self.to_screen(Vec2::new(r.x as f32, r.y as f32));
        b.add_rect(p.x, p.y, r.width as f32 * self.scale, r.height as f32 * self.scale, color);
    }

    /// Marker of `size` grid cells centered on `p`, never smaller than `min_px`.
    fn marker(&self, b: &mut OverlayBuilder, p: Vec2, size: Vec2, min_px: f32, color: [f32; 4]) {
        let px = (size * self.scale).max(Vec2::splat(min_px));
        let c = self.to_screen(p);
        b.add_rect(c.x - px.x * 0.5, c.y - px.y * 0.5, px.x, px.y, color);
    }
}

fn world_size(world: &World) -> Vec2 {
    Vec2::new(world.width() as f32, world.height() as f32)
}

/// Rivers, roads and bridges, in that order so bridges stay visible.
fn add_features(b: &mut OverlayBuilder, world: &World, view: &MapView, time: f32) {
    let water = srgb(WATER, water_pulse(time));
    for river in world.rivers() {
        view.grid_rect(b, river, water);
    }
    for road in world.roads() {
        view.grid_rect(b, road, srgb(SADDLE_BROWN, 1.0));
    }
    for bridge in world.bridges() {
        view.grid_rect(b, bridge, srgb(SIENNA, 1.0));
    }
}

fn add_actors(b: &mut OverlayBuilder, view: &MapView, player: &Player, horse: &Horse, min_px: f32) {
    view.marker(b, horse.position, Vec2::new(24.0, 12.0), min_px * 1.5, srgb(HORSE_BROWN, 1.0));
    view.marker(b, player.position, Vec2::splat(16.0), min_px, srgb(PLAYER_BLUE, 1.0));
}

/// Full-screen top-down map.
pub fn add_top_down(b: &mut OverlayBuilder, world: &World, player: &Player, horse: &Horse, time: f32) {
    let (sw, sh) = b.screen_size();
    let view = MapView::fit(world_size(world), Vec2::ZERO, Vec2::new(sw, sh));
    let cell = GROUND_STEP as f32 * view.scale;

    for x in (0..world.width()).step_by(GROUND_STEP as usize) {
        for y in (0..world.height()).step_by(GROUND_STEP as usize) {
            let shade = GroundShade::from_height(world.height_at(x, y));
            let p = view.to_screen(Vec2::new(x as f32, y as f32));
            b.add_rect(p.x, p.y, cell, cell, srgb(ground_color(shade), 1.0));
        }
    }

    add_features(b, world, &view, time);
    add_actors(b, &view, player, horse, 2.0);
}

/// Small map in the top-right corner of the first-person view.
pub fn add_radar(b: &mut OverlayBuilder, world: &World, player: &Player, horse: &Horse, time: f32) {
    let (sw, _) = b.screen_size();
    let size = world_size(world);
    let height = RADAR_WIDTH * size.y / size.x.max(1.0);
    let pos = Vec2::new(sw - RADAR_WIDTH - RADAR_MARGIN, RADAR_MARGIN);

    b.add_rect(pos.x - 2.0, pos.y - 2.0, RADAR_WIDTH + 4.0, height + 4.0, [0.0, 0.0, 0.0, 0.6]);
    b.add_rect(pos.x, pos.y, RADAR_WIDTH, height, srgb(GREEN, 0.8));

    let view = MapView::fit(size, pos, Vec2::new(RADAR_WIDTH, height));
    add_features(b, world, &view, time);
    add_actors(b, &view, player, horse, 4.0);
}

/// One bullet per round in the top-left corner, spent rounds grayed out.
pub fn add_ammo(b: &mut OverlayBuilder, player: &Player) {
    for i in 0..player.max_ammo() {
        let color = if i < player.ammo() { GOLD } else { DARK_GRAY };
        b.add_rect(10.0 + i as f32 * 16.0, 10.0, 12.0, 24.0, srgb(color, 1.0));
    }
}

/// Slots around the screen center; `icon_uv` resolves an item's atlas rectangle.
pub fn add_inventory_wheel(
    b: &mut OverlayBuilder,
    wheel: &InventoryWheel,
    icon_uv: impl Fn(&str) -> Option<[f32; 4]>,
) {
    if !wheel.is_visible() {
        return;
    }
    let (sw, sh) = b.screen_size();
    let centers = wheel.slot_centers(Vec2::new(sw * 0.5, sh * 0.5), WHEEL_RADIUS);
    for (i, (item, c)) in wheel.items().iter().zip(centers).enumerate() {
        let color = if i == wheel.selected_index() { YELLOW } else { GRAY };
        let half = WHEEL_SLOT * 0.5;
        b.add_rect(c.x - half, c.y - half, WHEEL_SLOT, WHEEL_SLOT, srgb(color, 0.5));
        if let Some(uv) = icon_uv(item) {
            let half = WHEEL_ICON * 0.5;
            b.add_icon(c.x - half, c.y - half, WHEEL_ICON, WHEEL_ICON, uv, WHITE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procgen::WorldConfig;

    /// Pixel rect `(x, y, w, h)` of quad `i`.
    fn quad_px(b: &OverlayBuilder, i: usize) -> (f32, f32, f32, f32) {
        let (sw, sh) = b.screen_size();
        let tl = b.vertices[i * 4].position;
        let br = b.vertices[i * 4 + 2].position;
        let x0 = (tl[0] + 1.0) * 0.5 * sw;
        let y0 = (1.0 - tl[1]) * 0.5 * sh;
        let x1 = (br[0] + 1.0) * 0.5 * sw;
        let y1 = (1.0 - br[1]) * 0.5 * sh;
        (x0, y0, x1 - x0, y1 - y0)
    }

    fn assert_px(got: (f32, f32, f32, f32), want: (f32, f32, f32, f32)) {
        let close = |a: f32, b: f32| (a - b).abs() < 1e-2;
        assert!(
            close(got.0, want.0) && close(got.1, want.1) && close(got.2, want.2) && close(got.3, want.3),
            "{got:?} != {want:?}"
        );
    }

    fn small_world() -> World {
        World::generate(&WorldConfig {
            width: 80,
            height: 60,
            seed: Some(11),
        })
    }

    #[test]
    fn srgb_endpoints() {
        assert_eq!(srgb([0, 0, 0], 1.0), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(srgb([255, 255, 255], 0.5), [1.0, 1.0, 1.0, 0.5]);
        let mid = srgb([128, 128, 128], 1.0)[0];
        assert!(mid > 0.2 && mid < 0.23);
    }

    #[test]
    fn water_pulse_range() {
        for i in 0..100 {
            let p = water_pulse(i as f32 * 0.1);
            assert!((0.4..=1.0).contains(&p));
        }
        assert!((water_pulse(0.0) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn map_view_fits_and_centers() {
        let view = MapView::fit(Vec2::new(800.0, 600.0), Vec2::ZERO, Vec2::new(1600.0, 1000.0));
        assert!((view.scale - 1000.0 / 600.0).abs() < 1e-5);
        let width = 800.0 * view.scale;
        assert!((view.origin.x - (1600.0 - width) * 0.5).abs() < 1e-3);
        assert!(view.origin.y.abs() < 1e-3);
        assert_eq!(view.to_screen(Vec2::ZERO), view.origin);
    }

    #[test]
    fn ammo_counter_layout() {
        let mut player = Player::new();
        player.try_fire();
        player.try_fire();
        let mut b = OverlayBuilder::new(800.0, 600.0);
        add_ammo(&mut b, &player);

        assert_eq!(b.quad_count(), 7);
        assert_px(quad_px(&b, 0), (10.0, 10.0, 12.0, 24.0));
        assert_px(quad_px(&b, 6), (10.0 + 6.0 * 16.0, 10.0, 12.0, 24.0));
        assert_eq!(b.vertices[4 * 4].color, srgb(GOLD, 1.0));
        assert_eq!(b.vertices[5 * 4].color, srgb(DARK_GRAY, 1.0));
    }

    #[test]
    fn hidden_wheel_draws_nothing() {
        let mut b = OverlayBuilder::new(800.0, 600.0);
        add_inventory_wheel(&mut b, &InventoryWheel::default(), |_| None);
        assert_eq!(b.quad_count(), 0);
    }

    #[test]
    fn wheel_slots_and_icons() {
        let mut wheel = InventoryWheel::default();
        wheel.show();
        wheel.next_item();
        let mut b = OverlayBuilder::new(800.0, 600.0);
        add_inventory_wheel(&mut b, &wheel, |name| {
            (name == "Rifle").then_some([0.0, 0.0, 1.0, 1.0])
        });

        // Four slots plus one icon.
        assert_eq!(b.quad_count(), 5);
        assert_px(quad_px(&b, 0), (370.0, 170.0, 60.0, 60.0));
        assert_eq!(b.vertices[0].color, srgb(GRAY, 0.5));
        // Rifle slot (right of center) is selected and carries its icon.
        assert_px(quad_px(&b, 1), (470.0, 270.0, 60.0, 60.0));
        assert_eq!(b.vertices[4].color, srgb(YELLOW, 0.5));
        assert_px(quad_px(&b, 2), (476.0, 276.0, 48.0, 48.0));
        assert_eq!(b.vertices[8].tex_coords, [0.0, 0.0]);
    }

    #[test]
    fn top_down_covers_ground_features_and_actors() {
        let world = small_world();
        let mut player = Player::new();
        player.position = Vec2::new(40.0, 30.0);
        let horse = Horse::new(Vec2::new(50.0, 35.0));
        let mut b = OverlayBuilder::new(800.0, 600.0);
        add_top_down(&mut b, &world, &player, &horse, 0.0);

        let ground = 10 * 8;
        let features = world.rivers().len() + world.roads().len() + world.bridges().len();
        assert_eq!(b.quad_count(), ground + features + 2);

        // Scale is 10 px per cell; the first ground block is 8 cells.
        assert_px(quad_px(&b, 0), (0.0, 0.0, 80.0, 80.0));
        let n = b.quad_count();
        assert_px(quad_px(&b, n - 2), (500.0 - 120.0, 350.0 - 60.0, 240.0, 120.0));
        assert_px(quad_px(&b, n - 1), (400.0 - 80.0, 300.0 - 80.0, 160.0, 160.0));
        assert_eq!(b.vertices[(n - 1) * 4].color, srgb(PLAYER_BLUE, 1.0));
    }

    #[test]
    fn radar_sits_in_top_right() {
        let world = small_world();
        let mut b = OverlayBuilder::new(1280.0, 720.0);
        add_radar(&mut b, &world, &Player::new(), &Horse::default(), 1.0);

        let (x, y, w, h) = quad_px(&b, 1);
        assert_px((x, y, w, h), (1280.0 - 170.0, 10.0, 160.0, 120.0));
        // Every radar quad stays inside the frame (actors are clamped by callers).
        for i in 2..b.quad_count() - 2 {
            let (qx, qy, qw, qh) = quad_px(&b, i);
            assert!(qx >= x - 1e-2 && qy >= y - 1e-2);
            assert!(qx + qw <= x + w + 1e-2 && qy + qh <= y + h + 1e-2);
        }
    }
}
