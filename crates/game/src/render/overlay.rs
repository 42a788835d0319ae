//! Overlay composition for the current view.

use renderer::OverlayBuilder;

use crate::config::ViewMode;
use crate::hud;
use crate::GameState;

/// Build the screen-space overlay: the map (top-down) or radar (first-person),
/// then the ammo counter and, when open, the inventory wheel on top.
pub fn build(state: &GameState, sw: f32, sh: f32) -> OverlayBuilder {
    let mut b = OverlayBuilder::new(sw, sh);
    let t = state.time.elapsed_seconds();

    match state.view_mode {
        ViewMode::TopDown => hud::add_top_down(&mut b, &state.world, &state.player, &state.horse, t),
        ViewMode::FirstPerson => hud::add_radar(&mut b, &state.world, &state.player, &state.horse, t),
    }
    hud::add_ammo(&mut b, &state.player);
    hud::add_inventory_wheel(&mut b, &state.inventory, |name| state.renderer.icon_uv(name));

    b
}
