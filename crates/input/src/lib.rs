//! Input handling for keyboard and mouse.
//!
//! Key and button events are folded into held / pressed-this-frame /
//! released-this-frame sets so gameplay can ask for edges (reload, inventory
//! open/close) instead of tracking previous-frame state itself.

use glam::Vec2;
use std::collections::HashSet;

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,
    /// Keys released this frame.
    keys_released: HashSet<KeyCode>,

    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,
    /// Mouse buttons pressed this frame.
    mouse_pressed: HashSet<MouseButton>,

    /// Mouse movement delta this frame.
    mouse_delta: Vec2,
    /// Accumulated mouse delta (for when cursor is locked).
    accumulated_delta: Vec2,

    /// Whether the cursor is captured/locked.
    cursor_locked: bool,

    /// Mouse scroll state
    scroll_up: bool,
    scroll_down: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call after each frame has been updated.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.mouse_pressed.clear();
        self.mouse_delta = Vec2::ZERO;
        self.scroll_up = false;
        self.scroll_down = false;
    }

    /// Latch accumulated mouse motion into this frame's delta. Call before updating.
    pub fn begin_frame(&mut self) {
        self.mouse_delta = self.accumulated_delta;
        self.accumulated_delta = Vec2::ZERO;
    }

    /// Process a keyboard event. OS key repeat does not count as a new press.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                if self.keys_held.remove(&key) {
                    self.keys_released.insert(key);
                }
            }
        }
    }

    /// Process a mouse button event.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.mouse_held.contains(&button) {
                    self.mouse_pressed.insert(button);
                }
                self.mouse_held.insert(button);
            }
            ElementState::Released => {
                self.mouse_held.remove(&button);
            }
        }
    }

    /// Process raw mouse movement.
    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        self.accumulated_delta.x += delta.0 as f32;
        self.accumulated_delta.y += delta.1 as f32;
    }

    /// Process a scroll wheel step (positive = up).
    pub fn process_scroll(&mut self, lines: f32) {
        if lines > 0.0 {
            self.scroll_up = true;
        } else if lines < 0.0 {
            self.scroll_down = true;
        }
    }

    /// Drop all held state (window lost focus). Held keys count as released
    /// this frame, so a hold-to-open action still sees its closing edge.
    pub fn reset(&mut self) {
        log::debug!("Input reset, {} keys were held", self.keys_held.len());
        let released = std::mem::take(&mut self.keys_held);
        let locked = self.cursor_locked;
        *self = Self::default();
        self.keys_released = released;
        self.cursor_locked = locked;
    }

    // Query methods

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key was released this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Check if a mouse button was pressed this frame.
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_pressed.contains(&button)
    }

    /// Get the mouse movement delta for this frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Check if the cursor is locked.
    pub fn is_cursor_locked(&self) -> bool {
        self.cursor_locked
    }

    /// Set cursor lock state. Locking swallows this frame's clicks: the click
    /// that grabbed the cursor is not a shot.
    pub fn set_cursor_locked(&mut self, locked: bool) {
        if locked && !self.cursor_locked {
            self.mouse_pressed.clear();
        }
        self.cursor_locked = locked;
    }

    /// Movement on the world grid from WASD, normalized.
    /// W moves toward -y (north on the map), D toward +x.
    pub fn get_movement_input(&self) -> Vec2 {
        let mut movement = Vec2::ZERO;

        if self.is_key_held(KeyCode::KeyW) {
            movement.y -= 1.0;
        }
        if self.is_key_held(KeyCode::KeyS) {
            movement.y += 1.0;
        }
        if self.is_key_held(KeyCode::KeyA) {
            movement.x -= 1.0;
        }
        if self.is_key_held(KeyCode::KeyD) {
            movement.x += 1.0;
        }

        movement.normalize_or_zero()
    }

    /// Check if reload was pressed (R).
    pub fn is_reload_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyR)
    }

    /// Check if fire was pressed this frame (left mouse button, one shot per click).
    pub fn is_fire_pressed(&self) -> bool {
        self.is_mouse_pressed(MouseButton::Left)
    }

    /// Inventory wheel opens on I press...
    pub fn is_inventory_opened(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyI)
    }

    /// ...and closes on I release.
    pub fn is_inventory_closed(&self) -> bool {
        self.is_key_released(KeyCode::KeyI)
    }

    /// Next wheel slot (Right arrow or scroll down).
    pub fn is_next_item_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::ArrowRight) || self.scroll_down
    }

    /// Previous wheel slot (Left arrow or scroll up).
    pub fn is_prev_item_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::ArrowLeft) || self.scroll_up
    }

    /// Use the selected wheel item (Enter).
    pub fn is_use_item_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Enter) || self.is_key_pressed(KeyCode::NumpadEnter)
    }

    /// Toggle between top-down and first-person views (Tab).
    pub fn is_toggle_view_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Tab)
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_an_edge() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyR, ElementState::Pressed);
        assert!(input.is_reload_pressed());

        input.end_frame();
        // Key repeat while held is not a new press.
        input.process_keyboard(KeyCode::KeyR, ElementState::Pressed);
        assert!(!input.is_reload_pressed());
        assert!(input.is_key_held(KeyCode::KeyR));
    }

    #[test]
    fn inventory_open_and_close_edges() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyI, ElementState::Pressed);
        assert!(input.is_inventory_opened());
        assert!(!input.is_inventory_closed());
        input.end_frame();

        input.process_keyboard(KeyCode::KeyI, ElementState::Released);
        assert!(input.is_inventory_closed());
        assert!(!input.is_key_held(KeyCode::KeyI));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyI, ElementState::Released);
        assert!(!input.is_inventory_closed());
    }

    #[test]
    fn movement_maps_to_grid_axes() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        assert_eq!(input.get_movement_input(), Vec2::new(0.0, -1.0));

        input.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
        let m = input.get_movement_input();
        assert!((m.length() - 1.0).abs() < 1e-6);
        assert!(m.x > 0.0 && m.y < 0.0);

        input.process_keyboard(KeyCode::KeyA, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyS, ElementState::Pressed);
        assert_eq!(input.get_movement_input(), Vec2::ZERO);
    }

    #[test]
    fn mouse_motion_latches_per_frame() {
        let mut input = InputState::new();
        input.process_mouse_motion((3.0, -2.0));
        input.process_mouse_motion((1.0, 1.0));
        input.begin_frame();
        assert_eq!(input.mouse_delta(), Vec2::new(4.0, -1.0));
        input.end_frame();
        input.begin_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn scroll_cycles_wheel() {
        let mut input = InputState::new();
        input.process_scroll(-1.0);
        assert!(input.is_next_item_pressed());
        assert!(!input.is_prev_item_pressed());
        input.end_frame();
        assert!(!input.is_next_item_pressed());
    }

    #[test]
    fn reset_keeps_cursor_lock() {
        let mut input = InputState::new();
        input.set_cursor_locked(true);
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.reset();
        assert!(input.is_cursor_locked());
        assert!(!input.is_key_held(KeyCode::KeyW));
    }

    #[test]
    fn focus_loss_releases_held_inventory_key() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyI, ElementState::Pressed);
        input.end_frame();

        input.reset();
        assert!(input.is_inventory_closed());
        assert!(!input.is_key_held(KeyCode::KeyI));

        // The OS release that may follow the focus change is a no-op.
        input.end_frame();
        input.process_keyboard(KeyCode::KeyI, ElementState::Released);
        assert!(!input.is_inventory_closed());
    }

    #[test]
    fn capturing_click_does_not_fire() {
        let mut input = InputState::new();
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        input.set_cursor_locked(true);
        assert!(!input.is_fire_pressed());
        input.end_frame();

        input.process_mouse_button(MouseButton::Left, ElementState::Released);
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(input.is_fire_pressed());

        // Already locked: a repeated lock keeps the click.
        input.set_cursor_locked(true);
        assert!(input.is_fire_pressed());
    }
}
