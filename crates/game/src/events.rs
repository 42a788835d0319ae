//! Window and device event handling for GameState.

use winit::event::{DeviceEvent, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::CursorGrabMode;

use crate::config::ViewMode;

impl crate::GameState {
    /// Handle a window event. Returns true if the app should exit.
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
                true
            }
            WindowEvent::Resized(size) => {
                self.renderer.resize(size);
                self.camera.set_aspect(size.width, size.height);
                false
            }
            WindowEvent::Focused(false) => {
                self.input.reset();
                self.inventory.hide();
                self.release_cursor();
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.input.process_keyboard(key, event.state);

                    // First Escape frees the mouse, a second one quits.
                    if key == KeyCode::Escape && event.state.is_pressed() && !event.repeat {
                        if self.input.is_cursor_locked() {
                            self.release_cursor();
                        } else {
                            log::info!("Escape pressed, exiting");
                            self.running = false;
                            return true;
                        }
                    }
                }
                false
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.process_mouse_button(button, state);
                if state.is_pressed()
                    && !self.input.is_cursor_locked()
                    && self.view_mode == ViewMode::FirstPerson
                {
                    self.capture_cursor();
                }
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                match delta {
                    MouseScrollDelta::LineDelta(_, y) => self.input.process_scroll(y),
                    MouseScrollDelta::PixelDelta(pos) => self.input.process_scroll(pos.y as f32),
                }
                false
            }
            WindowEvent::RedrawRequested => {
                self.update();
                if let Err(e) = self.render() {
                    match e.downcast_ref::<wgpu::SurfaceError>() {
                        Some(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            log::debug!("Surface {}, reconfiguring", e);
                            self.renderer.resize(self.renderer.size);
                        }
                        Some(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("Render error: {}", e);
                            self.running = false;
                            return true;
                        }
                        _ => log::warn!("Frame skipped: {:#}", e),
                    }
                }
                self.renderer.window.request_redraw();
                false
            }
            _ => false,
        }
    }

    /// Handle device events (e.g. raw mouse motion).
    pub(crate) fn handle_device_event(&mut self, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.input.is_cursor_locked() {
                self.input.process_mouse_motion(delta);
            }
        }
    }

    pub(crate) fn capture_cursor(&mut self) {
        let window = &self.renderer.window;
        if let Err(e) = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
        {
            log::warn!("Could not grab cursor: {}", e);
            return;
        }
        window.set_cursor_visible(false);
        self.input.set_cursor_locked(true);
    }

    pub(crate) fn release_cursor(&mut self) {
        let _ = self.renderer.window.set_cursor_grab(CursorGrabMode::None);
        self.renderer.window.set_cursor_visible(true);
        self.input.set_cursor_locked(false);
    }
}
