//! Window and device event handling for SandboxState.

use winit::event::{DeviceEvent, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window};

use crate::state::SandboxState;

impl SandboxState {
    /// Handle a window event. Returns true if the app should exit.
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent, window: &Window) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
                true
            }
            WindowEvent::Resized(size) => {
                self.resize(size.width, size.height);
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.input.process_keyboard(key, event.state);
                    if key == KeyCode::Escape && event.state.is_pressed() {
                        self.running = false;
                        return true;
                    }
                }
                false
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.process_mouse_button(button, state);
                // Mouse look hides and confines the cursor while the right button is held.
                if button == MouseButton::Right {
                    let looking = state.is_pressed();
                    let mode = if looking {
                        CursorGrabMode::Confined
                    } else {
                        CursorGrabMode::None
                    };
                    if let Err(e) = window.set_cursor_grab(mode) {
                        log::debug!("Cursor grab {:?} unavailable: {}", mode, e);
                    }
                    window.set_cursor_visible(!looking);
                }
                false
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.process_cursor_position((position.x, position.y));
                false
            }
            WindowEvent::CursorLeft { .. } => {
                self.input.process_cursor_left();
                false
            }
            WindowEvent::RedrawRequested => {
                self.update();
                if self.time.frame_count() % 600 == 0 {
                    log::debug!(
                        "{:.0} fps, {:.1}s simulated, compass {:.2?}",
                        self.time.fps(),
                        self.physics.simulated_time(),
                        self.scene.compass_orientation()
                    );
                }
                window.request_redraw();
                false
            }
            _ => false,
        }
    }

    /// Handle device events (e.g. raw mouse motion).
    pub(crate) fn handle_device_event(&mut self, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.input.is_look_held() {
                self.input.process_mouse_motion(delta);
            }
        }
    }
}
