//! Input handling for keyboard and mouse.

use glam::Vec2;
use std::collections::HashSet;

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,

    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,
    /// Mouse buttons pressed this frame.
    mouse_pressed: HashSet<MouseButton>,

    /// Mouse position in window coordinates, `None` while the cursor is outside the window.
    mouse_position: Option<Vec2>,
    /// Raw mouse motion accumulated since the last `end_frame`.
    mouse_delta: Vec2,

    /// Window inner size in physical pixels.
    window_size: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call once the frame has consumed its input.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_pressed.clear();
        self.mouse_delta = Vec2::ZERO;
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
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
        self.mouse_delta.x += delta.0 as f32;
        self.mouse_delta.y += delta.1 as f32;
    }

    /// Process cursor position update.
    pub fn process_cursor_position(&mut self, position: (f64, f64)) {
        self.mouse_position = Some(Vec2::new(position.0 as f32, position.1 as f32));
    }

    /// The cursor left the window.
    pub fn process_cursor_left(&mut self) {
        self.mouse_position = None;
    }

    /// Record the window size used to normalize pointer coordinates.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = Vec2::new(width as f32, height as f32);
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

    /// Check if a mouse button is held.
    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    /// Check if a mouse button was pressed this frame.
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_pressed.contains(&button)
    }

    /// Get the mouse position in window coordinates.
    pub fn mouse_position(&self) -> Option<Vec2> {
        self.mouse_position
    }

    /// Get the mouse movement delta for this frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Pointer in normalized device coordinates: x right, y up, both in [-1, 1].
    /// `None` without a cursor inside a non-empty window.
    pub fn pointer_ndc(&self) -> Option<Vec2> {
        let position = self.mouse_position?;
        if self.window_size.x <= 0.0 || self.window_size.y <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            2.0 * position.x / self.window_size.x - 1.0,
            1.0 - 2.0 * position.y / self.window_size.y,
        ))
    }

    /// Get planar movement input as a normalized vector (WASD).
    pub fn get_movement_input(&self) -> Vec2 {
        let mut movement = Vec2::ZERO;

        if self.is_key_held(KeyCode::KeyW) {
            movement.y += 1.0;
        }
        if self.is_key_held(KeyCode::KeyS) {
            movement.y -= 1.0;
        }
        if self.is_key_held(KeyCode::KeyA) {
            movement.x -= 1.0;
        }
        if self.is_key_held(KeyCode::KeyD) {
            movement.x += 1.0;
        }

        if movement.length_squared() > 0.0 {
            movement = movement.normalize();
        }

        movement
    }

    /// Vertical movement input along world Z (R up, F down).
    pub fn get_vertical_input(&self) -> f32 {
        let mut vertical = 0.0;
        if self.is_key_held(KeyCode::KeyR) {
            vertical += 1.0;
        }
        if self.is_key_held(KeyCode::KeyF) {
            vertical -= 1.0;
        }
        vertical
    }

    /// Check if pick was pressed this frame (Left mouse button, one-shot per click).
    pub fn is_pick_pressed(&self) -> bool {
        self.is_mouse_pressed(MouseButton::Left)
    }

    /// Check if mouse look is active (Right mouse button held).
    pub fn is_look_held(&self) -> bool {
        self.is_mouse_held(MouseButton::Right)
    }

    /// Check if the camera reset chord was pressed (Alt+0).
    pub fn is_reset_pose_pressed(&self) -> bool {
        let alt = self.is_key_held(KeyCode::AltLeft) || self.is_key_held(KeyCode::AltRight);
        alt && self.is_key_pressed(KeyCode::Digit0)
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;
