//! Free-look camera rig for a Z-up world.

use engine_core::Transform;
use glam::{Vec2, Vec3};
use input::InputState;

use crate::config::CameraSettings;
use crate::interaction::CameraPose;

/// Camera driven by mouse look and WASD/R/F movement.
#[derive(Debug, Clone)]
pub struct CameraRig {
    /// Camera transform (position and rotation).
    pub transform: Transform,
    /// Heading in degrees, about world +Z.
    heading: f32,
    /// Pitch in degrees, about local +X.
    pitch: f32,
    roll: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    settings: CameraSettings,
}

impl CameraRig {
    pub fn new(settings: &CameraSettings) -> Self {
        let mut rig = Self {
            transform: Transform::default(),
            heading: 0.0,
            pitch: 0.0,
            roll: 0.0,
            fov_degrees: settings.fov_degrees,
            near: settings.near,
            far: settings.far,
            aspect: 16.0 / 9.0,
            settings: settings.clone(),
        };
        rig.reset_pose();
        rig
    }

    /// Return to the configured start position and orientation.
    pub fn reset_pose(&mut self) {
        let [h, p, r] = self.settings.start_hpr;
        self.transform.position = Vec3::from_array(self.settings.start_pos);
        self.heading = h;
        self.pitch = p;
        self.roll = r;
        self.clamp_pitch();
        self.apply_rotation();
    }

    /// Update aspect ratio (call on window resize).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Mouse look. `delta` is in pixels; positive x turns right, positive y looks down.
    pub fn look(&mut self, delta: Vec2) {
        let sensitivity = self.settings.mouse_sensitivity;
        self.add_heading_pitch(-delta.x * sensitivity, -delta.y * sensitivity);
    }

    /// Rotate by the given angles in degrees. Pitch stays inside the configured limits.
    pub fn add_heading_pitch(&mut self, heading: f32, pitch: f32) {
        self.heading = (self.heading + heading) % 360.0;
        self.pitch += pitch;
        self.clamp_pitch();
        self.apply_rotation();
    }

    /// Move along the camera's own right and forward axes, plus world Z.
    /// `planar.x` strafes right, `planar.y` moves along the view direction.
    pub fn move_local(&mut self, planar: Vec2, vertical: f32, dt: f32) {
        let forward = self.transform.forward();
        let right = self.transform.right();

        let planar = planar.normalize_or_zero();
        let step = (forward * planar.y + right * planar.x + Vec3::Z * vertical)
            * self.settings.move_speed
            * dt;
        self.transform.translate(step);
    }

    /// Apply this frame's controls.
    pub fn update(&mut self, input: &InputState, dt: f32) {
        if input.is_reset_pose_pressed() {
            self.reset_pose();
            log::debug!(
                "Camera reset to heading {:.1}, pitch {:.1}",
                self.heading(),
                self.pitch()
            );
        }
        if input.is_look_held() {
            self.look(input.mouse_delta());
        }
        self.move_local(input.get_movement_input(), input.get_vertical_input(), dt);
    }

    /// Snapshot used for picking.
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.transform.position,
            rotation: self.transform.rotation,
            fov_degrees: self.fov_degrees,
            aspect: self.aspect,
            near: self.near,
            far: self.far,
        }
    }

    fn clamp_pitch(&mut self) {
        let (lo, hi) = self.settings.pitch_limits;
        self.pitch = self.pitch.clamp(lo, hi);
    }

    fn apply_rotation(&mut self) {
        self.transform.rotation = Transform::rotation_from_hpr(self.heading, self.pitch, self.roll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use input::{ElementState, KeyCode, MouseButton};

    fn rig() -> CameraRig {
        CameraRig::new(&CameraSettings::default())
    }

    #[test]
    fn starts_at_configured_pose() {
        let rig = rig();
        assert_eq!(rig.transform.position, Vec3::new(12.0, -18.0, 10.0));
        assert_eq!(rig.heading(), 20.0);
        assert_eq!(rig.pitch(), -15.0);
        // Looking down a little.
        assert!(rig.transform.forward().z < 0.0);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut rig = rig();
        rig.add_heading_pitch(0.0, 500.0);
        assert_eq!(rig.pitch(), 89.9);
        rig.add_heading_pitch(0.0, -1000.0);
        assert_eq!(rig.pitch(), -89.9);
    }

    #[test]
    fn dragging_right_turns_right() {
        let mut rig = rig();
        let before = rig.heading();
        rig.look(Vec2::new(10.0, 0.0));
        assert!((rig.heading() - (before - 1.5)).abs() < 1e-4);
    }

    #[test]
    fn forward_motion_follows_view_direction() {
        let mut rig = rig();
        // Heading 0, pitch -45: looking forward and down.
        rig.add_heading_pitch(-20.0, -30.0);
        let start = rig.transform.position;
        rig.move_local(Vec2::Y, 0.0, 0.5);
        let moved = rig.transform.position - start;
        let h = 5.0 * std::f32::consts::FRAC_1_SQRT_2;
        assert!(moved.abs_diff_eq(Vec3::new(0.0, h, -h), 1e-3), "{:?}", moved);
    }

    #[test]
    fn strafe_stays_level_without_roll() {
        let mut rig = rig();
        rig.add_heading_pitch(-20.0, -30.0);
        let start = rig.transform.position;
        rig.move_local(Vec2::X, 0.0, 0.1);
        let moved = rig.transform.position - start;
        assert!(moved.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-4), "{:?}", moved);
    }

    #[test]
    fn vertical_motion_is_world_z() {
        let mut rig = rig();
        let start = rig.transform.position;
        rig.move_local(Vec2::ZERO, -1.0, 0.1);
        assert!((rig.transform.position - start).abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));
    }

    #[test]
    fn look_only_while_right_button_held() {
        let mut rig = rig();
        let mut input = InputState::new();
        input.process_mouse_motion((20.0, 0.0));
        rig.update(&input, 0.0);
        assert_eq!(rig.heading(), 20.0);

        input.process_mouse_button(MouseButton::Right, ElementState::Pressed);
        rig.update(&input, 0.0);
        assert!(rig.heading() < 20.0);
    }

    #[test]
    fn alt_zero_resets_pose() {
        let mut rig = rig();
        rig.add_heading_pitch(45.0, 10.0);
        rig.move_local(Vec2::X, 1.0, 1.0);

        let mut input = InputState::new();
        input.process_keyboard(KeyCode::AltLeft, ElementState::Pressed);
        input.process_keyboard(KeyCode::Digit0, ElementState::Pressed);
        rig.update(&input, 0.0);

        assert_eq!(rig.transform.position, Vec3::new(12.0, -18.0, 10.0));
        assert_eq!(rig.heading(), 20.0);
        assert_eq!(rig.pitch(), -15.0);
    }

    #[test]
    fn pose_carries_projection_settings() {
        let mut rig = rig();
        rig.set_aspect(800, 400);
        let pose = rig.pose();
        assert_eq!(pose.aspect, 2.0);
        assert_eq!(pose.fov_degrees, 60.0);
        assert_eq!(pose.rotation, rig.transform.rotation);
    }
}
