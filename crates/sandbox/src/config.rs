//! Sandbox settings (window, camera, physics, interaction). Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persistent sandbox settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub window: WindowSettings,
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub physics: PhysicsSettings,
    #[serde(default)]
    pub interaction: InteractionSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSettings {
    #[serde(default = "default_title")]
    pub title: String,
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub height: u32,
}

fn default_title() -> String {
    "CrashWorld".to_string()
}
fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

/// Camera rig start pose and control tuning. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub start_pos: [f32; 3],
    /// Heading, pitch, roll.
    pub start_hpr: [f32; 3],
    /// Vertical field of view.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Degrees of rotation per pixel of mouse motion.
    pub mouse_sensitivity: f32,
    /// Units per second.
    pub move_speed: f32,
    pub pitch_limits: (f32, f32),
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            start_pos: [12.0, -18.0, 10.0],
            start_hpr: [20.0, -15.0, 0.0],
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            mouse_sensitivity: 0.15,
            move_speed: 10.0,
            pitch_limits: (-89.9, 89.9),
        }
    }
}

/// Physics world parameters and the fixed sub-step policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub gravity: [f32; 3],
    /// Upper bound of fixed sub-steps per frame.
    pub substeps: u32,
    /// Length of one fixed sub-step in seconds.
    pub dt_substep: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: [0.0, 0.0, -9.81],
            substeps: 5,
            dt_substep: 1.0 / 240.0,
        }
    }
}

/// Radial impulse triggered by a pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    pub impulse_radius: f32,
    pub impulse_strength: f32,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            impulse_radius: 4.0,
            impulse_strength: 35.0,
        }
    }
}

impl Settings {
    /// Load settings from `config.ron`. If the file is missing or invalid, returns defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Load settings from `path`, falling back to defaults on any problem.
    pub fn load_from(path: &Path) -> Self {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(_) => {
                log::debug!("No settings at {:?}, using defaults", path);
                return Self::default();
            }
        };
        match ron::from_str::<Settings>(&data) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("Invalid settings at {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Replace values that would break the simulation with their defaults.
    pub fn sanitized(mut self) -> Self {
        let physics_defaults = PhysicsSettings::default();
        if self.physics.substeps == 0 {
            log::warn!("physics.substeps must be >= 1, using {}", physics_defaults.substeps);
            self.physics.substeps = physics_defaults.substeps;
        }
        if !(self.physics.dt_substep.is_finite() && self.physics.dt_substep > 0.0) {
            log::warn!("physics.dt_substep must be > 0, using {}", physics_defaults.dt_substep);
            self.physics.dt_substep = physics_defaults.dt_substep;
        }
        if self.physics.gravity.iter().any(|g| !g.is_finite()) {
            log::warn!("physics.gravity must be finite, using defaults");
            self.physics.gravity = physics_defaults.gravity;
        }

        let interaction_defaults = InteractionSettings::default();
        if !(self.interaction.impulse_radius.is_finite() && self.interaction.impulse_radius > 0.0) {
            log::warn!("interaction.impulse_radius must be > 0, using default");
            self.interaction.impulse_radius = interaction_defaults.impulse_radius;
        }
        if !self.interaction.impulse_strength.is_finite() {
            log::warn!("interaction.impulse_strength must be finite, using default");
            self.interaction.impulse_strength = interaction_defaults.impulse_strength;
        }

        let (lo, hi) = self.camera.pitch_limits;
        if lo > hi {
            self.camera.pitch_limits = (hi, lo);
        }
        self
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let settings: Settings = ron::from_str("()").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.physics.substeps, 5);
        assert_eq!(settings.interaction.impulse_radius, 4.0);
        assert_eq!(settings.interaction.impulse_strength, 35.0);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let settings: Settings =
            ron::from_str("(physics: (substeps: 8), window: (width: 640))").unwrap();
        assert_eq!(settings.physics.substeps, 8);
        assert_eq!(settings.physics.dt_substep, 1.0 / 240.0);
        assert_eq!(settings.window.width, 640);
        assert_eq!(settings.window.height, 720);
        assert_eq!(settings.camera, CameraSettings::default());
    }

    #[test]
    fn sanitize_repairs_unusable_values() {
        let mut settings = Settings::default();
        settings.physics.substeps = 0;
        settings.physics.dt_substep = -1.0;
        settings.interaction.impulse_radius = 0.0;
        settings.camera.pitch_limits = (80.0, -80.0);

        let settings = settings.sanitized();
        assert_eq!(settings.physics, PhysicsSettings::default());
        assert_eq!(settings.interaction.impulse_radius, 4.0);
        assert_eq!(settings.camera.pitch_limits, (-80.0, 80.0));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = Settings::load_from(Path::new("/nonexistent/crashworld/config.ron"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn settings_round_trip_through_ron() {
        let mut settings = Settings::default();
        settings.physics.gravity = [0.0, 0.0, -3.7];
        let text = ron::ser::to_string_pretty(&settings, ron::ser::PrettyConfig::default()).unwrap();
        let back: Settings = ron::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }
}
