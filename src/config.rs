use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// Every field has a default, so a file only needs the keys it overrides.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub input: InputConfig,
    pub audio: AudioConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub target_fps: u32,
    /// Grab and hide the cursor for mouse look.
    pub mouse_lock: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Scene Engine".to_string(),
            width: 800,
            height: 600,
            target_fps: 60,
            mouse_lock: true,
        }
    }
}

impl WindowConfig {
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub start_position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            z_near: 0.01,
            z_far: 1000.0,
            start_position: [0.0, 0.0, -1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Radians of turn per unit of mouse travel.
    pub turn_speed: f32,
    /// World units per second.
    pub move_speed: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            turn_speed: 0.003,
            move_speed: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub startup_sound: Option<String>,
    pub startup_volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            startup_sound: Some("./res/sounds/test.ogg".to_string()),
            startup_volume: 0.1,
        }
    }
}

impl GameConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = GameConfig::from_toml("").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.window.width, 800);
        assert_eq!(config.camera.fov, 75.0);
    }

    #[test]
    fn partial_override() {
        let config = GameConfig::from_toml(
            r#"
            [window]
            width = 1280
            height = 720

            [input]
            move_speed = 5.0

            [audio]
            startup_volume = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.title, "Scene Engine");
        assert!((config.window.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
        assert_eq!(config.input.move_speed, 5.0);
        assert_eq!(config.input.turn_speed, 0.003);
        assert_eq!(config.audio.startup_volume, 0.5);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GameConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        assert!(GameConfig::from_toml("[window]\nwidth = \"wide\"").is_err());
    }
}
