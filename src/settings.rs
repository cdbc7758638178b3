//! Startup settings
//!
//! Everything here is read once before the first frame and never changes while
//! the loop runs. Defaults come from [`crate::consts`]; a JSON document can
//! override any subset of fields.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::renderer::Rgb;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file could not be read
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings document is not valid JSON for [`Settings`]
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Values parse but describe an impossible scene
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Window and frame-rate settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    /// Target frames per second
    pub fps: u32,
    /// Padding between window edge and arena
    pub margin: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            fps: FPS,
            margin: MARGIN,
        }
    }
}

impl WindowSettings {
    /// Arena center (window center, whole pixels)
    pub fn arena_center(&self) -> Vec2 {
        Vec2::new((self.width / 2) as f32, (self.height / 2) as f32)
    }

    /// Largest circle that fits the window, minus the margin
    pub fn arena_radius(&self) -> f32 {
        (self.width.min(self.height) / 2) as f32 - self.margin
    }

    /// Fixed timestep matching the target frame rate
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }
}

/// Ball kinematics and growth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Per-frame velocity multiplier
    pub linear_friction: f32,
    /// Fraction of normal velocity kept on bounce
    pub restitution: f32,
    /// Fraction of tangential velocity kept on bounce
    pub tangential_friction: f32,
    /// Radius growth rate (pixels/s)
    pub growth_per_sec: f32,
    pub base_radius: f32,
    /// Radius cap as a fraction of arena radius
    pub max_ratio: f32,
    pub initial_speed: f32,
    pub initial_vy: f32,
    pub start_height_ratio: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            linear_friction: LINEAR_FRICTION,
            restitution: RESTITUTION,
            tangential_friction: TANGENTIAL_FRICTION,
            growth_per_sec: GROWTH_PER_SEC,
            base_radius: BALL_BASE_RADIUS,
            max_ratio: BALL_MAX_RATIO,
            initial_speed: INITIAL_SPEED,
            initial_vy: INITIAL_VY,
            start_height_ratio: START_HEIGHT_RATIO,
        }
    }
}

/// Motion trail and impact flash settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailParams {
    /// Motion trail ring buffer capacity
    pub capacity: usize,
    /// Seconds an impact flash stays visible
    pub impact_lifetime: f32,
    pub impact_width: f32,
    pub trail_width: f32,
    /// Alpha reached by the newest trail segment
    pub alpha_ceiling: u8,
}

impl Default for TrailParams {
    fn default() -> Self {
        Self {
            capacity: TRAIL_LEN,
            impact_lifetime: IMPACT_LIFETIME,
            impact_width: IMPACT_WIDTH,
            trail_width: TRAIL_WIDTH,
            alpha_ceiling: TRAIL_ALPHA_CEILING,
        }
    }
}

/// Complete startup configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub physics: PhysicsParams,
    pub trail: TrailParams,
    /// Ball colors in cycle order
    pub palette: Vec<Rgb>,
    pub arena_color: Rgb,
    pub background: Rgb,
    /// RNG seed for the launch direction (clock-derived when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            physics: PhysicsParams::default(),
            trail: TrailParams::default(),
            palette: PALETTE.to_vec(),
            arena_color: ARENA_COLOR,
            background: BG_COLOR,
            seed: None,
        }
    }
}

impl Settings {
    /// Environment variable naming a JSON settings file (native only)
    pub const CONFIG_ENV: &'static str = "RING_BOUNCE_CONFIG";

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "ring_bounce_settings";

    /// Parse and validate a JSON settings document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations that break the containment invariant from frame one
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.palette.is_empty() {
            return Err(SettingsError::Invalid("palette must not be empty".into()));
        }
        let arena_radius = self.window.arena_radius();
        if arena_radius <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "margin {} leaves no room for an arena in a {}x{} window",
                self.window.margin, self.window.width, self.window.height
            )));
        }
        let ratio = self.physics.max_ratio;
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(SettingsError::Invalid(format!(
                "max_ratio must be in (0, 1), got {ratio}"
            )));
        }
        if self.physics.base_radius <= 0.0 || self.physics.base_radius >= arena_radius {
            return Err(SettingsError::Invalid(format!(
                "base_radius {} must be positive and smaller than arena radius {}",
                self.physics.base_radius, arena_radius
            )));
        }
        let cap = arena_radius * ratio;
        if self.physics.base_radius > cap {
            return Err(SettingsError::Invalid(format!(
                "base_radius {} exceeds the growth cap {} (arena radius {} * max_ratio {})",
                self.physics.base_radius, cap, arena_radius, ratio
            )));
        }
        let growth = self.physics.growth_per_sec;
        if !growth.is_finite() || growth < 0.0 {
            return Err(SettingsError::Invalid(format!(
                "growth_per_sec must be finite and non-negative, got {growth}"
            )));
        }
        if self.trail.capacity == 0 {
            return Err(SettingsError::Invalid("trail capacity must be at least 1".into()));
        }
        if self.trail.impact_lifetime <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "impact_lifetime must be positive, got {}",
                self.trail.impact_lifetime
            )));
        }
        Ok(())
    }

    /// Read settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from the file named by `RING_BOUNCE_CONFIG`, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::env::var(Self::CONFIG_ENV) {
            Ok(path) => Self::load_or_default(&path),
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Load from `path`, logging and falling back to defaults on any error
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: &str) -> Self {
        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings file {}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_arena_geometry() {
        let window = WindowSettings::default();
        assert_eq!(window.arena_center(), Vec2::new(400.0, 300.0));
        assert_eq!(window.arena_radius(), 250.0);
        assert!((window.frame_dt() - 1.0 / 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_defaults_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{ "physics": { "gravity": 50.0 }, "seed": 7 }"#).unwrap();
        assert_eq!(settings.physics.gravity, 50.0);
        assert_eq!(settings.physics.restitution, RESTITUTION);
        assert_eq!(settings.trail.capacity, TRAIL_LEN);
        assert_eq!(settings.palette.len(), PALETTE.len());
        assert_eq!(settings.seed, Some(7));
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            seed: Some(42),
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_empty_palette() {
        let result = Settings::from_json(r#"{ "palette": [] }"#);
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_rejects_oversized_ball() {
        let result = Settings::from_json(r#"{ "physics": { "base_radius": 300.0 } }"#);
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_ratio() {
        let result = Settings::from_json(r#"{ "physics": { "max_ratio": 1.0 } }"#);
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_rejects_negative_growth() {
        let result = Settings::from_json(r#"{ "physics": { "growth_per_sec": -5.0 } }"#);
        assert!(matches!(result, Err(SettingsError::Invalid(_))));

        let mut settings = Settings::default();
        settings.physics.growth_per_sec = f32::NAN;
        assert!(matches!(settings.validate(), Err(SettingsError::Invalid(_))));

        settings.physics.growth_per_sec = 0.0;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_rejects_base_radius_above_cap() {
        // Cap is 250 * 0.05 = 12.5, below the default base radius of 15
        let result = Settings::from_json(r#"{ "physics": { "max_ratio": 0.05 } }"#);
        assert!(matches!(result, Err(SettingsError::Invalid(_))));

        let above = Settings::from_json(r#"{ "physics": { "max_ratio": 0.1 } }"#);
        assert!(above.is_ok());
    }

    #[test]
    fn test_rejects_margin_larger_than_window() {
        let result = Settings::from_json(r#"{ "window": { "margin": 400.0 } }"#);
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_parse_error() {
        let result = Settings::from_json("{ not json");
        assert!(matches!(result, Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = Settings::load_from("/nonexistent/ring-bounce.json");
        assert!(matches!(result, Err(SettingsError::Io(_))));
    }
}
