//! Simulation settings
//!
//! Read from JSON: a file named by `TORUS_DUEL_SETTINGS` natively, LocalStorage
//! on the web (read on the main thread and posted to the worker with the canvas).

use serde::{Deserialize, Serialize};

use crate::consts::{BALL_SPEED, MAX_RESOLVE_PASSES};
use crate::error::{Result, StartupError};
use crate::sim::SeedPolicy;

/// Environment variable naming a settings file (native only)
pub const SETTINGS_ENV: &str = "TORUS_DUEL_SETTINGS";

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ball speed along each axis (pixels/s)
    pub speed: f32,
    /// How the grid is split at start
    pub seed_policy: SeedPolicy,
    /// Seed for the starting ball offsets (random when absent)
    pub rng_seed: Option<u64>,
    /// Cap on collisions resolved per update tick
    pub max_resolve_passes: u32,

    // === Rendering ===
    /// Draw wrapped copies of each ball across the canvas edges
    pub ghosts: bool,
    /// Outline each ball's 3×3 block of collision candidates
    pub show_candidates: bool,
    /// Draw frame/update rates in the corner
    pub show_metrics: bool,

    // === Headless ===
    /// Surface width when no canvas provides one
    pub width: u32,
    /// Surface height when no canvas provides one
    pub height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: BALL_SPEED,
            seed_policy: SeedPolicy::DiagonalSplit,
            rng_seed: None,
            max_resolve_passes: MAX_RESOLVE_PASSES,

            ghosts: true,
            show_candidates: false,
            show_metrics: false,

            width: 600,
            height: 600,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reject values that parse but cannot drive a simulation
    pub fn validate(&self) -> Result<()> {
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(StartupError::InvalidSpeed(self.speed));
        }
        if self.width == 0 || self.height == 0 {
            return Err(StartupError::EmptySurface {
                width: self.width,
                height: self.height,
            });
        }
        if self.max_resolve_passes == 0 {
            return Err(StartupError::NoResolvePasses);
        }
        Ok(())
    }

    pub fn to_json(&self) -> String {
        // Only plain fields; serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Load settings from the file named by `TORUS_DUEL_SETTINGS` (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(SETTINGS_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path);
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings in {}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read settings from {}: {}", path, e);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "torus_duel_settings";

    /// Load settings from LocalStorage (main thread only)
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
                    Err(e) => log::warn!("Ignoring malformed settings: {}", e),
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
    fn test_missing_fields_use_defaults() {
        let settings = Settings::from_json(r#"{"speed": 120.0, "ghosts": false}"#).unwrap();
        assert_eq!(settings.speed, 120.0);
        assert!(!settings.ghosts);
        assert_eq!(settings.seed_policy, SeedPolicy::DiagonalSplit);
        assert_eq!(settings.max_resolve_passes, MAX_RESOLVE_PASSES);
    }

    #[test]
    fn test_seed_policy_by_name() {
        let settings = Settings::from_json(r#"{"seed_policy": "VerticalSplit", "rng_seed": 9}"#).unwrap();
        assert_eq!(settings.seed_policy, SeedPolicy::VerticalSplit);
        assert_eq!(settings.rng_seed, Some(9));
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            show_metrics: true,
            width: 800,
            ..Default::default()
        };
        let back = Settings::from_json(&settings.to_json()).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_unusable_speed_is_rejected() {
        let settings = Settings::from_json(r#"{"speed": 1e30}"#).unwrap();
        assert!(settings.validate().is_ok(), "large but finite speeds are allowed");

        for speed in [f32::INFINITY, f32::NAN, -1.0] {
            let settings = Settings {
                speed,
                ..Default::default()
            };
            assert!(matches!(settings.validate(), Err(StartupError::InvalidSpeed(_))));
        }
    }

    #[test]
    fn test_empty_surface_is_rejected() {
        let settings = Settings::from_json(r#"{"width": 0, "height": 0}"#).unwrap();
        assert!(matches!(
            settings.validate(),
            Err(StartupError::EmptySurface { width: 0, height: 0 })
        ));

        let settings = Settings::from_json(r#"{"height": 0}"#).unwrap();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_resolve_passes_is_rejected() {
        let settings = Settings::from_json(r#"{"max_resolve_passes": 0}"#).unwrap();
        assert!(matches!(settings.validate(), Err(StartupError::NoResolvePasses)));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json("{speed: fast}").is_err());
    }
}
