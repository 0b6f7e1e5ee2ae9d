//! Scene and gameplay settings
//!
//! Loaded from a JSON file when one is given, defaults otherwise.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Environment variable naming a settings file
pub const SETTINGS_ENV: &str = "FLAPPY_SETTINGS";

/// Errors from loading or validating settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Scene geometry and gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Scene ===
    /// Viewport size (points)
    pub viewport: Vec2,
    /// Bird sprite size
    pub bird_size: Vec2,
    /// Pipe sprite size
    pub pipe_size: Vec2,
    /// Background texture width
    pub background_tile_width: f32,
    /// Number of background tiles laid side by side
    pub background_tiles: u32,
    /// Seconds to scroll one background tile width
    pub background_cycle_secs: f32,

    // === Gameplay ===
    /// Vertical impulse per tap
    pub flap_impulse: f32,
    /// Seconds between obstacle spawns
    pub spawn_interval_secs: f32,
    /// Obstacle scroll speed (points/s)
    pub pipe_speed: f32,
    /// Gap height in bird heights
    pub gap_bird_heights: f32,
    /// Max gap offset as a fraction of viewport height
    pub gap_offset_fraction: f32,

    /// Fixed RNG seed; wall clock when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport: Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
            bird_size: Vec2::new(BIRD_WIDTH, BIRD_HEIGHT),
            pipe_size: Vec2::new(PIPE_WIDTH, PIPE_HEIGHT),
            background_tile_width: BACKGROUND_TILE_WIDTH,
            background_tiles: BACKGROUND_TILES,
            background_cycle_secs: BACKGROUND_CYCLE_SECS,

            flap_impulse: FLAP_IMPULSE,
            spawn_interval_secs: SPAWN_INTERVAL_SECS,
            pipe_speed: PIPE_SPEED,
            gap_bird_heights: GAP_BIRD_HEIGHTS,
            gap_offset_fraction: GAP_OFFSET_FRACTION,

            seed: None,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from an explicit path, then `FLAPPY_SETTINGS`, then defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load_from(path);
        }
        match std::env::var_os(SETTINGS_ENV) {
            Some(path) => Self::load_from(PathBuf::from(path)),
            None => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
        }
    }

    /// Reject values that would make the scene degenerate
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&'static str, bool); 8] = [
            ("viewport", self.viewport.min_element() > 0.0),
            ("bird_size", self.bird_size.min_element() > 0.0),
            ("pipe_size", self.pipe_size.min_element() > 0.0),
            ("background_tile_width", self.background_tile_width > 0.0),
            ("background_cycle_secs", self.background_cycle_secs > 0.0),
            ("spawn_interval_secs", self.spawn_interval_secs > 0.0),
            ("pipe_speed", self.pipe_speed > 0.0),
            ("gap_bird_heights", self.gap_bird_heights > 0.0),
        ];
        for (field, ok) in checks {
            if !ok {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be positive",
                });
            }
        }
        if !(0.0..=0.5).contains(&self.gap_offset_fraction) {
            return Err(ConfigError::Invalid {
                field: "gap_offset_fraction",
                reason: "must be within 0.0..=0.5",
            });
        }
        Ok(())
    }

    /// Gap height between upper and lower pipe
    pub fn gap_height(&self) -> f32 {
        self.bird_size.y * self.gap_bird_heights
    }

    /// Largest vertical gap offset either way
    pub fn max_gap_offset(&self) -> f32 {
        self.viewport.y * self.gap_offset_fraction
    }

    /// Scene centre
    pub fn center(&self) -> Vec2 {
        self.viewport * 0.5
    }
}
