//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. Defaults reproduce the
//! shipped feel; a JSON file can override any subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Ground baseline; everything stands on or above it
    pub ground_y: f32,
    /// Width of the visible viewport, used for camera framing
    pub view_width: f32,

    // === Player ===
    pub player_radius: f32,
    pub player_spawn_x: f32,
    /// Spawn height above the ground baseline
    pub player_spawn_height: f32,
    /// Horizontal speed cap while not on the rope
    pub player_max_speed: f32,
    pub player_air_accel: f32,
    /// Upward velocity applied on jump (positive number, applied as -y)
    pub jump_speed: f32,

    // === Rope ===
    pub min_rope_length: f32,
    pub max_rope_length: f32,
    /// Tangential acceleration while pumping on the rope
    pub rope_pump_accel: f32,

    // === Collision ===
    /// Thickness of the band below a roof line that still counts as landing
    pub roof_landing_band: f32,

    // === Combat ===
    pub bolt_speed: f32,
    pub bolt_cooldown_ms: f64,
    pub bolt_lifetime: f32,
    pub bolt_radius: f32,

    // === Enemies ===
    pub enemy_speed: f32,
    pub enemy_width: f32,
    pub enemy_height: f32,

    // === World generation ===
    pub building_count: usize,
    pub first_building_x: f32,
    /// Chance a building gets any enemies at all
    pub enemy_spawn_chance: f64,

    // === Camera ===
    /// Fraction of the viewport kept ahead of the player
    pub camera_lead: f32,
    /// Per-tick interpolation factor toward the camera target
    pub camera_stiffness: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 2200.0,
            ground_y: 680.0,
            view_width: 1280.0,

            player_radius: 14.0,
            player_spawn_x: 120.0,
            player_spawn_height: 340.0,
            player_max_speed: 1600.0,
            player_air_accel: 2000.0,
            jump_speed: 680.0,

            min_rope_length: 80.0,
            max_rope_length: 520.0,
            rope_pump_accel: 1800.0,

            roof_landing_band: 24.0,

            bolt_speed: 1400.0,
            bolt_cooldown_ms: 250.0,
            bolt_lifetime: 1.2,
            bolt_radius: 4.0,

            enemy_speed: 80.0,
            enemy_width: 18.0,
            enemy_height: 26.0,

            building_count: 8,
            first_building_x: 80.0,
            enemy_spawn_chance: 0.7,

            camera_lead: 0.35,
            camera_stiffness: 0.12,
        }
    }
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON tuning document
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning file from disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Load a tuning file, falling back to defaults on any error
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: impl AsRef<std::path::Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("player_radius", self.player_radius),
            ("min_rope_length", self.min_rope_length),
            ("max_rope_length", self.max_rope_length),
            ("bolt_speed", self.bolt_speed),
            ("bolt_lifetime", self.bolt_lifetime),
            ("bolt_radius", self.bolt_radius),
            ("enemy_width", self.enemy_width),
            ("enemy_height", self.enemy_height),
            ("view_width", self.view_width),
            ("roof_landing_band", self.roof_landing_band),
            ("player_max_speed", self.player_max_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("player_air_accel", self.player_air_accel),
            ("jump_speed", self.jump_speed),
            ("rope_pump_accel", self.rope_pump_accel),
            ("enemy_speed", self.enemy_speed),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::Invalid(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        let finite = [
            ("gravity", self.gravity),
            ("ground_y", self.ground_y),
            ("player_spawn_x", self.player_spawn_x),
            ("player_spawn_height", self.player_spawn_height),
            ("first_building_x", self.first_building_x),
            ("camera_lead", self.camera_lead),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(TuningError::Invalid(format!("{name} must be finite, got {value}")));
            }
        }

        if self.min_rope_length > self.max_rope_length {
            return Err(TuningError::Invalid(format!(
                "min_rope_length ({}) exceeds max_rope_length ({})",
                self.min_rope_length, self.max_rope_length
            )));
        }
        if !(0.0..=1.0).contains(&self.enemy_spawn_chance) {
            return Err(TuningError::Invalid(format!(
                "enemy_spawn_chance must be in [0, 1], got {}",
                self.enemy_spawn_chance
            )));
        }
        if !(self.camera_stiffness > 0.0 && self.camera_stiffness <= 1.0) {
            return Err(TuningError::Invalid(format!(
                "camera_stiffness must be in (0, 1], got {}",
                self.camera_stiffness
            )));
        }
        if !(self.bolt_cooldown_ms.is_finite() && self.bolt_cooldown_ms >= 0.0) {
            return Err(TuningError::Invalid("bolt_cooldown_ms must not be negative".into()));
        }
        if self.building_count > MAX_BUILDINGS {
            return Err(TuningError::Invalid(format!(
                "building_count must be at most {MAX_BUILDINGS}, got {}",
                self.building_count
            )));
        }
        Ok(())
    }

    /// Clamp a rope length into the allowed range
    #[inline]
    pub fn clamp_rope_length(&self, length: f32) -> f32 {
        length.clamp(self.min_rope_length, self.max_rope_length)
    }
}
