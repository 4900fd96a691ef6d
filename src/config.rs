//! Tuning constants for actor movement and physics corruption.
//!
//! Values are pixels and seconds, y grows downward. Every field has a default
//! so a TOML file only needs the keys it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration file layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub actor: ActorConfig,
    pub corruption: CorruptionConfig,
}

impl CoreConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: CoreConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::info!("loaded movement config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.actor.validate()?;
        self.corruption.validate()
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("must be > 0, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("must be >= 0, got {value}")))
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("must be in [0, 1], got {value}")))
    }
}

/// Movement and ability tuning for one actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    // ========================================================================
    // Dimensions (unscaled sprite pixels)
    // ========================================================================
    pub sprite_width: f32,
    pub sprite_height: f32,
    pub hitbox_width: f32,
    pub hitbox_height: f32,
    /// Hitbox inset from the sprite's top-left.
    pub hitbox_offset_x: f32,
    pub hitbox_offset_y: f32,
    /// Uniform scale applied to sprite and hitbox.
    pub scale: f32,

    // ========================================================================
    // Simulation
    // ========================================================================
    /// Largest elapsed time a single tick may integrate.
    pub max_delta: f32,
    /// Downward acceleration (px/s²).
    pub gravity: f32,

    // ========================================================================
    // Running
    // ========================================================================
    pub max_speed: f32,
    /// Base deceleration when no direction is held (px/s²).
    pub deceleration: f32,
    pub ground_decel_factor: f32,
    pub wall_decel_factor: f32,
    /// Air control is preserved by decelerating far less while airborne.
    pub air_decel_factor: f32,
    /// Horizontal speeds below this snap to zero.
    pub stop_speed: f32,
    /// Analog stick values under this are ignored.
    pub analog_dead_zone: f32,
    pub slip_duration: f32,

    // ========================================================================
    // Jumping
    // ========================================================================
    pub jump_power: f32,
    pub jump_buffer_time: f32,
    pub coyote_time: f32,
    /// Releasing jump above this upward speed halves it.
    pub jump_cut_speed: f32,
    pub double_jump_enabled: bool,
    /// Double-jump power as a fraction of `jump_power`.
    pub double_jump_factor: f32,
    /// Attack lockout after touching down.
    pub landing_lockout: f32,

    // ========================================================================
    // Walls
    // ========================================================================
    /// How far to each side the wall-adjacency probe reaches.
    pub wall_probe_distance: f32,
    pub wall_slide_speed: f32,
    pub wall_slide_gravity_factor: f32,
    pub wall_jump_power: f32,
    pub wall_jump_horizontal: f32,
    /// Horizontal input is ignored for this long after a wall jump.
    pub wall_jump_time: f32,
    pub wall_climb_speed: f32,
    /// Seconds a wall can be held before the grip gives out.
    pub wall_grab_stamina: f32,

    // ========================================================================
    // Roll / slide
    // ========================================================================
    pub roll_duration: f32,
    pub roll_speed: f32,
    /// Per-tick velocity retention while sliding on the ground.
    pub roll_friction: f32,
    pub roll_min_speed: f32,
    /// Holding roll on the ground keeps the timer at this fraction of `roll_duration`.
    pub roll_hold_fraction: f32,

    // ========================================================================
    // Dash
    // ========================================================================
    pub dash_speed: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,

    // ========================================================================
    // Combat
    // ========================================================================
    pub max_health: i32,
    pub invulnerability_time: f32,
    pub attack_duration: f32,
    pub attack_cooldown: f32,
    pub attack_range: f32,
    pub attack_damage: i32,
    pub combo_window: f32,
    pub max_combo: u32,
    /// Forward push when attacking on the ground.
    pub attack_ground_impulse: f32,
    /// Downward push for an airborne combo finisher.
    pub attack_air_finisher_impulse: f32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            sprite_width: 50.0,
            sprite_height: 37.0,
            hitbox_width: 18.0,
            hitbox_height: 30.0,
            hitbox_offset_x: 16.0,
            hitbox_offset_y: 10.0,
            scale: 1.0,

            max_delta: 0.05,
            gravity: 1400.0,

            max_speed: 250.0,
            deceleration: 3500.0,
            ground_decel_factor: 2.8,
            wall_decel_factor: 0.7,
            air_decel_factor: 0.15,
            stop_speed: 15.0,
            analog_dead_zone: 0.2,
            slip_duration: 0.4,

            jump_power: 650.0,
            jump_buffer_time: 0.1,
            coyote_time: 0.15,
            jump_cut_speed: 100.0,
            double_jump_enabled: true,
            double_jump_factor: 0.85,
            landing_lockout: 0.15,

            wall_probe_distance: 5.0,
            wall_slide_speed: 120.0,
            wall_slide_gravity_factor: 0.3,
            wall_jump_power: 550.0,
            wall_jump_horizontal: 320.0,
            wall_jump_time: 0.15,
            wall_climb_speed: 200.0,
            wall_grab_stamina: 3.0,

            roll_duration: 0.4,
            roll_speed: 400.0,
            roll_friction: 0.95,
            roll_min_speed: 50.0,
            roll_hold_fraction: 0.6,

            dash_speed: 450.0,
            dash_duration: 0.2,
            dash_cooldown: 0.8,

            max_health: 5,
            invulnerability_time: 1.0,
            attack_duration: 0.3,
            attack_cooldown: 0.4,
            attack_range: 60.0,
            attack_damage: 1,
            combo_window: 1.2,
            max_combo: 3,
            attack_ground_impulse: 100.0,
            attack_air_finisher_impulse: 200.0,
        }
    }
}

impl ActorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("actor.scale", self.scale)?;
        positive("actor.hitbox_width", self.hitbox_width)?;
        positive("actor.hitbox_height", self.hitbox_height)?;
        positive("actor.max_delta", self.max_delta)?;
        positive("actor.max_speed", self.max_speed)?;
        non_negative("actor.gravity", self.gravity)?;
        non_negative("actor.deceleration", self.deceleration)?;
        non_negative("actor.jump_buffer_time", self.jump_buffer_time)?;
        non_negative("actor.coyote_time", self.coyote_time)?;
        non_negative("actor.wall_grab_stamina", self.wall_grab_stamina)?;
        non_negative("actor.roll_duration", self.roll_duration)?;
        non_negative("actor.dash_duration", self.dash_duration)?;
        unit("actor.analog_dead_zone", self.analog_dead_zone)?;
        unit("actor.roll_friction", self.roll_friction)?;
        unit("actor.roll_hold_fraction", self.roll_hold_fraction)?;
        if self.max_combo == 0 {
            return Err(invalid("actor.max_combo", "must be at least 1"));
        }
        if self.max_health <= 0 {
            let reason = format!("must be > 0, got {}", self.max_health);
            return Err(invalid("actor.max_health", reason));
        }
        Ok(())
    }
}

/// Hazard-driven physics distortion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorruptionConfig {
    /// At or below this level every multiplier is exactly 1.
    pub threshold: f32,
    /// Easing rate toward a higher target (1/s).
    pub rise_rate: f32,
    /// Easing rate toward a lower target (1/s); slower so corruption lingers.
    pub fall_rate: f32,
    /// Phase advance per second.
    pub phase_rate: f32,
    /// Gravity ranges over `[1 − gravity_swing·c, 1]`.
    pub gravity_swing: f32,
    /// Friction ranges over `[1 − friction_swing·c, 1]`.
    pub friction_swing: f32,
    /// Inertia ranges over `[1, 1 + inertia_swing·c]`.
    pub inertia_swing: f32,
}

impl Default for CorruptionConfig {
    fn default() -> Self {
        Self {
            threshold: 0.05,
            rise_rate: 6.0,
            fall_rate: 1.0,
            phase_rate: 1.0,
            gravity_swing: 1.5,
            friction_swing: 0.95,
            inertia_swing: 2.0,
        }
    }
}

impl CorruptionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        unit("corruption.threshold", self.threshold)?;
        positive("corruption.rise_rate", self.rise_rate)?;
        positive("corruption.fall_rate", self.fall_rate)?;
        non_negative("corruption.phase_rate", self.phase_rate)?;
        non_negative("corruption.gravity_swing", self.gravity_swing)?;
        unit("corruption.friction_swing", self.friction_swing)?;
        non_negative("corruption.inertia_swing", self.inertia_swing)
    }
}
