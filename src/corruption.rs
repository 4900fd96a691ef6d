//! Hazard-driven physics corruption.
//!
//! Proximity to hazards raises a scalar level in `[0, 1]`; the level drives
//! three oscillating multipliers for gravity, friction and inertia. Given the
//! same sequence of `dt` values and hazard positions the output is identical.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::config::CorruptionConfig;
use crate::types::Hazard;

// Oscillator frequencies, cycles per unit of phase.
const GRAVITY_FREQ: f32 = 2.3;
const FRICTION_FREQ: f32 = 3.7;
const INERTIA_FREQ: f32 = 5.1;

/// Scales applied to the actor's physics constants.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhysicsMultipliers {
    pub gravity: f32,
    pub friction: f32,
    pub inertia: f32,
}

impl PhysicsMultipliers {
    pub const IDENTITY: Self = Self {
        gravity: 1.0,
        friction: 1.0,
        inertia: 1.0,
    };
}

impl Default for PhysicsMultipliers {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Map of sin onto `[0, 1]`.
#[inline]
fn wave(phase: f32, freq: f32) -> f32 {
    ((phase * freq * TAU).sin() + 1.0) * 0.5
}

/// Multipliers for `level` at `phase`. Exactly identity at or below the
/// threshold.
pub fn multipliers(level: f32, phase: f32, cfg: &CorruptionConfig) -> PhysicsMultipliers {
    if level <= cfg.threshold {
        return PhysicsMultipliers::IDENTITY;
    }
    let c = level.clamp(0.0, 1.0);
    PhysicsMultipliers {
        gravity: 1.0 - cfg.gravity_swing * c * wave(phase, GRAVITY_FREQ),
        friction: 1.0 - cfg.friction_swing * c * wave(phase, FRICTION_FREQ),
        inertia: 1.0 + cfg.inertia_swing * c * wave(phase, INERTIA_FREQ),
    }
}

/// Strongest hazard contribution at `point`, clamped to `[0, 1]`.
pub fn target_level(point: Vec2, hazards: &[Hazard]) -> f32 {
    hazards
        .iter()
        .map(|h| h.influence_at(point))
        .fold(0.0, f32::max)
        .clamp(0.0, 1.0)
}

#[derive(Clone, Debug, PartialEq)]
pub struct CorruptionState {
    pub level: f32,
    pub target: f32,
    /// Monotonic oscillator clock.
    pub phase: f32,
    pub multipliers: PhysicsMultipliers,
}

impl Default for CorruptionState {
    fn default() -> Self {
        Self {
            level: 0.0,
            target: 0.0,
            phase: 0.0,
            multipliers: PhysicsMultipliers::IDENTITY,
        }
    }
}

impl CorruptionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, cfg: &CorruptionConfig) -> bool {
        self.level > cfg.threshold
    }

    /// Ease toward the hazard target seen from `center` and refresh the
    /// multipliers for the next physics step.
    pub fn update(&mut self, center: Vec2, hazards: &[Hazard], dt: f32, cfg: &CorruptionConfig) {
        let dt = dt.max(0.0);
        let was_active = self.is_active(cfg);

        self.target = target_level(center, hazards);
        let rate = if self.target > self.level {
            cfg.rise_rate
        } else {
            cfg.fall_rate
        };
        let t = (rate * dt).min(1.0);
        self.level = (self.level + (self.target - self.level) * t).clamp(0.0, 1.0);
        self.phase += dt * cfg.phase_rate;
        self.multipliers = multipliers(self.level, self.phase, cfg);

        let active = self.is_active(cfg);
        if active && !was_active {
            log::debug!(
                "physics corruption engaged (level {:.2}, target {:.2})",
                self.level,
                self.target
            );
        } else if was_active && !active {
            log::debug!("physics corruption cleared");
        }
    }

    /// Drop back to normal physics immediately. The phase clock keeps its value.
    pub fn reset(&mut self) {
        self.level = 0.0;
        self.target = 0.0;
        self.multipliers = PhysicsMultipliers::IDENTITY;
    }
}
