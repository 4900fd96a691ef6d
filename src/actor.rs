//! Player physics and the parkour ability state machine.
//!
//! One [`Actor::step`] per simulation tick. The tick runs in a fixed order:
//!
//! 1. clamp `dt`, advance timers and run their expiry handling
//! 2. refresh wall adjacency, start attacks, dashes and rolls
//! 3. horizontal input (or roll / dash locomotion)
//! 4. jump resolution from the buffer: wall, then ground or coyote, then double
//! 5. jump cut and gravity
//! 6. collision resolution, landing, ground probe, coyote start
//!
//! Corruption multipliers are refreshed separately by
//! [`Actor::update_corruption`] and take effect on the following step.

use bitflags::bitflags;
use glam::Vec2;

use crate::api::{Collider, CollisionApi, NarrowphaseApi};
use crate::collision::CollisionSystem;
use crate::config::{ActorConfig, CoreConfig, CorruptionConfig};
use crate::corruption::{CorruptionState, PhysicsMultipliers};
use crate::input::ActorInput;
use crate::narrowphase::Narrowphase;
use crate::timers::{Timer, TimerSet, Timers};
use crate::types::{Contacts, Facing, Hazard, Rect};

// Landing friction bands keyed by impact speed.
const HARD_LANDING: f32 = 400.0;
const MEDIUM_LANDING: f32 = 250.0;
const SOFT_LANDING: f32 = 150.0;

// Ground deceleration scales with speed up to this cap, normalised by `DECEL_SPEED_SCALE`.
const DECEL_SPEED_SCALE: f32 = 150.0;
const DECEL_SPEED_CAP: f32 = 2.0;

const ROLL_STEER: f32 = 0.3;
const ROLL_REVERSE_BLEED: f32 = 0.8;
const HEAD_BUMP_BLEED: f32 = 0.8;

bitflags! {
    /// Observable actor state, for animation and gameplay checks.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct ActorFlags: u16 {
        const ON_GROUND = 1 << 0;
        const ON_WALL_LEFT = 1 << 1;
        const ON_WALL_RIGHT = 1 << 2;
        const ROLLING = 1 << 3;
        const WALL_CLIMBING = 1 << 4;
        const DASHING = 1 << 5;
        const ATTACKING = 1 << 6;
        const DOUBLE_JUMP_USED = 1 << 7;
        /// Wall grab stamina is available; lost when it runs out, restored on landing.
        const CAN_WALL_GRAB = 1 << 8;
        const SLIPPING = 1 << 9;
        const DEAD = 1 << 10;

        const ON_WALL = Self::ON_WALL_LEFT.bits() | Self::ON_WALL_RIGHT.bits();
    }
}

/// The player character.
#[derive(Clone, Debug)]
pub struct Actor {
    /// Top-left of the sprite in world pixels.
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Facing,
    flags: ActorFlags,
    timers: Timers,
    combo: u32,
    health: i32,
    speed_multiplier: f32,
    corruption: CorruptionState,
    config: ActorConfig,
    corruption_config: CorruptionConfig,
}

impl Actor {
    pub fn new(position: Vec2) -> Self {
        Self::with_config(position, CoreConfig::default())
    }

    pub fn with_config(position: Vec2, config: CoreConfig) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            facing: Facing::Right,
            flags: ActorFlags::CAN_WALL_GRAB,
            timers: Timers::new(),
            combo: 0,
            health: config.actor.max_health,
            speed_multiplier: 1.0,
            corruption: CorruptionState::new(),
            config: config.actor,
            corruption_config: config.corruption,
        }
    }

    // --- Accessors ----------------------------------------------------------

    pub fn config(&self) -> &ActorConfig {
        &self.config
    }

    pub fn flags(&self) -> ActorFlags {
        self.flags
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn on_ground(&self) -> bool {
        self.flags.contains(ActorFlags::ON_GROUND)
    }

    pub fn on_wall(&self) -> bool {
        self.flags.intersects(ActorFlags::ON_WALL)
    }

    pub fn is_rolling(&self) -> bool {
        self.flags.contains(ActorFlags::ROLLING)
    }

    pub fn is_dashing(&self) -> bool {
        self.flags.contains(ActorFlags::DASHING)
    }

    pub fn is_wall_climbing(&self) -> bool {
        self.flags.contains(ActorFlags::WALL_CLIMBING)
    }

    pub fn is_attacking(&self) -> bool {
        self.flags.contains(ActorFlags::ATTACKING)
    }

    pub fn is_dead(&self) -> bool {
        self.flags.contains(ActorFlags::DEAD)
    }

    pub fn is_invulnerable(&self) -> bool {
        self.timers.active(Timer::Invulnerability)
    }

    /// Wall sliding: airborne, wall-adjacent, moving down and not climbing.
    pub fn is_wall_sliding(&self) -> bool {
        !self.on_ground() && self.on_wall() && !self.is_wall_climbing() && self.velocity.y > 0.0
    }

    pub fn combo_count(&self) -> u32 {
        self.combo
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    pub fn corruption(&self) -> &CorruptionState {
        &self.corruption
    }

    pub fn multipliers(&self) -> PhysicsMultipliers {
        self.corruption.multipliers
    }

    /// Hitbox offset from the sprite's top-left, scaled.
    fn hitbox_offset(&self) -> Vec2 {
        Vec2::new(self.config.hitbox_offset_x, self.config.hitbox_offset_y) * self.config.scale
    }

    fn hitbox_size(&self) -> Vec2 {
        Vec2::new(self.config.hitbox_width, self.config.hitbox_height) * self.config.scale
    }

    /// Scaled sprite bounds.
    pub fn sprite_bounds(&self) -> Rect {
        let cfg = &self.config;
        let size = Vec2::new(cfg.sprite_width, cfg.sprite_height) * cfg.scale;
        Rect::from_pos_size(self.position, size)
    }

    // --- Simulation ---------------------------------------------------------

    /// Advance one tick. `dt` is clamped to `max_delta`.
    pub fn step(&mut self, dt: f32, input: &ActorInput, collision: &CollisionSystem<'_>) {
        let dt = dt.min(self.config.max_delta);
        if dt <= 0.0 {
            return;
        }
        let input = if self.is_dead() {
            ActorInput::default()
        } else {
            *input
        };

        let expired = self.timers.tick(dt);
        self.on_timers_expired(expired);

        self.detect_walls(collision);

        if input.jump_pressed {
            self.timers.set(Timer::JumpBuffer, self.config.jump_buffer_time);
        }
        if input.attack_pressed {
            self.try_attack();
        }
        if input.dash_pressed {
            self.try_dash();
        }
        if input.roll_pressed && self.on_ground() && !self.is_rolling() && !self.is_dashing() {
            self.start_roll();
        }

        if self.is_rolling() {
            self.update_roll(&input);
        } else if !self.is_dashing() {
            self.apply_horizontal_input(&input, dt);
            self.resolve_jump(&input);
        }

        self.apply_gravity(&input, dt);
        self.resolve_movement(dt, collision);
    }

    /// [`Actor::step`] followed by [`Actor::update_corruption`].
    pub fn tick(
        &mut self,
        dt: f32,
        input: &ActorInput,
        collision: &CollisionSystem<'_>,
        hazards: &[Hazard],
    ) {
        self.step(dt, input, collision);
        self.update_corruption(hazards, dt);
    }

    /// Recompute the corruption level from hazards around the hitbox centre.
    pub fn update_corruption(&mut self, hazards: &[Hazard], dt: f32) {
        let dt = dt.min(self.config.max_delta);
        let center = self.collision_box().center();
        self.corruption.update(center, hazards, dt, &self.corruption_config);
    }

    fn on_timers_expired(&mut self, expired: TimerSet) {
        for timer in expired.timers() {
            match timer {
                Timer::Roll => self.flags.remove(ActorFlags::ROLLING),
                Timer::Attack => self.flags.remove(ActorFlags::ATTACKING),
                Timer::Combo => self.combo = 0,
                Timer::WallGrab => {
                    log::debug!("wall grab stamina exhausted");
                    self.flags.remove(ActorFlags::WALL_CLIMBING | ActorFlags::CAN_WALL_GRAB);
                }
                Timer::Slip => self.flags.remove(ActorFlags::SLIPPING),
                Timer::Dash => self.flags.remove(ActorFlags::DASHING),
                Timer::Slowdown => self.speed_multiplier = 1.0,
                _ => {}
            }
        }
    }

    fn detect_walls(&mut self, collision: &CollisionSystem<'_>) {
        self.flags.remove(ActorFlags::ON_WALL);
        if self.on_ground() {
            return;
        }
        let reach = self.config.wall_probe_distance;
        let (left, right) = collision.wall_contact(&self.collision_box(), reach);
        self.flags.set(ActorFlags::ON_WALL_LEFT, left);
        self.flags.set(ActorFlags::ON_WALL_RIGHT, right);
    }

    /// -1 for a wall on the left, 1 on the right, 0 when free.
    fn wall_side(&self) -> f32 {
        if self.flags.contains(ActorFlags::ON_WALL_LEFT) {
            -1.0
        } else if self.flags.contains(ActorFlags::ON_WALL_RIGHT) {
            1.0
        } else {
            0.0
        }
    }

    fn apply_horizontal_input(&mut self, input: &ActorInput, dt: f32) {
        if self.timers.active(Timer::WallJump) {
            return;
        }
        let cfg = &self.config;
        let mult = self.corruption.multipliers;
        let intensity = input.horizontal(cfg.analog_dead_zone);

        if intensity != 0.0 {
            self.velocity.x = cfg.max_speed * intensity * self.speed_multiplier * mult.inertia;
            self.facing = Facing::from_sign(intensity);
            return;
        }

        let speed = self.velocity.x.abs();
        let mut decel = if self.on_ground() {
            let scale = (speed / DECEL_SPEED_SCALE).min(DECEL_SPEED_CAP);
            let mut d = cfg.deceleration * cfg.ground_decel_factor * scale;
            let slick_spot = (self.position.x + self.position.y).rem_euclid(100.0) < 10.0;
            if speed > cfg.max_speed * 1.2 && slick_spot {
                d *= 0.1;
                if !self.flags.contains(ActorFlags::SLIPPING) {
                    self.flags.insert(ActorFlags::SLIPPING);
                    self.timers.set(Timer::Slip, cfg.slip_duration);
                }
            }
            if speed > cfg.max_speed * 1.5 {
                d *= 0.6;
            }
            d
        } else if self.on_wall() {
            cfg.deceleration * cfg.wall_decel_factor
        } else {
            cfg.deceleration * cfg.air_decel_factor
        };
        decel *= dt * mult.friction;

        if self.velocity.x > decel {
            self.velocity.x -= decel;
        } else if self.velocity.x < -decel {
            self.velocity.x += decel;
        } else {
            self.velocity.x = 0.0;
        }
        if self.velocity.x.abs() < cfg.stop_speed {
            self.velocity.x = 0.0;
        }
    }

    fn resolve_jump(&mut self, input: &ActorInput) {
        if !self.timers.active(Timer::JumpBuffer) {
            return;
        }
        let side = self.wall_side();

        if side != 0.0 && !self.on_ground() && self.flags.contains(ActorFlags::CAN_WALL_GRAB) {
            if input.holds_toward(side, self.config.analog_dead_zone) {
                self.flags.insert(ActorFlags::WALL_CLIMBING);
                self.timers.set(Timer::WallGrab, self.config.wall_grab_stamina);
                self.velocity.y = -self.config.wall_climb_speed;
            } else {
                self.velocity.x = -side * self.config.wall_jump_horizontal;
                self.velocity.y = -self.config.wall_jump_power;
                self.facing = Facing::from_sign(-side);
                self.timers.set(Timer::WallJump, self.config.wall_jump_time);
            }
            self.timers.clear(Timer::JumpBuffer);
            self.flags.remove(ActorFlags::DOUBLE_JUMP_USED);
        } else if self.on_ground() || self.timers.active(Timer::Coyote) {
            self.ground_jump();
        } else if self.config.double_jump_enabled
            && !self.flags.contains(ActorFlags::DOUBLE_JUMP_USED)
        {
            self.velocity.y = -self.config.jump_power * self.config.double_jump_factor;
            self.flags.insert(ActorFlags::DOUBLE_JUMP_USED);
            self.timers.clear(Timer::JumpBuffer);
        }
    }

    fn ground_jump(&mut self) {
        self.velocity.y = -self.config.jump_power;
        self.flags.remove(ActorFlags::ON_GROUND | ActorFlags::DOUBLE_JUMP_USED);
        self.timers.clear(Timer::JumpBuffer);
        self.timers.clear(Timer::Coyote);
    }

    fn start_roll(&mut self) {
        let speed = self.config.roll_speed.max(self.velocity.x.abs());
        self.velocity.x = speed * self.facing.sign();
        self.flags.insert(ActorFlags::ROLLING);
        self.timers.set(Timer::Roll, self.config.roll_duration);
    }

    fn update_roll(&mut self, input: &ActorInput) {
        let cfg = &self.config;
        if input.roll_held && self.on_ground() {
            self.timers.set(Timer::Roll, cfg.roll_duration * cfg.roll_hold_fraction);
        }
        if self.on_ground() {
            self.velocity.x *= cfg.roll_friction;
        }

        let intensity = input.horizontal(cfg.analog_dead_zone);
        if intensity != 0.0 {
            let steer = intensity.signum();
            let limit = cfg.roll_speed;
            if self.velocity.x * steer < 0.0 {
                self.velocity.x *= ROLL_REVERSE_BLEED;
            }
            if self.velocity.x * steer < limit * 0.5 {
                self.velocity.x = steer * (self.velocity.x * steer + limit * ROLL_STEER).min(limit);
            }
            self.facing = Facing::from_sign(steer);
        }

        let too_slow = self.velocity.x.abs() < cfg.roll_min_speed;
        if !self.timers.active(Timer::Roll) || !self.on_ground() || too_slow {
            self.end_roll();
        }
    }

    fn end_roll(&mut self) {
        self.flags.remove(ActorFlags::ROLLING);
        self.timers.clear(Timer::Roll);
    }

    fn try_dash(&mut self) {
        if self.is_rolling() || self.is_dashing() || self.timers.active(Timer::DashCooldown) {
            return;
        }
        self.velocity = Vec2::new(self.config.dash_speed * self.facing.sign(), 0.0);
        self.flags.insert(ActorFlags::DASHING);
        self.flags.remove(ActorFlags::WALL_CLIMBING);
        self.timers.set(Timer::Dash, self.config.dash_duration);
        self.timers.set(Timer::DashCooldown, self.config.dash_cooldown);
    }

    fn try_attack(&mut self) {
        let landing_lockout = self.on_ground() && self.timers.active(Timer::GroundLanding);
        let cooling_down = self.timers.active(Timer::AttackCooldown);
        if self.is_attacking() || self.is_rolling() || landing_lockout || cooling_down {
            return;
        }
        let cfg = &self.config;
        self.flags.insert(ActorFlags::ATTACKING);
        self.timers.set(Timer::Attack, cfg.attack_duration);
        self.timers.set(Timer::AttackCooldown, cfg.attack_cooldown);

        self.combo = if self.timers.active(Timer::Combo) {
            (self.combo + 1).min(cfg.max_combo)
        } else {
            1
        };
        self.timers.set(Timer::Combo, cfg.combo_window);

        if self.on_ground() {
            self.velocity.x += cfg.attack_ground_impulse * self.facing.sign();
        } else if self.combo >= cfg.max_combo {
            self.velocity.y += cfg.attack_air_finisher_impulse;
        }
    }

    fn apply_gravity(&mut self, input: &ActorInput, dt: f32) {
        let cfg = &self.config;
        if self.is_wall_climbing() {
            let side = self.wall_side();
            if side == 0.0 || !input.holds_toward(side, cfg.analog_dead_zone) {
                self.flags.remove(ActorFlags::WALL_CLIMBING);
                self.timers.clear(Timer::WallGrab);
            }
        }

        if self.velocity.y < -cfg.jump_cut_speed && !input.jump_held && !self.is_wall_climbing() {
            self.velocity.y *= 0.5;
        }

        if self.on_ground() || self.is_wall_climbing() || self.is_dashing() {
            return;
        }
        let gravity = cfg.gravity * self.corruption.multipliers.gravity * dt;
        if self.on_wall() && self.velocity.y > 0.0 {
            let slide = self.velocity.y + gravity * cfg.wall_slide_gravity_factor;
            self.velocity.y = slide.min(cfg.wall_slide_speed);
        } else {
            self.velocity.y += gravity;
        }
    }

    fn resolve_movement(&mut self, dt: f32, collision: &CollisionSystem<'_>) {
        let was_on_ground = self.on_ground();
        let from = self.collision_box();
        let delta = self.velocity * dt;
        let res = collision.advanced_movement(from.pos, from.pos + delta, from.size);
        let mut target = res.adjusted;
        let mut landed = false;

        if res.collision_x {
            target.x = collision.flush_horizontal(&from, delta.x);
            self.velocity.x = 0.0;
        }

        if res.collision_y {
            if delta.y > 0.0 {
                let impact = self.velocity.y;
                self.velocity.y = 0.0;
                if !was_on_ground {
                    self.land(impact);
                    landed = true;
                }
            } else if delta.y < 0.0 {
                self.velocity.y = 0.0;
                self.velocity.x *= HEAD_BUMP_BLEED;
            }
        }

        self.set_box_position(target);
        let grounded = collision.ground_probe(&self.collision_box());
        self.flags.set(ActorFlags::ON_GROUND, grounded);

        if grounded && !was_on_ground {
            // A fall that ends exactly flush with a surface never overlaps it.
            if !landed && self.velocity.y >= 0.0 {
                let impact = self.velocity.y;
                self.velocity.y = 0.0;
                self.land(impact);
            }
            if self.timers.active(Timer::JumpBuffer) && !self.is_rolling() && !self.is_dead() {
                log::debug!("buffered jump consumed on landing");
                self.ground_jump();
            }
        } else if was_on_ground && !grounded && self.velocity.y >= 0.0 {
            self.timers.set(Timer::Coyote, self.config.coyote_time);
        }
    }

    fn land(&mut self, impact: f32) {
        let cfg = &self.config;
        let mut friction = if impact > HARD_LANDING {
            0.6
        } else if impact > MEDIUM_LANDING {
            0.7
        } else if impact > SOFT_LANDING {
            0.8
        } else {
            0.9
        };
        if self.velocity.x.abs() > cfg.max_speed * 1.2 {
            friction = f32::max(friction, 0.8);
        }
        self.velocity.x *= friction;
        self.flags.remove(ActorFlags::DOUBLE_JUMP_USED | ActorFlags::WALL_CLIMBING);
        self.flags.insert(ActorFlags::CAN_WALL_GRAB);
        self.timers.clear(Timer::WallGrab);
        self.timers.set(Timer::GroundLanding, cfg.landing_lockout);
        log::debug!("landed at impact speed {impact:.1}");
    }

    // --- Recovery -----------------------------------------------------------

    /// True when the hitbox currently overlaps solid geometry.
    pub fn is_stuck(&self, collision: &CollisionSystem<'_>) -> bool {
        collision.point_overlap(&self.collision_box())
    }

    /// Move to the nearest free spot. Returns false when the search bound is
    /// exhausted; the caller decides the fallback (usually [`Actor::respawn`]).
    pub fn reset_to_safe_position(&mut self, collision: &CollisionSystem<'_>) -> bool {
        if !self.is_stuck(collision) {
            return true;
        }
        let safe = collision.find_safe_position(&self.collision_box());
        if !safe.found {
            return false;
        }
        self.set_box_position(safe.pos);
        self.velocity = Vec2::ZERO;
        self.flags.remove(ActorFlags::ON_GROUND | ActorFlags::ON_WALL);
        true
    }

    /// Fresh start at `at` (sprite top-left) with full health.
    pub fn respawn(&mut self, at: Vec2) {
        log::info!("actor respawned at ({}, {})", at.x, at.y);
        self.position = at;
        self.velocity = Vec2::ZERO;
        self.flags = ActorFlags::CAN_WALL_GRAB;
        self.timers.clear_all();
        self.combo = 0;
        self.health = self.config.max_health;
        self.speed_multiplier = 1.0;
        self.corruption.reset();
    }

    // --- Health -------------------------------------------------------------

    /// Ignored while invulnerable or dead.
    pub fn take_damage(&mut self, amount: i32) {
        if self.is_invulnerable() || self.is_dead() {
            return;
        }
        self.health -= amount;
        if self.health <= 0 {
            self.health = 0;
            self.flags.insert(ActorFlags::DEAD);
            self.velocity = Vec2::ZERO;
            log::debug!("actor died");
        } else {
            self.timers.set(Timer::Invulnerability, self.config.invulnerability_time);
        }
    }

    pub fn revive(&mut self) {
        self.health = self.config.max_health;
        self.flags.remove(ActorFlags::DEAD);
        self.timers.set(Timer::Invulnerability, self.config.invulnerability_time);
    }

    pub fn apply_slowdown(&mut self, multiplier: f32, duration: f32) {
        self.speed_multiplier = multiplier.max(0.0);
        self.timers.set(Timer::Slowdown, duration);
    }

    // --- Combat -------------------------------------------------------------

    /// Strike area in front of the hitbox; `None` unless attacking.
    pub fn attack_box(&self) -> Option<Rect> {
        if !self.is_attacking() {
            return None;
        }
        let hitbox = self.collision_box();
        let width = self.config.attack_range;
        let height = hitbox.height() * 0.8;
        let x = match self.facing {
            Facing::Right => hitbox.right(),
            Facing::Left => hitbox.x() - width,
        };
        let y = hitbox.y() + (hitbox.height() - height) * 0.5;
        Some(Rect::new(x, y, width, height))
    }

    pub fn attack_hits(&self, target: &Rect) -> bool {
        self.attack_box().is_some_and(|a| Narrowphase::overlap_rect_rect(&a, target))
    }

    /// Base damage plus one per combo step past the first.
    pub fn attack_damage(&self) -> i32 {
        self.config.attack_damage + self.combo.saturating_sub(1) as i32
    }
}

impl Collider for Actor {
    fn collision_box(&self) -> Rect {
        Rect::from_pos_size(self.position + self.hitbox_offset(), self.hitbox_size())
    }

    fn set_box_position(&mut self, pos: Vec2) {
        self.position = pos - self.hitbox_offset();
    }

    fn on_collision(&mut self, contacts: Contacts) {
        if contacts.wall {
            self.velocity.x = 0.0;
        }
        if contacts.ground || contacts.ceiling {
            self.velocity.y = 0.0;
        }
        if contacts.ground {
            self.flags.insert(ActorFlags::ON_GROUND);
        }
    }
}
