//! Named countdown timers for the actor state machine.
//!
//! Every ability timer lives in one table and is advanced by a single
//! [`Timers::tick`] call, which reports the set that crossed zero so the actor
//! can run its expiry handling in one place.

use bitflags::bitflags;

/// Every countdown the actor keeps, in seconds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Timer {
    JumpBuffer,
    Coyote,
    /// Post-landing window; attacks are locked out while it runs.
    GroundLanding,
    Roll,
    Invulnerability,
    Attack,
    AttackCooldown,
    Combo,
    WallGrab,
    Slip,
    WallJump,
    Dash,
    DashCooldown,
    Slowdown,
}

impl Timer {
    pub const ALL: [Timer; 14] = [
        Timer::JumpBuffer,
        Timer::Coyote,
        Timer::GroundLanding,
        Timer::Roll,
        Timer::Invulnerability,
        Timer::Attack,
        Timer::AttackCooldown,
        Timer::Combo,
        Timer::WallGrab,
        Timer::Slip,
        Timer::WallJump,
        Timer::Dash,
        Timer::DashCooldown,
        Timer::Slowdown,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    pub fn flag(self) -> TimerSet {
        TimerSet::from_bits_truncate(1 << self.index())
    }
}

bitflags! {
    /// A set of timers, e.g. those that expired during a tick.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct TimerSet: u16 {
        const JUMP_BUFFER = 1 << 0;
        const COYOTE = 1 << 1;
        const GROUND_LANDING = 1 << 2;
        const ROLL = 1 << 3;
        const INVULNERABILITY = 1 << 4;
        const ATTACK = 1 << 5;
        const ATTACK_COOLDOWN = 1 << 6;
        const COMBO = 1 << 7;
        const WALL_GRAB = 1 << 8;
        const SLIP = 1 << 9;
        const WALL_JUMP = 1 << 10;
        const DASH = 1 << 11;
        const DASH_COOLDOWN = 1 << 12;
        const SLOWDOWN = 1 << 13;
    }
}

impl TimerSet {
    pub fn has(self, timer: Timer) -> bool {
        self.contains(timer.flag())
    }

    /// Timers in this set, in declaration order.
    pub fn timers(self) -> impl Iterator<Item = Timer> {
        Timer::ALL.into_iter().filter(move |t| self.has(*t))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timers {
    remaining: [f32; Timer::ALL.len()],
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) `timer` at `seconds`.
    pub fn set(&mut self, timer: Timer, seconds: f32) {
        self.remaining[timer.index()] = seconds.max(0.0);
    }

    /// Stop `timer` without counting it as expired.
    pub fn clear(&mut self, timer: Timer) {
        self.remaining[timer.index()] = 0.0;
    }

    pub fn clear_all(&mut self) {
        self.remaining = [0.0; Timer::ALL.len()];
    }

    pub fn remaining(&self, timer: Timer) -> f32 {
        self.remaining[timer.index()]
    }

    pub fn active(&self, timer: Timer) -> bool {
        self.remaining[timer.index()] > 0.0
    }

    /// Count every running timer down by `dt`. Returns those that reached zero
    /// on this tick; idle timers never appear.
    pub fn tick(&mut self, dt: f32) -> TimerSet {
        let mut expired = TimerSet::empty();
        for timer in Timer::ALL {
            let slot = &mut self.remaining[timer.index()];
            if *slot <= 0.0 {
                continue;
            }
            *slot -= dt;
            if *slot <= 0.0 {
                *slot = 0.0;
                expired |= timer.flag();
            }
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_match_declaration_order() {
        assert_eq!(Timer::JumpBuffer.flag(), TimerSet::JUMP_BUFFER);
        assert_eq!(Timer::Combo.flag(), TimerSet::COMBO);
        assert_eq!(Timer::Slowdown.flag(), TimerSet::SLOWDOWN);
    }

    #[test]
    fn test_tick_reports_expiry_once() {
        let mut t = Timers::new();
        t.set(Timer::Roll, 0.05);
        t.set(Timer::Combo, 1.0);
        assert!(t.tick(0.02).is_empty());
        let expired = t.tick(0.04);
        assert!(expired.has(Timer::Roll));
        assert!(!expired.has(Timer::Combo));
        assert!(!t.active(Timer::Roll));
        assert_eq!(t.remaining(Timer::Roll), 0.0);
        assert!(t.tick(0.04).is_empty());
        assert!(t.active(Timer::Combo));
    }

    #[test]
    fn test_clear_does_not_expire() {
        let mut t = Timers::new();
        t.set(Timer::WallGrab, 0.1);
        t.clear(Timer::WallGrab);
        assert!(t.tick(1.0).is_empty());
    }

    #[test]
    fn test_expired_iteration() {
        let mut t = Timers::new();
        t.set(Timer::Attack, 0.01);
        t.set(Timer::Dash, 0.01);
        let got: Vec<Timer> = t.tick(0.1).timers().collect();
        assert_eq!(got, vec![Timer::Attack, Timer::Dash]);
    }
}
