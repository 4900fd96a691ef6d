use glam::Vec2;

use crate::api::{Collider, CollisionApi};
use crate::collision::CollisionSystem;
use crate::types::{Contacts, Rect};

/// A box that walks, falls and stops at walls. For patrol enemies and props
/// that need the player's collision rules without the ability set.
#[derive(Clone, Debug, PartialEq)]
pub struct SimpleBody {
    pub bounds: Rect,
    pub velocity: Vec2,
    /// Downward acceleration; 0 for flying bodies.
    pub gravity: f32,
    pub on_ground: bool,
    /// Contacts from the last step.
    pub contacts: Contacts,
}

impl SimpleBody {
    pub fn new(bounds: Rect, gravity: f32) -> Self {
        Self {
            bounds,
            velocity: Vec2::ZERO,
            gravity,
            on_ground: false,
            contacts: Contacts::default(),
        }
    }

    /// Integrate gravity, then move X and Y one after the other.
    ///
    /// X is all-or-nothing: a blocked horizontal move keeps the old X and
    /// zeroes `velocity.x`. Y lands exactly on the surface below.
    pub fn step(&mut self, dt: f32, collision: &CollisionSystem<'_>) -> Contacts {
        if !self.on_ground {
            self.velocity.y += self.gravity * dt;
        }
        let delta = self.velocity * dt;
        let mut contacts = Contacts::default();

        let from = self.bounds;
        let moved = collision.check_movement(&from, &from.translated(Vec2::new(delta.x, 0.0)));
        if !moved.moved {
            contacts.wall = true;
        }
        self.bounds.pos = moved.pos;

        let from = self.bounds;
        let down = from.pos + Vec2::new(0.0, delta.y);
        let vertical = collision.advanced_movement(from.pos, down, from.size);
        self.bounds.pos = vertical.adjusted;
        contacts.ground = vertical.collision_y && delta.y > 0.0;
        contacts.ceiling = vertical.collision_y && delta.y < 0.0;

        self.on_collision(contacts);
        self.on_ground = collision.ground_probe(&self.bounds);
        contacts
    }
}

impl Collider for SimpleBody {
    fn collision_box(&self) -> Rect {
        self.bounds
    }

    fn set_box_position(&mut self, pos: Vec2) {
        self.bounds.pos = pos;
    }

    fn on_collision(&mut self, contacts: Contacts) {
        self.contacts = contacts;
        if contacts.wall {
            self.velocity.x = 0.0;
        }
        if contacts.ground || contacts.ceiling {
            self.velocity.y = 0.0;
        }
    }
}
