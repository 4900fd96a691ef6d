use glam::Vec2;

use crate::types::*;

/// Public movement-resolution contract shared by the player and simpler bodies.
///
/// Every query is synchronous and bounded. None of them fail: with no level
/// loaded they report "no collision" and leave positions unchanged.
pub trait CollisionApi {
    // --- Overlap -----------------------------------------------------------

    /// True iff `rect` intersects any shape (shared edges do not count).
    fn point_overlap(&self, rect: &Rect) -> bool;

    /// 1-pixel probe directly below `rect`.
    fn ground_probe(&self, rect: &Rect) -> bool;

    // --- Movement ----------------------------------------------------------

    /// Whole-box gate: accept `to` if it is free, otherwise stay at `from`.
    fn check_movement(&self, from: &Rect, to: &Rect) -> MoveCheck;

    /// Axis-separated resolution with exact landing on the highest surface.
    fn advanced_movement(&self, from: Vec2, to: Vec2, size: Vec2) -> MoveResolution;

    /// Advanced resolution with a horizontal-only then vertical-only fallback.
    fn slide_movement(&self, from: &Rect, to: &Rect) -> MoveResolution;

    // --- Recovery ----------------------------------------------------------

    /// Bounded search for a nearby position where `rect` overlaps nothing.
    fn find_safe_position(&self, rect: &Rect) -> SafePosition;
}

/// Rectangle primitive tests.
pub trait NarrowphaseApi {
    fn overlap_rect_rect(a: &Rect, b: &Rect) -> bool;
    fn overlap_point_rect(p: Vec2, r: &Rect) -> bool;

    /// X that places `mover` flush against `obstacle` when travelling along
    /// `dir_x` (sign only). `None` when `dir_x` is zero.
    fn flush_x(mover: &Rect, obstacle: &Rect, dir_x: f32) -> Option<f32>;
}

/// Decides which tile ids produce collision shapes.
pub trait TileClassifier {
    fn is_solid(&self, tile_id: u32) -> bool;
}

impl<F> TileClassifier for F
where
    F: Fn(u32) -> bool,
{
    fn is_solid(&self, tile_id: u32) -> bool {
        self(tile_id)
    }
}

/// Anything that can be moved through the collision system by box.
pub trait Collider {
    /// Current collision box in world pixels.
    fn collision_box(&self) -> Rect;

    /// Place the collision box's top-left at `pos`.
    fn set_box_position(&mut self, pos: Vec2);

    /// Called after a move that touched geometry.
    fn on_collision(&mut self, contacts: Contacts);
}
