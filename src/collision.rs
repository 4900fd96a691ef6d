use glam::Vec2;

use crate::api::{Collider, CollisionApi, NarrowphaseApi};
use crate::narrowphase::Narrowphase;
use crate::space::CollisionSpace;
use crate::types::*;

/// Search directions for [`CollisionApi::find_safe_position`], tried in order
/// at every distance step: up first, then sideways, then down, then diagonals.
const SAFE_OFFSETS: [(f32, f32); 15] = [
    (0.0, -1.0), (0.0, -2.0), (0.0, -3.0), (0.0, -4.0), (0.0, -5.0),
    (-1.0, 0.0), (1.0, 0.0), (-2.0, 0.0), (2.0, 0.0),
    (0.0, 1.0), (0.0, 2.0),
    (-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0),
];
const SAFE_SEARCH_START: f32 = 1.0;
const SAFE_SEARCH_STEP: f32 = 2.0;
const SAFE_SEARCH_MAX: f32 = 64.0;

/// Movement resolution over an optional level.
///
/// Holds a shared borrow of the level's [`CollisionSpace`]. Without one (menus,
/// between levels) every query degrades to "no collision".
#[derive(Copy, Clone, Debug, Default)]
pub struct CollisionSystem<'a> {
    space: Option<&'a CollisionSpace>,
}

impl<'a> CollisionSystem<'a> {
    pub fn new(space: &'a CollisionSpace) -> Self {
        Self { space: Some(space) }
    }

    /// No level attached.
    pub fn detached() -> Self {
        Self { space: None }
    }

    pub fn space(&self) -> Option<&'a CollisionSpace> {
        self.space
    }

    pub fn is_attached(&self) -> bool {
        self.space.is_some()
    }

    /// True if `p` lies strictly inside a shape.
    pub fn solid_at(&self, p: Vec2) -> bool {
        self.space.is_some_and(|s| s.shape_at(p).is_some())
    }

    /// Left/right adjacency: `rect` shifted by `reach` pixels to each side.
    pub fn wall_contact(&self, rect: &Rect, reach: f32) -> (bool, bool) {
        let left = self.point_overlap(&rect.translated(Vec2::new(-reach, 0.0)));
        let right = self.point_overlap(&rect.translated(Vec2::new(reach, 0.0)));
        (left, right)
    }

    /// For a move by `dx` that the horizontal probe rejected, the X at which
    /// `rect` sits flush against the nearest blocking face. Falls back to the
    /// current X when no face lies ahead (already overlapping, or no motion).
    pub fn flush_horizontal(&self, rect: &Rect, dx: f32) -> f32 {
        let Some(space) = self.space else {
            return rect.x();
        };
        let probe = rect.translated(Vec2::new(dx, 0.0));
        let candidates = space
            .overlapping(&probe)
            .filter_map(|s| Narrowphase::flush_x(rect, s, dx));
        let best = if dx > 0.0 {
            candidates.filter(|x| *x >= rect.x()).reduce(f32::min)
        } else {
            candidates.filter(|x| *x <= rect.x()).reduce(f32::max)
        };
        best.unwrap_or(rect.x())
    }

    /// Slide-resolve `obj` by `delta` and report what it touched.
    pub fn move_object<C: Collider + ?Sized>(&self, obj: &mut C, delta: Vec2) -> MoveResolution {
        let current = obj.collision_box();
        let target = current.translated(delta);
        let res = self.slide_movement(&current, &target);
        obj.set_box_position(res.adjusted);
        if res.has_collision {
            obj.on_collision(res.contacts(delta.y));
        }
        res
    }
}

impl CollisionApi for CollisionSystem<'_> {
    fn point_overlap(&self, rect: &Rect) -> bool {
        self.space.is_some_and(|s| s.any_overlap(rect))
    }

    fn ground_probe(&self, rect: &Rect) -> bool {
        let probe = Rect::new(rect.x(), rect.bottom(), rect.width(), 1.0);
        self.point_overlap(&probe)
    }

    fn check_movement(&self, from: &Rect, to: &Rect) -> MoveCheck {
        if self.point_overlap(to) {
            MoveCheck {
                pos: from.pos,
                moved: false,
            }
        } else {
            MoveCheck {
                pos: to.pos,
                moved: true,
            }
        }
    }

    fn advanced_movement(&self, from: Vec2, to: Vec2, size: Vec2) -> MoveResolution {
        let Some(space) = self.space else {
            return MoveResolution::free(to);
        };

        let horizontal = Rect::from_pos_size(Vec2::new(to.x, from.y), size);
        let vertical = Rect::from_pos_size(Vec2::new(from.x, to.y), size);
        let collision_x = space.any_overlap(&horizontal);
        let collision_y = space.any_overlap(&vertical);

        let x = if collision_x { from.x } else {
            to.x
        };
        let y = if !collision_y {
            to.y
        } else if to.y > from.y {
            // Rest on the highest surface the fall reached.
            space
                .overlapping(&vertical)
                .map(|s| s.y() - size.y)
                .reduce(f32::min)
                .unwrap_or(from.y)
        } else {
            from.y
        };

        MoveResolution {
            has_collision: collision_x || collision_y,
            adjusted: Vec2::new(x, y),
            collision_x,
            collision_y,
        }
    }

    fn slide_movement(&self, from: &Rect, to: &Rect) -> MoveResolution {
        let full = self.advanced_movement(from.pos, to.pos, to.size);
        if !full.has_collision {
            return full;
        }

        let horizontal_only = Vec2::new(to.x(), from.y());
        let h = self.advanced_movement(from.pos, horizontal_only, to.size);
        if !h.has_collision {
            return h;
        }

        let vertical_only = Vec2::new(from.x(), to.y());
        let v = self.advanced_movement(from.pos, vertical_only, to.size);
        if !v.has_collision {
            return v;
        }

        full
    }

    fn find_safe_position(&self, rect: &Rect) -> SafePosition {
        if !self.point_overlap(rect) {
            return SafePosition {
                pos: rect.pos,
                found: true,
            };
        }

        let mut distance = SAFE_SEARCH_START;
        while distance <= SAFE_SEARCH_MAX {
            for (dx, dy) in SAFE_OFFSETS {
                let candidate = rect.translated(Vec2::new(dx, dy) * distance);
                if !self.point_overlap(&candidate) {
                    log::debug!(
                        "safe position found at ({}, {}) after offset ({}, {})",
                        candidate.x(),
                        candidate.y(),
                        dx * distance,
                        dy * distance
                    );
                    return SafePosition {
                        pos: candidate.pos,
                        found: true,
                    };
                }
            }
            distance += SAFE_SEARCH_STEP;
        }

        log::warn!(
            "no safe position within {SAFE_SEARCH_MAX}px of ({}, {})",
            rect.x(),
            rect.y()
        );
        SafePosition {
            pos: rect.pos,
            found: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TileCollisionBuilder;
    use crate::types::TileGrid;

    fn level(rows: &[&str]) -> CollisionSpace {
        TileCollisionBuilder::default().build(&TileGrid::from_rows(32, 32, rows)).0
    }

    #[test]
    fn test_point_overlap_inside_and_one_pixel_outside() {
        let space = level(&["...", ".#.", "..."]);
        let cs = CollisionSystem::new(&space);
        // Tile spans [32, 64] on both axes.
        assert!(cs.point_overlap(&Rect::new(40.0, 40.0, 1.0, 1.0)));
        assert!(cs.point_overlap(&Rect::new(48.0, 48.0, 0.0, 0.0)));
        assert!(!cs.point_overlap(&Rect::new(30.0, 40.0, 1.0, 1.0)));
        assert!(!cs.point_overlap(&Rect::new(65.0, 40.0, 1.0, 1.0)));
        assert!(!cs.point_overlap(&Rect::new(40.0, 30.0, 1.0, 1.0)));
        assert!(!cs.point_overlap(&Rect::new(40.0, 65.0, 1.0, 1.0)));
    }

    #[test]
    fn test_solid_at_strict_interior_and_detached() {
        let space = level(&["...", ".#.", "..."]);
        let cs = CollisionSystem::new(&space);
        assert!(cs.is_attached());
        assert!(cs.solid_at(Vec2::new(48.0, 48.0)));
        assert!(cs.solid_at(Vec2::new(32.5, 63.5)));
        // Tile edges and the space outside are not solid.
        assert!(!cs.solid_at(Vec2::new(32.0, 48.0)));
        assert!(!cs.solid_at(Vec2::new(48.0, 64.0)));
        assert!(!cs.solid_at(Vec2::new(16.0, 16.0)));

        let detached = CollisionSystem::detached();
        assert!(!detached.is_attached());
        assert!(!detached.solid_at(Vec2::new(48.0, 48.0)));
    }

    #[test]
    fn test_point_overlap_is_repeatable() {
        let space = level(&["#.", ".#"]);
        let cs = CollisionSystem::new(&space);
        let probe = Rect::new(20.0, 20.0, 20.0, 20.0);
        assert_eq!(cs.point_overlap(&probe), cs.point_overlap(&probe));
    }

    #[test]
    fn test_check_movement_is_all_or_nothing() {
        let space = level(&["..#"]);
        let cs = CollisionSystem::new(&space);
        let from = Rect::new(0.0, 0.0, 16.0, 16.0);
        let ok = cs.check_movement(&from, &from.translated(Vec2::new(20.0, 0.0)));
        assert!(ok.moved);
        assert_eq!(ok.pos, Vec2::new(20.0, 0.0));
        let blocked = cs.check_movement(&from, &from.translated(Vec2::new(60.0, 0.0)));
        assert!(!blocked.moved);
        assert_eq!(blocked.pos, from.pos);
    }

    #[test]
    fn test_advanced_lands_on_highest_surface() {
        // Two floor heights under a wide box; the higher one (row 2) wins.
        let space = level(&["....", "....", "..#.", "####"]);
        let cs = CollisionSystem::new(&space);
        let size = Vec2::new(80.0, 30.0);
        let res = cs.advanced_movement(Vec2::new(20.0, 20.0), Vec2::new(20.0, 90.0), size);
        assert!(res.collision_y);
        assert!(!res.collision_x);
        assert_eq!(res.adjusted.y, 64.0 - 30.0);
        assert_eq!(res.adjusted.x, 20.0);
    }

    #[test]
    fn test_advanced_fast_fall_does_not_tunnel() {
        let space = level(&["....", "....", "....", "####"]);
        let cs = CollisionSystem::new(&space);
        // Target is far inside the floor.
        let size = Vec2::new(18.0, 30.0);
        let res = cs.advanced_movement(Vec2::new(10.0, 0.0), Vec2::new(10.0, 80.0), size);
        assert!(res.collision_y);
        assert_eq!(res.adjusted.y, 96.0 - 30.0);
    }

    #[test]
    fn test_advanced_upward_block_freezes_y() {
        let space = level(&["####", "....", "...."]);
        let cs = CollisionSystem::new(&space);
        let size = Vec2::new(18.0, 30.0);
        let res = cs.advanced_movement(Vec2::new(10.0, 40.0), Vec2::new(10.0, 20.0), size);
        assert!(res.collision_y);
        assert_eq!(res.adjusted.y, 40.0);
    }

    #[test]
    fn test_advanced_axis_independence() {
        // Wall to the right, open floor below: X frozen, Y free.
        let space = level(&["..#.", "..#.", "...."]);
        let cs = CollisionSystem::new(&space);
        let from = Vec2::new(40.0, 10.0);
        let to = Vec2::new(50.0, 20.0);
        let res = cs.advanced_movement(from, to, Vec2::new(18.0, 30.0));
        assert!(res.collision_x);
        assert!(!res.collision_y);
        assert_eq!(res.adjusted, Vec2::new(from.x, to.y));
    }

    #[test]
    fn test_slide_movement_accepts_free_sub_move() {
        // Wall to the right: the diagonal is blocked on X, the vertical sub-move is free.
        let space = level(&["..#.", "..#.", "...."]);
        let cs = CollisionSystem::new(&space);
        let from = Rect::new(40.0, 10.0, 18.0, 30.0);
        let to = from.translated(Vec2::new(10.0, 10.0));
        assert!(cs.advanced_movement(from.pos, to.pos, to.size).collision_x);
        let res = cs.slide_movement(&from, &to);
        assert!(!res.has_collision);
        assert_eq!(res.adjusted, Vec2::new(40.0, 20.0));
    }

    #[test]
    fn test_slide_movement_returns_original_when_both_blocked() {
        let space = level(&["###", "#.#", "###"]);
        let cs = CollisionSystem::new(&space);
        let from = Rect::new(34.0, 34.0, 28.0, 28.0);
        let to = from.translated(Vec2::new(8.0, 8.0));
        let full = cs.advanced_movement(from.pos, to.pos, to.size);
        let res = cs.slide_movement(&from, &to);
        assert!(res.has_collision);
        assert_eq!(res, full);
    }

    #[test]
    fn test_ground_probe_one_pixel_below() {
        let space = level(&["..", "##"]);
        let cs = CollisionSystem::new(&space);
        assert!(cs.ground_probe(&Rect::new(4.0, 2.0, 18.0, 30.0)));
        assert!(!cs.ground_probe(&Rect::new(4.0, 0.0, 18.0, 30.0)));
    }

    #[test]
    fn test_find_safe_position_noop_when_free() {
        let space = level(&["#...", "...."]);
        let cs = CollisionSystem::new(&space);
        let rect = Rect::new(70.0, 40.0, 18.0, 20.0);
        let safe = cs.find_safe_position(&rect);
        assert!(safe.found);
        assert_eq!(safe.pos, rect.pos);
    }

    #[test]
    fn test_find_safe_position_prefers_up() {
        let space = level(&["....", "....", "####"]);
        let cs = CollisionSystem::new(&space);
        // Sunk 4px into the floor.
        let rect = Rect::new(40.0, 38.0, 18.0, 30.0);
        let safe = cs.find_safe_position(&rect);
        assert!(safe.found);
        assert_eq!(safe.pos.x, 40.0);
        assert!(safe.pos.y <= 34.0);
        assert!(!cs.point_overlap(&rect.at(safe.pos)));
    }

    #[test]
    fn test_find_safe_position_gives_up_when_buried() {
        // Every offset within the search bound stays inside solid rock.
        let rows = ["########################"; 24];
        let space = level(&rows);
        let cs = CollisionSystem::new(&space);
        let rect = Rect::new(384.0, 384.0, 18.0, 30.0);
        let safe = cs.find_safe_position(&rect);
        assert!(!safe.found);
        assert_eq!(safe.pos, rect.pos);
    }

    #[test]
    fn test_flush_horizontal_against_wall() {
        let space = level(&["....#"]);
        let cs = CollisionSystem::new(&space);
        let rect = Rect::new(100.0, 0.0, 18.0, 30.0);
        assert_eq!(cs.flush_horizontal(&rect, 20.0), 110.0);
        let back = Rect::new(10.0, 0.0, 18.0, 30.0);
        assert_eq!(cs.flush_horizontal(&back, -20.0), 10.0);
    }

    #[test]
    fn test_detached_degrades_to_free_movement() {
        let cs = CollisionSystem::detached();
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!cs.point_overlap(&rect));
        assert!(!cs.ground_probe(&rect));
        let to = Vec2::new(5.0, 500.0);
        let res = cs.advanced_movement(rect.pos, to, rect.size);
        assert_eq!(res, MoveResolution::free(to));
        let safe = cs.find_safe_position(&rect);
        assert!(safe.found);
        assert_eq!(cs.check_movement(&rect, &rect.at(to)).pos, to);
    }

    struct Crate {
        rect: Rect,
        last: Contacts,
    }

    impl Collider for Crate {
        fn collision_box(&self) -> Rect {
            self.rect
        }
        fn set_box_position(&mut self, pos: Vec2) {
            self.rect.pos = pos;
        }
        fn on_collision(&mut self, contacts: Contacts) {
            self.last = contacts;
        }
    }

    #[test]
    fn test_move_object_reports_corner_contacts() {
        // Wall ahead and floor below: both sub-moves are blocked.
        let space = level(&["..#", "###"]);
        let cs = CollisionSystem::new(&space);
        let mut c = Crate {
            rect: Rect::new(40.0,
            10.0,
            16.0,
            16.0),
            last: Contacts::default(),
        };
        let res = cs.move_object(&mut c, Vec2::new(20.0, 20.0));
        assert!(res.has_collision);
        assert_eq!(c.rect.pos, Vec2::new(40.0, 16.0));
        assert!(c.last.wall);
        assert!(c.last.ground);
        assert!(!c.last.ceiling);
    }

    #[test]
    fn test_move_object_slides_without_callback() {
        let space = level(&["..#.", "..#.", "...."]);
        let cs = CollisionSystem::new(&space);
        let mut c = Crate {
            rect: Rect::new(40.0,
            10.0,
            18.0,
            30.0),
            last: Contacts::default(),
        };
        cs.move_object(&mut c, Vec2::new(10.0, 10.0));
        assert_eq!(c.rect.pos, Vec2::new(40.0, 20.0));
        assert!(!c.last.any());
    }
}
