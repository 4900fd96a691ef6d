use glam::Vec2;

use crate::api::NarrowphaseApi;
use crate::types::*;

/// Rectangle primitive tests.
///
/// Overlap is strict: boxes that only share an edge are separate, so an actor
/// resting exactly on a tile top is not inside it.
pub struct Narrowphase;

impl NarrowphaseApi for Narrowphase {
    #[inline]
    fn overlap_rect_rect(a: &Rect, b: &Rect) -> bool {
        a.x() < b.right() && a.right() > b.x() && a.y() < b.bottom() && a.bottom() > b.y()
    }

    #[inline]
    fn overlap_point_rect(p: Vec2, r: &Rect) -> bool {
        p.x > r.x() && p.x < r.right() && p.y > r.y() && p.y < r.bottom()
    }

    fn flush_x(mover: &Rect, obstacle: &Rect, dir_x: f32) -> Option<f32> {
        if dir_x > 0.0 {
            Some(obstacle.x() - mover.width())
        } else if dir_x < 0.0 {
            Some(obstacle.right())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_rect_rect_basic() {
        let a = Rect::new(0.0, 0.0, 32.0, 32.0);
        let b = Rect::new(16.0, 16.0, 32.0, 32.0);
        assert!(Narrowphase::overlap_rect_rect(&a, &b));
        assert!(Narrowphase::overlap_rect_rect(&b, &a));
    }

    #[test]
    fn test_overlap_rect_rect_shared_edge_is_separate() {
        let tile = Rect::new(0.0, 0.0, 32.0, 32.0);
        let above = Rect::new(4.0, -30.0, 18.0, 30.0);
        let beside = Rect::new(32.0, 0.0, 18.0, 30.0);
        assert!(!Narrowphase::overlap_rect_rect(&tile, &above));
        assert!(!Narrowphase::overlap_rect_rect(&tile, &beside));
        // One pixel of penetration is enough.
        let sunk = above.translated(Vec2::new(0.0, 1.0));
        assert!(Narrowphase::overlap_rect_rect(&tile, &sunk));
    }

    #[test]
    fn test_overlap_point_rect() {
        let r = Rect::new(0.0, 0.0, 32.0, 32.0);
        assert!(Narrowphase::overlap_point_rect(Vec2::new(16.0, 16.0), &r));
        assert!(!Narrowphase::overlap_point_rect(Vec2::new(32.0, 16.0), &r));
        assert!(!Narrowphase::overlap_point_rect(Vec2::new(-1.0, 16.0), &r));
    }

    #[test]
    fn test_flush_x_by_direction() {
        let mover = Rect::new(100.0, 0.0, 18.0, 30.0);
        let wall = Rect::new(128.0, 0.0, 32.0, 32.0);
        assert_eq!(Narrowphase::flush_x(&mover, &wall, 1.0), Some(110.0));
        let left_wall = Rect::new(64.0, 0.0, 32.0, 32.0);
        assert_eq!(Narrowphase::flush_x(&mover, &left_wall, -4.0), Some(96.0));
        assert_eq!(Narrowphase::flush_x(&mover, &wall, 0.0), None);
    }
}
