use glam::Vec2;

use crate::api::NarrowphaseApi;
use crate::narrowphase::Narrowphase;
use crate::types::Rect;

/// Static collision shapes for one loaded level.
///
/// Queries are a linear scan over the shape list; per-level tile counts are in
/// the hundreds. The space is owned by the level and handed to actors by
/// reference; it is only mutated between ticks.
#[derive(Clone, Debug)]
pub struct CollisionSpace {
    bounds: Rect,
    shapes: Vec<Rect>,
}

impl CollisionSpace {
    /// Empty space covering `[0, width] × [0, height]` pixels.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            bounds: Rect::new(0.0, 0.0, width.max(0.0), height.max(0.0)),
            shapes: Vec::new(),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Read-only view of every shape, in insertion order.
    pub fn shapes(&self) -> &[Rect] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Append a shape. Duplicates are kept. Shapes reaching outside the level
    /// bounds are rejected and `false` is returned.
    pub fn add(&mut self, shape: Rect) -> bool {
        if !shape.within(&self.bounds) {
            log::warn!(
                "rejecting collision shape ({}, {}, {}x{}) outside level bounds {}x{}",
                shape.x(),
                shape.y(),
                shape.width(),
                shape.height(),
                self.bounds.width(),
                self.bounds.height()
            );
            return false;
        }
        self.shapes.push(shape);
        true
    }

    /// Drop every shape; bounds are kept.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Shapes overlapping `rect`.
    pub fn overlapping<'a>(&'a self, rect: &'a Rect) -> impl Iterator<Item = &'a Rect> + 'a {
        self.shapes.iter().filter(move |s| Narrowphase::overlap_rect_rect(rect, s))
    }

    pub fn any_overlap(&self, rect: &Rect) -> bool {
        self.shapes.iter().any(|s| Narrowphase::overlap_rect_rect(rect, s))
    }

    /// First shape strictly containing `p`.
    pub fn shape_at(&self, p: Vec2) -> Option<&Rect> {
        self.shapes.iter().find(|s| Narrowphase::overlap_point_rect(p, s))
    }
}
