use crate::api::TileClassifier;
use crate::space::CollisionSpace;
use crate::types::{Rect, TileGrid};

/// Default solidity: any non-empty tile is solid.
#[derive(Copy, Clone, Debug, Default)]
pub struct NonEmptySolid;

impl TileClassifier for NonEmptySolid {
    fn is_solid(&self, tile_id: u32) -> bool {
        tile_id > 0
    }
}

/// Counts from the last build.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Cells visited across visible layers.
    pub tiles_scanned: usize,
    /// Shapes inserted into the space.
    pub shapes: usize,
}

/// Turns a tile grid into one rectangle per solid cell. No merging.
pub struct TileCollisionBuilder<C = NonEmptySolid> {
    classifier: C,
}

impl Default for TileCollisionBuilder<NonEmptySolid> {
    fn default() -> Self {
        Self {
            classifier: NonEmptySolid,
        }
    }
}

impl<C: TileClassifier> TileCollisionBuilder<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    /// Build a fresh space sized to the grid.
    pub fn build(&self, grid: &TileGrid) -> (CollisionSpace, BuildStats) {
        let bounds = grid.pixel_bounds();
        let mut space = CollisionSpace::new(bounds.width(), bounds.height());
        let stats = self.rebuild(grid, &mut space);
        (space, stats)
    }

    /// Clear `space` and repopulate it from `grid`. Running it twice yields the
    /// same shape set.
    pub fn rebuild(&self, grid: &TileGrid, space: &mut CollisionSpace) -> BuildStats {
        space.clear();
        let mut stats = BuildStats::default();
        let (tw, th) = (grid.tile_width as f32, grid.tile_height as f32);

        for layer in grid.layers.iter().filter(|l| l.visible && !l.tiles.is_empty()) {
            for y in 0..grid.height {
                for x in 0..grid.width {
                    let idx = (y * grid.width + x) as usize;
                    let Some(&id) = layer.tiles.get(idx) else {
                        continue;
                    };
                    stats.tiles_scanned += 1;
                    if id == 0 || !self.classifier.is_solid(id) {
                        continue;
                    }
                    let rect = Rect::new(x as f32 * tw, y as f32 * th, tw, th);
                    if space.add(rect) {
                        stats.shapes += 1;
                    }
                }
            }
        }

        log::info!(
            "built {} collision shapes from {} tiles ({}x{} grid)",
            stats.shapes,
            stats.tiles_scanned,
            grid.width,
            grid.height
        );
        stats
    }
}
