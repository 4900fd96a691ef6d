use glam::Vec2;

/// Axis-aligned rectangle in world pixels (y grows downward).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    /// Top-left corner.
    pub pos: Vec2,
    /// Width and height (both ≥ 0).
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos.x
    }
    #[inline]
    pub fn y(&self) -> f32 {
        self.pos.y
    }
    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }
    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }
    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Same size, moved to `pos`.
    pub fn at(&self, pos: Vec2) -> Self {
        Self {
            pos,
            size: self.size,
        }
    }

    /// Same size, moved by `delta`.
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            pos: self.pos + delta,
            size: self.size,
        }
    }

    /// True if `self` lies inside `outer` (edges may coincide).
    pub fn within(&self, outer: &Rect) -> bool {
        self.x() >= outer.x()
            && self.y() >= outer.y()
            && self.right() <= outer.right()
            && self.bottom() <= outer.bottom()
    }
}

/// Outcome of a whole-box movement check.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MoveCheck {
    /// Accepted position (the origin when blocked).
    pub pos: Vec2,
    /// False when the target box overlapped geometry.
    pub moved: bool,
}

/// Per-axis movement resolution. Transient; never stored.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MoveResolution {
    pub has_collision: bool,
    /// Corrected top-left of the moving box.
    pub adjusted: Vec2,
    /// Horizontal probe was blocked.
    pub collision_x: bool,
    /// Vertical probe was blocked.
    pub collision_y: bool,
}

impl MoveResolution {
    /// Unobstructed move to `to`.
    pub fn free(to: Vec2) -> Self {
        Self {
            has_collision: false,
            adjusted: to,
            collision_x: false,
            collision_y: false,
        }
    }

    /// Classify the blocked axes given the attempted vertical displacement.
    pub fn contacts(&self, dy: f32) -> Contacts {
        Contacts {
            wall: self.collision_x,
            ground: self.collision_y && dy > 0.0,
            ceiling: self.collision_y && dy < 0.0,
        }
    }
}

/// Which surfaces a resolved move ran into.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Contacts {
    pub wall: bool,
    pub ground: bool,
    pub ceiling: bool,
}

impl Contacts {
    pub fn any(&self) -> bool {
        self.wall || self.ground || self.ceiling
    }
}

/// Result of the bounded safe-position search.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SafePosition {
    /// Free top-left, or the input position when nothing was found.
    pub pos: Vec2,
    pub found: bool,
}

/// Which way an actor faces.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1.0 for left, 1.0 for right.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Left for negative `x`, right otherwise.
    pub fn from_sign(x: f32) -> Self {
        if x < 0.0 {
            Facing::Left
        } else {
            Facing::Right
        }
    }
}

/// A hazard entity that corrupts physics around it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hazard {
    pub position: Vec2,
    /// Influence radius in pixels.
    pub radius: f32,
    /// Corruption at the hazard's centre. Negative strengths never raise the level.
    pub strength: f32,
}

impl Hazard {
    pub fn new(position: Vec2, radius: f32, strength: f32) -> Self {
        Self {
            position,
            radius,
            strength,
        }
    }

    /// Contribution at `point`: `strength × (1 − d/r)` inside the radius, else 0.
    pub fn influence_at(&self, point: Vec2) -> f32 {
        if self.radius <= 0.0 {
            return 0.0;
        }
        let d = self.position.distance(point);
        if d >= self.radius {
            return 0.0;
        }
        self.strength * (1.0 - d / self.radius)
    }
}

/// One layer of tile ids, row-major, 0 = empty.
#[derive(Clone, Debug, Default)]
pub struct TileLayer {
    pub name: String,
    pub visible: bool,
    pub tiles: Vec<u32>,
}

/// Parsed tile grid for one level. Immutable once loaded.
#[derive(Clone, Debug)]
pub struct TileGrid {
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub layers: Vec<TileLayer>,
}

impl TileGrid {
    pub fn pixel_width(&self) -> u32 {
        self.width * self.tile_width
    }
    pub fn pixel_height(&self) -> u32 {
        self.height * self.tile_height
    }

    pub fn pixel_bounds(&self) -> Rect {
        let size = Vec2::new(self.pixel_width() as f32, self.pixel_height() as f32);
        Rect::from_pos_size(Vec2::ZERO, size)
    }

    /// Build a single visible layer from text rows: `.` or space is empty,
    /// `#` is tile 1, a digit is that tile id. Short rows are padded with empty.
    pub fn from_rows(tile_width: u32, tile_height: u32, rows: &[&str]) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let mut tiles = vec![0u32; (width * height) as usize];
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let id = match ch {
                    '#' => 1,
                    c => c.to_digit(10).unwrap_or(0),
                };
                tiles[y * width as usize + x] = id;
            }
        }
        Self {
            width,
            height,
            tile_width,
            tile_height,
            layers: vec![TileLayer {
                name: "ground".into(),
                visible: true,
                tiles,
            }],
        }
    }

    /// Tile id under a world pixel, taken from the first non-empty layer
    /// array. Returns 0 outside the grid.
    pub fn tile_at(&self, world: Vec2) -> u32 {
        if world.x < 0.0 || world.y < 0.0 || self.tile_width == 0 || self.tile_height == 0 {
            return 0;
        }
        let tx = world.x as u32 / self.tile_width;
        let ty = world.y as u32 / self.tile_height;
        if tx >= self.width || ty >= self.height {
            return 0;
        }
        let idx = (ty * self.width + tx) as usize;
        self.layers
            .iter()
            .find(|l| !l.tiles.is_empty())
            .and_then(|l| l.tiles.get(idx).copied())
            .unwrap_or(0)
    }
}
