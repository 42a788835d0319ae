//! Axis-aligned rectangles in world-grid coordinates (roads, rivers, bridges).

/// Integer rectangle on the world grid. `x`/`y` is the top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl GridRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// One past the last covered column.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// One past the last covered row.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Check whether the cell `(x, y)` lies inside this rectangle.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check whether two rectangles share at least one cell.
    pub fn intersects(&self, other: &GridRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Center of the rectangle in grid units.
    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(
            self.x as f32 + self.width as f32 * 0.5,
            self.y as f32 + self.height as f32 * 0.5,
        )
    }
}
