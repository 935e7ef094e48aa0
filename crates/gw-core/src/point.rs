use std::fmt;

use serde::{Deserialize, Serialize};

/// An integer grid coordinate. Equality is by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
}

impl Point {
    /// Out-of-bounds sentinel assigned to removed entities.
    ///
    /// Removal poisons an entity's position with this value so a stale
    /// reference can never silently index a live cell.
    pub const INVALID: Point = Point { x: -1, y: -1 };

    /// Create a point from column and row indices.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`.
    pub fn distance_sq(self, other: Point) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }

    /// Whether `other` differs by exactly one unit along exactly one axis.
    pub fn adjacent(self, other: Point) -> bool {
        (self.x == other.x && (self.y - other.y).abs() == 1)
            || (self.y == other.y && (self.x - other.x).abs() == 1)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
