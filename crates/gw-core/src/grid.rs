use crate::point::Point;

/// A rectangular array of `num_cols x num_rows` cells, each holding a value
/// of type `T` or nothing.
///
/// The grid does no bounds checking of its own: indexing an out-of-bounds
/// point is an invariant violation and panics. The world model checks
/// [`crate::world::WorldModel::within_bounds`] before touching either layer.
#[derive(Debug, Clone)]
pub struct Grid<T> {
    num_cols: i32,
    num_rows: i32,
    cells: Vec<Option<T>>,
}

impl<T> Grid<T> {
    /// Create a grid with every cell empty.
    ///
    /// # Panics
    /// Panics if either dimension is not positive.
    pub fn empty(num_cols: i32, num_rows: i32) -> Self {
        assert!(
            num_cols > 0 && num_rows > 0,
            "grid dimensions must be positive: {num_cols}x{num_rows}"
        );
        let len = num_cols as usize * num_rows as usize;
        let mut cells = Vec::with_capacity(len);
        cells.resize_with(len, || None);
        Self {
            num_cols,
            num_rows,
            cells,
        }
    }

    /// Number of columns.
    pub fn num_cols(&self) -> i32 {
        self.num_cols
    }

    /// Number of rows.
    pub fn num_rows(&self) -> i32 {
        self.num_rows
    }

    fn index(&self, pt: Point) -> usize {
        assert!(
            pt.x >= 0 && pt.x < self.num_cols && pt.y >= 0 && pt.y < self.num_rows,
            "grid index out of bounds: {pt}"
        );
        pt.y as usize * self.num_cols as usize + pt.x as usize
    }

    /// The value held by the cell at `pt`, if any.
    pub fn get(&self, pt: Point) -> Option<&T> {
        self.cells[self.index(pt)].as_ref()
    }

    /// Mutable access to the value held by the cell at `pt`, if any.
    pub fn get_mut(&mut self, pt: Point) -> Option<&mut T> {
        let idx = self.index(pt);
        self.cells[idx].as_mut()
    }

    /// Replace the cell at `pt`, returning the displaced value.
    pub fn set(&mut self, pt: Point, value: Option<T>) -> Option<T> {
        let idx = self.index(pt);
        std::mem::replace(&mut self.cells[idx], value)
    }
}

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell holding a clone of `value`.
    ///
    /// # Panics
    /// Panics if either dimension is not positive.
    pub fn filled(num_cols: i32, num_rows: i32, value: T) -> Self {
        let mut grid = Self::empty(num_cols, num_rows);
        grid.cells.fill(Some(value));
        grid
    }
}
