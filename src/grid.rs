/// A single maze cell: either open to walk through or a wall.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Cell {
    #[default]
    Open,
    Blocked,
}

/// The rows x cols maze grid the backtracking solver searches.
///
/// Cells are stored in row-major order. Start and end positions are not part
/// of the grid; the caller passes them to the trace generator separately, so
/// the same grid can be searched between different endpoints.
pub struct Grid {
    cells: Box<[Cell]>,
    rows: usize,
    cols: usize,
}

impl Grid {
    /// Creates a fully open grid. Panics if either dimension is 0.
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "grid dimensions must be non-zero");
        Grid {
            cells: vec![Cell::Open; rows * cols].into_boxed_slice(),
            rows,
            cols,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_in_bounds(&self, cell: (usize, usize)) -> bool {
        cell.0 < self.rows && cell.1 < self.cols
    }

    pub fn is_open(&self, cell: (usize, usize)) -> bool {
        self[cell] == Cell::Open
    }

    pub fn set(&mut self, cell: (usize, usize), value: Cell) {
        let idx = self.ravel_index(cell.0, cell.1);
        self.cells[idx] = value;
    }

    fn ravel_index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }
}

impl std::ops::Index<(usize, usize)> for Grid {
    type Output = Cell;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.cells[self.ravel_index(index.0, index.1)]
    }
}
