//! Cell occupancy for one page's body grid.

/// Next cell the paginator will try, in row-major reading order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridCursor {
    pub row: u32,
    pub col: u32,
}

impl GridCursor {
    /// Cursor position just after a tile placed at `self` spanning `col_span` columns.
    pub fn advance(self, col_span: u32, cols: u32) -> GridCursor {
        let col = self.col + col_span;
        if col >= cols {
            GridCursor {
                row: self.row + 1,
                col: 0,
            }
        } else {
            GridCursor { row: self.row, col }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridOccupancy {
    cols: u32,
    rows: u32,
    cells: Vec<bool>,
}

impl GridOccupancy {
    pub fn new(cols: u32, rows: u32) -> Self {
        GridOccupancy {
            cols,
            rows,
            cells: vec![false; (cols as usize) * (rows as usize)],
        }
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    fn index(&self, row: u32, col: u32) -> usize {
        (row as usize) * (self.cols as usize) + col as usize
    }

    /// Out-of-grid cells count as occupied.
    pub fn is_occupied(&self, row: u32, col: u32) -> bool {
        if row >= self.rows || col >= self.cols {
            return true;
        }
        self.cells[self.index(row, col)]
    }

    /// True if the whole `col_span × row_span` rectangle at (row, col) is inside the grid and free.
    pub fn is_free(&self, row: u32, col: u32, col_span: u32, row_span: u32) -> bool {
        if row + row_span > self.rows || col + col_span > self.cols {
            return false;
        }
        (row..row + row_span).all(|r| (col..col + col_span).all(|c| !self.is_occupied(r, c)))
    }

    pub fn occupy(&mut self, row: u32, col: u32, col_span: u32, row_span: u32) {
        for r in row..(row + row_span).min(self.rows) {
            for c in col..(col + col_span).min(self.cols) {
                let idx = self.index(r, c);
                self.cells[idx] = true;
            }
        }
    }

    /// First free slot at or after `from` in reading order. Scanning wraps to the next row when
    /// the span would run past the last column, and never moves back before `from`.
    pub fn find_slot(&self, from: GridCursor, col_span: u32, row_span: u32) -> Option<GridCursor> {
        if col_span == 0 || row_span == 0 || col_span > self.cols {
            return None;
        }
        let mut row = from.row;
        let mut col = from.col;
        while row + row_span <= self.rows {
            while col + col_span <= self.cols {
                if self.is_free(row, col, col_span, row_span) {
                    return Some(GridCursor { row, col });
                }
                col += 1;
            }
            row += 1;
            col = 0;
        }
        None
    }
}
