/// Grid: the immutable rectangular array of maze cells.
///
/// ## Layout
///
/// Indexed `[row][col]`, row-major, zero-based. World space maps onto the
/// grid with `col = floor(x / cell_size)` and `row = floor(z / cell_size)`.
///
/// ## Mutability
///
/// A `Grid` is only ever built by the generator (or `from_ascii` for fixed
/// layouts). No mutating API is exposed, so it can be lent out as `&Grid`
/// to the collision resolver and any renderer without coordination.

use std::fmt;

use super::cell::Cell;

/// Errors raised at the grid construction boundary.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GridError {
    /// Zero rows or zero columns requested.
    InvalidDimensions { rows: usize, cols: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidDimensions { rows, cols } => {
                write!(f, "invalid maze dimensions {rows}x{cols}: both must be at least 1")
            }
        }
    }
}

impl std::error::Error for GridError {}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    cells: Vec<Vec<Cell>>,
    rows: usize,
    cols: usize,
}

impl Grid {
    /// Wrap a finished cell array. Callers guarantee a non-empty,
    /// rectangular array (the generator and `from_ascii` both do).
    pub(crate) fn from_cells(cells: Vec<Vec<Cell>>) -> Self {
        let rows = cells.len();
        let cols = cells.first().map_or(0, |r| r.len());
        Grid { cells, rows, cols }
    }

    /// Build a grid from text rows: `#` is Wall, anything else is Path.
    /// Short rows are padded with Wall so the grid stays rectangular.
    pub fn from_ascii(rows: &[&str]) -> Result<Self, GridError> {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        if rows.is_empty() || width == 0 {
            return Err(GridError::InvalidDimensions { rows: rows.len(), cols: width });
        }
        let cells = rows
            .iter()
            .map(|line| {
                let mut row: Vec<Cell> = line.chars().map(Cell::from_glyph).collect();
                row.resize(width, Cell::Wall);
                row
            })
            .collect();
        Ok(Grid::from_cells(cells))
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at (row, col); `None` outside the grid.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    #[inline]
    pub fn is_path(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).map_or(false, Cell::is_path)
    }

    /// Map a world point to its (row, col) with `floor(coord / cell_size)`.
    /// Negative or out-of-range coordinates give `None`.
    #[inline]
    pub fn world_to_cell(&self, x: f32, z: f32, cell_size: f32) -> Option<(usize, usize)> {
        let col = (x / cell_size).floor();
        let row = (z / cell_size).floor();
        if !(col >= 0.0 && row >= 0.0) {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row < self.rows && col < self.cols {
            Some((row, col))
        } else {
            None
        }
    }

    /// Cell under a world point; `None` outside the grid.
    #[inline]
    pub fn cell_at_world(&self, x: f32, z: f32, cell_size: f32) -> Option<Cell> {
        self.world_to_cell(x, z, cell_size).and_then(|(r, c)| self.cell(r, c))
    }

    /// Row slices, top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(|r| r.as_slice())
    }

    pub fn path_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_path()).count()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.glyph())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_round_trip_keeps_layout() {
        let g = Grid::from_ascii(&[" #", "  "]).unwrap();
        assert_eq!(g.rows(), 2);
        assert_eq!(g.cols(), 2);
        assert_eq!(g.cell(0, 1), Some(Cell::Wall));
        assert_eq!(g.cell(1, 1), Some(Cell::Path));
        assert_eq!(g.to_string(), " #\n  ");
    }

    #[test]
    fn ragged_rows_pad_with_wall() {
        let g = Grid::from_ascii(&["   ", " "]).unwrap();
        assert_eq!(g.cols(), 3);
        assert_eq!(g.cell(1, 2), Some(Cell::Wall));
    }

    #[test]
    fn empty_ascii_is_rejected() {
        assert_eq!(
            Grid::from_ascii(&[]),
            Err(GridError::InvalidDimensions { rows: 0, cols: 0 })
        );
    }

    #[test]
    fn cell_out_of_range_is_none() {
        let g = Grid::from_ascii(&[" "]).unwrap();
        assert_eq!(g.cell(0, 1), None);
        assert_eq!(g.cell(1, 0), None);
        assert!(!g.is_path(3, 3));
    }

    #[test]
    fn world_mapping_floors_coordinates() {
        let g = Grid::from_ascii(&["  #", "   "]).unwrap();
        assert_eq!(g.world_to_cell(0.99, 0.0, 1.0), Some((0, 0)));
        assert_eq!(g.world_to_cell(2.0, 0.5, 1.0), Some((0, 2)));
        assert_eq!(g.cell_at_world(2.5, 0.5, 1.0), Some(Cell::Wall));
        assert_eq!(g.world_to_cell(5.0, 3.0, 2.0), Some((1, 2)));
    }

    #[test]
    fn world_mapping_outside_is_none() {
        let g = Grid::from_ascii(&["  ", "  "]).unwrap();
        assert_eq!(g.world_to_cell(-0.01, 0.5, 1.0), None);
        assert_eq!(g.world_to_cell(0.5, -0.5, 1.0), None);
        assert_eq!(g.world_to_cell(2.0, 0.5, 1.0), None);
        assert_eq!(g.world_to_cell(0.5, 2.0, 1.0), None);
        assert_eq!(g.world_to_cell(f32::NAN, 0.5, 1.0), None);
    }

    #[test]
    fn error_message_names_dimensions() {
        let e = GridError::InvalidDimensions { rows: 0, cols: 7 };
        assert!(e.to_string().contains("0x7"));
    }
}
