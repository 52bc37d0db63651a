//! Boolean walkability grid derived from character-map layouts.

use thiserror::Error;

use crate::CellCoord;

/// Glyph that marks an impassable tile in the default legend.
pub const WALL_GLYPH: char = '1';

/// Errors reported while deriving a [`WalkabilityGrid`] from a layout.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The layout contained no rows or its rows contained no glyphs.
    #[error("layout is empty")]
    Empty,
    /// A row disagreed with the width established by the first row.
    #[error("layout row {row} has {found} glyphs; expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: u32,
        /// Width established by the first row.
        expected: u32,
        /// Width of the offending row.
        found: u32,
    },
}

/// Rectangular grid of passable and impassable cells.
///
/// Cells are stored in row-major order. The grid is immutable once built;
/// derived variants are produced through [`WalkabilityGrid::with_blocked`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkabilityGrid {
    columns: u32,
    rows: u32,
    cells: Vec<bool>,
}

impl WalkabilityGrid {
    /// Builds a grid where [`WALL_GLYPH`] is impassable and every other glyph is walkable.
    pub fn from_layout<S>(layout: &[S]) -> Result<Self, GridError>
    where
        S: AsRef<str>,
    {
        Self::from_layout_with(layout, |glyph| glyph == WALL_GLYPH)
    }

    /// Builds a grid using a caller-provided wall predicate.
    pub fn from_layout_with<S, F>(layout: &[S], is_wall: F) -> Result<Self, GridError>
    where
        S: AsRef<str>,
        F: Fn(char) -> bool,
    {
        let Some(first) = layout.first() else {
            return Err(GridError::Empty);
        };

        let expected = first.as_ref().chars().count();
        if expected == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(expected * layout.len());
        for (row_index, row) in layout.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != expected {
                return Err(GridError::RaggedRow {
                    row: saturating_u32(row_index),
                    expected: saturating_u32(expected),
                    found: saturating_u32(found),
                });
            }
            cells.extend(row.chars().map(|glyph| !is_wall(glyph)));
        }

        Ok(Self {
            columns: saturating_u32(expected),
            rows: saturating_u32(layout.len()),
            cells,
        })
    }

    /// Creates a fully walkable grid with the provided dimensions.
    #[must_use]
    pub fn open(columns: u32, rows: u32) -> Self {
        let count = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![true; count],
        }
    }

    /// Returns a copy of the grid where the provided cells are impassable.
    ///
    /// Cells outside the grid are ignored.
    #[must_use]
    pub fn with_blocked<I>(&self, blocked: I) -> Self
    where
        I: IntoIterator<Item = CellCoord>,
    {
        let mut derived = self.clone();
        for cell in blocked {
            if let Some(index) = derived.index(cell) {
                derived.cells[index] = false;
            }
        }
        derived
    }

    /// Number of columns and rows contained in the grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells contained in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the cell lies within the grid bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Reports whether the cell is inside the grid and passable.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    /// Row-major index of the cell, if it lies within the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }

        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
