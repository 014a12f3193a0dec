//! The 4x4 board.
//!
//! Cells are stored row-major (`index = row * 4 + col`). A value of 0 marks an
//! empty cell, which only appears on partial grids during search.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Side length of the board
pub const SIZE: usize = 4;
/// Side length of a box
pub const BOX_SIZE: usize = 2;
/// Total number of cells
pub const CELL_COUNT: usize = SIZE * SIZE;
/// Largest digit a cell can hold
pub const MAX_DIGIT: u8 = SIZE as u8;

/// A 4x4 Sudoku board with value semantics.
///
/// The derived ordering compares cells row-major, which is the same order as
/// comparing the 16-character serializations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Grid {
    cells: [u8; CELL_COUNT],
}

impl Grid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from row-major cells, rejecting values above 4
    pub fn from_cells(cells: [u8; CELL_COUNT]) -> Result<Self> {
        for (idx, &value) in cells.iter().enumerate() {
            if value > MAX_DIGIT {
                return Err(Error::InvalidCellValue {
                    row: idx / SIZE,
                    col: idx % SIZE,
                    value,
                });
            }
        }
        Ok(Self { cells })
    }

    /// Build a grid from four rows
    pub fn from_rows(rows: [[u8; SIZE]; SIZE]) -> Result<Self> {
        let mut cells = [0u8; CELL_COUNT];
        for (r, row) in rows.iter().enumerate() {
            cells[r * SIZE..(r + 1) * SIZE].copy_from_slice(row);
        }
        Self::from_cells(cells)
    }

    /// Parse a 16-character string (`0` or `.` for empty cells)
    pub fn from_string(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    pub(crate) fn from_rows_unchecked(rows: [[u8; SIZE]; SIZE]) -> Self {
        let mut cells = [0u8; CELL_COUNT];
        for (r, row) in rows.iter().enumerate() {
            cells[r * SIZE..(r + 1) * SIZE].copy_from_slice(row);
        }
        Self { cells }
    }

    pub(crate) fn map_cells(&self, f: impl Fn(u8) -> u8) -> Self {
        let mut cells = self.cells;
        for cell in cells.iter_mut() {
            *cell = f(*cell);
        }
        Self { cells }
    }

    /// Value at (row, col); 0 means empty
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * SIZE + col]
    }

    /// Overwrite a cell. Used by the completion search; published grids are
    /// never mutated. Callers outside the crate go through [`Grid::try_set`].
    pub(crate) fn set(&mut self, row: usize, col: usize, value: u8) {
        debug_assert!(value <= MAX_DIGIT, "cell value {value} out of range");
        self.cells[row * SIZE + col] = value;
    }

    /// Checked variant of [`Grid::set`]
    pub fn try_set(&mut self, row: usize, col: usize, value: u8) -> Result<()> {
        if value > MAX_DIGIT {
            return Err(Error::InvalidCellValue { row, col, value });
        }
        self.set(row, col, value);
        Ok(())
    }

    /// Row-major cells
    pub fn cells(&self) -> &[u8; CELL_COUNT] {
        &self.cells
    }

    pub fn rows(&self) -> [[u8; SIZE]; SIZE] {
        let mut rows = [[0u8; SIZE]; SIZE];
        for (r, row) in rows.iter_mut().enumerate() {
            row.copy_from_slice(&self.cells[r * SIZE..(r + 1) * SIZE]);
        }
        rows
    }

    /// The 16-digit row-major string that identifies and orders grids
    pub fn serialize(&self) -> String {
        self.cells.iter().map(|&v| char::from(b'0' + v)).collect()
    }

    pub fn row_values(&self, row: usize) -> [u8; SIZE] {
        self.rows()[row]
    }

    pub fn col_values(&self, col: usize) -> [u8; SIZE] {
        std::array::from_fn(|r| self.get(r, col))
    }

    /// Cells of the 2x2 box at (box_row, box_col), each in 0..2
    pub fn box_values(&self, box_row: usize, box_col: usize) -> [u8; SIZE] {
        std::array::from_fn(|i| {
            self.get(
                box_row * BOX_SIZE + i / BOX_SIZE,
                box_col * BOX_SIZE + i % BOX_SIZE,
            )
        })
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    pub fn is_complete(&self) -> bool {
        self.empty_count() == 0
    }

    // ==================== Validity ====================

    /// Check one row, column or box worth of values.
    ///
    /// Non-zero values must be in 1..=4 and pairwise distinct. With
    /// `ignore_incomplete` empties are wildcards; without it any empty fails.
    pub fn is_valid_line(values: &[u8], ignore_incomplete: bool) -> bool {
        let mut seen = [false; SIZE + 1];
        for &value in values {
            if value == 0 {
                if ignore_incomplete {
                    continue;
                }
                return false;
            }
            if value > MAX_DIGIT {
                return false;
            }
            let slot = &mut seen[value as usize];
            if *slot {
                return false;
            }
            *slot = true;
        }
        true
    }

    pub fn is_valid_row(&self, row: usize, ignore_incomplete: bool) -> bool {
        Self::is_valid_line(&self.row_values(row), ignore_incomplete)
    }

    pub fn is_valid_col(&self, col: usize, ignore_incomplete: bool) -> bool {
        Self::is_valid_line(&self.col_values(col), ignore_incomplete)
    }

    pub fn is_valid_box(&self, box_row: usize, box_col: usize, ignore_incomplete: bool) -> bool {
        Self::is_valid_line(&self.box_values(box_row, box_col), ignore_incomplete)
    }

    /// All four rows, columns and boxes pass the line check
    pub fn is_valid(&self, ignore_incomplete: bool) -> bool {
        (0..SIZE).all(|i| {
            self.is_valid_row(i, ignore_incomplete)
                && self.is_valid_col(i, ignore_incomplete)
                && self.is_valid_box(i / BOX_SIZE, i % BOX_SIZE, ignore_incomplete)
        })
    }

    /// Partial validity of just the row, column and box through one cell
    pub fn is_consistent_at(&self, row: usize, col: usize) -> bool {
        self.is_valid_row(row, true)
            && self.is_valid_col(col, true)
            && self.is_valid_box(row / BOX_SIZE, col / BOX_SIZE, true)
    }
}

impl FromStr for Grid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let got = s.chars().count();
        if got != CELL_COUNT {
            return Err(Error::InvalidGridLength {
                expected: CELL_COUNT,
                got,
                context: s.to_string(),
            });
        }

        let mut cells = [0u8; CELL_COUNT];
        for (position, character) in s.chars().enumerate() {
            cells[position] = match character {
                '.' => 0,
                '0'..='4' => character as u8 - b'0',
                _ => {
                    return Err(Error::InvalidCellCharacter {
                        character,
                        position,
                        context: s.to_string(),
                    })
                }
            };
        }
        Ok(Self { cells })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..SIZE {
            if row == BOX_SIZE {
                writeln!(f, "----+----")?;
            }
            for col in 0..SIZE {
                if col == BOX_SIZE {
                    write!(f, " |")?;
                }
                if col > 0 {
                    write!(f, " ")?;
                }
                match self.get(row, col) {
                    0 => write!(f, ".")?,
                    v => write!(f, "{}", v)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&Grid::serialize(self))
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
