//! Geometric symmetries: row and column swaps inside bands and stacks, band
//! and stack swaps, and transposition.

use crate::error::{Error, Result};
use crate::grid::{Grid, SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of independent flags in a [`GeometryTransform`]
pub const GEOMETRY_FLAG_COUNT: u32 = 7;
/// Number of flag assignments, i.e. the size of a [`GeometryGroup`]
pub const GEOMETRY_TRANSFORM_COUNT: usize = 1 << GEOMETRY_FLAG_COUNT;

const FLAG_NAMES: [&str; GEOMETRY_FLAG_COUNT as usize] =
    ["rb0", "rb1", "rbs", "cs0", "cs1", "css", "tr"];

/// A combination of geometric moves.
///
/// Applied in three fixed stages: rows, then columns, then transpose. Distinct
/// flag sets may describe the same permutation of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GeometryTransform {
    /// Swap rows 0 and 1
    pub swap_rows_band0: bool,
    /// Swap rows 2 and 3
    pub swap_rows_band1: bool,
    /// Swap the row pairs (0,1) and (2,3)
    pub swap_bands: bool,
    /// Swap columns 0 and 1
    pub swap_cols_stack0: bool,
    /// Swap columns 2 and 3
    pub swap_cols_stack1: bool,
    /// Swap the column pairs (0,1) and (2,3)
    pub swap_stacks: bool,
    /// Reflect across the main diagonal
    pub transpose: bool,
}

impl GeometryTransform {
    pub fn identity() -> Self {
        Self::default()
    }

    /// Decode a flag word; bit 0 is `swap_rows_band0`, bit 6 is `transpose`
    pub fn from_bits(bits: u8) -> Result<Self> {
        if usize::from(bits) >= GEOMETRY_TRANSFORM_COUNT {
            return Err(Error::InvalidTransformBits { bits });
        }
        Ok(Self::decode(bits))
    }

    fn decode(bits: u8) -> Self {
        let flag = |n: u8| bits & (1 << n) != 0;
        Self {
            swap_rows_band0: flag(0),
            swap_rows_band1: flag(1),
            swap_bands: flag(2),
            swap_cols_stack0: flag(3),
            swap_cols_stack1: flag(4),
            swap_stacks: flag(5),
            transpose: flag(6),
        }
    }

    pub fn bits(&self) -> u8 {
        self.flags()
            .iter()
            .enumerate()
            .fold(0u8, |acc, (n, &set)| if set { acc | (1u8 << n) } else { acc })
    }

    fn flags(&self) -> [bool; GEOMETRY_FLAG_COUNT as usize] {
        [
            self.swap_rows_band0,
            self.swap_rows_band1,
            self.swap_bands,
            self.swap_cols_stack0,
            self.swap_cols_stack1,
            self.swap_stacks,
            self.transpose,
        ]
    }

    pub fn is_identity(&self) -> bool {
        self.bits() == 0
    }

    /// All 128 transforms in binary counting order
    pub fn all() -> Vec<GeometryTransform> {
        (0..GEOMETRY_TRANSFORM_COUNT as u8).map(Self::decode).collect()
    }

    /// Short flag list such as `rb0+tr`, or `id` for the identity
    pub fn label(&self) -> String {
        if self.is_identity() {
            return "id".to_string();
        }
        FLAG_NAMES
            .iter()
            .zip(self.flags())
            .filter(|(_, set)| *set)
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join("+")
    }

    /// Apply the transform, returning a new grid
    pub fn apply(&self, grid: &Grid) -> Grid {
        let mut rows = grid.rows();

        // Row stage
        swap_pairs(
            &mut rows,
            self.swap_rows_band0,
            self.swap_rows_band1,
            self.swap_bands,
        );

        // Column stage
        for row in rows.iter_mut() {
            swap_pairs(
                row,
                self.swap_cols_stack0,
                self.swap_cols_stack1,
                self.swap_stacks,
            );
        }

        // Transpose stage
        if self.transpose {
            for r in 0..SIZE {
                for c in (r + 1)..SIZE {
                    let tmp = rows[r][c];
                    rows[r][c] = rows[c][r];
                    rows[c][r] = tmp;
                }
            }
        }

        Grid::from_rows_unchecked(rows)
    }
}

/// Swap within the first pair, within the second pair, then the pairs
fn swap_pairs<T>(items: &mut [T; SIZE], first: bool, second: bool, pairs: bool) {
    if first {
        items.swap(0, 1);
    }
    if second {
        items.swap(2, 3);
    }
    if pairs {
        items.swap(0, 2);
        items.swap(1, 3);
    }
}

impl fmt::Display for GeometryTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The enumerated table of geometric transforms, built once per run
#[derive(Debug, Clone)]
pub struct GeometryGroup {
    transforms: Vec<GeometryTransform>,
}

impl Default for GeometryGroup {
    fn default() -> Self {
        Self::enumerate_all()
    }
}

impl GeometryGroup {
    /// Every flag assignment, in binary counting order
    pub fn enumerate_all() -> Self {
        Self {
            transforms: GeometryTransform::all(),
        }
    }

    /// A group restricted to the given transforms
    pub fn from_transforms(transforms: Vec<GeometryTransform>) -> Self {
        Self { transforms }
    }

    pub fn apply(&self, grid: &Grid, transform: &GeometryTransform) -> Grid {
        transform.apply(grid)
    }

    pub fn transforms(&self) -> &[GeometryTransform] {
        &self.transforms
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeometryTransform> {
        self.transforms.iter()
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}
