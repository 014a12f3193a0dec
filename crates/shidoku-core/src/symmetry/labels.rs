//! Digit relabeling: the 24 permutations of {1, 2, 3, 4}.

use crate::error::{Error, Result};
use crate::grid::{Grid, MAX_DIGIT, SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of digit permutations, i.e. the size of a [`LabelGroup`]
pub const LABEL_PERMUTATION_COUNT: usize = 24;

/// A bijection on {1, 2, 3, 4}; digit `d` maps to `images[d - 1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "[u8; 4]", into = "[u8; 4]")]
pub struct LabelPermutation {
    images: [u8; SIZE],
}

impl LabelPermutation {
    /// Validate that `images` is a permutation of 1..=4
    pub fn new(images: [u8; SIZE]) -> Result<Self> {
        let mut seen = [false; SIZE + 1];
        for &digit in &images {
            if digit == 0 || digit > MAX_DIGIT {
                return Err(Error::InvalidPermutationDigit { digit });
            }
            if seen[digit as usize] {
                return Err(Error::DuplicatePermutationDigit { digit });
            }
            seen[digit as usize] = true;
        }
        Ok(Self { images })
    }

    pub fn from_slice(images: &[u8]) -> Result<Self> {
        let images: [u8; SIZE] = images
            .try_into()
            .map_err(|_| Error::InvalidPermutationLength { got: images.len() })?;
        Self::new(images)
    }

    pub fn identity() -> Self {
        Self {
            images: [1, 2, 3, 4],
        }
    }

    pub fn images(&self) -> [u8; SIZE] {
        self.images
    }

    /// Image of a single digit; 0 (empty) and anything outside 1..=4 are fixed
    pub fn map_digit(&self, digit: u8) -> u8 {
        usize::from(digit)
            .checked_sub(1)
            .and_then(|i| self.images.get(i))
            .copied()
            .unwrap_or(digit)
    }

    /// Relabel every non-empty cell, returning a new grid
    pub fn apply(&self, grid: &Grid) -> Grid {
        grid.map_cells(|v| self.map_digit(v))
    }

    pub fn inverse(&self) -> Self {
        let mut images = [0u8; SIZE];
        for (i, &image) in self.images.iter().enumerate() {
            images[usize::from(image) - 1] = i as u8 + 1;
        }
        Self { images }
    }

    /// The permutation that applies `self` first and then `next`
    pub fn then(&self, next: &LabelPermutation) -> Self {
        Self {
            images: self.images.map(|d| next.map_digit(d)),
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// The images as a 4-digit string, e.g. `4321`
    pub fn label(&self) -> String {
        self.images.iter().map(|&d| char::from(b'0' + d)).collect()
    }

    /// All 24 permutations, first image outermost
    pub fn all() -> Vec<LabelPermutation> {
        let mut perms = Vec::with_capacity(LABEL_PERMUTATION_COUNT);
        for a in 1..=MAX_DIGIT {
            for b in (1..=MAX_DIGIT).filter(|&b| b != a) {
                for c in (1..=MAX_DIGIT).filter(|&c| c != a && c != b) {
                    for d in (1..=MAX_DIGIT).filter(|&d| d != a && d != b && d != c) {
                        perms.push(Self {
                            images: [a, b, c, d],
                        });
                    }
                }
            }
        }
        perms
    }
}

impl TryFrom<[u8; SIZE]> for LabelPermutation {
    type Error = Error;

    fn try_from(images: [u8; SIZE]) -> Result<Self> {
        Self::new(images)
    }
}

impl From<LabelPermutation> for [u8; SIZE] {
    fn from(perm: LabelPermutation) -> Self {
        perm.images
    }
}

impl fmt::Display for LabelPermutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The enumerated table of digit permutations, built once per run
#[derive(Debug, Clone)]
pub struct LabelGroup {
    permutations: Vec<LabelPermutation>,
}

impl Default for LabelGroup {
    fn default() -> Self {
        Self::enumerate_all()
    }
}

impl LabelGroup {
    pub fn enumerate_all() -> Self {
        Self {
            permutations: LabelPermutation::all(),
        }
    }

    /// A group restricted to the given permutations
    pub fn from_permutations(permutations: Vec<LabelPermutation>) -> Self {
        Self { permutations }
    }

    pub fn apply(&self, grid: &Grid, perm: &LabelPermutation) -> Grid {
        perm.apply(grid)
    }

    pub fn permutations(&self) -> &[LabelPermutation] {
        &self.permutations
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabelPermutation> {
        self.permutations.iter()
    }

    pub fn len(&self) -> usize {
        self.permutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permutations.is_empty()
    }
}
