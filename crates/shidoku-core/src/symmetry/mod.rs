//! Symmetry groups acting on grids.
//!
//! Both groups are built once per run and passed explicitly to whatever needs
//! them; nothing here is global.

mod geometry;
mod labels;

pub use geometry::{
    GeometryGroup, GeometryTransform, GEOMETRY_FLAG_COUNT, GEOMETRY_TRANSFORM_COUNT,
};
pub use labels::{LabelGroup, LabelPermutation, LABEL_PERMUTATION_COUNT};

/// Size of the combined geometry x relabel candidate space
pub const FULL_SYMMETRY_COUNT: usize = GEOMETRY_TRANSFORM_COUNT * LABEL_PERMUTATION_COUNT;
