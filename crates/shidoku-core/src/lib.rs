//! Enumeration and symmetry classification of 4x4 Sudoku grids.
//!
//! The 288 complete grids collapse to 12 classes under digit relabeling and to
//! 2 classes once the 128 geometric transforms are added.
//!
//! ```
//! use shidoku_core::Pipeline;
//!
//! let report = Pipeline::new().run().unwrap();
//! assert_eq!(report.solution_count, 288);
//! assert_eq!(report.relabel_class_count, 12);
//! assert_eq!(report.full_class_count, 2);
//! ```

pub mod buckets;
pub mod canonical;
pub mod enumerator;
pub mod error;
pub mod grid;
pub mod pipeline;
pub mod symmetry;

pub use buckets::{Bucket, BucketMap, EquivalenceBucketBuilder};
pub use canonical::{
    canonical_full, canonical_full_trace, canonical_full_with, canonical_relabel_only,
    CandidateRecord, CanonicalKey, CanonicalMode, Canonicalizer,
};
pub use enumerator::{CompletionEnumerator, COMPLETE_GRID_COUNT};
pub use error::{Error, Result};
pub use grid::Grid;
pub use pipeline::{
    ClassSummary, Classification, FullClassSummary, Pipeline, PipelineConfig, PipelineReport,
    TraceReport,
};
pub use symmetry::{
    GeometryGroup, GeometryTransform, LabelGroup, LabelPermutation, FULL_SYMMETRY_COUNT,
    GEOMETRY_TRANSFORM_COUNT, LABEL_PERMUTATION_COUNT,
};
