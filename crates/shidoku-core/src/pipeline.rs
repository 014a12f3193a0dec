//! End-to-end run: enumerate, bucket by relabeling, then by full symmetry.

use crate::buckets::{BucketMap, EquivalenceBucketBuilder};
use crate::canonical::{CandidateRecord, CanonicalKey, Canonicalizer};
use crate::enumerator::{CompletionEnumerator, COMPLETE_GRID_COUNT};
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::symmetry::{GeometryGroup, LabelGroup};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info, instrument};

/// Configuration for a pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Re-check validity, closure and key invariance over the whole universe
    pub verify_invariants: bool,
    /// Relabel representative whose full candidate list is traced
    pub trace_representative: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            verify_invariants: false,
            trace_representative: None,
        }
    }
}

impl PipelineConfig {
    pub fn verified() -> Self {
        Self {
            verify_invariants: true,
            ..Self::default()
        }
    }

    pub fn traced(representative: usize) -> Self {
        Self {
            trace_representative: Some(representative),
            ..Self::default()
        }
    }
}

/// A relabel-only class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSummary {
    pub key: CanonicalKey,
    pub size: usize,
}

/// A full-symmetry class and the relabel classes it absorbs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullClassSummary {
    pub key: CanonicalKey,
    pub size: usize,
    pub relabel_classes: Vec<CanonicalKey>,
}

/// Every candidate of one representative's full canonicalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceReport {
    pub index: usize,
    pub representative: Grid,
    pub best: CanonicalKey,
    pub candidates: Vec<CandidateRecord>,
}

/// Outcome of a pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub solution_count: usize,
    pub relabel_class_count: usize,
    pub full_class_count: usize,
    pub relabel_classes: Vec<ClassSummary>,
    pub full_classes: Vec<FullClassSummary>,
    /// Whether the invariant checks ran (and passed)
    pub verified: bool,
    pub trace: Option<TraceReport>,
}

/// Both canonical keys of a single complete grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub grid: Grid,
    pub relabel_key: CanonicalKey,
    pub full_key: CanonicalKey,
}

/// Pipeline runner owning the group tables for one run
pub struct Pipeline {
    config: PipelineConfig,
    geometry: GeometryGroup,
    labels: LabelGroup,
    enumerator: CompletionEnumerator,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            config,
            geometry: GeometryGroup::enumerate_all(),
            labels: LabelGroup::enumerate_all(),
            enumerator: CompletionEnumerator::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn canonicalizer(&self) -> Canonicalizer<'_> {
        Canonicalizer::new(&self.geometry, &self.labels)
    }

    /// Canonicalize one complete grid under both symmetry sets
    pub fn classify(&self, grid: &Grid) -> Result<Classification> {
        if !grid.is_valid(false) {
            return Err(Error::NotComplete {
                grid: grid.serialize(),
            });
        }
        let canon = self.canonicalizer();
        Ok(Classification {
            grid: *grid,
            relabel_key: canon.relabel_only(grid).0,
            full_key: canon.full(grid),
        })
    }

    /// Run every stage and assemble the report
    #[instrument(skip_all, fields(verify = self.config.verify_invariants))]
    pub fn run(&self) -> Result<PipelineReport> {
        let canon = self.canonicalizer();

        let solutions = self.enumerator.enumerate();
        info!(solutions = solutions.len(), "enumerated complete grids");
        if self.config.verify_invariants {
            verify_solutions(&solutions)?;
        }

        let relabel = EquivalenceBucketBuilder::build(&solutions, |g| canon.relabel_only(g).0);
        let representatives = relabel.canonical_grids();
        info!(classes = relabel.len(), "bucketed by relabeling");

        let full_direct = EquivalenceBucketBuilder::build(&solutions, |g| canon.full(g));
        let full_staged = EquivalenceBucketBuilder::build(&representatives, |g| canon.full(g));
        check_paths_agree(&full_direct, &full_staged)?;
        info!(classes = full_direct.len(), "bucketed by full symmetry");

        if self.config.verify_invariants {
            self.verify_invariance(&full_direct)?;
        }

        let trace = match self.config.trace_representative {
            Some(index) => Some(self.trace(&representatives, index)?),
            None => None,
        };

        Ok(PipelineReport {
            solution_count: solutions.len(),
            relabel_class_count: relabel.len(),
            full_class_count: full_direct.len(),
            relabel_classes: relabel
                .iter()
                .map(|b| ClassSummary {
                    key: b.key,
                    size: b.len(),
                })
                .collect(),
            full_classes: full_direct
                .iter()
                .map(|b| FullClassSummary {
                    key: b.key,
                    size: b.len(),
                    relabel_classes: full_staged
                        .get(&b.key)
                        .map(|staged| staged.grids.iter().map(CanonicalKey::of).collect())
                        .unwrap_or_default(),
                })
                .collect(),
            verified: self.config.verify_invariants,
            trace,
        })
    }

    fn trace(&self, representatives: &[Grid], index: usize) -> Result<TraceReport> {
        let representative = *representatives
            .get(index)
            .ok_or(Error::TraceIndexOutOfRange {
                index,
                available: representatives.len(),
            })?;
        let (best, candidates) = self.canonicalizer().full_trace(&representative);
        debug!(index, candidates = candidates.len(), best = %best, "traced representative");
        Ok(TraceReport {
            index,
            representative,
            best,
            candidates,
        })
    }

    /// Every group image of every solution is a solution with the same key
    fn verify_invariance(&self, full: &BucketMap) -> Result<()> {
        let key_of: HashMap<Grid, CanonicalKey> = full
            .iter()
            .flat_map(|b| b.grids.iter().map(move |g| (*g, b.key)))
            .collect();

        for (grid, key) in &key_of {
            for geo in self.geometry.iter() {
                let moved = geo.apply(grid);
                for perm in self.labels.iter() {
                    let image = perm.apply(&moved);
                    match key_of.get(&image) {
                        None => {
                            return Err(Error::invariant(format!(
                                "{} under {} then {} left the solution set",
                                grid.serialize(),
                                geo,
                                perm
                            )))
                        }
                        Some(other) if other != key => {
                            return Err(Error::invariant(format!(
                                "{} under {} then {} changed key {} to {}",
                                grid.serialize(),
                                geo,
                                perm,
                                key,
                                other
                            )))
                        }
                        Some(_) => {}
                    }
                }
            }
        }
        debug!(grids = key_of.len(), "canonical keys invariant under both groups");
        Ok(())
    }
}

fn verify_solutions(solutions: &[Grid]) -> Result<()> {
    if solutions.len() != COMPLETE_GRID_COUNT {
        return Err(Error::invariant(format!(
            "expected {} complete grids, enumerated {}",
            COMPLETE_GRID_COUNT,
            solutions.len()
        )));
    }
    let mut seen = HashSet::with_capacity(solutions.len());
    for grid in solutions {
        if !grid.is_valid(false) {
            return Err(Error::invariant(format!(
                "enumerated grid {} is not a valid complete grid",
                grid.serialize()
            )));
        }
        if !seen.insert(*grid) {
            return Err(Error::invariant(format!(
                "enumerated grid {} twice",
                grid.serialize()
            )));
        }
    }
    Ok(())
}

fn check_paths_agree(direct: &BucketMap, staged: &BucketMap) -> Result<()> {
    let direct_keys: BTreeSet<_> = direct.keys().collect();
    let staged_keys: BTreeSet<_> = staged.keys().collect();
    if direct_keys == staged_keys {
        return Ok(());
    }
    let list = |keys: Vec<&&CanonicalKey>| {
        keys.iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    Err(Error::invariant(format!(
        "direct and staged full classes differ: only direct [{}], only staged [{}]",
        list(direct_keys.difference(&staged_keys).collect()),
        list(staged_keys.difference(&direct_keys).collect())
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_run_counts() {
        let report = Pipeline::new().run().unwrap();
        assert_eq!(report.solution_count, 288);
        assert_eq!(report.relabel_class_count, 12);
        assert_eq!(report.full_class_count, 2);
        assert!(!report.verified);
        assert!(report.trace.is_none());
    }

    #[test]
    fn test_class_sizes() {
        let report = Pipeline::new().run().unwrap();
        // Relabeling acts freely: every nontrivial permutation moves row 0
        assert!(report.relabel_classes.iter().all(|c| c.size == 24));
        let total: usize = report.full_classes.iter().map(|c| c.size).sum();
        assert_eq!(total, 288);

        let absorbed: usize = report
            .full_classes
            .iter()
            .map(|c| c.relabel_classes.len())
            .sum();
        assert_eq!(absorbed, 12);
        for class in &report.full_classes {
            assert_eq!(class.size, class.relabel_classes.len() * 24);
        }
    }

    #[test]
    fn test_verified_run() {
        let report = Pipeline::with_config(PipelineConfig::verified())
            .run()
            .unwrap();
        assert!(report.verified);
        assert_eq!(report.full_class_count, 2);
    }

    #[test]
    fn test_traced_run() {
        let report = Pipeline::with_config(PipelineConfig::traced(3)).run().unwrap();
        let trace = report.trace.unwrap();
        assert_eq!(trace.index, 3);
        assert_eq!(trace.candidates.len(), 3072);
        assert_eq!(trace.candidates.iter().filter(|c| c.is_best).count(), 1);
        assert!(report.full_classes.iter().any(|c| c.key == trace.best));
    }

    #[test]
    fn test_trace_index_out_of_range() {
        let err = Pipeline::with_config(PipelineConfig::traced(12))
            .run()
            .unwrap_err();
        assert_eq!(
            err,
            Error::TraceIndexOutOfRange {
                index: 12,
                available: 12
            }
        );
    }

    #[test]
    fn test_path_mismatch_names_keys() {
        let a = Grid::from_string("1234341221434321").unwrap();
        let b = Grid::from_string("1234341223414123").unwrap();
        let c = Grid::from_string("1234342121434312").unwrap();

        let mut direct = BucketMap::new();
        direct.insert(CanonicalKey::of(&a), a);
        direct.insert(CanonicalKey::of(&b), b);
        let mut staged = BucketMap::new();
        staged.insert(CanonicalKey::of(&a), a);
        staged.insert(CanonicalKey::of(&c), c);

        match check_paths_agree(&direct, &staged) {
            Err(Error::InvariantViolation { message }) => {
                assert!(message.contains("only direct [1234341223414123]"), "{}", message);
                assert!(message.contains("only staged [1234342121434312]"), "{}", message);
                assert!(!message.contains("1234341221434321"), "{}", message);
            }
            other => panic!("expected invariant violation, got {:?}", other),
        }
        assert!(check_paths_agree(&direct, &direct).is_ok());
    }

    #[test]
    fn test_classify() {
        let pipeline = Pipeline::new();
        let grid = Grid::from_string("4321214334121234").unwrap();
        let c = pipeline.classify(&grid).unwrap();
        assert_eq!(c.relabel_key.grid().row_values(0), [1, 2, 3, 4]);
        assert!(c.full_key <= c.relabel_key);

        let partial = Grid::from_string("1234............").unwrap();
        assert!(matches!(
            pipeline.classify(&partial),
            Err(Error::NotComplete { .. })
        ));
    }

    #[test]
    fn test_report_serde_round_trip() {
        let report = Pipeline::new().run().unwrap();
        let json = serde_json::to_string(&report).unwrap();
        let back: PipelineReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
