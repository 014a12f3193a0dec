//! Canonical forms under relabeling and under relabeling combined with
//! geometry.
//!
//! A canonical key is the smallest serialization reachable from a grid by the
//! chosen symmetry set. Grids compare row-major, which is exactly the order of
//! their serializations, so the minimum is tracked on grids and serialized
//! once at the end.

use crate::grid::Grid;
use crate::symmetry::{GeometryGroup, GeometryTransform, LabelGroup, LabelPermutation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an equivalence class; displays as its 16-digit serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalKey(Grid);

impl CanonicalKey {
    /// The key of a grid that is already in canonical form
    pub fn of(grid: &Grid) -> Self {
        Self(*grid)
    }

    /// The canonical grid itself
    pub fn grid(&self) -> &Grid {
        &self.0
    }

    pub fn serialize(&self) -> String {
        self.0.serialize()
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.serialize())
    }
}

/// Which symmetry set a key is computed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalMode {
    /// Digit permutations only (24 elements)
    RelabelOnly,
    /// Geometry transforms crossed with digit permutations (3072 elements)
    Full,
}

impl fmt::Display for CanonicalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonicalMode::RelabelOnly => write!(f, "relabel-only"),
            CanonicalMode::Full => write!(f, "full"),
        }
    }
}

/// One (geometry, permutation) candidate seen while canonicalizing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub geometry: String,
    pub permutation: String,
    pub serialized: String,
    /// First candidate to reach the overall minimum
    pub is_best: bool,
}

// ==================== Free functions ====================

/// Minimum over all relabelings of `grid`, with the grid that produced it.
///
/// Ties keep the first permutation in enumeration order. An empty permutation
/// set leaves the grid as its own key.
pub fn canonical_relabel_only(grid: &Grid, perms: &[LabelPermutation]) -> (CanonicalKey, Grid) {
    let mut best = *grid;
    let mut found = false;
    for perm in perms {
        let image = perm.apply(grid);
        if !found || image < best {
            best = image;
            found = true;
        }
    }
    (CanonicalKey(best), best)
}

/// Minimum over every geometry (outer) then relabel (inner) image of `grid`
pub fn canonical_full(
    grid: &Grid,
    geos: &[GeometryTransform],
    perms: &[LabelPermutation],
) -> CanonicalKey {
    canonical_full_with(grid, geos, perms, |_, _, _| {})
}

/// [`canonical_full`] with an observer called for every candidate image
pub fn canonical_full_with<F>(
    grid: &Grid,
    geos: &[GeometryTransform],
    perms: &[LabelPermutation],
    mut observe: F,
) -> CanonicalKey
where
    F: FnMut(&GeometryTransform, &LabelPermutation, &Grid),
{
    let mut best: Option<Grid> = None;
    for geo in geos {
        let moved = geo.apply(grid);
        for perm in perms {
            let image = perm.apply(&moved);
            observe(geo, perm, &image);
            if best.map_or(true, |b| image < b) {
                best = Some(image);
            }
        }
    }
    CanonicalKey(best.unwrap_or(*grid))
}

/// Every candidate of the full canonicalization, with the winner flagged
pub fn canonical_full_trace(
    grid: &Grid,
    geos: &[GeometryTransform],
    perms: &[LabelPermutation],
) -> (CanonicalKey, Vec<CandidateRecord>) {
    let mut records = Vec::with_capacity(geos.len() * perms.len());
    let mut best_index: Option<usize> = None;
    let mut best: Option<Grid> = None;

    let key = canonical_full_with(grid, geos, perms, |geo, perm, image| {
        if best.map_or(true, |b| *image < b) {
            best = Some(*image);
            best_index = Some(records.len());
        }
        records.push(CandidateRecord {
            geometry: geo.label(),
            permutation: perm.label(),
            serialized: image.serialize(),
            is_best: false,
        });
    });

    if let Some(record) = best_index.and_then(|i| records.get_mut(i)) {
        record.is_best = true;
    }
    (key, records)
}

// ==================== Canonicalizer ====================

/// Canonicalizer bound to a pair of prebuilt group tables
#[derive(Debug, Clone, Copy)]
pub struct Canonicalizer<'a> {
    geometry: &'a GeometryGroup,
    labels: &'a LabelGroup,
}

impl<'a> Canonicalizer<'a> {
    pub fn new(geometry: &'a GeometryGroup, labels: &'a LabelGroup) -> Self {
        Self { geometry, labels }
    }

    pub fn relabel_only(&self, grid: &Grid) -> (CanonicalKey, Grid) {
        canonical_relabel_only(grid, self.labels.permutations())
    }

    pub fn full(&self, grid: &Grid) -> CanonicalKey {
        canonical_full(grid, self.geometry.transforms(), self.labels.permutations())
    }

    pub fn full_trace(&self, grid: &Grid) -> (CanonicalKey, Vec<CandidateRecord>) {
        canonical_full_trace(grid, self.geometry.transforms(), self.labels.permutations())
    }

    pub fn key(&self, grid: &Grid, mode: CanonicalMode) -> CanonicalKey {
        match mode {
            CanonicalMode::RelabelOnly => self.relabel_only(grid).0,
            CanonicalMode::Full => self.full(grid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symmetry::FULL_SYMMETRY_COUNT;

    fn sample() -> Grid {
        Grid::from_string("1234341221434321").unwrap()
    }

    #[test]
    fn test_relabel_only_normalizes_first_row() {
        let labels = LabelGroup::enumerate_all();
        let grid = Grid::from_string("4321214334121234").unwrap();
        let (key, rep) = canonical_relabel_only(&grid, labels.permutations());
        assert_eq!(rep.row_values(0), [1, 2, 3, 4]);
        assert_eq!(key.grid(), &rep);
        assert_eq!(key.to_string(), rep.serialize());
    }

    #[test]
    fn test_relabel_only_is_invariant() {
        let labels = LabelGroup::enumerate_all();
        let (key, _) = canonical_relabel_only(&sample(), labels.permutations());
        for perm in labels.iter() {
            let (other, _) = canonical_relabel_only(&perm.apply(&sample()), labels.permutations());
            assert_eq!(other, key, "relabel by {} changed the key", perm);
        }
    }

    #[test]
    fn test_full_is_invariant_on_sample() {
        let geometry = GeometryGroup::enumerate_all();
        let labels = LabelGroup::enumerate_all();
        let canon = Canonicalizer::new(&geometry, &labels);
        let key = canon.full(&sample());

        // A spread of group elements is enough here; the integration tests
        // cover the whole orbit.
        for geo in geometry.iter().step_by(9) {
            for perm in labels.iter().step_by(5) {
                let image = perm.apply(&geo.apply(&sample()));
                assert_eq!(canon.full(&image), key);
            }
        }
    }

    #[test]
    fn test_full_key_not_above_relabel_key() {
        let geometry = GeometryGroup::enumerate_all();
        let labels = LabelGroup::enumerate_all();
        let canon = Canonicalizer::new(&geometry, &labels);
        let grid = Grid::from_string("2143341212344321").unwrap();
        assert!(canon.full(&grid) <= canon.relabel_only(&grid).0);
        assert_eq!(
            canon.key(&grid, CanonicalMode::RelabelOnly),
            canon.relabel_only(&grid).0
        );
    }

    #[test]
    fn test_trace_flags_single_winner() {
        let geometry = GeometryGroup::enumerate_all();
        let labels = LabelGroup::enumerate_all();
        let canon = Canonicalizer::new(&geometry, &labels);
        let (key, records) = canon.full_trace(&sample());

        assert_eq!(records.len(), FULL_SYMMETRY_COUNT);
        let winners: Vec<_> = records.iter().filter(|r| r.is_best).collect();
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].serialized, key.to_string());
        assert!(records.iter().all(|r| r.serialized >= key.to_string()));

        // The winner is the first record carrying the minimum
        let first_min = records
            .iter()
            .position(|r| r.serialized == key.to_string())
            .unwrap();
        assert!(records[first_min].is_best);
        assert_eq!(canon.full(&sample()), key);
    }

    #[test]
    fn test_trace_first_record_is_identity() {
        let geometry = GeometryGroup::enumerate_all();
        let labels = LabelGroup::enumerate_all();
        let (_, records) = Canonicalizer::new(&geometry, &labels).full_trace(&sample());
        assert_eq!(records[0].geometry, "id");
        assert_eq!(records[0].permutation, "1234");
        assert_eq!(records[0].serialized, sample().serialize());
    }

    #[test]
    fn test_observer_sees_every_candidate() {
        let geos = GeometryTransform::all();
        let perms = LabelPermutation::all();
        let mut seen = 0;
        canonical_full_with(&sample(), &geos, &perms, |_, _, image| {
            assert!(image.is_valid(false));
            seen += 1;
        });
        assert_eq!(seen, geos.len() * perms.len());
    }

    #[test]
    fn test_empty_groups_fall_back_to_grid() {
        let grid = sample();
        assert_eq!(canonical_full(&grid, &[], &[]), CanonicalKey::of(&grid));
        assert_eq!(canonical_relabel_only(&grid, &[]).1, grid);
    }

    #[test]
    fn test_key_serde_is_string() {
        let key = CanonicalKey::of(&sample());
        assert_eq!(
            serde_json::to_string(&key).unwrap(),
            "\"1234341221434321\""
        );
    }
}
