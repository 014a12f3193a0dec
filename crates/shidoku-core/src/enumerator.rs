//! Backtracking search over the 16 cells in row-major order.

use crate::grid::{Grid, CELL_COUNT, MAX_DIGIT, SIZE};
use std::collections::HashSet;
use tracing::debug;

/// Number of complete 4x4 grids
pub const COMPLETE_GRID_COUNT: usize = 288;

/// Unit struct enumerator, stateless; all state is per-call.
pub struct CompletionEnumerator;

impl Default for CompletionEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionEnumerator {
    pub fn new() -> Self {
        Self
    }

    /// Every complete grid, in discovery order
    pub fn enumerate(&self) -> Vec<Grid> {
        self.complete(&Grid::new())
    }

    /// Every completion of a partial grid, in discovery order.
    ///
    /// Filled cells are kept as given. An inconsistent starting grid has no
    /// completions.
    pub fn complete(&self, partial: &Grid) -> Vec<Grid> {
        let mut collector = Collector::default();
        if partial.is_valid(true) {
            let mut working = *partial;
            self.search(&mut working, 0, &mut |grid: &Grid| collector.record(grid));
        }
        debug!(
            start = %partial.serialize(),
            solutions = collector.solutions.len(),
            duplicates = collector.duplicates,
            "completion search finished"
        );
        collector.solutions
    }

    /// Count completions, stopping once `limit` is reached
    pub fn count_completions(&self, partial: &Grid, limit: usize) -> usize {
        if !partial.is_valid(true) {
            return 0;
        }
        let mut working = *partial;
        let mut count = 0;
        self.count_recursive(&mut working, 0, &mut count, limit);
        count
    }

    // ==================== Backtracking ====================

    fn search(&self, grid: &mut Grid, index: usize, on_solution: &mut impl FnMut(&Grid)) {
        if index == CELL_COUNT {
            on_solution(grid);
            return;
        }

        let (row, col) = (index / SIZE, index % SIZE);
        if grid.get(row, col) != 0 {
            self.search(grid, index + 1, on_solution);
            return;
        }

        for value in 1..=MAX_DIGIT {
            grid.set(row, col, value);
            // Everything outside this cell's row, column and box was already
            // checked on the way down.
            if grid.is_consistent_at(row, col) {
                self.search(grid, index + 1, on_solution);
            }
            grid.set(row, col, 0);
        }
    }

    fn count_recursive(&self, grid: &mut Grid, index: usize, count: &mut usize, limit: usize) {
        if *count >= limit {
            return;
        }
        if index == CELL_COUNT {
            *count += 1;
            return;
        }

        let (row, col) = (index / SIZE, index % SIZE);
        if grid.get(row, col) != 0 {
            self.count_recursive(grid, index + 1, count, limit);
            return;
        }

        for value in 1..=MAX_DIGIT {
            if *count >= limit {
                break;
            }
            grid.set(row, col, value);
            if grid.is_consistent_at(row, col) {
                self.count_recursive(grid, index + 1, count, limit);
            }
            grid.set(row, col, 0);
        }
    }
}

/// Ordered solution list with a seen-set safety net
#[derive(Default)]
struct Collector {
    seen: HashSet<Grid>,
    solutions: Vec<Grid>,
    duplicates: usize,
}

impl Collector {
    fn record(&mut self, grid: &Grid) {
        if self.seen.insert(*grid) {
            self.solutions.push(*grid);
        } else {
            self.duplicates += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumerate_count() {
        let solutions = CompletionEnumerator::new().enumerate();
        assert_eq!(solutions.len(), COMPLETE_GRID_COUNT);
    }

    #[test]
    fn test_all_solutions_valid_and_distinct() {
        let solutions = CompletionEnumerator::new().enumerate();
        let keys: HashSet<String> = solutions.iter().map(Grid::serialize).collect();
        assert_eq!(keys.len(), solutions.len());
        for grid in &solutions {
            assert!(grid.is_valid(false), "invalid grid {}", grid.serialize());
        }
    }

    #[test]
    fn test_discovery_order_is_ascending() {
        // Row-major search trying 1..4 at each cell visits leaves in
        // lexicographic order
        let solutions = CompletionEnumerator::new().enumerate();
        assert_eq!(solutions[0].serialize(), "1234341221434321");
        assert!(solutions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_first_row_fixed() {
        let partial = Grid::from_string("1234............").unwrap();
        let enumerator = CompletionEnumerator::new();
        let completions = enumerator.complete(&partial);
        assert_eq!(completions.len(), 12);
        assert!(completions
            .iter()
            .all(|g| g.row_values(0) == [1, 2, 3, 4] && g.is_valid(false)));
        assert_eq!(enumerator.count_completions(&partial, usize::MAX), 12);
    }

    #[test]
    fn test_inconsistent_start_has_no_completions() {
        let partial = Grid::from_string("11..............").unwrap();
        let enumerator = CompletionEnumerator::new();
        assert!(enumerator.complete(&partial).is_empty());
        assert_eq!(enumerator.count_completions(&partial, 10), 0);
    }

    #[test]
    fn test_count_respects_limit() {
        let enumerator = CompletionEnumerator::new();
        assert_eq!(enumerator.count_completions(&Grid::new(), 2), 2);
        assert_eq!(
            enumerator.count_completions(&Grid::new(), usize::MAX),
            COMPLETE_GRID_COUNT
        );
    }

    #[test]
    fn test_complete_grid_completes_to_itself() {
        let grid = Grid::from_string("1234341221434321").unwrap();
        assert_eq!(CompletionEnumerator::new().complete(&grid), vec![grid]);
    }
}
