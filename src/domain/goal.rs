/// Goal selection: corner candidates with a deterministic fallback.
///
/// Candidates, in order (coordinates saturate at 0 on tiny grids):
///   1. (rows-1, cols-2)
///   2. (rows-2, cols-1)
///   3. the bottom-right lattice-aligned cell: each axis takes `n-1` when
///      `n` is odd and `n-2` when it is even
///
/// The first Path candidate wins. When none is Path the last candidate is
/// returned anyway and flagged `degenerate`; renderers omit the marker for
/// it and the win predicate stays well-defined.

use super::grid::Grid;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GoalCell {
    pub row: usize,
    pub col: usize,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GoalSelection {
    pub cell: GoalCell,
    /// No candidate was Path; `cell` is the last fallback.
    pub degenerate: bool,
}

/// The ordered candidate list for a grid of the given size.
pub fn goal_candidates(rows: usize, cols: usize) -> [GoalCell; 3] {
    let lattice_edge = |n: usize| n.saturating_sub(if n % 2 == 0 { 2 } else { 1 });
    [
        GoalCell { row: rows.saturating_sub(1), col: cols.saturating_sub(2) },
        GoalCell { row: rows.saturating_sub(2), col: cols.saturating_sub(1) },
        GoalCell { row: lattice_edge(rows), col: lattice_edge(cols) },
    ]
}

pub fn select_goal(grid: &Grid) -> GoalSelection {
    let candidates = goal_candidates(grid.rows(), grid.cols());

    if let Some(&cell) = candidates.iter().find(|g| grid.is_path(g.row, g.col)) {
        return GoalSelection { cell, degenerate: false };
    }

    let cell = candidates[candidates.len() - 1];
    log::warn!(
        "no goal candidate is a path cell; falling back to wall cell ({}, {})",
        cell.row, cell.col,
    );
    GoalSelection { cell, degenerate: true }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::generate::generate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn candidates_follow_corner_order() {
        let c = goal_candidates(15, 21);
        assert_eq!(c[0], GoalCell { row: 14, col: 19 });
        assert_eq!(c[1], GoalCell { row: 13, col: 20 });
        assert_eq!(c[2], GoalCell { row: 14, col: 20 });
    }

    #[test]
    fn even_dimensions_shift_fallback_onto_lattice() {
        let c = goal_candidates(10, 8);
        assert_eq!(c[2], GoalCell { row: 8, col: 6 });
    }

    #[test]
    fn tiny_grids_saturate_at_zero() {
        let c = goal_candidates(1, 1);
        assert!(c.iter().all(|g| *g == GoalCell { row: 0, col: 0 }));
    }

    #[test]
    fn first_path_candidate_wins() {
        // (2,1) is Path: candidate 1 for a 3x3 grid.
        let g = Grid::from_ascii(&["   ", "# #", "   "]).unwrap();
        let sel = select_goal(&g);
        assert_eq!(sel, GoalSelection { cell: GoalCell { row: 2, col: 1 }, degenerate: false });
    }

    #[test]
    fn second_candidate_used_when_first_is_wall() {
        let g = Grid::from_ascii(&["   ", "   ", " ##"]).unwrap();
        let sel = select_goal(&g);
        assert_eq!(sel.cell, GoalCell { row: 1, col: 2 });
        assert!(!sel.degenerate);
    }

    #[test]
    fn all_wall_candidates_are_degenerate() {
        let g = Grid::from_ascii(&["   ", "  #", " ##"]).unwrap();
        let sel = select_goal(&g);
        assert!(sel.degenerate);
        assert_eq!(sel.cell, GoalCell { row: 2, col: 2 });
    }

    #[test]
    fn generated_odd_mazes_get_a_path_goal() {
        for seed in 0..20 {
            let g = generate(15, 21, &mut StdRng::seed_from_u64(seed)).unwrap();
            let sel = select_goal(&g);
            assert!(!sel.degenerate);
            assert!(g.is_path(sel.cell.row, sel.cell.col));
        }
    }

    #[test]
    fn single_cell_goal_is_the_origin() {
        let g = generate(1, 1, &mut StdRng::seed_from_u64(0)).unwrap();
        let sel = select_goal(&g);
        assert_eq!(sel, GoalSelection { cell: GoalCell { row: 0, col: 0 }, degenerate: false });
    }
}
