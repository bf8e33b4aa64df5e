/// Perfect maze generation: iterative randomized depth-first carving.
///
/// ## Lattice
///
/// Lattice nodes are the cells with even row and even column, i.e. the
/// cells reachable from (0, 0) in steps of 2. Carving a step marks the
/// target node and the single corridor cell between the two nodes.
///
/// ## Algorithm
///
///   1. Every cell starts as Wall.
///   2. (0, 0) becomes Path and is pushed on an explicit stack.
///   3. Peek the top node. Collect the distance-2 neighbours that are in
///      bounds and still Wall (unvisited). Pick one uniformly at random,
///      carve it plus the corridor, push it. With no candidates, pop.
///   4. Stop when the stack is empty.
///
/// Each reachable node is visited exactly once, so the carved cells form a
/// spanning tree over the reachable lattice: corridors == nodes - 1.
///
/// Even dimensions are accepted. The last row/column then has no lattice
/// node and stays Wall.

use rand::seq::SliceRandom;
use rand::Rng;

use super::cell::Cell;
use super::grid::{Grid, GridError};

/// The four axis steps as (d_row, d_col) at lattice distance.
const STEPS: [(isize, isize); 4] = [(-2, 0), (0, 2), (2, 0), (0, -2)];

pub fn generate<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Result<Grid, GridError> {
    if rows == 0 || cols == 0 {
        return Err(GridError::InvalidDimensions { rows, cols });
    }

    let mut cells = vec![vec![Cell::Wall; cols]; rows];
    cells[0][0] = Cell::Path;

    let mut stack: Vec<(usize, usize)> = Vec::with_capacity((rows / 2 + 1) * (cols / 2 + 1));
    stack.push((0, 0));
    let mut carved_nodes = 1usize;
    let mut candidates: Vec<(usize, usize)> = Vec::with_capacity(4);

    while let Some(&(r, c)) = stack.last() {
        candidates.clear();
        for (dr, dc) in STEPS {
            let nr = r as isize + dr;
            let nc = c as isize + dc;
            if nr < 0 || nc < 0 || nr >= rows as isize || nc >= cols as isize {
                continue;
            }
            let (nr, nc) = (nr as usize, nc as usize);
            if cells[nr][nc] == Cell::Wall {
                candidates.push((nr, nc));
            }
        }

        match candidates.choose(rng) {
            Some(&(nr, nc)) => {
                cells[nr][nc] = Cell::Path;
                cells[(r + nr) / 2][(c + nc) / 2] = Cell::Path;
                stack.push((nr, nc));
                carved_nodes += 1;
            }
            None => {
                stack.pop();
            }
        }
    }

    log::debug!("generated {rows}x{cols} maze with {carved_nodes} lattice nodes");
    Ok(Grid::from_cells(cells))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    fn seeded(rows: usize, cols: usize, seed: u64) -> Grid {
        generate(rows, cols, &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    /// Path cells reachable from (0,0) under 4-adjacency.
    fn reachable_from_origin(g: &Grid) -> usize {
        let mut seen = vec![vec![false; g.cols()]; g.rows()];
        let mut queue = VecDeque::from([(0usize, 0usize)]);
        seen[0][0] = true;
        let mut count = 0;
        while let Some((r, c)) = queue.pop_front() {
            count += 1;
            let next = [
                (r.wrapping_sub(1), c),
                (r + 1, c),
                (r, c.wrapping_sub(1)),
                (r, c + 1),
            ];
            for (nr, nc) in next {
                if g.is_path(nr, nc) && !seen[nr][nc] {
                    seen[nr][nc] = true;
                    queue.push_back((nr, nc));
                }
            }
        }
        count
    }

    /// Undirected 4-adjacency edges between Path cells.
    fn path_edges(g: &Grid) -> usize {
        let mut edges = 0;
        for r in 0..g.rows() {
            for c in 0..g.cols() {
                if !g.is_path(r, c) { continue; }
                if g.is_path(r + 1, c) { edges += 1; }
                if g.is_path(r, c + 1) { edges += 1; }
            }
        }
        edges
    }

    /// (lattice nodes, corridor cells) that are Path.
    fn nodes_and_corridors(g: &Grid) -> (usize, usize) {
        let mut nodes = 0;
        let mut corridors = 0;
        for r in 0..g.rows() {
            for c in 0..g.cols() {
                if !g.is_path(r, c) { continue; }
                match (r % 2, c % 2) {
                    (0, 0) => nodes += 1,
                    (1, 1) => panic!("cell ({r},{c}) is off the lattice but carved"),
                    _ => corridors += 1,
                }
            }
        }
        (nodes, corridors)
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            generate(0, 5, &mut rng),
            Err(GridError::InvalidDimensions { rows: 0, cols: 5 })
        );
        assert_eq!(
            generate(5, 0, &mut rng),
            Err(GridError::InvalidDimensions { rows: 5, cols: 0 })
        );
    }

    #[test]
    fn single_cell_grid_is_one_path() {
        let g = seeded(1, 1, 3);
        assert_eq!(g.cell(0, 0), Some(Cell::Path));
        assert_eq!(g.path_count(), 1);
    }

    #[test]
    fn five_by_five_seed_42_is_connected_without_islands() {
        let g = seeded(5, 5, 42);
        assert_eq!(g.cell(0, 0), Some(Cell::Path));
        assert_eq!(reachable_from_origin(&g), g.path_count());

        for r in 0..5 {
            for c in 0..5 {
                if !g.is_path(r, c) { continue; }
                let has_neighbour = g.is_path(r.wrapping_sub(1), c)
                    || g.is_path(r + 1, c)
                    || g.is_path(r, c.wrapping_sub(1))
                    || g.is_path(r, c + 1);
                assert!(has_neighbour, "isolated path cell at ({r},{c})\n{g}");
            }
        }
        // Odd dimensions: all 9 lattice nodes get carved.
        assert_eq!(nodes_and_corridors(&g), (9, 8));
    }

    #[test]
    fn same_seed_reproduces_the_same_maze() {
        assert_eq!(seeded(15, 21, 7), seeded(15, 21, 7));
    }

    #[test]
    fn different_seeds_usually_differ() {
        let base = seeded(21, 21, 1);
        assert!((2..10).any(|s| seeded(21, 21, s) != base));
    }

    #[test]
    fn even_dimensions_leave_last_row_and_column_wall() {
        let g = seeded(6, 8, 11);
        assert!((0..8).all(|c| !g.is_path(5, c)));
        assert!((0..6).all(|r| !g.is_path(r, 7)));
        assert_eq!(reachable_from_origin(&g), g.path_count());
    }

    #[test]
    fn single_row_is_a_straight_corridor() {
        let g = seeded(1, 7, 5);
        assert_eq!(g.to_string(), "       ");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn carved_cells_form_a_spanning_tree(rows in 3usize..30, cols in 3usize..30, seed in any::<u64>()) {
            let g = seeded(rows, cols, seed);
            prop_assert_eq!(g.cell(0, 0), Some(Cell::Path));

            let (nodes, corridors) = nodes_and_corridors(&g);
            prop_assert_eq!(corridors, nodes - 1);
            prop_assert_eq!(nodes, ((rows + 1) / 2) * ((cols + 1) / 2));

            prop_assert_eq!(path_edges(&g), g.path_count() - 1);
            prop_assert_eq!(reachable_from_origin(&g), g.path_count());
        }
    }
}
