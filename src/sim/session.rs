/// Session: the complete state of one maze walkthrough.
///
/// ## Ownership
///
///   - `grid`: generated once, never mutated. Lent out as `&Grid`.
///   - `navigator`: mutated only by `step::step`.
///   - `goal`: fixed at construction.
///
/// A new maze means a new `Session`; nothing is reset in place.

use rand::Rng;

use crate::config::NavigatorConfig;
use crate::domain::generate::generate;
use crate::domain::goal::{select_goal, GoalCell, GoalSelection};
use crate::domain::grid::{Grid, GridError};
use crate::domain::navigator::{Navigator, SessionState};

pub struct Session {
    pub(crate) grid: Grid,
    pub(crate) goal: GoalSelection,
    pub(crate) navigator: Navigator,
    pub(crate) tuning: NavigatorConfig,
    pub(crate) tick: u64,
}

impl Session {
    pub fn new(grid: Grid, goal: GoalSelection, tuning: NavigatorConfig) -> Self {
        let navigator = Navigator::at_start(tuning.cell_size, tuning.radius);
        Session { grid, goal, navigator, tuning, tick: 0 }
    }

    /// Generate a maze, pick its goal, and start a session on it.
    pub fn generate<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        rng: &mut R,
        tuning: NavigatorConfig,
    ) -> Result<Self, GridError> {
        let grid = generate(rows, cols, rng)?;
        let goal = select_goal(&grid);
        Ok(Session::new(grid, goal, tuning))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn goal(&self) -> GoalCell {
        self.goal.cell
    }

    /// Should a goal marker be drawn? False for a degenerate (Wall) goal.
    pub fn goal_visible(&self) -> bool {
        self.grid.is_path(self.goal.cell.row, self.goal.cell.col)
    }

    pub fn goal_degenerate(&self) -> bool {
        self.goal.degenerate
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn state(&self) -> SessionState {
        self.navigator.state
    }

    pub fn tuning(&self) -> &NavigatorConfig {
        &self.tuning
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// (row, col) of the cell under the navigator's centre.
    pub fn navigator_cell(&self) -> (i64, i64) {
        self.navigator.cell(self.tuning.cell_size)
    }

    /// Win predicate: the navigator's centre is in the goal cell.
    pub fn at_goal(&self) -> bool {
        let (row, col) = self.navigator_cell();
        row == self.goal.cell.row as i64 && col == self.goal.cell.col as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_session_starts_exploring_at_origin() {
        let s = Session::generate(7, 9, &mut StdRng::seed_from_u64(5), NavigatorConfig::default()).unwrap();
        assert_eq!(s.state(), SessionState::Exploring);
        assert_eq!(s.navigator_cell(), (0, 0));
        assert_eq!(s.tick(), 0);
        assert!(s.goal_visible());
        assert!(!s.goal_degenerate());
        assert!(!s.at_goal());
    }

    #[test]
    fn invalid_dimensions_propagate() {
        let err = Session::generate(0, 3, &mut StdRng::seed_from_u64(0), NavigatorConfig::default());
        assert!(matches!(err, Err(GridError::InvalidDimensions { rows: 0, cols: 3 })));
    }

    #[test]
    fn degenerate_goal_is_not_visible() {
        let grid = Grid::from_ascii(&["   ", "  #", " ##"]).unwrap();
        let goal = select_goal(&grid);
        let s = Session::new(grid, goal, NavigatorConfig::default());
        assert!(s.goal_degenerate());
        assert!(!s.goal_visible());
    }
}
