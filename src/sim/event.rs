/// Events emitted during a session step.
/// The presentation layer consumes these for messages and sound.

use crate::domain::collision::Axis;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    /// Movement along `axis` was rejected by a wall or the grid edge.
    Bumped { axis: Axis },
    /// The navigator entered the goal cell. Emitted once per session.
    GoalReached,
}
