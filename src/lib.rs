/// Maze walkthrough core: generation, goal selection, collision and the
/// per-tick navigator session. Presentation lives in the binary (`src/ui`).

pub mod config;
pub mod domain;
pub mod sim;
