/// Axis-separated collision for a circular navigator on the maze grid.
///
/// ## Model
///
/// The navigator is a circle of `radius` on the horizontal (x, z) plane.
/// Instead of a full circle-vs-cell test, each moving axis samples the two
/// leading corners of the circle's bounding square:
///
/// ```text
///   moving +x:   (cx + r, z - r)  and  (cx + r, z + r)
///   moving -z:   (x - r, cz - r)  and  (x + r, cz - r)
/// ```
///
/// where `cx` / `cz` is the candidate centre after the full axis move.
///
/// ## Resolution order
///
/// X is resolved first, then Z using the already-updated X. A blocked X
/// move therefore still lets Z advance, which is what makes the navigator
/// slide along walls on diagonal input.
///
/// A sample outside the grid counts as blocked. Zero motion on an axis is
/// `Idle`: nothing is tested. At most 4 cell lookups per call.

use super::grid::Grid;

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Vec2 {
    pub x: f32,
    pub z: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, z: 0.0 };

    pub fn new(x: f32, z: f32) -> Self {
        Vec2 { x, z }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Axis {
    X,
    Z,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AxisOutcome {
    /// No displacement on this axis.
    Idle,
    Accepted,
    Blocked,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Resolution {
    pub position: Vec2,
    pub x: AxisOutcome,
    pub z: AxisOutcome,
}

impl Resolution {
    pub fn outcome(&self, axis: Axis) -> AxisOutcome {
        match axis {
            Axis::X => self.x,
            Axis::Z => self.z,
        }
    }

    pub fn blocked_axes(&self) -> impl Iterator<Item = Axis> + '_ {
        [Axis::X, Axis::Z]
            .into_iter()
            .filter(move |&a| self.outcome(a) == AxisOutcome::Blocked)
    }
}

/// Is the world point on a Path cell inside the grid?
#[inline]
fn is_open(grid: &Grid, x: f32, z: f32, cell_size: f32) -> bool {
    grid.cell_at_world(x, z, cell_size).map_or(false, |c| c.is_path())
}

/// Would the navigator's leading edge be clear with its centre at
/// `centre`, moving in direction `sign` along `axis`?
#[inline]
pub fn leading_edge_clear(grid: &Grid, centre: Vec2, axis: Axis, sign: f32, radius: f32, cell_size: f32) -> bool {
    match axis {
        Axis::X => {
            let lead = centre.x + sign * radius;
            is_open(grid, lead, centre.z + radius, cell_size)
                && is_open(grid, lead, centre.z - radius, cell_size)
        }
        Axis::Z => {
            let lead = centre.z + sign * radius;
            is_open(grid, centre.x + radius, lead, cell_size)
                && is_open(grid, centre.x - radius, lead, cell_size)
        }
    }
}

fn resolve_axis(grid: &Grid, pos: &mut Vec2, axis: Axis, delta: f32, radius: f32, cell_size: f32) -> AxisOutcome {
    if delta == 0.0 {
        return AxisOutcome::Idle;
    }

    let mut candidate = *pos;
    match axis {
        Axis::X => candidate.x += delta,
        Axis::Z => candidate.z += delta,
    }

    if leading_edge_clear(grid, candidate, axis, delta.signum(), radius, cell_size) {
        *pos = candidate;
        AxisOutcome::Accepted
    } else {
        AxisOutcome::Blocked
    }
}

/// Resolve `displacement` from `position` against the grid.
pub fn resolve(grid: &Grid, position: Vec2, displacement: Vec2, radius: f32, cell_size: f32) -> Resolution {
    let mut pos = position;
    let x = resolve_axis(grid, &mut pos, Axis::X, displacement.x, radius, cell_size);
    let z = resolve_axis(grid, &mut pos, Axis::Z, displacement.z, radius, cell_size);
    Resolution { position: pos, x, z }
}
