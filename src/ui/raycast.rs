/// Ray marching through the maze grid for the first-person view.
///
/// Rays advance in small fixed steps from the eye until they land in a
/// Wall cell or leave the grid. Leaving the grid counts as a hit so the
/// maze border always renders as a wall.

use mazewalk::domain::collision::Vec2;
use mazewalk::domain::grid::Grid;

/// Fraction of a cell advanced per march step.
const STEP_FRACTION: f32 = 1.0 / 48.0;

/// Which family of faces the ray struck.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Face {
    /// Face perpendicular to x (ray crossed a column boundary).
    EastWest,
    /// Face perpendicular to z (ray crossed a row boundary).
    NorthSouth,
}

#[derive(Clone, Copy, Debug)]
pub struct Hit {
    /// Euclidean distance from the eye to the hit point.
    pub distance: f32,
    pub face: Face,
}

pub fn cast_ray(grid: &Grid, eye: Vec2, angle: f32, cell_size: f32, max_distance: f32) -> Hit {
    let (dx, dz) = (angle.cos(), angle.sin());
    let step = cell_size * STEP_FRACTION;
    let mut prev = cell_of(eye, cell_size);
    let mut d = 0.0;

    while d < max_distance {
        let last = d;
        d += step;
        let here = cell_of(Vec2::new(eye.x + dx * d, eye.z + dz * d), cell_size);
        if here == prev {
            continue;
        }

        if here.0 != prev.0 && here.1 != prev.1 {
            // Crossed a corner in one step: visit the cell entered first.
            let from = Vec2::new(eye.x + dx * last, eye.z + dz * last);
            let column_first = boundary_t(from.x, dx, prev.1, cell_size) < boundary_t(from.z, dz, prev.0, cell_size);
            let (between, face) = if column_first {
                ((prev.0, here.1), Face::EastWest)
            } else {
                ((here.0, prev.1), Face::NorthSouth)
            };
            if blocked(grid, between) {
                return Hit { distance: d, face };
            }
            let face = if column_first { Face::NorthSouth } else { Face::EastWest };
            if blocked(grid, here) {
                return Hit { distance: d, face };
            }
        } else if blocked(grid, here) {
            let face = if here.1 != prev.1 { Face::EastWest } else { Face::NorthSouth };
            return Hit { distance: d, face };
        }
        prev = here;
    }

    Hit { distance: max_distance, face: Face::NorthSouth }
}

fn blocked(grid: &Grid, (row, col): (i64, i64)) -> bool {
    match (usize::try_from(row), usize::try_from(col)) {
        (Ok(r), Ok(c)) => !grid.is_path(r, c),
        _ => true,
    }
}

/// Distance along one axis from `pos` to the edge of cell `index` the ray
/// is heading toward, in units of the direction component.
fn boundary_t(pos: f32, dir: f32, index: i64, cell_size: f32) -> f32 {
    if dir > 0.0 {
        ((index + 1) as f32 * cell_size - pos) / dir
    } else if dir < 0.0 {
        (index as f32 * cell_size - pos) / dir
    } else {
        f32::INFINITY
    }
}

/// (row, col) by floor division; may be negative.
fn cell_of(p: Vec2, cell_size: f32) -> (i64, i64) {
    ((p.z / cell_size).floor() as i64, (p.x / cell_size).floor() as i64)
}
