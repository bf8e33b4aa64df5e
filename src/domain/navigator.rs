/// Navigator entity and the per-tick input snapshot.
///
/// Orientation convention (top-down, +z pointing down the map):
///   forward = (cos yaw, sin yaw), right = (-sin yaw, cos yaw)
/// so yaw grows clockwise on the map. Pitch is clamped to [-pi/2, pi/2].

use std::f32::consts::{FRAC_PI_2, TAU};

use super::collision::Vec2;

/// Session state machine. `Won` is terminal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionState {
    Exploring,
    Won,
}

/// Digital keys and analog stick for one tick.
/// Stick y positive = forward, x positive = strafe right.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionInput {
    pub forward: bool,
    pub back: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub stick_x: f32,
    pub stick_y: f32,
}

/// Orientation change for one tick, in radians, already scaled by the
/// device that produced it. Positive yaw turns right, positive pitch
/// looks up.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LookDelta {
    pub yaw: f32,
    pub pitch: f32,
}

/// Everything the input collaborators hand the core for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickInput {
    pub motion: MotionInput,
    pub look: LookDelta,
}

#[derive(Clone, Debug)]
pub struct Navigator {
    pub position: Vec2,
    pub yaw: f32,
    pub pitch: f32,
    pub radius: f32,
    pub state: SessionState,
}

impl Navigator {
    /// Centre of cell (0, 0), facing +z.
    pub fn at_start(cell_size: f32, radius: f32) -> Self {
        Navigator {
            position: Vec2::new(cell_size / 2.0, cell_size / 2.0),
            yaw: FRAC_PI_2,
            pitch: 0.0,
            radius,
            state: SessionState::Exploring,
        }
    }

    pub fn forward(&self) -> Vec2 {
        Vec2::new(self.yaw.cos(), self.yaw.sin())
    }

    pub fn right(&self) -> Vec2 {
        Vec2::new(-self.yaw.sin(), self.yaw.cos())
    }

    /// Apply a look delta: yaw wraps into [0, 2pi), pitch clamps.
    pub fn look(&mut self, delta: LookDelta) {
        self.yaw = (self.yaw + delta.yaw).rem_euclid(TAU);
        self.pitch = (self.pitch + delta.pitch).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Grid cell (row, col) under the centre, by floor division.
    /// Can be negative only if the navigator was placed outside the grid.
    pub fn cell(&self, cell_size: f32) -> (i64, i64) {
        (
            (self.position.z / cell_size).floor() as i64,
            (self.position.x / cell_size).floor() as i64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_centred_in_origin_cell_facing_plus_z() {
        let n = Navigator::at_start(2.0, 0.5);
        assert_eq!(n.position, Vec2::new(1.0, 1.0));
        assert_eq!(n.state, SessionState::Exploring);
        let f = n.forward();
        assert!(f.x.abs() < 1e-6 && (f.z - 1.0).abs() < 1e-6);
        assert_eq!(n.cell(2.0), (0, 0));
    }

    #[test]
    fn right_is_clockwise_of_forward() {
        let mut n = Navigator::at_start(1.0, 0.25);
        n.yaw = 0.0;
        let r = n.right();
        assert!(r.x.abs() < 1e-6 && (r.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn pitch_clamps_and_yaw_wraps() {
        let mut n = Navigator::at_start(1.0, 0.25);
        n.look(LookDelta { yaw: TAU, pitch: 10.0 });
        assert_eq!(n.pitch, FRAC_PI_2);
        assert!((n.yaw - FRAC_PI_2).abs() < 1e-5);
        n.look(LookDelta { yaw: -4.0 * TAU, pitch: -20.0 });
        assert_eq!(n.pitch, -FRAC_PI_2);
        assert!(n.yaw >= 0.0 && n.yaw < TAU);
    }
}
