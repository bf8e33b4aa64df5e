/// Input snapshot -> world-space displacement.
///
/// Pure mapping: devices fill a `MotionInput`, this turns it into the
/// vector handed to the collision resolver. Keys move at `move_speed`;
/// the analog stick is scaled by `analog_factor` on top.

use crate::config::NavigatorConfig;
use crate::domain::collision::Vec2;
use crate::domain::navigator::MotionInput;

pub fn displacement(input: &MotionInput, yaw: f32, tuning: &NavigatorConfig) -> Vec2 {
    let mut along = 0.0; // forward component
    let mut side = 0.0;  // right component

    if input.forward { along += tuning.move_speed; }
    if input.back { along -= tuning.move_speed; }
    if input.strafe_right { side += tuning.move_speed; }
    if input.strafe_left { side -= tuning.move_speed; }

    let analog = tuning.move_speed * tuning.analog_factor;
    along += input.stick_y.clamp(-1.0, 1.0) * analog;
    side += input.stick_x.clamp(-1.0, 1.0) * analog;

    // Keys and stick together never exceed the configured speed per component.
    let along = along.clamp(-tuning.move_speed, tuning.move_speed);
    let side = side.clamp(-tuning.move_speed, tuning.move_speed);

    let (sin, cos) = yaw.sin_cos();
    // forward = (cos, sin), right = (-sin, cos)
    let snap = |v: f32| if v.abs() < f32::EPSILON * tuning.move_speed { 0.0 } else { v };
    Vec2::new(snap(along * cos - side * sin), snap(along * sin + side * cos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn tuning() -> NavigatorConfig {
        NavigatorConfig::default()
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-6 && (a.z - b.z).abs() < 1e-6
    }

    #[test]
    fn no_input_no_motion() {
        let d = displacement(&MotionInput::default(), 1.3, &tuning());
        assert_eq!(d, Vec2::ZERO);
    }

    #[test]
    fn forward_follows_yaw() {
        let input = MotionInput { forward: true, ..Default::default() };
        assert!(close(displacement(&input, 0.0, &tuning()), Vec2::new(0.05, 0.0)));
        assert!(close(displacement(&input, FRAC_PI_2, &tuning()), Vec2::new(0.0, 0.05)));
    }

    #[test]
    fn strafe_right_is_clockwise_of_forward() {
        let input = MotionInput { strafe_right: true, ..Default::default() };
        // Facing +x, right is +z.
        assert!(close(displacement(&input, 0.0, &tuning()), Vec2::new(0.0, 0.05)));
        let input = MotionInput { strafe_left: true, ..Default::default() };
        assert!(close(displacement(&input, 0.0, &tuning()), Vec2::new(0.0, -0.05)));
    }

    #[test]
    fn opposing_keys_cancel() {
        let input = MotionInput { forward: true, back: true, ..Default::default() };
        assert!(close(displacement(&input, 0.7, &tuning()), Vec2::ZERO));
    }

    #[test]
    fn cardinal_headings_leave_the_cross_axis_exactly_idle() {
        let input = MotionInput { forward: true, ..Default::default() };
        for yaw in [FRAC_PI_2, PI] {
            let d = displacement(&input, yaw, &tuning());
            let cross = if yaw == PI { d.z } else { d.x };
            assert_eq!(cross, 0.0, "yaw {yaw}");
        }
        let strafe = MotionInput { strafe_right: true, ..Default::default() };
        assert_eq!(displacement(&strafe, FRAC_PI_2, &tuning()).z, 0.0);
    }

    #[test]
    fn keys_and_stick_do_not_stack_past_move_speed() {
        let input = MotionInput { forward: true, stick_y: 1.0, ..Default::default() };
        let d = displacement(&input, 0.0, &tuning());
        assert!(close(d, Vec2::new(0.05, 0.0)));
    }

    #[test]
    fn stick_is_damped_and_clamped() {
        let input = MotionInput { stick_y: 3.0, ..Default::default() };
        let d = displacement(&input, 0.0, &tuning());
        assert!(close(d, Vec2::new(0.05 * 0.8, 0.0)));
    }
}
