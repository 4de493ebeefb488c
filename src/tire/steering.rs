// ==============================================================================
// steering.rs — FRONT-AXLE YAW OF THE ROLLING FRAME
// ==============================================================================
// Responsibilities:
// - Convert driver steering intent into a per-wheel yaw angle
// - Rear wheels ignore steering entirely
// - Build the rolling frame (forward / lateral) in chassis space
// ------------------------------------------------------------------------------
// steer_angle = steer_input * max_steer_angle   (front wheels only)
//
// Sign convention: positive input turns right. With +Y up and +X forward a
// positive rotation about +Y swings the nose toward -Z (left), so the yaw
// applied to the rolling frame is -steer_angle.
// ==============================================================================

use nalgebra::{UnitQuaternion, Vector3};
use rapier3d::prelude::{Real, Vector};

use crate::tire::WheelId;
use crate::tire::kinematics::{chassis_forward, chassis_left};

/// Yaw offset (radians) of the rolling frame relative to the suspension frame.
pub fn steer_angle(id: WheelId, steer_input: Real, max_steer_angle: Real) -> Real {
    if !id.is_front() {
        return 0.0;
    }
    steer_input * max_steer_angle
}

pub fn rolling_rotation(steer_angle: Real) -> UnitQuaternion<Real> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), -steer_angle)
}

/// Rolling frame axes in chassis space: (forward, lateral).
/// `lateral` points to the wheel's left.
pub fn rolling_axes(steer_angle: Real) -> (Vector<Real>, Vector<Real>) {
    let rot = rolling_rotation(steer_angle);
    (rot * chassis_forward(), rot * chassis_left())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rear_wheels_ignore_steering() {
        assert_eq!(steer_angle(WheelId::RL, 1.0, 0.5), 0.0);
        assert_eq!(steer_angle(WheelId::RR, -1.0, 0.5), 0.0);
    }

    #[test]
    fn front_wheels_scale_input() {
        assert_relative_eq!(steer_angle(WheelId::FL, 0.5, 0.6), 0.3);
        assert_relative_eq!(steer_angle(WheelId::FR, -1.0, 0.6), -0.6);
    }

    #[test]
    fn positive_steer_turns_right() {
        let (forward, lateral) = rolling_axes(0.3);
        assert!(forward.z > 0.0, "forward should swing toward +Z (right): {forward:?}");
        assert_relative_eq!(forward.dot(&lateral), 0.0, epsilon = 1e-6);
        assert_relative_eq!(forward.norm(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn zero_steer_is_chassis_frame() {
        let (forward, lateral) = rolling_axes(0.0);
        assert_relative_eq!(forward, chassis_forward(), epsilon = 1e-6);
        assert_relative_eq!(lateral, chassis_left(), epsilon = 1e-6);
    }
}
