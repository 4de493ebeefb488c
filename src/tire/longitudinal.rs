// ==============================================================================
// longitudinal.rs — DRIVE + BRAKE FORCES (FORCE DOMAIN, PER WHEEL)
// ==============================================================================
// Drive:
// - gated by layout (FWD skips rear, RWD skips front, AWD drives all),
//   grounded state, and chassis speed >= top speed
// - F = throttle * max_drive_force along the rolling forward axis,
//   projected onto the contact plane
//
// Brake:
// - gated by grounded state and forward velocity <= 0
//   (brakes only oppose forward motion, never push the car backward)
// - F = -brake * max_brake_force * axle_bias along the wheel's unsteered
//   forward axis, projected onto the contact plane
//
// No wheel angular velocity is tracked; these are direct chassis forces.
// ==============================================================================

use rapier3d::prelude::{Real, Vector};

use crate::config::DriveType;
use crate::tire::WheelId;
use crate::tire::kinematics::project_on_plane;

#[derive(Clone, Copy, Debug)]
pub struct DriveInput {
    pub throttle: Real,            // 0..1
    pub drive_type: DriveType,
    pub grounded: bool,
    pub chassis_speed: Real,       // m/s
    pub top_speed: Real,           // m/s
    pub max_drive_force: Real,     // N
    pub forward: Vector<Real>,     // rolling frame, world
    pub contact_normal: Vector<Real>,
}

/// Drive force for one wheel, or None when any gate blocks it.
pub fn drive_force(id: WheelId, input: &DriveInput) -> Option<Vector<Real>> {
    if !input.drive_type.drives(id.is_front()) || !input.grounded {
        return None;
    }
    if input.chassis_speed >= input.top_speed {
        return None;
    }

    let magnitude = input.throttle * input.max_drive_force;
    Some(project_on_plane(input.forward * magnitude, input.contact_normal))
}

#[derive(Clone, Copy, Debug)]
pub struct BrakeInput {
    pub brake: Real,               // 0..1
    pub grounded: bool,
    pub wheel_velocity: Vector<Real>,
    pub max_brake_force: Real,     // N, before bias
    pub front_bias: Real,
    pub rear_bias: Real,
    pub forward: Vector<Real>,     // unsteered wheel frame, world
    pub contact_normal: Vector<Real>,
}

pub fn brake_force(id: WheelId, input: &BrakeInput) -> Option<Vector<Real>> {
    if !input.grounded || input.wheel_velocity.dot(&input.forward) <= 0.0 {
        return None;
    }

    let bias = if id.is_front() { input.front_bias } else { input.rear_bias };
    let magnitude = -input.brake * input.max_brake_force * bias;
    Some(project_on_plane(input.forward * magnitude, input.contact_normal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn drive(drive_type: DriveType) -> DriveInput {
        DriveInput {
            throttle: 0.5,
            drive_type,
            grounded: true,
            chassis_speed: 5.0,
            top_speed: 50.0,
            max_drive_force: 2000.0,
            forward: Vector::new(1.0, 0.0, 0.0),
            contact_normal: Vector::new(0.0, 1.0, 0.0),
        }
    }

    fn brake(v_forward: Real) -> BrakeInput {
        BrakeInput {
            brake: 1.0,
            grounded: true,
            wheel_velocity: Vector::new(v_forward, 0.0, 0.0),
            max_brake_force: 1000.0,
            front_bias: 1.2,
            rear_bias: 0.8,
            forward: Vector::new(1.0, 0.0, 0.0),
            contact_normal: Vector::new(0.0, 1.0, 0.0),
        }
    }

    #[test]
    fn fwd_skips_rear_and_rwd_skips_front() {
        assert!(drive_force(WheelId::RL, &drive(DriveType::Fwd)).is_none());
        assert!(drive_force(WheelId::FL, &drive(DriveType::Fwd)).is_some());
        assert!(drive_force(WheelId::FR, &drive(DriveType::Rwd)).is_none());
        assert!(drive_force(WheelId::RR, &drive(DriveType::Rwd)).is_some());
    }

    #[test]
    fn awd_drives_every_wheel_proportionally() {
        for id in WheelId::ALL {
            let f = drive_force(id, &drive(DriveType::Awd)).unwrap();
            assert_relative_eq!(f.x, 1000.0);
        }
    }

    #[test]
    fn airborne_or_over_top_speed_gets_no_drive() {
        let mut i = drive(DriveType::Awd);
        i.grounded = false;
        assert!(drive_force(WheelId::FL, &i).is_none());

        let mut i = drive(DriveType::Awd);
        i.chassis_speed = 50.0;
        assert!(drive_force(WheelId::FL, &i).is_none());
    }

    #[test]
    fn drive_follows_slope() {
        let mut i = drive(DriveType::Awd);
        i.contact_normal = Vector::new(-0.2, 1.0, 0.0).normalize();
        let f = drive_force(WheelId::RL, &i).unwrap();
        assert_relative_eq!(f.dot(&i.contact_normal), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn brake_opposes_forward_motion_with_bias() {
        let front = brake_force(WheelId::FL, &brake(3.0)).unwrap();
        let rear = brake_force(WheelId::RR, &brake(3.0)).unwrap();
        assert_relative_eq!(front.x, -1200.0);
        assert_relative_eq!(rear.x, -800.0);
    }

    #[test]
    fn brake_never_applies_when_stopped_or_reversing() {
        assert!(brake_force(WheelId::FL, &brake(0.0)).is_none());
        assert!(brake_force(WheelId::FL, &brake(-2.0)).is_none());
    }

    #[test]
    fn airborne_wheel_does_not_brake() {
        let mut i = brake(5.0);
        i.grounded = false;
        assert!(brake_force(WheelId::RL, &i).is_none());
    }
}
