// ==============================================================================
// kinematics.rs — CHASSIS AXES, WHEEL MOUNTS, PLANE PROJECTION
// ------------------------------------------------------------------------------
// Chassis-local convention (right-handed):
//   +X forward, +Y up, -Z left (so +Z is right)
//
// mount_offset(...):
// - Wheel mount in chassis space: (±wheelbase/2, mount_height, ∓track/2)
//
// suspension_direction(...):
// - Local strut axis: -Y tilted about the forward axis. A positive angle
//   leans the strut bottom outward on both sides (mirrored per side).
//
// project_on_plane(v, n):
// - Removes the component of v along unit normal n. Used on every tire
//   force so nothing pushes the wheel into or out of the ground.
// ==============================================================================

use rapier3d::na::{Unit, UnitQuaternion};
use rapier3d::prelude::{Point, Real, Vector};

use crate::tire::WheelId;

#[inline]
pub fn chassis_forward() -> Vector<Real> { Vector::new(1.0, 0.0, 0.0) }

#[inline]
pub fn chassis_up() -> Vector<Real> { Vector::new(0.0, 1.0, 0.0) }

#[inline]
pub fn chassis_left() -> Vector<Real> { Vector::new(0.0, 0.0, -1.0) }

/// World-space velocity of an arbitrary point rigidly attached to the body:
/// v(p) = v_com + ω × (p - com)
#[inline]
pub fn point_velocity(linvel: Vector<Real>, angvel: Vector<Real>, com: Point<Real>, p: Point<Real>) -> Vector<Real> {
    let r = p.coords - com.coords;
    linvel + angvel.cross(&r)
}

pub fn mount_offset(id: WheelId, wheelbase: Real, track: Real, mount_height: Real) -> Point<Real> {
    let x = if id.is_front() { wheelbase * 0.5 } else { -wheelbase * 0.5 };
    let z = if id.is_left() { -track * 0.5 } else { track * 0.5 };
    Point::new(x, mount_height, z)
}

pub fn suspension_direction(id: WheelId, tilt: Real) -> Vector<Real> {
    // Rotating -Y about +X by +a swings the bottom toward -Z (left).
    let angle = if id.is_left() { tilt } else { -tilt };
    let rot = UnitQuaternion::from_axis_angle(&Unit::new_unchecked(chassis_forward()), angle);
    rot * -chassis_up()
}

#[inline]
pub fn project_on_plane(v: Vector<Real>, normal: Vector<Real>) -> Vector<Real> {
    v - normal * v.dot(&normal)
}

/// Scales `v` down so its length does not exceed `max`.
#[inline]
pub fn clamp_magnitude(v: Vector<Real>, max: Real) -> Vector<Real> {
    let m = v.norm();
    if m > max && m > 1e-9 { v * (max / m) } else { v }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mounts_follow_front_left_classification() {
        let fl = mount_offset(WheelId::FL, 2.0, 1.0, 0.1);
        let rr = mount_offset(WheelId::RR, 2.0, 1.0, 0.1);
        assert_relative_eq!(fl.x, 1.0);
        assert_relative_eq!(fl.z, -0.5);
        assert_relative_eq!(rr.x, -1.0);
        assert_relative_eq!(rr.z, 0.5);
        assert_relative_eq!(fl.y, 0.1);
    }

    #[test]
    fn untilted_strut_points_down() {
        let d = suspension_direction(WheelId::FR, 0.0);
        assert_relative_eq!(d, Vector::new(0.0, -1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn positive_tilt_leans_outward_on_both_sides() {
        let left = suspension_direction(WheelId::FL, 0.2);
        let right = suspension_direction(WheelId::FR, 0.2);
        assert!(left.z < 0.0, "left strut bottom should move to -Z, got {left:?}");
        assert!(right.z > 0.0, "right strut bottom should move to +Z, got {right:?}");
        assert_relative_eq!(left.norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(left.y, right.y, epsilon = 1e-6);
    }

    #[test]
    fn projection_removes_normal_component() {
        let n = Vector::new(0.0, 1.0, 0.0);
        let p = project_on_plane(Vector::new(3.0, -2.0, 1.0), n);
        assert_relative_eq!(p, Vector::new(3.0, 0.0, 1.0));
    }

    #[test]
    fn clamp_keeps_direction() {
        let v = clamp_magnitude(Vector::new(3.0, 0.0, 4.0), 2.5);
        assert_relative_eq!(v.norm(), 2.5, epsilon = 1e-5);
        assert_relative_eq!(v.x / v.z, 0.75, epsilon = 1e-5);
        let small = clamp_magnitude(Vector::new(0.1, 0.0, 0.0), 2.5);
        assert_relative_eq!(small.x, 0.1);
    }

    #[test]
    fn point_velocity_adds_spin() {
        let v = point_velocity(
            Vector::new(1.0, 0.0, 0.0),
            Vector::new(0.0, 1.0, 0.0),
            Point::origin(),
            Point::new(0.0, 0.0, 2.0),
        );
        // ω × r = (0,1,0) × (0,0,2) = (2,0,0)
        assert_relative_eq!(v, Vector::new(3.0, 0.0, 0.0));
    }
}
