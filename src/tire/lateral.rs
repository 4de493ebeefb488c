// ==============================================================================
// lateral.rs — LOAD-PROPORTIONAL VISCOUS LATERAL TIRE FORCE
// ==============================================================================
// Inputs:
// - lateral direction of the rolling frame (world, includes steering yaw)
// - chassis velocity at the rolling position (world)
// - contact normal, friction coefficient, balanced normal load
//
// Model steps:
// 1) v_lat = dot(v_wheel, lateral_dir)
// 2) F_raw = -lateral_dir * v_lat * mu * load
// 3) project F_raw onto the contact plane
// 4) friction cap: |F| <= mu * load
//
// This is a linear viscous approximation, not a slip-angle tire model. The cap
// is what keeps the velocity-proportional term from flinging the chassis.
// ==============================================================================

use rapier3d::prelude::{Real, Vector};

use crate::tire::kinematics::{clamp_magnitude, project_on_plane};

#[derive(Clone, Copy, Debug)]
pub struct LateralInput {
    pub lateral_dir: Vector<Real>,
    pub wheel_velocity: Vector<Real>,
    pub contact_normal: Vector<Real>,
    pub friction: Real,
    pub load: Real, // N
}

/// Friction-circle limit for a given load.
#[inline]
pub fn friction_limit(friction: Real, load: Real) -> Real {
    (load * friction).max(0.0)
}

pub fn lateral_force(input: &LateralInput) -> Vector<Real> {
    let v_lat = input.wheel_velocity.dot(&input.lateral_dir);
    let raw = -input.lateral_dir * v_lat * input.friction * input.load;
    let planar = project_on_plane(raw, input.contact_normal);
    clamp_magnitude(planar, friction_limit(input.friction, input.load))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn input(v: Vector<Real>, load: Real) -> LateralInput {
        LateralInput {
            lateral_dir: Vector::new(0.0, 0.0, -1.0),
            wheel_velocity: v,
            contact_normal: Vector::new(0.0, 1.0, 0.0),
            friction: 0.6,
            load,
        }
    }

    #[test]
    fn opposes_sideways_slip() {
        // Sliding left (-Z) slowly: force must push right (+Z).
        let f = lateral_force(&input(Vector::new(0.0, 0.0, -0.001), 3000.0));
        assert!(f.z > 0.0);
        assert_relative_eq!(f.z, 0.001 * 0.6 * 3000.0, max_relative = 1e-4);
    }

    #[test]
    fn pure_rolling_has_no_lateral_force() {
        let f = lateral_force(&input(Vector::new(15.0, 0.0, 0.0), 3000.0));
        assert_relative_eq!(f.norm(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn capped_at_friction_limit() {
        let f = lateral_force(&input(Vector::new(0.0, 0.0, 25.0), 3000.0));
        assert_relative_eq!(f.norm(), 0.6 * 3000.0, max_relative = 1e-5);
    }

    #[test]
    fn zero_load_gives_zero_force() {
        let f = lateral_force(&input(Vector::new(0.0, 0.0, 5.0), 0.0));
        assert_eq!(f, Vector::zeros());
    }

    #[test]
    fn stays_in_contact_plane_on_slope() {
        let n = Vector::new(0.3, 1.0, 0.0).normalize();
        let mut i = input(Vector::new(0.0, 0.0, 2.0), 2000.0);
        i.lateral_dir = Vector::new(0.2, 0.1, -1.0).normalize();
        i.contact_normal = n;
        let f = lateral_force(&i);
        assert_relative_eq!(f.dot(&n), 0.0, epsilon = 1e-3);
        assert!(f.norm() <= friction_limit(0.6, 2000.0) + 1e-3);
    }
}
