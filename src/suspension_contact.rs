// ==============================================================================
// suspension_contact.rs — RAYCAST SUSPENSION + CONTACT RECORD
// ------------------------------------------------------------------------------
// Given a probe hit, computes for one wheel:
// - current suspension length (hit distance minus tire radius)
// - compression, clamped to [0, rest_length]
// - suspension velocity from the previous tick's length (+ when compressing)
// - spring + damper force along the CONTACT NORMAL (not the strut axis), so
//   the spring reacts to surface slope while the strut geometry stays rigid
//
// SuspensionContact is the per-tick scratch record the later stages (tire,
// drive, brake) read. It is rebuilt every grounded tick and dropped on a miss.
//
// Notes:
// - This file does NOT apply forces. wheel.rs applies the returned force at
//   the mount point through the engine.
// ==============================================================================

use rapier3d::prelude::*;

use crate::engine::RayHit;

/// Scratch data produced by the suspension stage for this tick only.
#[derive(Debug, Clone, Copy)]
pub struct SuspensionContact {
    // geometry (world)
    pub mount_point: Point<Real>,
    pub suspension_dir: Vector<Real>,
    pub hit_point: Point<Real>,
    pub ground_normal: Vector<Real>,
    pub rolling_point: Point<Real>, // mount + dir * current_length

    // suspension state
    pub current_length: Real,
    pub compression: Real,
    pub suspension_vel: Real,
}

#[derive(Debug, Clone, Copy)]
pub struct SuspensionParams {
    pub rest_length: Real,
    pub tire_radius: Real,
    pub stiffness: Real,
    pub damping: Real,
}

#[derive(Debug, Clone, Copy)]
pub struct SuspensionSolve {
    pub current_length: Real,
    pub compression: Real,
    pub velocity: Real,
    pub force: Vector<Real>,
}

pub(crate) fn compute_suspension_force(
    hit: &RayHit,
    params: &SuspensionParams,
    previous_length: Real,
    dt: Real,
) -> SuspensionSolve {
    let current_length = hit.distance - params.tire_radius;
    let compression = (params.rest_length - current_length).clamp(0.0, params.rest_length);
    let velocity = (previous_length - current_length) / dt;

    let spring = hit.normal * (compression * params.stiffness);   // F_s = k * x * n
    let damper = hit.normal * (velocity * params.damping);        // F_d = c * v * n

    SuspensionSolve {
        current_length,
        compression,
        velocity,
        force: spring + damper,
    }
}

pub fn build_suspension_contact(
    mount_point: Point<Real>,
    suspension_dir: Vector<Real>,
    hit: &RayHit,
    solve: &SuspensionSolve,
) -> SuspensionContact {
    SuspensionContact {
        mount_point,
        suspension_dir,
        hit_point: hit.point,
        ground_normal: hit.normal,
        rolling_point: mount_point + suspension_dir * solve.current_length,
        current_length: solve.current_length,
        compression: solve.compression,
        suspension_vel: solve.velocity,
    }
}
