// ==============================================================================
// engine.rs — RIGID-BODY ENGINE CONTRACT + GROUND PROBE
// ------------------------------------------------------------------------------
// The core never integrates motion. It needs five things from whatever engine
// owns the chassis:
// - a ray cast against the static environment (chassis excluded)
// - force-at-point accumulation on the chassis
// - velocity of a world point rigidly attached to the chassis
// - chassis mass and linear speed
// - chassis pose (to move mounts / axes into world space)
//
// PhysicsWorld (physics.rs) implements this on rapier3d; tests use a scripted
// fake.
// ==============================================================================

use rapier3d::prelude::{Isometry, Point, Real, RigidBodyHandle, Vector};

/// A ray intersection with the environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: Real,
    pub point: Point<Real>,
    pub normal: Vector<Real>,
}

/// Ground probe outcome. `Miss` is an airborne wheel, not a fault.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeResult {
    Hit(RayHit),
    Miss,
}

pub trait RigidBodyEngine {
    /// Cast against everything except `exclude`. `dir` is unit length.
    fn cast_ray(
        &self,
        origin: Point<Real>,
        dir: Vector<Real>,
        max_distance: Real,
        exclude: RigidBodyHandle,
    ) -> Option<RayHit>;

    fn apply_force_at_point(&mut self, body: RigidBodyHandle, force: Vector<Real>, point: Point<Real>);

    fn velocity_at_point(&self, body: RigidBodyHandle, point: Point<Real>) -> Vector<Real>;

    fn mass(&self, body: RigidBodyHandle) -> Real;

    fn linear_speed(&self, body: RigidBodyHandle) -> Real;

    fn pose(&self, body: RigidBodyHandle) -> Isometry<Real>;
}

/// Casts from a wheel mount along its world suspension axis, up to
/// `rest_length + tire_radius`.
pub fn probe_ground(
    engine: &dyn RigidBodyEngine,
    body: RigidBodyHandle,
    origin: Point<Real>,
    dir: Vector<Real>,
    rest_length: Real,
    tire_radius: Real,
) -> ProbeResult {
    match engine.cast_ray(origin, dir, rest_length + tire_radius, body) {
        Some(hit) => ProbeResult::Hit(hit),
        None => ProbeResult::Miss,
    }
}
