// ==============================================================================
// load.rs — WHOLE-VEHICLE NORMAL-LOAD BALANCE
// ------------------------------------------------------------------------------
// Converts the four fresh suspension-force magnitudes into each wheel's share
// of total vehicle weight:
//
//   total_weight = mass * g
//   total_susp   = Σ_grounded |F_susp_i|
//   load_i       = |F_susp_i| / total_susp * total_weight   (grounded, total_susp > 0)
//                = 0                                          (otherwise)
//
// Spring compression ratio stands in for relative normal load, which gives
// load transfer under braking / acceleration / cornering without an
// articulated suspension solve.
//
// Must run after every wheel's suspension update and before any tire,
// drive or brake stage in the same tick.
// ==============================================================================

use rapier3d::prelude::Real;

use crate::tire::WHEEL_COUNT;

/// One wheel's input to the balance.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadSample {
    pub grounded: bool,
    pub suspension_force: Real, // N, magnitude
}

pub fn balance_loads(samples: &[LoadSample; WHEEL_COUNT], mass: Real, gravity: Real) -> [Real; WHEEL_COUNT] {
    let total_weight = mass * gravity;
    let total_suspension: Real = samples
        .iter()
        .filter(|s| s.grounded)
        .map(|s| s.suspension_force)
        .sum();

    let mut loads = [0.0; WHEEL_COUNT];
    if total_suspension <= 0.0 {
        return loads;
    }

    for (load, s) in loads.iter_mut().zip(samples) {
        if s.grounded {
            *load = s.suspension_force / total_suspension * total_weight;
        }
    }
    loads
}
