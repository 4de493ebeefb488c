// ==============================================================================
// debug_builders.rs — DEBUG OVERLAY PRIMITIVES (SERVER -> CLIENT)
// ------------------------------------------------------------------------------
// Defines serializable debug primitives:
// - DebugRay: suspension probes and per-wheel force vectors
// - DebugWheel: per-wheel numeric state (grounded, compression, load, steer)
// - DebugChassis: chassis pose + box size
//
// Helpers:
// - suspension_ray(): probe ray, red -> yellow by spring length / rest length
// - push_force_rays(): suspension / lateral / drive / brake, scaled by 1/mass
//
// Everything here reads the last finished tick. Nothing writes back into the
// vehicle or the engine.
// ==============================================================================

use rapier3d::prelude::*;
use serde::Serialize;

use crate::vehicle::Vehicle;
use crate::wheel::{WheelModel, WheelState};

pub const RED: [f32; 3] = [1.0, 0.0, 0.0];
pub const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
pub const BLUE: [f32; 3] = [0.0, 0.0, 1.0];
pub const YELLOW: [f32; 3] = [1.0, 1.0, 0.0];

#[derive(Clone, Debug, Default, Serialize)]
pub struct DebugOverlay {
    pub chassis: Option<DebugChassis>,
    pub suspension_rays: Vec<DebugRay>,
    pub force_rays: Vec<DebugRay>,
    pub wheels: Vec<DebugWheel>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DebugRay {
    pub origin: [f32; 3],
    pub direction: [f32; 3],
    pub length: f32,
    pub hit: Option<[f32; 3]>,
    pub color: [f32; 3],
}

#[derive(Clone, Debug, Serialize)]
pub struct DebugChassis {
    pub position: [f32; 3],
    pub rotation: [f32; 4], // quaternion (x, y, z, w)
    pub half_extents: [f32; 3],
}

#[derive(Clone, Debug, Serialize)]
pub struct DebugWheel {
    pub id: &'static str, // "FL", "FR", "RL", "RR"
    pub grounded: bool,
    pub compression: f32,
    pub load: f32,
    pub steer: f32,
    pub driven: bool,
}

impl DebugOverlay {
    pub fn clear(&mut self) {
        self.chassis = None;
        self.suspension_rays.clear();
        self.force_rays.clear();
        self.wheels.clear();
    }

    /// Snapshot of the vehicle's last tick. `pose` and `mass` come from the
    /// engine; they are only read.
    pub fn build<W: WheelModel>(vehicle: &Vehicle<W>, pose: &Isometry<Real>, mass: Real) -> Self {
        let mut overlay = Self::default();
        overlay.rebuild(vehicle, pose, mass);
        overlay
    }

    pub fn rebuild<W: WheelModel>(&mut self, vehicle: &Vehicle<W>, pose: &Isometry<Real>, mass: Real) {
        self.clear();

        let q = pose.rotation.coords;
        self.chassis = Some(DebugChassis {
            position: pose.translation.vector.into(),
            rotation: [q.x, q.y, q.z, q.w],
            half_extents: vehicle.config.chassis_half_extents,
        });

        for wheel in vehicle.wheels() {
            let cfg = wheel.config();
            let state = wheel.state();

            self.suspension_rays.push(suspension_ray(
                state,
                cfg.suspension.rest_length,
                cfg.probe_length(),
            ));
            push_force_rays(&mut self.force_rays, state, mass);

            self.wheels.push(DebugWheel {
                id: cfg.id.as_str(),
                grounded: state.grounded,
                compression: state.compression,
                load: state.load,
                steer: state.steer_angle,
                driven: vehicle.config.drive_type.drives(cfg.id.is_front()),
            });
        }
    }
}

#[inline]
fn lerp_color(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    let t = t.clamp(0.0, 1.0);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// Probe ray for one wheel. Grounded: mount to rolling point, colour by
/// spring length / rest length. Airborne: full probe length in red.
pub fn suspension_ray(state: &WheelState, rest_length: Real, probe_length: Real) -> DebugRay {
    match &state.contact {
        Some(contact) => DebugRay {
            origin: contact.mount_point.into(),
            direction: contact.suspension_dir.into(),
            length: contact.current_length,
            hit: Some(contact.hit_point.into()),
            color: lerp_color(RED, YELLOW, contact.current_length / rest_length),
        },
        None => DebugRay {
            origin: state.probe_origin.into(),
            direction: state.probe_dir.into(),
            length: probe_length,
            hit: None,
            color: RED,
        },
    }
}

fn force_ray(origin: Point<Real>, force: Vector<Real>, inv_mass: Real, color: [f32; 3]) -> Option<DebugRay> {
    let scaled = force * inv_mass;
    let length = scaled.norm();
    if length <= 1e-9 {
        return None;
    }
    Some(DebugRay {
        origin: origin.into(),
        direction: (scaled / length).into(),
        length,
        hit: None,
        color,
    })
}

/// Suspension (green, mount), lateral (red, contact), drive (blue, rolling
/// point), brake (yellow, rolling point). Airborne wheels push nothing.
pub fn push_force_rays(out: &mut Vec<DebugRay>, state: &WheelState, mass: Real) {
    let Some(contact) = &state.contact else { return };
    let inv_mass = if mass > 0.0 { 1.0 / mass } else { 0.0 };

    out.extend(
        [
            force_ray(contact.mount_point, state.suspension_force, inv_mass, GREEN),
            force_ray(contact.hit_point, state.lateral_force, inv_mass, RED),
            force_ray(contact.rolling_point, state.drive_force, inv_mass, BLUE),
            force_ray(contact.rolling_point, state.brake_force, inv_mass, YELLOW),
        ]
        .into_iter()
        .flatten(),
    );
}
