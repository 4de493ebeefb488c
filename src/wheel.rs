// ==============================================================================
// wheel.rs — WHEEL CAPABILITY INTERFACE + RAYCAST WHEEL
// ------------------------------------------------------------------------------
// The vehicle pipeline only talks to WheelModel. RaycastWheel is the shipped
// strategy: a ground probe along a rigid strut, spring-damper along the
// contact normal, and direct chassis forces for tire / drive / brake.
//
// Per tick, in pipeline order:
//   apply_steer -> simulate_suspension_tick -> set_load
//   -> compute_lateral_force -> apply_drive -> apply_brake
//
// A Miss ends the wheel's tick: every force it reports stays zero and the
// later stages see grounded = false.
// ==============================================================================

use log::debug;
use rapier3d::prelude::*;

use crate::config::{DriveType, VehicleConfig};
use crate::engine::{ProbeResult, RigidBodyEngine, probe_ground};
use crate::suspension_contact::{
    SuspensionContact, SuspensionParams, build_suspension_contact, compute_suspension_force,
};
use crate::tire::kinematics::{chassis_forward, mount_offset, suspension_direction};
use crate::tire::lateral::{LateralInput, lateral_force};
use crate::tire::longitudinal::{BrakeInput, DriveInput, brake_force, drive_force};
use crate::tire::steering::{rolling_axes, steer_angle};
use crate::tire::{SimContext, WheelId};

/// Static per-wheel setup, derived once from the vehicle config.
#[derive(Debug, Clone, Copy)]
pub struct WheelConfig {
    pub id: WheelId,
    pub mount_offset: Point<Real>,      // chassis space
    pub suspension_dir: Vector<Real>,   // chassis space, unit
    pub suspension: SuspensionParams,
    pub friction: Real,
    pub tire_width: Real,
    pub tire_diameter: Real,
}

impl WheelConfig {
    pub fn from_vehicle(id: WheelId, config: &VehicleConfig) -> Self {
        Self {
            id,
            mount_offset: mount_offset(id, config.wheelbase, config.track, config.mount_height),
            suspension_dir: suspension_direction(id, config.suspension_angle),
            suspension: SuspensionParams {
                rest_length: config.rest_length,
                tire_radius: config.tire_radius(),
                stiffness: config.spring_stiffness,
                damping: config.damping,
            },
            friction: config.tire_friction,
            tire_width: config.tire_width,
            tire_diameter: config.tire_diameter,
        }
    }

    /// Maximum ground-probe distance.
    pub fn probe_length(&self) -> Real {
        self.suspension.rest_length + self.suspension.tire_radius
    }
}

/// Vehicle-wide longitudinal parameters handed to drive / brake.
#[derive(Debug, Clone, Copy)]
pub struct Drivetrain {
    pub drive_type: DriveType,
    pub top_speed: Real,        // m/s
    pub max_drive_force: Real,  // N
    pub max_brake_force: Real,  // N
    pub front_brake_bias: Real,
    pub rear_brake_bias: Real,
}

impl Drivetrain {
    pub fn from_vehicle(config: &VehicleConfig) -> Self {
        Self {
            drive_type: config.drive_type,
            top_speed: config.top_speed(),
            max_drive_force: config.max_drive_force,
            max_brake_force: config.max_brake_force,
            front_brake_bias: config.front_brake_bias,
            rear_brake_bias: config.rear_brake_bias,
        }
    }
}

/// Mutable per-wheel state. Only the vehicle pipeline writes it.
#[derive(Debug, Clone)]
pub struct WheelState {
    pub grounded: bool,
    pub current_length: Real,
    pub previous_length: Real,
    pub compression: Real,

    // probe geometry of the last tick (world), valid airborne too
    pub probe_origin: Point<Real>,
    pub probe_dir: Vector<Real>,

    pub contact: Option<SuspensionContact>,

    pub suspension_force: Vector<Real>,
    pub lateral_force: Vector<Real>,
    pub drive_force: Vector<Real>,
    pub brake_force: Vector<Real>,
    pub wheel_velocity: Vector<Real>,

    pub load: Real,         // N
    pub steer_angle: Real,  // radians
}

impl WheelState {
    pub fn new(rest_length: Real) -> Self {
        Self {
            grounded: false,
            current_length: rest_length,
            previous_length: rest_length,
            compression: 0.0,
            probe_origin: Point::origin(),
            probe_dir: Vector::new(0.0, -1.0, 0.0),
            contact: None,
            suspension_force: Vector::zeros(),
            lateral_force: Vector::zeros(),
            drive_force: Vector::zeros(),
            brake_force: Vector::zeros(),
            wheel_velocity: Vector::zeros(),
            load: 0.0,
            steer_angle: 0.0,
        }
    }

    fn clear_tick_outputs(&mut self) {
        self.contact = None;
        self.compression = 0.0;
        self.suspension_force = Vector::zeros();
        self.lateral_force = Vector::zeros();
        self.drive_force = Vector::zeros();
        self.brake_force = Vector::zeros();
        self.wheel_velocity = Vector::zeros();
        self.load = 0.0;
    }
}

/// What the pipeline needs from a wheel simulation strategy.
pub trait WheelModel {
    fn id(&self) -> WheelId;
    fn config(&self) -> &WheelConfig;
    fn state(&self) -> &WheelState;

    fn simulate_suspension_tick(
        &mut self,
        engine: &mut dyn RigidBodyEngine,
        body: RigidBodyHandle,
        ctx: &SimContext,
    );

    fn set_load(&mut self, load: Real);

    fn compute_lateral_force(&mut self, engine: &mut dyn RigidBodyEngine, body: RigidBodyHandle);

    fn apply_steer(&mut self, input: Real, max_angle: Real);

    fn apply_drive(
        &mut self,
        engine: &mut dyn RigidBodyEngine,
        body: RigidBodyHandle,
        throttle: Real,
        drivetrain: &Drivetrain,
    );

    fn apply_brake(
        &mut self,
        engine: &mut dyn RigidBodyEngine,
        body: RigidBodyHandle,
        brake: Real,
        drivetrain: &Drivetrain,
    );
}

#[derive(Debug, Clone)]
pub struct RaycastWheel {
    config: WheelConfig,
    state: WheelState,
}

impl RaycastWheel {
    pub fn new(config: WheelConfig) -> Self {
        let state = WheelState::new(config.suspension.rest_length);
        Self { config, state }
    }
}

impl WheelModel for RaycastWheel {
    fn id(&self) -> WheelId {
        self.config.id
    }

    fn config(&self) -> &WheelConfig {
        &self.config
    }

    fn state(&self) -> &WheelState {
        &self.state
    }

    fn simulate_suspension_tick(
        &mut self,
        engine: &mut dyn RigidBodyEngine,
        body: RigidBodyHandle,
        ctx: &SimContext,
    ) {
        let was_grounded = self.state.grounded;
        self.state.clear_tick_outputs();

        let pose = engine.pose(body);
        let origin = pose * self.config.mount_offset;
        let dir = pose.rotation * self.config.suspension_dir;
        self.state.probe_origin = origin;
        self.state.probe_dir = dir;

        let params = &self.config.suspension;
        let hit = match probe_ground(&*engine, body, origin, dir, params.rest_length, params.tire_radius) {
            ProbeResult::Hit(hit) => hit,
            ProbeResult::Miss => {
                self.state.grounded = false;
                if was_grounded {
                    debug!("wheel {} airborne", self.config.id);
                }
                return;
            }
        };

        self.state.grounded = true;
        if !was_grounded {
            debug!("wheel {} grounded at {:.3} m", self.config.id, hit.distance);
        }

        let solve = compute_suspension_force(&hit, params, self.state.previous_length, ctx.dt());
        self.state.current_length = solve.current_length;
        self.state.previous_length = solve.current_length;
        self.state.compression = solve.compression;
        self.state.suspension_force = solve.force;
        self.state.contact = Some(build_suspension_contact(origin, dir, &hit, &solve));

        engine.apply_force_at_point(body, solve.force, origin);
    }

    fn set_load(&mut self, load: Real) {
        self.state.load = if self.state.grounded { load } else { 0.0 };
    }

    fn compute_lateral_force(&mut self, engine: &mut dyn RigidBodyEngine, body: RigidBodyHandle) {
        let Some(contact) = self.state.contact else { return };

        let rot = engine.pose(body).rotation;
        let (_, lateral) = rolling_axes(self.state.steer_angle);
        let wheel_velocity = engine.velocity_at_point(body, contact.rolling_point);
        self.state.wheel_velocity = wheel_velocity;

        let force = lateral_force(&LateralInput {
            lateral_dir: rot * lateral,
            wheel_velocity,
            contact_normal: contact.ground_normal,
            friction: self.config.friction,
            load: self.state.load,
        });

        self.state.lateral_force = force;
        engine.apply_force_at_point(body, force, contact.hit_point);
    }

    fn apply_steer(&mut self, input: Real, max_angle: Real) {
        self.state.steer_angle = steer_angle(self.config.id, input, max_angle);
    }

    fn apply_drive(
        &mut self,
        engine: &mut dyn RigidBodyEngine,
        body: RigidBodyHandle,
        throttle: Real,
        drivetrain: &Drivetrain,
    ) {
        let Some(contact) = self.state.contact else { return };

        let rot = engine.pose(body).rotation;
        let (forward, _) = rolling_axes(self.state.steer_angle);

        let force = drive_force(self.config.id, &DriveInput {
            throttle,
            drive_type: drivetrain.drive_type,
            grounded: self.state.grounded,
            chassis_speed: engine.linear_speed(body),
            top_speed: drivetrain.top_speed,
            max_drive_force: drivetrain.max_drive_force,
            forward: rot * forward,
            contact_normal: contact.ground_normal,
        });

        if let Some(force) = force {
            self.state.drive_force = force;
            engine.apply_force_at_point(body, force, contact.rolling_point);
        }
    }

    fn apply_brake(
        &mut self,
        engine: &mut dyn RigidBodyEngine,
        body: RigidBodyHandle,
        brake: Real,
        drivetrain: &Drivetrain,
    ) {
        let Some(contact) = self.state.contact else { return };

        // unsteered wheel frame
        let forward = engine.pose(body).rotation * chassis_forward();

        let force = brake_force(self.config.id, &BrakeInput {
            brake,
            grounded: self.state.grounded,
            wheel_velocity: self.state.wheel_velocity,
            max_brake_force: drivetrain.max_brake_force,
            front_bias: drivetrain.front_brake_bias,
            rear_bias: drivetrain.rear_brake_bias,
            forward,
            contact_normal: contact.ground_normal,
        });

        if let Some(force) = force {
            self.state.brake_force = force;
            engine.apply_force_at_point(body, force, contact.rolling_point);
        }
    }
}
