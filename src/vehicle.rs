// ==============================================================================
// vehicle.rs — FOUR-WHEEL FIXED-STEP PIPELINE
// ------------------------------------------------------------------------------
// One tick, in this order (load balance must see all four fresh suspension
// forces before any load-dependent tire force runs):
//   1) clamp the control snapshot, set this tick's steer angle on every wheel
//   2) suspension, every wheel
//   3) load balance across all four
//   4) lateral tire force, every wheel
//   5) drive, brake, every wheel
//
// Single-threaded; the chassis body is the only shared resource and the
// engine accumulates every contribution until it integrates.
// ==============================================================================

use log::{info, trace};
use rapier3d::prelude::{Real, RigidBodyHandle};

use crate::config::VehicleConfig;
use crate::engine::RigidBodyEngine;
use crate::error::VehicleError;
use crate::input::ControlInput;
use crate::tire::{LoadSample, SimContext, WHEEL_COUNT, WheelId, balance_loads};
use crate::wheel::{Drivetrain, RaycastWheel, WheelConfig, WheelModel};

pub struct Vehicle<W: WheelModel = RaycastWheel> {
    pub body: RigidBodyHandle,  // the chassis body
    pub config: VehicleConfig,  // vehicle parameters
    pub input: ControlInput,    // last applied snapshot
    drivetrain: Drivetrain,
    wheels: [W; WHEEL_COUNT],
    tick: u64,
}

impl Vehicle<RaycastWheel> {
    /// Validates the config and builds the four raycast wheels.
    pub fn assemble(body: RigidBodyHandle, config: VehicleConfig) -> Result<Self, VehicleError> {
        Self::with_wheels(body, config, |id, cfg| {
            RaycastWheel::new(WheelConfig::from_vehicle(id, cfg))
        })
    }
}

impl<W: WheelModel> Vehicle<W> {
    /// Assemble with a custom wheel strategy.
    pub fn with_wheels<F>(body: RigidBodyHandle, config: VehicleConfig, mut build: F) -> Result<Self, VehicleError>
    where
        F: FnMut(WheelId, &VehicleConfig) -> W,
    {
        config.validate()?;

        let wheels = std::array::from_fn(|i| build(WheelId::ALL[i], &config));

        info!(
            "assembled vehicle: {} {:.0} kg, wheelbase {:.2} m, track {:.2} m",
            config.drive_type, config.mass, config.wheelbase, config.track
        );

        Ok(Self {
            body,
            drivetrain: Drivetrain::from_vehicle(&config),
            config,
            input: ControlInput::default(),
            wheels,
            tick: 0,
        })
    }

    pub fn wheels(&self) -> &[W; WHEEL_COUNT] {
        &self.wheels
    }

    pub fn wheel(&self, id: WheelId) -> &W {
        &self.wheels[id.index()]
    }

    pub fn loads(&self) -> [Real; WHEEL_COUNT] {
        std::array::from_fn(|i| self.wheels[i].state().load)
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }

    pub fn tick(
        &mut self,
        engine: &mut dyn RigidBodyEngine,
        ctx: &SimContext,
        input: ControlInput,
    ) {
        // 1) input snapshot; tire and drive both read this tick's steer angle
        self.input = input.clamped();
        let ControlInput { steer, throttle, brake } = self.input;
        for wheel in self.wheels.iter_mut() {
            wheel.apply_steer(steer, self.config.max_steer_angle);
        }
        let body = self.body;

        // 2) suspension
        for wheel in self.wheels.iter_mut() {
            wheel.simulate_suspension_tick(engine, body, ctx);
        }

        // 3) load balance
        let samples: [LoadSample; WHEEL_COUNT] = std::array::from_fn(|i| {
            let s = self.wheels[i].state();
            LoadSample { grounded: s.grounded, suspension_force: s.suspension_force.norm() }
        });
        let loads = balance_loads(&samples, engine.mass(body), ctx.gravity());
        for (wheel, load) in self.wheels.iter_mut().zip(loads) {
            wheel.set_load(load);
        }
        trace!("tick {} loads {:?}", self.tick, loads);

        // 4) lateral tire forces
        for wheel in self.wheels.iter_mut() {
            wheel.compute_lateral_force(engine, body);
        }

        // 5) drive, brake
        for wheel in self.wheels.iter_mut() {
            wheel.apply_drive(engine, body, throttle, &self.drivetrain);
            wheel.apply_brake(engine, body, brake, &self.drivetrain);
        }

        self.tick += 1;
    }
}
