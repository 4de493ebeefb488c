//! Four-wheel raycast vehicle: suspension, load balance, tire, drive and
//! brake forces applied to a rigid chassis once per fixed physics step.

pub mod config;
pub mod debug_builders;
pub mod engine;
pub mod error;
pub mod input;
pub mod physics;
pub mod suspension_contact;
pub mod tire;
pub mod vehicle;
pub mod wheel;

pub use config::{COUPE, DriveType, TRUCK, VehicleConfig};
pub use debug_builders::DebugOverlay;
pub use engine::{ProbeResult, RayHit, RigidBodyEngine, probe_ground};
pub use error::VehicleError;
pub use input::{ControlInput, InputSource, ScriptedInput};
pub use physics::PhysicsWorld;
pub use tire::{SimContext, WHEEL_COUNT, WheelId};
pub use vehicle::Vehicle;
pub use wheel::{Drivetrain, RaycastWheel, WheelConfig, WheelModel, WheelState};
