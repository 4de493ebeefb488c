//! tire - engine-agnostic per-wheel force helpers (pure functions + types)

pub mod types;
pub mod kinematics;
pub mod load;
pub mod lateral;
pub mod longitudinal;
pub mod steering;

pub use types::*;
pub use load::{LoadSample, balance_loads};
