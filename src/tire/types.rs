//! Core shared types for `tire` (engine-agnostic).
// tire/types.rs
use std::fmt;

use rapier3d::prelude::Real;

use crate::error::VehicleError;

pub const WHEEL_COUNT: usize = 4;

// ============================================
// Wheel identification
// ============================================

/// Fixed wheel slot. Indices 0,1 are front; even indices are left.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum WheelId { FL, FR, RL, RR }

impl WheelId {
    pub const ALL: [WheelId; WHEEL_COUNT] = [WheelId::FL, WheelId::FR, WheelId::RL, WheelId::RR];

    /// `None` for anything outside 0..WHEEL_COUNT.
    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    pub fn index(&self) -> usize {
        match self {
            WheelId::FL => 0,
            WheelId::FR => 1,
            WheelId::RL => 2,
            WheelId::RR => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WheelId::FL => "FL",
            WheelId::FR => "FR",
            WheelId::RL => "RL",
            WheelId::RR => "RR",
        }
    }

    pub fn is_front(&self) -> bool {
        self.index() < 2
    }

    pub fn is_rear(&self) -> bool {
        !self.is_front()
    }

    pub fn is_left(&self) -> bool {
        self.index() % 2 == 0
    }
}

impl fmt::Display for WheelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================
// ----- per-tick context ---------------------
// ============================================

/// Engine-owned constants threaded into every tick.
/// Only [`SimContext::new`] builds one, so `dt > 0` always holds.
///
/// ```compile_fail
/// let ctx = raycast_vehicle::SimContext { dt: 0.0, gravity: 9.81 };
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SimContext {
    dt: Real,       // s, fixed timestep
    gravity: Real,  // m/s^2, magnitude
}

impl SimContext {
    pub fn new(dt: Real, gravity: Real) -> Result<Self, VehicleError> {
        if !(dt.is_finite() && dt > 0.0) || !(gravity.is_finite() && gravity >= 0.0) {
            return Err(VehicleError::InvalidContext { dt, gravity });
        }
        Ok(Self { dt, gravity })
    }

    pub fn dt(&self) -> Real {
        self.dt
    }

    pub fn gravity(&self) -> Real {
        self.gravity
    }
}

impl Default for SimContext {
    fn default() -> Self {
        Self { dt: 1.0 / 60.0, gravity: 9.81 }
    }
}
