//! Error types for vehicle assembly and configuration.
//!
//! The per-tick pipeline never fails; everything here is raised before the
//! first tick (config parsing, validation, assembly).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VehicleError {
    /// A physical parameter is out of its valid range.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },

    /// Drivetrain layout string is not one of RWD / FWD / AWD.
    #[error("unknown drive type `{0}` (expected RWD, FWD or AWD)")]
    UnknownDriveType(String),

    /// Fixed timestep or gravity handed to the pipeline is unusable.
    #[error("invalid simulation context: dt = {dt}, gravity = {gravity}")]
    InvalidContext { dt: f32, gravity: f32 },

    /// The chassis handle does not resolve to a body in the world.
    #[error("chassis body not found in physics world")]
    MissingBody,

    #[error("failed to read vehicle config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse vehicle config: {0}")]
    Json(#[from] serde_json::Error),
}

impl VehicleError {
    pub(crate) fn invalid(name: &'static str, value: f32, reason: &'static str) -> Self {
        Self::InvalidParameter { name, value, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_display() {
        let err = VehicleError::invalid("mass", 0.0, "must be positive");
        let msg = format!("{err}");
        assert!(msg.contains("mass"));
        assert!(msg.contains("must be positive"));
    }

    #[test]
    fn unknown_drive_type_display() {
        let err = VehicleError::UnknownDriveType("4WD".to_string());
        assert!(format!("{err}").contains("4WD"));
    }
}
