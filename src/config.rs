// ==============================================================================
// config.rs — VEHICLE PARAMETERS (FLAT, NAMED SCALARS)
// ------------------------------------------------------------------------------
// The host loads one VehicleConfig before assembly, either from a preset below
// or from a JSON file. validate() runs once at assembly; the tick pipeline
// trusts these values and never re-checks them.
// ==============================================================================

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::VehicleError;

/// Which wheel set receives drive force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DriveType {
    Rwd,
    Fwd,
    Awd,
}

impl DriveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriveType::Rwd => "RWD",
            DriveType::Fwd => "FWD",
            DriveType::Awd => "AWD",
        }
    }

    /// Whether a wheel on the given axle is driven under this layout.
    pub fn drives(&self, is_front: bool) -> bool {
        match self {
            DriveType::Rwd => !is_front,
            DriveType::Fwd => is_front,
            DriveType::Awd => true,
        }
    }
}

impl FromStr for DriveType {
    type Err = VehicleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RWD" => Ok(DriveType::Rwd),
            "FWD" => Ok(DriveType::Fwd),
            "AWD" => Ok(DriveType::Awd),
            _ => Err(VehicleError::UnknownDriveType(s.to_string())),
        }
    }
}

impl fmt::Display for DriveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    // --- Chassis ---
    pub mass: f32,                      // kg
    pub wheelbase: f32,                 // m (front mount to rear mount)
    pub track: f32,                     // m (left mount to right mount)
    pub chassis_half_extents: [f32; 3], // [hx, hy, hz] m, collider only

    // --- Drivetrain / brakes ---
    pub drive_type: DriveType,
    pub top_speed_kmh: f32,      // km/h, drive cuts out at or above this
    pub max_drive_force: f32,    // N per driven wheel at full throttle
    pub max_brake_force: f32,    // N per wheel before bias
    pub front_brake_bias: f32,   // multiplier on front wheels
    pub rear_brake_bias: f32,    // multiplier on rear wheels

    // --- Steering ---
    pub max_steer_angle: f32,    // radians

    // --- Suspension ---
    pub mount_height: f32,       // m, mount Y in chassis space
    pub suspension_angle: f32,   // radians, + leans strut bottom outward
    pub rest_length: f32,        // m
    pub spring_stiffness: f32,   // N/m
    pub damping: f32,            // N*s/m

    // --- Tire ---
    pub tire_friction: f32,      // lateral friction coefficient
    pub tire_width: f32,         // m
    pub tire_diameter: f32,      // m
}

pub const COUPE: VehicleConfig = VehicleConfig {
    mass: 1200.0,
    wheelbase: 2.6,
    track: 1.6,
    chassis_half_extents: [1.3, 0.25, 0.8],

    drive_type: DriveType::Rwd,
    top_speed_kmh: 180.0,
    max_drive_force: 3000.0,
    max_brake_force: 4000.0,
    front_brake_bias: 1.2,
    rear_brake_bias: 0.8,

    max_steer_angle: 0.52,       // ~30 degrees

    mount_height: 0.0,
    suspension_angle: 0.0,
    rest_length: 0.5,
    spring_stiffness: 35_000.0,
    damping: 3_500.0,

    tire_friction: 0.6,
    tire_width: 0.25,
    tire_diameter: 0.66,
};

pub const TRUCK: VehicleConfig = VehicleConfig {
    mass: 3500.0,
    wheelbase: 3.4,
    track: 1.9,
    chassis_half_extents: [1.8, 0.4, 1.0],

    drive_type: DriveType::Awd,
    top_speed_kmh: 110.0,
    max_drive_force: 5000.0,
    max_brake_force: 9000.0,
    front_brake_bias: 1.2,
    rear_brake_bias: 0.8,

    max_steer_angle: 0.6,

    mount_height: 0.1,
    suspension_angle: 0.05,
    rest_length: 0.6,
    spring_stiffness: 90_000.0,
    damping: 9_000.0,

    tire_friction: 0.8,
    tire_width: 0.3,
    tire_diameter: 0.9,
};

impl Default for VehicleConfig {
    fn default() -> Self {
        COUPE
    }
}

fn finite(name: &'static str, value: f32) -> Result<f32, VehicleError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(VehicleError::invalid(name, value, "must be finite"))
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), VehicleError> {
    if finite(name, value)? > 0.0 {
        Ok(())
    } else {
        Err(VehicleError::invalid(name, value, "must be positive"))
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), VehicleError> {
    if finite(name, value)? >= 0.0 {
        Ok(())
    } else {
        Err(VehicleError::invalid(name, value, "must not be negative"))
    }
}

impl VehicleConfig {
    pub fn tire_radius(&self) -> f32 {
        self.tire_diameter * 0.5
    }

    /// Top speed converted to m/s.
    pub fn top_speed(&self) -> f32 {
        self.top_speed_kmh / 3.6
    }

    pub fn validate(&self) -> Result<(), VehicleError> {
        positive("mass", self.mass)?;
        positive("wheelbase", self.wheelbase)?;
        positive("track", self.track)?;
        positive("top_speed_kmh", self.top_speed_kmh)?;
        positive("rest_length", self.rest_length)?;
        positive("tire_diameter", self.tire_diameter)?;

        non_negative("max_drive_force", self.max_drive_force)?;
        non_negative("max_brake_force", self.max_brake_force)?;
        non_negative("front_brake_bias", self.front_brake_bias)?;
        non_negative("rear_brake_bias", self.rear_brake_bias)?;
        non_negative("spring_stiffness", self.spring_stiffness)?;
        non_negative("damping", self.damping)?;
        non_negative("tire_friction", self.tire_friction)?;
        non_negative("tire_width", self.tire_width)?;

        finite("mount_height", self.mount_height)?;

        let steer = finite("max_steer_angle", self.max_steer_angle)?;
        if !(0.0..std::f32::consts::FRAC_PI_2).contains(&steer) {
            return Err(VehicleError::invalid(
                "max_steer_angle",
                steer,
                "must be in [0, pi/2)",
            ));
        }

        let tilt = finite("suspension_angle", self.suspension_angle)?;
        if tilt.abs() >= std::f32::consts::FRAC_PI_2 {
            return Err(VehicleError::invalid(
                "suspension_angle",
                tilt,
                "must be in (-pi/2, pi/2)",
            ));
        }

        for (i, &h) in self.chassis_half_extents.iter().enumerate() {
            let name = ["chassis_half_extents.x", "chassis_half_extents.y", "chassis_half_extents.z"][i];
            positive(name, h)?;
        }

        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, VehicleError> {
        let config: VehicleConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, VehicleError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        info!(
            "loaded vehicle config from {} ({}, {:.0} kg)",
            path.display(),
            config.drive_type,
            config.mass
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        COUPE.validate().unwrap();
        TRUCK.validate().unwrap();
    }

    #[test]
    fn drive_type_parses_case_insensitively() {
        assert_eq!("awd".parse::<DriveType>().unwrap(), DriveType::Awd);
        assert_eq!(" FWD ".parse::<DriveType>().unwrap(), DriveType::Fwd);
        assert!(matches!(
            "4x4".parse::<DriveType>(),
            Err(VehicleError::UnknownDriveType(_))
        ));
    }

    #[test]
    fn drive_layout_gates_axles() {
        assert!(DriveType::Fwd.drives(true));
        assert!(!DriveType::Fwd.drives(false));
        assert!(!DriveType::Rwd.drives(true));
        assert!(DriveType::Rwd.drives(false));
        assert!(DriveType::Awd.drives(true) && DriveType::Awd.drives(false));
    }

    #[test]
    fn zero_mass_is_rejected() {
        let config = VehicleConfig { mass: 0.0, ..COUPE };
        assert!(matches!(
            config.validate(),
            Err(VehicleError::InvalidParameter { name: "mass", .. })
        ));
    }

    #[test]
    fn negative_spring_or_damping_is_rejected() {
        let config = VehicleConfig { spring_stiffness: -1.0, ..COUPE };
        assert!(config.validate().is_err());
        let config = VehicleConfig { damping: -10.0, ..COUPE };
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_finite_value_is_rejected() {
        let config = VehicleConfig { wheelbase: f32::NAN, ..COUPE };
        assert!(config.validate().is_err());
    }

    #[test]
    fn json_overrides_defaults() {
        let config =
            VehicleConfig::from_json_str(r#"{ "mass": 900.0, "drive_type": "FWD" }"#).unwrap();
        assert_eq!(config.mass, 900.0);
        assert_eq!(config.drive_type, DriveType::Fwd);
        assert_eq!(config.rest_length, COUPE.rest_length);
    }

    #[test]
    fn json_with_unknown_drive_type_fails() {
        let err = VehicleConfig::from_json_str(r#"{ "drive_type": "6WD" }"#).unwrap_err();
        assert!(matches!(err, VehicleError::Json(_)));
    }

    #[test]
    fn top_speed_is_converted_from_kmh() {
        let config = VehicleConfig { top_speed_kmh: 36.0, ..COUPE };
        assert!((config.top_speed() - 10.0).abs() < 1e-5);
    }
}
