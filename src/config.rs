use crate::{
    constants::{
        DEFAULT_BRAKE_FORCE, DEFAULT_FRICTION_COEFFICIENT, DEFAULT_MAX_SPEED,
        DEFAULT_MAX_STEERING_DEGREES, DEFAULT_MOTOR_FORCE, DEFAULT_SUSPENSION_DAMPER,
        DEFAULT_SUSPENSION_DISTANCE, DEFAULT_SUSPENSION_SPRING, ENV_PREFIX,
    },
    error::ConfigError,
    wheel::{WheelConfig, WheelRole},
};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use noisy_float::types::R64;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Operator-tunable vehicle parameters. Set once before the vehicle is
/// spawned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    pub motor_force: f64,
    pub brake_force: f64,
    /// Degrees.
    pub max_steer_angle: f64,
    pub max_speed: f64,
    pub suspension_distance: f64,
    pub suspension_spring: f64,
    pub suspension_damper: f64,
    pub friction_coefficient: f64,
    pub wheels: Vec<WheelConfig>,
    pub speed_wheels: Vec<WheelRole>,
    pub speed_limiter: SpeedLimiterConfig,
    pub friction: FrictionConfig,
}

/// Which policy gates motor torque near `max_speed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpeedLimiterConfig {
    /// Full torque below the ceiling, none at or above it.
    HardCutoff,
    /// Torque scaled down by a PID loop as speed nears the ceiling.
    PidGovernor { kp: f64, ki: f64, kd: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrictionConfig {
    pub scope: FrictionScope,
    /// Wheel used when `scope` is `ReferenceWheel`.
    pub reference_wheel: WheelRole,
    pub curve_update: CurveUpdate,
    pub slope_response: SlopeResponse,
}

/// Wheels whose sideways friction follows the ground slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrictionScope {
    ReferenceWheel,
    AllWheels,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveUpdate {
    /// Overwrite stiffness, keep every other field of the current curve.
    PreserveShape,
    /// Write a fresh curve; every field but stiffness is zeroed.
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlopeResponse {
    /// `friction_coefficient` on level ground, doubling as the surface
    /// tilts toward the forward axis.
    FlatBaseline,
    /// `lerp(fc, 2 * fc, angle / 90)` taken literally: level ground doubles
    /// the grip and a normal along the forward axis keeps the plain
    /// coefficient. The exact inverse of `FlatBaseline`; pick it to keep tunes
    /// written against the literal formula.
    RawAngle,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            motor_force: DEFAULT_MOTOR_FORCE,
            brake_force: DEFAULT_BRAKE_FORCE,
            max_steer_angle: DEFAULT_MAX_STEERING_DEGREES,
            max_speed: DEFAULT_MAX_SPEED,
            suspension_distance: DEFAULT_SUSPENSION_DISTANCE,
            suspension_spring: DEFAULT_SUSPENSION_SPRING,
            suspension_damper: DEFAULT_SUSPENSION_DAMPER,
            friction_coefficient: DEFAULT_FRICTION_COEFFICIENT,
            wheels: WheelConfig::default_layout(),
            speed_wheels: vec![WheelRole::FrontLeft, WheelRole::FrontRight],
            speed_limiter: SpeedLimiterConfig::default(),
            friction: FrictionConfig::default(),
        }
    }
}

impl Default for SpeedLimiterConfig {
    fn default() -> Self {
        Self::HardCutoff
    }
}

impl Default for FrictionConfig {
    fn default() -> Self {
        Self {
            scope: FrictionScope::ReferenceWheel,
            reference_wheel: WheelRole::FrontLeft,
            curve_update: CurveUpdate::PreserveShape,
            slope_response: SlopeResponse::FlatBaseline,
        }
    }
}

impl VehicleConfig {
    /// Defaults, overridden by the TOML file at `path`, overridden by
    /// `VEHICLE_*` environment variables. The result is validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Loading vehicle config from {}", path.display());

        let figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Self {
            motor_force,
            brake_force,
            max_steer_angle,
            max_speed,
            suspension_distance,
            suspension_spring,
            suspension_damper,
            friction_coefficient,
            ref wheels,
            ref speed_wheels,
            ref speed_limiter,
            ..
        } = *self;

        ensure_positive("motor_force", motor_force)?;
        ensure_positive("brake_force", brake_force)?;
        ensure_positive("max_steer_angle", max_steer_angle)?;
        ensure_positive("max_speed", max_speed)?;
        ensure_positive("suspension_distance", suspension_distance)?;
        ensure_positive("suspension_spring", suspension_spring)?;
        ensure_positive("suspension_damper", suspension_damper)?;
        ensure_positive("friction_coefficient", friction_coefficient)?;

        if wheels.len() != WheelRole::ALL.len() {
            return Err(ConfigError::WheelCount(wheels.len()));
        }
        for (index, wheel) in wheels.iter().enumerate() {
            if wheels[..index].iter().any(|other| other.role == wheel.role) {
                return Err(ConfigError::DuplicateWheel(wheel.role));
            }
            ensure_positive("wheels.radius", wheel.radius)?;
        }

        if speed_wheels.is_empty() {
            return Err(ConfigError::NoSpeedWheels);
        }

        if let SpeedLimiterConfig::PidGovernor { kp, ki, kd } = *speed_limiter {
            ensure_positive("speed_limiter.kp", kp)?;
            ensure_finite("speed_limiter.ki", ki)?;
            ensure_finite("speed_limiter.kd", kd)?;
        }

        Ok(())
    }

    pub fn wheel(&self, role: WheelRole) -> Option<&WheelConfig> {
        self.wheels.iter().find(|wheel| wheel.role == role)
    }
}

pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    R64::try_new(value)
        .map(|value| value.raw())
        .ok_or(ConfigError::NotFinite { field, value })
}

pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    R64::try_new(value)
        .map(|value| value.raw())
        .filter(|value| *value > 0.0)
        .ok_or(ConfigError::NotPositive { field, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        VehicleConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_radius_is_rejected() {
        let mut config = VehicleConfig::default();
        config.wheels[2].radius = 0.0;

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NotPositive {
                field: "wheels.radius",
                ..
            }
        ));
    }

    #[test]
    fn non_finite_force_is_rejected() {
        let config = VehicleConfig {
            motor_force: f64::INFINITY,
            ..VehicleConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "motor_force",
                ..
            })
        ));
    }

    #[test]
    fn negative_max_speed_is_rejected() {
        let config = VehicleConfig {
            max_speed: -1.0,
            ..VehicleConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn duplicate_roles_are_rejected() {
        let mut config = VehicleConfig::default();
        config.wheels[3].role = WheelRole::FrontLeft;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateWheel(WheelRole::FrontLeft))
        ));
    }

    #[test]
    fn three_wheels_are_rejected() {
        let mut config = VehicleConfig::default();
        config.wheels.pop();

        assert!(matches!(config.validate(), Err(ConfigError::WheelCount(3))));
    }

    #[test]
    fn empty_speed_wheels_are_rejected() {
        let config = VehicleConfig {
            speed_wheels: vec![],
            ..VehicleConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoSpeedWheels)));
    }

    #[test]
    fn governor_needs_a_positive_gain() {
        let config = VehicleConfig {
            speed_limiter: SpeedLimiterConfig::PidGovernor {
                kp: 0.0,
                ki: 0.0,
                kd: 0.0,
            },
            ..VehicleConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_overrides_defaults() {
        let toml = r#"
            motor_force = 900.0
            max_speed = 50.0
            speed_wheels = ["front_left", "rear_left"]

            [speed_limiter]
            kind = "pid_governor"
            kp = 0.2
            ki = 0.0
            kd = 0.01

            [friction]
            scope = "all_wheels"
            curve_update = "reset"
        "#;
        let figment =
            Figment::from(Serialized::defaults(VehicleConfig::default())).merge(Toml::string(toml));
        let config = VehicleConfig::from_figment(figment).unwrap();

        assert_eq!(config.motor_force, 900.0);
        assert_eq!(config.max_speed, 50.0);
        assert_eq!(config.brake_force, DEFAULT_BRAKE_FORCE);
        assert_eq!(
            config.speed_wheels,
            [WheelRole::FrontLeft, WheelRole::RearLeft]
        );
        assert_eq!(
            config.speed_limiter,
            SpeedLimiterConfig::PidGovernor {
                kp: 0.2,
                ki: 0.0,
                kd: 0.01
            }
        );
        assert_eq!(config.friction.scope, FrictionScope::AllWheels);
        assert_eq!(config.friction.curve_update, CurveUpdate::Reset);
        assert_eq!(config.friction.slope_response, SlopeResponse::FlatBaseline);
    }

    #[test]
    fn reference_wheel_scope_parses_its_role() {
        let toml = r#"
            [friction]
            reference_wheel = "rear_right"
        "#;
        let figment =
            Figment::from(Serialized::defaults(VehicleConfig::default())).merge(Toml::string(toml));
        let config = VehicleConfig::from_figment(figment).unwrap();

        assert_eq!(config.friction.scope, FrictionScope::ReferenceWheel);
        assert_eq!(config.friction.reference_wheel, WheelRole::RearRight);
    }

    #[test]
    fn env_overrides_the_file_and_splits_nested_keys() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("vehicle.toml", "motor_force = 10.0\nmax_speed = 20.0")?;
            jail.set_env("VEHICLE_MAX_SPEED", 77);
            jail.set_env("VEHICLE_FRICTION__SCOPE", "all_wheels");

            let config = VehicleConfig::load("vehicle.toml").map_err(|err| err.to_string())?;

            assert_eq!(config.motor_force, 10.0);
            assert_eq!(config.max_speed, 77.0);
            assert_eq!(config.brake_force, DEFAULT_BRAKE_FORCE);
            assert_eq!(config.friction.scope, FrictionScope::AllWheels);
            assert_eq!(config.friction.reference_wheel, WheelRole::FrontLeft);
            Ok(())
        });
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        figment::Jail::expect_with(|_| {
            let config = VehicleConfig::load("absent.toml").map_err(|err| err.to_string())?;
            assert_eq!(config, VehicleConfig::default());
            Ok(())
        });
    }

    #[test]
    fn invalid_file_values_fail_validation() {
        let figment = Figment::from(Serialized::defaults(VehicleConfig::default()))
            .merge(Toml::string("brake_force = 0.0"));
        assert!(VehicleConfig::from_figment(figment).is_err());
    }
}
