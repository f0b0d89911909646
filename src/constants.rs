use std::f64::consts::PI;

pub const DEFAULT_MOTOR_FORCE: f64 = 1500.0;
pub const DEFAULT_BRAKE_FORCE: f64 = 3000.0;
pub const DEFAULT_MAX_STEERING_DEGREES: f64 = 30.0;
pub const DEFAULT_MAX_SPEED: f64 = 200.0;

pub const DEFAULT_SUSPENSION_DISTANCE: f64 = 0.1;
pub const DEFAULT_SUSPENSION_SPRING: f64 = 10000.0;
pub const DEFAULT_SUSPENSION_DAMPER: f64 = 450.0;

pub const DEFAULT_FRICTION_COEFFICIENT: f64 = 1.0;
pub const DEFAULT_WHEEL_RADIUS: f64 = 0.5;

/// Multiplier taking `rpm * radius` to the speed unit `max_speed` is given in.
pub const RPM_RADIUS_TO_SPEED: f64 = 60.0 / 1000.0 * PI;

/// Angle between chassis forward and the contact normal on level ground.
pub const FLAT_GROUND_DEGREES: f64 = 90.0;

pub const DEFAULT_FIXED_STEP_SEC: f64 = 0.02;
pub const DEFAULT_MAX_STEPS_PER_FRAME: usize = 8;

/// Environment variable prefix picked up by `VehicleConfig::load`.
pub const ENV_PREFIX: &str = "VEHICLE_";
