use crate::{
    backend::PhysicsBackend,
    config::{SpeedLimiterConfig, VehicleConfig},
    physics::estimate_speed,
    wheel::{WheelRole, WheelSet},
};
use pid::Pid;
use std::fmt::Debug;

/// Decides how much of the requested motor torque reaches the wheels.
pub trait SpeedLimiter: Debug {
    fn limit(&mut self, requested_torque: f64, estimated_speed: f64, max_speed: f64) -> f64;
}

/// Passes torque through below `max_speed` and cuts it to zero at or above.
/// No ramp, no hysteresis.
#[derive(Debug, Clone, Copy, Default)]
pub struct HardCutoff;

impl SpeedLimiter for HardCutoff {
    fn limit(&mut self, requested_torque: f64, estimated_speed: f64, max_speed: f64) -> f64 {
        if estimated_speed < max_speed {
            requested_torque
        } else {
            0.0
        }
    }
}

/// Scales torque by a PID loop holding speed under the ceiling.
///
/// The controller output is normalized to [0, 1] and multiplies the
/// requested torque, so the vehicle eases into `max_speed` instead of
/// hitting a wall. At or above the ceiling the torque is still zero.
#[derive(Debug)]
pub struct PidGovernor {
    speed_pid: Pid<f64>,
    output_limit: f64,
}

impl PidGovernor {
    pub const OUTPUT_LIMIT: f64 = 1.0;

    pub fn new(kp: f64, ki: f64, kd: f64, max_speed: f64) -> Self {
        let limit = Self::OUTPUT_LIMIT;
        Self {
            speed_pid: Pid::new(kp, ki, kd, limit, limit, limit, limit, max_speed),
            output_limit: limit,
        }
    }
}

impl SpeedLimiter for PidGovernor {
    fn limit(&mut self, requested_torque: f64, estimated_speed: f64, max_speed: f64) -> f64 {
        let Self {
            ref mut speed_pid,
            output_limit,
        } = *self;

        speed_pid.setpoint = max_speed;
        let output = speed_pid.next_control_output(estimated_speed).output;

        if estimated_speed >= max_speed {
            return 0.0;
        }

        let scale = (output / output_limit).clamp(0.0, 1.0);
        requested_torque * scale
    }
}

#[derive(Debug, Clone)]
pub struct MotorControllerInit {
    pub motor_force: f64,
    pub max_speed: f64,
    pub speed_wheels: Vec<WheelRole>,
    pub limiter: SpeedLimiterConfig,
}

impl MotorControllerInit {
    pub fn from_config(config: &VehicleConfig) -> Self {
        Self {
            motor_force: config.motor_force,
            max_speed: config.max_speed,
            speed_wheels: config.speed_wheels.clone(),
            limiter: config.speed_limiter.clone(),
        }
    }

    pub fn build(&self) -> MotorController {
        let Self {
            motor_force,
            max_speed,
            ref speed_wheels,
            ref limiter,
        } = *self;

        let limiter: Box<dyn SpeedLimiter> = match *limiter {
            SpeedLimiterConfig::HardCutoff => Box::new(HardCutoff),
            SpeedLimiterConfig::PidGovernor { kp, ki, kd } => {
                Box::new(PidGovernor::new(kp, ki, kd, max_speed))
            }
        };

        MotorController::with_limiter(motor_force, max_speed, speed_wheels.clone(), limiter)
    }
}

#[derive(Debug)]
pub struct MotorController {
    motor_force: f64,
    max_speed: f64,
    speed_wheels: Vec<WheelRole>,
    limiter: Box<dyn SpeedLimiter>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorControl {
    pub estimated_speed: f64,
    /// Torque sent to every driven wheel.
    pub torque: f64,
}

impl MotorController {
    pub fn with_limiter(
        motor_force: f64,
        max_speed: f64,
        speed_wheels: Vec<WheelRole>,
        limiter: Box<dyn SpeedLimiter>,
    ) -> Self {
        Self {
            motor_force,
            max_speed,
            speed_wheels,
            limiter,
        }
    }

    pub fn estimate_speed<B>(&self, wheels: &WheelSet, backend: &B) -> f64
    where
        B: PhysicsBackend + ?Sized,
    {
        estimate_speed(self.speed_wheels.iter().map(|&role| {
            let wheel = wheels.get(role);
            (backend.rpm(wheel.wheel), wheel.radius)
        }))
    }

    /// Torque for the driven wheels given the throttle axis and speed.
    pub fn torque(&mut self, vertical: f64, estimated_speed: f64) -> f64 {
        let requested = vertical * self.motor_force;
        self.limiter.limit(requested, estimated_speed, self.max_speed)
    }

    pub fn step<B>(&mut self, wheels: &WheelSet, backend: &mut B, vertical: f64) -> MotorControl
    where
        B: PhysicsBackend + ?Sized,
    {
        let estimated_speed = self.estimate_speed(wheels, backend);
        let torque = self.torque(vertical, estimated_speed);

        for wheel in wheels.driven() {
            backend.set_motor_torque(wheel.wheel, torque);
        }

        MotorControl {
            estimated_speed,
            torque,
        }
    }
}
