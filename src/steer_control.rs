use crate::{backend::PhysicsBackend, config::VehicleConfig, wheel::WheelSet};

#[derive(Debug)]
pub struct SteerController {
    pub max_steering_angle: f64,
}

impl SteerController {
    pub fn from_config(config: &VehicleConfig) -> Self {
        Self::new(config.max_steer_angle)
    }

    pub fn new(max_steering_angle: f64) -> Self {
        Self { max_steering_angle }
    }

    /// Steering angle in degrees for a steering axis in [-1, 1].
    pub fn steer_angle(&self, horizontal: f64) -> f64 {
        let max = self.max_steering_angle;
        (max * horizontal).clamp(-max, max)
    }

    /// Every steerable wheel gets the same angle.
    pub fn step<B>(&self, wheels: &WheelSet, backend: &mut B, horizontal: f64) -> f64
    where
        B: PhysicsBackend + ?Sized,
    {
        let angle = self.steer_angle(horizontal);
        for wheel in wheels.steerable() {
            backend.set_steer_angle(wheel.wheel, angle);
        }
        angle
    }
}
