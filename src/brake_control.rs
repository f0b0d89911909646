use crate::{backend::PhysicsBackend, config::VehicleConfig, wheel::WheelSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrakeState {
    Released,
    Applied,
}

impl BrakeState {
    pub fn from_input(braking: bool) -> Self {
        if braking {
            Self::Applied
        } else {
            Self::Released
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrakeControl {
    pub state: BrakeState,
    pub torque: f64,
}

/// All-or-nothing brakes on every wheel. No ramp, no anti-lock.
///
/// Motor torque is left alone; the solver sorts out a wheel that is both
/// driven and braked.
#[derive(Debug)]
pub struct BrakeController {
    brake_force: f64,
}

impl BrakeController {
    pub fn from_config(config: &VehicleConfig) -> Self {
        Self::new(config.brake_force)
    }

    pub fn new(brake_force: f64) -> Self {
        Self { brake_force }
    }

    pub fn control(&self, braking: bool) -> BrakeControl {
        let state = BrakeState::from_input(braking);
        let torque = match state {
            BrakeState::Applied => self.brake_force,
            BrakeState::Released => 0.0,
        };
        BrakeControl { state, torque }
    }

    pub fn step<B>(&self, wheels: &WheelSet, backend: &mut B, braking: bool) -> BrakeControl
    where
        B: PhysicsBackend + ?Sized,
    {
        let control = self.control(braking);
        for wheel in wheels.iter() {
            backend.set_brake_torque(wheel.wheel, control.torque);
        }
        control
    }
}
