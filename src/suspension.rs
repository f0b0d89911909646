use crate::{
    backend::{JointSpring, PhysicsBackend},
    config::VehicleConfig,
    wheel::WheelSet,
};

/// One spring profile shared by all four wheels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuspensionController {
    pub spring: f64,
    pub damper: f64,
    pub distance: f64,
}

impl SuspensionController {
    pub fn from_config(config: &VehicleConfig) -> Self {
        Self {
            spring: config.suspension_spring,
            damper: config.suspension_damper,
            distance: config.suspension_distance,
        }
    }

    pub fn joint_spring(&self) -> JointSpring {
        JointSpring {
            spring: self.spring,
            damper: self.damper,
            target_position: self.distance,
        }
    }

    /// Rewrites the spring on every wheel, every tick, so that anything that
    /// touched the backend in between is overridden.
    pub fn step<B>(&self, wheels: &WheelSet, backend: &mut B)
    where
        B: PhysicsBackend + ?Sized,
    {
        let spring = self.joint_spring();
        for wheel in wheels.iter() {
            backend.set_suspension_spring(wheel.wheel, spring);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_comes_from_config() {
        let suspension = SuspensionController::from_config(&VehicleConfig::default());

        let spring = suspension.joint_spring();
        assert_eq!(spring.spring, 10000.0);
        assert_eq!(spring.damper, 450.0);
        assert_eq!(spring.target_position, 0.1);
    }
}
