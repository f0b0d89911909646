use crate::{
    backend::{PhysicsBackend, WheelFrictionCurve},
    config::{CurveUpdate, FrictionConfig, FrictionScope, SlopeResponse, VehicleConfig},
    constants::FLAT_GROUND_DEGREES,
    physics::{lerp, surface_angle_degrees},
    wheel::{WheelActuator, WheelSet},
};
use tracing::trace;

/// Makes sideways grip follow the slope under a wheel.
///
/// Out of the box only the front-left wheel is adjusted. `FrictionScope`
/// widens that to all four.
#[derive(Debug, Clone, PartialEq)]
pub struct FrictionModulator {
    pub coefficient: f64,
    pub config: FrictionConfig,
}

impl FrictionModulator {
    pub fn from_config(config: &VehicleConfig) -> Self {
        Self {
            coefficient: config.friction_coefficient,
            config: config.friction.clone(),
        }
    }

    /// Stiffness for a forward-to-normal angle in degrees.
    pub fn stiffness(&self, angle_degrees: f64) -> f64 {
        let fc = self.coefficient;
        let angle = if angle_degrees.is_nan() {
            FLAT_GROUND_DEGREES
        } else {
            angle_degrees.clamp(0.0, FLAT_GROUND_DEGREES)
        };

        let t = match self.config.slope_response {
            SlopeResponse::FlatBaseline => 1.0 - angle / FLAT_GROUND_DEGREES,
            SlopeResponse::RawAngle => angle / FLAT_GROUND_DEGREES,
        };
        lerp(fc, 2.0 * fc, t)
    }

    pub fn curve(&self, current: WheelFrictionCurve, stiffness: f64) -> WheelFrictionCurve {
        let base = match self.config.curve_update {
            CurveUpdate::PreserveShape => current,
            CurveUpdate::Reset => WheelFrictionCurve::default(),
        };
        WheelFrictionCurve { stiffness, ..base }
    }

    /// Updates each target wheel that is on the ground.
    ///
    /// Returns the stiffness written to the first target wheel, `None` when
    /// that wheel had no contact this tick.
    pub fn step<B>(&self, wheels: &WheelSet, backend: &mut B) -> Option<f64>
    where
        B: PhysicsBackend + ?Sized,
    {
        let forward = backend.chassis_forward();
        let targets: Vec<&WheelActuator> = match self.config.scope {
            FrictionScope::ReferenceWheel => vec![wheels.get(self.config.reference_wheel)],
            FrictionScope::AllWheels => wheels.iter().collect(),
        };

        let mut first = None;
        for (index, wheel) in targets.into_iter().enumerate() {
            let Some(hit) = backend.ground_hit(wheel.wheel) else {
                trace!("{:?} has no ground contact, keeping its friction", wheel.role);
                continue;
            };

            let angle = surface_angle_degrees(&forward, &hit.normal);
            let stiffness = self.stiffness(angle);
            let curve = self.curve(backend.sideways_friction(wheel.wheel), stiffness);
            backend.set_sideways_friction(wheel.wheel, curve);

            if index == 0 {
                first = Some(stiffness);
            }
        }

        first
    }
}
