//! Seams to the physics solver and to the renderer.
//!
//! The controller never integrates forces itself. It reads wheel state from a
//! [`PhysicsBackend`] and writes commands back, once per fixed step. Every
//! call is assumed to succeed and to return promptly.

use crate::wheel::{VisualId, WheelId};
use nalgebra::{Isometry3, Point3, Vector3};

/// Spring holding a wheel at its suspension target.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointSpring {
    /// Stiffness.
    pub spring: f64,
    /// Damping.
    pub damper: f64,
    /// Rest length the spring pulls the wheel toward.
    pub target_position: f64,
}

/// Tire friction curve.
///
/// Only `stiffness` is driven by the controller. `Default` zeroes every
/// field.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelFrictionCurve {
    pub extremum_slip: f64,
    pub extremum_value: f64,
    pub asymptote_slip: f64,
    pub asymptote_value: f64,
    pub stiffness: f64,
}

/// Contact between a wheel and the ground.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    pub point: Point3<f64>,
    pub normal: Vector3<f64>,
}

/// Per-wheel query and command surface of a physics solver.
pub trait PhysicsBackend {
    /// Wheel angular velocity in revolutions per minute.
    fn rpm(&self, wheel: WheelId) -> f64;

    fn motor_torque(&self, wheel: WheelId) -> f64;
    fn set_motor_torque(&mut self, wheel: WheelId, torque: f64);

    fn brake_torque(&self, wheel: WheelId) -> f64;
    fn set_brake_torque(&mut self, wheel: WheelId, torque: f64);

    /// Steering angle in degrees.
    fn steer_angle(&self, wheel: WheelId) -> f64;
    fn set_steer_angle(&mut self, wheel: WheelId, degrees: f64);

    fn suspension_spring(&self, wheel: WheelId) -> JointSpring;
    fn set_suspension_spring(&mut self, wheel: WheelId, spring: JointSpring);

    fn sideways_friction(&self, wheel: WheelId) -> WheelFrictionCurve;
    fn set_sideways_friction(&mut self, wheel: WheelId, curve: WheelFrictionCurve);

    /// `None` when the wheel is airborne.
    fn ground_hit(&self, wheel: WheelId) -> Option<GroundHit>;

    fn world_pose(&self, wheel: WheelId) -> Isometry3<f64>;

    /// Forward axis of the chassis in world space.
    fn chassis_forward(&self) -> Vector3<f64>;
}

/// A backend the host loop can advance by one fixed step.
pub trait SteppedBackend: PhysicsBackend {
    fn step(&mut self, dt: f64);
}

/// Receives wheel poses for display.
pub trait VisualSink {
    fn set_world_pose(&mut self, visual: VisualId, pose: &Isometry3<f64>);
}
