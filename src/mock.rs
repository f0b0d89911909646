//! Deterministic in-process backend for tests and demos.
//!
//! Nothing here simulates a car. Wheel rpm, contacts and poses are plain
//! fields that the caller sets; [`MockBackend::step`] only spins wheels from
//! the last torque commands so that a host loop has something to watch.

use crate::{
    backend::{
        GroundHit, JointSpring, PhysicsBackend, SteppedBackend, VisualSink, WheelFrictionCurve,
    },
    wheel::{VisualId, WheelBinding, WheelId, WheelRole},
};
use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use std::collections::HashMap;

const RAD_PER_SEC_TO_RPM: f64 = 60.0 / (2.0 * std::f64::consts::PI);

#[derive(Debug, Clone, PartialEq)]
pub struct MockWheel {
    pub rpm: f64,
    pub motor_torque: f64,
    pub brake_torque: f64,
    pub steer_angle: f64,
    pub suspension_spring: JointSpring,
    pub sideways_friction: WheelFrictionCurve,
    pub ground_hit: Option<GroundHit>,
    pub world_pose: Isometry3<f64>,
}

impl Default for MockWheel {
    fn default() -> Self {
        Self {
            rpm: 0.0,
            motor_torque: 0.0,
            brake_torque: 0.0,
            steer_angle: 0.0,
            suspension_spring: JointSpring::default(),
            sideways_friction: WheelFrictionCurve::default(),
            ground_hit: Some(GroundHit {
                point: Point3::origin(),
                normal: Vector3::y(),
            }),
            world_pose: Isometry3::identity(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockBackend {
    pub wheels: Vec<MockWheel>,
    pub chassis_forward: Vector3<f64>,
    /// Rotational inertia used by `step` to turn net torque into spin.
    pub inertia: f64,
    pub steps: usize,
}

impl MockBackend {
    /// Four wheels on level ground under a chassis facing +Z.
    pub fn new() -> Self {
        let wheels = WheelRole::ALL
            .into_iter()
            .map(|role| {
                let x = if matches!(role, WheelRole::FrontLeft | WheelRole::RearLeft) {
                    -0.8
                } else {
                    0.8
                };
                let z = if role.is_front() { 1.3 } else { -1.3 };
                MockWheel {
                    world_pose: Isometry3::from_parts(
                        Translation3::new(x, 0.0, z),
                        UnitQuaternion::identity(),
                    ),
                    ..MockWheel::default()
                }
            })
            .collect();

        Self {
            wheels,
            chassis_forward: Vector3::z(),
            inertia: 1.5,
            steps: 0,
        }
    }

    /// Bindings matching the wheel order of `new`, visuals numbered after
    /// their wheels.
    pub fn bindings(&self) -> Vec<WheelBinding> {
        WheelRole::ALL
            .into_iter()
            .map(|role| WheelBinding {
                role,
                wheel: Self::id(role),
                visual: VisualId(role.index() as u32),
            })
            .collect()
    }

    pub fn id(role: WheelRole) -> WheelId {
        WheelId(role.index() as u32)
    }

    pub fn wheel(&self, role: WheelRole) -> &MockWheel {
        &self.wheels[role.index()]
    }

    pub fn wheel_mut(&mut self, role: WheelRole) -> &mut MockWheel {
        &mut self.wheels[role.index()]
    }

    /// Sets the same rpm on every wheel.
    pub fn set_rpm(&mut self, rpm: f64) {
        for wheel in &mut self.wheels {
            wheel.rpm = rpm;
        }
    }

    fn get(&self, wheel: WheelId) -> &MockWheel {
        &self.wheels[wheel.0 as usize]
    }

    fn get_mut(&mut self, wheel: WheelId) -> &mut MockWheel {
        &mut self.wheels[wheel.0 as usize]
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsBackend for MockBackend {
    fn rpm(&self, wheel: WheelId) -> f64 {
        self.get(wheel).rpm
    }

    fn motor_torque(&self, wheel: WheelId) -> f64 {
        self.get(wheel).motor_torque
    }

    fn set_motor_torque(&mut self, wheel: WheelId, torque: f64) {
        self.get_mut(wheel).motor_torque = torque;
    }

    fn brake_torque(&self, wheel: WheelId) -> f64 {
        self.get(wheel).brake_torque
    }

    fn set_brake_torque(&mut self, wheel: WheelId, torque: f64) {
        self.get_mut(wheel).brake_torque = torque;
    }

    fn steer_angle(&self, wheel: WheelId) -> f64 {
        self.get(wheel).steer_angle
    }

    fn set_steer_angle(&mut self, wheel: WheelId, degrees: f64) {
        self.get_mut(wheel).steer_angle = degrees;
    }

    fn suspension_spring(&self, wheel: WheelId) -> JointSpring {
        self.get(wheel).suspension_spring
    }

    fn set_suspension_spring(&mut self, wheel: WheelId, spring: JointSpring) {
        self.get_mut(wheel).suspension_spring = spring;
    }

    fn sideways_friction(&self, wheel: WheelId) -> WheelFrictionCurve {
        self.get(wheel).sideways_friction
    }

    fn set_sideways_friction(&mut self, wheel: WheelId, curve: WheelFrictionCurve) {
        self.get_mut(wheel).sideways_friction = curve;
    }

    fn ground_hit(&self, wheel: WheelId) -> Option<GroundHit> {
        self.get(wheel).ground_hit
    }

    fn world_pose(&self, wheel: WheelId) -> Isometry3<f64> {
        self.get(wheel).world_pose
    }

    fn chassis_forward(&self) -> Vector3<f64> {
        self.chassis_forward
    }
}

impl SteppedBackend for MockBackend {
    /// Brakes oppose spin and never reverse it within a step.
    fn step(&mut self, dt: f64) {
        let inertia = self.inertia;

        for wheel in &mut self.wheels {
            let omega = wheel.rpm / RAD_PER_SEC_TO_RPM;
            let driven = omega + wheel.motor_torque / inertia * dt;
            let braking = wheel.brake_torque / inertia * dt;
            let omega = if driven.abs() <= braking {
                0.0
            } else {
                driven - braking * driven.signum()
            };

            wheel.rpm = omega * RAD_PER_SEC_TO_RPM;
            let roll = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), omega * dt);
            wheel.world_pose.rotation = roll * wheel.world_pose.rotation;
        }

        self.steps += 1;
    }
}

/// Collects the last pose written to each visual.
#[derive(Debug, Clone, Default)]
pub struct RecordingVisuals {
    pub poses: HashMap<VisualId, Isometry3<f64>>,
    pub writes: usize,
}

impl VisualSink for RecordingVisuals {
    fn set_world_pose(&mut self, visual: VisualId, pose: &Isometry3<f64>) {
        self.poses.insert(visual, *pose);
        self.writes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motor_torque_spins_the_wheel_up() {
        let mut backend = MockBackend::new();
        let id = MockBackend::id(WheelRole::FrontLeft);
        backend.set_motor_torque(id, 30.0);

        backend.step(0.1);
        assert!(backend.rpm(id) > 0.0);
        assert_eq!(backend.steps, 1);
    }

    #[test]
    fn brakes_stop_without_reversing() {
        let mut backend = MockBackend::new();
        let id = MockBackend::id(WheelRole::RearLeft);
        backend.wheel_mut(WheelRole::RearLeft).rpm = 10.0;
        backend.set_brake_torque(id, 1.0e6);

        backend.step(0.02);
        assert_eq!(backend.rpm(id), 0.0);
    }
}
