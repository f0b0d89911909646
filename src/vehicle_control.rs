use crate::{
    backend::{PhysicsBackend, VisualSink},
    brake_control::{BrakeControl, BrakeController, BrakeState},
    config::VehicleConfig,
    error::ConfigError,
    friction::FrictionModulator,
    input::InputSnapshot,
    speed_control::{MotorControl, MotorController, MotorControllerInit},
    steer_control::SteerController,
    suspension::SuspensionController,
    wheel::{WheelBinding, WheelSet},
};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct VehicleControllerInit {
    pub config: VehicleConfig,
    pub bindings: Vec<WheelBinding>,
}

impl VehicleControllerInit {
    /// Validates the config and binds every wheel. A vehicle that fails here
    /// never reaches the control loop.
    pub fn build(&self) -> Result<VehicleController, ConfigError> {
        let Self {
            ref config,
            ref bindings,
        } = *self;

        config.validate()?;
        let wheels = WheelSet::bind(&config.wheels, bindings)?;

        info!(
            "Vehicle controller ready: motor {} brake {} max speed {} max steer {}°",
            config.motor_force, config.brake_force, config.max_speed, config.max_steer_angle
        );

        Ok(VehicleController {
            wheels,
            motor_controller: MotorControllerInit::from_config(config).build(),
            steer_controller: SteerController::from_config(config),
            brake_controller: BrakeController::from_config(config),
            suspension_controller: SuspensionController::from_config(config),
            friction_modulator: FrictionModulator::from_config(config),
            state: ControlState::default(),
        })
    }
}

/// What the controller decided on the last fixed step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlState {
    pub input: InputSnapshot,
    pub estimated_speed: f64,
    /// Torque sent to each driven wheel.
    pub motor_torque: f64,
    /// Degrees, sent to each steerable wheel.
    pub steer_angle: f64,
    pub brake: BrakeControl,
    /// Stiffness written to the reference friction wheel, `None` when it was
    /// airborne.
    pub friction_stiffness: Option<f64>,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            input: InputSnapshot::default(),
            estimated_speed: 0.0,
            motor_torque: 0.0,
            steer_angle: 0.0,
            brake: BrakeControl {
                state: BrakeState::Released,
                torque: 0.0,
            },
            friction_stiffness: None,
        }
    }
}

#[derive(Debug)]
pub struct VehicleController {
    wheels: WheelSet,
    motor_controller: MotorController,
    steer_controller: SteerController,
    brake_controller: BrakeController,
    suspension_controller: SuspensionController,
    friction_modulator: FrictionModulator,
    state: ControlState,
}

impl VehicleController {
    /// Runs the control phase. Call exactly once per physics step.
    pub fn fixed_update<B>(&mut self, backend: &mut B, input: InputSnapshot) -> ControlState
    where
        B: PhysicsBackend + ?Sized,
    {
        let Self {
            ref wheels,
            ref mut motor_controller,
            ref steer_controller,
            ref brake_controller,
            ref suspension_controller,
            ref friction_modulator,
            ..
        } = *self;
        let input = input.clamped();

        // Motor
        let MotorControl {
            estimated_speed,
            torque: motor_torque,
        } = motor_controller.step(wheels, backend, input.vertical);

        // Steering
        let steer_angle = steer_controller.step(wheels, backend, input.horizontal);

        // Brakes
        let brake = brake_controller.step(wheels, backend, input.braking);

        // Suspension
        suspension_controller.step(wheels, backend);

        // Friction
        let friction_stiffness = friction_modulator.step(wheels, backend);

        let state = ControlState {
            input,
            estimated_speed,
            motor_torque,
            steer_angle,
            brake,
            friction_stiffness,
        };
        debug!(
            "speed {:.2} torque {:.1} steer {:.1} brake {:?}",
            estimated_speed, motor_torque, steer_angle, brake.state
        );

        self.state = state;
        state
    }

    /// Copies every wheel's simulated pose onto its visual. Reads only, so it
    /// can run at any rate.
    pub fn sync_visuals<B, S>(&self, backend: &B, sink: &mut S)
    where
        B: PhysicsBackend + ?Sized,
        S: VisualSink + ?Sized,
    {
        for wheel in self.wheels.iter() {
            let pose = backend.world_pose(wheel.wheel);
            sink.set_world_pose(wheel.visual, &pose);
        }
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }
}
