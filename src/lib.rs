pub mod backend;
pub mod brake_control;
pub mod config;
pub mod constants;
pub mod error;
pub mod friction;
pub mod host;
pub mod input;
pub mod mock;
pub mod physics;
pub mod speed_control;
pub mod steer_control;
pub mod suspension;
pub mod vehicle_control;
pub mod wheel;

pub use backend::{
    GroundHit, JointSpring, PhysicsBackend, SteppedBackend, VisualSink, WheelFrictionCurve,
};
pub use config::VehicleConfig;
pub use error::ConfigError;
pub use host::{FixedStep, VehicleHost};
pub use input::{InputSnapshot, InputSource};
pub use vehicle_control::{ControlState, VehicleController, VehicleControllerInit};
pub use wheel::{VisualId, WheelBinding, WheelId, WheelRole};
