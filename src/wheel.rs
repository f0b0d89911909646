use crate::{constants::DEFAULT_WHEEL_RADIUS, error::ConfigError};
use serde::{Deserialize, Serialize};

/// Position of a wheel on the chassis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelRole {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

impl WheelRole {
    pub const ALL: [WheelRole; 4] = [
        WheelRole::FrontLeft,
        WheelRole::FrontRight,
        WheelRole::RearLeft,
        WheelRole::RearRight,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::FrontLeft => 0,
            Self::FrontRight => 1,
            Self::RearLeft => 2,
            Self::RearRight => 3,
        }
    }

    pub fn is_front(self) -> bool {
        matches!(self, Self::FrontLeft | Self::FrontRight)
    }
}

/// Handle of a wheel inside the physics backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WheelId(pub u32);

/// Handle of the transform that renders a wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualId(pub u32);

/// Static description of one wheel, as found in the vehicle config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelConfig {
    pub role: WheelRole,
    pub driven: bool,
    pub steerable: bool,
    pub radius: f64,
}

impl WheelConfig {
    /// Front wheels pull and steer, rear wheels only roll.
    pub fn default_for(role: WheelRole) -> Self {
        let front = role.is_front();
        Self {
            role,
            driven: front,
            steerable: front,
            radius: DEFAULT_WHEEL_RADIUS,
        }
    }

    pub fn default_layout() -> Vec<Self> {
        WheelRole::ALL.into_iter().map(Self::default_for).collect()
    }
}

/// Ties a role to the backend wheel and the visual that mirrors it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelBinding {
    pub role: WheelRole,
    pub wheel: WheelId,
    pub visual: VisualId,
}

/// A logical wheel the controller issues commands to.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelActuator {
    pub role: WheelRole,
    pub driven: bool,
    pub steerable: bool,
    pub radius: f64,
    pub wheel: WheelId,
    pub visual: VisualId,
}

/// The four wheels of a vehicle, stored in `WheelRole::index` order.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelSet {
    wheels: [WheelActuator; 4],
}

impl WheelSet {
    /// Pairs every configured wheel with its binding.
    ///
    /// The caller is expected to have validated `configs` so that each role
    /// appears exactly once.
    pub fn bind(configs: &[WheelConfig], bindings: &[WheelBinding]) -> Result<Self, ConfigError> {
        let actuator = |role: WheelRole| -> Result<WheelActuator, ConfigError> {
            let config = configs
                .iter()
                .find(|config| config.role == role)
                .ok_or(ConfigError::WheelCount(configs.len()))?;
            let binding = bindings
                .iter()
                .find(|binding| binding.role == role)
                .ok_or(ConfigError::MissingBinding(role))?;

            let WheelConfig {
                driven,
                steerable,
                radius,
                ..
            } = *config;

            Ok(WheelActuator {
                role,
                driven,
                steerable,
                radius,
                wheel: binding.wheel,
                visual: binding.visual,
            })
        };

        let [fl, fr, rl, rr] = WheelRole::ALL;
        Ok(Self {
            wheels: [actuator(fl)?, actuator(fr)?, actuator(rl)?, actuator(rr)?],
        })
    }

    pub fn get(&self, role: WheelRole) -> &WheelActuator {
        &self.wheels[role.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &WheelActuator> {
        self.wheels.iter()
    }

    pub fn driven(&self) -> impl Iterator<Item = &WheelActuator> {
        self.wheels.iter().filter(|wheel| wheel.driven)
    }

    pub fn steerable(&self) -> impl Iterator<Item = &WheelActuator> {
        self.wheels.iter().filter(|wheel| wheel.steerable)
    }
}
