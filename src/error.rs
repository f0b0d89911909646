use crate::wheel::WheelRole;
use thiserror::Error;

/// Reasons a vehicle is refused before it enters the simulation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{field}` must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("`{field}` must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("expected exactly 4 wheels, got {0}")]
    WheelCount(usize),

    #[error("wheel role {0:?} is configured more than once")]
    DuplicateWheel(WheelRole),

    #[error("no backend wheel is bound for role {0:?}")]
    MissingBinding(WheelRole),

    #[error("`speed_wheels` must name at least one wheel")]
    NoSpeedWheels,

    #[error("failed to load vehicle config: {0}")]
    Load(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        Self::Load(Box::new(error))
    }
}
