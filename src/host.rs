use crate::{
    backend::{SteppedBackend, VisualSink},
    config::ensure_positive,
    constants::{DEFAULT_FIXED_STEP_SEC, DEFAULT_MAX_STEPS_PER_FRAME},
    error::ConfigError,
    input::{InputSnapshot, InputSource},
    vehicle_control::{ControlState, VehicleController},
};
use tracing::warn;

/// Turns variable frame times into a whole number of fixed steps.
#[derive(Debug, Clone)]
pub struct FixedStep {
    step_sec: f64,
    max_steps_per_frame: usize,
    accumulator: f64,
}

impl FixedStep {
    pub fn new(step_sec: f64, max_steps_per_frame: usize) -> Result<Self, ConfigError> {
        let step_sec = ensure_positive("step_sec", step_sec)?;
        if max_steps_per_frame == 0 {
            return Err(ConfigError::NotPositive {
                field: "max_steps_per_frame",
                value: 0.0,
            });
        }

        Ok(Self {
            step_sec,
            max_steps_per_frame,
            accumulator: 0.0,
        })
    }

    /// Adds `frame_sec` and returns how many steps are due.
    ///
    /// Time beyond `max_steps_per_frame` steps is dropped rather than
    /// carried into the next frame.
    pub fn advance(&mut self, frame_sec: f64) -> usize {
        if frame_sec.is_finite() && frame_sec > 0.0 {
            self.accumulator += frame_sec;
        }

        let due = (self.accumulator / self.step_sec).floor() as usize;
        let steps = due.min(self.max_steps_per_frame);
        self.accumulator -= steps as f64 * self.step_sec;

        if due > steps {
            warn!(
                "Dropping {} fixed steps ({:.3}s) after a long frame",
                due - steps,
                self.accumulator
            );
            self.accumulator = 0.0;
        }

        steps
    }

    pub fn step_sec(&self) -> f64 {
        self.step_sec
    }

    /// Time carried over to the next frame.
    pub fn remainder(&self) -> f64 {
        self.accumulator
    }
}

impl Default for FixedStep {
    fn default() -> Self {
        Self {
            step_sec: DEFAULT_FIXED_STEP_SEC,
            max_steps_per_frame: DEFAULT_MAX_STEPS_PER_FRAME,
            accumulator: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub input: InputSnapshot,
    pub fixed_steps: usize,
    /// State after the last fixed step of the frame, if one ran.
    pub control: Option<ControlState>,
}

/// Runs a controller against a backend the way a game loop would: input and
/// visuals once per frame, control and physics once per fixed step.
pub struct VehicleHost<B, I, S> {
    pub controller: VehicleController,
    pub backend: B,
    pub input: I,
    pub visuals: S,
    stepper: FixedStep,
}

impl<B, I, S> VehicleHost<B, I, S>
where
    B: SteppedBackend,
    I: InputSource,
    S: VisualSink,
{
    pub fn new(
        controller: VehicleController,
        backend: B,
        input: I,
        visuals: S,
        stepper: FixedStep,
    ) -> Self {
        Self {
            controller,
            backend,
            input,
            visuals,
            stepper,
        }
    }

    pub fn frame(&mut self, frame_sec: f64) -> FrameReport {
        let Self {
            ref mut controller,
            ref mut backend,
            ref mut input,
            ref mut visuals,
            ref mut stepper,
        } = *self;

        let snapshot = input.sample();
        let fixed_steps = stepper.advance(frame_sec);
        let step_sec = stepper.step_sec();

        let mut control = None;
        for _ in 0..fixed_steps {
            control = Some(controller.fixed_update(backend, snapshot));
            backend.step(step_sec);
        }

        controller.sync_visuals(backend, visuals);

        FrameReport {
            input: snapshot,
            fixed_steps,
            control,
        }
    }

    pub fn stepper(&self) -> &FixedStep {
        &self.stepper
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn short_frames_accumulate() {
        let mut stepper = FixedStep::new(0.02, 8).unwrap();
        assert_eq!(stepper.advance(0.015), 0);
        assert_eq!(stepper.advance(0.015), 1);
        assert_relative_eq!(stepper.remainder(), 0.01, epsilon = 1e-12);
    }

    #[test]
    fn long_frames_run_several_steps() {
        let mut stepper = FixedStep::new(0.02, 8).unwrap();
        assert_eq!(stepper.advance(0.065), 3);
    }

    #[test]
    fn excess_time_is_dropped() {
        let mut stepper = FixedStep::new(0.02, 2).unwrap();
        assert_eq!(stepper.advance(1.0), 2);
        assert_eq!(stepper.remainder(), 0.0);
        assert_eq!(stepper.advance(0.0), 0);
    }

    #[test]
    fn bad_frame_times_are_ignored() {
        let mut stepper = FixedStep::new(0.02, 8).unwrap();
        assert_eq!(stepper.advance(f64::NAN), 0);
        assert_eq!(stepper.advance(-1.0), 0);
        assert_eq!(stepper.remainder(), 0.0);
    }

    #[test]
    fn zero_step_is_rejected() {
        assert!(FixedStep::new(0.0, 8).is_err());
        assert!(FixedStep::new(0.02, 0).is_err());
    }
}
