/// Driver input for one frame.
///
/// The host input layer is expected to have smoothed the axes already.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSnapshot {
    /// Steering axis, -1 full left to 1 full right.
    pub horizontal: f64,
    /// Throttle axis, negative for reverse.
    pub vertical: f64,
    pub braking: bool,
}

impl InputSnapshot {
    pub fn new(horizontal: f64, vertical: f64, braking: bool) -> Self {
        Self {
            horizontal,
            vertical,
            braking,
        }
        .clamped()
    }

    /// Clamps both axes into [-1, 1]. NaN reads as a centered axis.
    pub fn clamped(self) -> Self {
        Self {
            horizontal: clamp_axis(self.horizontal),
            vertical: clamp_axis(self.vertical),
            ..self
        }
    }
}

fn clamp_axis(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// Anything that can be polled once per frame for driver input.
pub trait InputSource {
    fn sample(&mut self) -> InputSnapshot;
}

impl InputSource for InputSnapshot {
    fn sample(&mut self) -> InputSnapshot {
        self.clamped()
    }
}

impl<F> InputSource for F
where
    F: FnMut() -> InputSnapshot,
{
    fn sample(&mut self) -> InputSnapshot {
        self().clamped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_axes_are_clamped() {
        let input = InputSnapshot::new(3.0, -7.5, true);
        assert_eq!(input.horizontal, 1.0);
        assert_eq!(input.vertical, -1.0);
        assert!(input.braking);
    }

    #[test]
    fn nan_axis_is_centered() {
        let input = InputSnapshot::new(f64::NAN, 0.25, false);
        assert_eq!(input.horizontal, 0.0);
        assert_eq!(input.vertical, 0.25);
    }

    #[test]
    fn closure_sources_are_clamped_too() {
        let mut calls = 0;
        let mut source = || {
            calls += 1;
            InputSnapshot {
                horizontal: 2.0,
                vertical: 0.5,
                braking: false,
            }
        };

        let input = source.sample();
        assert_eq!(input.horizontal, 1.0);
        assert_eq!(input.vertical, 0.5);
        drop(source);
        assert_eq!(calls, 1);
    }
}
