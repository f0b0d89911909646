use crate::constants::{FLAT_GROUND_DEGREES, RPM_RADIUS_TO_SPEED};
use nalgebra::Vector3;

/// Speed proxy from wheel spin, `rpm * 60 / 1000 * PI * radius`, averaged.
///
/// The estimate lags nothing but ignores slip: a spinning wheel reads as
/// speed even when the chassis is still. Signed, so reversing reads negative.
pub fn estimate_speed<I>(samples: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (sum, count) = samples
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), (rpm, radius)| {
            (sum + rpm * radius, count + 1)
        });

    if count == 0 {
        return 0.0;
    }

    sum / count as f64 * RPM_RADIUS_TO_SPEED
}

/// Angle in degrees between the chassis forward axis and a contact normal,
/// clamped to [0, 90]. Level ground reads 90, and so does a degenerate or
/// non-finite vector.
pub fn surface_angle_degrees(forward: &Vector3<f64>, normal: &Vector3<f64>) -> f64 {
    if forward.norm_squared() == 0.0 || normal.norm_squared() == 0.0 {
        return FLAT_GROUND_DEGREES;
    }

    let degrees = forward.angle(normal).to_degrees();
    if !degrees.is_finite() {
        return FLAT_GROUND_DEGREES;
    }
    degrees.clamp(0.0, FLAT_GROUND_DEGREES)
}

/// Unclamped linear interpolation.
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}
