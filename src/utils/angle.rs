use crate::math::Real;
use core::f64::consts::TAU;

/// Wraps an angle, in radians, into `[0, 2π)`.
#[inline]
pub fn normalize_angle(angle: Real) -> Real {
    let wrapped = angle.rem_euclid(TAU);
    // `rem_euclid` may round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
