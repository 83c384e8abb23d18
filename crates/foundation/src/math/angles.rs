use std::f64::consts::{FRAC_PI_2, TAU};

/// Margin kept short of the poles so look-at bases never degenerate there.
pub const POLE_MARGIN_RAD: f64 = 1.0e-4;

/// Maximum pitch magnitude for cameras and polar anchors.
pub const MAX_PITCH_RAD: f64 = FRAC_PI_2 - POLE_MARGIN_RAD;

/// Wraps a yaw angle into [0, 2pi).
///
/// The wrap is positionally continuous: 0 and 2pi are the same direction, so
/// callers can accumulate drag deltas without ever renormalizing themselves.
pub fn wrap_yaw(yaw_rad: f64) -> f64 {
    let wrapped = yaw_rad.rem_euclid(TAU);
    // rem_euclid can return TAU itself when the input is a tiny negative value.
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Clamps a pitch angle to [-MAX_PITCH_RAD, MAX_PITCH_RAD].
pub fn clamp_pitch(pitch_rad: f64) -> f64 {
    pitch_rad.clamp(-MAX_PITCH_RAD, MAX_PITCH_RAD)
}

/// Smallest absolute difference between two yaw angles, in [0, pi].
pub fn yaw_distance(a_rad: f64, b_rad: f64) -> f64 {
    let d = (wrap_yaw(a_rad) - wrap_yaw(b_rad)).abs();
    d.min(TAU - d)
}
