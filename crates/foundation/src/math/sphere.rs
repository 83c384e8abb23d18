use std::f64::consts::{FRAC_PI_2, PI, TAU};

use super::angles::{clamp_pitch, wrap_yaw};
use super::vec::Vec3;

/// Radius of the rendered panorama shell.
pub const PANO_RADIUS: f64 = 30.0;

/// Radius at which hotspot anchors are placed.
///
/// Anchors must sit strictly inside the panorama shell so overlay geometry
/// never clips into the rendered texture.
pub const HOTSPOT_RADIUS: f64 = 25.0;

const _: () = assert!(HOTSPOT_RADIUS < PANO_RADIUS);

/// Forward mapping: percentage coordinates on an equirectangular image to a
/// unit direction on the sphere.
///
/// `x_pct` sweeps longitude (0..100 covers 0..2pi) and `y_pct` sweeps
/// colatitude top-down, so `y_pct = 0` is the north pole and `y_pct = 100`
/// the south pole. Inputs outside [0, 100] are clamped, never propagated.
///
/// The negative sign on `x` keeps increasing `x_pct` sweeping in the same
/// rotational direction the viewer perceives when dragging the sphere.
pub fn percent_to_direction(x_pct: f64, y_pct: f64) -> Vec3 {
    let x_pct = x_pct.clamp(0.0, 100.0);
    let y_pct = y_pct.clamp(0.0, 100.0);

    let phi = (x_pct / 100.0) * TAU;
    let theta = (1.0 - y_pct / 100.0) * PI;

    Vec3::new(
        -theta.sin() * phi.cos(),
        theta.cos(),
        theta.sin() * phi.sin(),
    )
}

/// Forward mapping scaled to an anchor radius.
pub fn percent_to_point(x_pct: f64, y_pct: f64, radius: f64) -> Vec3 {
    percent_to_direction(x_pct, y_pct).scale(radius)
}

/// Direct polar input: `phi = yaw`, `theta = pi/2 - pitch`.
///
/// Pitch is clamped short of the poles before conversion.
pub fn polar_to_direction(yaw_rad: f64, pitch_rad: f64) -> Vec3 {
    let phi = wrap_yaw(yaw_rad);
    let theta = FRAC_PI_2 - clamp_pitch(pitch_rad);

    Vec3::new(
        -theta.sin() * phi.cos(),
        theta.cos(),
        theta.sin() * phi.sin(),
    )
}

pub fn polar_to_point(yaw_rad: f64, pitch_rad: f64, radius: f64) -> Vec3 {
    polar_to_direction(yaw_rad, pitch_rad).scale(radius)
}

/// Inverse of the forward mapping, for authoring: a direction on the sphere
/// back to percentage coordinates. `x_pct` lands in [0, 100), `y_pct` in
/// [0, 100].
pub fn direction_to_percent(dir: Vec3) -> (f64, f64) {
    let len = dir.length();
    if len <= 0.0 {
        return (0.0, 50.0);
    }

    let phi = wrap_yaw(dir.z.atan2(-dir.x));
    let theta = (dir.y / len).clamp(-1.0, 1.0).acos();

    let x_pct = phi / TAU * 100.0;
    let y_pct = (1.0 - theta / PI) * 100.0;
    (x_pct, y_pct)
}

#[cfg(test)]
mod tests {
    use super::{
        HOTSPOT_RADIUS, direction_to_percent, percent_to_direction, percent_to_point,
        polar_to_direction,
    };
    use crate::math::vec::Vec3;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn assert_vec_close(a: Vec3, b: Vec3, eps: f64) {
        assert_close(a.x, b.x, eps);
        assert_close(a.y, b.y, eps);
        assert_close(a.z, b.z, eps);
    }

    #[test]
    fn worked_example_quarter_turn_equator() {
        // phi = pi/2, theta = pi/2 at radius 25 lands on +z.
        let p = percent_to_point(25.0, 50.0, HOTSPOT_RADIUS);
        assert_vec_close(p, Vec3::new(0.0, 0.0, 25.0), 1e-9);
    }

    #[test]
    fn poles_are_antipodal_and_equator_is_flat() {
        for x_pct in [0.0, 13.0, 50.0, 99.0] {
            let top = percent_to_direction(x_pct, 0.0);
            let bottom = percent_to_direction(x_pct, 100.0);
            assert_vec_close(top, Vec3::new(0.0, -1.0, 0.0), 1e-12);
            assert_vec_close(bottom, Vec3::new(0.0, 1.0, 0.0), 1e-12);

            let equator = percent_to_direction(x_pct, 50.0);
            assert_close(equator.y, 0.0, 1e-12);
        }
    }

    #[test]
    fn forward_mapping_is_continuous() {
        // Angular separation stays proportional to the input step, including
        // across the intentional yaw wrap at x = 0/100.
        let eps_pct = 0.01;
        let expected = eps_pct / 100.0 * std::f64::consts::TAU;

        for x_pct in [0.0, 24.0, 50.0, 99.99] {
            let a = percent_to_direction(x_pct, 50.0);
            let b = percent_to_direction((x_pct + eps_pct) % 100.0, 50.0);
            assert_close(a.angle_to(b), expected, expected * 1e-6);
        }
    }

    #[test]
    fn out_of_range_percent_is_clamped() {
        assert_vec_close(
            percent_to_direction(-20.0, 50.0),
            percent_to_direction(0.0, 50.0),
            1e-12,
        );
        assert_vec_close(
            percent_to_direction(30.0, 140.0),
            percent_to_direction(30.0, 100.0),
            1e-12,
        );
    }

    #[test]
    fn percent_round_trips_through_direction() {
        for &(x, y) in &[(0.0, 50.0), (25.0, 50.0), (62.5, 10.0), (99.0, 90.0)] {
            let (rx, ry) = direction_to_percent(percent_to_direction(x, y));
            assert_close(rx, x, 1e-9);
            assert_close(ry, y, 1e-9);
        }
    }

    #[test]
    fn polar_matches_equivalent_percent() {
        // yaw = pi/2, pitch = 0 is the same direction as (25%, 50%).
        let a = polar_to_direction(std::f64::consts::FRAC_PI_2, 0.0);
        let b = percent_to_direction(25.0, 50.0);
        assert_vec_close(a, b, 1e-12);
    }
}
