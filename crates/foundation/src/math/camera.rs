use super::angles::{clamp_pitch, wrap_yaw};
use super::sphere::polar_to_direction;
use super::vec::{Vec2, Vec3};

/// Field-of-view limits (vertical, radians).
pub const MIN_FOV_RAD: f64 = 0.35;
pub const MAX_FOV_RAD: f64 = 2.4;

/// Default vertical field of view: 90 degrees.
pub const DEFAULT_FOV_RAD: f64 = std::f64::consts::FRAC_PI_2;

/// Minimum forward depth for a point to count as in front of the camera.
const NEAR_EPS: f64 = 1.0e-6;

/// A projected position in pixel space. The origin is the viewport's top-left
/// corner and y grows downward.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A camera at the center of the panorama sphere.
///
/// Orientation is yaw/pitch (radians) with the same angular convention as
/// polar hotspot anchors, so an anchor authored at the camera's exact
/// orientation projects to the viewport center.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub yaw_rad: f64,
    pub pitch_rad: f64,
    pub fov_y_rad: f64,
    pub viewport_w: f64,
    pub viewport_h: f64,
}

impl Camera {
    pub fn new(yaw_rad: f64, pitch_rad: f64, fov_y_rad: f64, viewport_w: f64, viewport_h: f64) -> Self {
        Self {
            yaw_rad: wrap_yaw(yaw_rad),
            pitch_rad: clamp_pitch(pitch_rad),
            fov_y_rad: fov_y_rad.clamp(MIN_FOV_RAD, MAX_FOV_RAD),
            viewport_w: viewport_w.max(1.0),
            viewport_h: viewport_h.max(1.0),
        }
    }

    pub fn forward(&self) -> Vec3 {
        polar_to_direction(self.yaw_rad, self.pitch_rad)
    }

    /// Right/up/forward basis of the view frame.
    ///
    /// Pitch clamping guarantees `forward` is never parallel to world up, so
    /// the basis cannot degenerate.
    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let f = self.forward();
        let world_up = Vec3::new(0.0, 1.0, 0.0);
        let s = f
            .cross(world_up)
            .normalized()
            .unwrap_or(Vec3::new(1.0, 0.0, 0.0));
        let u = s.cross(f);
        (s, u, f)
    }

    fn focal_scale(&self) -> f64 {
        1.0 / (0.5 * self.fov_y_rad).tan()
    }

    fn aspect(&self) -> f64 {
        self.viewport_w / self.viewport_h
    }

    /// Projects a world-space point into pixel coordinates.
    ///
    /// Returns `None` when the point is at or behind the camera plane; callers
    /// must suppress rendering in that case rather than draw a meaningless
    /// position.
    pub fn project(&self, point: Vec3) -> Option<ScreenPoint> {
        let (s, u, f) = self.basis();

        let depth = point.dot(f);
        if depth <= NEAR_EPS {
            return None;
        }

        let fscale = self.focal_scale();
        let ndc = Vec2::new(
            (fscale / self.aspect()) * point.dot(s) / depth,
            fscale * point.dot(u) / depth,
        );

        // NDC-up is screen-up-is-negative, hence the flipped y term.
        Some(ScreenPoint::new(
            (ndc.x * 0.5 + 0.5) * self.viewport_w,
            (ndc.y * -0.5 + 0.5) * self.viewport_h,
        ))
    }

    /// Inverse of [`Camera::project`]: the world-space unit ray through a
    /// viewport pixel.
    pub fn screen_ray(&self, x_px: f64, y_px: f64) -> Vec3 {
        let (s, u, f) = self.basis();
        let fscale = self.focal_scale();

        let ndc_x = 2.0 * x_px / self.viewport_w - 1.0;
        let ndc_y = 1.0 - 2.0 * y_px / self.viewport_h;

        let dir = s.scale(ndc_x * self.aspect() / fscale) + u.scale(ndc_y / fscale) + f;
        // s, u, f are orthonormal and the f component is 1, so dir is nonzero.
        dir.normalized().unwrap_or(f)
    }
}
