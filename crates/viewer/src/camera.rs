use foundation::math::angles::{clamp_pitch, wrap_yaw};
use foundation::math::camera::{Camera, MAX_FOV_RAD, MIN_FOV_RAD};
use foundation::math::vec::Vec2;
use scene::model::ViewOrientation;

/// Autorotation speed (radians per second).
const AUTOROTATE_RATE: f64 = 0.15;

/// Exponential zoom response per wheel delta unit.
const ZOOM_RATE: f64 = 0.002;

/// Largest dt accepted by `update`, to avoid jumps after a stalled frame.
const MAX_DT_S: f64 = 0.1;

/// Ephemeral per-session camera state.
///
/// Owned exclusively by the viewer session and reset to the scene's initial
/// view whenever the active scene changes; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    yaw_rad: f64,
    pitch_rad: f64,
    fov_rad: f64,
    autorotate: bool,
    viewport_w: f64,
    viewport_h: f64,
    dragging: bool,
    last_pos_px: Vec2,
}

impl CameraState {
    pub fn new(viewport_w: f64, viewport_h: f64) -> Self {
        let view = ViewOrientation::default();
        Self {
            yaw_rad: view.yaw_rad,
            pitch_rad: view.pitch_rad,
            fov_rad: view.fov_rad,
            autorotate: false,
            viewport_w: viewport_w.max(1.0),
            viewport_h: viewport_h.max(1.0),
            dragging: false,
            last_pos_px: Vec2::new(0.0, 0.0),
        }
    }

    /// Resets orientation and zoom to a scene's initial view.
    pub fn reset_to(&mut self, view: ViewOrientation) {
        self.yaw_rad = view.yaw_rad;
        self.pitch_rad = view.pitch_rad;
        self.fov_rad = view.fov_rad;
        self.dragging = false;
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_w = width.max(1.0);
        self.viewport_h = height.max(1.0);
    }

    pub fn yaw_rad(&self) -> f64 {
        self.yaw_rad
    }

    pub fn pitch_rad(&self) -> f64 {
        self.pitch_rad
    }

    pub fn fov_rad(&self) -> f64 {
        self.fov_rad
    }

    pub fn set_autorotate(&mut self, on: bool) {
        self.autorotate = on;
    }

    pub fn autorotate(&self) -> bool {
        self.autorotate
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Starts a drag. Any pointer interaction stops autorotation.
    pub fn on_pointer_down(&mut self, pos_px: Vec2) {
        self.autorotate = false;
        self.dragging = true;
        self.last_pos_px = pos_px;
    }

    /// Grab-the-sphere drag: dragging right sweeps the view left, dragging
    /// down tilts the view up. Angular speed scales with fov so the image
    /// tracks the pointer at any zoom.
    pub fn on_pointer_move(&mut self, pos_px: Vec2) {
        if !self.dragging {
            return;
        }

        let delta = pos_px - self.last_pos_px;
        self.last_pos_px = pos_px;

        let rad_per_px = self.fov_rad / self.viewport_h;
        self.yaw_rad = wrap_yaw(self.yaw_rad - delta.x * rad_per_px);
        self.pitch_rad = clamp_pitch(self.pitch_rad + delta.y * rad_per_px);
    }

    pub fn on_pointer_up(&mut self) {
        self.dragging = false;
    }

    /// Wheel zoom: positive delta widens the fov (zoom out).
    pub fn on_wheel(&mut self, delta: f64) {
        self.fov_rad = (self.fov_rad * (delta * ZOOM_RATE).exp()).clamp(MIN_FOV_RAD, MAX_FOV_RAD);
    }

    /// Advances autorotation. Call once per render tick.
    pub fn update(&mut self, dt_s: f64) {
        let dt_s = dt_s.clamp(0.0, MAX_DT_S);
        if self.autorotate && !self.dragging {
            self.yaw_rad = wrap_yaw(self.yaw_rad + AUTOROTATE_RATE * dt_s);
        }
    }

    /// Snapshot of the projection camera for this tick.
    pub fn camera(&self) -> Camera {
        Camera::new(
            self.yaw_rad,
            self.pitch_rad,
            self.fov_rad,
            self.viewport_w,
            self.viewport_h,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::CameraState;
    use foundation::math::angles::MAX_PITCH_RAD;
    use foundation::math::camera::MIN_FOV_RAD;
    use foundation::math::vec::Vec2;
    use scene::model::ViewOrientation;

    #[test]
    fn drag_rotates_and_clamps_pitch() {
        let mut cam = CameraState::new(1000.0, 500.0);
        cam.on_pointer_down(Vec2::new(500.0, 250.0));
        cam.on_pointer_move(Vec2::new(400.0, 250.0));
        assert!(cam.yaw_rad() > 0.0, "drag left sweeps yaw positive");

        // Drag far past the pole; pitch must stop short of it.
        cam.on_pointer_move(Vec2::new(400.0, 1e6));
        assert_eq!(cam.pitch_rad(), MAX_PITCH_RAD);
    }

    #[test]
    fn wheel_zoom_is_clamped() {
        let mut cam = CameraState::new(1000.0, 500.0);
        cam.on_wheel(-1e6);
        assert_eq!(cam.fov_rad(), MIN_FOV_RAD);
    }

    #[test]
    fn autorotate_advances_yaw_and_pauses_on_drag() {
        let mut cam = CameraState::new(1000.0, 500.0);
        cam.set_autorotate(true);
        cam.update(0.05);
        let rotated = cam.yaw_rad();
        assert!(rotated > 0.0);

        cam.on_pointer_down(Vec2::new(0.0, 0.0));
        assert!(!cam.autorotate(), "interaction stops autorotation");
        cam.update(0.05);
        assert_eq!(cam.yaw_rad(), rotated);
    }

    #[test]
    fn reset_restores_the_scene_view() {
        let mut cam = CameraState::new(1000.0, 500.0);
        cam.on_wheel(500.0);
        cam.on_pointer_down(Vec2::new(0.0, 0.0));
        cam.on_pointer_move(Vec2::new(120.0, 80.0));

        let view = ViewOrientation::new(1.0, 0.25, 1.2);
        cam.reset_to(view);
        assert_eq!(cam.yaw_rad(), 1.0);
        assert_eq!(cam.pitch_rad(), 0.25);
        assert_eq!(cam.fov_rad(), 1.2);
        assert!(!cam.is_dragging());
    }
}
