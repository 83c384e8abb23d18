use foundation::math::camera::Camera;
use foundation::math::sphere::{HOTSPOT_RADIUS, direction_to_percent};

use crate::anchor::HotspotAnchor;

/// Authoring-side placement: converts a click on the rendered sphere back to
/// a percent-space anchor.
///
/// The screen pixel becomes a world ray through the camera, the ray is
/// intersected with the anchor sphere, and the intersection goes through the
/// inverse equirectangular mapping. New hotspots therefore land in the same
/// coordinate space as percent-authored ones.
pub fn anchor_at_pixel(camera: &Camera, x_px: f64, y_px: f64) -> HotspotAnchor {
    // The camera sits at the sphere center, so the ray always intersects and
    // the hit point is just the ray direction at anchor radius.
    let hit = camera.screen_ray(x_px, y_px).scale(HOTSPOT_RADIUS);
    let (x_pct, y_pct) = direction_to_percent(hit);
    HotspotAnchor::percent(x_pct, y_pct)
}
