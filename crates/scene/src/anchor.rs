use foundation::math::angles::{clamp_pitch, wrap_yaw};
use foundation::math::sphere::{percent_to_direction, polar_to_direction};
use foundation::math::vec::Vec3;

/// Where a hotspot sits on the sphere.
///
/// Both authoring formats appear in persisted data: percentage coordinates on
/// the source image and polar angles directly on the sphere. Construction
/// clamps out-of-range input instead of propagating it; the authored variant
/// is preserved so persistence round-trips in the original format.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum HotspotAnchor {
    Percent { x_pct: f64, y_pct: f64 },
    Polar { yaw_rad: f64, pitch_rad: f64 },
}

impl HotspotAnchor {
    pub fn percent(x_pct: f64, y_pct: f64) -> Self {
        Self::Percent {
            x_pct: x_pct.clamp(0.0, 100.0),
            y_pct: y_pct.clamp(0.0, 100.0),
        }
    }

    pub fn polar(yaw_rad: f64, pitch_rad: f64) -> Self {
        Self::Polar {
            yaw_rad: wrap_yaw(yaw_rad),
            pitch_rad: clamp_pitch(pitch_rad),
        }
    }

    /// Unit direction on the sphere, regardless of authoring format.
    pub fn direction(&self) -> Vec3 {
        match *self {
            HotspotAnchor::Percent { x_pct, y_pct } => percent_to_direction(x_pct, y_pct),
            HotspotAnchor::Polar { yaw_rad, pitch_rad } => polar_to_direction(yaw_rad, pitch_rad),
        }
    }

    /// Anchor point at the given radius.
    pub fn point(&self, radius: f64) -> Vec3 {
        self.direction().scale(radius)
    }
}
