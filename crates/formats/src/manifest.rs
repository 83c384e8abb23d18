use serde::{Deserialize, Serialize};

pub const MANIFEST_VERSION: &str = "1.0";

/// A manifest that could not be decoded.
#[derive(Debug)]
pub enum ManifestError {
    Json(serde_json::Error),
    UnsupportedVersion { found: String },
}

impl std::fmt::Display for ManifestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestError::Json(err) => write!(f, "Manifest JSON error: {err}"),
            ManifestError::UnsupportedVersion { found } => {
                write!(f, "Unsupported manifest version: {found}")
            }
        }
    }
}

impl std::error::Error for ManifestError {}

/// Persisted form of a tour: scene list, default scene, hotspot records.
///
/// Hotspot anchors keep whichever encoding they were authored in (image
/// percentages or yaw/pitch degrees) so round-trips do not rewrite data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TourManifest {
    pub version: String,
    pub tour_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub default_scene: String,
    pub scenes: Vec<SceneRecord>,
}

impl TourManifest {
    pub fn new(tour_id: impl Into<String>, default_scene: impl Into<String>) -> Self {
        Self {
            version: MANIFEST_VERSION.to_string(),
            tour_id: tour_id.into(),
            name: None,
            default_scene: default_scene.into(),
            scenes: Vec::new(),
        }
    }

    /// Decodes a serialized manifest, rejecting schema versions this build
    /// does not understand.
    pub fn from_json(payload: &str) -> Result<Self, ManifestError> {
        let manifest: TourManifest =
            serde_json::from_str(payload).map_err(ManifestError::Json)?;
        if manifest.version != MANIFEST_VERSION {
            return Err(ManifestError::UnsupportedVersion {
                found: manifest.version,
            });
        }
        Ok(manifest)
    }

    pub fn to_json_pretty(&self) -> Result<String, ManifestError> {
        serde_json::to_string_pretty(self).map_err(ManifestError::Json)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Equirectangular panorama URL or path.
    pub image: String,
    #[serde(default)]
    pub initial_view: ViewRecord,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hotspots: Vec<HotspotRecord>,
}

/// Initial camera orientation. Angles are authored in degrees; fov in
/// radians, matching the source viewer's conventions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ViewRecord {
    #[serde(default)]
    pub yaw_deg: f64,
    #[serde(default)]
    pub pitch_deg: f64,
    #[serde(default = "default_fov_rad")]
    pub fov_rad: f64,
}

fn default_fov_rad() -> f64 {
    foundation::math::camera::DEFAULT_FOV_RAD
}

impl Default for ViewRecord {
    fn default() -> Self {
        Self {
            yaw_deg: 0.0,
            pitch_deg: 0.0,
            fov_rad: default_fov_rad(),
        }
    }
}

/// One hotspot as persisted.
///
/// `kind` is an open string on the wire; unknown kinds are skipped with a
/// warning at load time rather than failing the whole tour.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HotspotRecord {
    pub id: String,
    pub kind: String,

    // Anchor, percent encoding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_pct: Option<f64>,

    // Anchor, polar encoding (degrees).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaw_deg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch_deg: Option<f64>,

    // Kind-specific payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_scene: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    // Rendering hints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_px: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_px: Option<f64>,
}
