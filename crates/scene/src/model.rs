use foundation::math::angles::{clamp_pitch, wrap_yaw};
use foundation::math::camera::{DEFAULT_FOV_RAD, MAX_FOV_RAD, MIN_FOV_RAD};

use crate::anchor::HotspotAnchor;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }
    };
}

string_id!(
    /// Identifies a tour (project). Unique across the store.
    TourId
);
string_id!(
    /// Identifies a scene. Unique within its tour.
    SceneId
);
string_id!(
    /// Identifies a hotspot. Unique within its scene.
    HotspotId
);

/// Reference to a panorama or asset image (URL or file path); storage is the
/// persistence collaborator's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Initial camera orientation for a scene (radians).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewOrientation {
    pub yaw_rad: f64,
    pub pitch_rad: f64,
    pub fov_rad: f64,
}

impl ViewOrientation {
    pub fn new(yaw_rad: f64, pitch_rad: f64, fov_rad: f64) -> Self {
        Self {
            yaw_rad: wrap_yaw(yaw_rad),
            pitch_rad: clamp_pitch(pitch_rad),
            fov_rad: fov_rad.clamp(MIN_FOV_RAD, MAX_FOV_RAD),
        }
    }
}

impl Default for ViewOrientation {
    fn default() -> Self {
        Self {
            yaw_rad: 0.0,
            pitch_rad: 0.0,
            fov_rad: DEFAULT_FOV_RAD,
        }
    }
}

/// How an asset image is fitted into its hotspot rectangle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AssetFit {
    Contain,
    Cover,
    Stretch,
    Original,
    /// Scaled to a percentage of the hotspot rectangle.
    Percent(f64),
}

impl Default for AssetFit {
    fn default() -> Self {
        AssetFit::Contain
    }
}

/// What activating a hotspot resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum HotspotKind {
    /// Navigate to another scene in the same tour.
    SceneLink { target: SceneId },
    /// Open an external URL; performed by the embedder, not the core.
    ExternalLink { url: String },
    /// Switch to an application layer; performed by the embedder.
    LayerLink { layer: u32 },
    /// Show a media asset overlay; performed by the embedder.
    AssetLink { asset: ImageRef, fit: AssetFit },
    /// Title/description only; no navigation.
    Info {
        title: String,
        description: Option<String>,
    },
}

/// Optional rendering hints for the hotspot overlay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotspotStyle {
    pub icon: Option<ImageRef>,
    pub width_px: Option<f64>,
    pub height_px: Option<f64>,
}

/// An interactive anchor on a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Hotspot {
    pub id: HotspotId,
    pub anchor: HotspotAnchor,
    pub kind: HotspotKind,
    pub style: HotspotStyle,
}

impl Hotspot {
    pub fn new(id: impl Into<HotspotId>, anchor: HotspotAnchor, kind: HotspotKind) -> Self {
        Self {
            id: id.into(),
            anchor,
            kind,
            style: HotspotStyle::default(),
        }
    }
}

/// One equirectangular panorama plus its hotspots and initial orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub id: SceneId,
    pub name: String,
    pub image: ImageRef,
    pub initial_view: ViewOrientation,
    /// Ordered; overlay stacking follows authoring order.
    pub hotspots: Vec<Hotspot>,
}

impl Scene {
    pub fn new(id: impl Into<SceneId>, name: impl Into<String>, image: ImageRef) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image,
            initial_view: ViewOrientation::default(),
            hotspots: Vec::new(),
        }
    }

    pub fn hotspot(&self, id: &HotspotId) -> Option<&Hotspot> {
        self.hotspots.iter().find(|h| &h.id == id)
    }
}

/// A named, ordered collection of scenes with a designated default scene.
///
/// Ownership is exclusive: deleting a tour deletes its scenes, their hotspots,
/// and their backing images.
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    pub id: TourId,
    pub name: String,
    pub scenes: Vec<Scene>,
    pub default_scene: SceneId,
}

impl Tour {
    pub fn new(
        id: impl Into<TourId>,
        name: impl Into<String>,
        default_scene: impl Into<SceneId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            scenes: Vec::new(),
            default_scene: default_scene.into(),
        }
    }

    pub fn scene(&self, id: &SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|s| &s.id == id)
    }

    pub fn scene_mut(&mut self, id: &SceneId) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| &s.id == id)
    }

    pub fn contains_scene(&self, id: &SceneId) -> bool {
        self.scene(id).is_some()
    }
}
