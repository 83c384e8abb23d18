use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use formats::convert::{manifest_from_tour, tour_from_manifest};
use formats::package::{TOUR_MANIFEST_FILE_NAME, TourPackage, TourPackageError};
use scene::model::{Hotspot, HotspotId, ImageRef, SceneId, Tour, TourId};

/// Listing row: enough to render a tour picker without loading scenes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourSummary {
    pub id: TourId,
    pub name: String,
    pub default_scene: SceneId,
    pub scene_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound,
    Corrupt(String),
    Io(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "tour store entry not found"),
            StoreError::Corrupt(msg) => write!(f, "tour store data corrupt: {msg}"),
            StoreError::Io(msg) => write!(f, "tour store error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<TourPackageError> for StoreError {
    fn from(err: TourPackageError) -> Self {
        match err {
            TourPackageError::Io(e) => StoreError::Io(e.to_string()),
            TourPackageError::Manifest(e) => StoreError::Corrupt(e.to_string()),
        }
    }
}

/// Persistence seam for tours. Deleting a tour cascades: its scenes, their
/// hotspots, and any uploaded images go with it.
pub trait TourStore {
    fn tours(&self) -> Result<Vec<TourSummary>, StoreError>;
    fn tour(&self, id: &TourId) -> Result<Tour, StoreError>;
    fn put_tour(&mut self, tour: &Tour) -> Result<(), StoreError>;
    fn delete_tour(&mut self, id: &TourId) -> Result<bool, StoreError>;
    fn hotspots(&self, tour: &TourId, scene: &SceneId) -> Result<Vec<Hotspot>, StoreError>;
    /// Upsert: a hotspot with a known id replaces the old one in place,
    /// otherwise it is appended.
    fn save_hotspot(
        &mut self,
        tour: &TourId,
        scene: &SceneId,
        hotspot: Hotspot,
    ) -> Result<(), StoreError>;
    fn delete_hotspot(
        &mut self,
        tour: &TourId,
        scene: &SceneId,
        hotspot: &HotspotId,
    ) -> Result<bool, StoreError>;
    /// Stores panorama bytes and returns the reference scenes should carry.
    fn upload_scene_image(
        &mut self,
        tour: &TourId,
        name_hint: &str,
        bytes: &[u8],
    ) -> Result<ImageRef, StoreError>;
}

/// Content hash used to address uploaded images.
pub fn image_id_for_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Keeps file names portable: anything outside [A-Za-z0-9._-] becomes '-'.
fn sanitize_file_name(hint: &str) -> String {
    let cleaned: String = hint
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.trim_matches('-').is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}

fn summary_of(tour: &Tour) -> TourSummary {
    TourSummary {
        id: tour.id.clone(),
        name: tour.name.clone(),
        default_scene: tour.default_scene.clone(),
        scene_count: tour.scenes.len(),
    }
}

fn upsert_hotspot(tour: &mut Tour, scene: &SceneId, hotspot: Hotspot) -> Result<(), StoreError> {
    let Some(scene) = tour.scene_mut(scene) else {
        return Err(StoreError::NotFound);
    };
    match scene.hotspots.iter_mut().find(|h| h.id == hotspot.id) {
        Some(existing) => *existing = hotspot,
        None => scene.hotspots.push(hotspot),
    }
    Ok(())
}

fn remove_hotspot(tour: &mut Tour, scene: &SceneId, id: &HotspotId) -> Result<bool, StoreError> {
    let Some(scene) = tour.scene_mut(scene) else {
        return Err(StoreError::NotFound);
    };
    let before = scene.hotspots.len();
    scene.hotspots.retain(|h| &h.id != id);
    Ok(scene.hotspots.len() != before)
}

/// In-memory store; image bytes live alongside the tours, keyed by the
/// reference handed back from uploads.
#[derive(Debug, Default)]
pub struct InMemoryTourStore {
    tours: BTreeMap<TourId, Tour>,
    images: BTreeMap<String, Vec<u8>>,
}

impl InMemoryTourStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image_bytes(&self, image: &ImageRef) -> Option<&[u8]> {
        self.images.get(image.as_str()).map(Vec::as_slice)
    }
}

impl TourStore for InMemoryTourStore {
    fn tours(&self) -> Result<Vec<TourSummary>, StoreError> {
        Ok(self.tours.values().map(summary_of).collect())
    }

    fn tour(&self, id: &TourId) -> Result<Tour, StoreError> {
        self.tours.get(id).cloned().ok_or(StoreError::NotFound)
    }

    fn put_tour(&mut self, tour: &Tour) -> Result<(), StoreError> {
        self.tours.insert(tour.id.clone(), tour.clone());
        Ok(())
    }

    fn delete_tour(&mut self, id: &TourId) -> Result<bool, StoreError> {
        let existed = self.tours.remove(id).is_some();
        if existed {
            let prefix = format!("mem://{id}/");
            self.images.retain(|key, _| !key.starts_with(&prefix));
        }
        Ok(existed)
    }

    fn hotspots(&self, tour: &TourId, scene: &SceneId) -> Result<Vec<Hotspot>, StoreError> {
        let tour = self.tours.get(tour).ok_or(StoreError::NotFound)?;
        let scene = tour.scene(scene).ok_or(StoreError::NotFound)?;
        Ok(scene.hotspots.clone())
    }

    fn save_hotspot(
        &mut self,
        tour: &TourId,
        scene: &SceneId,
        hotspot: Hotspot,
    ) -> Result<(), StoreError> {
        let tour = self.tours.get_mut(tour).ok_or(StoreError::NotFound)?;
        upsert_hotspot(tour, scene, hotspot)
    }

    fn delete_hotspot(
        &mut self,
        tour: &TourId,
        scene: &SceneId,
        hotspot: &HotspotId,
    ) -> Result<bool, StoreError> {
        let tour = self.tours.get_mut(tour).ok_or(StoreError::NotFound)?;
        remove_hotspot(tour, scene, hotspot)
    }

    fn upload_scene_image(
        &mut self,
        tour: &TourId,
        name_hint: &str,
        bytes: &[u8],
    ) -> Result<ImageRef, StoreError> {
        if !self.tours.contains_key(tour) {
            return Err(StoreError::NotFound);
        }
        let key = format!(
            "mem://{tour}/{}-{}",
            image_id_for_bytes(bytes),
            sanitize_file_name(name_hint)
        );
        self.images.insert(key.clone(), bytes.to_vec());
        Ok(ImageRef::new(key))
    }
}

/// Directory-backed store: one tour package per subdirectory of `root`,
/// uploaded images content-addressed under `<tour>/images/`.
#[derive(Debug, Clone)]
pub struct DirTourStore {
    root: PathBuf,
}

impl DirTourStore {
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn tour_dir(&self, id: &TourId) -> PathBuf {
        self.root.join(sanitize_file_name(id.as_str()))
    }

    fn load_tour(&self, id: &TourId) -> Result<Tour, StoreError> {
        let dir = self.tour_dir(id);
        if !dir.join(TOUR_MANIFEST_FILE_NAME).exists() {
            return Err(StoreError::NotFound);
        }
        let package = TourPackage::load(&dir)?;
        let (tour, _report) = tour_from_manifest(package.manifest());
        Ok(tour)
    }

    fn store_tour(&self, tour: &Tour) -> Result<(), StoreError> {
        let manifest = manifest_from_tour(tour);
        TourPackage::save(self.tour_dir(&tour.id), &manifest)?;
        Ok(())
    }
}

impl TourStore for DirTourStore {
    fn tours(&self) -> Result<Vec<TourSummary>, StoreError> {
        let entries = fs::read_dir(&self.root).map_err(|e| StoreError::Io(e.to_string()))?;
        let mut out = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Io(e.to_string()))?;
            if !entry.path().join(TOUR_MANIFEST_FILE_NAME).exists() {
                continue;
            }
            let package = TourPackage::load(entry.path())?;
            let (tour, _report) = tour_from_manifest(package.manifest());
            out.push(summary_of(&tour));
        }
        // read_dir order is platform dependent.
        out.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(out)
    }

    fn tour(&self, id: &TourId) -> Result<Tour, StoreError> {
        self.load_tour(id)
    }

    fn put_tour(&mut self, tour: &Tour) -> Result<(), StoreError> {
        self.store_tour(tour)
    }

    fn delete_tour(&mut self, id: &TourId) -> Result<bool, StoreError> {
        let dir = self.tour_dir(id);
        if !dir.join(TOUR_MANIFEST_FILE_NAME).exists() {
            return Ok(false);
        }
        fs::remove_dir_all(&dir).map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(true)
    }

    fn hotspots(&self, tour: &TourId, scene: &SceneId) -> Result<Vec<Hotspot>, StoreError> {
        let tour = self.load_tour(tour)?;
        let scene = tour.scene(scene).ok_or(StoreError::NotFound)?;
        Ok(scene.hotspots.clone())
    }

    fn save_hotspot(
        &mut self,
        tour: &TourId,
        scene: &SceneId,
        hotspot: Hotspot,
    ) -> Result<(), StoreError> {
        let mut loaded = self.load_tour(tour)?;
        upsert_hotspot(&mut loaded, scene, hotspot)?;
        self.store_tour(&loaded)
    }

    fn delete_hotspot(
        &mut self,
        tour: &TourId,
        scene: &SceneId,
        hotspot: &HotspotId,
    ) -> Result<bool, StoreError> {
        let mut loaded = self.load_tour(tour)?;
        let removed = remove_hotspot(&mut loaded, scene, hotspot)?;
        if removed {
            self.store_tour(&loaded)?;
        }
        Ok(removed)
    }

    fn upload_scene_image(
        &mut self,
        tour: &TourId,
        name_hint: &str,
        bytes: &[u8],
    ) -> Result<ImageRef, StoreError> {
        let dir = self.tour_dir(tour);
        if !dir.join(TOUR_MANIFEST_FILE_NAME).exists() {
            return Err(StoreError::NotFound);
        }
        let images = dir.join("images");
        fs::create_dir_all(&images).map_err(|e| StoreError::Io(e.to_string()))?;

        let file_name = format!(
            "{}-{}",
            image_id_for_bytes(bytes),
            sanitize_file_name(name_hint)
        );
        fs::write(images.join(&file_name), bytes).map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(ImageRef::new(format!("images/{file_name}")))
    }
}
