use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::manifest::{ManifestError, TourManifest};

pub const TOUR_MANIFEST_FILE_NAME: &str = "tour.manifest.json";

/// A tour directory on disk: the manifest plus the images it references.
#[derive(Debug, Clone)]
pub struct TourPackage {
    root: PathBuf,
    manifest: TourManifest,
}

#[derive(Debug)]
pub enum TourPackageError {
    Io(std::io::Error),
    Manifest(ManifestError),
}

impl fmt::Display for TourPackageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TourPackageError::Io(err) => write!(f, "I/O error: {err}"),
            TourPackageError::Manifest(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for TourPackageError {}

impl From<ManifestError> for TourPackageError {
    fn from(err: ManifestError) -> Self {
        TourPackageError::Manifest(err)
    }
}

impl TourPackage {
    /// Opens the package rooted at `root`. Decoding and version checking are
    /// the manifest's concern; this only adds the directory layout.
    pub fn load(root: impl AsRef<Path>) -> Result<Self, TourPackageError> {
        let root = root.as_ref().to_path_buf();
        let payload =
            fs::read_to_string(root.join(TOUR_MANIFEST_FILE_NAME)).map_err(TourPackageError::Io)?;
        let manifest = TourManifest::from_json(&payload)?;
        Ok(Self { root, manifest })
    }

    /// Writes the manifest into `root`, creating the directory if needed.
    pub fn save(root: impl AsRef<Path>, manifest: &TourManifest) -> Result<Self, TourPackageError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(TourPackageError::Io)?;
        let payload = manifest.to_json_pretty()?;
        fs::write(root.join(TOUR_MANIFEST_FILE_NAME), payload).map_err(TourPackageError::Io)?;

        Ok(Self {
            root,
            manifest: manifest.clone(),
        })
    }

    pub fn manifest(&self) -> &TourManifest {
        &self.manifest
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
