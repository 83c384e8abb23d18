use scene::anchor::HotspotAnchor;
use scene::model::{
    AssetFit, Hotspot, HotspotKind, HotspotStyle, ImageRef, Scene, Tour, ViewOrientation,
};

use crate::manifest::{HotspotRecord, SceneRecord, TourManifest, ViewRecord};

/// A record that could not be fully honored. Warnings never fail a load; the
/// offending record is skipped and the rest of the tour stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    UnknownKind {
        scene: String,
        hotspot: String,
        kind: String,
    },
    MissingAnchor {
        scene: String,
        hotspot: String,
    },
    MissingPayload {
        scene: String,
        hotspot: String,
        field: &'static str,
    },
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadWarning::UnknownKind {
                scene,
                hotspot,
                kind,
            } => write!(f, "scene {scene}: hotspot {hotspot} has unknown kind {kind:?}"),
            LoadWarning::MissingAnchor { scene, hotspot } => {
                write!(f, "scene {scene}: hotspot {hotspot} has no anchor coordinates")
            }
            LoadWarning::MissingPayload {
                scene,
                hotspot,
                field,
            } => write!(f, "scene {scene}: hotspot {hotspot} is missing {field}"),
        }
    }
}

/// Outcome of a manifest conversion: warnings in scene/hotspot order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TourLoadReport {
    pub warnings: Vec<LoadWarning>,
}

/// Parses an asset-fit string: the named modes plus `"NN%"` percentage
/// scaling.
pub fn parse_asset_fit(s: &str) -> Option<AssetFit> {
    match s {
        "contain" => Some(AssetFit::Contain),
        "cover" => Some(AssetFit::Cover),
        "stretch" => Some(AssetFit::Stretch),
        "original" => Some(AssetFit::Original),
        _ => {
            let pct = s.strip_suffix('%')?.trim().parse::<f64>().ok()?;
            (pct > 0.0).then_some(AssetFit::Percent(pct))
        }
    }
}

pub fn asset_fit_to_string(fit: AssetFit) -> String {
    match fit {
        AssetFit::Contain => "contain".to_string(),
        AssetFit::Cover => "cover".to_string(),
        AssetFit::Stretch => "stretch".to_string(),
        AssetFit::Original => "original".to_string(),
        AssetFit::Percent(pct) => format!("{pct}%"),
    }
}

/// Builds the in-memory tour from a manifest, collecting warnings for
/// records that cannot be honored.
pub fn tour_from_manifest(manifest: &TourManifest) -> (Tour, TourLoadReport) {
    let mut report = TourLoadReport::default();

    let mut tour = Tour::new(
        manifest.tour_id.as_str(),
        manifest
            .name
            .clone()
            .unwrap_or_else(|| manifest.tour_id.clone()),
        manifest.default_scene.as_str(),
    );

    for record in &manifest.scenes {
        let mut scene = Scene::new(
            record.id.as_str(),
            record.name.as_str(),
            ImageRef::new(record.image.as_str()),
        );
        scene.initial_view = view_from_record(record.initial_view);

        for hotspot in &record.hotspots {
            if let Some(h) = hotspot_from_record(&record.id, hotspot, &mut report) {
                scene.hotspots.push(h);
            }
        }

        tour.scenes.push(scene);
    }

    (tour, report)
}

/// Inverse of [`tour_from_manifest`]; anchors serialize back in their
/// authored encoding.
pub fn manifest_from_tour(tour: &Tour) -> TourManifest {
    let mut manifest = TourManifest::new(tour.id.as_str(), tour.default_scene.as_str());
    manifest.name = Some(tour.name.clone());

    for scene in &tour.scenes {
        manifest.scenes.push(SceneRecord {
            id: scene.id.as_str().to_string(),
            name: scene.name.clone(),
            image: scene.image.as_str().to_string(),
            initial_view: view_to_record(scene.initial_view),
            hotspots: scene.hotspots.iter().map(hotspot_to_record).collect(),
        });
    }

    manifest
}

fn view_from_record(record: ViewRecord) -> ViewOrientation {
    ViewOrientation::new(
        record.yaw_deg.to_radians(),
        record.pitch_deg.to_radians(),
        record.fov_rad,
    )
}

fn view_to_record(view: ViewOrientation) -> ViewRecord {
    ViewRecord {
        yaw_deg: view.yaw_rad.to_degrees(),
        pitch_deg: view.pitch_rad.to_degrees(),
        fov_rad: view.fov_rad,
    }
}

/// Builds one hotspot from its record; `None` means the record was skipped
/// and a warning explains why.
pub fn hotspot_from_record(
    scene_id: &str,
    record: &HotspotRecord,
    report: &mut TourLoadReport,
) -> Option<Hotspot> {
    let anchor = match (record.x_pct, record.y_pct, record.yaw_deg, record.pitch_deg) {
        (Some(x), Some(y), _, _) => HotspotAnchor::percent(x, y),
        (_, _, Some(yaw), Some(pitch)) => {
            HotspotAnchor::polar(yaw.to_radians(), pitch.to_radians())
        }
        _ => {
            report.warnings.push(LoadWarning::MissingAnchor {
                scene: scene_id.to_string(),
                hotspot: record.id.clone(),
            });
            return None;
        }
    };

    let mut missing = |field: &'static str| {
        report.warnings.push(LoadWarning::MissingPayload {
            scene: scene_id.to_string(),
            hotspot: record.id.clone(),
            field,
        });
    };

    let kind = match record.kind.as_str() {
        "scene-link" => match &record.target_scene {
            Some(target) => HotspotKind::SceneLink {
                target: target.as_str().into(),
            },
            None => {
                missing("target_scene");
                return None;
            }
        },
        "external-link" => match &record.url {
            Some(url) => HotspotKind::ExternalLink { url: url.clone() },
            None => {
                missing("url");
                return None;
            }
        },
        "layer-link" => match record.layer {
            Some(layer) => HotspotKind::LayerLink { layer },
            None => {
                missing("layer");
                return None;
            }
        },
        "asset-link" => match &record.asset {
            Some(asset) => HotspotKind::AssetLink {
                asset: ImageRef::new(asset.as_str()),
                fit: record
                    .fit
                    .as_deref()
                    .and_then(parse_asset_fit)
                    .unwrap_or_default(),
            },
            None => {
                missing("asset");
                return None;
            }
        },
        "info" => HotspotKind::Info {
            title: record.title.clone().unwrap_or_default(),
            description: record.description.clone(),
        },
        other => {
            report.warnings.push(LoadWarning::UnknownKind {
                scene: scene_id.to_string(),
                hotspot: record.id.clone(),
                kind: other.to_string(),
            });
            return None;
        }
    };

    let mut hotspot = Hotspot::new(record.id.as_str(), anchor, kind);
    hotspot.style = HotspotStyle {
        icon: record.icon.as_deref().map(ImageRef::new),
        width_px: record.width_px,
        height_px: record.height_px,
    };
    Some(hotspot)
}

pub fn hotspot_to_record(hotspot: &Hotspot) -> HotspotRecord {
    let mut record = HotspotRecord {
        id: hotspot.id.as_str().to_string(),
        ..HotspotRecord::default()
    };

    match hotspot.anchor {
        HotspotAnchor::Percent { x_pct, y_pct } => {
            record.x_pct = Some(x_pct);
            record.y_pct = Some(y_pct);
        }
        HotspotAnchor::Polar { yaw_rad, pitch_rad } => {
            record.yaw_deg = Some(yaw_rad.to_degrees());
            record.pitch_deg = Some(pitch_rad.to_degrees());
        }
    }

    match &hotspot.kind {
        HotspotKind::SceneLink { target } => {
            record.kind = "scene-link".to_string();
            record.target_scene = Some(target.as_str().to_string());
        }
        HotspotKind::ExternalLink { url } => {
            record.kind = "external-link".to_string();
            record.url = Some(url.clone());
        }
        HotspotKind::LayerLink { layer } => {
            record.kind = "layer-link".to_string();
            record.layer = Some(*layer);
        }
        HotspotKind::AssetLink { asset, fit } => {
            record.kind = "asset-link".to_string();
            record.asset = Some(asset.as_str().to_string());
            record.fit = Some(asset_fit_to_string(*fit));
        }
        HotspotKind::Info { title, description } => {
            record.kind = "info".to_string();
            record.title = Some(title.clone());
            record.description = description.clone();
        }
    }

    record.icon = hotspot.style.icon.as_ref().map(|i| i.as_str().to_string());
    record.width_px = hotspot.style.width_px;
    record.height_px = hotspot.style.height_px;
    record
}

#[cfg(test)]
mod tests {
    use super::{LoadWarning, manifest_from_tour, parse_asset_fit, tour_from_manifest};
    use crate::manifest::{HotspotRecord, SceneRecord, TourManifest, ViewRecord};
    use scene::anchor::HotspotAnchor;
    use scene::model::AssetFit;

    fn manifest_with_hotspots(hotspots: Vec<HotspotRecord>) -> TourManifest {
        let mut manifest = TourManifest::new("t", "a");
        manifest.scenes.push(SceneRecord {
            id: "a".to_string(),
            name: "A".to_string(),
            image: "a.jpg".to_string(),
            initial_view: ViewRecord::default(),
            hotspots,
        });
        manifest
    }

    #[test]
    fn parses_both_anchor_encodings() {
        let manifest = manifest_with_hotspots(vec![
            HotspotRecord {
                id: "pct".to_string(),
                kind: "info".to_string(),
                x_pct: Some(12.5),
                y_pct: Some(40.0),
                title: Some("P".to_string()),
                ..HotspotRecord::default()
            },
            HotspotRecord {
                id: "polar".to_string(),
                kind: "info".to_string(),
                yaw_deg: Some(90.0),
                pitch_deg: Some(-10.0),
                title: Some("Q".to_string()),
                ..HotspotRecord::default()
            },
        ]);

        let (tour, report) = tour_from_manifest(&manifest);
        assert!(report.warnings.is_empty());
        let hotspots = &tour.scenes[0].hotspots;
        assert!(matches!(hotspots[0].anchor, HotspotAnchor::Percent { .. }));
        assert!(matches!(hotspots[1].anchor, HotspotAnchor::Polar { .. }));
    }

    #[test]
    fn unknown_kind_is_skipped_with_warning() {
        let manifest = manifest_with_hotspots(vec![HotspotRecord {
            id: "weird".to_string(),
            kind: "teleport".to_string(),
            x_pct: Some(1.0),
            y_pct: Some(1.0),
            ..HotspotRecord::default()
        }]);

        let (tour, report) = tour_from_manifest(&manifest);
        assert!(tour.scenes[0].hotspots.is_empty());
        assert_eq!(
            report.warnings,
            vec![LoadWarning::UnknownKind {
                scene: "a".to_string(),
                hotspot: "weird".to_string(),
                kind: "teleport".to_string(),
            }]
        );
    }

    #[test]
    fn scene_link_without_target_is_skipped() {
        let manifest = manifest_with_hotspots(vec![HotspotRecord {
            id: "broken".to_string(),
            kind: "scene-link".to_string(),
            x_pct: Some(1.0),
            y_pct: Some(1.0),
            ..HotspotRecord::default()
        }]);

        let (tour, report) = tour_from_manifest(&manifest);
        assert!(tour.scenes[0].hotspots.is_empty());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn round_trip_preserves_anchor_encoding() {
        let manifest = manifest_with_hotspots(vec![
            HotspotRecord {
                id: "pct".to_string(),
                kind: "scene-link".to_string(),
                x_pct: Some(30.0),
                y_pct: Some(60.0),
                target_scene: Some("a".to_string()),
                ..HotspotRecord::default()
            },
            HotspotRecord {
                id: "polar".to_string(),
                kind: "external-link".to_string(),
                yaw_deg: Some(45.0),
                pitch_deg: Some(5.0),
                url: Some("https://example.com".to_string()),
                ..HotspotRecord::default()
            },
        ]);

        let (tour, _) = tour_from_manifest(&manifest);
        let back = manifest_from_tour(&tour);
        let records = &back.scenes[0].hotspots;

        assert_eq!(records[0].x_pct, Some(30.0));
        assert!(records[0].yaw_deg.is_none());
        assert!((records[1].yaw_deg.unwrap() - 45.0).abs() < 1e-9);
        assert!(records[1].x_pct.is_none());
    }

    #[test]
    fn asset_fit_strings() {
        assert_eq!(parse_asset_fit("cover"), Some(AssetFit::Cover));
        assert_eq!(parse_asset_fit("75%"), Some(AssetFit::Percent(75.0)));
        assert_eq!(parse_asset_fit("banana"), None);
        assert_eq!(parse_asset_fit("-5%"), None);
    }
}
