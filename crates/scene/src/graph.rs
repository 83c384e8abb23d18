use std::collections::BTreeSet;

use crate::model::{HotspotId, HotspotKind, SceneId, Tour};

/// A data-integrity defect in a tour graph.
///
/// Issues are diagnostics, never runtime failures: a tour with issues still
/// loads and renders, with the offending hotspots treated as inert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphIssue {
    /// A scene-link hotspot targets a scene id that does not exist in the tour.
    DanglingSceneLink {
        scene: SceneId,
        hotspot: HotspotId,
        target: SceneId,
    },
    /// Two scenes share an id; lookups resolve to the first.
    DuplicateSceneId { scene: SceneId },
    /// The designated default scene is not in the tour.
    MissingDefaultScene { default_scene: SceneId },
}

impl std::fmt::Display for GraphIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphIssue::DanglingSceneLink {
                scene,
                hotspot,
                target,
            } => write!(
                f,
                "scene {scene}: hotspot {hotspot} links to missing scene {target}"
            ),
            GraphIssue::DuplicateSceneId { scene } => {
                write!(f, "duplicate scene id {scene}")
            }
            GraphIssue::MissingDefaultScene { default_scene } => {
                write!(f, "default scene {default_scene} is not in the tour")
            }
        }
    }
}

/// Validates a tour's scene/hotspot graph.
///
/// Ordering contract: issues are reported in scene order, then hotspot order,
/// so reports are stable across runs.
pub fn validate_tour(tour: &Tour) -> Vec<GraphIssue> {
    let mut issues = Vec::new();

    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for scene in &tour.scenes {
        if !seen.insert(scene.id.as_str()) {
            issues.push(GraphIssue::DuplicateSceneId {
                scene: scene.id.clone(),
            });
        }
    }

    if !tour.contains_scene(&tour.default_scene) {
        issues.push(GraphIssue::MissingDefaultScene {
            default_scene: tour.default_scene.clone(),
        });
    }

    for scene in &tour.scenes {
        for hotspot in &scene.hotspots {
            let HotspotKind::SceneLink { target } = &hotspot.kind else {
                continue;
            };
            if !tour.contains_scene(target) {
                issues.push(GraphIssue::DanglingSceneLink {
                    scene: scene.id.clone(),
                    hotspot: hotspot.id.clone(),
                    target: target.clone(),
                });
            }
        }
    }

    issues
}
