use std::env;
use std::fs;
use std::path::PathBuf;

use formats::convert::{manifest_from_tour, tour_from_manifest};
use formats::manifest::{SceneRecord, TourManifest, ViewRecord};
use formats::package::{TOUR_MANIFEST_FILE_NAME, TourPackage};
use scene::graph::validate_tour;
use scene::model::HotspotKind;
use serde_json::json;

fn main() {
    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let mut args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let cmd = args[1].clone();
    args.drain(0..2);

    match cmd.as_str() {
        "validate" => cmd_validate(args),
        "inspect" => cmd_inspect(args),
        "manifest" => cmd_manifest(args),
        _ => Err(usage()),
    }
}

fn cmd_validate(args: Vec<String>) -> Result<(), String> {
    // tour validate <tour_dir>
    if args.len() != 1 {
        return Err(usage());
    }

    let dir = PathBuf::from(&args[0]);
    let package = TourPackage::load(&dir).map_err(|e| format!("load {dir:?}: {e}"))?;
    let (tour, report) = tour_from_manifest(package.manifest());

    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }

    let issues = validate_tour(&tour);
    for issue in &issues {
        eprintln!("issue: {issue}");
    }

    if issues.is_empty() {
        eprintln!(
            "{}: ok ({} scenes, {} load warnings)",
            tour.id,
            tour.scenes.len(),
            report.warnings.len()
        );
        Ok(())
    } else {
        Err(format!("{} graph issues found", issues.len()))
    }
}

fn cmd_inspect(args: Vec<String>) -> Result<(), String> {
    // tour inspect <tour_dir>
    if args.len() != 1 {
        return Err(usage());
    }

    let dir = PathBuf::from(&args[0]);
    let package = TourPackage::load(&dir).map_err(|e| format!("load {dir:?}: {e}"))?;
    let (tour, report) = tour_from_manifest(package.manifest());

    let scenes: Vec<_> = tour
        .scenes
        .iter()
        .map(|scene| {
            let links: Vec<&str> = scene
                .hotspots
                .iter()
                .filter_map(|h| match &h.kind {
                    HotspotKind::SceneLink { target } => Some(target.as_str()),
                    _ => None,
                })
                .collect();
            json!({
                "id": scene.id.as_str(),
                "name": scene.name,
                "image": scene.image.as_str(),
                "hotspot_count": scene.hotspots.len(),
                "links_to": links,
            })
        })
        .collect();

    let summary = json!({
        "id": tour.id.as_str(),
        "name": tour.name,
        "default_scene": tour.default_scene.as_str(),
        "scene_count": tour.scenes.len(),
        "load_warnings": report.warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
        "scenes": scenes,
    });

    let payload = serde_json::to_string_pretty(&summary).map_err(|e| format!("json: {e}"))?;
    println!("{payload}");
    Ok(())
}

fn cmd_manifest(args: Vec<String>) -> Result<(), String> {
    // tour manifest <output_dir> <image> [image2 ...] [--id ID] [--name NAME]
    if args.len() < 2 {
        return Err(usage());
    }

    let out_dir = PathBuf::from(&args[0]);
    let mut id: Option<String> = None;
    let mut name: Option<String> = None;
    let mut image_paths: Vec<PathBuf> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--id" => {
                i += 1;
                if i >= args.len() {
                    return Err("--id requires a value".to_string());
                }
                id = Some(args[i].clone());
            }
            "--name" => {
                i += 1;
                if i >= args.len() {
                    return Err("--name requires a value".to_string());
                }
                name = Some(args[i].clone());
            }
            s if s.starts_with('-') => {
                return Err(format!("unknown arg: {s}\n\n{}", usage()));
            }
            _ => {
                image_paths.push(PathBuf::from(&args[i]));
            }
        }
        i += 1;
    }

    if image_paths.is_empty() {
        return Err("manifest requires at least one panorama image".to_string());
    }

    let manifest_path = out_dir.join(TOUR_MANIFEST_FILE_NAME);
    if manifest_path.exists() {
        return Err(format!("manifest already exists: {manifest_path:?}"));
    }

    let images_dir = out_dir.join("images");
    fs::create_dir_all(&images_dir).map_err(|e| format!("create {images_dir:?}: {e}"))?;

    let tour_id = id.unwrap_or_else(|| {
        out_dir
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("tour")
            .to_string()
    });

    let mut scenes: Vec<SceneRecord> = Vec::new();
    for p in &image_paths {
        let file_name = p
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| format!("invalid image filename: {p:?}"))?
            .to_string();
        let scene_id = p
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("scene")
            .to_string();

        let bytes = fs::read(p).map_err(|e| format!("read {p:?}: {e}"))?;
        let out_path = images_dir.join(&file_name);
        fs::write(&out_path, &bytes).map_err(|e| format!("write {out_path:?}: {e}"))?;

        scenes.push(SceneRecord {
            id: scene_id.clone(),
            name: scene_id,
            image: format!("images/{file_name}"),
            initial_view: ViewRecord::default(),
            hotspots: Vec::new(),
        });
    }

    let default_scene = scenes[0].id.clone();
    let mut manifest = TourManifest::new(tour_id, default_scene);
    manifest.name = name;
    manifest.scenes = scenes;

    // Round-trip through the model so the written skeleton is normalized.
    let (tour, _) = tour_from_manifest(&manifest);
    let manifest = manifest_from_tour(&tour);

    let payload = serde_json::to_string_pretty(&manifest).map_err(|e| format!("json: {e}"))?;
    fs::write(&manifest_path, payload).map_err(|e| format!("write {manifest_path:?}: {e}"))?;

    eprintln!(
        "wrote {} ({} scenes, default {})",
        manifest_path.display(),
        manifest.scenes.len(),
        manifest.default_scene
    );
    Ok(())
}

fn usage() -> String {
    let exe = env::args().next().unwrap_or_else(|| "tour".to_string());
    format!(
        "Usage:\n  {exe} validate <tour_dir>\n  {exe} inspect <tour_dir>\n  {exe} manifest <output_dir> <image> [image2 ...] [--id ID] [--name NAME]\n\nNotes:\n- `validate` exits non-zero when scene links dangle or ids collide.\n- `manifest` writes a skeleton tour package with one scene per panorama image.\n- Hotspot anchors accept percent (x_pct/y_pct) or polar (yaw_deg/pitch_deg) encodings.\n"
    )
}
