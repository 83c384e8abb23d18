use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path as AxumPath, Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use bytes::Bytes;
use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use catalog::{DirTourStore, StoreError, TourStore};
use formats::convert::{
    hotspot_from_record, hotspot_to_record, manifest_from_tour, tour_from_manifest, TourLoadReport,
};
use formats::manifest::{HotspotRecord, TourManifest};

#[derive(Clone)]
struct AppState {
    store: Arc<RwLock<DirTourStore>>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let tours_root = env::var("TOURS_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./tours"));
    let addr: SocketAddr = env::var("TOURS_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:9300".to_string())
        .parse()
        .expect("invalid TOURS_ADDR");

    let store = DirTourStore::open(&tours_root).expect("open tours root");
    let state = AppState {
        store: Arc::new(RwLock::new(store)),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]);

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/tours", get(list_tours))
        .route(
            "/tours/:tour",
            get(get_tour).put(put_tour).delete(delete_tour),
        )
        .route(
            "/tours/:tour/scenes/:scene/hotspots",
            get(list_hotspots).post(post_hotspot),
        )
        .route(
            "/tours/:tour/scenes/:scene/hotspots/:hotspot",
            axum::routing::delete(delete_hotspot),
        )
        .route("/tours/:tour/images", post(upload_image))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("tour server listening on http://{addr}, root {tours_root:?}");
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

async fn list_tours(State(state): State<AppState>) -> Response {
    let summaries = match state.store.read().tours() {
        Ok(s) => s,
        Err(err) => return store_error_response(err),
    };

    let rows: Vec<_> = summaries
        .iter()
        .map(|s| {
            json!({
                "id": s.id.as_str(),
                "name": s.name,
                "default_scene": s.default_scene.as_str(),
                "scene_count": s.scene_count,
            })
        })
        .collect();
    Json(rows).into_response()
}

async fn get_tour(State(state): State<AppState>, AxumPath(tour): AxumPath<String>) -> Response {
    match state.store.read().tour(&tour.as_str().into()) {
        Ok(tour) => Json(manifest_from_tour(&tour)).into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn put_tour(
    State(state): State<AppState>,
    AxumPath(tour_id): AxumPath<String>,
    Json(manifest): Json<TourManifest>,
) -> Response {
    if manifest.tour_id != tour_id {
        return (
            StatusCode::BAD_REQUEST,
            "manifest tour_id does not match path",
        )
            .into_response();
    }

    let (tour, report) = tour_from_manifest(&manifest);
    for warning in &report.warnings {
        warn!("tour {tour_id}: {warning}");
    }

    if let Err(err) = state.store.write().put_tour(&tour) {
        return store_error_response(err);
    }

    let warnings: Vec<String> = report.warnings.iter().map(|w| w.to_string()).collect();
    Json(json!({ "warnings": warnings })).into_response()
}

async fn delete_tour(State(state): State<AppState>, AxumPath(tour): AxumPath<String>) -> Response {
    match state.store.write().delete_tour(&tour.as_str().into()) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "tour not found").into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn list_hotspots(
    State(state): State<AppState>,
    AxumPath((tour, scene)): AxumPath<(String, String)>,
) -> Response {
    match state
        .store
        .read()
        .hotspots(&tour.as_str().into(), &scene.as_str().into())
    {
        Ok(hotspots) => {
            let records: Vec<HotspotRecord> = hotspots.iter().map(hotspot_to_record).collect();
            Json(records).into_response()
        }
        Err(err) => store_error_response(err),
    }
}

async fn post_hotspot(
    State(state): State<AppState>,
    AxumPath((tour, scene)): AxumPath<(String, String)>,
    Json(mut record): Json<HotspotRecord>,
) -> Response {
    if record.id.trim().is_empty() {
        record.id = uuid::Uuid::new_v4().to_string();
    }

    let mut report = TourLoadReport::default();
    let Some(hotspot) = hotspot_from_record(&scene, &record, &mut report) else {
        let reason = report
            .warnings
            .first()
            .map(|w| w.to_string())
            .unwrap_or_else(|| "invalid hotspot record".to_string());
        return (StatusCode::BAD_REQUEST, reason).into_response();
    };

    let stored = hotspot_to_record(&hotspot);
    match state
        .store
        .write()
        .save_hotspot(&tour.as_str().into(), &scene.as_str().into(), hotspot)
    {
        Ok(()) => (StatusCode::CREATED, Json(stored)).into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn delete_hotspot(
    State(state): State<AppState>,
    AxumPath((tour, scene, hotspot)): AxumPath<(String, String, String)>,
) -> Response {
    match state.store.write().delete_hotspot(
        &tour.as_str().into(),
        &scene.as_str().into(),
        &hotspot.as_str().into(),
    ) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "hotspot not found").into_response(),
        Err(err) => store_error_response(err),
    }
}

#[derive(Debug, Deserialize)]
struct ImageUploadParams {
    name: Option<String>,
}

async fn upload_image(
    State(state): State<AppState>,
    AxumPath(tour): AxumPath<String>,
    Query(params): Query<ImageUploadParams>,
    body: Bytes,
) -> Response {
    if body.is_empty() {
        return (StatusCode::BAD_REQUEST, "empty image body").into_response();
    }

    let name_hint = params.name.as_deref().unwrap_or("panorama.jpg");
    match state
        .store
        .write()
        .upload_scene_image(&tour.as_str().into(), name_hint, &body)
    {
        Ok(image) => (StatusCode::CREATED, Json(json!({ "url": image.as_str() }))).into_response(),
        Err(err) => store_error_response(err),
    }
}

fn store_error_response(err: StoreError) -> Response {
    match err {
        StoreError::NotFound => (StatusCode::NOT_FOUND, "not found").into_response(),
        StoreError::Corrupt(msg) => {
            warn!("store data corrupt: {msg}");
            (StatusCode::INTERNAL_SERVER_ERROR, "stored tour corrupt").into_response()
        }
        StoreError::Io(msg) => {
            warn!("store I/O failed: {msg}");
            (StatusCode::INTERNAL_SERVER_ERROR, "storage error").into_response()
        }
    }
}
