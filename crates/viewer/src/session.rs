use foundation::math::camera::ScreenPoint;
use foundation::math::sphere::HOTSPOT_RADIUS;
use scene::graph::{GraphIssue, validate_tour};
use scene::model::{AssetFit, Hotspot, HotspotId, HotspotKind, ImageRef, SceneId, Tour, TourId};

use crate::camera::CameraState;
use crate::events::{EventLog, SessionEvent};

/// Why a load could not be completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    NotFound,
    Transport(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::NotFound => write!(f, "not found"),
            LoadError::Transport(msg) => write!(f, "transport error: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

/// What a load request is fetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadTarget {
    /// Tour metadata: scene list, initial views, default scene id.
    Tour(TourId),
    /// One scene's content: panorama image plus hotspot set.
    Scene(SceneId),
}

/// Handle for an in-flight fetch issued by the session.
///
/// Requests carry a monotonically increasing generation; completing a request
/// whose generation is no longer current is a no-op (last-requested-wins, per
/// the cancellation discipline). The embedder performs the actual I/O and
/// reports back through the matching `complete_*` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    generation: u64,
    pub target: LoadTarget,
}

impl LoadRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Resolved scene content. Completion implies the panorama image has also
/// finished loading, so applying the payload never leaves the viewer showing
/// an unloaded image.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePayload {
    pub hotspots: Vec<Hotspot>,
}

/// Session lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No tour loaded.
    Idle,
    /// One scene is current and rendered.
    SceneActive(SceneId),
    /// A scene-link is resolving; `from` stays rendered until `to`'s content
    /// arrives, so there is never a blank-frame flash.
    Transitioning { from: SceneId, to: SceneId },
}

/// Side effect requested by a hotspot, performed by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationEffect {
    ExternalLink { url: String },
    Layer { layer: u32 },
    Asset { asset: ImageRef, fit: AssetFit },
}

/// Result of activating a hotspot.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivationOutcome {
    /// Unknown hotspot, dangling scene-link, or otherwise inert.
    Ignored,
    /// A scene transition started; fetch the request and complete it.
    Transition(LoadRequest),
    /// The caller should perform this navigation side effect.
    Navigate(NavigationEffect),
    /// Presentation-only hotspot; show its text.
    Info {
        title: String,
        description: Option<String>,
    },
}

/// The scene graph manager: owns the active tour, the ephemeral camera, and
/// the transition state machine.
///
/// Single-threaded by design: all mutation happens on the render/UI thread,
/// so correctness rests on the generation ordering rather than locking.
#[derive(Debug)]
pub struct ViewerSession {
    state: SessionState,
    tour: Option<Tour>,
    camera: CameraState,
    events: EventLog,
    generation: u64,
    pending: Option<LoadRequest>,
}

impl ViewerSession {
    pub fn new(viewport_w: f64, viewport_h: f64) -> Self {
        Self {
            state: SessionState::Idle,
            tour: None,
            camera: CameraState::new(viewport_w, viewport_h),
            events: EventLog::new(),
            generation: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn tour(&self) -> Option<&Tour> {
        self.tour.as_ref()
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraState {
        &mut self.camera
    }

    pub fn events(&self) -> &[SessionEvent] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain()
    }

    /// The scene currently rendered: the active scene, or the `from` side of
    /// an in-flight transition.
    pub fn displayed_scene(&self) -> Option<&SceneId> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::SceneActive(id) => Some(id),
            SessionState::Transitioning { from, .. } => Some(from),
        }
    }

    /// Starts loading a tour. Supersedes any in-flight request.
    pub fn begin_tour(&mut self, tour: TourId) -> LoadRequest {
        self.issue(LoadTarget::Tour(tour))
    }

    /// Applies a resolved tour fetch.
    ///
    /// Returns the follow-up request for the default scene's content, or
    /// `None` if the response was stale or the load failed. Stale responses
    /// are discarded silently; failures are logged and leave the previous
    /// state (and any displayed scene) untouched.
    pub fn complete_tour(
        &mut self,
        request: &LoadRequest,
        result: Result<Tour, LoadError>,
    ) -> Option<LoadRequest> {
        if !self.take_if_current(request) {
            return None;
        }

        let tour = match result {
            Ok(tour) => tour,
            Err(err) => {
                let LoadTarget::Tour(id) = &request.target else {
                    return None;
                };
                self.events.emit(SessionEvent::TourLoadFailed {
                    tour: id.clone(),
                    reason: err.to_string(),
                });
                return None;
            }
        };

        // Surface data-integrity defects up front; they are warnings, not
        // load failures. A missing default scene is the exception, handled
        // below as a failed load.
        for issue in validate_tour(&tour) {
            match issue {
                GraphIssue::DanglingSceneLink {
                    scene,
                    hotspot,
                    target,
                } => self.events.emit(SessionEvent::DanglingSceneLink {
                    scene,
                    hotspot,
                    target,
                }),
                GraphIssue::DuplicateSceneId { scene } => {
                    self.events.emit(SessionEvent::DuplicateSceneId { scene });
                }
                GraphIssue::MissingDefaultScene { .. } => {}
            }
        }

        let default = tour.default_scene.clone();
        let Some(default_scene) = tour.scene(&default) else {
            self.events.emit(SessionEvent::TourLoadFailed {
                tour: tour.id.clone(),
                reason: format!("default scene {default} is not in the tour"),
            });
            return None;
        };

        self.camera.reset_to(default_scene.initial_view);
        self.state = SessionState::SceneActive(default.clone());
        self.tour = Some(tour);

        Some(self.issue(LoadTarget::Scene(default)))
    }

    /// Requests a (re)load of a scene's content, e.g. to retry after a
    /// failure. Returns `None` if no tour is loaded or the scene is unknown.
    pub fn request_scene(&mut self, scene: SceneId) -> Option<LoadRequest> {
        let known = self
            .tour
            .as_ref()
            .is_some_and(|tour| tour.contains_scene(&scene));
        if !known {
            return None;
        }

        // This supersedes any pending request. If it abandons an in-flight
        // transition, collapse back to the rendered scene so the session
        // cannot sit in `Transitioning` waiting for a completion that will
        // now be discarded as stale.
        if let SessionState::Transitioning { from, to } = &self.state
            && to != &scene
        {
            self.state = SessionState::SceneActive(from.clone());
        }

        Some(self.issue(LoadTarget::Scene(scene)))
    }

    /// Applies a resolved scene content fetch. Returns `true` if the payload
    /// was applied.
    ///
    /// Stale responses (superseded by a newer request) are discarded without
    /// any state change, so an A→B→C activation chain can never end on B.
    pub fn complete_scene(
        &mut self,
        request: &LoadRequest,
        result: Result<ScenePayload, LoadError>,
    ) -> bool {
        if !self.take_if_current(request) {
            return false;
        }

        let LoadTarget::Scene(scene_id) = &request.target else {
            return false;
        };

        let payload = match result {
            Ok(payload) => payload,
            Err(err) => {
                self.events.emit(SessionEvent::SceneLoadFailed {
                    scene: scene_id.clone(),
                    reason: err.to_string(),
                });
                // The previously displayed scene remains; a failed transition
                // falls back to its `from` side.
                if let SessionState::Transitioning { from, to } = &self.state
                    && to == scene_id
                {
                    self.state = SessionState::SceneActive(from.clone());
                }
                return false;
            }
        };

        let Some(tour) = self.tour.as_mut() else {
            return false;
        };
        let Some(scene) = tour.scene_mut(scene_id) else {
            return false;
        };

        scene.hotspots = payload.hotspots;
        let initial_view = scene.initial_view;

        if let SessionState::Transitioning { to, .. } = &self.state
            && to == scene_id
        {
            self.state = SessionState::SceneActive(scene_id.clone());
            self.camera.reset_to(initial_view);
        }
        true
    }

    /// Resolves a hotspot activation on the displayed scene.
    pub fn activate_hotspot(&mut self, hotspot: &HotspotId) -> ActivationOutcome {
        let Some(displayed) = self.displayed_scene().cloned() else {
            return ActivationOutcome::Ignored;
        };
        let Some(tour) = self.tour.as_ref() else {
            return ActivationOutcome::Ignored;
        };
        let Some(found) = tour.scene(&displayed).and_then(|s| s.hotspot(hotspot)) else {
            return ActivationOutcome::Ignored;
        };

        match found.kind.clone() {
            HotspotKind::SceneLink { target } => {
                if !tour.contains_scene(&target) {
                    // Dangling reference: inert hotspot, recoverable warning,
                    // state unchanged.
                    self.events.emit(SessionEvent::DanglingSceneLink {
                        scene: displayed,
                        hotspot: hotspot.clone(),
                        target,
                    });
                    return ActivationOutcome::Ignored;
                }

                self.state = SessionState::Transitioning {
                    from: displayed,
                    to: target.clone(),
                };
                ActivationOutcome::Transition(self.issue(LoadTarget::Scene(target)))
            }
            HotspotKind::ExternalLink { url } => {
                ActivationOutcome::Navigate(NavigationEffect::ExternalLink { url })
            }
            HotspotKind::LayerLink { layer } => {
                ActivationOutcome::Navigate(NavigationEffect::Layer { layer })
            }
            HotspotKind::AssetLink { asset, fit } => {
                ActivationOutcome::Navigate(NavigationEffect::Asset { asset, fit })
            }
            HotspotKind::Info { title, description } => {
                ActivationOutcome::Info { title, description }
            }
        }
    }

    /// Advances time-driven camera motion. The camera stays interactive while
    /// fetches are in flight.
    pub fn update(&mut self, dt_s: f64) {
        self.camera.update(dt_s);
    }

    /// Screen position of one hotspot on the displayed scene, under the
    /// current camera. `None` when the hotspot is unknown or faces away from
    /// the camera.
    pub fn screen_position(&self, hotspot: &HotspotId) -> Option<ScreenPoint> {
        let scene = self.displayed_scene()?;
        let found = self.tour.as_ref()?.scene(scene)?.hotspot(hotspot)?;
        self.camera.camera().project(found.anchor.point(HOTSPOT_RADIUS))
    }

    /// Screen positions for every front-facing hotspot on the displayed
    /// scene, all computed from one camera snapshot so anchors can never mix
    /// orientations within a tick. Order follows the scene's hotspot order.
    pub fn visible_hotspots(&self) -> Vec<(HotspotId, ScreenPoint)> {
        let Some(scene_id) = self.displayed_scene() else {
            return Vec::new();
        };
        let Some(scene) = self.tour.as_ref().and_then(|t| t.scene(scene_id)) else {
            return Vec::new();
        };

        let camera = self.camera.camera();
        scene
            .hotspots
            .iter()
            .filter_map(|h| {
                camera
                    .project(h.anchor.point(HOTSPOT_RADIUS))
                    .map(|p| (h.id.clone(), p))
            })
            .collect()
    }

    /// Returns to `Idle`, dropping the tour and invalidating any in-flight
    /// request. Called when the viewer unmounts.
    pub fn unload(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.tour = None;
        self.state = SessionState::Idle;
    }

    fn issue(&mut self, target: LoadTarget) -> LoadRequest {
        self.generation += 1;
        let request = LoadRequest {
            generation: self.generation,
            target,
        };
        self.pending = Some(request.clone());
        request
    }

    /// Consumes the pending slot iff `request` is still the newest one.
    fn take_if_current(&mut self, request: &LoadRequest) -> bool {
        if self.pending.as_ref() == Some(request) {
            self.pending = None;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::{LoadError, LoadTarget, ScenePayload, SessionState, ViewerSession};
    use crate::events::SessionEvent;
    use scene::anchor::HotspotAnchor;
    use scene::model::{Hotspot, HotspotKind, ImageRef, Scene, Tour};

    fn demo_tour() -> Tour {
        let mut tour = Tour::new("demo", "Demo", "a");
        let mut a = Scene::new("a", "A", ImageRef::new("a.jpg"));
        a.hotspots.push(Hotspot::new(
            "to-b",
            HotspotAnchor::percent(10.0, 50.0),
            HotspotKind::SceneLink { target: "b".into() },
        ));
        tour.scenes.push(a);
        tour.scenes.push(Scene::new("b", "B", ImageRef::new("b.jpg")));
        tour
    }

    #[test]
    fn stale_tour_response_is_discarded() {
        let mut session = ViewerSession::new(800.0, 600.0);
        let first = session.begin_tour("demo".into());
        let second = session.begin_tour("other".into());

        assert!(session.complete_tour(&first, Ok(demo_tour())).is_none());
        assert_eq!(session.state(), &SessionState::Idle);
        assert!(session.events().is_empty(), "stale discard is silent");

        let mut other = demo_tour();
        other.id = "other".into();
        assert!(session.complete_tour(&second, Ok(other)).is_some());
        assert_eq!(session.state(), &SessionState::SceneActive("a".into()));
    }

    #[test]
    fn failed_tour_load_keeps_idle_and_allows_retry() {
        let mut session = ViewerSession::new(800.0, 600.0);
        let req = session.begin_tour("demo".into());
        assert!(
            session
                .complete_tour(&req, Err(LoadError::Transport("offline".to_string())))
                .is_none()
        );
        assert_eq!(session.state(), &SessionState::Idle);
        assert_eq!(session.events().len(), 1);

        let retry = session.begin_tour("demo".into());
        assert!(session.complete_tour(&retry, Ok(demo_tour())).is_some());
        assert_eq!(session.state(), &SessionState::SceneActive("a".into()));
    }

    #[test]
    fn follow_up_request_targets_the_default_scene() {
        let mut session = ViewerSession::new(800.0, 600.0);
        let req = session.begin_tour("demo".into());
        let follow_up = session.complete_tour(&req, Ok(demo_tour())).expect("loaded");
        assert_eq!(follow_up.target, LoadTarget::Scene("a".into()));

        assert!(session.complete_scene(
            &follow_up,
            Ok(ScenePayload {
                hotspots: demo_tour().scene(&"a".into()).unwrap().hotspots.clone(),
            }),
        ));
        assert_eq!(session.visible_hotspots().len(), 1);
    }

    #[test]
    fn duplicate_scene_ids_are_warned_at_load() {
        let mut tour = demo_tour();
        tour.scenes
            .push(Scene::new("a", "A again", ImageRef::new("a2.jpg")));

        let mut session = ViewerSession::new(800.0, 600.0);
        let req = session.begin_tour("demo".into());
        assert!(session.complete_tour(&req, Ok(tour)).is_some());
        assert_eq!(session.state(), &SessionState::SceneActive("a".into()));
        assert!(session.events().iter().any(|e| matches!(
            e,
            SessionEvent::DuplicateSceneId { scene } if scene == &"a".into()
        )));
    }

    #[test]
    fn unload_reenters_idle_and_invalidates_pending() {
        let mut session = ViewerSession::new(800.0, 600.0);
        let req = session.begin_tour("demo".into());
        session.unload();
        assert_eq!(session.state(), &SessionState::Idle);
        assert!(session.complete_tour(&req, Ok(demo_tour())).is_none());
    }
}
