use foundation::math::vec::Vec2;
use scene::anchor::HotspotAnchor;
use scene::model::{Hotspot, HotspotKind, ImageRef, Scene, SceneId, Tour, ViewOrientation};
use viewer::events::SessionEvent;
use viewer::session::{
    ActivationOutcome, LoadTarget, NavigationEffect, ScenePayload, SessionState, ViewerSession,
};

fn scene_link(id: &str, target: &str) -> Hotspot {
    Hotspot::new(
        id,
        HotspotAnchor::percent(10.0, 50.0),
        HotspotKind::SceneLink {
            target: target.into(),
        },
    )
}

/// Studio tour mirroring the reference data set: a corridor scene linking out
/// to two view scenes.
fn studio_tour() -> Tour {
    let mut tour = Tour::new("tower-kanaya-studio", "Kanaya Studio", "0-lorong");

    let mut lorong = Scene::new("0-lorong", "Lorong", ImageRef::new("0-lorong.jpg"));
    lorong.initial_view = ViewOrientation::new(0.0, 0.0, 1.5708);
    lorong.hotspots.push(scene_link("to-view-1", "1-view-1"));
    lorong.hotspots.push(scene_link("to-view-2", "2-view-2"));
    lorong.hotspots.push(Hotspot::new(
        "brochure",
        HotspotAnchor::polar(2.0, 0.1),
        HotspotKind::ExternalLink {
            url: "https://example.com/brochure".to_string(),
        },
    ));

    let mut view1 = Scene::new("1-view-1", "View 1", ImageRef::new("1-view-1.jpg"));
    view1.initial_view = ViewOrientation::new(0.0, 0.0, 1.5708);

    tour.scenes.push(lorong);
    tour.scenes.push(view1);
    tour.scenes
        .push(Scene::new("2-view-2", "View 2", ImageRef::new("2-view-2.jpg")));
    tour
}

fn hotspots_of(tour: &Tour, scene: &str) -> Vec<Hotspot> {
    tour.scene(&SceneId::new(scene)).unwrap().hotspots.clone()
}

/// Loads the studio tour and resolves the default scene's content.
fn active_session() -> ViewerSession {
    let mut session = ViewerSession::new(1280.0, 720.0);
    let req = session.begin_tour("tower-kanaya-studio".into());
    let follow_up = session
        .complete_tour(&req, Ok(studio_tour()))
        .expect("tour loads");
    assert!(session.complete_scene(
        &follow_up,
        Ok(ScenePayload {
            hotspots: hotspots_of(&studio_tour(), "0-lorong"),
        }),
    ));
    session
}

#[test]
fn loading_the_studio_tour_activates_the_corridor() {
    let session = active_session();
    assert_eq!(
        session.state(),
        &SessionState::SceneActive("0-lorong".into())
    );
    assert_eq!(session.camera().yaw_rad(), 0.0);
    assert_eq!(session.camera().pitch_rad(), 0.0);
    assert!((session.camera().fov_rad() - 1.5708).abs() < 1e-9);
}

#[test]
fn scene_link_activation_transitions_and_resets_the_camera() {
    let mut session = active_session();

    // Move the camera off the initial view first, so the reset is observable.
    session.camera_mut().on_pointer_down(Vec2::new(100.0, 100.0));
    session.camera_mut().on_pointer_move(Vec2::new(400.0, 160.0));
    session.camera_mut().on_pointer_up();
    assert!(session.camera().yaw_rad() != 0.0);

    let outcome = session.activate_hotspot(&"to-view-1".into());
    let ActivationOutcome::Transition(req) = outcome else {
        panic!("expected a transition, got {outcome:?}");
    };
    assert_eq!(req.target, LoadTarget::Scene("1-view-1".into()));
    assert_eq!(
        session.state(),
        &SessionState::Transitioning {
            from: "0-lorong".into(),
            to: "1-view-1".into(),
        }
    );

    // Previous scene stays rendered (and interactive) while the fetch is in
    // flight.
    assert_eq!(session.displayed_scene(), Some(&"0-lorong".into()));
    assert_eq!(session.visible_hotspots().is_empty(), false);

    assert!(session.complete_scene(&req, Ok(ScenePayload { hotspots: vec![] })));
    assert_eq!(
        session.state(),
        &SessionState::SceneActive("1-view-1".into())
    );
    assert_eq!(session.camera().yaw_rad(), 0.0);
    assert_eq!(session.camera().pitch_rad(), 0.0);
    assert!((session.camera().fov_rad() - 1.5708).abs() < 1e-9);
}

#[test]
fn superseded_transition_never_wins() {
    let mut session = active_session();

    // A -> B, then A -> C before B's data resolves.
    let ActivationOutcome::Transition(to_b) = session.activate_hotspot(&"to-view-1".into()) else {
        panic!("expected transition");
    };
    let ActivationOutcome::Transition(to_c) = session.activate_hotspot(&"to-view-2".into()) else {
        panic!("expected transition");
    };

    // B resolves late: discarded, no state change.
    assert!(!session.complete_scene(&to_b, Ok(ScenePayload { hotspots: vec![] })));
    assert_eq!(
        session.state(),
        &SessionState::Transitioning {
            from: "0-lorong".into(),
            to: "2-view-2".into(),
        }
    );

    assert!(session.complete_scene(&to_c, Ok(ScenePayload { hotspots: vec![] })));
    assert_eq!(
        session.state(),
        &SessionState::SceneActive("2-view-2".into())
    );
}

#[test]
fn requesting_another_scene_abandons_the_transition() {
    let mut session = active_session();

    // A -> B transition in flight, then a direct reload of A supersedes it.
    let ActivationOutcome::Transition(to_b) = session.activate_hotspot(&"to-view-1".into()) else {
        panic!("expected transition");
    };
    let reload = session
        .request_scene("0-lorong".into())
        .expect("scene is known");

    // The transition collapses immediately; the session cannot wait forever
    // on a completion that is now stale.
    assert_eq!(
        session.state(),
        &SessionState::SceneActive("0-lorong".into())
    );

    assert!(!session.complete_scene(&to_b, Ok(ScenePayload { hotspots: vec![] })));
    assert_eq!(
        session.state(),
        &SessionState::SceneActive("0-lorong".into())
    );

    assert!(session.complete_scene(
        &reload,
        Ok(ScenePayload {
            hotspots: hotspots_of(&studio_tour(), "0-lorong"),
        }),
    ));
    assert_eq!(
        session.state(),
        &SessionState::SceneActive("0-lorong".into())
    );
    assert_eq!(session.visible_hotspots().len(), 2);
}

#[test]
fn dangling_scene_link_is_inert_and_warned() {
    let mut session = active_session();

    // Corrupt the loaded hotspot set with a dangling link, as stale persisted
    // data would.
    let req = session.request_scene("0-lorong".into()).unwrap();
    assert!(session.complete_scene(
        &req,
        Ok(ScenePayload {
            hotspots: vec![scene_link("ghost", "9-missing")],
        }),
    ));

    let before = session.state().clone();
    assert_eq!(
        session.activate_hotspot(&"ghost".into()),
        ActivationOutcome::Ignored
    );
    assert_eq!(session.state(), &before);
    assert!(session.events().iter().any(|e| matches!(
        e,
        SessionEvent::DanglingSceneLink { target, .. } if target == &"9-missing".into()
    )));
}

#[test]
fn failed_scene_fetch_falls_back_to_the_previous_scene() {
    let mut session = active_session();

    let ActivationOutcome::Transition(req) = session.activate_hotspot(&"to-view-1".into()) else {
        panic!("expected transition");
    };
    assert!(!session.complete_scene(
        &req,
        Err(viewer::session::LoadError::Transport("timeout".to_string())),
    ));

    assert_eq!(
        session.state(),
        &SessionState::SceneActive("0-lorong".into())
    );
    assert!(session.events().iter().any(|e| matches!(
        e,
        SessionEvent::SceneLoadFailed { scene, .. } if scene == &"1-view-1".into()
    )));

    // Retry path: the scene can be requested again.
    assert!(session.request_scene("1-view-1".into()).is_some());
}

#[test]
fn non_scene_hotspots_return_side_effects_without_state_change() {
    let mut session = active_session();
    let before = session.state().clone();

    let outcome = session.activate_hotspot(&"brochure".into());
    assert_eq!(
        outcome,
        ActivationOutcome::Navigate(NavigationEffect::ExternalLink {
            url: "https://example.com/brochure".to_string(),
        })
    );
    assert_eq!(session.state(), &before);
}

#[test]
fn hotspot_positions_follow_the_camera() {
    let mut session = active_session();

    // At the initial view both scene links sit in the front hemisphere.
    assert!(session.screen_position(&"to-view-1".into()).is_some());
    let visible_before = session.visible_hotspots();
    assert!(!visible_before.is_empty());

    // Drag most of a turn; anchors move or leave the front hemisphere.
    session.camera_mut().on_pointer_down(Vec2::new(0.0, 360.0));
    session
        .camera_mut()
        .on_pointer_move(Vec2::new(4000.0, 360.0));
    let visible_after = session.visible_hotspots();

    assert_ne!(visible_before, visible_after);
}
