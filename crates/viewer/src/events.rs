use scene::model::{HotspotId, SceneId, TourId};

/// Recoverable conditions surfaced by the viewer session.
///
/// These never abort the session: data-integrity defects render the offending
/// hotspot inert, and load failures leave the last valid state displayed with
/// a retry path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A tour fetch failed; the session stays in its previous state.
    TourLoadFailed { tour: TourId, reason: String },
    /// A scene content fetch failed; the previously displayed scene remains.
    SceneLoadFailed { scene: SceneId, reason: String },
    /// A scene-link hotspot points at a scene that does not exist.
    DanglingSceneLink {
        scene: SceneId,
        hotspot: HotspotId,
        target: SceneId,
    },
    /// Two scenes in the loaded tour share an id; lookups resolve to the
    /// first.
    DuplicateSceneId { scene: SceneId },
}

/// Append-only log of session events, drained by the presentation layer.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SessionEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}
