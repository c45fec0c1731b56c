// Gesture managers - turn pointer coordinates into note mutations
//
// Managers are plain state holders: the host feeds them pointer positions and
// passes the model and a NoteGeometry in when a gesture commits.

pub mod drag;
pub mod geometry;
pub mod pencil;
pub mod rect_select;
pub mod resize;

use crate::model::NoteId;

pub use drag::NoteDragManager;
pub use geometry::{GridGeometry, NoteGeometry, Rect, ScaleSettings};
pub use pencil::{place_note_at, toggle_note_at};
pub use rect_select::RectangleSelectManager;
pub use resize::{MIN_NOTE_LENGTH, NoteResizeManager, ResizeMode};

/// Start/end notification of a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    DragStarted,
    DragEnded,
    ResizeStarted,
    ResizeEnded,
}

/// Handle returned when registering a gesture listener
pub type GestureListenerId = u64;

/// Listener registry shared by the managers
#[derive(Default)]
pub(crate) struct GestureListeners {
    listeners: Vec<(GestureListenerId, Box<dyn FnMut(GestureEvent)>)>,
    next_id: GestureListenerId,
}

impl GestureListeners {
    pub(crate) fn add(&mut self, callback: Box<dyn FnMut(GestureEvent)>) -> GestureListenerId {
        self.next_id += 1;
        self.listeners.push((self.next_id, callback));
        self.next_id
    }

    pub(crate) fn remove(&mut self, id: GestureListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        before != self.listeners.len()
    }

    pub(crate) fn fire(&mut self, event: GestureEvent) {
        log::trace!("gesture: {:?}", event);
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }
}

impl std::fmt::Debug for GestureListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GestureListeners({})", self.listeners.len())
    }
}

/// Drop repeated ids, keeping the first occurrence
pub(crate) fn dedup_targets(targets: &mut Vec<NoteId>) {
    let mut seen = std::collections::HashSet::new();
    targets.retain(|id| seen.insert(*id));
}
