// NoteResizeManager - edge dragging of notes

use super::{GestureEvent, GestureListenerId, GestureListeners, dedup_targets};
use crate::model::{NoteId, TimelineModel};
use serde::{Deserialize, Serialize};

/// Shortest length a resize can produce, in beats
pub const MIN_NOTE_LENGTH: f32 = 0.1;

/// Which edge is being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResizeMode {
    /// Right edge: length changes, offset stays
    #[default]
    Resize,
    /// Left edge: offset and length change together so the right edge stays put
    Move,
}

#[derive(Debug, Clone, Copy)]
struct Snapshot {
    note: NoteId,
    offset: i32,
    length: f32,
}

/// Applies pointer deltas to the lengths (and offsets) of touched notes
///
/// Every change made between [`start`](Self::start) and [`stop`](Self::stop)
/// is recorded as one undo step.
#[derive(Debug, Default)]
pub struct NoteResizeManager {
    targets: Vec<NoteId>,
    snapshots: Vec<Snapshot>,
    mode: ResizeMode,
    base_x: i32,
    current_x: i32,
    has_focus: bool,
    listeners: GestureListeners,
}

impl NoteResizeManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener<F>(&mut self, callback: F) -> GestureListenerId
    where
        F: FnMut(GestureEvent) + 'static,
    {
        self.listeners.add(Box::new(callback))
    }

    pub fn remove_listener(&mut self, id: GestureListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn touch(&mut self, note: NoteId) {
        self.targets.push(note);
    }

    pub fn touch_all(&mut self, notes: impl IntoIterator<Item = NoteId>) {
        self.targets.extend(notes);
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    /// Snapshot the targets and open the compound edit
    pub fn start(&mut self, model: &mut TimelineModel, mode: ResizeMode, base_x: i32) {
        if self.has_focus {
            log::warn!("resize started twice, closing the previous gesture");
            model.end_compound_undoable_edit();
        }
        dedup_targets(&mut self.targets);
        self.snapshots = self
            .targets
            .iter()
            .filter_map(|id| model.note(*id))
            .map(|n| Snapshot {
                note: n.id(),
                offset: n.offset(),
                length: n.length(),
            })
            .collect();
        self.mode = mode;
        self.base_x = base_x;
        self.current_x = base_x;
        self.has_focus = true;
        model.begin_compound_undoable_edit();
        self.listeners.fire(GestureEvent::ResizeStarted);
    }

    /// Apply the pointer position `x` to every target
    ///
    /// A non-positive `beat_width` is ignored.
    pub fn resize(&mut self, model: &mut TimelineModel, x: i32, beat_width: i32) {
        if !self.has_focus {
            return;
        }
        if beat_width <= 0 {
            log::debug!("resize with beat width {} ignored", beat_width);
            return;
        }
        self.current_x = x;
        let diff = x - self.base_x;
        let delta = diff as f32 / beat_width as f32;

        for snapshot in &self.snapshots {
            let Some(mut note) = model.note_mut(snapshot.note) else {
                continue;
            };
            match self.mode {
                ResizeMode::Resize => {
                    note.set_length(MIN_NOTE_LENGTH.max(snapshot.length + delta));
                }
                ResizeMode::Move => {
                    if snapshot.length - delta > MIN_NOTE_LENGTH {
                        note.set_offset(snapshot.offset + diff);
                        note.set_length(MIN_NOTE_LENGTH.max(snapshot.length - delta));
                    }
                }
            }
        }
    }

    /// Close the compound edit and reset
    pub fn stop(&mut self, model: &mut TimelineModel) {
        if self.has_focus {
            model.end_compound_undoable_edit();
        }
        self.targets.clear();
        self.snapshots.clear();
        self.base_x = 0;
        self.current_x = 0;
        self.has_focus = false;
        self.listeners.fire(GestureEvent::ResizeEnded);
    }

    pub fn targets(&self) -> &[NoteId] {
        &self.targets
    }

    pub fn mode(&self) -> ResizeMode {
        self.mode
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn base_x(&self) -> i32 {
        self.base_x
    }

    pub fn current_x(&self) -> i32 {
        self.current_x
    }
}
