// NoteDragManager - moves notes to a new beat/offset by pointer drag
//
// idle -> armed (touch) -> active (start) -> idle (stop). Nothing is written
// to the model until stop(); move_to() only updates the preview delta.

use super::geometry::{NoteGeometry, Rect};
use super::{GestureEvent, GestureListenerId, GestureListeners, dedup_targets};
use crate::model::{NoteId, TimelineModel};

#[derive(Debug, Default)]
pub struct NoteDragManager {
    targets: Vec<NoteId>,
    base_note: Option<NoteId>,
    base_x: i32,
    base_y: i32,
    current_x: i32,
    current_y: i32,
    has_focus: bool,
    listeners: GestureListeners,
}

impl NoteDragManager {
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

    /// Add a note to the drag targets; it becomes the base note
    pub fn touch(&mut self, note: NoteId) {
        self.targets.push(note);
        self.base_note = Some(note);
    }

    /// Add several notes; the last one becomes the base note
    pub fn touch_all(&mut self, notes: impl IntoIterator<Item = NoteId>) {
        self.targets.extend(notes);
        if let Some(last) = self.targets.last() {
            self.base_note = Some(*last);
        }
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    /// Begin dragging from the pointer position
    pub fn start(&mut self, x: i32, y: i32) {
        dedup_targets(&mut self.targets);
        self.base_x = x;
        self.base_y = y;
        self.current_x = x;
        self.current_y = y;
        self.has_focus = true;
        self.listeners.fire(GestureEvent::DragStarted);
    }

    /// Track the pointer; coordinates are clamped to the grid origin
    pub fn move_to(&mut self, x: i32, y: i32) {
        self.current_x = x.max(0);
        self.current_y = y.max(0);
    }

    /// Commit the drag as one compound edit
    ///
    /// Every target is re-created at its dragged position and the original is
    /// removed. A target whose dragged rectangle falls outside the grid is
    /// left where it was. Returns the ids of the re-created notes.
    pub fn stop<G: NoteGeometry>(&mut self, model: &mut TimelineModel, geometry: &G) -> Vec<NoteId> {
        let mut moved = Vec::new();
        if self.has_focus {
            let (dx, dy) = self.delta();
            model.begin_compound_undoable_edit();
            for id in self.targets.iter().copied() {
                if let Some(new_id) = Self::drop_note(model, geometry, id, dx, dy) {
                    moved.push(new_id);
                }
            }
            model.end_compound_undoable_edit();
        } else {
            log::debug!("drag stopped without start, ignored");
        }

        self.targets.clear();
        self.has_focus = false;
        self.base_note = None;
        self.listeners.fire(GestureEvent::DragEnded);
        moved
    }

    fn drop_note<G: NoteGeometry>(
        model: &mut TimelineModel,
        geometry: &G,
        id: NoteId,
        dx: i32,
        dy: i32,
    ) -> Option<NoteId> {
        let note = model.note(id)?;
        let length = note.length();
        let rect = geometry.note_rect(model, note).translated(dx, dy);

        let Some(measure) = geometry.measure_at(model, rect.x, rect.y) else {
            log::debug!("note {} dropped outside the grid, left in place", id);
            return None;
        };
        let beat_index = geometry.relative_beat_index(model, rect.x);
        let beat = measure.beat(beat_index);
        model.try_beat(beat)?;

        let beat_x = geometry.measure_index_to_x_offset(model, measure.measure)
            + geometry.scale().beat_width as i32 * beat_index as i32;
        let new_id = model.beat_mut(beat).generate_note(rect.x - beat_x, length);
        if let Some(original) = model.note_mut(id) {
            original.remove_from_beat();
        }
        Some(new_id)
    }

    /// Preview rectangles of the targets at the current pointer delta
    pub fn ghost_rects<G: NoteGeometry>(&self, model: &TimelineModel, geometry: &G) -> Vec<Rect> {
        let (dx, dy) = self.delta();
        self.targets
            .iter()
            .filter_map(|id| model.note(*id))
            .map(|n| geometry.note_rect(model, n).translated(dx, dy))
            .collect()
    }

    /// Pointer displacement since start
    pub fn delta(&self) -> (i32, i32) {
        (self.current_x - self.base_x, self.current_y - self.base_y)
    }

    pub fn targets(&self) -> &[NoteId] {
        &self.targets
    }

    pub fn base_note(&self) -> Option<NoteId> {
        self.base_note
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn base_x(&self) -> i32 {
        self.base_x
    }

    pub fn base_y(&self) -> i32 {
        self.base_y
    }

    pub fn current_x(&self) -> i32 {
        self.current_x
    }

    pub fn current_y(&self) -> i32 {
        self.current_y
    }
}
