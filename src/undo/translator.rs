// UndoTranslator - turns propagated model events into edit records

use super::edits::{
    CompoundEdit, NoteCreateEdit, NoteLengthEdit, NoteOffsetEdit, NoteRemoveEdit, NoteSelectEdit,
};
use super::manager::DEFAULT_MAX_HISTORY;
use super::trait_def::UndoableEdit;
use crate::model::{BeatEvent, ModelEvent, NoteEvent};
use std::collections::VecDeque;

/// Handle returned when subscribing to produced edits
pub type EditListenerId = u64;

type EditListener = Box<dyn FnMut(&dyn UndoableEdit)>;

/// Observes every model event and records the undoable ones
///
/// Recording is suppressed while an edit is being applied (nesting counter),
/// and edits recorded between balanced compound begin/end calls are batched
/// into one [`CompoundEdit`]. Produced edits are handed to the subscribers and
/// queued until drained with [`take_pending`](Self::take_pending). The queue
/// keeps at most `max_pending` edits; the oldest is dropped first.
pub struct UndoTranslator {
    suppression: u32,
    compound_depth: u32,
    compound: Vec<Box<dyn UndoableEdit>>,
    pending: VecDeque<Box<dyn UndoableEdit>>,
    max_pending: usize,
    listeners: Vec<(EditListenerId, EditListener)>,
    next_listener_id: EditListenerId,
}

impl Default for UndoTranslator {
    fn default() -> Self {
        Self {
            suppression: 0,
            compound_depth: 0,
            compound: Vec::new(),
            pending: VecDeque::new(),
            max_pending: DEFAULT_MAX_HISTORY,
            listeners: Vec::new(),
            next_listener_id: 1,
        }
    }
}

impl UndoTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_pending(&self) -> usize {
        self.max_pending
    }

    /// Change the queue bound, dropping the oldest edits beyond it
    pub fn set_max_pending(&mut self, max_pending: usize) {
        self.max_pending = max_pending;
        self.trim_pending();
    }

    fn trim_pending(&mut self) {
        while self.pending.len() > self.max_pending {
            if let Some(dropped) = self.pending.pop_front() {
                log::debug!("undo queue full, dropped: {}", dropped.description());
            }
        }
    }

    /// Edit record for `event`, if the event is undoable
    ///
    /// Only note creation, note removal and offset, length and selection
    /// changes are translated.
    pub fn translate(event: &ModelEvent) -> Option<Box<dyn UndoableEdit>> {
        let beat = event.beat_ref()?;
        match event.beat_event()? {
            BeatEvent::NoteCreated { note } => Some(Box::new(NoteCreateEdit::new(beat, *note))),
            BeatEvent::Note { note, event } => match event {
                NoteEvent::Removed { snapshot, position } => {
                    Some(Box::new(NoteRemoveEdit::new(snapshot.clone(), *position)))
                }
                NoteEvent::OffsetChanged { old, .. } => {
                    Some(Box::new(NoteOffsetEdit::new(*note, *old)))
                }
                NoteEvent::LengthChanged { old, .. } => {
                    Some(Box::new(NoteLengthEdit::new(*note, *old)))
                }
                NoteEvent::SelectionChanged { new, .. } => {
                    Some(Box::new(NoteSelectEdit::new(*note, *new)))
                }
                NoteEvent::TriggerChanged { .. } | NoteEvent::Played => None,
            },
        }
    }

    pub fn observe(&mut self, event: &ModelEvent) {
        if self.is_applying() {
            return;
        }
        if let Some(edit) = Self::translate(event) {
            if self.compound_depth > 0 {
                self.compound.push(edit);
            } else {
                self.emit(edit);
            }
        }
    }

    fn emit(&mut self, edit: Box<dyn UndoableEdit>) {
        log::trace!("undoable edit: {}", edit.description());
        for (_, listener) in self.listeners.iter_mut() {
            listener(edit.as_ref());
        }
        self.pending.push_back(edit);
        self.trim_pending();
    }

    pub fn begin_apply(&mut self) {
        self.suppression += 1;
    }

    pub fn end_apply(&mut self) {
        if self.suppression == 0 {
            log::warn!("end_apply_undoable_edit called without matching begin");
            return;
        }
        self.suppression -= 1;
    }

    pub fn is_applying(&self) -> bool {
        self.suppression > 0
    }

    pub fn begin_compound(&mut self) {
        self.compound_depth += 1;
    }

    pub fn end_compound(&mut self) {
        if self.compound_depth == 0 {
            log::warn!("end_compound_undoable_edit called without matching begin");
            return;
        }
        self.compound_depth -= 1;
        if self.compound_depth == 0 && !self.compound.is_empty() {
            let edits = std::mem::take(&mut self.compound);
            self.emit(Box::new(CompoundEdit::new(edits)));
        }
    }

    pub fn in_compound(&self) -> bool {
        self.compound_depth > 0
    }

    pub fn add_listener<F>(&mut self, callback: F) -> EditListenerId
    where
        F: FnMut(&dyn UndoableEdit) + 'static,
    {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(callback)));
        id
    }

    pub fn remove_listener(&mut self, id: EditListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        before != self.listeners.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drain every edit produced since the last call, oldest first
    pub fn take_pending(&mut self) -> Vec<Box<dyn UndoableEdit>> {
        self.pending.drain(..).collect()
    }
}
