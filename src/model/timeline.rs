// TimelineModel - root of the key/measure/beat/note hierarchy
//
// All mutation goes through the model (directly or through the KeyMut/MeasureMut/
// BeatMut/NoteMut handles) so that every change is wrapped into a ModelEvent,
// fed to the undo translator and delivered to the registered listeners.

use super::beat::Beat;
use super::event::{BeatEvent, EventScope, KeyEvent, MeasureEvent, ModelEvent, NoteEvent};
use super::key::Key;
use super::measure::Measure;
use super::note::{BeatRef, MeasureRef, Note, NoteId};
use crate::undo::trait_def::{EditError, EditResult, UndoableEdit};
use crate::undo::translator::{EditListenerId, UndoTranslator};
use std::collections::HashMap;
use std::fmt;

/// Handle returned when registering a model listener
pub type ListenerId = u64;

struct Listener {
    id: ListenerId,
    scope: EventScope,
    callback: Box<dyn FnMut(&ModelEvent)>,
}

/// The editable grid of a piano roll
///
/// Keys are stored top to bottom; each key holds `measure_count` measures of
/// `beat_count` beats. Notes are owned by their beat and addressed from the
/// outside by [`NoteId`].
pub struct TimelineModel {
    keys: Vec<Key>,
    measure_count: usize,
    beat_count: usize,
    /// Where every live note currently sits
    locations: HashMap<NoteId, BeatRef>,
    next_note_id: NoteId,
    listeners: Vec<Listener>,
    next_listener_id: ListenerId,
    undo: UndoTranslator,
}

impl TimelineModel {
    /// Create a grid of `key_count` lanes, each with `measure_count` measures of
    /// `beat_count` beats
    pub fn new(key_count: usize, measure_count: usize, beat_count: usize) -> Self {
        Self {
            keys: (0..key_count)
                .map(|i| Key::new(i + 1, measure_count, beat_count))
                .collect(),
            measure_count,
            beat_count,
            locations: HashMap::new(),
            next_note_id: 1,
            listeners: Vec::new(),
            next_listener_id: 1,
            undo: UndoTranslator::new(),
        }
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    /// Key at storage position `i`
    ///
    /// # Panics
    /// Panics if `i >= key_count()`.
    pub fn key(&self, i: usize) -> &Key {
        &self.keys[i]
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Measure count applied to keys created from now on
    pub fn measure_count(&self) -> usize {
        self.measure_count
    }

    /// Beat count applied to measures created from now on
    pub fn beat_count(&self) -> usize {
        self.beat_count
    }

    /// Measure at `location`
    ///
    /// # Panics
    /// Panics if any index is out of bounds.
    pub fn measure(&self, location: MeasureRef) -> &Measure {
        self.keys[location.key].measure(location.measure)
    }

    /// Beat at `location`
    ///
    /// # Panics
    /// Panics if any index is out of bounds.
    pub fn beat(&self, location: BeatRef) -> &Beat {
        self.measure(location.measure_ref()).beat(location.beat)
    }

    /// Beat at `location`, or `None` when the grid does not contain it
    pub fn try_beat(&self, location: BeatRef) -> Option<&Beat> {
        self.keys
            .get(location.key)?
            .measures()
            .get(location.measure)?
            .beats()
            .get(location.beat)
    }

    /// Live note by id; `None` once the note has been removed
    pub fn note(&self, id: NoteId) -> Option<&Note> {
        let location = self.locations.get(&id)?;
        let beat = self.try_beat(*location)?;
        beat.position_of(id).map(|p| beat.note(p))
    }

    pub fn contains_note(&self, id: NoteId) -> bool {
        self.locations.contains_key(&id)
    }

    /// Every live note in key, measure, beat, insertion order
    pub fn notes(&self) -> impl Iterator<Item = &Note> + '_ {
        self.keys.iter().flat_map(|k| k.notes())
    }

    pub fn note_count(&self) -> usize {
        self.locations.len()
    }

    /// Ids of every live note, in traversal order
    pub fn all_notes(&self) -> Vec<NoteId> {
        self.notes().map(|n| n.id()).collect()
    }

    /// Ids of the selected notes, in traversal order
    pub fn selected_notes(&self) -> Vec<NoteId> {
        self.notes()
            .filter(|n| n.is_selected())
            .map(|n| n.id())
            .collect()
    }

    /// Pitch value of the key with 1-based `key_index`
    ///
    /// Height numbering is inverted relative to storage order: the first
    /// stored key is the highest one.
    pub fn key_height(&self, key_index: usize) -> i32 {
        self.keys.len() as i32 - key_index as i32
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    /// Register a listener receiving every event raised inside `scope`
    ///
    /// A note-scoped listener outlives the removal of its note, so it fires
    /// again if an undo restores the same id. Hosts drop such listeners with
    /// [`remove_listener`](Self::remove_listener) or
    /// [`prune_note_listeners`](Self::prune_note_listeners).
    pub fn add_listener<F>(&mut self, scope: EventScope, callback: F) -> ListenerId
    where
        F: FnMut(&ModelEvent) + 'static,
    {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push(Listener {
            id,
            scope,
            callback: Box::new(callback),
        });
        id
    }

    /// Register a listener on the whole model
    pub fn add_model_listener<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&ModelEvent) + 'static,
    {
        self.add_listener(EventScope::Model, callback)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        before != self.listeners.len()
    }

    /// Drop every listener scoped to a note that is no longer live
    ///
    /// Call after clearing undo history, once no edit can restore those notes.
    /// Returns the number of listeners removed.
    pub fn prune_note_listeners(&mut self) -> usize {
        let before = self.listeners.len();
        let locations = &self.locations;
        self.listeners.retain(|l| match l.scope {
            EventScope::Note(id) => locations.contains_key(&id),
            _ => true,
        });
        let pruned = before - self.listeners.len();
        if pruned > 0 {
            log::debug!("pruned {} listeners of removed notes", pruned);
        }
        pruned
    }

    fn fire(&mut self, event: ModelEvent) {
        log::trace!("model event: {:?}", event);
        self.undo.observe(&event);
        for listener in self.listeners.iter_mut() {
            if listener.scope.matches(&event) {
                (listener.callback)(&event);
            }
        }
    }

    // ------------------------------------------------------------------
    // Undo support
    // ------------------------------------------------------------------

    /// Stop recording edits until the matching [`end_apply_undoable_edit`](Self::end_apply_undoable_edit).
    /// Calls nest.
    pub fn begin_apply_undoable_edit(&mut self) {
        self.undo.begin_apply();
    }

    pub fn end_apply_undoable_edit(&mut self) {
        self.undo.end_apply();
    }

    pub fn is_applying_undoable_edit(&self) -> bool {
        self.undo.is_applying()
    }

    /// Group every edit recorded until the matching
    /// [`end_compound_undoable_edit`](Self::end_compound_undoable_edit) into one undo step
    pub fn begin_compound_undoable_edit(&mut self) {
        self.undo.begin_compound();
    }

    pub fn end_compound_undoable_edit(&mut self) {
        self.undo.end_compound();
    }

    /// Subscribe to produced edit records
    pub fn add_undoable_edit_listener<F>(&mut self, callback: F) -> EditListenerId
    where
        F: FnMut(&dyn UndoableEdit) + 'static,
    {
        self.undo.add_listener(callback)
    }

    pub fn remove_undoable_edit_listener(&mut self, id: EditListenerId) -> bool {
        self.undo.remove_listener(id)
    }

    /// Bound the queue drained by [`take_undoable_edits`](Self::take_undoable_edits)
    pub fn set_max_pending_undoable_edits(&mut self, max_pending: usize) {
        self.undo.set_max_pending(max_pending);
    }

    pub fn pending_undoable_edit_count(&self) -> usize {
        self.undo.pending_count()
    }

    /// Drain the edit records produced since the last call
    pub fn take_undoable_edits(&mut self) -> Vec<Box<dyn UndoableEdit>> {
        self.undo.take_pending()
    }

    /// Run `f` with edit recording suppressed
    pub(crate) fn applying<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.begin_apply_undoable_edit();
        let result = f(self);
        self.end_apply_undoable_edit();
        result
    }

    // ------------------------------------------------------------------
    // Mutation handles
    // ------------------------------------------------------------------

    /// Mutable access to key lane `i`
    ///
    /// # Panics
    /// Panics if `i >= key_count()`.
    pub fn key_mut(&mut self, i: usize) -> KeyMut<'_> {
        assert!(i < self.keys.len(), "key index {} out of bounds", i);
        KeyMut { model: self, key: i }
    }

    /// Mutable access to the measure at `location`
    ///
    /// # Panics
    /// Panics if any index is out of bounds.
    pub fn measure_mut(&mut self, location: MeasureRef) -> MeasureMut<'_> {
        self.measure(location);
        MeasureMut {
            model: self,
            location,
        }
    }

    /// Mutable access to the beat at `location`
    ///
    /// # Panics
    /// Panics if any index is out of bounds.
    pub fn beat_mut(&mut self, location: BeatRef) -> BeatMut<'_> {
        self.beat(location);
        BeatMut {
            model: self,
            location,
        }
    }

    /// Mutable access to a live note
    pub fn note_mut(&mut self, id: NoteId) -> Option<NoteMut<'_>> {
        let beat = *self.locations.get(&id)?;
        Some(NoteMut {
            model: self,
            id,
            beat,
        })
    }

    /// Deselect every note
    pub fn clear_all_selection(&mut self) {
        for id in self.selected_notes() {
            if let Some(mut note) = self.note_mut(id) {
                note.set_selected(false);
            }
        }
    }

    // ------------------------------------------------------------------
    // Grid shape
    // ------------------------------------------------------------------

    /// Append keys until there are `key_count`
    pub fn extend_key_count(&mut self, key_count: usize) {
        while self.keys.len() < key_count {
            let index = self.keys.len();
            self.keys
                .push(Key::new(index + 1, self.measure_count, self.beat_count));
            log::debug!("key {} created", index);
            self.fire(ModelEvent::KeyCreated { key: index });
        }
    }

    /// Remove keys from the tail until there are `key_count`
    pub fn shrink_key_count(&mut self, key_count: usize) {
        while self.keys.len() > key_count {
            if let Some(key) = self.keys.pop() {
                self.forget_notes(key.notes());
            }
            let index = self.keys.len();
            log::debug!("key {} removed", index);
            self.fire(ModelEvent::KeyRemoved { key: index });
        }
    }

    /// Extend every key to `measure_count` measures
    pub fn extend_measure_count(&mut self, measure_count: usize) {
        for key in 0..self.keys.len() {
            self.extend_key_measures(key, measure_count);
        }
        self.measure_count = measure_count;
    }

    /// Shrink every key to `measure_count` measures
    pub fn shrink_measure_count(&mut self, measure_count: usize) {
        for key in 0..self.keys.len() {
            self.shrink_key_measures(key, measure_count);
        }
        self.measure_count = measure_count;
    }

    /// Extend every measure to `beat_count` beats
    pub fn extend_beat_count(&mut self, beat_count: usize) {
        for key in 0..self.keys.len() {
            self.extend_key_beats(key, beat_count);
        }
        self.beat_count = beat_count;
    }

    /// Shrink every measure to `beat_count` beats
    pub fn shrink_beat_count(&mut self, beat_count: usize) {
        for key in 0..self.keys.len() {
            self.shrink_key_beats(key, beat_count);
        }
        self.beat_count = beat_count;
    }

    pub fn resize_key_count(&mut self, key_count: usize) {
        if self.keys.len() < key_count {
            self.extend_key_count(key_count);
        } else {
            self.shrink_key_count(key_count);
        }
    }

    pub fn resize_measure_count(&mut self, measure_count: usize) {
        for key in 0..self.keys.len() {
            if self.keys[key].measure_count() < measure_count {
                self.extend_key_measures(key, measure_count);
            } else {
                self.shrink_key_measures(key, measure_count);
            }
        }
        self.measure_count = measure_count;
    }

    pub fn resize_beat_count(&mut self, beat_count: usize) {
        for key in 0..self.keys.len() {
            for measure in 0..self.keys[key].measure_count() {
                let location = MeasureRef::new(key, measure);
                if self.measure(location).beat_count() < beat_count {
                    self.extend_measure_beats(location, beat_count);
                } else {
                    self.shrink_measure_beats(location, beat_count);
                }
            }
            self.keys[key].set_default_beat_count(beat_count);
        }
        self.beat_count = beat_count;
    }

    fn extend_key_measures(&mut self, key: usize, measure_count: usize) {
        while self.keys[key].measure_count() < measure_count {
            let measure = self.keys[key].push_measure();
            self.fire(ModelEvent::from_key(key, KeyEvent::MeasureCreated { measure }));
        }
    }

    fn shrink_key_measures(&mut self, key: usize, measure_count: usize) {
        while self.keys[key].measure_count() > measure_count {
            if let Some(removed) = self.keys[key].pop_measure() {
                self.forget_notes(removed.notes());
            }
            let measure = self.keys[key].measure_count();
            self.fire(ModelEvent::from_key(key, KeyEvent::MeasureRemoved { measure }));
        }
    }

    fn extend_key_beats(&mut self, key: usize, beat_count: usize) {
        for measure in 0..self.keys[key].measure_count() {
            self.extend_measure_beats(MeasureRef::new(key, measure), beat_count);
        }
        self.keys[key].set_default_beat_count(beat_count);
    }

    fn shrink_key_beats(&mut self, key: usize, beat_count: usize) {
        for measure in 0..self.keys[key].measure_count() {
            self.shrink_measure_beats(MeasureRef::new(key, measure), beat_count);
        }
        self.keys[key].set_default_beat_count(beat_count);
    }

    fn extend_measure_beats(&mut self, location: MeasureRef, beat_count: usize) {
        while self.measure(location).beat_count() < beat_count {
            let beat = self.measure_slot(location).push_beat();
            self.fire(ModelEvent::from_measure(location, MeasureEvent::BeatCreated { beat }));
        }
    }

    fn shrink_measure_beats(&mut self, location: MeasureRef, beat_count: usize) {
        while self.measure(location).beat_count() > beat_count {
            if let Some(removed) = self.measure_slot(location).pop_beat() {
                self.forget_notes(removed.notes().iter());
            }
            let beat = self.measure(location).beat_count();
            self.fire(ModelEvent::from_measure(location, MeasureEvent::BeatRemoved { beat }));
        }
    }

    /// Drop location entries of notes destroyed together with their container
    fn forget_notes<'a>(&mut self, notes: impl Iterator<Item = &'a Note>) {
        for note in notes {
            self.locations.remove(&note.id);
        }
    }

    fn measure_slot(&mut self, location: MeasureRef) -> &mut Measure {
        self.keys[location.key].measure_mut(location.measure)
    }

    fn beat_slot(&mut self, location: BeatRef) -> &mut Beat {
        self.measure_slot(location.measure_ref())
            .beat_mut(location.beat)
    }

    fn try_beat_slot(&mut self, location: BeatRef) -> Option<&mut Beat> {
        self.keys
            .get_mut(location.key)?
            .get_measure_mut(location.measure)?
            .get_beat_mut(location.beat)
    }

    fn note_slot(&mut self, id: NoteId) -> Option<&mut Note> {
        let location = *self.locations.get(&id)?;
        self.try_beat_slot(location)?.get_mut(id)
    }

    // ------------------------------------------------------------------
    // Notes
    // ------------------------------------------------------------------

    fn generate_note(&mut self, location: BeatRef, offset: i32, length: f32) -> NoteId {
        let id = self.next_note_id;
        self.next_note_id += 1;
        self.beat_slot(location)
            .push(Note::new(id, location, offset, length));
        self.locations.insert(id, location);
        self.fire(ModelEvent::from_beat(location, BeatEvent::NoteCreated { note: id }));
        id
    }

    /// Put a detached note back into the grid
    ///
    /// The note keeps its id. It is inserted at `position` in the beat named by
    /// its own location, or appended when `position` is `None` or past the end.
    pub(crate) fn restore_note_at(&mut self, note: Note, position: Option<usize>) -> EditResult<NoteId> {
        let id = note.id;
        let location = note.beat;
        if self.locations.contains_key(&id) {
            return Err(EditError::NoteAlreadyLive(id));
        }
        let beat = self
            .try_beat_slot(location)
            .ok_or(EditError::BeatOutOfRange(location))?;
        match position {
            Some(p) => beat.insert(p, note),
            None => beat.push(note),
        };
        self.locations.insert(id, location);
        self.next_note_id = self.next_note_id.max(id + 1);
        self.fire(ModelEvent::from_beat(location, BeatEvent::NoteCreated { note: id }));
        Ok(id)
    }

    /// Detach a note from its beat, returning it with the position it occupied
    pub(crate) fn remove_note(&mut self, id: NoteId) -> Option<(usize, Note)> {
        let location = *self.locations.get(&id)?;
        let (position, note) = self.try_beat_slot(location)?.take(id)?;
        self.locations.remove(&id);
        self.fire(ModelEvent::from_note(
            location,
            id,
            NoteEvent::Removed {
                snapshot: note.clone(),
                position,
            },
        ));
        Some((position, note))
    }

    fn note_changed(&mut self, id: NoteId, event: NoteEvent) {
        if let Some(location) = self.locations.get(&id).copied() {
            self.fire(ModelEvent::from_note(location, id, event));
        }
    }
}

impl Default for TimelineModel {
    fn default() -> Self {
        Self::new(128, 4, 4)
    }
}

impl fmt::Debug for TimelineModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimelineModel")
            .field("key_count", &self.keys.len())
            .field("measure_count", &self.measure_count)
            .field("beat_count", &self.beat_count)
            .field("note_count", &self.locations.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Mutable view of one key lane
pub struct KeyMut<'a> {
    model: &'a mut TimelineModel,
    key: usize,
}

impl KeyMut<'_> {
    /// 1-based lane index
    pub fn index(&self) -> usize {
        self.model.keys[self.key].index()
    }

    pub fn extend_measure_count(&mut self, measure_count: usize) {
        self.model.extend_key_measures(self.key, measure_count);
    }

    pub fn shrink_measure_count(&mut self, measure_count: usize) {
        self.model.shrink_key_measures(self.key, measure_count);
    }

    /// Extend every measure of the lane to `beat_count` beats
    pub fn extend_beat_count(&mut self, beat_count: usize) {
        self.model.extend_key_beats(self.key, beat_count);
    }

    pub fn shrink_beat_count(&mut self, beat_count: usize) {
        self.model.shrink_key_beats(self.key, beat_count);
    }

    /// # Panics
    /// Panics if `i` is out of bounds.
    pub fn measure_mut(&mut self, i: usize) -> MeasureMut<'_> {
        self.model.measure_mut(MeasureRef::new(self.key, i))
    }
}

/// Mutable view of one measure
pub struct MeasureMut<'a> {
    model: &'a mut TimelineModel,
    location: MeasureRef,
}

impl MeasureMut<'_> {
    pub fn location(&self) -> MeasureRef {
        self.location
    }

    pub fn extend_beat_count(&mut self, beat_count: usize) {
        self.model.extend_measure_beats(self.location, beat_count);
    }

    pub fn shrink_beat_count(&mut self, beat_count: usize) {
        self.model.shrink_measure_beats(self.location, beat_count);
    }

    /// # Panics
    /// Panics if `i` is out of bounds.
    pub fn beat_mut(&mut self, i: usize) -> BeatMut<'_> {
        self.model.beat_mut(self.location.beat(i))
    }
}

/// Mutable view of one beat
pub struct BeatMut<'a> {
    model: &'a mut TimelineModel,
    location: BeatRef,
}

impl BeatMut<'_> {
    pub fn location(&self) -> BeatRef {
        self.location
    }

    /// Create a note in this beat
    ///
    /// # Panics
    /// Panics if `length` is not positive.
    pub fn generate_note(&mut self, offset: i32, length: f32) -> NoteId {
        self.model.generate_note(self.location, offset, length)
    }

    /// Append a previously removed note to this beat, keeping its id
    pub fn restore_note(&mut self, mut note: Note) -> EditResult<NoteId> {
        note.beat = self.location;
        self.model.restore_note_at(note, None)
    }
}

/// Mutable view of one live note
pub struct NoteMut<'a> {
    model: &'a mut TimelineModel,
    id: NoteId,
    beat: BeatRef,
}

impl NoteMut<'_> {
    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn beat(&self) -> BeatRef {
        self.beat
    }

    pub fn offset(&self) -> i32 {
        self.model.note(self.id).map(|n| n.offset).unwrap_or_default()
    }

    pub fn length(&self) -> f32 {
        self.model.note(self.id).map(|n| n.length).unwrap_or_default()
    }

    pub fn set_offset(&mut self, offset: i32) {
        let Some(note) = self.model.note_slot(self.id) else {
            return;
        };
        let old = note.offset;
        note.offset = offset;
        self.model
            .note_changed(self.id, NoteEvent::OffsetChanged { old, new: offset });
    }

    /// Change the length; values that are not finite and positive are ignored
    pub fn set_length(&mut self, length: f32) {
        if !length.is_finite() || length <= 0.0 {
            log::debug!("note {} length {} ignored", self.id, length);
            return;
        }
        let Some(note) = self.model.note_slot(self.id) else {
            return;
        };
        let old = note.length;
        note.length = length;
        self.model
            .note_changed(self.id, NoteEvent::LengthChanged { old, new: length });
    }

    /// Change the selection flag; nothing is raised when it is unchanged
    pub fn set_selected(&mut self, selected: bool) {
        let Some(note) = self.model.note_slot(self.id) else {
            return;
        };
        if note.selected == selected {
            return;
        }
        note.selected = selected;
        self.model.note_changed(
            self.id,
            NoteEvent::SelectionChanged {
                old: !selected,
                new: selected,
            },
        );
    }

    /// Change the articulation flag; nothing is raised when it is unchanged
    pub fn set_trigger(&mut self, trigger: bool) {
        let Some(note) = self.model.note_slot(self.id) else {
            return;
        };
        if note.trigger == trigger {
            return;
        }
        note.trigger = trigger;
        self.model.note_changed(
            self.id,
            NoteEvent::TriggerChanged {
                old: !trigger,
                new: trigger,
            },
        );
    }

    /// Ask listeners to audition the note
    pub fn play(&mut self) {
        self.model.note_changed(self.id, NoteEvent::Played);
    }

    /// Detach the note from its beat, handing it back to the caller
    pub fn remove_from_beat(self) -> Option<Note> {
        self.model.remove_note(self.id).map(|(_, note)| note)
    }
}
