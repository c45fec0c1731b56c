// Concrete edit records produced by the undo translator

use super::trait_def::{EditError, EditResult, UndoableEdit};
use crate::model::{BeatRef, Note, NoteId, TimelineModel};

/// A note was generated in (or restored into) a beat
#[derive(Debug)]
pub struct NoteCreateEdit {
    beat: BeatRef,
    note: NoteId,
    /// The note while it is undone, with the position it held
    detached: Option<(usize, Note)>,
}

impl NoteCreateEdit {
    pub fn new(beat: BeatRef, note: NoteId) -> Self {
        Self {
            beat,
            note,
            detached: None,
        }
    }

    pub fn beat(&self) -> BeatRef {
        self.beat
    }
}

impl UndoableEdit for NoteCreateEdit {
    fn undo(&mut self, model: &mut TimelineModel) -> EditResult<()> {
        let id = self.note;
        let removed = model
            .applying(|m| m.remove_note(id))
            .ok_or(EditError::NoteNotFound(id))?;
        self.detached = Some(removed);
        Ok(())
    }

    fn redo(&mut self, model: &mut TimelineModel) -> EditResult<()> {
        let (position, note) = self
            .detached
            .take()
            .ok_or(EditError::NoteNotFound(self.note))?;
        model.applying(|m| m.restore_note_at(note, Some(position)))?;
        Ok(())
    }

    fn description(&self) -> String {
        "Create Note".to_string()
    }

    fn notes(&self) -> Vec<NoteId> {
        vec![self.note]
    }
}

/// A note was detached from its beat
#[derive(Debug)]
pub struct NoteRemoveEdit {
    snapshot: Note,
    position: usize,
}

impl NoteRemoveEdit {
    pub fn new(snapshot: Note, position: usize) -> Self {
        Self { snapshot, position }
    }

    pub fn beat(&self) -> BeatRef {
        self.snapshot.beat()
    }
}

impl UndoableEdit for NoteRemoveEdit {
    fn undo(&mut self, model: &mut TimelineModel) -> EditResult<()> {
        let note = self.snapshot.clone();
        let position = self.position;
        model.applying(|m| m.restore_note_at(note, Some(position)))?;
        Ok(())
    }

    fn redo(&mut self, model: &mut TimelineModel) -> EditResult<()> {
        let id = self.snapshot.id();
        let (_, note) = model
            .applying(|m| m.remove_note(id))
            .ok_or(EditError::NoteNotFound(id))?;
        self.snapshot = note;
        Ok(())
    }

    fn description(&self) -> String {
        "Remove Note".to_string()
    }

    fn notes(&self) -> Vec<NoteId> {
        vec![self.snapshot.id()]
    }
}

/// A note's offset changed
///
/// Only the prior value is recorded; the value to redo is read back from the
/// note at undo time.
#[derive(Debug)]
pub struct NoteOffsetEdit {
    note: NoteId,
    old: i32,
    redo_value: Option<i32>,
}

impl NoteOffsetEdit {
    pub fn new(note: NoteId, old: i32) -> Self {
        Self {
            note,
            old,
            redo_value: None,
        }
    }
}

impl UndoableEdit for NoteOffsetEdit {
    fn undo(&mut self, model: &mut TimelineModel) -> EditResult<()> {
        let (id, old) = (self.note, self.old);
        self.redo_value = model.applying(|m| {
            let mut note = m.note_mut(id)?;
            let current = note.offset();
            note.set_offset(old);
            Some(current)
        });
        self.redo_value.map(|_| ()).ok_or(EditError::NoteNotFound(id))
    }

    fn redo(&mut self, model: &mut TimelineModel) -> EditResult<()> {
        let id = self.note;
        let value = self.redo_value.ok_or(EditError::NothingToRedo)?;
        model
            .applying(|m| m.note_mut(id).map(|mut n| n.set_offset(value)))
            .ok_or(EditError::NoteNotFound(id))
    }

    fn description(&self) -> String {
        "Move Note".to_string()
    }

    fn notes(&self) -> Vec<NoteId> {
        vec![self.note]
    }
}

/// A note's length changed
#[derive(Debug)]
pub struct NoteLengthEdit {
    note: NoteId,
    old: f32,
    redo_value: Option<f32>,
}

impl NoteLengthEdit {
    pub fn new(note: NoteId, old: f32) -> Self {
        Self {
            note,
            old,
            redo_value: None,
        }
    }
}

impl UndoableEdit for NoteLengthEdit {
    fn undo(&mut self, model: &mut TimelineModel) -> EditResult<()> {
        let (id, old) = (self.note, self.old);
        self.redo_value = model.applying(|m| {
            let mut note = m.note_mut(id)?;
            let current = note.length();
            note.set_length(old);
            Some(current)
        });
        self.redo_value.map(|_| ()).ok_or(EditError::NoteNotFound(id))
    }

    fn redo(&mut self, model: &mut TimelineModel) -> EditResult<()> {
        let id = self.note;
        let value = self.redo_value.ok_or(EditError::NothingToRedo)?;
        model
            .applying(|m| m.note_mut(id).map(|mut n| n.set_length(value)))
            .ok_or(EditError::NoteNotFound(id))
    }

    fn description(&self) -> String {
        "Resize Note".to_string()
    }

    fn notes(&self) -> Vec<NoteId> {
        vec![self.note]
    }
}

/// A note's selection flag changed to `selected`
#[derive(Debug)]
pub struct NoteSelectEdit {
    note: NoteId,
    selected: bool,
}

impl NoteSelectEdit {
    pub fn new(note: NoteId, selected: bool) -> Self {
        Self { note, selected }
    }

    fn apply(&self, model: &mut TimelineModel, selected: bool) -> EditResult<()> {
        let id = self.note;
        model
            .applying(|m| m.note_mut(id).map(|mut n| n.set_selected(selected)))
            .ok_or(EditError::NoteNotFound(id))
    }
}

impl UndoableEdit for NoteSelectEdit {
    fn undo(&mut self, model: &mut TimelineModel) -> EditResult<()> {
        self.apply(model, !self.selected)
    }

    fn redo(&mut self, model: &mut TimelineModel) -> EditResult<()> {
        self.apply(model, self.selected)
    }

    fn description(&self) -> String {
        if self.selected {
            "Select Note".to_string()
        } else {
            "Deselect Note".to_string()
        }
    }

    fn notes(&self) -> Vec<NoteId> {
        vec![self.note]
    }
}

/// Several edits undone and redone as one step
#[derive(Debug, Default)]
pub struct CompoundEdit {
    edits: Vec<Box<dyn UndoableEdit>>,
}

impl CompoundEdit {
    pub fn new(edits: Vec<Box<dyn UndoableEdit>>) -> Self {
        Self { edits }
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn edits(&self) -> &[Box<dyn UndoableEdit>] {
        &self.edits
    }
}

impl UndoableEdit for CompoundEdit {
    fn undo(&mut self, model: &mut TimelineModel) -> EditResult<()> {
        for edit in self.edits.iter_mut().rev() {
            edit.undo(model)?;
        }
        Ok(())
    }

    fn redo(&mut self, model: &mut TimelineModel) -> EditResult<()> {
        for edit in self.edits.iter_mut() {
            edit.redo(model)?;
        }
        Ok(())
    }

    fn description(&self) -> String {
        match self.edits.as_slice() {
            [single] => single.description(),
            edits => format!("{} Edits", edits.len()),
        }
    }

    fn notes(&self) -> Vec<NoteId> {
        let mut notes: Vec<NoteId> = self.edits.iter().flat_map(|e| e.notes()).collect();
        notes.sort_unstable();
        notes.dedup();
        notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with_note() -> (TimelineModel, NoteId) {
        let mut model = TimelineModel::new(2, 1, 4);
        let id = model.beat_mut(BeatRef::new(0, 0, 1)).generate_note(10, 1.0);
        model.take_undoable_edits();
        (model, id)
    }

    #[test]
    fn test_create_edit_roundtrip() {
        let (mut model, id) = model_with_note();
        let mut edit = NoteCreateEdit::new(BeatRef::new(0, 0, 1), id);

        edit.undo(&mut model).unwrap();
        assert!(model.note(id).is_none());

        edit.redo(&mut model).unwrap();
        assert_eq!(model.note(id).unwrap().offset(), 10);
        assert!(model.take_undoable_edits().is_empty());
    }

    #[test]
    fn test_remove_edit_restores_position() {
        let (mut model, first) = model_with_note();
        let second = model.beat_mut(BeatRef::new(0, 0, 1)).generate_note(20, 1.0);
        let (position, snapshot) = model.remove_note(first).unwrap();
        model.take_undoable_edits();

        let mut edit = NoteRemoveEdit::new(snapshot, position);
        edit.undo(&mut model).unwrap();
        assert_eq!(model.beat(BeatRef::new(0, 0, 1)).note_ids(), vec![first, second]);

        edit.redo(&mut model).unwrap();
        assert_eq!(model.beat(BeatRef::new(0, 0, 1)).note_ids(), vec![second]);
    }

    #[test]
    fn test_offset_edit_reads_redo_value_at_undo() {
        let (mut model, id) = model_with_note();
        let mut edit = NoteOffsetEdit::new(id, 10);
        model.note_mut(id).unwrap().set_offset(30);

        edit.undo(&mut model).unwrap();
        assert_eq!(model.note(id).unwrap().offset(), 10);

        edit.redo(&mut model).unwrap();
        assert_eq!(model.note(id).unwrap().offset(), 30);
    }

    #[test]
    fn test_length_edit() {
        let (mut model, id) = model_with_note();
        let mut edit = NoteLengthEdit::new(id, 1.0);
        model.note_mut(id).unwrap().set_length(2.5);

        edit.undo(&mut model).unwrap();
        assert_eq!(model.note(id).unwrap().length(), 1.0);
        edit.redo(&mut model).unwrap();
        assert_eq!(model.note(id).unwrap().length(), 2.5);
    }

    #[test]
    fn test_select_edit_uses_complement() {
        let (mut model, id) = model_with_note();
        model.note_mut(id).unwrap().set_selected(true);
        let mut edit = NoteSelectEdit::new(id, true);

        edit.undo(&mut model).unwrap();
        assert!(!model.note(id).unwrap().is_selected());
        edit.redo(&mut model).unwrap();
        assert!(model.note(id).unwrap().is_selected());
        assert_eq!(edit.description(), "Select Note");
    }

    #[test]
    fn test_missing_note_errors() {
        let (mut model, id) = model_with_note();
        model.remove_note(id);

        let mut offset = NoteOffsetEdit::new(id, 0);
        assert_eq!(offset.undo(&mut model), Err(EditError::NoteNotFound(id)));
        assert_eq!(offset.redo(&mut model), Err(EditError::NothingToRedo));

        let mut create = NoteCreateEdit::new(BeatRef::new(0, 0, 1), id);
        assert_eq!(create.undo(&mut model), Err(EditError::NoteNotFound(id)));
    }

    #[test]
    fn test_compound_undoes_in_reverse() {
        let (mut model, id) = model_with_note();
        let mut compound = CompoundEdit::new(vec![
            Box::new(NoteOffsetEdit::new(id, 10)),
            Box::new(NoteOffsetEdit::new(id, 20)),
        ]);
        model.note_mut(id).unwrap().set_offset(20);
        model.note_mut(id).unwrap().set_offset(30);

        compound.undo(&mut model).unwrap();
        assert_eq!(model.note(id).unwrap().offset(), 10);

        compound.redo(&mut model).unwrap();
        assert_eq!(model.note(id).unwrap().offset(), 30);
        assert_eq!(compound.description(), "2 Edits");
        assert_eq!(compound.notes(), vec![id]);
    }
}
