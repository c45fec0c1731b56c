// EditHistory - Manages undo/redo stacks of recorded edits

use super::trait_def::{EditError, EditResult, UndoableEdit};
use crate::model::TimelineModel;
use std::collections::VecDeque;

/// Default maximum number of edits to keep in history
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Undo/redo stacks fed from the model's edit queue
///
/// The model records edits on its own; the history only collects them with
/// [`absorb`](Self::absorb) and replays them. When new edits arrive the redo
/// stack is cleared, and the oldest edit is dropped once the history exceeds
/// its capacity.
///
/// Structural changes (key/measure/beat count) are not recorded, so a host
/// that resizes the grid should [`clear`](Self::clear) the history.
#[derive(Debug)]
pub struct EditHistory {
    /// Edits that can be undone (most recent at the back)
    undo_stack: VecDeque<Box<dyn UndoableEdit>>,

    /// Edits that can be redone (most recent at the back)
    redo_stack: VecDeque<Box<dyn UndoableEdit>>,

    max_history: usize,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_HISTORY)
    }

    pub fn with_capacity(max_history: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_history),
            redo_stack: VecDeque::with_capacity(max_history),
            max_history,
        }
    }

    /// Push an edit that has already been applied
    pub fn push(&mut self, edit: Box<dyn UndoableEdit>) {
        self.undo_stack.push_back(edit);
        self.redo_stack.clear();

        if self.undo_stack.len() > self.max_history {
            self.undo_stack.pop_front();
        }
    }

    /// Move every edit the model produced since the last call onto the undo
    /// stack, returning how many were taken
    pub fn absorb(&mut self, model: &mut TimelineModel) -> usize {
        let edits = model.take_undoable_edits();
        let count = edits.len();
        for edit in edits {
            self.push(edit);
        }
        count
    }

    /// Undo the most recent edit, returning its description
    ///
    /// # Errors
    /// Returns an error if there is nothing to undo or the edit no longer
    /// applies to the model. A failed edit is dropped.
    pub fn undo(&mut self, model: &mut TimelineModel) -> EditResult<String> {
        let mut edit = self.undo_stack.pop_back().ok_or(EditError::NothingToUndo)?;
        let description = edit.description();

        edit.undo(model)?;
        log::debug!("undo: {}", description);

        self.redo_stack.push_back(edit);
        Ok(description)
    }

    /// Redo the most recently undone edit, returning its description
    pub fn redo(&mut self, model: &mut TimelineModel) -> EditResult<String> {
        let mut edit = self.redo_stack.pop_back().ok_or(EditError::NothingToRedo)?;
        let description = edit.description();

        edit.redo(model)?;
        log::debug!("redo: {}", description);

        self.undo_stack.push_back(edit);
        Ok(description)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Description of the edit that would be undone
    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.back().map(|e| e.description())
    }

    /// Description of the edit that would be redone
    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.back().map(|e| e.description())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BeatRef;

    #[test]
    fn test_undo_redo_create() {
        let mut model = TimelineModel::new(1, 1, 4);
        let mut history = EditHistory::new();

        let id = model.beat_mut(BeatRef::new(0, 0, 0)).generate_note(0, 1.0);
        assert_eq!(history.absorb(&mut model), 1);
        assert!(history.can_undo());
        assert_eq!(history.undo_description(), Some("Create Note".to_string()));

        assert_eq!(history.undo(&mut model).unwrap(), "Create Note");
        assert!(model.note(id).is_none());
        assert!(history.can_redo());

        history.redo(&mut model).unwrap();
        assert!(model.note(id).is_some());
        assert_eq!(history.absorb(&mut model), 0);
    }

    #[test]
    fn test_empty_history() {
        let mut model = TimelineModel::new(1, 1, 1);
        let mut history = EditHistory::default();

        assert_eq!(history.undo(&mut model), Err(EditError::NothingToUndo));
        assert_eq!(history.redo(&mut model), Err(EditError::NothingToRedo));
        assert_eq!(history.undo_description(), None);
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut model = TimelineModel::new(1, 1, 4);
        let mut history = EditHistory::new();

        let id = model.beat_mut(BeatRef::new(0, 0, 0)).generate_note(0, 1.0);
        model.note_mut(id).unwrap().set_offset(12);
        history.absorb(&mut model);
        history.undo(&mut model).unwrap();
        assert_eq!(history.redo_count(), 1);

        model.note_mut(id).unwrap().set_length(2.0);
        history.absorb(&mut model);
        assert_eq!(history.redo_count(), 0);
        assert_eq!(history.undo_count(), 2);
    }

    #[test]
    fn test_history_limit() {
        let mut model = TimelineModel::new(1, 1, 1);
        let mut history = EditHistory::with_capacity(3);
        let id = model.beat_mut(BeatRef::new(0, 0, 0)).generate_note(0, 1.0);

        for offset in 1..=5 {
            model.note_mut(id).unwrap().set_offset(offset);
        }
        history.absorb(&mut model);

        assert_eq!(history.undo_count(), 3);
        assert_eq!(history.max_history(), 3);
        for _ in 0..3 {
            history.undo(&mut model).unwrap();
        }
        assert_eq!(model.note(id).unwrap().offset(), 2);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_clear() {
        let mut model = TimelineModel::new(1, 1, 1);
        let mut history = EditHistory::new();
        model.beat_mut(BeatRef::new(0, 0, 0)).generate_note(0, 1.0);
        history.absorb(&mut model);

        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
