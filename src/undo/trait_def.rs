// UndoableEdit trait definition

use crate::model::{BeatRef, NoteId, TimelineModel};

/// Result type for edit operations
pub type EditResult<T> = Result<T, EditError>;

/// Errors that can occur while undoing or redoing an edit
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("Note {0} is not in the model")]
    NoteNotFound(NoteId),

    #[error("Note {0} is already in the model")]
    NoteAlreadyLive(NoteId),

    #[error("Beat {0:?} does not exist")]
    BeatOutOfRange(BeatRef),
}

/// A recorded model change that can be reverted and re-applied
///
/// Edits are produced by the model's undo translator, never by hand. Undo and
/// redo re-apply the change through the model with edit recording suppressed,
/// so applying an edit never records a new one.
///
/// # Thread Safety
/// Edits must be Send so a history can be handed to another thread.
pub trait UndoableEdit: Send + std::fmt::Debug {
    /// Revert the change
    fn undo(&mut self, model: &mut TimelineModel) -> EditResult<()>;

    /// Re-apply the change after an undo
    fn redo(&mut self, model: &mut TimelineModel) -> EditResult<()>;

    /// Human-readable description (e.g. "Undo: Move Note")
    fn description(&self) -> String;

    /// Notes this edit touches
    fn notes(&self) -> Vec<NoteId>;
}
