// Undo/redo support
//
// The model feeds every event it raises to the UndoTranslator, which turns
// note-level changes into UndoableEdit records. Records are replayed through
// the model with recording suppressed, so undo never records a new edit.
// EditHistory keeps bounded undo/redo stacks for hosts that want them.

pub mod edits;
pub mod manager;
pub mod trait_def;
pub mod translator;

pub use edits::CompoundEdit;
pub use manager::{DEFAULT_MAX_HISTORY, EditHistory};
pub use trait_def::{EditError, EditResult, UndoableEdit};
pub use translator::{EditListenerId, UndoTranslator};
