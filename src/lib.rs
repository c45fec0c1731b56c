// Piano Roll Core - note model, undo translation, gestures, playback and export

pub mod clipboard;
pub mod config;
pub mod gesture;
pub mod midi;
pub mod model;
pub mod sequencer;
pub mod undo;

// Re-export commonly used types for convenience
pub use clipboard::{Clipboard, Phrase, VirtualNote};
pub use config::{ConfigError, EditorConfig};
pub use gesture::{
    GridGeometry, NoteDragManager, NoteGeometry, NoteResizeManager, Rect, RectangleSelectManager,
    ResizeMode, ScaleSettings,
};
pub use midi::{ExportError, MidiMessage, TimedMidiEvent, export_midi_events};
pub use model::{BeatRef, EventScope, MeasureRef, ModelEvent, Note, NoteId, TimelineModel};
pub use sequencer::{BarStyle, PlaybackCursor, PlaybackEvent, Region, RegionManager, UpdateRate};
pub use undo::{EditError, EditHistory, EditResult, UndoableEdit};
