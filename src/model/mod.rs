// Model module - the key/measure/beat/note hierarchy and its events

pub mod beat;
pub mod event;
pub mod key;
pub mod measure;
pub mod note;
pub mod timeline;

pub use beat::Beat;
pub use event::{BeatEvent, EventScope, KeyEvent, MeasureEvent, ModelEvent, NoteEvent};
pub use key::Key;
pub use measure::Measure;
pub use note::{BeatRef, MeasureRef, Note, NoteId};
pub use timeline::{BeatMut, KeyMut, ListenerId, MeasureMut, NoteMut, TimelineModel};
