// MIDI module - event export and the General MIDI drum map

pub mod drum_map;
pub mod event;
pub mod export;

pub use drum_map::{drum_name, drum_note};
pub use event::{MidiMessage, TimedMidiEvent};
pub use export::{ExportError, NoteLocation, TIMEBASE_DEFAULT, export_midi_events, note_locations};
