// Note - leaf entity of the timeline
// A note sits inside a beat at a pixel offset and spans a fractional number of beats

use serde::{Deserialize, Serialize};

/// Session-unique handle of a note
///
/// Ids are handed out by the owning [`TimelineModel`](super::TimelineModel) and are
/// never reused, so a handle held by a gesture manager or an undo edit stays valid
/// across remove/restore cycles of the same note.
pub type NoteId = u64;

/// Location of a measure inside the grid (key lane, measure index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeasureRef {
    pub key: usize,
    pub measure: usize,
}

impl MeasureRef {
    pub fn new(key: usize, measure: usize) -> Self {
        Self { key, measure }
    }

    /// Location of one of this measure's beats
    pub fn beat(self, beat: usize) -> BeatRef {
        BeatRef {
            key: self.key,
            measure: self.measure,
            beat,
        }
    }
}

/// Location of a beat inside the grid (key lane, measure index, beat index)
///
/// This is the non-owning back-reference a note keeps to its beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BeatRef {
    pub key: usize,
    pub measure: usize,
    pub beat: usize,
}

impl BeatRef {
    pub fn new(key: usize, measure: usize, beat: usize) -> Self {
        Self { key, measure, beat }
    }

    /// The measure containing this beat
    pub fn measure_ref(self) -> MeasureRef {
        MeasureRef {
            key: self.key,
            measure: self.measure,
        }
    }
}

/// A placed note
///
/// Fields are read-only from the outside; every mutation goes through
/// [`NoteMut`](super::NoteMut) so the change is propagated up the hierarchy.
/// A serialized note keeps its id and beat, ready for
/// [`BeatMut::restore_note`](super::BeatMut::restore_note).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub(crate) id: NoteId,
    pub(crate) beat: BeatRef,
    pub(crate) offset: i32,
    pub(crate) length: f32,
    pub(crate) selected: bool,
    pub(crate) trigger: bool,
}

impl Note {
    pub(crate) fn new(id: NoteId, beat: BeatRef, offset: i32, length: f32) -> Self {
        assert!(length > 0.0, "Note length must be > 0");

        Self {
            id,
            beat,
            offset,
            length,
            selected: false,
            trigger: true,
        }
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    /// The beat currently owning this note
    pub fn beat(&self) -> BeatRef {
        self.beat
    }

    /// Offset inside the beat, in pixel-equivalent units
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Length in beats
    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Articulation flag
    pub fn is_trigger(&self) -> bool {
        self.trigger
    }

    /// Length multiplied by `scale` and rounded (e.g. pixels for a beat width,
    /// ticks for a timebase)
    pub fn scaled_length(&self, scale: u32) -> i64 {
        (scale as f32 * self.length).round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_defaults() {
        let note = Note::new(7, BeatRef::new(0, 1, 2), 12, 0.5);

        assert_eq!(note.id(), 7);
        assert_eq!(note.beat(), BeatRef::new(0, 1, 2));
        assert_eq!(note.offset(), 12);
        assert!(!note.is_selected());
        assert!(note.is_trigger());
    }

    #[test]
    fn test_scaled_length() {
        let note = Note::new(1, BeatRef::new(0, 0, 0), 0, 0.25);
        assert_eq!(note.scaled_length(480), 120);
        assert_eq!(note.scaled_length(96), 24);

        let note = Note::new(2, BeatRef::new(0, 0, 0), 0, 1.0 / 3.0);
        assert_eq!(note.scaled_length(100), 33);
    }

    #[test]
    fn test_refs() {
        let m = MeasureRef::new(3, 4);
        let b = m.beat(2);
        assert_eq!(b, BeatRef::new(3, 4, 2));
        assert_eq!(b.measure_ref(), m);
    }

    #[test]
    #[should_panic(expected = "Note length must be > 0")]
    fn test_zero_length() {
        Note::new(1, BeatRef::new(0, 0, 0), 0, 0.0);
    }

    #[test]
    fn test_note_ron_round_trip() {
        let mut note = Note::new(9, BeatRef::new(1, 2, 3), 40, 0.75);
        note.selected = true;

        let data = ron::to_string(&note).unwrap();
        let back: Note = ron::from_str(&data).unwrap();
        assert_eq!(back, note);
        assert_eq!(back.id(), 9);
        assert!(back.is_selected());
    }
}
