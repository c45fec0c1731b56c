// Model events - one tagged union per hierarchy level
//
// A change raised by a note travels up as
// ModelEvent::Key -> KeyEvent::Measure -> MeasureEvent::Beat -> BeatEvent::Note -> NoteEvent
// so a single listener on the model can see which leaf event triggered it.

use super::note::{BeatRef, MeasureRef, Note, NoteId};

/// Leaf-level event raised by a note
#[derive(Debug, Clone, PartialEq)]
pub enum NoteEvent {
    /// The note was detached from its beat. Carries the note as it was and the
    /// position it occupied in the beat's list.
    Removed { snapshot: Note, position: usize },
    OffsetChanged { old: i32, new: i32 },
    LengthChanged { old: f32, new: f32 },
    SelectionChanged { old: bool, new: bool },
    TriggerChanged { old: bool, new: bool },
    /// Audition request (no state change)
    Played,
}

/// Event raised by a beat
#[derive(Debug, Clone, PartialEq)]
pub enum BeatEvent {
    /// A note was generated in, or restored into, this beat
    NoteCreated { note: NoteId },
    /// Propagated note event
    Note { note: NoteId, event: NoteEvent },
}

/// Event raised by a measure
#[derive(Debug, Clone, PartialEq)]
pub enum MeasureEvent {
    BeatCreated { beat: usize },
    BeatRemoved { beat: usize },
    /// Propagated beat event
    Beat { beat: usize, event: BeatEvent },
}

/// Event raised by a key lane
#[derive(Debug, Clone, PartialEq)]
pub enum KeyEvent {
    MeasureCreated { measure: usize },
    MeasureRemoved { measure: usize },
    /// Propagated measure event
    Measure { measure: usize, event: MeasureEvent },
}

/// Event raised by the timeline model, as seen by every listener
#[derive(Debug, Clone, PartialEq)]
pub enum ModelEvent {
    KeyCreated { key: usize },
    KeyRemoved { key: usize },
    /// Propagated key event
    Key { key: usize, event: KeyEvent },
}

impl ModelEvent {
    /// Wrap a note event raised at `beat`
    pub(crate) fn from_note(beat: BeatRef, note: NoteId, event: NoteEvent) -> Self {
        Self::from_beat(beat, BeatEvent::Note { note, event })
    }

    /// Wrap a beat event raised at `beat`
    pub(crate) fn from_beat(beat: BeatRef, event: BeatEvent) -> Self {
        Self::from_measure(
            beat.measure_ref(),
            MeasureEvent::Beat {
                beat: beat.beat,
                event,
            },
        )
    }

    /// Wrap a measure event raised at `measure`
    pub(crate) fn from_measure(measure: MeasureRef, event: MeasureEvent) -> Self {
        Self::from_key(
            measure.key,
            KeyEvent::Measure {
                measure: measure.measure,
                event,
            },
        )
    }

    /// Wrap a key event raised by key lane `key`
    pub(crate) fn from_key(key: usize, event: KeyEvent) -> Self {
        ModelEvent::Key { key, event }
    }

    /// Key lane the event originated in, if any
    pub fn key(&self) -> Option<usize> {
        match self {
            ModelEvent::Key { key, .. } => Some(*key),
            _ => None,
        }
    }

    pub fn key_event(&self) -> Option<&KeyEvent> {
        match self {
            ModelEvent::Key { event, .. } => Some(event),
            _ => None,
        }
    }

    pub fn measure_event(&self) -> Option<&MeasureEvent> {
        match self.key_event()? {
            KeyEvent::Measure { event, .. } => Some(event),
            _ => None,
        }
    }

    pub fn beat_event(&self) -> Option<&BeatEvent> {
        match self.measure_event()? {
            MeasureEvent::Beat { event, .. } => Some(event),
            _ => None,
        }
    }

    /// Innermost note event together with the note that raised it
    pub fn note_event(&self) -> Option<(NoteId, &NoteEvent)> {
        match self.beat_event()? {
            BeatEvent::Note { note, event } => Some((*note, event)),
            _ => None,
        }
    }

    /// Measure the event originated in, if it came from a measure or deeper
    pub fn measure_ref(&self) -> Option<MeasureRef> {
        match self {
            ModelEvent::Key {
                key,
                event: KeyEvent::Measure { measure, .. },
            } => Some(MeasureRef::new(*key, *measure)),
            _ => None,
        }
    }

    /// Beat the event originated in, if it came from a beat or deeper
    pub fn beat_ref(&self) -> Option<BeatRef> {
        let measure = self.measure_ref()?;
        match self.measure_event()? {
            MeasureEvent::Beat { beat, .. } => Some(measure.beat(*beat)),
            _ => None,
        }
    }

    /// Note concerned by the event, including note creation
    pub fn note(&self) -> Option<NoteId> {
        match self.beat_event()? {
            BeatEvent::NoteCreated { note } => Some(*note),
            BeatEvent::Note { note, .. } => Some(*note),
        }
    }

    /// True for grid-shape changes (key/measure/beat creation or removal)
    pub fn is_structural(&self) -> bool {
        match self {
            ModelEvent::KeyCreated { .. } | ModelEvent::KeyRemoved { .. } => true,
            ModelEvent::Key { event, .. } => match event {
                KeyEvent::MeasureCreated { .. } | KeyEvent::MeasureRemoved { .. } => true,
                KeyEvent::Measure { event, .. } => matches!(
                    event,
                    MeasureEvent::BeatCreated { .. } | MeasureEvent::BeatRemoved { .. }
                ),
            },
        }
    }
}

/// Part of the hierarchy a listener is interested in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventScope {
    /// Everything
    Model,
    Key(usize),
    Measure(MeasureRef),
    Beat(BeatRef),
    Note(NoteId),
}

impl EventScope {
    /// Whether `event` originated inside this scope
    pub fn matches(&self, event: &ModelEvent) -> bool {
        match self {
            EventScope::Model => true,
            EventScope::Key(key) => event.key() == Some(*key),
            EventScope::Measure(measure) => event.measure_ref() == Some(*measure),
            EventScope::Beat(beat) => event.beat_ref() == Some(*beat),
            EventScope::Note(note) => event.note() == Some(*note),
        }
    }
}
