// Clipboard - copy, cut and paste of notes as location-independent phrases

use crate::model::{BeatRef, Note, NoteId, TimelineModel};
use serde::{Deserialize, Serialize};

/// A note detached from any model, addressed by grid indices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VirtualNote {
    /// 1-based key lane index
    pub key_index: usize,
    pub measure_index: usize,
    pub beat_index: usize,
    pub offset: i32,
    pub length: f32,
}

impl VirtualNote {
    pub fn from_note(model: &TimelineModel, note: &Note) -> Self {
        let beat = note.beat();
        Self {
            key_index: model.key(beat.key).index(),
            measure_index: beat.measure,
            beat_index: beat.beat,
            offset: note.offset(),
            length: note.length(),
        }
    }

    /// Position in pixels on a grid of `beat_count` beats of `beat_width` pixels
    fn global_x(&self, beat_count: usize, beat_width: u32) -> i64 {
        let beat_width = beat_width as i64;
        self.measure_index as i64 * beat_count as i64 * beat_width
            + self.beat_index as i64 * beat_width
            + self.offset as i64
    }
}

/// A named group of virtual notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phrase {
    pub name: String,
    pub notes: Vec<VirtualNote>,
}

impl Default for Phrase {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Phrase {
    pub fn new(notes: Vec<VirtualNote>) -> Self {
        Self {
            name: "Untitled".to_string(),
            notes,
        }
    }

    /// Capture the given live notes
    pub fn from_notes(model: &TimelineModel, notes: &[NoteId]) -> Self {
        Self::new(
            notes
                .iter()
                .filter_map(|id| model.note(*id))
                .map(|n| VirtualNote::from_note(model, n))
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Generate the phrase into `model` as one compound edit
    ///
    /// Notes keep their distance to the leftmost note, which lands at
    /// `insert_offset` pixels. Notes whose key or destination measure is
    /// outside the grid are skipped. Returns `false` for an empty phrase.
    pub fn expand(
        &self,
        model: &mut TimelineModel,
        insert_offset: i32,
        beat_count: usize,
        beat_width: u32,
    ) -> bool {
        let Some(base) = self
            .notes
            .iter()
            .map(|n| n.global_x(beat_count, beat_width))
            .min()
        else {
            return false;
        };
        if beat_width == 0 {
            log::debug!("phrase expand with zero beat width ignored");
            return false;
        }

        model.begin_compound_undoable_edit();
        for note in &self.notes {
            let x = insert_offset as i64 + note.global_x(beat_count, beat_width) - base;
            match Self::locate(model, note.key_index, x, beat_width) {
                Some((beat, offset)) => {
                    model.beat_mut(beat).generate_note(offset, note.length);
                }
                None => log::debug!("phrase note at x={} falls outside the grid", x),
            }
        }
        model.end_compound_undoable_edit();
        true
    }

    /// Beat and intra-beat offset at pixel `x` in lane `key_index`
    fn locate(model: &TimelineModel, key_index: usize, x: i64, beat_width: u32) -> Option<(BeatRef, i32)> {
        if x < 0 || key_index == 0 || key_index > model.key_count() {
            return None;
        }
        let key = key_index - 1;
        let beat_count = model.key(key).measures().first()?.beat_count() as i64;
        let beat_width = beat_width as i64;
        let measure_width = beat_count * beat_width;
        if measure_width == 0 {
            return None;
        }
        let beat = BeatRef::new(
            key,
            (x / measure_width) as usize,
            ((x % measure_width) / beat_width) as usize,
        );
        model.try_beat(beat)?;
        Some((beat, (x % beat_width) as i32))
    }
}

/// Single-slot clipboard of a phrase
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    phrase: Option<Phrase>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the selected notes
    pub fn copy(&mut self, model: &TimelineModel) {
        self.phrase = Some(Phrase::from_notes(model, &model.selected_notes()));
    }

    /// Copy the selected notes, then remove them as one compound edit
    pub fn cut(&mut self, model: &mut TimelineModel) {
        let selected = model.selected_notes();
        self.phrase = Some(Phrase::from_notes(model, &selected));
        model.begin_compound_undoable_edit();
        for id in selected {
            if let Some(note) = model.note_mut(id) {
                note.remove_from_beat();
            }
        }
        model.end_compound_undoable_edit();
    }

    /// Put a phrase on the clipboard
    pub fn copy_phrase(&mut self, phrase: &Phrase) {
        self.phrase = Some(phrase.clone());
    }

    /// Expand the clipboard at `offset` and empty it
    ///
    /// Selection is cleared inside the same undo step. Does nothing when the
    /// clipboard is empty.
    pub fn paste(&mut self, model: &mut TimelineModel, offset: i32, beat_width: u32) -> bool {
        let Some(phrase) = self.phrase.take() else {
            log::debug!("paste with empty clipboard ignored");
            return false;
        };
        let beat_count = model.beat_count();
        model.begin_compound_undoable_edit();
        let expanded = phrase.expand(model, offset, beat_count, beat_width);
        model.clear_all_selection();
        model.end_compound_undoable_edit();
        expanded
    }

    pub fn phrase(&self) -> Option<&Phrase> {
        self.phrase.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.phrase.is_none()
    }
}
