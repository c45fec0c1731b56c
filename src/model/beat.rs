// Beat - ordered container of notes

use super::note::{Note, NoteId};

/// A fixed time slot inside a measure holding zero or more notes
///
/// Notes keep their insertion order and may overlap in offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Beat {
    index: usize,
    notes: Vec<Note>,
}

impl Beat {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            notes: Vec::new(),
        }
    }

    /// Index inside the owning measure
    pub fn index(&self) -> usize {
        self.index
    }

    /// Note at position `i`
    ///
    /// # Panics
    /// Panics if `i >= note_count()`.
    pub fn note(&self, i: usize) -> &Note {
        &self.notes[i]
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Ids of the notes, in list order
    pub fn note_ids(&self) -> Vec<NoteId> {
        self.notes.iter().map(|n| n.id).collect()
    }

    pub(crate) fn position_of(&self, id: NoteId) -> Option<usize> {
        self.notes.iter().position(|n| n.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: NoteId) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == id)
    }

    /// Insert at `position`, or append when the position is past the end
    pub(crate) fn insert(&mut self, position: usize, note: Note) -> usize {
        let position = position.min(self.notes.len());
        self.notes.insert(position, note);
        position
    }

    pub(crate) fn push(&mut self, note: Note) -> usize {
        self.notes.push(note);
        self.notes.len() - 1
    }

    /// Detach a note, returning it with the position it occupied
    pub(crate) fn take(&mut self, id: NoteId) -> Option<(usize, Note)> {
        let position = self.position_of(id)?;
        Some((position, self.notes.remove(position)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::note::BeatRef;

    fn note(id: NoteId) -> Note {
        Note::new(id, BeatRef::new(0, 0, 0), id as i32, 1.0)
    }

    #[test]
    fn test_insertion_order() {
        let mut beat = Beat::new(2);
        beat.push(note(3));
        beat.push(note(1));
        beat.push(note(2));

        assert_eq!(beat.index(), 2);
        assert_eq!(beat.note_ids(), vec![3, 1, 2]);
        assert_eq!(beat.note(1).id(), 1);
    }

    #[test]
    fn test_take_and_reinsert() {
        let mut beat = Beat::new(0);
        beat.push(note(1));
        beat.push(note(2));
        beat.push(note(3));

        let (position, taken) = beat.take(2).unwrap();
        assert_eq!(position, 1);
        assert_eq!(beat.note_ids(), vec![1, 3]);

        beat.insert(position, taken);
        assert_eq!(beat.note_ids(), vec![1, 2, 3]);

        assert!(beat.take(42).is_none());
    }

    #[test]
    fn test_insert_past_end_appends() {
        let mut beat = Beat::new(0);
        beat.push(note(1));
        assert_eq!(beat.insert(10, note(2)), 1);
        assert_eq!(beat.note_ids(), vec![1, 2]);
    }

    #[test]
    #[should_panic]
    fn test_note_out_of_bounds() {
        let beat = Beat::new(0);
        beat.note(0);
    }
}
