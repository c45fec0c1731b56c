// Measure - ordered container of beats

use super::beat::Beat;
use super::note::Note;

/// A fixed-size group of beats inside a key lane
#[derive(Debug, Clone, PartialEq)]
pub struct Measure {
    index: usize,
    beats: Vec<Beat>,
}

impl Measure {
    pub(crate) fn new(index: usize, beat_count: usize) -> Self {
        Self {
            index,
            beats: (0..beat_count).map(Beat::new).collect(),
        }
    }

    /// Index inside the owning key
    pub fn index(&self) -> usize {
        self.index
    }

    /// Beat at position `i`
    ///
    /// # Panics
    /// Panics if `i >= beat_count()`.
    pub fn beat(&self, i: usize) -> &Beat {
        &self.beats[i]
    }

    pub fn beat_count(&self) -> usize {
        self.beats.len()
    }

    pub fn beats(&self) -> &[Beat] {
        &self.beats
    }

    /// Every note of every beat, beat by beat
    pub fn notes(&self) -> impl Iterator<Item = &Note> + '_ {
        self.beats.iter().flat_map(|b| b.notes().iter())
    }

    pub(crate) fn beat_mut(&mut self, i: usize) -> &mut Beat {
        &mut self.beats[i]
    }

    pub(crate) fn get_beat_mut(&mut self, i: usize) -> Option<&mut Beat> {
        self.beats.get_mut(i)
    }

    /// Append one beat, returning its index
    pub(crate) fn push_beat(&mut self) -> usize {
        let index = self.beats.len();
        self.beats.push(Beat::new(index));
        index
    }

    /// Drop the last beat together with its notes
    pub(crate) fn pop_beat(&mut self) -> Option<Beat> {
        self.beats.pop()
    }
}
