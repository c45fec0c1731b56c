// Key - one pitch lane of the grid, an ordered container of measures

use super::measure::Measure;
use super::note::Note;

/// A pitch lane
///
/// `index` is 1-based: the key created first has index 1. Pitch numbering is
/// inverted relative to storage order, see [`TimelineModel::key_height`](super::TimelineModel::key_height).
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    index: usize,
    beat_count: usize,
    measures: Vec<Measure>,
}

impl Key {
    pub(crate) fn new(index: usize, measure_count: usize, beat_count: usize) -> Self {
        Self {
            index,
            beat_count,
            measures: (0..measure_count)
                .map(|i| Measure::new(i, beat_count))
                .collect(),
        }
    }

    /// 1-based lane index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Measure at position `i`
    ///
    /// # Panics
    /// Panics if `i >= measure_count()`.
    pub fn measure(&self, i: usize) -> &Measure {
        &self.measures[i]
    }

    pub fn measure_count(&self) -> usize {
        self.measures.len()
    }

    pub fn measures(&self) -> &[Measure] {
        &self.measures
    }

    /// Beat count given to measures appended to this key
    pub fn default_beat_count(&self) -> usize {
        self.beat_count
    }

    /// Every note of the lane, measure by measure
    pub fn notes(&self) -> impl Iterator<Item = &Note> + '_ {
        self.measures.iter().flat_map(|m| m.notes())
    }

    pub(crate) fn measure_mut(&mut self, i: usize) -> &mut Measure {
        &mut self.measures[i]
    }

    pub(crate) fn get_measure_mut(&mut self, i: usize) -> Option<&mut Measure> {
        self.measures.get_mut(i)
    }

    pub(crate) fn set_default_beat_count(&mut self, beat_count: usize) {
        self.beat_count = beat_count;
    }

    /// Append one measure with the lane's default beat count
    pub(crate) fn push_measure(&mut self) -> usize {
        let index = self.measures.len();
        self.measures.push(Measure::new(index, self.beat_count));
        index
    }

    pub(crate) fn pop_measure(&mut self) -> Option<Measure> {
        self.measures.pop()
    }
}
