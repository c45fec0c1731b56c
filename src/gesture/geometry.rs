// Geometry - pixel mapping between the grid and the rendering surface
//
// Gesture managers never compute note positions themselves; they go through
// the NoteGeometry trait so a rendering layer can supply its own mapping.
// GridGeometry is the plain uniform-grid mapping.

use crate::model::{MeasureRef, Note, NoteId, TimelineModel};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalized rectangle spanning two corners given in any order
    pub fn from_corners(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let (min_x, max_x) = (x0.min(x1), x0.max(x1));
        let (min_y, max_y) = (y0.min(y1), y0.max(y1));
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Overlap test; an empty rectangle intersects nothing
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Whether the point lies inside (left/top edges inclusive)
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Current zoom and snapping parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleSettings {
    /// Pixels per beat
    pub beat_width: u32,
    /// Pixels per key lane
    pub beat_height: u32,
    /// Subdivisions per beat used for snapping
    pub beat_split_count: u32,
    /// Pixel distance under which an offset snaps to a subdivision
    pub snap_limit: u32,
}

impl Default for ScaleSettings {
    fn default() -> Self {
        Self {
            beat_width: 96,
            beat_height: 24,
            beat_split_count: 4,
            snap_limit: 3,
        }
    }
}

impl ScaleSettings {
    /// Snap `offset` to the first beat subdivision within the snap limit
    pub fn snap_offset(&self, offset: i32) -> i32 {
        if self.beat_split_count == 0 {
            return offset;
        }
        let section = (self.beat_width / self.beat_split_count) as i32;
        (0..self.beat_split_count as i32)
            .map(|i| section * i)
            .find(|&line| near_eq(line, offset, self.snap_limit as i32))
            .unwrap_or(offset)
    }
}

fn near_eq(a: i32, b: i32, limit: i32) -> bool {
    (a.abs() - b.abs()).abs() < limit
}

/// Mapping between the note grid and pixel space
///
/// The required methods describe the layout; the provided ones derive hit
/// testing from them.
pub trait NoteGeometry {
    fn scale(&self) -> ScaleSettings;

    /// Pixel rectangle of a note
    fn note_rect(&self, model: &TimelineModel, note: &Note) -> Rect;

    /// Measure containing the point, or `None` outside the grid
    fn measure_at(&self, model: &TimelineModel, x: i32, y: i32) -> Option<MeasureRef>;

    /// Beat index inside the measure containing `x`
    fn relative_beat_index(&self, model: &TimelineModel, x: i32) -> usize;

    /// Left edge of measure `i`
    fn measure_index_to_x_offset(&self, model: &TimelineModel, i: usize) -> i32;

    /// Total grid width in pixels
    fn total_width(&self, model: &TimelineModel) -> i32 {
        let measures = model.keys().first().map(|k| k.measure_count()).unwrap_or(0);
        self.measure_index_to_x_offset(model, measures)
    }

    /// Notes whose rectangle covers the point, in traversal order
    fn notes_at(&self, model: &TimelineModel, x: i32, y: i32) -> Vec<NoteId> {
        model
            .notes()
            .filter(|n| self.note_rect(model, n).contains(x, y))
            .map(|n| n.id())
            .collect()
    }

    /// Notes spanning the vertical line at `x`, in traversal order
    fn notes_at_x(&self, model: &TimelineModel, x: i32) -> Vec<NoteId> {
        model
            .notes()
            .filter(|n| {
                let rect = self.note_rect(model, n);
                x >= rect.x && x < rect.right()
            })
            .map(|n| n.id())
            .collect()
    }

    /// Notes whose rectangle intersects `area`
    fn notes_in(&self, model: &TimelineModel, area: &Rect) -> Vec<NoteId> {
        model
            .notes()
            .filter(|n| area.intersects(&self.note_rect(model, n)))
            .map(|n| n.id())
            .collect()
    }
}

/// Uniform grid: key lanes stacked top to bottom in storage order, measures
/// laid out left to right using the beat count of the first measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridGeometry {
    pub scale: ScaleSettings,
}

impl GridGeometry {
    pub fn new(scale: ScaleSettings) -> Self {
        Self { scale }
    }

    fn beats_per_measure(model: &TimelineModel) -> usize {
        model
            .keys()
            .first()
            .and_then(|k| k.measures().first())
            .map(|m| m.beat_count())
            .unwrap_or(0)
    }

    fn measure_width(&self, model: &TimelineModel) -> i32 {
        Self::beats_per_measure(model) as i32 * self.scale.beat_width as i32
    }

    /// Storage index of the key lane at `y`
    pub fn key_at(&self, model: &TimelineModel, y: i32) -> Option<usize> {
        if y < 0 || self.scale.beat_height == 0 {
            return None;
        }
        let i = (y / self.scale.beat_height as i32) as usize;
        (i < model.key_count()).then_some(i)
    }

    /// Index of the measure column at `x`
    pub fn measure_index_at(&self, model: &TimelineModel, x: i32) -> Option<usize> {
        let width = self.measure_width(model);
        if x < 0 || width == 0 {
            return None;
        }
        let i = (x / width) as usize;
        let count = model.keys().first().map(|k| k.measure_count()).unwrap_or(0);
        (i < count).then_some(i)
    }

    /// Grid height in pixels
    pub fn total_height(&self, model: &TimelineModel) -> i32 {
        model.key_count() as i32 * self.scale.beat_height as i32
    }
}

impl NoteGeometry for GridGeometry {
    fn scale(&self) -> ScaleSettings {
        self.scale
    }

    fn note_rect(&self, model: &TimelineModel, note: &Note) -> Rect {
        let beat = note.beat();
        let beat_width = self.scale.beat_width as i32;
        let x = self.measure_index_to_x_offset(model, beat.measure)
            + beat_width * beat.beat as i32
            + note.offset();
        let key_index = model.key(beat.key).index() as i32;
        let y = self.scale.beat_height as i32 * (key_index - 1);
        Rect::new(
            x,
            y,
            note.scaled_length(self.scale.beat_width) as i32,
            self.scale.beat_height as i32,
        )
    }

    fn measure_at(&self, model: &TimelineModel, x: i32, y: i32) -> Option<MeasureRef> {
        let measure = self.measure_index_at(model, x)?;
        let key = self.key_at(model, y)?;
        (measure < model.key(key).measure_count()).then(|| MeasureRef::new(key, measure))
    }

    fn relative_beat_index(&self, model: &TimelineModel, x: i32) -> usize {
        let width = self.measure_width(model);
        if width == 0 || self.scale.beat_width == 0 {
            return 0;
        }
        (x.rem_euclid(width) / self.scale.beat_width as i32) as usize
    }

    fn measure_index_to_x_offset(&self, model: &TimelineModel, i: usize) -> i32 {
        self.measure_width(model) * i as i32
    }
}
