// RectangleSelectManager - rubber-band selection

use super::geometry::{NoteGeometry, Rect};
use crate::model::{NoteId, TimelineModel};

/// Selects the notes under a dragged rectangle
///
/// Notes are tracked while the rectangle covers them: leaving the rectangle
/// deselects a tracked note, entering it selects an untracked one. Notes
/// selected before the gesture stay selected unless the rectangle passes
/// over them and then leaves again.
#[derive(Debug, Default)]
pub struct RectangleSelectManager {
    base_x: i32,
    base_y: i32,
    current_x: i32,
    current_y: i32,
    tracked: Vec<NoteId>,
}

impl RectangleSelectManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, x: i32, y: i32) {
        self.base_x = x;
        self.base_y = y;
        self.current_x = x;
        self.current_y = y;
    }

    /// Move the free corner and update the selection
    pub fn move_to<G: NoteGeometry>(&mut self, model: &mut TimelineModel, geometry: &G, x: i32, y: i32) {
        self.current_x = x;
        self.current_y = y;
        let area = self.area_rect();

        let left: Vec<NoteId> = self
            .tracked
            .iter()
            .copied()
            .filter(|id| match model.note(*id) {
                Some(note) => !geometry.note_rect(model, note).intersects(&area),
                None => true,
            })
            .collect();
        for id in &left {
            if let Some(mut note) = model.note_mut(*id) {
                note.set_selected(false);
            }
        }
        self.tracked.retain(|id| !left.contains(id));

        for id in geometry.notes_in(model, &area) {
            if self.tracked.contains(&id) {
                continue;
            }
            self.tracked.push(id);
            if let Some(mut note) = model.note_mut(id) {
                note.set_selected(true);
            }
        }
    }

    /// End the gesture, keeping the selection
    pub fn stop(&mut self) {
        self.tracked.clear();
        self.base_x = 0;
        self.base_y = 0;
        self.current_x = 0;
        self.current_y = 0;
    }

    /// Normalized selection rectangle
    pub fn area_rect(&self) -> Rect {
        Rect::from_corners(self.base_x, self.base_y, self.current_x, self.current_y)
    }

    /// Notes currently covered by the rectangle
    pub fn tracked(&self) -> &[NoteId] {
        &self.tracked
    }
}
