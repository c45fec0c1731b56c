// Pencil - click-to-place note entry

use super::geometry::NoteGeometry;
use crate::model::{NoteId, TimelineModel};

/// Distance from a beat start under which a click lands exactly on the beat
const BEAT_START_MARGIN: i32 = 5;

/// Generate a note in the beat under `(x, y)` at `offset`, snapped to the
/// nearest beat subdivision within the snap limit
///
/// Returns `None` when the point is outside the grid.
pub fn place_note_at<G: NoteGeometry>(
    model: &mut TimelineModel,
    geometry: &G,
    x: i32,
    y: i32,
    offset: i32,
    length: f32,
) -> Option<NoteId> {
    let offset = geometry.scale().snap_offset(offset);
    let measure = geometry.measure_at(model, x, y)?;
    let beat = measure.beat(geometry.relative_beat_index(model, x));
    model.try_beat(beat)?;
    Some(model.beat_mut(beat).generate_note(offset, length))
}

/// Remove every note under `(x, y)`, or place a new one when there is none
///
/// Returns the id of the placed note, if any.
pub fn toggle_note_at<G: NoteGeometry>(
    model: &mut TimelineModel,
    geometry: &G,
    x: i32,
    y: i32,
    length: f32,
) -> Option<NoteId> {
    let hits = geometry.notes_at(model, x, y);
    if !hits.is_empty() {
        model.begin_compound_undoable_edit();
        for id in hits {
            if let Some(note) = model.note_mut(id) {
                note.remove_from_beat();
            }
        }
        model.end_compound_undoable_edit();
        return None;
    }

    let measure = geometry.measure_at(model, x, y)?;
    let beat_index = geometry.relative_beat_index(model, x);
    let beat_x = geometry.measure_index_to_x_offset(model, measure.measure)
        + geometry.scale().beat_width as i32 * beat_index as i32;
    let offset = match x - beat_x {
        d if d < BEAT_START_MARGIN => 0,
        d => d,
    };
    place_note_at(model, geometry, x, y, offset, length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::geometry::{GridGeometry, ScaleSettings};
    use crate::model::BeatRef;

    fn setup() -> (TimelineModel, GridGeometry) {
        (TimelineModel::new(2, 2, 4), GridGeometry::new(ScaleSettings::default()))
    }

    #[test]
    fn test_place_snaps_offset() {
        let (mut model, geometry) = setup();
        let id = place_note_at(&mut model, &geometry, 400, 30, 26, 0.5).unwrap();

        let note = model.note(id).unwrap();
        assert_eq!(note.beat(), BeatRef::new(1, 1, 0));
        assert_eq!(note.offset(), 24);
        assert!(place_note_at(&mut model, &geometry, 5000, 0, 0, 0.5).is_none());
    }

    #[test]
    fn test_toggle_places_then_removes() {
        let (mut model, geometry) = setup();

        let id = toggle_note_at(&mut model, &geometry, 96 + 40, 5, 0.25).unwrap();
        let note = model.note(id).unwrap();
        assert_eq!(note.beat(), BeatRef::new(0, 0, 1));
        assert_eq!(note.offset(), 40);

        assert_eq!(toggle_note_at(&mut model, &geometry, 96 + 45, 5, 0.25), None);
        assert_eq!(model.note_count(), 0);
    }

    #[test]
    fn test_toggle_near_beat_start() {
        let (mut model, geometry) = setup();
        let id = toggle_note_at(&mut model, &geometry, 96 * 2 + 4, 5, 1.0).unwrap();
        assert_eq!(model.note(id).unwrap().offset(), 0);
        assert_eq!(model.note(id).unwrap().beat(), BeatRef::new(0, 0, 2));
    }
}
