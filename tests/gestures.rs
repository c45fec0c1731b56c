//! Gesture integration tests
//!
//! Drives the drag, resize, rectangle-select and pencil helpers against a
//! real model and grid geometry.

use pianoroll_core::gesture::{
    GridGeometry, MIN_NOTE_LENGTH, NoteDragManager, NoteGeometry, NoteResizeManager,
    RectangleSelectManager, ResizeMode, ScaleSettings, toggle_note_at,
};
use pianoroll_core::model::{BeatRef, NoteId, TimelineModel};
use pianoroll_core::undo::EditHistory;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn setup() -> (TimelineModel, GridGeometry) {
    // 8 keys x 2 measures x 4 beats, 96 x 24 px cells
    (
        TimelineModel::new(8, 2, 4),
        GridGeometry::new(ScaleSettings::default()),
    )
}

#[test]
fn test_drag_moves_note_as_one_step() {
    let (mut model, geometry) = setup();
    let mut history = EditHistory::new();
    let id = model.beat_mut(BeatRef::new(2, 0, 1)).generate_note(10, 1.0);
    history.absorb(&mut model);

    let mut drag = NoteDragManager::new();
    drag.touch(id);
    drag.start(110, 50);
    drag.move_to(110 + 96, 50 + 24);
    let moved = drag.stop(&mut model, &geometry);

    assert_eq!(moved.len(), 1);
    assert!(!model.contains_note(id));
    let note = model.note(moved[0]).unwrap();
    assert_eq!(note.beat(), BeatRef::new(3, 0, 2));
    assert_eq!(note.offset(), 10);
    assert_eq!(note.length(), 1.0);

    assert_eq!(history.absorb(&mut model), 1);
    history.undo(&mut model).unwrap();
    assert!(model.contains_note(id));
    assert!(!model.contains_note(moved[0]));
    assert_eq!(model.note_count(), 1);
}

#[test]
fn test_drag_to_nowhere_leaves_note() {
    let (mut model, geometry) = setup();
    let id = model.beat_mut(BeatRef::new(0, 0, 0)).generate_note(0, 1.0);
    model.take_undoable_edits();

    let mut drag = NoteDragManager::new();
    drag.touch(id);
    drag.start(10, 10);
    drag.move_to(5000, 10);
    assert!(drag.stop(&mut model, &geometry).is_empty());

    let note = model.note(id).unwrap();
    assert_eq!(note.beat(), BeatRef::new(0, 0, 0));
    assert_eq!(note.offset(), 0);
    assert!(model.take_undoable_edits().is_empty());
    assert!(!drag.has_focus());
}

#[test]
fn test_resize_floor_and_move_noop() {
    let (mut model, _) = setup();
    let long = model.beat_mut(BeatRef::new(0, 0, 0)).generate_note(0, 1.0);
    let short = model.beat_mut(BeatRef::new(1, 0, 0)).generate_note(20, 0.5);

    let mut resize = NoteResizeManager::new();
    resize.touch(long);
    resize.start(&mut model, ResizeMode::Resize, 100);
    resize.resize(&mut model, -200, 96);
    resize.stop(&mut model);
    assert_eq!(model.note(long).unwrap().length(), MIN_NOTE_LENGTH);

    resize.touch(short);
    resize.start(&mut model, ResizeMode::Move, 100);
    resize.resize(&mut model, 196, 96);
    resize.stop(&mut model);
    let note = model.note(short).unwrap();
    assert_eq!(note.offset(), 20);
    assert_eq!(note.length(), 0.5);
}

#[test]
fn test_resize_gesture_undoes_in_one_step() {
    let (mut model, _) = setup();
    let mut history = EditHistory::new();
    let id = model.beat_mut(BeatRef::new(0, 0, 0)).generate_note(0, 1.0);
    history.absorb(&mut model);

    let mut resize = NoteResizeManager::new();
    resize.touch(id);
    resize.start(&mut model, ResizeMode::Resize, 0);
    for x in [24, 48, 96, 144] {
        resize.resize(&mut model, x, 96);
    }
    resize.stop(&mut model);
    assert_eq!(model.note(id).unwrap().length(), 2.5);

    assert_eq!(history.absorb(&mut model), 1);
    history.undo(&mut model).unwrap();
    assert_eq!(model.note(id).unwrap().length(), 1.0);
}

fn random_notes(model: &mut TimelineModel, rng: &mut StdRng, count: usize) -> Vec<NoteId> {
    (0..count)
        .map(|_| {
            let beat = BeatRef::new(rng.gen_range(0..8), rng.gen_range(0..2), rng.gen_range(0..4));
            let offset = rng.gen_range(0..96);
            let length = rng.gen_range(1..8) as f32 * 0.25;
            model.beat_mut(beat).generate_note(offset, length)
        })
        .collect()
}

#[test]
fn test_rect_select_final_state_is_path_independent() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..20 {
        let (mut model, geometry) = setup();
        random_notes(&mut model, &mut rng, 30);

        let base = (rng.gen_range(0..768), rng.gen_range(0..192));
        let end = (rng.gen_range(0..768), rng.gen_range(0..192));

        let mut select = RectangleSelectManager::new();
        select.start(base.0, base.1);
        for _ in 0..rng.gen_range(0..10) {
            let x = rng.gen_range(-50..900);
            let y = rng.gen_range(-50..300);
            select.move_to(&mut model, &geometry, x, y);
        }
        select.move_to(&mut model, &geometry, end.0, end.1);

        let mut expected = geometry.notes_in(&model, &select.area_rect());
        let mut selected = model.selected_notes();
        expected.sort();
        selected.sort();
        assert_eq!(selected, expected);
        select.stop();
        assert!(select.tracked().is_empty());
    }
}

#[test]
fn test_pencil_toggle() {
    let (mut model, geometry) = setup();
    let mut history = EditHistory::new();

    // lane 1 is at y 0..24, beat 1 of measure 0 spans x 96..192
    let id = toggle_note_at(&mut model, &geometry, 98, 5, 1.0).unwrap();
    let note = model.note(id).unwrap();
    assert_eq!(note.beat(), BeatRef::new(0, 0, 1));
    assert_eq!(note.offset(), 0);

    assert_eq!(toggle_note_at(&mut model, &geometry, 120, 5, 1.0), None);
    assert_eq!(model.note_count(), 0);

    assert_eq!(history.absorb(&mut model), 2);
    history.undo(&mut model).unwrap();
    assert!(model.contains_note(id));
}
