//! Model editing and undo/redo integration tests
//!
//! Every user edit recorded by the translator must be exactly reversible
//! through the edit history.

use pianoroll_core::model::{BeatRef, EventScope, ModelEvent, TimelineModel};
use pianoroll_core::undo::{EditError, EditHistory};
use std::cell::RefCell;
use std::rc::Rc;

fn snapshot(model: &TimelineModel) -> Vec<(BeatRef, i32, u32, bool)> {
    model
        .notes()
        .map(|n| (n.beat(), n.offset(), (n.length() * 1000.0) as u32, n.is_selected()))
        .collect()
}

#[test]
fn test_create_then_undo_redo() {
    let mut model = TimelineModel::new(4, 2, 4);
    let mut history = EditHistory::new();

    let id = model.beat_mut(BeatRef::new(1, 1, 2)).generate_note(12, 0.5);
    assert_eq!(history.absorb(&mut model), 1);
    assert_eq!(history.undo_description().as_deref(), Some("Create Note"));

    history.undo(&mut model).unwrap();
    assert_eq!(model.note_count(), 0);
    assert!(!model.contains_note(id));

    history.redo(&mut model).unwrap();
    let note = model.note(id).unwrap();
    assert_eq!(note.beat(), BeatRef::new(1, 1, 2));
    assert_eq!(note.offset(), 12);
    assert_eq!(note.length(), 0.5);

    // replay itself records nothing
    assert_eq!(history.absorb(&mut model), 0);
}

#[test]
fn test_remove_undo_restores_position() {
    let mut model = TimelineModel::new(1, 1, 1);
    let beat = BeatRef::new(0, 0, 0);
    let a = model.beat_mut(beat).generate_note(0, 1.0);
    let b = model.beat_mut(beat).generate_note(10, 1.0);
    let c = model.beat_mut(beat).generate_note(20, 1.0);
    let mut history = EditHistory::new();
    history.absorb(&mut model);
    let before = snapshot(&model);

    model.note_mut(b).unwrap().remove_from_beat();
    history.absorb(&mut model);
    assert_eq!(model.beat(beat).note_ids(), vec![a, c]);

    history.undo(&mut model).unwrap();
    assert_eq!(model.beat(beat).note_ids(), vec![a, b, c]);
    assert_eq!(snapshot(&model), before);
}

#[test]
fn test_edit_sequence_is_exact_inverse() {
    let mut model = TimelineModel::new(3, 2, 4);
    let mut history = EditHistory::new();
    let a = model.beat_mut(BeatRef::new(0, 0, 0)).generate_note(0, 1.0);
    let b = model.beat_mut(BeatRef::new(2, 1, 3)).generate_note(40, 0.25);
    history.absorb(&mut model);
    let start = snapshot(&model);

    {
        let mut note = model.note_mut(a).unwrap();
        note.set_offset(30);
        note.set_length(2.0);
        note.set_selected(true);
    }
    model.note_mut(b).unwrap().remove_from_beat();
    let steps = history.absorb(&mut model);
    assert_eq!(steps, 4);
    let end = snapshot(&model);

    for _ in 0..steps {
        history.undo(&mut model).unwrap();
    }
    assert_eq!(snapshot(&model), start);

    for _ in 0..steps {
        history.redo(&mut model).unwrap();
    }
    assert_eq!(snapshot(&model), end);
    assert_eq!(history.redo(&mut model), Err(EditError::NothingToRedo));
}

#[test]
fn test_compound_edit_undoes_as_one_step() {
    let mut model = TimelineModel::new(2, 1, 4);
    let mut history = EditHistory::new();

    model.begin_compound_undoable_edit();
    for beat in 0..4 {
        model.beat_mut(BeatRef::new(0, 0, beat)).generate_note(0, 1.0);
    }
    model.end_compound_undoable_edit();

    assert_eq!(history.absorb(&mut model), 1);
    assert_eq!(history.undo_description().as_deref(), Some("4 Edits"));
    history.undo(&mut model).unwrap();
    assert_eq!(model.note_count(), 0);
}

#[test]
fn test_key_count_extend_and_shrink() {
    let mut model = TimelineModel::new(4, 2, 3);
    let created = Rc::new(RefCell::new(Vec::new()));
    let removed = Rc::new(RefCell::new(Vec::new()));
    {
        let created = created.clone();
        let removed = removed.clone();
        model.add_model_listener(move |event| match event {
            ModelEvent::KeyCreated { key } => created.borrow_mut().push(*key),
            ModelEvent::KeyRemoved { key } => removed.borrow_mut().push(*key),
            _ => {}
        });
    }

    model.extend_key_count(6);
    assert_eq!(model.key_count(), 6);
    assert_eq!(*created.borrow(), vec![4, 5]);
    assert_eq!(model.key(5).index(), 6);
    assert_eq!(model.key(5).measure_count(), 2);
    assert_eq!(model.key(5).measure(1).beat_count(), 3);

    let doomed = model.beat_mut(BeatRef::new(5, 0, 0)).generate_note(0, 1.0);
    model.shrink_key_count(3);
    assert_eq!(model.key_count(), 3);
    assert_eq!(*removed.borrow(), vec![5, 4, 3]);
    assert!(!model.contains_note(doomed));

    // no-op in the wrong direction
    model.extend_key_count(2);
    model.shrink_key_count(10);
    assert_eq!(model.key_count(), 3);
}

#[test]
fn test_note_scoped_listener() {
    let mut model = TimelineModel::new(2, 1, 1);
    let a = model.beat_mut(BeatRef::new(0, 0, 0)).generate_note(0, 1.0);
    let b = model.beat_mut(BeatRef::new(1, 0, 0)).generate_note(0, 1.0);
    let seen = Rc::new(RefCell::new(0));
    {
        let seen = seen.clone();
        model.add_listener(EventScope::Note(a), move |_| *seen.borrow_mut() += 1);
    }

    model.note_mut(b).unwrap().set_offset(5);
    assert_eq!(*seen.borrow(), 0);
    model.note_mut(a).unwrap().set_offset(5);
    assert_eq!(*seen.borrow(), 1);
}

#[test]
fn test_history_is_bounded() {
    let mut model = TimelineModel::new(1, 1, 1);
    let mut history = EditHistory::with_capacity(3);
    for i in 0..5 {
        model.beat_mut(BeatRef::new(0, 0, 0)).generate_note(i, 1.0);
    }
    history.absorb(&mut model);

    assert_eq!(history.undo_count(), 3);
    for _ in 0..3 {
        history.undo(&mut model).unwrap();
    }
    assert_eq!(model.note_count(), 2);
    assert_eq!(history.undo(&mut model), Err(EditError::NothingToUndo));
}

#[test]
fn test_subscriber_without_draining_keeps_queue_bounded() {
    let mut model = TimelineModel::new(1, 1, 1);
    let id = model.beat_mut(BeatRef::new(0, 0, 0)).generate_note(0, 1.0);
    let seen = Rc::new(RefCell::new(0));
    {
        let seen = seen.clone();
        model.add_undoable_edit_listener(move |_| *seen.borrow_mut() += 1);
    }

    for offset in 0..10_000 {
        model.note_mut(id).unwrap().set_offset(offset);
    }

    assert_eq!(*seen.borrow(), 10_000);
    assert_eq!(model.pending_undoable_edit_count(), 100);

    model.set_max_pending_undoable_edits(10);
    assert_eq!(model.take_undoable_edits().len(), 10);
}

#[test]
fn test_create_remove_undo_restores_beat() {
    let mut model = TimelineModel::new(2, 1, 2);
    let beat = BeatRef::new(1, 0, 1);
    let existing = model.beat_mut(beat).generate_note(5, 1.0);
    let mut history = EditHistory::new();
    history.absorb(&mut model);
    let before = model.beat(beat).note_ids();
    let state = snapshot(&model);

    let id = model.beat_mut(beat).generate_note(30, 0.5);
    model.note_mut(id).unwrap().remove_from_beat();
    assert_eq!(history.absorb(&mut model), 2);

    history.undo(&mut model).unwrap();
    assert_eq!(model.beat(beat).note_ids(), vec![existing, id]);
    history.undo(&mut model).unwrap();

    assert_eq!(model.beat(beat).note_ids(), before);
    assert_eq!(snapshot(&model), state);
    assert!(!model.contains_note(id));
}
