// Export - timeline notes to tick-stamped MIDI note events

use super::event::{MidiMessage, TimedMidiEvent};
use crate::model::{NoteId, TimelineModel};

/// Ticks per beat used when the host has no preference
pub const TIMEBASE_DEFAULT: u32 = 480;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExportError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// A note with its absolute position in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteLocation {
    pub note: NoteId,
    pub global_tick: i64,
}

/// Absolute tick of every live note, in traversal order
///
/// The pixel offset inside a beat is scaled by `timebase / beat_width` and
/// added to the tick of the owning beat.
pub fn note_locations(model: &TimelineModel, timebase: u32, beat_width: u32) -> Vec<NoteLocation> {
    let factor = timebase as f32 / beat_width as f32;
    let timebase = timebase as i64;
    model
        .notes()
        .map(|note| {
            let beat = note.beat();
            let beats_per_measure = model.measure(beat.measure_ref()).beat_count() as i64;
            let beat_tick = beat.measure as i64 * beats_per_measure * timebase + beat.beat as i64 * timebase;
            NoteLocation {
                note: note.id(),
                global_tick: (note.offset() as f32 * factor).round() as i64 + beat_tick,
            }
        })
        .collect()
}

/// Export every note as a note-on/note-off pair
///
/// Pairs are ordered by note start (stable for equal starts). Note-ons carry
/// `velocity`, note-offs velocity 0. The pitch is the key height of the note's
/// lane. Notes starting before tick 0 are clamped to 0.
///
/// # Errors
/// Returns [`ExportError::InvalidParameter`] when the channel, velocity,
/// timebase, beat width or any pitch is out of range. Nothing is produced in
/// that case.
pub fn export_midi_events(
    model: &TimelineModel,
    channel: u8,
    timebase: u32,
    velocity: u8,
    beat_width: u32,
) -> Result<Vec<TimedMidiEvent>, ExportError> {
    if channel > 15 {
        return Err(ExportError::InvalidParameter(format!(
            "channel {} out of range 0..=15",
            channel
        )));
    }
    if velocity > 127 {
        return Err(ExportError::InvalidParameter(format!(
            "velocity {} out of range 0..=127",
            velocity
        )));
    }
    if timebase == 0 {
        return Err(ExportError::InvalidParameter("timebase must be > 0".into()));
    }
    if beat_width == 0 {
        return Err(ExportError::InvalidParameter("beat width must be > 0".into()));
    }

    let mut locations = note_locations(model, timebase, beat_width);
    locations.sort_by_key(|l| l.global_tick);

    let mut events = Vec::with_capacity(locations.len() * 2);
    for location in locations {
        let Some(note) = model.note(location.note) else {
            continue;
        };
        let height = model.key_height(model.key(note.beat().key).index());
        let pitch = u8::try_from(height)
            .ok()
            .filter(|p| *p <= 127)
            .ok_or_else(|| ExportError::InvalidParameter(format!("pitch {} out of range 0..=127", height)))?;

        let start = if location.global_tick < 0 {
            log::warn!(
                "note {} starts at tick {}, clamped to 0",
                location.note,
                location.global_tick
            );
            0
        } else {
            location.global_tick
        };
        let end = (location.global_tick + note.scaled_length(timebase)).max(start);

        events.push(TimedMidiEvent {
            tick: start as u64,
            message: MidiMessage::NoteOn {
                channel,
                note: pitch,
                velocity,
            },
        });
        events.push(TimedMidiEvent {
            tick: end as u64,
            message: MidiMessage::NoteOff {
                channel,
                note: pitch,
                velocity: 0,
            },
        });
    }

    log::debug!("exported {} MIDI events", events.len());
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BeatRef;

    #[test]
    fn test_single_note() {
        let mut model = TimelineModel::new(128, 4, 4);
        model.beat_mut(BeatRef::new(67, 0, 0)).generate_note(0, 1.0);

        let events = export_midi_events(&model, 0, 480, 100, 96).unwrap();
        assert_eq!(
            events,
            vec![
                TimedMidiEvent {
                    tick: 0,
                    message: MidiMessage::NoteOn {
                        channel: 0,
                        note: 60,
                        velocity: 100
                    }
                },
                TimedMidiEvent {
                    tick: 480,
                    message: MidiMessage::NoteOff {
                        channel: 0,
                        note: 60,
                        velocity: 0
                    }
                },
            ]
        );
    }

    #[test]
    fn test_note_locations() {
        let mut model = TimelineModel::new(2, 2, 4);
        let id = model.beat_mut(BeatRef::new(1, 1, 2)).generate_note(48, 0.5);

        let locations = note_locations(&model, 480, 96);
        assert_eq!(
            locations,
            vec![NoteLocation {
                note: id,
                global_tick: 4 * 480 + 2 * 480 + 240
            }]
        );
    }

    #[test]
    fn test_sorted_by_start() {
        let mut model = TimelineModel::new(3, 2, 4);
        model.beat_mut(BeatRef::new(0, 1, 0)).generate_note(0, 1.0);
        model.beat_mut(BeatRef::new(1, 0, 3)).generate_note(0, 1.0);
        model.beat_mut(BeatRef::new(2, 0, 0)).generate_note(0, 0.25);

        let events = export_midi_events(&model, 3, 480, 90, 96).unwrap();
        let starts: Vec<u64> = events
            .iter()
            .filter(|e| e.message.is_note_on())
            .map(|e| e.tick)
            .collect();
        assert_eq!(starts, vec![0, 1440, 1920]);
        assert_eq!(events[1].tick, 120);
        assert!(events.iter().all(|e| e.message.channel() == 3));
    }

    #[test]
    fn test_equal_starts_keep_model_order() {
        let mut model = TimelineModel::new(3, 1, 1);
        model.beat_mut(BeatRef::new(2, 0, 0)).generate_note(0, 1.0);
        model.beat_mut(BeatRef::new(0, 0, 0)).generate_note(0, 1.0);

        let events = export_midi_events(&model, 0, 480, 100, 96).unwrap();
        // key 0 comes first in traversal order
        assert_eq!(events[0].message.note(), 2);
        assert_eq!(events[2].message.note(), 0);
    }

    #[test]
    fn test_negative_offset_clamped() {
        let mut model = TimelineModel::new(1, 1, 1);
        let id = model.beat_mut(BeatRef::new(0, 0, 0)).generate_note(0, 1.0);
        model.note_mut(id).unwrap().set_offset(-20);

        let events = export_midi_events(&model, 0, 480, 100, 96).unwrap();
        assert_eq!(events[0].tick, 0);
        assert_eq!(events[1].tick, 380);
    }

    #[test]
    fn test_invalid_parameters() {
        let model = TimelineModel::new(1, 1, 1);
        assert!(matches!(
            export_midi_events(&model, 16, 480, 100, 96),
            Err(ExportError::InvalidParameter(_))
        ));
        assert!(export_midi_events(&model, 0, 480, 128, 96).is_err());
        assert!(export_midi_events(&model, 0, 0, 100, 96).is_err());
        assert!(export_midi_events(&model, 0, 480, 100, 0).is_err());
        assert_eq!(export_midi_events(&model, 15, 480, 127, 96), Ok(vec![]));
    }

    #[test]
    fn test_pitch_out_of_range() {
        let mut model = TimelineModel::new(200, 1, 1);
        model.beat_mut(BeatRef::new(0, 0, 0)).generate_note(0, 1.0);
        assert!(export_midi_events(&model, 0, 480, 100, 96).is_err());
    }
}
