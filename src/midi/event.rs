// MIDI message types produced by export

use serde::{Deserialize, Serialize};

/// Channel voice message carried by an exported event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MidiMessage {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8, velocity: u8 },
}

/// MIDI message at an absolute tick position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedMidiEvent {
    pub tick: u64,
    pub message: MidiMessage,
}

impl MidiMessage {
    pub fn channel(&self) -> u8 {
        match self {
            MidiMessage::NoteOn { channel, .. } | MidiMessage::NoteOff { channel, .. } => *channel,
        }
    }

    pub fn note(&self) -> u8 {
        match self {
            MidiMessage::NoteOn { note, .. } | MidiMessage::NoteOff { note, .. } => *note,
        }
    }

    pub fn velocity(&self) -> u8 {
        match self {
            MidiMessage::NoteOn { velocity, .. } | MidiMessage::NoteOff { velocity, .. } => {
                *velocity
            }
        }
    }

    pub fn is_note_on(&self) -> bool {
        matches!(self, MidiMessage::NoteOn { .. })
    }

    /// Raw three-byte encoding
    pub fn to_bytes(&self) -> [u8; 3] {
        match *self {
            MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            } => [0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F],
            MidiMessage::NoteOff {
                channel,
                note,
                velocity,
            } => [0x80 | (channel & 0x0F), note & 0x7F, velocity & 0x7F],
        }
    }

    /// Parse a raw note message
    ///
    /// Other message types and truncated input yield `None`. A note-on with
    /// velocity 0 is read back as is.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let &[status, note, velocity, ..] = bytes else {
            return None;
        };
        let channel = status & 0x0F;

        match status & 0xF0 {
            0x90 => Some(MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            }),
            0x80 => Some(MidiMessage::NoteOff {
                channel,
                note,
                velocity,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_on_bytes() {
        let message = MidiMessage::NoteOn {
            channel: 9,
            note: 60,
            velocity: 100,
        };
        assert_eq!(message.to_bytes(), [0x99, 60, 100]);
        assert_eq!(MidiMessage::from_bytes(&[0x99, 60, 100]), Some(message));
    }

    #[test]
    fn test_note_off_bytes() {
        let message = MidiMessage::NoteOff {
            channel: 0,
            note: 64,
            velocity: 0,
        };
        assert_eq!(message.to_bytes(), [0x80, 64, 0]);
        assert_eq!(message.channel(), 0);
        assert_eq!(message.note(), 64);
        assert!(!message.is_note_on());
    }

    #[test]
    fn test_invalid_messages() {
        assert_eq!(MidiMessage::from_bytes(&[]), None);
        assert_eq!(MidiMessage::from_bytes(&[0x90, 60]), None);
        assert_eq!(MidiMessage::from_bytes(&[0xB0, 7, 127]), None);
    }
}
