// UpdateRate - tempo to playback timer conversion

use serde::{Deserialize, Serialize};
use std::fmt;

/// Timer parameters derived from a tempo and a timebase
///
/// The playback bar advances one pixel per timer step, so the timer delay
/// depends on how many pixels a beat spans.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpdateRate {
    timebase: f32,
    bpm: f32,
    /// Seconds per tick
    tick: f32,
    sec_per_beat: f32,
}

impl UpdateRate {
    /// Compute the rate for `bpm` at `timebase` ticks per beat
    ///
    /// # Panics
    /// Panics if either argument is not positive.
    pub fn from_bpm(timebase: f32, bpm: f32) -> Self {
        assert!(timebase > 0.0, "Timebase must be > 0");
        assert!(bpm > 0.0, "BPM must be > 0");

        let tick = 60.0 / bpm / timebase;
        Self {
            timebase,
            bpm,
            tick,
            sec_per_beat: tick * timebase,
        }
    }

    pub fn timebase(&self) -> f32 {
        self.timebase
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    /// Duration of one tick in seconds
    pub fn tick(&self) -> f32 {
        self.tick
    }

    /// Duration of one beat in seconds
    pub fn sec_per_beat(&self) -> f32 {
        self.sec_per_beat
    }

    /// Milliseconds between one-pixel steps for a beat `beat_width` pixels wide
    pub fn timer_delay_ms(&self, beat_width: u32) -> u32 {
        if beat_width == 0 {
            return 0;
        }
        (self.sec_per_beat * 1000.0 / beat_width as f32).round() as u32
    }

    /// Pixels travelled per second at the timer delay
    pub fn distance_per_sec(&self, beat_width: u32) -> u32 {
        1000u32
            .checked_div(self.timer_delay_ms(beat_width))
            .unwrap_or(0)
    }
}

impl Default for UpdateRate {
    fn default() -> Self {
        Self::from_bpm(480.0, 120.0)
    }
}

impl fmt::Display for UpdateRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "timebase={} bpm={} tick={:.6}s beat={:.3}s",
            self.timebase, self.bpm, self.tick, self.sec_per_beat
        )
    }
}
