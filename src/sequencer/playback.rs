// PlaybackCursor - tick-driven play bar
// Steps the bar one pixel at a time, jumps back at loop regions and reports
// notes entering or leaving the bar

use super::region::RegionManager;
use super::timing::UpdateRate;
use crate::gesture::NoteGeometry;
use crate::model::{NoteId, TimelineModel};
use serde::{Deserialize, Serialize};

/// Shortest timer delay; faster rates advance several pixels per tick
pub const MIN_TIMER_DELAY_MS: u32 = 32;

/// What happens when the bar reaches the end of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BarStyle {
    /// Rewind to 0 and keep playing
    Loop,
    /// Rewind to 0 and stop
    #[default]
    PlayOneShot,
}

/// Output of the playback cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    PositionChanged { old: i32, new: i32 },
    NoteOn(NoteId),
    NoteOff(NoteId),
    Stopped,
}

#[derive(Debug, Clone)]
pub struct PlaybackCursor {
    position: i32,
    bar_step: u32,
    timer_delay_ms: u32,
    update_rate: Option<UpdateRate>,
    style: BarStyle,
    playing: bool,
    /// Notes under the bar after the last step
    sounding: Vec<NoteId>,
}

impl PlaybackCursor {
    pub fn new() -> Self {
        Self {
            position: 0,
            bar_step: 1,
            timer_delay_ms: 0,
            update_rate: None,
            style: BarStyle::default(),
            playing: false,
            sounding: Vec::new(),
        }
    }

    /// Derive the timer delay and step size from a tempo
    ///
    /// Steps are batched until the delay reaches [`MIN_TIMER_DELAY_MS`].
    pub fn set_update_rate(&mut self, rate: UpdateRate, beat_width: u32) {
        let step = rate.timer_delay_ms(beat_width).max(1);
        let mut delay = step;
        self.bar_step = 1;
        while delay < MIN_TIMER_DELAY_MS {
            delay += step;
            self.bar_step += 1;
        }
        self.timer_delay_ms = delay;
        self.update_rate = Some(rate);
        log::debug!("{} -> delay {}ms, {} px per tick", rate, delay, self.bar_step);
    }

    pub fn update_rate(&self) -> Option<UpdateRate> {
        self.update_rate
    }

    /// Interval the host timer should call [`tick`](Self::tick) at
    pub fn timer_delay_ms(&self) -> u32 {
        self.timer_delay_ms
    }

    /// Pixels advanced per tick
    pub fn bar_step(&self) -> u32 {
        self.bar_step
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn bar_style(&self) -> BarStyle {
        self.style
    }

    pub fn set_bar_style(&mut self, style: BarStyle) {
        self.style = style;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Notes currently under the bar
    pub fn sounding(&self) -> &[NoteId] {
        &self.sounding
    }

    /// Start playing; every region monitor is reset
    pub fn play(&mut self, regions: &mut RegionManager) {
        regions.reset_monitors();
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Move the bar to `position`, honoring loop regions
    pub fn seek(&mut self, position: i32, regions: &mut RegionManager) -> PlaybackEvent {
        let old = self.position;
        self.update_position(position, regions);
        PlaybackEvent::PositionChanged {
            old,
            new: self.position,
        }
    }

    pub fn seek_to_begin(&mut self, regions: &mut RegionManager) -> PlaybackEvent {
        self.seek(0, regions)
    }

    pub fn seek_to_end<G: NoteGeometry>(
        &mut self,
        model: &TimelineModel,
        geometry: &G,
        regions: &mut RegionManager,
    ) -> PlaybackEvent {
        self.seek(geometry.total_width(model), regions)
    }

    /// Advance the bar by one timer tick
    ///
    /// Does nothing while stopped.
    pub fn tick<G: NoteGeometry>(
        &mut self,
        model: &TimelineModel,
        geometry: &G,
        regions: &mut RegionManager,
    ) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();
        if !self.playing {
            return events;
        }
        for _ in 0..self.bar_step {
            self.step(model, geometry, regions, &mut events);
        }

        if self.position < geometry.total_width(model) {
            return events;
        }
        events.push(self.seek(0, regions));
        if self.style == BarStyle::PlayOneShot {
            self.playing = false;
            events.push(PlaybackEvent::Stopped);
        }
        events
    }

    fn step<G: NoteGeometry>(
        &mut self,
        model: &TimelineModel,
        geometry: &G,
        regions: &mut RegionManager,
        events: &mut Vec<PlaybackEvent>,
    ) {
        events.push(self.seek(self.position + 1, regions));

        let under_bar = geometry.notes_at_x(model, self.position);
        for id in &under_bar {
            if !self.sounding.contains(id) {
                events.push(PlaybackEvent::NoteOn(*id));
            }
        }
        for id in &self.sounding {
            if !under_bar.contains(id) {
                events.push(PlaybackEvent::NoteOff(*id));
            }
        }
        self.sounding = under_bar;
    }

    fn update_position(&mut self, position: i32, regions: &mut RegionManager) {
        self.position = match regions.take_loop_at(position) {
            Some(start) => {
                log::trace!("loop jump {} -> {}", position, start);
                start
            }
            None => position,
        };
    }
}

impl Default for PlaybackCursor {
    fn default() -> Self {
        Self::new()
    }
}
