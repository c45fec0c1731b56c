// Editor configuration - grid shape, scale, tempo and export defaults in RON

use crate::gesture::{GridGeometry, ScaleSettings};
use crate::midi::TIMEBASE_DEFAULT;
use crate::model::TimelineModel;
use crate::sequencer::{BarStyle, PlaybackCursor, UpdateRate};
use crate::undo::{DEFAULT_MAX_HISTORY, EditHistory};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON error: {0}")]
    Ron(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Defaults applied to exported MIDI events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub channel: u8,
    pub velocity: u8,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            channel: 0,
            velocity: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub key_count: usize,
    pub measure_count: usize,
    pub beat_count: usize,
    pub scale: ScaleSettings,
    /// Ticks per beat
    pub timebase: u32,
    pub bpm: f32,
    pub max_undo_history: usize,
    pub export: ExportSettings,
    pub bar_style: BarStyle,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            key_count: 128,
            measure_count: 4,
            beat_count: 4,
            scale: ScaleSettings::default(),
            timebase: TIMEBASE_DEFAULT,
            bpm: 120.0,
            max_undo_history: DEFAULT_MAX_HISTORY,
            export: ExportSettings::default(),
            bar_style: BarStyle::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_ron_str(data: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(data).map_err(|e| ConfigError::Ron(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Ron(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        let config = Self::from_ron_str(&data)?;
        log::debug!("loaded editor config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        fs::write(path, self.to_ron_string()?)?;
        log::debug!("saved editor config to {}", path.display());
        Ok(())
    }

    /// Reject values the builders would panic on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timebase == 0 {
            return Err(ConfigError::Invalid("timebase must be > 0".into()));
        }
        if self.bpm.is_nan() || self.bpm <= 0.0 {
            return Err(ConfigError::Invalid(format!("bpm {} must be > 0", self.bpm)));
        }
        if self.scale.beat_width == 0 {
            return Err(ConfigError::Invalid("beat width must be > 0".into()));
        }
        if self.export.channel > 15 {
            return Err(ConfigError::Invalid(format!(
                "export channel {} out of range 0..=15",
                self.export.channel
            )));
        }
        if self.export.velocity > 127 {
            return Err(ConfigError::Invalid(format!(
                "export velocity {} out of range 0..=127",
                self.export.velocity
            )));
        }
        Ok(())
    }

    /// Model with this grid shape; its undo queue keeps `max_undo_history` edits
    pub fn build_model(&self) -> TimelineModel {
        let mut model = TimelineModel::new(self.key_count, self.measure_count, self.beat_count);
        model.set_max_pending_undoable_edits(self.max_undo_history);
        model
    }

    pub fn build_geometry(&self) -> GridGeometry {
        GridGeometry::new(self.scale)
    }

    pub fn build_history(&self) -> EditHistory {
        EditHistory::with_capacity(self.max_undo_history)
    }

    /// # Panics
    /// Panics if the timebase or tempo is not positive.
    pub fn update_rate(&self) -> UpdateRate {
        UpdateRate::from_bpm(self.timebase as f32, self.bpm)
    }

    /// Playback cursor with this tempo and bar style applied
    pub fn build_playback_cursor(&self) -> PlaybackCursor {
        let mut cursor = PlaybackCursor::new();
        cursor.set_bar_style(self.bar_style);
        cursor.set_update_rate(self.update_rate(), self.scale.beat_width);
        cursor
    }
}
