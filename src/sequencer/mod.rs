// Sequencer module
// Loop regions, tempo/timer conversion and the tick-driven playback bar

pub mod playback;
pub mod region;
pub mod timing;

pub use playback::{BarStyle, PlaybackCursor, PlaybackEvent};
pub use region::{Monitor, Region, RegionEdge, RegionId, RegionManager, RegionUpdateEvent};
pub use timing::UpdateRate;
