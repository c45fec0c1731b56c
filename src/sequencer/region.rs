// Regions - loop ranges on the time axis
//
// Each region carries a Monitor counting how many times playback has looped
// through it. The playback cursor asks the RegionManager for a loop jump every
// time the bar position changes.

use crate::gesture::Rect;
use serde::{Deserialize, Serialize};

/// Stable handle of a region inside its manager
pub type RegionId = u64;

/// Handle returned when registering a region listener
pub type RegionListenerId = u64;

/// Smallest length an edge drag may shrink a region from
const MIN_DRAG_LENGTH: i32 = 10;

/// Loop pass counter of a region
///
/// The monitor mirrors the loop count of its region. It is registered while
/// the region is part of a manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Monitor {
    passes: u32,
    loop_count: u32,
    registered: bool,
}

impl Monitor {
    /// Completed loop passes since the last reset
    pub fn passes(&self) -> u32 {
        self.passes
    }

    pub fn loop_count(&self) -> u32 {
        self.loop_count
    }

    /// Whether the region is part of a manager
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Whether playback should jump back to the region start once more
    pub fn can_more_loop(&self) -> bool {
        self.registered && self.passes < self.loop_count
    }

    /// Count one completed pass
    pub fn add_loop(&mut self) {
        self.passes += 1;
    }

    pub fn reset(&mut self) {
        self.passes = 0;
    }
}

/// A loop range in pixel units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    start_offset: i32,
    end_offset: i32,
    loop_count: u32,
    #[serde(skip)]
    monitor: Monitor,
}

impl Region {
    /// Region from `start_offset` to `end_offset`, looped `loop_count` times
    ///
    /// A negative start is clamped to 0.
    pub fn new(start_offset: i32, end_offset: i32, loop_count: u32) -> Self {
        Self {
            start_offset: start_offset.max(0),
            end_offset,
            loop_count,
            monitor: Monitor {
                loop_count,
                ..Monitor::default()
            },
        }
    }

    pub fn start_offset(&self) -> i32 {
        self.start_offset
    }

    pub fn end_offset(&self) -> i32 {
        self.end_offset
    }

    pub fn loop_count(&self) -> u32 {
        self.loop_count
    }

    pub fn length(&self) -> i32 {
        self.end_offset - self.start_offset
    }

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    /// Whether playback should jump back to the start once more
    pub fn can_more_loop(&self) -> bool {
        self.monitor.can_more_loop()
    }

    /// Whether `x` lies inside the region
    pub fn contains(&self, x: i32) -> bool {
        x >= self.start_offset && x < self.end_offset
    }

    fn overlaps(&self, other: &Region) -> bool {
        let a = Rect::new(self.start_offset, 0, self.length(), MIN_DRAG_LENGTH);
        let b = Rect::new(other.start_offset, 0, other.length(), MIN_DRAG_LENGTH);
        a.intersects(&b)
    }
}

/// Region change notification
///
/// `old` is `None` when the region was added, `new` is `None` when it was
/// removed; a property change carries both snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionUpdateEvent {
    pub id: RegionId,
    pub old: Option<Region>,
    pub new: Option<Region>,
}

/// Part of a region grabbed by a ruler drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionEdge {
    Start,
    End,
    Body,
}

/// Ordered list of regions
#[derive(Default)]
pub struct RegionManager {
    regions: Vec<(RegionId, Region)>,
    next_id: RegionId,
    listeners: Vec<(RegionListenerId, Box<dyn FnMut(&RegionUpdateEvent)>)>,
    next_listener_id: RegionListenerId,
}

impl RegionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener<F>(&mut self, callback: F) -> RegionListenerId
    where
        F: FnMut(&RegionUpdateEvent) + 'static,
    {
        self.next_listener_id += 1;
        self.listeners.push((self.next_listener_id, Box::new(callback)));
        self.next_listener_id
    }

    pub fn remove_listener(&mut self, id: RegionListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        before != self.listeners.len()
    }

    fn fire(&mut self, id: RegionId, old: Option<Region>, new: Option<Region>) {
        let event = RegionUpdateEvent { id, old, new };
        log::debug!("region update: {:?}", event);
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    /// Append a region; its monitor is registered and reset
    pub fn add_region(&mut self, mut region: Region) -> RegionId {
        self.next_id += 1;
        let id = self.next_id;
        region.monitor.registered = true;
        region.monitor.loop_count = region.loop_count;
        region.monitor.reset();
        self.regions.push((id, region));
        self.fire(id, None, Some(region));
        id
    }

    /// Remove a region, returning it with its monitor unregistered and reset
    pub fn remove_region(&mut self, id: RegionId) -> Option<Region> {
        let i = self.position(id)?;
        Some(self.remove_region_at(i))
    }

    /// # Panics
    /// Panics if `i >= region_count()`.
    pub fn remove_region_at(&mut self, i: usize) -> Region {
        let (id, mut region) = self.regions.remove(i);
        region.monitor.registered = false;
        region.monitor.reset();
        self.fire(id, Some(region), None);
        region
    }

    fn position(&self, id: RegionId) -> Option<usize> {
        self.regions.iter().position(|(r, _)| *r == id)
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|(r, _)| *r == id).map(|(_, region)| region)
    }

    /// # Panics
    /// Panics if `i >= region_count()`.
    pub fn region_at(&self, i: usize) -> &Region {
        &self.regions[i].1
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn region_ids(&self) -> Vec<RegionId> {
        self.regions.iter().map(|(id, _)| *id).collect()
    }

    /// Regions with their ids, in insertion order
    pub fn regions(&self) -> impl Iterator<Item = (RegionId, &Region)> + '_ {
        self.regions.iter().map(|(id, region)| (*id, region))
    }

    /// First region containing `x`
    pub fn region_containing(&self, x: i32) -> Option<RegionId> {
        self.regions
            .iter()
            .find(|(_, r)| r.contains(x))
            .map(|(id, _)| *id)
    }

    fn update(&mut self, id: RegionId, f: impl FnOnce(&mut Region)) -> bool {
        let Some(i) = self.position(id) else {
            return false;
        };
        let old = self.regions[i].1;
        f(&mut self.regions[i].1);
        let new = self.regions[i].1;
        self.fire(id, Some(old), Some(new));
        true
    }

    /// Set the start offset, clamped to 0
    pub fn set_start_offset(&mut self, id: RegionId, start_offset: i32) -> bool {
        self.update(id, |r| r.start_offset = start_offset.max(0))
    }

    pub fn set_end_offset(&mut self, id: RegionId, end_offset: i32) -> bool {
        self.update(id, |r| r.end_offset = end_offset)
    }

    pub fn set_loop_count(&mut self, id: RegionId, loop_count: u32) -> bool {
        self.update(id, |r| {
            r.loop_count = loop_count;
            r.monitor.loop_count = loop_count;
        })
    }

    /// Monitor of a region, optionally reset first
    pub fn monitor(&mut self, id: RegionId, reset: bool) -> Option<&Monitor> {
        let i = self.position(id)?;
        let monitor = &mut self.regions[i].1.monitor;
        if reset {
            monitor.reset();
        }
        Some(monitor)
    }

    /// Mutable monitor of a region, optionally reset first
    ///
    /// Hosts that step playback themselves count passes through this.
    pub fn monitor_mut(&mut self, id: RegionId, reset: bool) -> Option<&mut Monitor> {
        let i = self.position(id)?;
        let monitor = &mut self.regions[i].1.monitor;
        if reset {
            monitor.reset();
        }
        Some(monitor)
    }

    /// Reset every monitor, as done when playback starts
    pub fn reset_monitors(&mut self) {
        for (_, region) in self.regions.iter_mut() {
            region.monitor.reset();
        }
    }

    /// Loop jump for a bar arriving at `position`
    ///
    /// The first region that can still loop and ends at `position` counts one
    /// more pass; its start offset is returned.
    pub fn take_loop_at(&mut self, position: i32) -> Option<i32> {
        let (_, region) = self
            .regions
            .iter_mut()
            .find(|(_, r)| r.can_more_loop() && r.end_offset == position)?;
        region.monitor.add_loop();
        Some(region.start_offset)
    }

    /// Move one edge, or the whole region, by `dx` pixels
    ///
    /// Returns `false` and leaves the region untouched when the move is not
    /// allowed or the result would overlap another region.
    pub fn drag_region(&mut self, id: RegionId, edge: RegionEdge, dx: i32) -> bool {
        let Some(current) = self.region(id).copied() else {
            return false;
        };
        let mut moved = current;
        match edge {
            RegionEdge::Body => {
                if dx <= 0 && current.start_offset == 0 {
                    return false;
                }
                moved.start_offset = (current.start_offset + dx).max(0);
                moved.end_offset = current.end_offset + dx;
            }
            RegionEdge::Start => {
                if current.length() <= MIN_DRAG_LENGTH && dx >= 0 {
                    return false;
                }
                moved.start_offset = (current.start_offset + dx).max(0);
            }
            RegionEdge::End => {
                if current.length() <= MIN_DRAG_LENGTH && dx <= 0 {
                    return false;
                }
                moved.end_offset = current.end_offset + dx;
            }
        }

        let overlap = self
            .regions
            .iter()
            .any(|(other, r)| *other != id && r.overlaps(&moved));
        if overlap {
            log::debug!("region {} drag rejected: overlaps another region", id);
            return false;
        }
        if moved == current {
            return false;
        }
        self.update(id, |r| *r = moved)
    }
}

impl std::fmt::Debug for RegionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionManager")
            .field("regions", &self.regions)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
