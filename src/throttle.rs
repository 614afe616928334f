//! Refresh throttle
//!
//! Recomputation runs on every Nth tick. Invalidation makes the next tick
//! recompute and restarts the count from there.

use crate::config::{MAX_REFRESH_INTERVAL, MIN_REFRESH_INTERVAL};

#[derive(Debug, Clone)]
pub struct RefreshThrottle {
    interval: u32,
    ticks: u32,
    dirty: bool,
}

impl RefreshThrottle {
    /// A new throttle is dirty, so the first tick recomputes
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.clamp(MIN_REFRESH_INTERVAL, MAX_REFRESH_INTERVAL),
            ticks: 0,
            dirty: true,
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Change the interval without losing a pending invalidation
    pub fn set_interval(&mut self, interval: u32) {
        self.interval = interval.clamp(MIN_REFRESH_INTERVAL, MAX_REFRESH_INTERVAL);
        if self.ticks >= self.interval {
            self.ticks = self.interval - 1;
        }
    }

    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Advance one tick. Returns true when this tick should recompute.
    pub fn tick(&mut self) -> bool {
        if self.dirty {
            self.dirty = false;
            self.ticks = 0;
            return true;
        }
        self.ticks += 1;
        if self.ticks >= self.interval {
            self.ticks = 0;
            return true;
        }
        false
    }
}

impl Default for RefreshThrottle {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_REFRESH_INTERVAL)
    }
}
