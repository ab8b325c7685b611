use std::time::{Duration, Instant};

/// Tracks unsaved changes and when they are due to be written
#[derive(Debug, Clone)]
pub struct Autosave {
    interval: Duration,
    last_save: Instant,
    dirty: bool,
}

impl Autosave {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Autosave {
            interval,
            last_save: now,
            dirty: false,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record a save attempt. A failed save stays dirty and is retried one
    /// interval later.
    pub fn saved(&mut self, ok: bool, now: Instant) {
        self.last_save = now;
        if ok {
            self.dirty = false;
        }
    }

    /// When the event loop has to wake up for the next save, if anything
    /// is pending
    pub fn deadline(&self) -> Option<Instant> {
        self.dirty.then(|| self.last_save + self.interval)
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline().is_some_and(|deadline| now >= deadline)
    }
}
