use chrono::Utc;
use std::cell::Cell;
use std::rc::Rc;

/// Source of unix-seconds timestamps for report entities.
pub trait Clock {
    fn now(&self) -> u64;
}

/// Wall clock, rounded to the nearest second.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        (millis + 500) / 1000
    }
}

/// Settable clock. Clones share the same time, so a test can keep one handle
/// and move the other into a builder.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, now: u64) {
        self.now.set(now);
    }

    pub fn advance(&self, secs: u64) {
        self.now.set(self.now.get() + secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.get()
    }
}
