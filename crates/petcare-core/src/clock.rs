//! Wall-clock abstraction.
//!
//! Cooldowns compare epoch milliseconds and the playtime gate looks at the
//! local date and time. Both come from a [`Clock`] so tests can pin them.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Local, NaiveDateTime, Utc};

pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;

    /// Local calendar date and time of day.
    fn local_now(&self) -> NaiveDateTime;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn local_now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A settable clock. Clones share the same instant, so a test can keep one
/// handle while a session owns another.
///
/// Local time is the UTC reading of the stored instant.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<i64>>,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now: Rc::new(Cell::new(now_ms)),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, ms: u64) {
        let step = i64::try_from(ms).unwrap_or(i64::MAX);
        self.now.set(self.now.get().saturating_add(step));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }

    fn local_now(&self) -> NaiveDateTime {
        DateTime::<Utc>::from_timestamp_millis(self.now.get())
            .map(|dt| dt.naive_utc())
            .unwrap_or(NaiveDateTime::MIN)
    }
}
