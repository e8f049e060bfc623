//! Two-timer tick scheduler driven by injected elapsed time.
//!
//! The decay timer fires every `decay_interval_ms` while the scheduler runs.
//! The recovery timer only exists while the pet sleeps: it is started when a
//! tick reports `needs_recovery` and dropped when one reports it no longer
//! does. A terminal report stops both timers for good.
//!
//! Elapsed time is consumed in order of due time, so a long `advance` is
//! equivalent to many short ones. When both timers fall due at the same
//! instant the decay tick runs first.

use petcare_logic::decay::TickReport;

/// Which timer fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    Decay,
    Recovery,
}

#[derive(Debug, Clone)]
pub struct TickScheduler {
    decay_interval: u64,
    recovery_interval: u64,
    since_decay: u64,
    /// Time since the last recovery sub-tick, `None` while not recovering.
    since_recovery: Option<u64>,
    paused: bool,
    stopped: bool,
}

impl TickScheduler {
    /// Intervals of zero are treated as one millisecond.
    pub fn new(decay_interval_ms: u64, recovery_interval_ms: u64) -> Self {
        Self {
            decay_interval: decay_interval_ms.max(1),
            recovery_interval: recovery_interval_ms.max(1),
            since_decay: 0,
            since_recovery: None,
            paused: false,
            stopped: false,
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Cancel both timers permanently.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.since_recovery = None;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn is_recovering(&self) -> bool {
        self.since_recovery.is_some()
    }

    /// Start the recovery timer if it is not already running.
    pub fn start_recovery(&mut self) {
        if !self.stopped && self.since_recovery.is_none() {
            self.since_recovery = Some(0);
        }
    }

    /// Milliseconds until the next tick, if any timer is live.
    pub fn next_due(&self) -> Option<u64> {
        if self.stopped || self.paused {
            return None;
        }
        let decay = self.decay_interval - self.since_decay;
        Some(match self.since_recovery {
            Some(since) => decay.min(self.recovery_interval - since),
            None => decay,
        })
    }

    /// Consume `elapsed_ms`, calling `on_tick` for every timer that falls due.
    /// Returns the number of ticks delivered. Nothing happens while paused.
    pub fn advance<F>(&mut self, elapsed_ms: u64, mut on_tick: F) -> usize
    where
        F: FnMut(TickKind) -> TickReport,
    {
        let mut remaining = elapsed_ms;
        let mut delivered = 0;

        while let Some(step) = self.next_due() {
            if step > remaining {
                self.since_decay += remaining;
                if let Some(since) = self.since_recovery.as_mut() {
                    *since += remaining;
                }
                break;
            }
            remaining -= step;
            self.since_decay += step;
            if let Some(since) = self.since_recovery.as_mut() {
                *since += step;
            }

            let kind = if self.since_decay >= self.decay_interval {
                self.since_decay = 0;
                TickKind::Decay
            } else {
                // Only the recovery timer can be due here
                self.since_recovery = Some(0);
                TickKind::Recovery
            };

            let report = on_tick(kind);
            delivered += 1;

            if report.terminal {
                log::debug!("terminal {kind:?} tick, stopping timers");
                self.stop();
                break;
            }
            if report.needs_recovery {
                self.start_recovery();
            } else {
                self.since_recovery = None;
            }
        }
        delivered
    }
}
