use std::time::{Duration, Instant};

/// Elapsed-time tracking for one session. Either the anchor is armed
/// (timer running) or `elapsed` holds a frozen duration; never both.
///
/// Every method takes the current `Instant` from the caller, so tests
/// drive the clock on virtual time. Completion time is always the
/// direct anchor-to-stop delta: `tick` only refreshes the displayed
/// value and may be skipped or delayed without skewing the measurement.
#[derive(Clone, Debug, Default)]
pub struct Clock {
    elapsed: Duration,
    running_since: Option<Instant>,
}

impl Clock {
    /// Arms the anchor and zeroes the elapsed value. No-op while running.
    pub fn start(&mut self, now: Instant) {
        if self.running_since.is_none() {
            self.elapsed = Duration::ZERO;
            self.running_since = Some(now);
        }
    }

    /// Re-arms the anchor preserving the elapsed value. Only `tick`
    /// calls this; public callers go through `start`.
    fn resume(&mut self, now: Instant) {
        if self.running_since.is_none() {
            self.running_since = Some(now.checked_sub(self.elapsed).unwrap_or(now));
        }
    }

    /// Freezes the elapsed value at the anchor-to-now delta.
    pub fn stop(&mut self, now: Instant) {
        if let Some(anchor) = self.running_since.take() {
            self.elapsed = now.saturating_duration_since(anchor);
        }
    }

    /// Display refresh: recompute the elapsed value from the anchor.
    pub fn tick(&mut self, now: Instant) {
        if self.running_since.is_some() {
            self.stop(now);
            self.resume(now);
        }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.running_since {
            Some(anchor) => now.saturating_duration_since(anchor),
            None => self.elapsed,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }
}
