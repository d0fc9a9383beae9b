//! Debounced scheduling
//!
//! Rapid triggers (keystrokes, editor autosaves) are collapsed so work
//! runs at most once per quiet period. Scheduling again replaces the
//! pending task; only the most recent one ever fires.

use std::time::{Duration, Instant};

/// Handle for one scheduled task
///
/// Handles are unique per debouncer, so a caller can tell whether the
/// task that fired is the one it scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone, Copy)]
struct Pending {
    handle: TaskHandle,
    due: Instant,
}

/// Single-slot debouncer driven by the caller's clock
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<Pending>,
    next_id: u64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            next_id: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the quiet period; a pending task keeps its deadline
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Schedule a task `delay` after `now`, replacing any pending one
    pub fn schedule(&mut self, now: Instant) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        if let Some(old) = self.pending.replace(Pending {
            handle,
            due: now + self.delay,
        }) {
            tracing::trace!("Debounce: {:?} superseded by {:?}", old.handle, handle);
        }
        handle
    }

    /// Drop the pending task, if any
    pub fn cancel(&mut self) -> Option<TaskHandle> {
        self.pending.take().map(|p| p.handle)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// How long until the pending task is due; `None` when idle
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending.map(|p| p.due.saturating_duration_since(now))
    }

    /// Take the pending task if its deadline has passed
    pub fn take_due(&mut self, now: Instant) -> Option<TaskHandle> {
        match self.pending {
            Some(p) if p.due <= now => {
                self.pending = None;
                Some(p.handle)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(100);

    #[test]
    fn test_fires_after_delay() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        let handle = debouncer.schedule(start);

        assert_eq!(debouncer.take_due(start + Duration::from_millis(99)), None);
        assert_eq!(debouncer.take_due(start + DELAY), Some(handle));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.take_due(start + DELAY * 2), None);
    }

    #[test]
    fn test_reschedule_replaces_pending() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        let first = debouncer.schedule(start);
        let second = debouncer.schedule(start + Duration::from_millis(80));
        assert_ne!(first, second);

        // The first deadline passes without anything firing
        assert_eq!(debouncer.take_due(start + DELAY), None);
        assert_eq!(
            debouncer.take_due(start + Duration::from_millis(180)),
            Some(second)
        );
    }

    #[test]
    fn test_burst_fires_once() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        let mut last = None;
        for i in 0..20 {
            last = Some(debouncer.schedule(start + Duration::from_millis(i * 10)));
        }

        let mut fired = Vec::new();
        for ms in (0..500).step_by(5) {
            if let Some(handle) = debouncer.take_due(start + Duration::from_millis(ms)) {
                fired.push(handle);
            }
        }
        assert_eq!(fired, vec![last.unwrap()]);
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        let handle = debouncer.schedule(start);
        assert_eq!(debouncer.cancel(), Some(handle));
        assert_eq!(debouncer.cancel(), None);
        assert_eq!(debouncer.take_due(start + DELAY), None);
    }

    #[test]
    fn test_time_until_due() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        assert_eq!(debouncer.time_until_due(start), None);

        debouncer.schedule(start);
        assert_eq!(
            debouncer.time_until_due(start + Duration::from_millis(40)),
            Some(Duration::from_millis(60))
        );
        assert_eq!(
            debouncer.time_until_due(start + Duration::from_millis(400)),
            Some(Duration::ZERO)
        );
    }
}
