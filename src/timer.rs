//! Deadline queue for the simulated delays.
//!
//! The UI loop polls input every few milliseconds; on each tick it asks the
//! scheduler for whatever has come due. Nothing here sleeps or spawns.

use std::time::{Duration, Instant};

/// Simulated authentication latency.
pub const LOGIN_DELAY: Duration = Duration::from_millis(1000);
/// Simulated shift submission latency.
pub const SUBMIT_DELAY: Duration = Duration::from_millis(1500);
/// Delay before a chat contact answers.
pub const REPLY_DELAY: Duration = Duration::from_millis(2000);

/// Fire-and-forget one-shot events keyed by deadline.
#[derive(Debug)]
pub struct Scheduler<T> {
    entries: Vec<(Instant, T)>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Scheduler { entries: Vec::new() }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event` to come due `delay` after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration, event: T) {
        self.entries.push((now + delay, event));
    }

    /// Remove and return every event due at `now`, earliest first.
    pub fn poll(&mut self, now: Instant) -> Vec<T> {
        let mut due = Vec::new();
        let mut pending = Vec::with_capacity(self.entries.len());
        for (deadline, event) in self.entries.drain(..) {
            if deadline <= now {
                due.push((deadline, event));
            } else {
                pending.push((deadline, event));
            }
        }
        self.entries = pending;
        due.sort_by_key(|(deadline, _)| *deadline);
        due.into_iter().map(|(_, event)| event).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any pending event matches `pred`.
    pub fn any(&self, pred: impl Fn(&T) -> bool) -> bool {
        self.entries.iter().any(|(_, event)| pred(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_due_before_deadline() {
        let start = Instant::now();
        let mut s = Scheduler::new();
        s.schedule(start, Duration::from_millis(100), "a");
        assert!(s.poll(start + Duration::from_millis(99)).is_empty());
        assert_eq!(s.len(), 1);
        assert_eq!(s.poll(start + Duration::from_millis(100)), vec!["a"]);
        assert!(s.is_empty());
    }

    #[test]
    fn test_due_events_come_out_in_deadline_order() {
        let start = Instant::now();
        let mut s = Scheduler::new();
        s.schedule(start, Duration::from_millis(300), 3);
        s.schedule(start, Duration::from_millis(100), 1);
        s.schedule(start, Duration::from_millis(200), 2);
        s.schedule(start, Duration::from_millis(900), 9);
        assert_eq!(s.poll(start + Duration::from_millis(500)), vec![1, 2, 3]);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_clear_cancels() {
        let start = Instant::now();
        let mut s = Scheduler::new();
        s.schedule(start, Duration::ZERO, 1);
        s.schedule(start, Duration::ZERO, 2);
        assert!(s.any(|e| *e == 2));
        s.clear();
        assert!(s.poll(start).is_empty());
    }
}
