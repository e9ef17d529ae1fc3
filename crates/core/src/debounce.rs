//! Cancelable single-slot timer used to debounce persistence.

use std::time::Duration;

/// Identifies one scheduled firing. A rescheduled timer gets a new handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerHandle {
    id: u64,
    due_ms: u64,
}

impl TimerHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn due_ms(&self) -> u64 {
        self.due_ms
    }
}

/// At most one timer is armed at a time; scheduling cancels the previous one.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    next_id: u64,
    pending: Option<TimerHandle>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            next_id: 0,
            pending: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Arms the timer `quiet` after `now_ms`, replacing any pending one.
    pub fn schedule(&mut self, now_ms: u64) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle {
            id: self.next_id,
            due_ms: now_ms.saturating_add(self.quiet.as_millis() as u64),
        };
        self.pending = Some(handle);
        handle
    }

    pub fn cancel(&mut self) -> Option<TimerHandle> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<TimerHandle> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Disarms and returns the pending timer when its due time has been reached.
    pub fn fire_if_due(&mut self, now_ms: u64) -> Option<TimerHandle> {
        match self.pending {
            Some(handle) if handle.due_ms <= now_ms => self.pending.take(),
            _ => None,
        }
    }
}
