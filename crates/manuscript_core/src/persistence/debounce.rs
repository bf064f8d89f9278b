//! Single-slot debounced writer.
//!
//! # Responsibility
//! - Hold at most one pending write and its due time.
//! - Replace the pending write on every new schedule (trailing debounce).
//!
//! # Invariants
//! - Only the last payload scheduled within the window is ever written.
//! - Time is always passed in; the writer never reads a clock itself.

use crate::persistence::{PersistError, STATE_KEY};
use crate::repo::kv_repo::KvStore;
use log::{debug, error};
use std::time::{Duration, Instant};

/// Time source for scheduling. Injected so tests control time.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock backed by `Instant::now`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingWrite {
    due_at: Instant,
    payload: String,
}

/// Trailing debounce over writes to [`STATE_KEY`].
#[derive(Debug, Clone)]
pub struct DebouncedWriter {
    delay: Duration,
    pending: Option<PendingWrite>,
}

impl DebouncedWriter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancels any pending write and schedules `payload` at `now + delay`.
    pub fn schedule(&mut self, payload: String, now: Instant) {
        if self.pending.is_some() {
            debug!("event=persist_debounce module=persistence status=rescheduled");
        }
        self.pending = Some(PendingWrite {
            due_at: now + self.delay,
            payload,
        });
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Due time of the pending write, if any.
    pub fn due_at(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due_at)
    }

    /// Drops the pending write without persisting it.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Writes the pending payload when its due time has passed.
    ///
    /// Returns whether a write happened. A failed write is dropped.
    pub fn poll(&mut self, now: Instant, store: &impl KvStore) -> Result<bool, PersistError> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.due_at <= now);
        if due {
            self.flush(store)
        } else {
            Ok(false)
        }
    }

    /// Writes the pending payload immediately, regardless of due time.
    pub fn flush(&mut self, store: &impl KvStore) -> Result<bool, PersistError> {
        let Some(pending) = self.pending.take() else {
            return Ok(false);
        };
        if let Err(err) = store.set(STATE_KEY, &pending.payload) {
            error!(
                "event=persist_write module=persistence status=error error={}",
                err
            );
            return Err(err.into());
        }
        debug!(
            "event=persist_write module=persistence status=ok bytes={}",
            pending.payload.len()
        );
        Ok(true)
    }
}
