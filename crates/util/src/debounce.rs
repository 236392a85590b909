//! Debounce timer holder.
//!
//! `Debouncer` does not own a clock or spawn anything. Each call to
//! [`Debouncer::reschedule`] hands out a fresh [`Ticket`]; the caller arranges
//! for that ticket to come back after [`Debouncer::delay`] through whatever
//! timer facility the host has, and [`Debouncer::fire`] decides whether it is
//! still the one that should run. Older tickets are silently discarded, which
//! gives last-write-wins semantics without requiring the host to cancel
//! timers.

use std::time::Duration;

/// Generation marker handed out for each scheduled run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Coalesces bursts of schedule requests into a single run.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: u64,
    pending: bool,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: false,
        }
    }

    /// Settling delay every ticket should wait before coming back.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancels any pending run and schedules a new one.
    pub fn reschedule(&mut self) -> Ticket {
        self.generation = self.generation.wrapping_add(1);
        self.pending = true;
        Ticket(self.generation)
    }

    /// Drops the pending run, if any. Outstanding tickets become stale.
    pub fn cancel(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Returns `true` when `ticket` is the latest one and still pending.
    ///
    /// A successful fire consumes the pending run, so the same ticket never
    /// fires twice.
    pub fn fire(&mut self, ticket: Ticket) -> bool {
        if !self.pending || ticket.0 != self.generation {
            tracing::trace!(ticket = ticket.0, current = self.generation, "discarding stale debounce ticket");
            return false;
        }
        self.pending = false;
        true
    }
}
