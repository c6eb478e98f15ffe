//! Rate-limited dispatch: drains the pending store under a per-second send budget.
//!
//! The budget is a hard ceiling per rolling one-second window. The window restarts at
//! the first cycle that finds at least one second elapsed since the previous restart,
//! so it is relative to elapsed time and not aligned to wall-clock seconds.

use crate::pending::PendingOrderStore;
use crate::types::OrderRequest;
use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(1);

/// Send counter for the current rate window.
#[derive(Debug)]
pub struct RateWindow {
    max_per_window: u32,
    sent_in_window: u32,
    window_start: Instant,
}

impl RateWindow {
    pub fn new(max_per_window: u32, now: Instant) -> Self {
        Self {
            max_per_window,
            sent_in_window: 0,
            window_start: now,
        }
    }

    /// Restarts the window if a full second has passed. Returns true on restart.
    pub fn roll(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.window_start) >= WINDOW {
            self.sent_in_window = 0;
            self.window_start = now;
            true
        } else {
            false
        }
    }

    pub fn has_budget(&self) -> bool {
        self.sent_in_window < self.max_per_window
    }

    pub fn record_send(&mut self) {
        self.sent_in_window += 1;
    }

    pub fn sent_in_window(&self) -> u32 {
        self.sent_in_window
    }

    pub fn window_start(&self) -> Instant {
        self.window_start
    }
}

/// One dispatch cycle. Pops oldest-first while the session is open and the window has
/// budget, handing each request to `send`. Returns how many were sent.
///
/// Caller holds the lock that guards both `store` and `rate`.
pub fn drain_cycle<F>(
    store: &mut PendingOrderStore,
    rate: &mut RateWindow,
    now: Instant,
    session_open: bool,
    mut send: F,
) -> usize
where
    F: FnMut(OrderRequest),
{
    rate.roll(now);
    let mut sent = 0;
    while session_open && rate.has_budget() {
        let Some(request) = store.pop_oldest() else {
            break;
        };
        send(request);
        rate.record_send();
        sent += 1;
    }
    sent
}
