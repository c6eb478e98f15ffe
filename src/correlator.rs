//! Response correlation: send timestamps by order id, consumed by the matching response.

use crate::types::{CorrelationResult, OrderId};
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Sent-order record. Has its own lock, independent of the pending store.
#[derive(Debug, Default)]
pub struct ResponseCorrelator {
    sent: Mutex<HashMap<OrderId, Instant>>,
}

impl ResponseCorrelator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `order_id` was handed downstream at `sent_at`. A reused id
    /// overwrites the earlier record.
    pub fn record_sent(&self, order_id: OrderId, sent_at: Instant) {
        let previous = self.lock().insert(order_id, sent_at);
        if previous.is_some() {
            debug!("sent record replaced order_id={}", order_id);
        }
    }

    /// Removes the record for `order_id` and returns the elapsed time since it was sent.
    pub fn correlate(&self, order_id: OrderId, now: Instant) -> CorrelationResult {
        match self.lock().remove(&order_id) {
            Some(sent_at) => CorrelationResult::Measured(now.saturating_duration_since(sent_at)),
            None => CorrelationResult::Unmatched,
        }
    }

    /// Drops records older than `ttl`. Returns how many were evicted.
    pub fn evict_older_than(&self, now: Instant, ttl: Duration) -> usize {
        let mut sent = self.lock();
        let before = sent.len();
        sent.retain(|order_id, sent_at| {
            let keep = now.saturating_duration_since(*sent_at) < ttl;
            if !keep {
                warn!("no response within ttl, dropping sent record order_id={} ttl_secs={}", order_id, ttl.as_secs_f64());
            }
            keep
        });
        before - sent.len()
    }

    pub fn is_awaiting(&self, order_id: OrderId) -> bool {
        self.lock().contains_key(&order_id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<OrderId, Instant>> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
