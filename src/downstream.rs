//! Downstream destination: where dispatched orders and session notices go.
//!
//! The gateway treats every call as fire-and-forget. Implementations own their own
//! transport, retries, and failure reporting.

use crate::types::OrderRequest;
use log::info;
use std::sync::{Arc, Mutex, PoisonError};

pub trait Downstream: Send + Sync {
    fn send(&self, request: &OrderRequest);
    fn send_logon(&self);
    fn send_logout(&self);
}

/// Writes one log line per call. Used by the binary when no real venue is attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingDownstream;

impl Downstream for LoggingDownstream {
    fn send(&self, request: &OrderRequest) {
        info!(
            "sent order order_id={} symbol_id={} side={:?} price={} quantity={}",
            request.order_id, request.symbol_id.0, request.side, request.price, request.quantity
        );
    }

    fn send_logon(&self) {
        info!("logon sent");
    }

    fn send_logout(&self) {
        info!("logout sent");
    }
}

/// One call observed by [`RecordingDownstream`].
#[derive(Clone, Debug, PartialEq)]
pub enum DownstreamEvent {
    Order(OrderRequest),
    Logon,
    Logout,
}

/// In-memory downstream for tests. Clone shares the same backing buffer.
#[derive(Clone, Debug, Default)]
pub struct RecordingDownstream {
    events: Arc<Mutex<Vec<DownstreamEvent>>>,
}

impl RecordingDownstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DownstreamEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Orders sent so far, in send order.
    pub fn sent_orders(&self) -> Vec<OrderRequest> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                DownstreamEvent::Order(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, event: &DownstreamEvent) -> usize {
        self.events().iter().filter(|e| *e == event).count()
    }

    fn push(&self, event: DownstreamEvent) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event);
    }
}

impl Downstream for RecordingDownstream {
    fn send(&self, request: &OrderRequest) {
        self.push(DownstreamEvent::Order(request.clone()));
    }

    fn send_logon(&self) {
        self.push(DownstreamEvent::Logon);
    }

    fn send_logout(&self) {
        self.push(DownstreamEvent::Logout);
    }
}
