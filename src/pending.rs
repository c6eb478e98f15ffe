//! Pending order store: FIFO of not-yet-dispatched requests, editable by order id.
//!
//! Entries are keyed by an admission sequence number in a `BTreeMap`, so the first
//! entry is always the oldest. A side `HashMap` maps order id to sequence number for
//! modify and cancel. Modify edits the entry in place and keeps its sequence number;
//! cancel and dispatch remove it from both maps.

use crate::types::{AdmissionResult, OrderId, OrderRequest, RequestKind};
use log::{debug, info};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default)]
pub struct PendingOrderStore {
    queue: BTreeMap<u64, OrderRequest>,
    index: HashMap<OrderId, u64>,
    next_seq: u64,
}

impl PendingOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one request. When `session_open` is false nothing is touched.
    pub fn admit(&mut self, request: OrderRequest, session_open: bool) -> AdmissionResult {
        if !session_open {
            debug!("order rejected outside session order_id={}", request.order_id);
            return AdmissionResult::RejectedOutsideSession;
        }
        match request.kind {
            RequestKind::New => self.push(request),
            RequestKind::Modify => self.modify(&request),
            RequestKind::Cancel => self.cancel(request.order_id),
        }
    }

    fn push(&mut self, request: OrderRequest) -> AdmissionResult {
        let order_id = request.order_id;
        if self.index.contains_key(&order_id) {
            debug!("duplicate pending order_id={}", order_id);
            return AdmissionResult::DuplicateOrderId(order_id);
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert(seq, request);
        self.index.insert(order_id, seq);
        debug!("order queued order_id={} seq={} depth={}", order_id, seq, self.queue.len());
        AdmissionResult::Admitted
    }

    fn modify(&mut self, request: &OrderRequest) -> AdmissionResult {
        let order_id = request.order_id;
        let Some(entry) = self.index.get(&order_id).and_then(|seq| self.queue.get_mut(seq)) else {
            debug!("modify found no pending order order_id={}", order_id);
            return AdmissionResult::NotFound(order_id);
        };
        entry.price = request.price;
        entry.quantity = request.quantity;
        info!(
            "order modified order_id={} price={} quantity={}",
            order_id, entry.price, entry.quantity
        );
        AdmissionResult::ModifiedInPlace(order_id)
    }

    fn cancel(&mut self, order_id: OrderId) -> AdmissionResult {
        let Some(seq) = self.index.remove(&order_id) else {
            debug!("cancel found no pending order order_id={}", order_id);
            return AdmissionResult::NotFound(order_id);
        };
        self.queue.remove(&seq);
        info!("order cancelled order_id={}", order_id);
        AdmissionResult::Cancelled(order_id)
    }

    /// Removes and returns the oldest pending request.
    pub fn pop_oldest(&mut self) -> Option<OrderRequest> {
        let (_, request) = self.queue.pop_first()?;
        self.index.remove(&request.order_id);
        Some(request)
    }

    pub fn get(&self, order_id: OrderId) -> Option<&OrderRequest> {
        self.index.get(&order_id).and_then(|seq| self.queue.get(seq))
    }

    /// Pending order ids, oldest first.
    pub fn order_ids(&self) -> Vec<OrderId> {
        self.queue.values().map(|r| r.order_id).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
