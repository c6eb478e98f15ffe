//! Single-entry gateway facade.
//!
//! Owns the pending store, the rate window, the session gate, and the sent-order
//! record, and wires them to the downstream and response-log collaborators. All methods
//! take `&self` so one `Arc<OrderGateway>` can be shared by caller threads and the
//! background cycles in [`crate::runtime`].

use crate::clock::{Clock, SystemClock};
use crate::config::GatewayConfig;
use crate::correlator::ResponseCorrelator;
use crate::dispatcher::{drain_cycle, RateWindow};
use crate::downstream::Downstream;
use crate::error::Result;
use crate::pending::PendingOrderStore;
use crate::response_log::ResponseLog;
use crate::session::{SessionGate, SessionTransition, SessionWindow};
use crate::types::{AdmissionResult, CorrelationResult, OrderId, OrderRequest, OrderResponse};
use log::{debug, info};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// State shared by admission and dispatch. One lock covers the session check, the
/// store mutation, and the rate counter.
#[derive(Debug)]
struct DispatchState {
    store: PendingOrderStore,
    rate: RateWindow,
}

/// Order admission gateway.
///
/// Use [`OrderGateway::on_request`] for new/modify/cancel instructions and
/// [`OrderGateway::on_response`] for downstream acknowledgements. Dispatch and session
/// polling are driven by [`OrderGateway::run_dispatch_cycle`] and
/// [`OrderGateway::poll_session`], normally from a [`crate::GatewayRuntime`].
pub struct OrderGateway {
    config: GatewayConfig,
    window: SessionWindow,
    state: Mutex<DispatchState>,
    gate: Mutex<SessionGate>,
    correlator: ResponseCorrelator,
    downstream: Arc<dyn Downstream>,
    response_log: Arc<dyn ResponseLog>,
    clock: Arc<dyn Clock>,
}

impl OrderGateway {
    /// Creates a gateway on the system clock. Fails if `config` is invalid.
    pub fn new(
        config: GatewayConfig,
        downstream: Arc<dyn Downstream>,
        response_log: Arc<dyn ResponseLog>,
    ) -> Result<Self> {
        Self::with_clock(config, downstream, response_log, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: GatewayConfig,
        downstream: Arc<dyn Downstream>,
        response_log: Arc<dyn ResponseLog>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        let window = config.session_window();
        let state = DispatchState {
            store: PendingOrderStore::new(),
            rate: RateWindow::new(config.max_orders_per_second, clock.now()),
        };
        info!(
            "gateway created max_orders_per_second={} session={}..={} wrap_midnight={}",
            config.max_orders_per_second, window.start, window.end, window.wrap_midnight
        );
        Ok(Self {
            config,
            window,
            state: Mutex::new(state),
            gate: Mutex::new(SessionGate::new(window)),
            correlator: ResponseCorrelator::new(),
            downstream,
            response_log,
            clock,
        })
    }

    /// Admits, modifies, or cancels a pending order. Requests outside the session window
    /// never reach the store.
    pub fn on_request(&self, request: OrderRequest) -> AdmissionResult {
        let order_id = request.order_id;
        let kind = request.kind;
        let mut state = self.lock_state();
        let open = self.window.is_open(self.clock.time_of_day());
        let result = state.store.admit(request, open);
        drop(state);
        debug!("admission order_id={} kind={:?} result={:?}", order_id, kind, result);
        result
    }

    /// Matches a downstream response to its sent order and logs the latency.
    pub fn on_response(&self, response: OrderResponse) -> CorrelationResult {
        let result = self.correlator.correlate(response.order_id, self.clock.now());
        match result {
            CorrelationResult::Measured(latency) => {
                let latency_secs = latency.as_secs_f64();
                info!(
                    "response order_id={} kind={} latency_secs={:.6}",
                    response.order_id, response.kind, latency_secs
                );
                self.response_log.log_response(&response, latency_secs);
            }
            CorrelationResult::Unmatched => {
                debug!("unmatched response order_id={} kind={}", response.order_id, response.kind);
            }
        }
        result
    }

    /// Runs one dispatch cycle. Returns the number of orders sent downstream.
    pub fn run_dispatch_cycle(&self) -> usize {
        let mut state = self.lock_state();
        let open = self.window.is_open(self.clock.time_of_day());
        let DispatchState { store, rate } = &mut *state;
        drain_cycle(store, rate, self.clock.now(), open, |request| {
            self.downstream.send(&request);
            self.correlator.record_sent(request.order_id, self.clock.now());
            info!("dispatched order_id={}", request.order_id);
        })
    }

    /// Checks the session window and sends logon/logout on a state change.
    pub fn poll_session(&self) -> Option<SessionTransition> {
        let transition = self.lock_gate().poll(self.clock.time_of_day());
        if let Some(t) = transition {
            self.notify(t);
        }
        transition
    }

    /// Logs out if logged on. Called on runtime shutdown.
    pub fn close_session(&self) -> Option<SessionTransition> {
        let transition = self.lock_gate().close();
        if let Some(t) = transition {
            self.notify(t);
        }
        transition
    }

    /// Drops sent-order records past the configured ttl. No-op when eviction is disabled.
    pub fn evict_stale_sent_orders(&self) -> usize {
        match self.config.sent_order_ttl() {
            Some(ttl) => self.correlator.evict_older_than(self.clock.now(), ttl),
            None => 0,
        }
    }

    fn notify(&self, transition: SessionTransition) {
        match transition {
            SessionTransition::Logon => {
                info!("session open, sending logon");
                self.downstream.send_logon();
            }
            SessionTransition::Logout => {
                info!("session closed, sending logout");
                self.downstream.send_logout();
            }
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn is_session_open(&self) -> bool {
        self.window.is_open(self.clock.time_of_day())
    }

    pub fn is_logged_on(&self) -> bool {
        self.lock_gate().is_logged_on()
    }

    pub fn pending_len(&self) -> usize {
        self.lock_state().store.len()
    }

    /// Pending order ids, oldest first.
    pub fn pending_order_ids(&self) -> Vec<OrderId> {
        self.lock_state().store.order_ids()
    }

    pub fn pending_order(&self, order_id: OrderId) -> Option<OrderRequest> {
        self.lock_state().store.get(order_id).cloned()
    }

    /// Sent orders still awaiting a response.
    pub fn sent_len(&self) -> usize {
        self.correlator.len()
    }

    pub fn dispatch_poll_interval(&self) -> Duration {
        self.config.dispatch_poll_interval()
    }

    pub fn session_poll_interval(&self) -> Duration {
        self.config.session_poll_interval()
    }

    fn lock_state(&self) -> MutexGuard<'_, DispatchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_gate(&self) -> MutexGuard<'_, SessionGate> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for OrderGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderGateway")
            .field("config", &self.config)
            .field("pending", &self.pending_len())
            .field("awaiting_response", &self.sent_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::downstream::{DownstreamEvent, RecordingDownstream};
    use crate::response_log::InMemoryResponseLog;
    use crate::types::{ResponseKind, Side, SymbolId};
    use chrono::NaiveTime;
    use rust_decimal::Decimal;

    fn init_log() {
        let _ = env_logger::try_init();
    }

    struct Harness {
        gateway: OrderGateway,
        clock: Arc<ManualClock>,
        downstream: RecordingDownstream,
        log: InMemoryResponseLog,
    }

    fn harness(max_orders_per_second: u32) -> Harness {
        init_log();
        let clock = Arc::new(ManualClock::new(NaiveTime::from_hms_opt(11, 0, 0).unwrap()));
        let downstream = RecordingDownstream::new();
        let log = InMemoryResponseLog::new();
        let config = GatewayConfig {
            max_orders_per_second,
            session_start: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            session_end: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
            ..Default::default()
        };
        let gateway = OrderGateway::with_clock(
            config,
            Arc::new(downstream.clone()),
            Arc::new(log.clone()),
            clock.clone(),
        )
        .unwrap();
        Harness {
            gateway,
            clock,
            downstream,
            log,
        }
    }

    fn new_order(id: u64, price: i64, quantity: u64) -> OrderRequest {
        OrderRequest::new_order(OrderId(id), SymbolId(1), Side::Buy, Decimal::from(price), quantity)
    }

    fn sent_ids(downstream: &RecordingDownstream) -> Vec<u64> {
        downstream.sent_orders().iter().map(|r| r.order_id.0).collect()
    }

    #[test]
    fn modify_and_cancel_reconcile_before_dispatch() {
        let h = harness(2);
        assert_eq!(h.gateway.on_request(new_order(1, 100, 10)), AdmissionResult::Admitted);
        assert_eq!(h.gateway.on_request(new_order(2, 101, 20)), AdmissionResult::Admitted);
        let modify = OrderRequest::modify(OrderId(1), SymbolId(1), Side::Buy, Decimal::new(995, 1), 15);
        assert_eq!(h.gateway.on_request(modify), AdmissionResult::ModifiedInPlace(OrderId(1)));
        let cancel = OrderRequest::cancel(OrderId(2), SymbolId(1), Side::Sell);
        assert_eq!(h.gateway.on_request(cancel), AdmissionResult::Cancelled(OrderId(2)));
        assert_eq!(h.gateway.on_request(new_order(3, 105, 5)), AdmissionResult::Admitted);

        assert_eq!(h.gateway.run_dispatch_cycle(), 2);
        let sent = h.downstream.sent_orders();
        assert_eq!(sent_ids(&h.downstream), vec![1, 3]);
        assert_eq!(sent[0].price, Decimal::new(995, 1));
        assert_eq!(sent[0].quantity, 15);
        assert_eq!(h.gateway.pending_len(), 0);
        assert_eq!(h.gateway.sent_len(), 2);
    }

    #[test]
    fn five_orders_at_two_per_second_span_three_windows() {
        let h = harness(2);
        for id in 1..=5 {
            h.gateway.on_request(new_order(id, 100, 1));
        }
        assert_eq!(h.gateway.run_dispatch_cycle(), 2);
        h.clock.advance(Duration::from_millis(10));
        assert_eq!(h.gateway.run_dispatch_cycle(), 0);
        h.clock.advance(Duration::from_millis(990));
        assert_eq!(h.gateway.run_dispatch_cycle(), 2);
        h.clock.advance(Duration::from_secs(1));
        assert_eq!(h.gateway.run_dispatch_cycle(), 1);
        assert_eq!(sent_ids(&h.downstream), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn request_outside_session_is_rejected_and_not_queued() {
        let h = harness(10);
        h.clock.set_time_of_day(NaiveTime::from_hms_opt(9, 59, 59).unwrap());
        assert_eq!(h.gateway.on_request(new_order(1, 100, 1)), AdmissionResult::RejectedOutsideSession);
        assert_eq!(h.gateway.pending_len(), 0);
        h.clock.set_time_of_day(NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(h.gateway.on_request(new_order(1, 100, 1)), AdmissionResult::Admitted);
    }

    #[test]
    fn pending_orders_wait_while_session_closed() {
        let h = harness(10);
        h.gateway.on_request(new_order(1, 100, 1));
        h.clock.set_time_of_day(NaiveTime::from_hms_opt(14, 0, 0).unwrap());
        assert_eq!(h.gateway.run_dispatch_cycle(), 0);
        assert_eq!(h.gateway.pending_len(), 1);
        h.clock.set_time_of_day(NaiveTime::from_hms_opt(10, 30, 0).unwrap());
        assert_eq!(h.gateway.run_dispatch_cycle(), 1);
    }

    #[test]
    fn response_latency_measured_from_send() {
        let h = harness(10);
        h.gateway.on_request(new_order(1, 100, 1));
        h.gateway.run_dispatch_cycle();
        h.clock.advance(Duration::from_millis(500));
        let result = h.gateway.on_response(OrderResponse {
            order_id: OrderId(1),
            kind: ResponseKind::Accept,
        });
        assert_eq!(result, CorrelationResult::Measured(Duration::from_millis(500)));
        let entries = h.log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].response.order_id, OrderId(1));
        assert!((entries[0].latency_secs - 0.5).abs() < 1e-9);

        let unknown = h.gateway.on_response(OrderResponse {
            order_id: OrderId(77),
            kind: ResponseKind::Reject,
        });
        assert_eq!(unknown, CorrelationResult::Unmatched);
        assert_eq!(h.log.entries().len(), 1, "unmatched responses are not logged");
    }

    #[test]
    fn duplicate_response_is_unmatched() {
        let h = harness(10);
        h.gateway.on_request(new_order(1, 100, 1));
        h.gateway.run_dispatch_cycle();
        let accept = OrderResponse {
            order_id: OrderId(1),
            kind: ResponseKind::Accept,
        };
        assert!(h.gateway.on_response(accept.clone()).latency().is_some());
        assert_eq!(h.gateway.on_response(accept), CorrelationResult::Unmatched);
    }

    #[test]
    fn session_poll_sends_logon_and_logout_once() {
        let h = harness(10);
        assert_eq!(h.gateway.poll_session(), Some(SessionTransition::Logon));
        assert_eq!(h.gateway.poll_session(), None);
        assert!(h.gateway.is_logged_on());
        h.clock.set_time_of_day(NaiveTime::from_hms_opt(13, 0, 1).unwrap());
        assert_eq!(h.gateway.poll_session(), Some(SessionTransition::Logout));
        assert_eq!(h.gateway.poll_session(), None);
        assert_eq!(h.downstream.events(), vec![DownstreamEvent::Logon, DownstreamEvent::Logout]);
    }

    #[test]
    fn stale_sent_orders_are_evicted_after_ttl() {
        let h = harness(10);
        h.gateway.on_request(new_order(1, 100, 1));
        h.gateway.run_dispatch_cycle();
        h.clock.advance(Duration::from_secs(299));
        assert_eq!(h.gateway.evict_stale_sent_orders(), 0);
        h.clock.advance(Duration::from_secs(1));
        assert_eq!(h.gateway.evict_stale_sent_orders(), 1);
        let late = h.gateway.on_response(OrderResponse {
            order_id: OrderId(1),
            kind: ResponseKind::Accept,
        });
        assert_eq!(late, CorrelationResult::Unmatched);
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let config = GatewayConfig {
            max_orders_per_second: 0,
            ..Default::default()
        };
        let result = OrderGateway::new(
            config,
            Arc::new(RecordingDownstream::new()),
            Arc::new(InMemoryResponseLog::new()),
        );
        assert!(result.is_err());
    }
}
