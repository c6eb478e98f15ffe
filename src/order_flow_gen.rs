//! Synthetic order flow generator.
//!
//! Deterministic, configurable request stream for replay tests, property tests, and
//! benchmarks. Same seed ⇒ same sequence of requests. Modify and cancel requests
//! target ids issued earlier in the stream, which may already be cancelled; that is
//! the point, since the gateway has to treat those as benign misses.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use crate::types::{AdmissionResult, OrderId, OrderRequest, RequestKind, Side, SymbolId};
use crate::OrderGateway;

/// Configuration for the synthetic request generator.
/// All ranges are inclusive. Same config + seed produces the same stream.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// RNG seed. Same seed ⇒ same request stream.
    pub seed: u64,
    pub symbol_id: SymbolId,
    /// Number of requests to generate with [`Generator::all_requests`].
    pub num_requests: usize,
    /// Probability of Buy (0.0..=1.0). Sell otherwise.
    pub buy_ratio: f64,
    /// Probability that a request is a Modify, then a Cancel; New otherwise.
    /// The first request is always New.
    pub modify_ratio: f64,
    pub cancel_ratio: f64,
    /// Price range in cents (inclusive).
    pub price_min_cents: i64,
    pub price_max_cents: i64,
    pub quantity_min: u64,
    pub quantity_max: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            symbol_id: SymbolId(1),
            num_requests: 1000,
            buy_ratio: 0.5,
            modify_ratio: 0.15,
            cancel_ratio: 0.1,
            price_min_cents: 9_500,
            price_max_cents: 10_500,
            quantity_min: 1,
            quantity_max: 100,
        }
    }
}

/// Deterministic request stream. Create with [`Generator::new`].
pub struct Generator {
    rng: StdRng,
    config: GeneratorConfig,
    next_order_id: u64,
    issued: Vec<(OrderId, Side)>,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            rng,
            config,
            next_order_id: 1,
            issued: Vec::new(),
        }
    }

    /// Generates the next request. Advances order id and RNG state.
    pub fn next_request(&mut self) -> OrderRequest {
        let r = self.rng.gen::<f64>();
        let kind = if self.issued.is_empty() || r >= self.config.modify_ratio + self.config.cancel_ratio {
            RequestKind::New
        } else if r < self.config.modify_ratio {
            RequestKind::Modify
        } else {
            RequestKind::Cancel
        };
        match kind {
            RequestKind::New => {
                let order_id = OrderId(self.next_order_id);
                self.next_order_id += 1;
                let side = if self.rng.gen::<f64>() < self.config.buy_ratio {
                    Side::Buy
                } else {
                    Side::Sell
                };
                self.issued.push((order_id, side));
                let price = self.price();
                let quantity = self.quantity();
                OrderRequest::new_order(order_id, self.config.symbol_id, side, price, quantity)
            }
            RequestKind::Modify => {
                let (order_id, side) = self.pick_issued();
                let price = self.price();
                let quantity = self.quantity();
                OrderRequest::modify(order_id, self.config.symbol_id, side, price, quantity)
            }
            RequestKind::Cancel => {
                let (order_id, side) = self.pick_issued();
                OrderRequest::cancel(order_id, self.config.symbol_id, side)
            }
        }
    }

    fn pick_issued(&mut self) -> (OrderId, Side) {
        let i = self.rng.gen_range(0..self.issued.len());
        self.issued[i]
    }

    fn price(&mut self) -> Decimal {
        let cents = self
            .rng
            .gen_range(self.config.price_min_cents..=self.config.price_max_cents);
        Decimal::new(cents, 2)
    }

    fn quantity(&mut self) -> u64 {
        self.rng
            .gen_range(self.config.quantity_min..=self.config.quantity_max)
    }

    /// Returns exactly `n` requests. Advances the generator state.
    pub fn take_requests(&mut self, n: usize) -> Vec<OrderRequest> {
        (0..n).map(|_| self.next_request()).collect()
    }

    /// Returns the full stream as defined by `config.num_requests`.
    pub fn all_requests(&mut self) -> Vec<OrderRequest> {
        self.take_requests(self.config.num_requests)
    }
}

/// Tally of admission results from a replay.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub admitted: usize,
    pub rejected_outside_session: usize,
    pub modified: usize,
    pub cancelled: usize,
    pub not_found: usize,
    pub duplicates: usize,
}

impl ReplaySummary {
    pub fn record(&mut self, result: AdmissionResult) {
        match result {
            AdmissionResult::Admitted => self.admitted += 1,
            AdmissionResult::RejectedOutsideSession => self.rejected_outside_session += 1,
            AdmissionResult::ModifiedInPlace(_) => self.modified += 1,
            AdmissionResult::Cancelled(_) => self.cancelled += 1,
            AdmissionResult::NotFound(_) => self.not_found += 1,
            AdmissionResult::DuplicateOrderId(_) => self.duplicates += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.admitted
            + self.rejected_outside_session
            + self.modified
            + self.cancelled
            + self.not_found
            + self.duplicates
    }
}

/// Feeds requests into the gateway in order and tallies the results.
pub fn replay_into_gateway(gateway: &OrderGateway, requests: impl IntoIterator<Item = OrderRequest>) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    for request in requests {
        summary.record(gateway.on_request(request));
    }
    summary
}
