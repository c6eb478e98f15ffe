//! Core types and IDs for the gateway: order requests, downstream responses, and
//! the result codes returned to callers.
//!
//! Identifiers are newtype wrappers. [`OrderRequest`] and [`OrderResponse`] are the
//! inbound messages; [`AdmissionResult`] and [`CorrelationResult`] are what the
//! gateway reports back.

use rust_decimal::Decimal;
use std::fmt;
use std::time::Duration;

/// Caller-assigned order identifier. Unique among open orders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Symbol identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SymbolId(pub u64);

/// Order side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

/// What the caller wants done with `order_id`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RequestKind {
    /// Queue a new order.
    New,
    /// Replace price and quantity of a pending order.
    Modify,
    /// Drop a pending order.
    Cancel,
}

/// Inbound order instruction.
///
/// For `Modify`, only `price` and `quantity` are applied to the pending entry.
/// For `Cancel`, only `order_id` is used.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OrderRequest {
    pub symbol_id: SymbolId,
    pub price: Decimal,
    pub quantity: u64,
    pub side: Side,
    pub order_id: OrderId,
    pub kind: RequestKind,
}

impl OrderRequest {
    pub fn new_order(order_id: OrderId, symbol_id: SymbolId, side: Side, price: Decimal, quantity: u64) -> Self {
        Self {
            symbol_id,
            price,
            quantity,
            side,
            order_id,
            kind: RequestKind::New,
        }
    }

    pub fn modify(order_id: OrderId, symbol_id: SymbolId, side: Side, price: Decimal, quantity: u64) -> Self {
        Self {
            kind: RequestKind::Modify,
            ..Self::new_order(order_id, symbol_id, side, price, quantity)
        }
    }

    pub fn cancel(order_id: OrderId, symbol_id: SymbolId, side: Side) -> Self {
        Self {
            kind: RequestKind::Cancel,
            ..Self::new_order(order_id, symbol_id, side, Decimal::ZERO, 0)
        }
    }
}

/// Downstream acknowledgement kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ResponseKind {
    Accept,
    Reject,
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseKind::Accept => f.write_str("Accept"),
            ResponseKind::Reject => f.write_str("Reject"),
        }
    }
}

/// Asynchronous acknowledgement for a previously dispatched order.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OrderResponse {
    pub order_id: OrderId,
    pub kind: ResponseKind,
}

/// Outcome of [`crate::OrderGateway::on_request`].
///
/// None of these are errors: `NotFound` is the normal outcome when a modify or cancel
/// loses the race against dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "result", content = "order_id", rename_all = "snake_case")]
pub enum AdmissionResult {
    Admitted,
    RejectedOutsideSession,
    ModifiedInPlace(OrderId),
    Cancelled(OrderId),
    NotFound(OrderId),
    /// A `New` request reused an id that is still pending.
    DuplicateOrderId(OrderId),
}

/// Outcome of [`crate::OrderGateway::on_response`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CorrelationResult {
    /// Round trip from send to response.
    Measured(Duration),
    /// Duplicate, late (evicted), or unknown id.
    Unmatched,
}

impl CorrelationResult {
    pub fn latency(&self) -> Option<Duration> {
        match self {
            CorrelationResult::Measured(d) => Some(*d),
            CorrelationResult::Unmatched => None,
        }
    }
}
