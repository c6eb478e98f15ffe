//! # Order Gateway
//!
//! Order admission gateway: accepts new/modify/cancel instructions, holds them in a
//! FIFO pending store, and releases them downstream at a bounded rate while the
//! daily session window is open. Downstream acknowledgements are correlated with the
//! sent orders to measure round-trip latency.
//!
//! ## Entry point
//!
//! Use [`OrderGateway`] as the single entry point: create with [`OrderGateway::new`],
//! then [`OrderGateway::on_request`] and [`OrderGateway::on_response`]. Start the
//! session and dispatch cycles with [`GatewayRuntime::start`].
//!
//! ## Example
//!
//! ```rust
//! use order_gateway::{
//!     AdmissionResult, GatewayConfig, InMemoryResponseLog, OrderGateway, OrderId, OrderRequest,
//!     RecordingDownstream, SessionWindow, Side, SymbolId,
//! };
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! let window = SessionWindow::full_day();
//! let config = GatewayConfig {
//!     max_orders_per_second: 2,
//!     session_start: window.start,
//!     session_end: window.end,
//!     ..Default::default()
//! };
//! let downstream = RecordingDownstream::new();
//! let gateway = OrderGateway::new(
//!     config,
//!     Arc::new(downstream.clone()),
//!     Arc::new(InMemoryResponseLog::new()),
//! )
//! .unwrap();
//! let order = OrderRequest::new_order(OrderId(1), SymbolId(1), Side::Buy, Decimal::from(100), 10);
//! assert_eq!(gateway.on_request(order), AdmissionResult::Admitted);
//! assert_eq!(gateway.run_dispatch_cycle(), 1);
//! assert_eq!(downstream.sent_orders().len(), 1);
//! ```
//!
//! ## Lower-level API
//!
//! [`PendingOrderStore`], [`drain_cycle`], [`SessionGate`], and [`ResponseCorrelator`]
//! can be used directly if you manage locking and time yourself.

pub mod api;
pub mod clock;
pub mod config;
pub mod correlator;
pub mod dispatcher;
pub mod downstream;
pub mod error;
pub mod gateway;
pub mod order_flow_gen;
pub mod pending;
pub mod response_log;
pub mod runtime;
pub mod session;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::GatewayConfig;
pub use correlator::ResponseCorrelator;
pub use dispatcher::{drain_cycle, RateWindow};
pub use downstream::{Downstream, DownstreamEvent, LoggingDownstream, RecordingDownstream};
pub use error::GatewayError;
pub use gateway::OrderGateway;
pub use order_flow_gen::{replay_into_gateway, Generator, GeneratorConfig, ReplaySummary};
pub use pending::PendingOrderStore;
pub use response_log::{FileResponseLog, InMemoryResponseLog, LoggedResponse, ResponseLog};
pub use runtime::GatewayRuntime;
pub use session::{SessionGate, SessionTransition, SessionWindow};
pub use types::{
    AdmissionResult, CorrelationResult, OrderId, OrderRequest, OrderResponse, RequestKind, ResponseKind, Side,
    SymbolId,
};
