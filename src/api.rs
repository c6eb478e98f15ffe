//! REST API router for the gateway.
//!
//! Used by the binary and by integration tests. Create with [`create_router`].
//! Uses Extension for state so the router is `Router<()>` and works with `into_make_service()`.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::{CorrelationResult, OrderGateway, OrderRequest, OrderResponse};

/// Shared app state: the gateway the handlers forward to.
#[derive(Clone)]
pub struct AppState {
    pub(crate) gateway: Arc<OrderGateway>,
}

/// Builds the REST router. Returns `Router<()>` so you can call `.into_make_service()` for `axum::serve`.
pub fn create_router(gateway: Arc<OrderGateway>) -> Router<()> {
    let state = AppState { gateway };
    Router::new()
        .route("/health", get(health))
        .route("/orders", post(submit_request))
        .route("/responses", post(submit_response))
        .route("/stats", get(stats))
        .layer(Extension(state))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn submit_request(
    Extension(state): Extension<AppState>,
    Json(request): Json<OrderRequest>,
) -> Response {
    let result = state.gateway.on_request(request);
    (StatusCode::OK, Json(result)).into_response()
}

async fn submit_response(
    Extension(state): Extension<AppState>,
    Json(response): Json<OrderResponse>,
) -> Response {
    #[derive(serde::Serialize)]
    struct Out {
        matched: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        latency_secs: Option<f64>,
    }
    let out = match state.gateway.on_response(response) {
        CorrelationResult::Measured(latency) => Out {
            matched: true,
            latency_secs: Some(latency.as_secs_f64()),
        },
        CorrelationResult::Unmatched => Out {
            matched: false,
            latency_secs: None,
        },
    };
    (StatusCode::OK, Json(out)).into_response()
}

async fn stats(Extension(state): Extension<AppState>) -> Response {
    #[derive(serde::Serialize)]
    struct Out {
        pending: usize,
        awaiting_response: usize,
        session_open: bool,
        logged_on: bool,
    }
    let gateway = &state.gateway;
    let out = Out {
        pending: gateway.pending_len(),
        awaiting_response: gateway.sent_len(),
        session_open: gateway.is_session_open(),
        logged_on: gateway.is_logged_on(),
    };
    (StatusCode::OK, Json(out)).into_response()
}
