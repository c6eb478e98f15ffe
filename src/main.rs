//! HTTP server for the order gateway.
//!
//! Endpoints: health, submit request, submit response, stats. Gateway settings come from
//! `GATEWAY_*` variables (see `config`); the listen port from `PORT`.

use order_gateway::{api, FileResponseLog, GatewayConfig, GatewayError, GatewayRuntime, LoggingDownstream, OrderGateway};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), GatewayError> {
    let _ = env_logger::try_init();
    let config = GatewayConfig::from_env()?;
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    let response_log = FileResponseLog::open(&config.response_log_path)?;
    let gateway = Arc::new(OrderGateway::new(
        config,
        Arc::new(LoggingDownstream),
        Arc::new(response_log),
    )?);
    let runtime = GatewayRuntime::start(Arc::clone(&gateway));

    let app = api::create_router(gateway);
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    log::info!("listening on http://{}", addr);
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    runtime.shutdown().await;
    Ok(())
}
