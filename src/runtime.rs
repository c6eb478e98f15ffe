//! Background cycles for a gateway: session polling and dispatch.
//!
//! Each cycle is a tokio task ticking on its configured interval. Both listen on one
//! broadcast shutdown channel; [`GatewayRuntime::shutdown`] signals them and waits for
//! them to finish. The session task logs out on the way down if it was logged on.

use crate::gateway::OrderGateway;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Handle to the running cycles of one [`OrderGateway`].
#[derive(Debug)]
pub struct GatewayRuntime {
    gateway: Arc<OrderGateway>,
    shutdown_tx: broadcast::Sender<()>,
    session_task: Option<JoinHandle<()>>,
    dispatch_task: Option<JoinHandle<()>>,
}

impl GatewayRuntime {
    /// Spawns both cycles on the current tokio runtime.
    pub fn start(gateway: Arc<OrderGateway>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        let session_task = tokio::spawn(run_session_cycle(
            Arc::clone(&gateway),
            gateway.session_poll_interval(),
            shutdown_tx.subscribe(),
        ));
        let dispatch_task = tokio::spawn(run_dispatch_cycle(
            Arc::clone(&gateway),
            gateway.dispatch_poll_interval(),
            shutdown_tx.subscribe(),
        ));
        info!(
            "gateway runtime started session_poll_ms={} dispatch_poll_ms={}",
            gateway.session_poll_interval().as_millis(),
            gateway.dispatch_poll_interval().as_millis()
        );
        Self {
            gateway,
            shutdown_tx,
            session_task: Some(session_task),
            dispatch_task: Some(dispatch_task),
        }
    }

    pub fn gateway(&self) -> &Arc<OrderGateway> {
        &self.gateway
    }

    /// Stops both cycles and waits for them to exit.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(());
        for task in [self.session_task.take(), self.dispatch_task.take()].into_iter().flatten() {
            if let Err(e) = task.await {
                warn!("gateway task ended abnormally: {}", e);
            }
        }
        info!("gateway runtime stopped");
    }
}

impl Drop for GatewayRuntime {
    fn drop(&mut self) {
        if self.session_task.is_some() || self.dispatch_task.is_some() {
            let _ = self.shutdown_tx.send(());
        }
    }
}

async fn run_session_cycle(gateway: Arc<OrderGateway>, every: Duration, mut shutdown_rx: broadcast::Receiver<()>) {
    let mut tick = tokio::time::interval(every);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = tick.tick() => {
                gateway.poll_session();
                gateway.evict_stale_sent_orders();
            }
            _ = shutdown_rx.recv() => {
                gateway.close_session();
                break;
            }
        }
    }
}

async fn run_dispatch_cycle(gateway: Arc<OrderGateway>, every: Duration, mut shutdown_rx: broadcast::Receiver<()>) {
    let mut tick = tokio::time::interval(every);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = tick.tick() => {
                gateway.run_dispatch_cycle();
            }
            _ = shutdown_rx.recv() => break,
        }
    }
}
