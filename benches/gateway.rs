//! Gateway performance benchmarks (Criterion).
//!
//! Run: `cargo bench` or `cargo bench --bench gateway`.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use order_gateway::{
    GatewayConfig, Generator, GeneratorConfig, InMemoryResponseLog, OrderGateway, OrderId, OrderRequest,
    RecordingDownstream, SessionWindow, Side, SymbolId,
};
use rust_decimal::Decimal;
use std::sync::Arc;

fn gateway(max_orders_per_second: u32) -> OrderGateway {
    let window = SessionWindow::full_day();
    let config = GatewayConfig {
        max_orders_per_second,
        session_start: window.start,
        session_end: window.end,
        ..Default::default()
    };
    OrderGateway::new(
        config,
        Arc::new(RecordingDownstream::new()),
        Arc::new(InMemoryResponseLog::new()),
    )
    .unwrap()
}

fn new_orders(n: usize) -> Vec<OrderRequest> {
    (1..=n as u64)
        .map(|id| OrderRequest::new_order(OrderId(id), SymbolId(1), Side::Buy, Decimal::from(100), 1))
        .collect()
}

fn bench_admit_mixed_stream(c: &mut Criterion) {
    const N: usize = 1000;
    let mut group = c.benchmark_group("gateway");
    group.throughput(Throughput::Elements(N as u64));
    group.bench_function("admit_mixed_1000", |b| {
        b.iter_batched(
            || {
                let requests = Generator::new(GeneratorConfig {
                    seed: 42,
                    num_requests: N,
                    ..Default::default()
                })
                .all_requests();
                (gateway(100), requests)
            },
            |(gateway, requests)| {
                for request in requests {
                    gateway.on_request(request);
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_cancel_deep_queue(c: &mut Criterion) {
    const PENDING: usize = 5_000;
    const CANCELS_PER_ITER: usize = 100;
    let mut group = c.benchmark_group("gateway");
    group.throughput(Throughput::Elements(CANCELS_PER_ITER as u64));
    group.bench_function("cancel_100_from_5000_pending", |b| {
        b.iter_batched(
            || {
                let gateway = gateway(100);
                for request in new_orders(PENDING) {
                    gateway.on_request(request);
                }
                // Spread cancels across the queue, tail included.
                let cancels: Vec<OrderRequest> = (0..CANCELS_PER_ITER)
                    .map(|i| {
                        let id = (PENDING - i * (PENDING / CANCELS_PER_ITER)) as u64;
                        OrderRequest::cancel(OrderId(id), SymbolId(1), Side::Buy)
                    })
                    .collect();
                (gateway, cancels)
            },
            |(gateway, cancels)| {
                for cancel in cancels {
                    gateway.on_request(cancel);
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_dispatch_cycle(c: &mut Criterion) {
    const PENDING: usize = 1000;
    let mut group = c.benchmark_group("gateway");
    group.throughput(Throughput::Elements(PENDING as u64));
    group.bench_function("dispatch_1000_in_one_cycle", |b| {
        b.iter_batched(
            || {
                let gateway = gateway(PENDING as u32);
                for request in new_orders(PENDING) {
                    gateway.on_request(request);
                }
                gateway
            },
            |gateway| {
                assert_eq!(gateway.run_dispatch_cycle(), PENDING);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_admit_mixed_stream,
    bench_cancel_deep_queue,
    bench_dispatch_cycle
);
criterion_main!(benches);
