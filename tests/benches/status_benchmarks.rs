//! # Node Status Benchmarks
//!
//! | Path | Operation |
//! |------|-----------|
//! | Dispatcher | raw body → encoded response for cheap and index-backed methods |
//! | Header index | append with eviction, newest-N reads |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rpc_gateway::domain::ChainConfig;
use rpc_gateway::{strata_registry, GatewayMetrics, RpcDispatcher, StrataRpc};
use status_store::{HeaderIndex, NodeState, StatusIngest, StoreConfig};
use status_tests::integration::fixtures::{chain, chain_status, header};
use std::sync::Arc;

fn dispatcher_with_chain(n: u64) -> RpcDispatcher {
    let state = NodeState::shared(&StoreConfig::default());
    for h in chain(n) {
        state.append_header(h).expect("linked header");
    }
    state
        .update_status(chain_status(n - 1, n / 2, 0))
        .expect("status accepted");
    let rpc = StrataRpc::new(state, &ChainConfig::default());
    RpcDispatcher::new(
        strata_registry().expect("registry"),
        rpc,
        Arc::new(GatewayMetrics::new()),
    )
}

fn bench_dispatcher(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatcher");
    let dispatcher = dispatcher_with_chain(1024);

    let cases: [(&str, &[u8]); 4] = [
        (
            "block_time",
            br#"{"jsonrpc":"2.0","method":"strata_blockTime","params":[],"id":1}"#,
        ),
        (
            "client_status",
            br#"{"jsonrpc":"2.0","method":"strata_clientStatus","params":[],"id":1}"#,
        ),
        (
            "recent_headers_10",
            br#"{"jsonrpc":"2.0","method":"strata_getRecentBlockHeaders","params":[10],"id":1}"#,
        ),
        ("parse_error", br#"{"jsonrpc":"2.0","method":"#),
    ];

    for (name, body) in cases {
        group.bench_function(name, |b| b.iter(|| black_box(dispatcher.handle(body))));
    }
    group.finish();
}

fn bench_header_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("header_index");

    group.throughput(Throughput::Elements(4096));
    group.bench_function("append_4096_with_eviction", |b| {
        b.iter(|| {
            let index = HeaderIndex::new(1024);
            for idx in 0..4096 {
                index.append(header(idx)).expect("linked header");
            }
            black_box(index.len())
        })
    });

    let index = HeaderIndex::new(1024);
    for h in chain(1024) {
        index.append(h).expect("linked header");
    }
    for count in [1usize, 10, 100, 1024] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("recent", count), &count, |b, &count| {
            b.iter(|| black_box(index.recent(count)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dispatcher, bench_header_index);
criterion_main!(benches);
