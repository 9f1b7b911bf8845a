//! The built-in `system_metrics` handler driven end to end through the loader
//! and the dispatch loop.

mod common;

use common::*;
use function_runtime::dispatch::{DispatchSettings, Dispatcher, TickOutcome};
use function_runtime::handlers::builtin_registry;
use function_runtime::loader::{HandlerLoader, SourceDescriptor};
use function_runtime::messaging::InMemoryChannelStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

fn close(actual: &Value, expected: f64) -> bool {
    actual
        .as_f64()
        .map(|v| (v - expected).abs() < 1e-9)
        .unwrap_or(false)
}

fn snapshot(cpu0: u64, cpu1: u64) -> Value {
    json!({
        "cpu_percent-0": cpu0,
        "cpu_percent-1": cpu1,
        "virtual_memory-cached": 100,
        "virtual_memory-buffers": 0,
        "virtual_memory-total": 1000,
        "net_io_counters_eth0-bytes_sent1": 10,
        "net_io_counters_eth0-bytes_recv1": 90
    })
}

fn metrics_dispatcher(dir: &TempDir) -> Dispatcher<Arc<InMemoryChannelStore>> {
    let path = write_module(dir.path(), "function.yaml", SYSTEM_METRICS_MODULE);
    let loader = HandlerLoader::new(Arc::new(builtin_registry().unwrap()));
    let bound = loader
        .resolve(&SourceDescriptor::file(path, "handler"))
        .unwrap();

    Dispatcher::new(
        Arc::new(InMemoryChannelStore::new()),
        bound,
        DispatchSettings::default(),
    )
}

#[tokio::test]
async fn test_metrics_snapshot_summary() {
    let dir = TempDir::new().unwrap();
    let mut dispatcher = metrics_dispatcher(&dir);
    let store = Arc::clone(dispatcher.store());

    store.put_json("events", &snapshot(40, 20));
    assert_eq!(dispatcher.tick().await, TickOutcome::Published);

    let output = store.get_json("results").unwrap();
    assert!(close(&output["percent-network-egress"], 10.0), "{output}");
    assert!(close(&output["percent-memory-caching"], 10.0), "{output}");
    assert!(close(&output["avg-util-cpu0-60sec"], 40.0 / 60.0), "{output}");
    assert!(close(&output["avg-util-cpu1-60sec"], 20.0 / 60.0), "{output}");
}

#[tokio::test]
async fn test_running_average_accumulates_in_context() {
    let dir = TempDir::new().unwrap();
    let mut dispatcher = metrics_dispatcher(&dir);
    let store = Arc::clone(dispatcher.store());

    store.put_json("events", &snapshot(40, 20));
    dispatcher.tick().await;
    store.put_json("events", &snapshot(100, 20));
    dispatcher.tick().await;

    let first = 40.0 / 60.0;
    let second = (first * 59.0 + 100.0) / 60.0;

    let output = store.get_json("results").unwrap();
    assert!(close(&output["avg-util-cpu0-60sec"], second), "{output}");
    assert!(
        close(
            &dispatcher.context().env["moving_avg_cpu"]["cpu_percent-0"],
            second
        ),
        "{:?}",
        dispatcher.context().env
    );
}

#[tokio::test]
async fn test_repeated_snapshot_is_not_reprocessed() {
    let dir = TempDir::new().unwrap();
    let mut dispatcher = metrics_dispatcher(&dir);
    let store = Arc::clone(dispatcher.store());

    store.put_json("events", &snapshot(40, 20));
    dispatcher.tick().await;
    dispatcher.tick().await;

    assert_eq!(store.write_count("results"), 1);
    let output = store.get_json("results").unwrap();
    assert!(close(&output["avg-util-cpu0-60sec"], 40.0 / 60.0));
}

#[tokio::test]
async fn test_zero_traffic_snapshot_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let mut dispatcher = metrics_dispatcher(&dir);
    let store = Arc::clone(dispatcher.store());

    store.put_json(
        "events",
        &json!({
            "net_io_counters_eth0-bytes_sent1": 0,
            "net_io_counters_eth0-bytes_recv1": 0
        }),
    );
    assert_eq!(dispatcher.tick().await, TickOutcome::HandlerFailed);
    assert_eq!(store.write_count("results"), 0);
}
