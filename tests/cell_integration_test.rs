//! Integration tests for metric cells: concurrent updates, cross-bundle
//! combines, and export behavior.

use std::collections::BTreeMap;
use std::sync::Arc;

use tally::cell::{
    CounterCell, CounterCellFactory, DistributionCell, GaugeCell, MetricCell, MetricCellFactory,
    MetricSnapshot, MetricUpdate, StringSetCell, StringSetCellFactory,
};
use tally::core::{ContextId, ManualClock, MetricKind, MetricName};

#[test]
fn test_concurrent_counter_updates_lose_nothing() {
    const THREADS: usize = 8;
    const INCREMENTS: usize = 10_000;

    let cell = CounterCell::new();
    std::thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                for _ in 0..INCREMENTS {
                    cell.inc(1);
                }
            });
        }
    });

    assert_eq!(cell.value(), (THREADS * INCREMENTS) as i64);
}

#[test]
fn test_concurrent_distribution_updates() {
    const THREADS: usize = 4;
    const OBSERVATIONS: usize = 5_000;

    let cell = DistributionCell::new();
    std::thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                for value in 1..=OBSERVATIONS as i64 {
                    cell.observe(value);
                }
            });
        }
    });

    let data = cell.cumulative_data();
    assert_eq!(data.count, (THREADS * OBSERVATIONS) as i64);
    assert_eq!(data.min, 1);
    assert_eq!(data.max, OBSERVATIONS as i64);
}

#[test]
fn test_combine_while_one_cell_is_still_updating() {
    // The hardened combine snapshots each side under its own lock, so
    // merging during a concurrent update burst must never tear state.
    let live = Arc::new(CounterCell::new());
    let finished = CounterCell::new();
    finished.inc(1_000);

    let writer = {
        let live = Arc::clone(&live);
        std::thread::spawn(move || {
            for _ in 0..50_000 {
                live.inc(1);
            }
        })
    };

    let merged = finished.combine(&live);
    writer.join().unwrap();

    let observed = merged.value();
    assert!(observed >= 1_000);
    assert!(observed <= 1_000 + 50_000);
    assert_eq!(live.value(), 50_000);
}

#[test]
fn test_bundle_aggregation_scenario() {
    // Two bundles process records independently; the runner folds their
    // cells into a global result afterwards.
    let factory = CounterCellFactory::new();
    let bundle_a = factory.create();
    let bundle_b = factory.create();

    for _ in 0..5 {
        bundle_a.update(MetricUpdate::Int(1)).unwrap();
    }
    for _ in 0..3 {
        bundle_b.update(MetricUpdate::Int(1)).unwrap();
    }

    let a = bundle_a.cumulative().as_counter().unwrap();
    let b = bundle_b.cumulative().as_counter().unwrap();
    assert_eq!(a + b, 8);

    // Originals are unchanged after reading.
    assert_eq!(bundle_a.cumulative(), MetricSnapshot::Counter(5));
    assert_eq!(bundle_b.cumulative(), MetricSnapshot::Counter(3));
}

#[test]
fn test_gauge_ordering_across_cells() {
    let clock = Arc::new(ManualClock::new(1_000));
    let worker_one = GaugeCell::with_clock(clock.clone());
    let worker_two = GaugeCell::with_clock(clock.clone());

    worker_one.set(10);
    clock.advance_millis(100);
    worker_two.set(20);

    let merged = worker_one.combine(&worker_two);
    assert_eq!(merged.result().value(), Some(20));
}

#[test]
fn test_string_set_combine_across_workers() {
    let a = StringSetCell::new();
    let b = StringSetCell::new();
    a.extend(["payments", "orders"]);
    b.extend(["orders", "inventory"]);

    let merged = a.combine(&b);
    let data = merged.cumulative_data();
    assert_eq!(data.len(), 3);
    assert!(data.contains("payments"));
    assert!(data.contains("orders"));
    assert!(data.contains("inventory"));
}

#[test]
fn test_export_start_time_is_stable() {
    let clock = Arc::new(ManualClock::new(50_000));
    let cell = CounterCell::with_clock(clock.clone());
    let name = MetricName::user("my.pipeline", "records_read").unwrap();
    let context = ContextId::new("bundle-7").unwrap();

    cell.inc(1);
    let first = cell.to_monitoring_record(&name, &context);
    clock.advance_millis(60_000);
    cell.inc(1);
    let second = cell.to_monitoring_record(&name, &context);

    assert_eq!(first.start_time, second.start_time);
    assert_eq!(first.start_time.timestamp_millis(), 50_000);
    // The snapshot is fresh even though the start time is not.
    assert_eq!(second.payload.kind(), MetricKind::Counter);
    assert_ne!(first.payload, second.payload);
}

#[test]
fn test_export_record_serializes() {
    let mut labels = BTreeMap::new();
    labels.insert("ptransform".to_string(), "ReadRecords".to_string());
    let name = MetricName::urn("tally:metric:element_count:v1", labels).unwrap();
    let context = ContextId::new("bundle-9").unwrap();

    let cell = DistributionCell::new();
    for value in [1, 5, 3] {
        cell.observe(value);
    }

    let record = cell.to_monitoring_record(&name, &context);
    let json = record.to_json().unwrap();
    assert!(json.contains("tally:metric:element_count:v1"));
    assert!(json.contains("bundle-9"));
    assert!(json.contains("\"count\": 3"));
}

#[test]
fn test_factory_created_cells_are_independent() {
    let factory = StringSetCellFactory::new();
    let one = factory.create();
    let two = factory.create();

    one.update(MetricUpdate::from("only-in-one")).unwrap();
    assert_eq!(one.cumulative().as_string_set().unwrap().len(), 1);
    assert!(two.cumulative().as_string_set().unwrap().is_empty());
}

#[test]
fn test_reset_returns_cells_to_identity() {
    let counter = CounterCell::new();
    let distribution = DistributionCell::new();
    let gauge = GaugeCell::new();
    let strings = StringSetCell::new();

    counter.inc(5);
    distribution.observe(5);
    gauge.set(5);
    strings.add("five");

    for cell in [
        &counter as &dyn MetricCell,
        &distribution,
        &gauge,
        &strings,
    ] {
        cell.reset();
    }

    assert_eq!(counter.value(), 0);
    assert!(distribution.cumulative_data().is_empty());
    assert_eq!(gauge.result().value(), None);
    assert!(strings.cumulative_data().is_empty());
}
