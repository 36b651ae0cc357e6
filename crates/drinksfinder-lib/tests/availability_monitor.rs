mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use drinksfinder_lib::{AvailabilityMonitor, BackendClient, HealthState};
use httpmock::prelude::*;
use reqwest::Url;

use common::{backend_client, backend_client_with_timeout};

#[tokio::test]
async fn probe_records_backend_state() {
    let server = MockServer::start_async().await;
    let mut ready = server
        .mock_async(|when, then| {
            when.method(GET).path("/ready");
            then.status(503);
        })
        .await;

    let health = HealthState::default();
    let monitor = AvailabilityMonitor::new(backend_client(&server), health.clone());

    assert!(!monitor.probe_once().await);
    assert!(!health.is_healthy());

    ready.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ready");
            then.status(200).body("OK");
        })
        .await;

    assert!(monitor.probe_once().await);
    assert!(health.is_healthy());
}

#[tokio::test]
async fn unreachable_backend_is_unhealthy() {
    // Port 9 (discard) on localhost is not expected to accept connections.
    let url = Url::parse("http://127.0.0.1:9/").unwrap();
    let backend = BackendClient::new(url, Duration::from_millis(200)).unwrap();
    let health = HealthState::default();

    AvailabilityMonitor::new(backend, health.clone())
        .probe_once()
        .await;

    assert!(!health.is_healthy());
}

#[tokio::test]
async fn spawned_monitor_keeps_probing() {
    let server = MockServer::start_async().await;
    let ready = server
        .mock_async(|when, then| {
            when.method(GET).path("/ready");
            then.status(200);
        })
        .await;

    let health = HealthState::new(false);
    let handle = AvailabilityMonitor::new(backend_client(&server), health.clone())
        .with_interval(Duration::from_millis(50))
        .spawn();

    tokio::time::sleep(Duration::from_millis(300)).await;
    handle.abort();

    assert!(health.is_healthy());
    assert!(ready.hits_async().await >= 2);
}

#[tokio::test]
async fn hung_backend_is_unhealthy_within_one_interval() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ready");
            then.status(200).delay(Duration::from_millis(1500));
        })
        .await;

    let probes = Arc::new(AtomicUsize::new(0));
    let counter = probes.clone();
    let health = HealthState::default();
    let handle = AvailabilityMonitor::new(
        backend_client_with_timeout(&server, Duration::from_secs(10)),
        health.clone(),
    )
    .with_interval(Duration::from_millis(100))
    .with_observer(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    })
    .spawn();

    tokio::time::sleep(Duration::from_millis(400)).await;
    handle.abort();

    assert!(!health.is_healthy());
    assert!(probes.load(Ordering::SeqCst) >= 2);
}

#[tokio::test]
async fn observer_sees_every_probe_result() {
    let server = MockServer::start_async().await;
    let mut ready = server
        .mock_async(|when, then| {
            when.method(GET).path("/ready");
            then.status(200);
        })
        .await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let monitor = AvailabilityMonitor::new(backend_client(&server), HealthState::default())
        .with_interval(Duration::from_secs(1))
        .with_observer(move |available| sink.lock().unwrap().push(available));

    monitor.probe_once().await;
    monitor.probe_once().await;

    ready.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ready");
            then.status(500);
        })
        .await;
    monitor.probe_once().await;

    assert_eq!(*seen.lock().unwrap(), vec![true, true, false]);
}
