//! End-to-end tests: monitor + HTTP coordinator client + mock coordinator.


use std::sync::atomic::Ordering;
use std::time::Duration;

use serde_json::json;

use clusterwatch::config::{StatusPolicy, WatchConfig};
use clusterwatch::monitor::Monitor;
use test_harness::{assert_eventually, unused_address, MockCoordinator};

fn nodes_body(worker: &str) -> serde_json::Value {
    json!({
        "nodes": [{
            "id": "1",
            "name": worker,
            "ip": "127.0.0.1",
            "port": "50051",
            "jobscount": 1,
            "jobs": [{
                "id": "0c8e4a59-1d3b-4f6f-a1f0-2b7d9e3c5a11",
                "duration": 0.5,
                "startTime": "2024-05-01T12:00:00Z",
                "finishTime": "0001-01-01T00:00:00Z"
            }]
        }]
    })
}

fn fast_config(address: &str) -> WatchConfig {
    WatchConfig::new(address)
        .with_poll_interval_ms(50)
        .with_request_timeout_ms(1000)
}

#[tokio::test]
async fn test_monitor_follows_coordinator_through_outage() {
    let mock = MockCoordinator::spawn(nodes_body("worker-1")).await;
    let monitor = Monitor::connect(&fast_config(&mock.address)).unwrap();

    assert_eventually(
        || async { monitor.snapshot().all_jobs().len() == 1 },
        Duration::from_secs(5),
        "First snapshot should contain the job",
    )
    .await;

    mock.set_status(500);
    assert_eventually(
        || async { monitor.snapshot().is_error() },
        Duration::from_secs(5),
        "Error status should be surfaced",
    )
    .await;
    assert_eq!(monitor.snapshot().all_jobs().len(), 0);

    mock.set_status(0);
    mock.set_nodes(nodes_body("worker-2"));
    assert_eventually(
        || async {
            let snap = monitor.snapshot();
            !snap.is_error() && snap.workers().first().map(|w| w.name.as_str()) == Some("worker-2")
        },
        Duration::from_secs(5),
        "Monitor should recover with fresh data",
    )
    .await;

    monitor.shutdown().await;
    assert!(!monitor.is_running());
}

#[tokio::test]
async fn test_skip_policy_keeps_last_snapshot_on_error_status() {
    let mock = MockCoordinator::spawn(nodes_body("worker-1")).await;
    let config = fast_config(&mock.address).with_status_policy(StatusPolicy::Skip);
    let monitor = Monitor::connect(&config).unwrap();

    assert_eventually(
        || async { monitor.snapshot().all_jobs().len() == 1 },
        Duration::from_secs(5),
        "First snapshot should contain the job",
    )
    .await;

    mock.set_status(503);
    let seen = mock.state.node_requests.load(Ordering::SeqCst);
    assert_eventually(
        || async { mock.state.node_requests.load(Ordering::SeqCst) >= seen + 3 },
        Duration::from_secs(5),
        "Poller should keep polling",
    )
    .await;

    let snap = monitor.snapshot();
    assert!(!snap.is_error());
    assert_eq!(snap.all_jobs().len(), 1);
}

#[tokio::test]
async fn test_address_change_switches_coordinator() {
    let mock = MockCoordinator::spawn(nodes_body("worker-1")).await;
    let dead = unused_address().await;
    let monitor = Monitor::connect(&fast_config(&dead)).unwrap();

    assert_eventually(
        || async { monitor.snapshot().error_message().starts_with("Transport error") },
        Duration::from_secs(5),
        "Unreachable coordinator should be surfaced",
    )
    .await;

    monitor.set_api_server(mock.address.clone());
    assert_eq!(monitor.api_server(), mock.address);

    assert_eventually(
        || async {
            let snap = monitor.snapshot();
            !snap.is_error() && snap.all_jobs().len() == 1
        },
        Duration::from_secs(5),
        "Monitor should pick up the new address",
    )
    .await;
}

#[tokio::test]
async fn test_submit_reaches_coordinator() {
    let mock = MockCoordinator::spawn(nodes_body("worker-1")).await;
    let monitor = Monitor::connect(&fast_config(&mock.address)).unwrap();

    let handle = monitor.submit(3, 0.05).await;
    let report = handle.wait().await;
    assert_eq!(report.issued, 3);

    assert_eventually(
        || async { mock.state.job_requests.load(Ordering::SeqCst) == 3 },
        Duration::from_secs(5),
        "All job requests should arrive",
    )
    .await;
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let config = WatchConfig::default().with_poll_interval_ms(0);
    assert!(Monitor::connect(&config).is_err());
}
