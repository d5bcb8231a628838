//! HTTP client tests against a mock coordinator on a local port.


use std::sync::atomic::Ordering;
use std::time::Duration;

use serde_json::json;

use clusterwatch::coordinator::{Coordinator, HttpCoordinator};
use clusterwatch::error::WatchError;
use test_harness::{unused_address, MockCoordinator};

fn nodes_body() -> serde_json::Value {
    json!({
        "nodes": [{
            "id": "5f0c6a2e-8f43-4a77-9e59-4a3c1d2b7e10",
            "name": "worker-1",
            "ip": "10.0.0.5",
            "port": "50051",
            "jobscount": 2,
            "jobs": [
                {
                    "id": "0c8e4a59-1d3b-4f6f-a1f0-2b7d9e3c5a11",
                    "per": 1.0,
                    "duration": 4.2,
                    "startTime": "2024-05-01T12:00:00Z",
                    "finishTime": "2024-05-01T12:00:04Z"
                },
                {
                    "id": "7d1e2f30-5c6b-4a8d-9e0f-1a2b3c4d5e6f",
                    "per": 1.0,
                    "duration": 0.4,
                    "startTime": "2024-05-01T12:01:00Z",
                    "finishTime": "0001-01-01T00:00:00Z"
                }
            ]
        }]
    })
}

#[tokio::test]
async fn test_get_all_nodes_decodes_response() {
    let mock = MockCoordinator::spawn(nodes_body()).await;
    let client = HttpCoordinator::new();

    let nodes = client.get_all_nodes(&mock.address).await.unwrap();

    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].name, "worker-1");
    assert_eq!(nodes[0].jobscount, 2);
    assert_eq!(nodes[0].jobs.len(), 2);
    assert_eq!(nodes[0].jobs[1].finish_time, "0001-01-01T00:00:00Z");
    assert_eq!(mock.state.node_requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_error_status_is_reported_as_status() {
    let mock = MockCoordinator::spawn(nodes_body()).await;
    mock.set_status(500);

    let err = HttpCoordinator::new()
        .get_all_nodes(&mock.address)
        .await
        .unwrap_err();

    assert!(matches!(err, WatchError::Status(500)));
    assert!(err.is_status());
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let mock = MockCoordinator::spawn(nodes_body()).await;
    mock.set_raw_body("<html>gateway</html>");

    let err = HttpCoordinator::new()
        .get_all_nodes(&mock.address)
        .await
        .unwrap_err();

    assert!(matches!(err, WatchError::Decode(_)));
}

#[tokio::test]
async fn test_wrong_shape_is_decode_error() {
    let mock = MockCoordinator::spawn(json!({ "nodes": [{ "id": "only-an-id" }] })).await;

    let err = HttpCoordinator::new()
        .get_all_nodes(&mock.address)
        .await
        .unwrap_err();

    assert!(matches!(err, WatchError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_address_is_transport_error() {
    let address = unused_address().await;

    let err = HttpCoordinator::new()
        .get_all_nodes(&address)
        .await
        .unwrap_err();

    assert!(matches!(err, WatchError::Transport(_)));
    assert!(!err.is_status());
}

#[tokio::test]
async fn test_malformed_address_is_transport_error() {
    let err = HttpCoordinator::new()
        .get_all_nodes("not a valid host:port")
        .await
        .unwrap_err();

    assert!(matches!(err, WatchError::Transport(_)));
}

#[tokio::test]
async fn test_request_timeout_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();
    // Accept connections and never answer.
    let server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let err = HttpCoordinator::new()
        .with_timeout(Some(Duration::from_millis(200)))
        .get_all_nodes(&address)
        .await
        .unwrap_err();

    assert!(matches!(err, WatchError::Transport(_)));
    server.abort();
}

#[tokio::test]
async fn test_new_job_returns_acknowledgement() {
    let mock = MockCoordinator::spawn(nodes_body()).await;
    let client = HttpCoordinator::new();

    let first = client.new_job(&mock.address).await.unwrap();
    let second = client.new_job(&mock.address).await.unwrap();

    assert_eq!(first["id"], "job-1");
    assert_eq!(second["id"], "job-2");
    assert_eq!(mock.state.job_requests.load(Ordering::SeqCst), 2);
}
