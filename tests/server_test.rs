//! Integration tests for the telemetry stats HTTP server

use chrono::Utc;
use std::time::Duration;
use telemetry_stats_agent::server::{run, ServerConfig};
use telemetry_stats_agent::DEFAULT_WINDOW;

async fn start_server() -> (std::net::SocketAddr, tokio::sync::oneshot::Sender<()>) {
    // Random port; every test gets its own server and its own store.
    let config = ServerConfig::new(0, DEFAULT_WINDOW);
    run(config).await.expect("Failed to start server")
}

async fn insert_data(client: &reqwest::Client, addr: std::net::SocketAddr, records: &[String]) {
    for record in records {
        let response = client
            .post(format!("http://{}/event", addr))
            .header("Content-Type", "text/csv")
            .body(record.clone())
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let (addr, shutdown_tx) = start_server().await;

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert!(body["version"].as_str().is_some());

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn test_stats_returns_zeros_when_no_events() {
    let (addr, shutdown_tx) = start_server().await;

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{}/stats", addr))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response.text().await.expect("Failed to read body"),
        "0,0.0000000000,0.0000000000,0,0.0000000000"
    );

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn test_accepts_valid_event() {
    let (addr, shutdown_tx) = start_server().await;

    let now = Utc::now().timestamp_millis();
    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/event", addr))
        .header("Content-Type", "text/plain")
        .body(format!("{now},0.0442672968,1282509067"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);
    assert_eq!(
        response.text().await.expect("Failed to read body"),
        "Successfully saved the data"
    );

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn test_rejects_x_out_of_range() {
    let (addr, shutdown_tx) = start_server().await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/event", addr))
        .body("1007341341814,1.0442672968,1282509067")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    assert_eq!(
        response.text().await.expect("Failed to read body"),
        "X must be in 0..1, but received 1.0442672968"
    );

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn test_rejects_y_out_of_range() {
    let (addr, shutdown_tx) = start_server().await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/event", addr))
        .body("1007341341814,0.0442672968,12825090670000")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    assert_eq!(
        response.text().await.expect("Failed to read body"),
        "Y must be in 1,073,741,823..2,147,483,647, but received 12825090670000"
    );

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn test_rejects_malformed_timestamp() {
    let (addr, shutdown_tx) = start_server().await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/event", addr))
        .body("yesterday,0.0442672968,1282509067")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    assert_eq!(
        response.text().await.expect("Failed to read body"),
        "Timestamp must be a Unix timestamp in millisecond resolution, but received yesterday"
    );

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn test_stats_for_distinct_timestamps() {
    let (addr, shutdown_tx) = start_server().await;

    let now = Utc::now().timestamp_millis();
    let records: Vec<String> = (1..=3)
        .map(|offset| format!("{},0.0442672968,1282509067", now + offset))
        .collect();

    let client = reqwest::Client::new();
    insert_data(&client, addr, &records).await;

    let response = client
        .get(format!("http://{}/stats", addr))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response.text().await.expect("Failed to read body"),
        "3,0.1328018904,0.0442672968,3847527201,1282509067.0000000000"
    );

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn test_stats_for_shared_timestamp() {
    let (addr, shutdown_tx) = start_server().await;

    let now = Utc::now().timestamp_millis();
    let records: Vec<String> = (0..3)
        .map(|_| format!("{now},0.0442672968,1282509067"))
        .collect();

    let client = reqwest::Client::new();
    insert_data(&client, addr, &records).await;

    let response = client
        .get(format!("http://{}/stats", addr))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response.text().await.expect("Failed to read body"),
        "3,0.1328018904,0.0442672968,3847527201,1282509067.0000000000"
    );

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn test_aged_out_event_is_accepted_but_not_counted() {
    let (addr, shutdown_tx) = start_server().await;

    let stale = Utc::now().timestamp_millis() - Duration::from_secs(120).as_millis() as i64;
    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/event", addr))
        .body(format!("{stale},0.0442672968,1282509067"))
        .send()
        .await
        .expect("Failed to send request");

    // Aging out is not a validation failure.
    assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);

    let response = client
        .get(format!("http://{}/stats", addr))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(
        response.text().await.expect("Failed to read body"),
        "0,0.0000000000,0.0000000000,0,0.0000000000"
    );

    let _ = shutdown_tx.send(());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_posts_to_one_timestamp() {
    let (addr, shutdown_tx) = start_server().await;

    let now = Utc::now().timestamp_millis();
    let record = format!("{now},0.0442672968,1282509067");

    let client = reqwest::Client::new();
    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let client = client.clone();
            let record = record.clone();
            tokio::spawn(async move {
                client
                    .post(format!("http://{}/event", addr))
                    .body(record)
                    .send()
                    .await
                    .expect("Failed to send request")
                    .status()
            })
        })
        .collect();
    for task in tasks {
        assert_eq!(task.await.unwrap(), reqwest::StatusCode::ACCEPTED);
    }

    let response = client
        .get(format!("http://{}/stats", addr))
        .send()
        .await
        .expect("Failed to send request");
    let body = response.text().await.expect("Failed to read body");
    assert!(
        body.starts_with("20,"),
        "expected all 20 merges reflected, got: {body}"
    );

    let _ = shutdown_tx.send(());
}
