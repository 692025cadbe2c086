//! HTTP transport against a local axum stand-in for the remote service

use axum::{
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::time::Duration;
use ternion_client::*;
use ternion_core::*;

async fn run_handler(headers: HeaderMap, Json(task): Json<Value>) -> ([(&'static str, &'static str); 1], Json<Value>) {
    let seen = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string()
    };
    let state = if task["subject"] == "skeptic" { "T" } else { "P" };
    (
        [("x-ternion-trit", "PPPPPPPPP")],
        Json(json!({
            "state": state,
            "echo": task,
            "seen_header": seen("x-ternion-trit"),
            "seen_version": seen("x-ternion-version"),
        })),
    )
}

async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn healthy_service() -> SocketAddr {
    let app = Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/run", post(run_handler));
    spawn_server(app).await
}

fn client_for(addr: SocketAddr, timeout_secs: u64) -> ConsensusClient {
    let config = ClientConfig {
        base_url: format!("http://{}/", addr),
        timeout_secs,
        ..ClientConfig::default()
    };
    ConsensusClient::new(config).unwrap()
}

// ===========================================================================
// Wire format
// ===========================================================================

#[tokio::test]
async fn sends_task_body_header_and_version() {
    let addr = healthy_service().await;
    let client = client_for(addr, 5);

    let result = client.run("PUSH 10\nPUSH 20\nADD\nEND").await;
    assert!(result.is_success(), "got {}", result);

    let ResultData::Json(body) = result.data() else {
        panic!("Expected Json data");
    };
    assert_eq!(body["echo"]["type"], "execute");
    assert_eq!(body["echo"]["subject"], "sdk-rs");
    assert_eq!(body["echo"]["payload"], "PUSH 10\nPUSH 20\nADD\nEND");
    assert!(body["echo"].get("params").is_none());
    assert_eq!(body["seen_header"], "PPPOOOOOO");
    assert_eq!(body["seen_version"], PROTOCOL_VERSION);
}

#[tokio::test]
async fn adopts_returned_header() {
    let addr = healthy_service().await;
    let client = client_for(addr, 5);

    client.ask("hello", None).await;
    assert_eq!(client.current_header().await.serialize(), "PPPPPPPPP");

    let second = client.ask("again", None).await;
    let ResultData::Json(body) = second.data() else {
        panic!("Expected Json data");
    };
    assert_eq!(body["seen_header"], "PPPPPPPPP");
}

#[tokio::test]
async fn consensus_over_http() {
    let addr = healthy_service().await;
    let client = client_for(addr, 5);

    let outcome = client
        .consensus_call("is it safe?", &["claude", "skeptic", "gemini"])
        .await;
    assert_eq!(outcome.trits, vec![Trit::Success, Trit::Failed, Trit::Success]);
    assert_eq!(outcome.consensus, Trit::Success);
}

#[tokio::test]
async fn ping_hits_root() {
    let addr = healthy_service().await;
    assert!(client_for(addr, 5).ping().await.is_success());
}

// ===========================================================================
// Failures
// ===========================================================================

#[tokio::test]
async fn error_status_is_failed() {
    let app = Router::new().route(
        "/run",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let addr = spawn_server(app).await;
    let result = client_for(addr, 5).run("PUSH 1").await;
    assert!(result.is_failed());
    let text = result.data().as_text().unwrap();
    assert!(text.contains("500"), "got {}", text);
    assert!(text.contains("boom"), "got {}", text);
}

#[tokio::test]
async fn undecodable_body_is_failed() {
    let app = Router::new().route("/run", post(|| async { "definitely not json" }));
    let addr = spawn_server(app).await;
    let result = client_for(addr, 5).run("PUSH 1").await;
    assert!(result.is_failed());
    assert!(result.data().as_text().unwrap().contains("invalid response"));
}

#[tokio::test]
async fn connection_refused_is_failed_and_recorded() {
    // grab a free port, then close it
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let client = client_for(addr, 5);

    let result = client.run("PUSH 1").await;
    assert!(result.is_failed());
    assert!(client.ping().await.is_failed());

    let history = client.history().await;
    assert_eq!(history.len(), 1);
    assert!(history[0].is_failed());
}

#[tokio::test]
async fn slow_service_times_out() {
    let app = Router::new().route(
        "/run",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({ "state": "P" }))
        }),
    );
    let addr = spawn_server(app).await;
    let result = client_for(addr, 1).run("PUSH 1").await;
    assert!(result.is_failed());
}
