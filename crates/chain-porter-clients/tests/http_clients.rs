// chain-porter-clients/tests/http_clients.rs
// ============================================================================
// Module: HTTP Client Integration Tests
// Description: Collaborator clients exercised against a local HTTP server.
// Purpose: Verify request shapes, response parsing, and failure mapping.
// Dependencies: chain-porter-clients, chain-porter-config, tiny_http
// ============================================================================

//! ## Overview
//! Integration tests running the weather, pinning, storage, and artifact
//! clients against a local `tiny_http` server. Servers answer a fixed number
//! of requests and then stop; each test owns its server so ports never
//! collide.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    missing_docs,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions."
)]

use std::thread;

use chain_porter_clients::ArtifactSource;
use chain_porter_clients::ChainClient;
use chain_porter_clients::ChainError;
use chain_porter_clients::HttpChainClient;
use chain_porter_clients::PinningClient;
use chain_porter_clients::SessionProof;
use chain_porter_clients::StorageClient;
use chain_porter_clients::StorageError;
use chain_porter_clients::StorageGatewayClient;
use chain_porter_clients::WeatherClient;
use chain_porter_config::NetworkConfig;
use chain_porter_config::PinningConfig;
use chain_porter_config::StorageGatewayConfig;
use chain_porter_config::WeatherConfig;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

/// Starts a local server answering `expected_requests` requests with the
/// responder, then returns its base URL.
fn spawn_server(
    expected_requests: usize,
    responder: impl Fn(&str) -> (u16, String) + Send + 'static,
) -> (String, thread::JoinHandle<Vec<String>>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let base = format!("http://{}", server.server_addr());
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for _ in 0..expected_requests {
            let request = server.recv().unwrap();
            seen.push(format!("{} {}", request.method(), request.url()));
            let (status, body) = responder(request.url());
            let header = Header::from_bytes("Content-Type", "application/json").unwrap();
            let response = Response::from_string(body).with_status_code(status).with_header(header);
            let _ = request.respond(response);
        }
        seen
    });
    (base, handle)
}

fn weather_config(endpoint: &str) -> WeatherConfig {
    WeatherConfig {
        endpoint: endpoint.to_string(),
        ..WeatherConfig::default()
    }
}

fn local_network(endpoint: &str) -> NetworkConfig {
    NetworkConfig {
        chain_id: "localporter-1".to_string(),
        rpc_endpoint: endpoint.to_string(),
        address_prefix: "porter".to_string(),
        fee_denom: "uport".to_string(),
        fee_amount: 5_000,
        gas_limit: 200_000,
    }
}

const MNEMONIC: &str =
    "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima";

// ============================================================================
// SECTION: Chain Tests
// ============================================================================

#[test]
fn chain_connect_rejects_chain_id_mismatch() {
    let (base, handle) = spawn_server(1, |_| (200, r#"{"chain_id":"other-1"}"#.to_string()));
    let result = HttpChainClient::connect(&local_network(&base), MNEMONIC);
    assert!(matches!(result, Err(ChainError::Connect(_))));
    handle.join().unwrap();
}

#[test]
fn chain_connect_then_balance_round_trips() {
    let (base, handle) = spawn_server(2, |url| {
        if url == "/status" {
            (200, r#"{"chain_id":"localporter-1"}"#.to_string())
        } else {
            (200, r#"{"amount":"123456"}"#.to_string())
        }
    });
    let client = HttpChainClient::connect(&local_network(&base), MNEMONIC).unwrap();
    assert!(client.address().starts_with("porter1"));
    assert_eq!(client.balance("uport").unwrap(), 123_456);
    let seen = handle.join().unwrap();
    assert_eq!(seen[0], "GET /status");
    assert!(seen[1].starts_with("GET /balances/porter1"));
}

#[test]
fn chain_send_fails_fast_on_insufficient_funds() {
    let (base, handle) = spawn_server(2, |url| {
        if url == "/status" {
            (200, r#"{"chain_id":"localporter-1"}"#.to_string())
        } else {
            (200, r#"{"amount":"10"}"#.to_string())
        }
    });
    let client = HttpChainClient::connect(&local_network(&base), MNEMONIC).unwrap();
    let result = client.send_tokens("porter1dest", 1_000_000);
    assert!(matches!(result, Err(ChainError::InsufficientFunds { .. })));
    handle.join().unwrap();
}

// ============================================================================
// SECTION: Weather Tests
// ============================================================================

#[test]
fn weather_alerts_renders_remote_features() {
    let (base, handle) = spawn_server(1, |_| {
        (
            200,
            r#"{"features":[{"properties":{"event":"Flood Warning","areaDesc":"Yolo County","severity":"Severe","status":"Actual","headline":"Flooding tonight"}}]}"#
                .to_string(),
        )
    });
    let client = WeatherClient::new(&weather_config(&base)).unwrap();
    let rendered = client.alerts("ca").unwrap();
    assert!(rendered.starts_with("Active alerts for CA"));
    assert!(rendered.contains("Event: Flood Warning"));
    assert!(rendered.contains("Area: Yolo County"));
    let seen = handle.join().unwrap();
    assert_eq!(seen, vec!["GET /alerts?area=CA".to_string()]);
}

#[test]
fn weather_alerts_empty_yields_no_alerts_line() {
    let (base, handle) = spawn_server(1, |_| (200, r#"{"features":[]}"#.to_string()));
    let client = WeatherClient::new(&weather_config(&base)).unwrap();
    let rendered = client.alerts("WY").unwrap();
    assert_eq!(rendered, "No active alerts for WY");
    handle.join().unwrap();
}

#[test]
fn weather_forecast_follows_points_hop() {
    let server = Server::http("127.0.0.1:0").unwrap();
    let base = format!("http://{}", server.server_addr());
    let forecast_url = format!("{base}/gridpoints/XX/1,2/forecast");
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for _ in 0..2 {
            let request = server.recv().unwrap();
            seen.push(request.url().to_string());
            let body = if request.url().starts_with("/points/") {
                format!(r#"{{"properties":{{"forecast":"{forecast_url}"}}}}"#)
            } else {
                r#"{"properties":{"periods":[{"name":"Tonight","temperature":48,"temperatureUnit":"F","windSpeed":"3 mph","windDirection":"N","shortForecast":"Clear"}]}}"#
                    .to_string()
            };
            let header = Header::from_bytes("Content-Type", "application/json").unwrap();
            let response = Response::from_string(body).with_header(header);
            let _ = request.respond(response);
        }
        seen
    });
    let client = WeatherClient::new(&weather_config(&base)).unwrap();
    let rendered = client.forecast(38.5, -121.5).unwrap();
    assert!(rendered.contains("Tonight:"));
    assert!(rendered.contains("Temperature: 48°F"));
    assert!(rendered.contains("Wind: 3 mph N"));
    let seen = handle.join().unwrap();
    assert_eq!(seen[0], "/points/38.5000,-121.5000");
    assert_eq!(seen[1], "/gridpoints/XX/1,2/forecast");
}

// ============================================================================
// SECTION: Pinning Tests
// ============================================================================

#[test]
fn pinning_pin_posts_to_pins_and_parses_receipt() {
    let (base, handle) =
        spawn_server(1, |_| (200, r#"{"requestid":"req-7","status":"queued"}"#.to_string()));
    let config = PinningConfig {
        endpoint: base,
        ..PinningConfig::default()
    };
    let client = PinningClient::new(&config).unwrap();
    let receipt = client.pin("bafyexample").unwrap();
    assert_eq!(receipt.request_id, "req-7");
    assert_eq!(receipt.status, "queued");
    let seen = handle.join().unwrap();
    assert_eq!(seen, vec!["POST /pins".to_string()]);
}

#[test]
fn pinning_rejection_is_a_request_error() {
    let (base, handle) = spawn_server(1, |_| (503, String::new()));
    let config = PinningConfig {
        endpoint: base,
        ..PinningConfig::default()
    };
    let client = PinningClient::new(&config).unwrap();
    assert!(client.pin("bafyexample").is_err());
    handle.join().unwrap();
}

// ============================================================================
// SECTION: Storage Tests
// ============================================================================

fn storage_proof() -> SessionProof {
    SessionProof {
        address: "jkl1testaddr".to_string(),
        public_key: "cHVi".to_string(),
        signature: "c2ln".to_string(),
    }
}

#[test]
fn storage_session_upload_and_listing_flow() {
    let (base, handle) = spawn_server(3, |url| {
        if url == "/session" {
            (200, "{}".to_string())
        } else if url.starts_with("/files/jkl1testaddr/") {
            (200, r#"{"name":"a.txt","cid":"bafya","size_bytes":5}"#.to_string())
        } else {
            (200, r#"{"files":[{"name":"a.txt","cid":"bafya","size_bytes":5}]}"#.to_string())
        }
    });
    let config = StorageGatewayConfig {
        endpoint: base,
        ..StorageGatewayConfig::default()
    };
    let client = StorageGatewayClient::register_session_key(&config, &storage_proof()).unwrap();
    let descriptor = client.upload("a.txt", b"hello").unwrap();
    assert_eq!(descriptor.cid, "bafya");
    let listing = client.list_directory().unwrap();
    assert_eq!(listing.files.len(), 1);
    let seen = handle.join().unwrap();
    assert_eq!(seen[0], "POST /session");
    assert_eq!(seen[1], "PUT /files/jkl1testaddr/a.txt");
    assert_eq!(seen[2], "GET /files/jkl1testaddr");
}

#[test]
fn storage_missing_file_maps_to_not_found() {
    let (base, handle) = spawn_server(2, |url| {
        if url == "/session" {
            (200, "{}".to_string())
        } else {
            (404, String::new())
        }
    });
    let config = StorageGatewayConfig {
        endpoint: base,
        ..StorageGatewayConfig::default()
    };
    let client = StorageGatewayClient::register_session_key(&config, &storage_proof()).unwrap();
    assert!(matches!(client.download("missing.txt"), Err(StorageError::NotFound(_))));
    handle.join().unwrap();
}

#[test]
fn storage_rejected_session_fails_registration() {
    let (base, handle) = spawn_server(1, |_| (403, String::new()));
    let config = StorageGatewayConfig {
        endpoint: base,
        ..StorageGatewayConfig::default()
    };
    assert!(StorageGatewayClient::register_session_key(&config, &storage_proof()).is_err());
    handle.join().unwrap();
}

// ============================================================================
// SECTION: Artifact Tests
// ============================================================================

#[test]
fn artifact_remote_url_fetches_body() {
    let (base, handle) = spawn_server(1, |_| (200, "remote payload".to_string()));
    let source = ArtifactSource::RemoteUrl(format!("{base}/artifact.bin"));
    assert_eq!(source.load().unwrap(), b"remote payload");
    handle.join().unwrap();
}

#[test]
fn artifact_remote_error_status_fails_load() {
    let (base, handle) = spawn_server(1, |_| (500, String::new()));
    let source = ArtifactSource::RemoteUrl(format!("{base}/artifact.bin"));
    assert!(source.load().is_err());
    handle.join().unwrap();
}
