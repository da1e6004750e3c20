// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0
#![allow(missing_docs, dead_code)]

//! Test fixtures for the gateway routes
//!
//! Starts a gateway whose backends point at a wiremock server and provides the
//! provider payloads the route tests mount.

use std::net::SocketAddr;

use api::{
    Server, ServerConfig, ShutdownConfig,
    config::{AnchorageBackendConfig, BackendsConfig, BearerBackendConfig, TimeoutSeconds},
};
use serde_json::{Value, json};
use wiremock::MockServer;

pub const TEST_ACCESS_TOKEN: &str = "test-access-token";
pub const TEST_API_KEY: &str = "test-api-key";

/// Path prefix of the SDK-style and direct REST APIs
pub const API_PREFIX: &str = "/api/v2";

pub fn bearer_backend(mock_server: &MockServer) -> BearerBackendConfig {
    BearerBackendConfig {
        base_url: format!("{}{API_PREFIX}", mock_server.uri()),
        access_token: TEST_ACCESS_TOKEN.to_string(),
        timeout_seconds: TimeoutSeconds::testing(),
    }
}

pub fn anchorage_backend(mock_server: &MockServer) -> AnchorageBackendConfig {
    AnchorageBackendConfig {
        base_url: mock_server.uri(),
        api_key: TEST_API_KEY.to_string(),
        timeout_seconds: TimeoutSeconds::testing(),
    }
}

/// Every backend enabled against `mock_server`
pub fn all_backends(mock_server: &MockServer) -> BackendsConfig {
    BackendsConfig {
        legacy_sdk: bearer_backend(mock_server),
        direct_rest: bearer_backend(mock_server),
        anchorage: anchorage_backend(mock_server),
        ..BackendsConfig::default()
    }
}

/// Start a gateway on an ephemeral port
pub async fn spawn_gateway(backends: BackendsConfig) -> SocketAddr {
    let config = ServerConfig::for_testing().with_backends(backends);
    let (addr, _) = Server::new(config, ShutdownConfig::default())
        .expect("Failed to create server")
        .run_for_testing()
        .await
        .expect("Failed to start test server");
    addr
}

pub async fn get_json(url: String) -> (u16, Value) {
    let response = reqwest::get(url).await.expect("Failed to send request");
    let status = response.status().as_u16();
    let body = response.json().await.expect("Response is not JSON");
    (status, body)
}

pub fn wallet(id: &str, coin: &str, balance: u64) -> Value {
    json!({
        "id": id,
        "label": format!("{coin} wallet {id}"),
        "coin": coin,
        "balance": balance,
        "balanceString": balance.to_string(),
        "confirmedBalanceString": balance.to_string(),
        "spendableBalanceString": balance.to_string()
    })
}

pub fn wallets(coin: &str, ids: &[&str]) -> Value {
    let wallets: Vec<_> = ids.iter().map(|id| wallet(id, coin, 10_000)).collect();
    json!({"coin": coin, "wallets": wallets})
}

pub fn transfer(id: &str, coin: &str, wallet: &str) -> Value {
    json!({
        "id": id,
        "coin": coin,
        "wallet": wallet,
        "txid": format!("tx-{id}"),
        "height": 2_800_000,
        "date": "2024-05-01T10:00:00.000Z",
        "valueString": "-25000",
        "state": "confirmed"
    })
}
