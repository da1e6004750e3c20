// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for `AnchorageAdapter`

use custody_client::{
    BackendError, BackendKind, Capability, CoinId, CustodyBackend, ErrorKind, PageRequest,
    TransferState, WalletFilter,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param, query_param_is_missing},
};

use fixtures::*;

fn coin(value: &str) -> CoinId {
    CoinId::new(value).unwrap()
}

/// Test listing asset types with the API key header
#[tokio::test]
async fn asset_types_success() {
    let mock_server = MockServer::start().await;
    let adapter = anchorage_adapter(&mock_server);

    Mock::given(method("GET"))
        .and(path("/v2/asset-types"))
        .and(header("api-access-key", TEST_API_KEY))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(AnchorageFixture::asset_types()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let assets = adapter.asset_types().await.unwrap();

    assert_eq!(assets.len(), 3);
    assert_eq!(assets[0].coin.as_str(), "BTC");
    assert_eq!(assets[0].decimal_places, 8);
    assert_eq!(assets[2].full_name, "USD Coin");
    assert_eq!(assets[2].family, "ETH");
}

/// Test that a wrapped asset type listing under its own key is accepted
#[tokio::test]
async fn asset_types_named_envelope() {
    let mock_server = MockServer::start().await;
    let adapter = anchorage_adapter(&mock_server);

    Mock::given(method("GET"))
        .and(path("/v2/asset-types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "assetTypes": [{"assetType": "SOL"}]
        })))
        .mount(&mock_server)
        .await;

    let assets = adapter.asset_types().await.unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].full_name, "SOL");
    assert_eq!(assets[0].decimal_places, 0);
}

/// Test that vault wallets are projected per asset holding
#[tokio::test]
async fn vault_wallets_success() {
    let mock_server = MockServer::start().await;
    let adapter = anchorage_adapter(&mock_server);

    Mock::given(method("GET"))
        .and(path("/v2/vaults/vault-1/wallets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(AnchorageFixture::vault_wallets()))
        .mount(&mock_server)
        .await;

    let wallets = adapter.vault_wallets("vault-1").await.unwrap();

    let holdings: Vec<_> = wallets
        .iter()
        .map(|wallet| (wallet.id.as_str(), wallet.coin.as_str()))
        .collect();
    assert_eq!(
        holdings,
        [("aw-eth", "ETH"), ("aw-eth", "USDC"), ("aw-btc", "BTC")]
    );

    let usdc = &wallets[1];
    assert_eq!(usdc.balance, None);
    assert_eq!(usdc.balance_display.as_deref(), Some("1500.25"));
    assert_eq!(usdc.label.as_deref(), Some("Operations"));
}

/// Test that the generic wallet listing filters the vault by coin
#[tokio::test]
async fn list_wallets_filters_by_coin() {
    let mock_server = MockServer::start().await;
    let adapter = anchorage_adapter(&mock_server);

    Mock::given(method("GET"))
        .and(path("/v2/vaults/vault-1/wallets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(AnchorageFixture::vault_wallets()))
        .mount(&mock_server)
        .await;

    let wallets = adapter
        .list_wallets(&coin("BTC"), &WalletFilter::default().with_vault("vault-1"))
        .await
        .unwrap();

    assert_eq!(wallets.len(), 1);
    assert_eq!(wallets[0].id, "aw-btc");
    assert_eq!(wallets[0].spendable_balance_display.as_deref(), Some("0.5"));

    let err = adapter
        .list_wallets(&coin("BTC"), &WalletFilter::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Backend);
}

/// Test walking vault transactions through the `afterId` cursor
#[tokio::test]
async fn vault_transactions_paging() {
    let mock_server = MockServer::start().await;
    let adapter = anchorage_adapter(&mock_server);

    Mock::given(method("GET"))
        .and(path("/v2/transactions"))
        .and(query_param("vaultId", "vault-1"))
        .and(query_param("assetType", "ETH"))
        .and(query_param("limit", "2"))
        .and(query_param_is_missing("afterId"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            AnchorageFixture::transactions("ETH", &["tx-1", "tx-2"], Some("tx-2")),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/transactions"))
        .and(query_param("afterId", "tx-2"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            AnchorageFixture::transactions("ETH", &["tx-3"], None),
        ))
        .mount(&mock_server)
        .await;

    let eth = coin("ETH");
    let first = adapter
        .vault_transactions("vault-1", &eth, &PageRequest::first().with_limit(2))
        .await
        .unwrap();
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.next_cursor.as_deref(), Some("tx-2"));

    let tx = &first.items[0];
    assert_eq!(tx.state, TransferState::Confirmed);
    assert_eq!(tx.value, None);
    assert_eq!(tx.value_display.as_deref(), Some("0.1"));
    assert_eq!(tx.fee_display.as_deref(), Some("0.0001"));
    assert_eq!(tx.fiat_value, Some(6200.0));
    assert_eq!(tx.chain_tx_id.as_deref(), Some("0xtx-1"));
    assert_eq!(tx.wallet_ref.backend, BackendKind::Anchorage);
    assert_eq!(tx.wallet_ref.wallet_id, "vault-1");

    let second = adapter
        .list_transactions(&eth, "vault-1", &first.next_request(Some(2)).unwrap())
        .await
        .unwrap();
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].id, "tx-3");
    assert!(!second.has_more());
}

/// Test that the page size is clamped to the vault maximum
#[tokio::test]
async fn vault_transactions_clamps_limit() {
    let mock_server = MockServer::start().await;
    let adapter = anchorage_adapter(&mock_server);

    Mock::given(method("GET"))
        .and(path("/v2/transactions"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            AnchorageFixture::transactions("BTC", &[], None),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let page = adapter
        .vault_transactions("vault-1", &coin("BTC"), &PageRequest::first().with_limit(1_000))
        .await
        .unwrap();
    assert!(page.items.is_empty());
}

/// Test that a rejected `afterId` is an invalid cursor
#[tokio::test]
async fn vault_transactions_rejected_cursor() {
    let mock_server = MockServer::start().await;
    let adapter = anchorage_adapter(&mock_server);

    Mock::given(method("GET"))
        .and(path("/v2/transactions"))
        .and(query_param("afterId", "gone"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errorType": "InvalidRequest",
            "message": "afterId not found"
        })))
        .mount(&mock_server)
        .await;

    let err = adapter
        .vault_transactions("vault-1", &coin("ETH"), &PageRequest::after("gone"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        BackendError::InvalidCursor {
            cursor: "gone".to_string()
        }
    );
}

/// Test that a next link without `afterId` is a decode error
#[tokio::test]
async fn vault_transactions_malformed_next_link() {
    let mock_server = MockServer::start().await;
    let adapter = anchorage_adapter(&mock_server);

    Mock::given(method("GET"))
        .and(path("/v2/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "page": {"next": "/v2/transactions?vaultId=vault-1"}
        })))
        .mount(&mock_server)
        .await;

    let err = adapter
        .vault_transactions("vault-1", &coin("ETH"), &PageRequest::first())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

/// Test that capabilities the vault API lacks fail without I/O
#[tokio::test]
async fn unsupported_capabilities_make_no_request() {
    let mock_server = MockServer::start().await;
    let adapter = anchorage_adapter(&mock_server);

    let err = adapter.get_wallet_tokens(&coin("ETH"), "aw-eth").await.unwrap_err();
    assert_eq!(
        err,
        BackendError::UnsupportedOperation {
            backend: BackendKind::Anchorage,
            capability: Capability::GetWalletTokens,
        }
    );

    let err = adapter.get_token_info("USDC").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);

    assert!(mock_server.received_requests().await.unwrap().is_empty());
}
