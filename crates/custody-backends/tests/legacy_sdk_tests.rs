// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for `LegacySdkAdapter`
//!
//! The SDK wire protocol is served by wiremock. Every transaction listing first
//! fetches the wallet object and then its transfers, as the SDK does.

use std::collections::HashSet;

use custody_backends::{GetWalletOptions, TransferOptions};
use custody_client::{
    BackendError, CoinId, CustodyBackend, ErrorKind, PageRequest, TransferState, WalletFilter,
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

/// Test listing the wallets of one coin
#[tokio::test]
async fn list_wallets_success() {
    let mock_server = MockServer::start().await;
    let adapter = legacy_adapter(&mock_server);

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/tbtc/wallet")))
        .and(query_param("enterprise", "ent-1"))
        .and(header("authorization", bearer().as_str()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(BitgoFixture::wallets("tbtc", &["w1", "w2"])),
        )
        .mount(&mock_server)
        .await;

    let wallets = adapter
        .list_wallets(&coin("tbtc"), &WalletFilter::default().with_enterprise("ent-1"))
        .await
        .unwrap();

    assert_eq!(wallets.len(), 2);
    assert_eq!(wallets[0].id, "w1");
    assert_eq!(wallets[0].balance, Some(1_000));
    assert_eq!(wallets[1].spendable_balance_display.as_deref(), Some("1000"));
}

/// Test that a fetched wallet has the requested id
#[tokio::test]
async fn get_wallet_returns_requested_id() {
    let mock_server = MockServer::start().await;
    let adapter = legacy_adapter(&mock_server);
    BitgoFixture::mount_wallet(&mock_server, "tbtc", "5f2b8e6a").await;

    let wallet = adapter.get_wallet(&coin("tbtc"), "5f2b8e6a").await.unwrap();

    assert_eq!(wallet.id, "5f2b8e6a");
    assert_eq!(wallet.coin.as_str(), "tbtc");
    assert_eq!(wallet.balance, Some(50_000));
    assert_eq!(wallet.balance_display.as_deref(), Some("50000"));
}

/// Test that an unknown coin fails before any request is made
#[tokio::test]
async fn unknown_coin_makes_no_request() {
    let mock_server = MockServer::start().await;
    let adapter = legacy_adapter(&mock_server);
    let unknown = coin("unknownCoin");

    let err = adapter
        .list_wallets(&unknown, &WalletFilter::default())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        BackendError::InvalidCoin {
            coin: "unknownCoin".to_string()
        }
    );

    let err = adapter.get_coin_info(&unknown).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCoin);

    let err = adapter
        .list_transactions(&unknown, "w1", &PageRequest::first())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCoin);

    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

/// Test walking two pages of transfers
#[tokio::test]
async fn list_transactions_pages_do_not_overlap() {
    let mock_server = MockServer::start().await;
    let adapter = legacy_adapter(&mock_server);
    BitgoFixture::mount_wallet(&mock_server, "tbtc", "w1").await;

    let transfers_path = format!("{API_PREFIX}/tbtc/wallet/w1/transfer");

    Mock::given(method("GET"))
        .and(path(transfers_path.as_str()))
        .and(query_param("limit", "2"))
        .and(query_param_is_missing("prevId"))
        .respond_with(ResponseTemplate::new(200).set_body_json(BitgoFixture::transfers(
            "tbtc",
            "w1",
            &["t1", "t2"],
            Some("t2"),
        )))
        .mount(&mock_server)
        .await;

    // Continuation requests always use the fixed page size and include tokens
    Mock::given(method("GET"))
        .and(path(transfers_path.as_str()))
        .and(query_param("prevId", "t2"))
        .and(query_param("limit", "20"))
        .and(query_param("allTokens", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(BitgoFixture::transfers(
            "tbtc",
            "w1",
            &["t3"],
            None,
        )))
        .mount(&mock_server)
        .await;

    let first = adapter
        .list_transactions(&coin("tbtc"), "w1", &PageRequest::first().with_limit(2))
        .await
        .unwrap();
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.next_cursor.as_deref(), Some("t2"));

    let second = adapter
        .list_transactions(&coin("tbtc"), "w1", &first.next_request(Some(2)).unwrap())
        .await
        .unwrap();
    assert_eq!(second.items.len(), 1);
    assert!(!second.has_more());

    let first_ids: HashSet<_> = first.items.iter().map(|tx| tx.id.as_str()).collect();
    assert!(second.items.iter().all(|tx| !first_ids.contains(tx.id.as_str())));

    let tx = &first.items[0];
    assert_eq!(tx.state, TransferState::Confirmed);
    assert_eq!(tx.value, Some(-25_000));
    assert_eq!(tx.wallet_ref.to_string(), "legacy-sdk/tbtc/w1");
}

/// Test that a cursor rejected by the backend is an invalid cursor, not page one
#[tokio::test]
async fn list_transactions_rejected_cursor() {
    let mock_server = MockServer::start().await;
    let adapter = legacy_adapter(&mock_server);
    BitgoFixture::mount_wallet(&mock_server, "tbtc", "w1").await;

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/tbtc/wallet/w1/transfer")))
        .and(query_param("prevId", "stale"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "invalid prevId"})),
        )
        .mount(&mock_server)
        .await;

    let err = adapter
        .list_transactions(&coin("tbtc"), "w1", &PageRequest::after("stale"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        BackendError::InvalidCursor {
            cursor: "stale".to_string()
        }
    );

    let err = adapter
        .list_transactions(&coin("tbtc"), "w1", &PageRequest::after("  "))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCursor);
}

/// Test fetching one transfer
#[tokio::test]
async fn get_transaction_success() {
    let mock_server = MockServer::start().await;
    let adapter = legacy_adapter(&mock_server);
    BitgoFixture::mount_wallet(&mock_server, "tbtc", "w1").await;

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/tbtc/wallet/w1/transfer/t9")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(BitgoFixture::transfer("t9", "tbtc", "w1")),
        )
        .mount(&mock_server)
        .await;

    let tx = adapter
        .get_transaction(&coin("tbtc"), "w1", "t9")
        .await
        .unwrap();

    assert_eq!(tx.id, "t9");
    assert_eq!(tx.chain_tx_id.as_deref(), Some("tx-t9"));
    assert_eq!(tx.fee_display.as_deref(), Some("1200"));
    assert_eq!(tx.history.len(), 2);
    assert_eq!(tx.comment, None);
}

/// Test the keyed token report of a wallet
#[tokio::test]
async fn get_wallet_tokens_keyed_report() {
    let mock_server = MockServer::start().await;
    let adapter = legacy_adapter(&mock_server);

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/hteth/wallet/w1")))
        .and(query_param("allTokens", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "w1",
            "coin": "hteth",
            "balanceString": "0",
            "tokens": {
                "hteth:usdc": {"balanceString": "2500000"},
                "hteth:bgerch": {"balanceString": "42"}
            }
        })))
        .mount(&mock_server)
        .await;

    let tokens = adapter
        .get_wallet_tokens(&coin("hteth"), "w1")
        .await
        .unwrap();

    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].symbol, "hteth:bgerch");
    assert!(tokens[0].token_config.is_none());
    assert_eq!(tokens[1].symbol, "hteth:usdc");
    assert_eq!(tokens[1].balance.as_deref(), Some("2500000"));
    assert_eq!(tokens[1].token_config.as_ref().unwrap().decimal_places, 6);
}

/// Test the coin-scoped client chain directly
#[tokio::test]
async fn sdk_client_chain() {
    let mock_server = MockServer::start().await;
    let adapter = legacy_adapter(&mock_server);
    BitgoFixture::mount_wallet(&mock_server, "tbtc", "w1").await;

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/tbtc/wallet/w1/transfer")))
        .and(query_param("limit", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(BitgoFixture::transfers(
            "tbtc",
            "w1",
            &[],
            None,
        )))
        .mount(&mock_server)
        .await;

    let tbtc = coin("tbtc");
    let coin_client = adapter.client().coin(&tbtc).unwrap();
    assert!(coin_client.info().is_testnet);

    let wallet = coin_client
        .wallets()
        .get(&GetWalletOptions::new("w1"))
        .await
        .unwrap();
    assert_eq!(wallet.id(), "w1");

    let raw = wallet
        .transfers(&TransferOptions::for_page(&PageRequest::first()).unwrap())
        .await
        .unwrap();
    assert_eq!(raw["transfers"], json!([]));
}

/// Test that a backend failure on the wallet fetch is propagated unchanged
#[tokio::test]
async fn get_wallet_not_found() {
    let mock_server = MockServer::start().await;
    let adapter = legacy_adapter(&mock_server);

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/tbtc/wallet/missing")))
        .respond_with(ResponseTemplate::new(404).set_body_string("wallet not found"))
        .mount(&mock_server)
        .await;

    let err = adapter
        .get_wallet(&coin("tbtc"), "missing")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        BackendError::Http {
            status: 404,
            body: "wallet not found".to_string()
        }
    );
}
