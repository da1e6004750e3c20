// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for `DirectRestAdapter`

use custody_client::{
    BackendError, CoinId, CustodyBackend, EnterpriseTransferFilter, ErrorKind, PageRequest,
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

/// Test listing wallets across every coin
#[tokio::test]
async fn all_wallets_success() {
    let mock_server = MockServer::start().await;
    let adapter = direct_adapter(&mock_server);

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/wallets")))
        .and(query_param("enterprise", "ent-1"))
        .and(header("authorization", bearer().as_str()))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "wallets": [
                BitgoFixture::wallet("w1", "tbtc", 1_000),
                BitgoFixture::wallet("w2", "hteth", 7)
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let wallets = adapter.all_wallets(Some("ent-1")).await.unwrap();

    assert_eq!(wallets.len(), 2);
    assert_eq!(wallets[0].coin.as_str(), "tbtc");
    assert_eq!(wallets[1].coin.as_str(), "hteth");
    assert_eq!(wallets[1].balance, Some(7));
}

/// Test listing and fetching wallets of one coin
#[tokio::test]
async fn list_and_get_wallet() {
    let mock_server = MockServer::start().await;
    let adapter = direct_adapter(&mock_server);

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/tbtc/wallet")))
        .and(query_param_is_missing("enterprise"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(BitgoFixture::wallets("tbtc", &["w1"])),
        )
        .mount(&mock_server)
        .await;
    BitgoFixture::mount_wallet(&mock_server, "tbtc", "w1").await;

    let wallets = adapter
        .list_wallets(&coin("tbtc"), &WalletFilter::default())
        .await
        .unwrap();
    assert_eq!(wallets.len(), 1);

    let wallet = adapter.get_wallet(&coin("tbtc"), "w1").await.unwrap();
    assert_eq!(wallet.id, "w1");
    assert_eq!(wallet.confirmed_balance, Some(50_000));
    assert_eq!(wallet.label.as_deref(), Some("tbtc wallet w1"));
}

/// Test that the requested page size is clamped and the cursor forwarded as is
#[tokio::test]
async fn list_transactions_clamps_limit() {
    let mock_server = MockServer::start().await;
    let adapter = direct_adapter(&mock_server);

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/tbtc/wallet/w1/transfer")))
        .and(query_param("limit", "500"))
        .and(query_param("prevId", "opaque+cursor/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(BitgoFixture::transfers(
            "tbtc",
            "w1",
            &["t1"],
            None,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let page = adapter
        .list_transactions(
            &coin("tbtc"),
            "w1",
            &PageRequest::after("opaque+cursor/1").with_limit(10_000),
        )
        .await
        .unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.wallet_id, "w1");
    assert!(!page.has_more());
    assert_eq!(page.items[0].state, TransferState::Confirmed);
    assert_eq!(page.items[0].entries[0].value, Some(25_000));
}

/// Test the first page uses the default size and returns the next cursor
#[tokio::test]
async fn list_transactions_default_page() {
    let mock_server = MockServer::start().await;
    let adapter = direct_adapter(&mock_server);

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/tbtc/wallet/w1/transfer")))
        .and(query_param("limit", "25"))
        .and(query_param_is_missing("prevId"))
        .respond_with(ResponseTemplate::new(200).set_body_json(BitgoFixture::transfers(
            "tbtc",
            "w1",
            &["t1", "t2"],
            Some("t2"),
        )))
        .mount(&mock_server)
        .await;

    let page = adapter
        .list_transactions(&coin("tbtc"), "w1", &PageRequest::first())
        .await
        .unwrap();

    let ids: Vec<_> = page.items.iter().map(|tx| tx.id.as_str()).collect();
    assert_eq!(ids, ["t1", "t2"]);
    assert_eq!(page.next_cursor.as_deref(), Some("t2"));
}

/// Test the enterprise listing repeats list filters and forwards the cursor
#[tokio::test]
async fn enterprise_transactions_repeats_filters() {
    let mock_server = MockServer::start().await;
    let adapter = direct_adapter(&mock_server);

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/enterprise/ent-1/transfer")))
        .and(query_param("prevId", "t9"))
        .and(query_param("limit", "500"))
        .and(query_param("type", "send"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transfers": [
                BitgoFixture::transfer("t10", "tbtc", "w1"),
                BitgoFixture::transfer("t11", "hteth", "w2")
            ],
            "nextBatchPrevId": "t11"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let filter = EnterpriseTransferFilter {
        transfer_type: Some("send".to_string()),
        ..EnterpriseTransferFilter::default()
    }
    .with_coin(coin("tbtc"))
    .with_coin(coin("hteth"))
    .with_state("confirmed")
    .with_state("signed");

    let page = adapter
        .enterprise_transactions("ent-1", &filter, &PageRequest::after("t9"))
        .await
        .unwrap();

    assert_eq!(page.wallet_id, "ent-1");
    assert_eq!(page.coin.as_str(), "all");
    assert_eq!(page.next_cursor.as_deref(), Some("t11"));
    assert_eq!(page.items[0].wallet_ref.to_string(), "direct-rest/tbtc/w1");
    assert_eq!(page.items[1].coin.as_str(), "hteth");
    assert_eq!(page.items[1].wallet_ref.wallet_id, "w2");

    let requests = mock_server.received_requests().await.unwrap();
    let pairs: Vec<(String, String)> = requests[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let values = |key: &str| {
        pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect::<Vec<_>>()
    };
    assert_eq!(values("coin"), ["tbtc", "hteth"]);
    assert_eq!(values("state"), ["confirmed", "signed"]);
}

/// Test a single coin filter keys the page and a rejected cursor is classified
#[tokio::test]
async fn enterprise_transactions_single_coin_and_bad_cursor() {
    let mock_server = MockServer::start().await;
    let adapter = direct_adapter(&mock_server);

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/enterprise/ent-1/transfer")))
        .and(query_param("coin", "tbtc"))
        .and(query_param("limit", "40"))
        .and(query_param_is_missing("prevId"))
        .respond_with(ResponseTemplate::new(200).set_body_json(BitgoFixture::transfers(
            "tbtc",
            "w1",
            &["t1"],
            None,
        )))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/enterprise/ent-1/transfer")))
        .and(query_param("prevId", "stale"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid prevId"))
        .mount(&mock_server)
        .await;

    let filter = EnterpriseTransferFilter::default().with_coin(coin("tbtc"));
    let page = adapter
        .enterprise_transactions("ent-1", &filter, &PageRequest::first().with_limit(40))
        .await
        .unwrap();
    assert_eq!(page.coin.as_str(), "tbtc");
    assert_eq!(page.items.len(), 1);
    assert!(!page.has_more());

    let err = adapter
        .enterprise_transactions("ent-1", &filter, &PageRequest::after("stale"))
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::InvalidCursor { .. }));
}

/// Test the listed token report with balances
#[tokio::test]
async fn get_wallet_tokens_listed_report() {
    let mock_server = MockServer::start().await;
    let adapter = direct_adapter(&mock_server);

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/hteth/wallet/w1")))
        .and(query_param("allTokens", "true"))
        .and(query_param("includeBalance", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "w1",
            "coin": "hteth",
            "tokens": [
                {"symbol": "hteth:usdc", "balanceString": "2500000"},
                {"coin": "hteth:unlisted", "balance": 3}
            ]
        })))
        .mount(&mock_server)
        .await;

    let tokens = adapter
        .get_wallet_tokens(&coin("hteth"), "w1")
        .await
        .unwrap();

    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].symbol, "hteth:usdc");
    assert_eq!(tokens[0].token_config.as_ref().unwrap().parent_coin.as_str(), "hteth");
    assert_eq!(tokens[1].symbol, "hteth:unlisted");
    assert_eq!(tokens[1].balance.as_deref(), Some("3"));
    assert!(tokens[1].token_config.is_none());
}

/// Test that a wallet without tokens has an empty report
#[tokio::test]
async fn get_wallet_tokens_absent() {
    let mock_server = MockServer::start().await;
    let adapter = direct_adapter(&mock_server);

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/tbtc/wallet/w1")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(BitgoFixture::wallet("w1", "tbtc", 1)),
        )
        .mount(&mock_server)
        .await;

    let tokens = adapter
        .get_wallet_tokens(&coin("tbtc"), "w1")
        .await
        .unwrap();
    assert!(tokens.is_empty());
}

/// Test that an unknown coin surfaces as the provider's own answer
#[tokio::test]
async fn unknown_coin_passes_through_provider_error() {
    let mock_server = MockServer::start().await;
    let adapter = direct_adapter(&mock_server);
    let body = r#"{"error":"invalid coin","name":"InvalidCoin"}"#;

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/unknownCoin/wallet")))
        .respond_with(ResponseTemplate::new(400).set_body_string(body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = adapter
        .list_wallets(&coin("unknownCoin"), &WalletFilter::default())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        BackendError::Http {
            status: 400,
            body: body.to_string()
        }
    );
}

/// Test that a 400 without a cursor is not reclassified
#[tokio::test]
async fn first_page_rejection_stays_http() {
    let mock_server = MockServer::start().await;
    let adapter = direct_adapter(&mock_server);

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/tbtc/wallet/w1/transfer")))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .mount(&mock_server)
        .await;

    let err = adapter
        .list_transactions(&coin("tbtc"), "w1", &PageRequest::first())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Http);

    let err = adapter
        .list_transactions(&coin("tbtc"), "w1", &PageRequest::after("expired"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCursor);
}

/// Test fetching a transfer whose identifier needs encoding
#[tokio::test]
async fn get_transaction_encodes_identifiers() {
    let mock_server = MockServer::start().await;
    let adapter = direct_adapter(&mock_server);

    Mock::given(method("GET"))
        .and(path(format!(
            "{API_PREFIX}/tbtc/wallet/w%2F1/transfer/t%3F1"
        )))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(BitgoFixture::transfer("t?1", "tbtc", "w/1")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let tx = adapter
        .get_transaction(&coin("tbtc"), "w/1", "t?1")
        .await
        .unwrap();

    assert_eq!(tx.id, "t?1");
    assert_eq!(tx.wallet_ref.wallet_id, "w/1");
}

/// Test that coin and token metadata come from the registry
#[tokio::test]
async fn metadata_is_local() {
    let mock_server = MockServer::start().await;
    let adapter = direct_adapter(&mock_server);

    let info = adapter.get_coin_info(&coin("teth")).await.unwrap();
    assert_eq!(info.decimal_places, 18);

    let token = adapter.get_token_info("usdc").await.unwrap();
    assert!(token.contract_address.is_some());

    let err = adapter.get_token_info("nope").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCoin);

    assert!(mock_server.received_requests().await.unwrap().is_empty());
}
