// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! `OpenAPI` documentation module
//!
//! This module provides the `OpenAPI` document of the custody gateway and a
//! `Swagger UI` page rendering it.

use axum::{Json, http::StatusCode, response::Html};
use custody_client::{
    BackendKind, CoinInfo, CoinWallets, ErrorKind, LedgerEntry, TokenBalance, TokenConfig,
    Transaction, TransactionPage, TransferState, Wallet, WalletRef,
};
use utoipa::OpenApi;

use crate::{
    config::Environment,
    routes::{
        anchorage, direct_rest,
        handlers::{self, BalancesResponse, CoinBalance},
        legacy_sdk,
    },
    state::{BackendStatus, HealthCheck, HealthStatus},
};

/// `OpenAPI` document of every route
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Custody Gateway",
        description = "Uniform read-only queries over cryptocurrency custody backends"
    ),
    paths(
        handlers::health_handler,
        legacy_sdk::wallets_handler,
        legacy_sdk::wallet_handler,
        legacy_sdk::wallet_tokens_handler,
        legacy_sdk::balances_handler,
        legacy_sdk::transactions_handler,
        legacy_sdk::transaction_handler,
        legacy_sdk::coin_info_handler,
        legacy_sdk::token_info_handler,
        direct_rest::wallets_handler,
        direct_rest::wallet_handler,
        direct_rest::wallet_tokens_handler,
        direct_rest::balances_handler,
        direct_rest::transactions_handler,
        direct_rest::transaction_handler,
        direct_rest::enterprise_transactions_handler,
        anchorage::asset_types_handler,
        anchorage::vault_wallets_handler,
        anchorage::vault_transactions_handler,
    ),
    components(schemas(
        HealthCheck,
        HealthStatus,
        BackendStatus,
        Environment,
        BackendKind,
        WalletRef,
        Wallet,
        CoinWallets,
        Transaction,
        TransferState,
        LedgerEntry,
        TransactionPage,
        TokenBalance,
        TokenConfig,
        CoinInfo,
        ErrorKind,
        CoinBalance,
        BalancesResponse,
    )),
    tags(
        (name = "health", description = "Service status"),
        (name = "legacy-sdk", description = "SDK-style custody backend"),
        (name = "direct-rest", description = "Direct REST custody backend"),
        (name = "anchorage", description = "Vault custody backend")
    )
)]
pub struct ApiDoc;

/// `OpenAPI` specification endpoint
pub async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Swagger UI endpoint
pub async fn swagger_ui() -> Result<Html<&'static str>, StatusCode> {
    let html = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Custody Gateway Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css" />
    <style>
        html { box-sizing: border-box; overflow: -moz-scrollbars-vertical; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin:0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {
            SwaggerUIBundle({
                url: '/api-doc/openapi.json',
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                plugins: [
                    SwaggerUIBundle.plugins.DownloadUrl
                ],
                layout: "StandaloneLayout"
            });
        }
    </script>
</body>
</html>
"#;
    Ok(Html(html))
}
