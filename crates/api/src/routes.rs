// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Routes module
//!
//! This module provides route configuration and handlers for the custody gateway,
//! one route group per custody backend.

pub mod anchorage;
pub mod direct_rest;
pub mod handlers;
pub mod legacy_sdk;

use axum::{Router, routing::get};
use handlers::health_handler;

use crate::{
    openapi::{openapi_spec, swagger_ui},
    state::ServerState,
};

/// Create application routes
pub fn create_routes() -> Router<ServerState> {
    let health_routes = Router::new().route("/health", get(health_handler));

    let docs_routes = Router::new()
        .route("/api-doc/openapi.json", get(openapi_spec))
        .route("/swagger-ui", get(swagger_ui));

    let legacy_sdk_routes = Router::new()
        .route("/wallets/{coin}", get(legacy_sdk::wallets_handler))
        .route("/wallet/{coin}/{wallet_id}", get(legacy_sdk::wallet_handler))
        .route(
            "/wallet-tokens/{coin}/{wallet_id}",
            get(legacy_sdk::wallet_tokens_handler),
        )
        .route("/balances", get(legacy_sdk::balances_handler))
        .route(
            "/transactions/{coin}/{wallet_id}",
            get(legacy_sdk::transactions_handler),
        )
        .route(
            "/transaction/{coin}/{wallet_id}/{transfer_id}",
            get(legacy_sdk::transaction_handler),
        )
        .route("/coin/{coin}", get(legacy_sdk::coin_info_handler))
        .route("/token/{token_name}", get(legacy_sdk::token_info_handler));

    let direct_rest_routes = Router::new()
        .route("/wallets", get(direct_rest::wallets_handler))
        .route(
            "/wallet/{coin}/{wallet_id}",
            get(direct_rest::wallet_handler),
        )
        .route(
            "/wallet-tokens/{coin}/{wallet_id}",
            get(direct_rest::wallet_tokens_handler),
        )
        .route("/balances", get(direct_rest::balances_handler))
        .route(
            "/transactions/{coin}/{wallet_id}",
            get(direct_rest::transactions_handler),
        )
        .route(
            "/transaction/{coin}/{wallet_id}/{transfer_id}",
            get(direct_rest::transaction_handler),
        )
        .route(
            "/enterprise/{enterprise_id}/transactions",
            get(direct_rest::enterprise_transactions_handler),
        );

    let anchorage_routes = Router::new()
        .route("/asset-types", get(anchorage::asset_types_handler))
        .route(
            "/vaults/{vault_id}/wallets",
            get(anchorage::vault_wallets_handler),
        )
        .route(
            "/vaults/{vault_id}/transactions",
            get(anchorage::vault_transactions_handler),
        );

    Router::new()
        .merge(health_routes)
        .merge(docs_routes)
        .nest("/legacy-sdk", legacy_sdk_routes)
        .nest("/direct-rest", direct_rest_routes)
        .nest("/anchorage", anchorage_routes)
}
