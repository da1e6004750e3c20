// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Routes served by the vault custody backend

use axum::{Json, extract::State};
use custody_client::{CoinId, CoinInfo, PageRequest, TransactionPage, Wallet};
use serde::Deserialize;
use utoipa::IntoParams;

use super::handlers::present_cursor;
use crate::{
    error::ServerResult,
    extractors::{PathExtractor, QueryExtractor},
    state::ServerState,
};

/// Vault transaction listing parameters
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VaultTransactionsQuery {
    /// Asset type to list
    #[param(value_type = String, example = "BTC")]
    pub asset_type: CoinId,
    /// Maximum number of transactions (default 25, at most 100)
    pub limit: Option<u32>,
    /// Continuation cursor returned as `nextCursor` by the previous page
    pub after_id: Option<String>,
}

impl VaultTransactionsQuery {
    fn page_request(&self) -> PageRequest {
        PageRequest {
            limit: self.limit,
            cursor: present_cursor(self.after_id.as_deref()),
        }
    }
}

/// List the asset types the provider supports
#[utoipa::path(
    get,
    path = "/anchorage/asset-types",
    tag = "anchorage",
    summary = "List asset types",
    responses(
        (status = 200, description = "Supported asset types", body = Vec<CoinInfo>),
        (status = 500, description = "Backend call failed"),
        (status = 503, description = "Backend not configured")
    )
)]
pub async fn asset_types_handler(
    State(state): State<ServerState>,
) -> ServerResult<Json<Vec<CoinInfo>>> {
    let assets = state.anchorage()?.asset_types().await?;
    Ok(Json(assets))
}

/// List the wallets of a vault, one entry per asset held
#[utoipa::path(
    get,
    path = "/anchorage/vaults/{vault_id}/wallets",
    tag = "anchorage",
    summary = "List vault wallets",
    params(("vault_id" = String, Path, description = "Vault identifier")),
    responses(
        (status = 200, description = "Wallets of the vault", body = Vec<Wallet>),
        (status = 500, description = "Backend call failed"),
        (status = 503, description = "Backend not configured")
    )
)]
pub async fn vault_wallets_handler(
    State(state): State<ServerState>,
    PathExtractor(vault_id): PathExtractor<String>,
) -> ServerResult<Json<Vec<Wallet>>> {
    let wallets = state.anchorage()?.vault_wallets(&vault_id).await?;
    Ok(Json(wallets))
}

/// Fetch one page of a vault's transactions in one asset type
#[utoipa::path(
    get,
    path = "/anchorage/vaults/{vault_id}/transactions",
    tag = "anchorage",
    summary = "List vault transactions",
    params(
        ("vault_id" = String, Path, description = "Vault identifier"),
        VaultTransactionsQuery
    ),
    responses(
        (status = 200, description = "One page of transactions", body = TransactionPage),
        (status = 400, description = "Missing or blank asset type"),
        (status = 500, description = "Backend call failed or cursor rejected"),
        (status = 503, description = "Backend not configured")
    )
)]
pub async fn vault_transactions_handler(
    State(state): State<ServerState>,
    PathExtractor(vault_id): PathExtractor<String>,
    QueryExtractor(query): QueryExtractor<VaultTransactionsQuery>,
) -> ServerResult<Json<TransactionPage>> {
    let page = state
        .anchorage()?
        .vault_transactions(&vault_id, &query.asset_type, &query.page_request())
        .await?;
    Ok(Json(page))
}
