// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Routes served by the direct REST custody backend

use axum::{
    Json,
    extract::{RawQuery, State},
};
use custody_backends::wallet_balances;
use custody_client::{
    CoinId, CustodyBackend, EnterpriseTransferFilter, PageRequest, TokenBalance, Transaction,
    TransactionPage, Wallet, WalletFilter,
};
use tracing::info;
use url::form_urlencoded;

use super::handlers::{BalancesQuery, BalancesResponse, EnterpriseQuery, TransactionsQuery};
use crate::{
    error::{ServerError, ServerResult},
    extractors::{PathExtractor, QueryExtractor},
    state::ServerState,
};

/// Enterprise transfer listing parameters
///
/// `coin`, `state` and `address` may repeat, so the query string is read pair by
/// pair. Blank values are ignored and unknown keys skipped.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EnterpriseTransactionsQuery {
    /// Transfer filters
    pub filter: EnterpriseTransferFilter,
    /// Requested page
    pub page: PageRequest,
}

impl EnterpriseTransactionsQuery {
    /// Parse a raw query string
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::ValidationError`] if `limit` is not a number
    pub fn parse(raw: Option<&str>) -> ServerResult<Self> {
        let mut query = Self::default();
        let pairs = form_urlencoded::parse(raw.unwrap_or_default().as_bytes());

        for (key, value) in pairs {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let filter = &mut query.filter;
            match key.as_ref() {
                "coin" => filter.coins.push(
                    CoinId::new(value)
                        .map_err(|e| ServerError::ValidationError(format!("invalid query: {e}")))?,
                ),
                "state" => filter.states.push(value.to_string()),
                "address" => filter.addresses.push(value.to_string()),
                "type" => filter.transfer_type = Some(value.to_string()),
                "dateGte" => filter.date_gte = Some(value.to_string()),
                "dateLt" => filter.date_lt = Some(value.to_string()),
                "id" => filter.id = Some(value.to_string()),
                "txid" => filter.txid = Some(value.to_string()),
                "prevId" => query.page.cursor = Some(value.to_string()),
                "limit" => {
                    let limit = value.parse().map_err(|_| {
                        ServerError::ValidationError(format!("invalid query: limit {value}"))
                    })?;
                    query.page.limit = Some(limit);
                }
                _ => {}
            }
        }
        Ok(query)
    }
}

/// List wallets across every coin
#[utoipa::path(
    get,
    path = "/direct-rest/wallets",
    tag = "direct-rest",
    summary = "List all wallets",
    params(EnterpriseQuery),
    responses(
        (status = 200, description = "Wallets of every coin", body = Vec<Wallet>),
        (status = 500, description = "Backend call failed"),
        (status = 503, description = "Backend not configured")
    )
)]
pub async fn wallets_handler(
    State(state): State<ServerState>,
    QueryExtractor(query): QueryExtractor<EnterpriseQuery>,
) -> ServerResult<Json<Vec<Wallet>>> {
    let filter = query.filter();
    let wallets = state
        .direct_rest()?
        .all_wallets(filter.enterprise.as_deref())
        .await?;
    Ok(Json(wallets))
}

/// Fetch one wallet
#[utoipa::path(
    get,
    path = "/direct-rest/wallet/{coin}/{wallet_id}",
    tag = "direct-rest",
    summary = "Get a wallet",
    params(
        ("coin" = String, Path, description = "Coin identifier"),
        ("wallet_id" = String, Path, description = "Wallet identifier")
    ),
    responses(
        (status = 200, description = "The wallet", body = Wallet),
        (status = 500, description = "Backend call failed"),
        (status = 503, description = "Backend not configured")
    )
)]
pub async fn wallet_handler(
    State(state): State<ServerState>,
    PathExtractor((coin, wallet_id)): PathExtractor<(CoinId, String)>,
) -> ServerResult<Json<Wallet>> {
    let wallet = state.direct_rest()?.get_wallet(&coin, &wallet_id).await?;
    Ok(Json(wallet))
}

/// Fetch the token balances of a wallet
#[utoipa::path(
    get,
    path = "/direct-rest/wallet-tokens/{coin}/{wallet_id}",
    tag = "direct-rest",
    summary = "Get wallet token balances",
    params(
        ("coin" = String, Path, description = "Coin identifier"),
        ("wallet_id" = String, Path, description = "Wallet identifier")
    ),
    responses(
        (status = 200, description = "Token balances as listed by the provider", body = Vec<TokenBalance>),
        (status = 500, description = "Backend call failed"),
        (status = 503, description = "Backend not configured")
    )
)]
pub async fn wallet_tokens_handler(
    State(state): State<ServerState>,
    PathExtractor((coin, wallet_id)): PathExtractor<(CoinId, String)>,
) -> ServerResult<Json<Vec<TokenBalance>>> {
    let tokens = state
        .direct_rest()?
        .get_wallet_tokens(&coin, &wallet_id)
        .await?;
    Ok(Json(tokens))
}

/// List the wallets of several coins at once
#[utoipa::path(
    get,
    path = "/direct-rest/balances",
    tag = "direct-rest",
    summary = "Wallet balances for several coins",
    params(BalancesQuery),
    responses(
        (status = 200, description = "One entry per requested coin, in request order", body = BalancesResponse),
        (status = 503, description = "Backend not configured")
    )
)]
pub async fn balances_handler(
    State(state): State<ServerState>,
    QueryExtractor(query): QueryExtractor<BalancesQuery>,
) -> ServerResult<Json<BalancesResponse>> {
    let backend = state.direct_rest()?;
    let coins = query.coins();
    info!(coins = coins.len(), "fetching wallet balances");

    let result = wallet_balances(backend, &coins, &WalletFilter::default()).await;
    Ok(Json(BalancesResponse::from(result)))
}

/// Fetch one page of a wallet's transactions
#[utoipa::path(
    get,
    path = "/direct-rest/transactions/{coin}/{wallet_id}",
    tag = "direct-rest",
    summary = "List wallet transactions",
    params(
        ("coin" = String, Path, description = "Coin identifier"),
        ("wallet_id" = String, Path, description = "Wallet identifier"),
        TransactionsQuery
    ),
    responses(
        (status = 200, description = "One page of transactions", body = TransactionPage),
        (status = 500, description = "Backend call failed or cursor rejected"),
        (status = 503, description = "Backend not configured")
    )
)]
pub async fn transactions_handler(
    State(state): State<ServerState>,
    PathExtractor((coin, wallet_id)): PathExtractor<(CoinId, String)>,
    QueryExtractor(query): QueryExtractor<TransactionsQuery>,
) -> ServerResult<Json<TransactionPage>> {
    let page = state
        .direct_rest()?
        .list_transactions(&coin, &wallet_id, &query.page_request())
        .await?;
    Ok(Json(page))
}

/// Fetch one page of transfers across an enterprise
#[utoipa::path(
    get,
    path = "/direct-rest/enterprise/{enterprise_id}/transactions",
    tag = "direct-rest",
    summary = "List enterprise transactions",
    params(
        ("enterprise_id" = String, Path, description = "Enterprise identifier"),
        ("coin" = Option<Vec<String>>, Query, description = "Coin filter, repeatable"),
        ("state" = Option<Vec<String>>, Query, description = "Transfer state filter, repeatable"),
        ("address" = Option<Vec<String>>, Query, description = "Address filter, repeatable"),
        ("type" = Option<String>, Query, description = "`send` or `receive`"),
        ("dateGte" = Option<String>, Query, description = "Created at or after this date"),
        ("dateLt" = Option<String>, Query, description = "Created before this date"),
        ("id" = Option<String>, Query, description = "Transfer identifier"),
        ("txid" = Option<String>, Query, description = "On-chain transaction hash"),
        ("limit" = Option<u32>, Query, description = "Maximum number of transfers (default 500)"),
        ("prevId" = Option<String>, Query, description = "Continuation cursor from the previous page")
    ),
    responses(
        (status = 200, description = "One page of transfers, each keyed by its own coin and wallet", body = TransactionPage),
        (status = 400, description = "Malformed query"),
        (status = 500, description = "Backend call failed or cursor rejected"),
        (status = 503, description = "Backend not configured")
    )
)]
pub async fn enterprise_transactions_handler(
    State(state): State<ServerState>,
    PathExtractor(enterprise_id): PathExtractor<String>,
    RawQuery(raw): RawQuery,
) -> ServerResult<Json<TransactionPage>> {
    let query = EnterpriseTransactionsQuery::parse(raw.as_deref())?;
    let page = state
        .direct_rest()?
        .enterprise_transactions(&enterprise_id, &query.filter, &query.page)
        .await?;
    Ok(Json(page))
}

/// Fetch one transaction of a wallet
#[utoipa::path(
    get,
    path = "/direct-rest/transaction/{coin}/{wallet_id}/{transfer_id}",
    tag = "direct-rest",
    summary = "Get a transaction",
    params(
        ("coin" = String, Path, description = "Coin identifier"),
        ("wallet_id" = String, Path, description = "Wallet identifier"),
        ("transfer_id" = String, Path, description = "Transfer identifier")
    ),
    responses(
        (status = 200, description = "The transaction", body = Transaction),
        (status = 500, description = "Backend call failed"),
        (status = 503, description = "Backend not configured")
    )
)]
pub async fn transaction_handler(
    State(state): State<ServerState>,
    PathExtractor((coin, wallet_id, transfer_id)): PathExtractor<(CoinId, String, String)>,
) -> ServerResult<Json<Transaction>> {
    let transaction = state
        .direct_rest()?
        .get_transaction(&coin, &wallet_id, &transfer_id)
        .await?;
    Ok(Json(transaction))
}
