// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Routes served by the SDK-style custody backend

use axum::{Json, extract::State};
use custody_backends::wallet_balances;
use custody_client::{
    CoinId, CoinInfo, CoinWallets, CustodyBackend, TokenBalance, TokenConfig, Transaction,
    TransactionPage, Wallet, WalletFilter,
};
use tracing::info;

use super::handlers::{BalancesQuery, BalancesResponse, EnterpriseQuery, TransactionsQuery};
use crate::{
    error::ServerResult,
    extractors::{PathExtractor, QueryExtractor},
    state::ServerState,
};

/// List the wallets of one coin
#[utoipa::path(
    get,
    path = "/legacy-sdk/wallets/{coin}",
    tag = "legacy-sdk",
    summary = "List wallets of a coin",
    params(
        ("coin" = String, Path, description = "Coin identifier", example = "tbtc"),
        EnterpriseQuery
    ),
    responses(
        (status = 200, description = "Wallets of the coin", body = CoinWallets),
        (status = 500, description = "Backend call failed"),
        (status = 503, description = "Backend not configured")
    )
)]
pub async fn wallets_handler(
    State(state): State<ServerState>,
    PathExtractor(coin): PathExtractor<CoinId>,
    QueryExtractor(query): QueryExtractor<EnterpriseQuery>,
) -> ServerResult<Json<CoinWallets>> {
    let wallets = state
        .legacy_sdk()?
        .list_wallets(&coin, &query.filter())
        .await?;
    Ok(Json(CoinWallets::new(coin, wallets)))
}

/// Fetch one wallet
#[utoipa::path(
    get,
    path = "/legacy-sdk/wallet/{coin}/{wallet_id}",
    tag = "legacy-sdk",
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
    let wallet = state.legacy_sdk()?.get_wallet(&coin, &wallet_id).await?;
    Ok(Json(wallet))
}

/// Fetch the token balances of a wallet
#[utoipa::path(
    get,
    path = "/legacy-sdk/wallet-tokens/{coin}/{wallet_id}",
    tag = "legacy-sdk",
    summary = "Get wallet token balances",
    params(
        ("coin" = String, Path, description = "Coin identifier"),
        ("wallet_id" = String, Path, description = "Wallet identifier")
    ),
    responses(
        (status = 200, description = "Token balances, sorted by symbol", body = Vec<TokenBalance>),
        (status = 500, description = "Backend call failed"),
        (status = 503, description = "Backend not configured")
    )
)]
pub async fn wallet_tokens_handler(
    State(state): State<ServerState>,
    PathExtractor((coin, wallet_id)): PathExtractor<(CoinId, String)>,
) -> ServerResult<Json<Vec<TokenBalance>>> {
    let tokens = state
        .legacy_sdk()?
        .get_wallet_tokens(&coin, &wallet_id)
        .await?;
    Ok(Json(tokens))
}

/// List the wallets of several coins at once
///
/// A coin that fails is reported in place; the others are still answered.
#[utoipa::path(
    get,
    path = "/legacy-sdk/balances",
    tag = "legacy-sdk",
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
    let backend = state.legacy_sdk()?;
    let coins = query.coins();
    info!(coins = coins.len(), "fetching wallet balances");

    let result = wallet_balances(backend, &coins, &WalletFilter::default()).await;
    Ok(Json(BalancesResponse::from(result)))
}

/// Fetch one page of a wallet's transactions
#[utoipa::path(
    get,
    path = "/legacy-sdk/transactions/{coin}/{wallet_id}",
    tag = "legacy-sdk",
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
        .legacy_sdk()?
        .list_transactions(&coin, &wallet_id, &query.page_request())
        .await?;
    Ok(Json(page))
}

/// Fetch one transaction of a wallet
#[utoipa::path(
    get,
    path = "/legacy-sdk/transaction/{coin}/{wallet_id}/{transfer_id}",
    tag = "legacy-sdk",
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
        .legacy_sdk()?
        .get_transaction(&coin, &wallet_id, &transfer_id)
        .await?;
    Ok(Json(transaction))
}

/// Describe a coin known to the SDK
#[utoipa::path(
    get,
    path = "/legacy-sdk/coin/{coin}",
    tag = "legacy-sdk",
    summary = "Get coin metadata",
    params(("coin" = String, Path, description = "Coin identifier")),
    responses(
        (status = 200, description = "Coin metadata", body = CoinInfo),
        (status = 500, description = "Unknown coin"),
        (status = 503, description = "Backend not configured")
    )
)]
pub async fn coin_info_handler(
    State(state): State<ServerState>,
    PathExtractor(coin): PathExtractor<CoinId>,
) -> ServerResult<Json<CoinInfo>> {
    let info = state.legacy_sdk()?.get_coin_info(&coin).await?;
    Ok(Json(info))
}

/// Describe a token known to the SDK
#[utoipa::path(
    get,
    path = "/legacy-sdk/token/{token_name}",
    tag = "legacy-sdk",
    summary = "Get token metadata",
    params(("token_name" = String, Path, description = "Token name", example = "hteth:usdc")),
    responses(
        (status = 200, description = "Token metadata", body = TokenConfig),
        (status = 500, description = "Unknown token"),
        (status = 503, description = "Backend not configured")
    )
)]
pub async fn token_info_handler(
    State(state): State<ServerState>,
    PathExtractor(token_name): PathExtractor<String>,
) -> ServerResult<Json<TokenConfig>> {
    let token = state.legacy_sdk()?.get_token_info(&token_name).await?;
    Ok(Json(token))
}
