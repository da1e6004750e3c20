// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP request handlers module
//!
//! This module provides the health handler and the query and response types
//! shared by the per-backend route groups.

use axum::{Json, extract::State};
use custody_backends::{AggregateResult, PerTargetResult};
use custody_client::{CoinId, CoinWallets, ErrorKind, PageRequest, Wallet, WalletFilter};
use serde::{Deserialize, Serialize};
use serde_with::{StringWithSeparator, formats::CommaSeparator, serde_as};
use utoipa::{IntoParams, ToSchema};

use crate::state::{HealthCheck, ServerState};

/// Coin queried by the balances routes when none is requested
pub const DEFAULT_BALANCE_COIN: &str = "tbtc";

/// Health check endpoint handler
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    summary = "Health check endpoint",
    description = "Returns the version, environment and which custody backends are configured. Backends are not contacted.",
    responses(
        (status = 200, description = "Service is running", body = HealthCheck)
    )
)]
pub async fn health_handler(State(state): State<ServerState>) -> Json<HealthCheck> {
    Json(state.health_check())
}

/// Transaction listing parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TransactionsQuery {
    /// Maximum number of transactions (default 25)
    #[param(example = 25)]
    pub limit: Option<u32>,
    /// Continuation cursor returned as `nextCursor` by the previous page
    pub prev_id: Option<String>,
}

impl TransactionsQuery {
    /// The page this query asks for
    ///
    /// An empty `prevId` asks for the first page.
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            limit: self.limit,
            cursor: present_cursor(self.prev_id.as_deref()),
        }
    }
}

/// A cursor query parameter, `None` when absent or blank
pub fn present_cursor(cursor: Option<&str>) -> Option<String> {
    cursor
        .filter(|cursor| !cursor.trim().is_empty())
        .map(ToString::to_string)
}

/// Wallet listing filter
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EnterpriseQuery {
    /// Restrict the listing to one enterprise
    pub enterprise: Option<String>,
}

impl EnterpriseQuery {
    /// The wallet filter this query asks for
    pub fn filter(&self) -> WalletFilter {
        match &self.enterprise {
            Some(enterprise) if !enterprise.trim().is_empty() => {
                WalletFilter::default().with_enterprise(enterprise.as_str())
            }
            _ => WalletFilter::default(),
        }
    }
}

/// Multi-coin balance parameters
#[serde_as]
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BalancesQuery {
    /// Comma-separated coin identifiers
    #[serde_as(as = "Option<StringWithSeparator::<CommaSeparator, String>>")]
    #[serde(default)]
    #[param(value_type = Option<String>, example = "tbtc,teth")]
    pub coins: Option<Vec<String>>,
}

impl BalancesQuery {
    /// Requested coins in request order, blank entries dropped
    ///
    /// Falls back to [`DEFAULT_BALANCE_COIN`] when nothing usable was requested.
    pub fn coins(&self) -> Vec<CoinId> {
        let coins: Vec<CoinId> = self
            .coins
            .iter()
            .flatten()
            .filter_map(|coin| CoinId::new(coin.trim()).ok())
            .collect();

        if coins.is_empty() {
            CoinId::new(DEFAULT_BALANCE_COIN).into_iter().collect()
        } else {
            coins
        }
    }
}

/// Wallets of one coin, or why they could not be listed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoinBalance {
    /// Coin queried
    pub coin: CoinId,
    /// Number of wallets listed, zero on failure
    pub count: usize,
    /// Wallets listed, empty on failure
    pub wallets: Vec<Wallet>,
    /// Failure description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Failure classification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl From<PerTargetResult<CoinWallets>> for CoinBalance {
    fn from(result: PerTargetResult<CoinWallets>) -> Self {
        match result {
            PerTargetResult::Success { value } => Self {
                coin: value.coin,
                count: value.count,
                wallets: value.wallets,
                error: None,
                error_kind: None,
            },
            PerTargetResult::Failure {
                target,
                error_kind,
                message,
            } => Self {
                coin: target,
                count: 0,
                wallets: Vec::new(),
                error: Some(message),
                error_kind: Some(error_kind),
            },
        }
    }
}

/// Balances of several coins, in request order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalancesResponse {
    /// One entry per requested coin
    pub balances: Vec<CoinBalance>,
    /// Number of coins listed successfully
    pub total_succeeded: usize,
    /// Wallets across all successful coins
    pub total_wallets: usize,
}

impl From<AggregateResult<CoinWallets>> for BalancesResponse {
    fn from(result: AggregateResult<CoinWallets>) -> Self {
        let total_wallets = result.total_items();
        Self {
            balances: result.per_target.into_iter().map(CoinBalance::from).collect(),
            total_succeeded: result.total_succeeded,
            total_wallets,
        }
    }
}
