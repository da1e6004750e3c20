// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Direct REST custody backend
//!
//! Speaks the same wire protocol as the SDK-style backend but without the
//! client-side coin table: paths are templated straight from the request, so a
//! coin the provider does not know surfaces as the provider's HTTP error.

use std::sync::Arc;

use custody_client::{
    BackendError, BackendKind, CoinId, CoinInfo, CustodyBackend, EnterpriseTransferFilter,
    LEGACY_MAX_PAGE_SIZE, PageRequest, TokenBalance, TokenConfig, Transaction, TransactionPage,
    Wallet, WalletFilter, WalletRef, max_page_size,
};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::info;
use url::Url;

use crate::{
    coins::CoinRegistry,
    cursor::classify_cursor_rejection,
    error::SetupError,
    executor::{
        DEFAULT_REQUEST_TIMEOUT_SECONDS, RequestExecutor, RequestPath, header_value,
        parse_base_url,
    },
    non_empty_string::{Credential, NonEmptyString},
    normalize::{
        normalize_token_report, normalize_transaction, normalize_transaction_page,
        normalize_wallet, normalize_wallet_list,
    },
};

/// Default REST environment (test network)
pub const DEFAULT_DIRECT_REST_BASE_URL: &str = "https://app.bitgo-test.com/api/v2";

/// Coin reported on an enterprise transfer page that spans several coins
pub const ENTERPRISE_LISTING_COIN: &str = "all";

/// Configuration for the direct REST backend
#[derive(Debug, Clone)]
pub struct DirectRestConfig {
    /// Base URL of the REST API
    pub base_url: NonEmptyString,
    /// Bearer access token
    pub access_token: Credential,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl DirectRestConfig {
    /// Create a configuration for the default test environment
    ///
    /// # Errors
    ///
    /// Returns a descriptive message if the access token is blank
    pub fn new(access_token: impl Into<String>) -> Result<Self, String> {
        Ok(Self {
            base_url: NonEmptyString::new(DEFAULT_DIRECT_REST_BASE_URL)?,
            access_token: Credential::new(access_token)?,
            timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        })
    }

    /// Use another environment
    ///
    /// # Errors
    ///
    /// Returns a descriptive message if the URL is blank
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, String> {
        self.base_url = NonEmptyString::new(base_url)?;
        Ok(self)
    }

    /// Use another request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }
}

/// [`CustodyBackend`] over plain authenticated REST calls
#[derive(Debug, Clone)]
pub struct DirectRestAdapter {
    executor: RequestExecutor,
    base_url: Url,
    registry: Arc<CoinRegistry>,
}

fn wallet_path(coin: &CoinId) -> RequestPath {
    RequestPath::new().segment(coin.as_str()).segment("wallet")
}

fn transfer_path(coin: &CoinId, wallet_id: &str) -> RequestPath {
    wallet_path(coin).segment(wallet_id).segment("transfer")
}

fn enterprise_transfer_path(enterprise_id: &str) -> RequestPath {
    RequestPath::new()
        .segment("enterprise")
        .segment(enterprise_id)
        .segment("transfer")
}

impl DirectRestAdapter {
    /// Create a new adapter
    ///
    /// `registry` only serves coin and token descriptions; it does not restrict
    /// which coins are queried.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or credential is unusable or the HTTP
    /// client cannot be created
    pub fn new(config: &DirectRestConfig, registry: Arc<CoinRegistry>) -> Result<Self, SetupError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            header_value(
                "Authorization",
                &format!("Bearer {}", config.access_token.expose()),
            )?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            executor: RequestExecutor::new(headers, config.timeout_seconds)?,
            base_url: parse_base_url(config.base_url.as_str())?,
            registry,
        })
    }

    async fn get(&self, path: &RequestPath, query: &[(&str, String)]) -> Result<Value, BackendError> {
        self.executor
            .execute(&self.base_url, path, query, &HeaderMap::new())
            .await
    }

    /// List wallets across every coin, optionally for one enterprise
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the listing is malformed
    pub async fn all_wallets(&self, enterprise: Option<&str>) -> Result<Vec<Wallet>, BackendError> {
        let mut query = Vec::new();
        if let Some(enterprise) = enterprise {
            query.push(("enterprise", enterprise.to_string()));
        }

        let raw = self
            .get(&RequestPath::new().segment("wallets"), &query)
            .await?;
        let wallets = normalize_wallet_list(&raw, BackendKind::DirectRest, None)?;
        info!(enterprise = ?enterprise, count = wallets.len(), "fetched wallets across coins");
        Ok(wallets)
    }

    /// List transfers across every wallet of an enterprise
    ///
    /// Without an explicit limit a full page of [`LEGACY_MAX_PAGE_SIZE`] is
    /// requested. Each transfer keeps the coin and wallet it reports; the page
    /// is keyed by the enterprise, on the single filtered coin if there is one
    /// and on [`ENTERPRISE_LISTING_COIN`] otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidCursor`] if the provider rejects the
    /// cursor, otherwise an error if the request fails or the page is malformed
    pub async fn enterprise_transactions(
        &self,
        enterprise_id: &str,
        filter: &EnterpriseTransferFilter,
        page: &PageRequest,
    ) -> Result<TransactionPage, BackendError> {
        let cursor = page.cursor()?;
        let limit = page
            .limit
            .unwrap_or(LEGACY_MAX_PAGE_SIZE)
            .clamp(1, max_page_size(self.kind()));

        let mut query = filter.query_pairs();
        query.push(("limit", limit.to_string()));
        if let Some(cursor) = cursor {
            query.push(("prevId", cursor.to_string()));
        }

        let raw = self
            .get(&enterprise_transfer_path(enterprise_id), &query)
            .await
            .map_err(|e| classify_cursor_rejection(e, cursor))?;

        let coin = match filter.coins.as_slice() {
            [coin] => coin.clone(),
            _ => CoinId::new(ENTERPRISE_LISTING_COIN).map_err(BackendError::decode)?,
        };
        let origin = WalletRef::new(self.kind(), coin, enterprise_id);
        let listing = normalize_transaction_page(&raw, self.kind(), &origin)?;
        info!(
            enterprise_id,
            coins = filter.coins.len(),
            count = listing.items.len(),
            "fetched enterprise transfers"
        );
        Ok(listing)
    }
}

impl CustodyBackend for DirectRestAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::DirectRest
    }

    async fn list_wallets(
        &self,
        coin: &CoinId,
        filter: &WalletFilter,
    ) -> Result<Vec<Wallet>, BackendError> {
        let mut query = Vec::new();
        if let Some(enterprise) = &filter.enterprise {
            query.push(("enterprise", enterprise.clone()));
        }

        let raw = self.get(&wallet_path(coin), &query).await?;
        let wallets = normalize_wallet_list(&raw, self.kind(), Some(coin))?;
        info!(%coin, count = wallets.len(), "fetched wallets");
        Ok(wallets)
    }

    async fn get_wallet(&self, coin: &CoinId, wallet_id: &str) -> Result<Wallet, BackendError> {
        let raw = self.get(&wallet_path(coin).segment(wallet_id), &[]).await?;
        normalize_wallet(&raw, self.kind(), Some(coin))
    }

    async fn list_transactions(
        &self,
        coin: &CoinId,
        wallet_id: &str,
        page: &PageRequest,
    ) -> Result<TransactionPage, BackendError> {
        let cursor = page.cursor()?;
        let mut query = vec![("limit", page.effective_limit(self.kind()).to_string())];
        if let Some(cursor) = cursor {
            query.push(("prevId", cursor.to_string()));
        }

        let raw = self
            .get(&transfer_path(coin, wallet_id), &query)
            .await
            .map_err(|e| classify_cursor_rejection(e, cursor))?;

        let origin = WalletRef::new(self.kind(), coin.clone(), wallet_id);
        let listing = normalize_transaction_page(&raw, self.kind(), &origin)?;
        info!(%coin, wallet_id, count = listing.items.len(), "fetched transfers");
        Ok(listing)
    }

    async fn get_transaction(
        &self,
        coin: &CoinId,
        wallet_id: &str,
        transfer_id: &str,
    ) -> Result<Transaction, BackendError> {
        let raw = self
            .get(&transfer_path(coin, wallet_id).segment(transfer_id), &[])
            .await?;
        let origin = WalletRef::new(self.kind(), coin.clone(), wallet_id);
        normalize_transaction(&raw, self.kind(), &origin)
    }

    async fn get_wallet_tokens(
        &self,
        coin: &CoinId,
        wallet_id: &str,
    ) -> Result<Vec<TokenBalance>, BackendError> {
        let query = [
            ("allTokens", "true".to_string()),
            ("includeBalance", "true".to_string()),
        ];
        let raw = self.get(&wallet_path(coin).segment(wallet_id), &query).await?;
        normalize_token_report(&raw, self.kind(), |name| {
            self.registry.token(name).ok().cloned()
        })
    }

    async fn get_coin_info(&self, coin: &CoinId) -> Result<CoinInfo, BackendError> {
        self.registry.coin(coin).cloned()
    }

    async fn get_token_info(&self, token_name: &str) -> Result<TokenConfig, BackendError> {
        self.registry.token(token_name).cloned()
    }
}
