// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Vault custody backend (Anchorage)
//!
//! Anchorage organizes custody by vault rather than by coin. Its native
//! operations are exposed as inherent methods ([`AnchorageAdapter::asset_types`],
//! [`AnchorageAdapter::vault_wallets`], [`AnchorageAdapter::vault_transactions`]).
//! The [`CustodyBackend`] implementation covers the two capabilities that map
//! onto them; every other capability is unsupported.

use custody_client::{
    BackendError, BackendKind, CoinId, CoinInfo, CustodyBackend, PageRequest, TransactionPage,
    Wallet, WalletFilter, WalletRef,
};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::info;
use url::Url;

use crate::{
    cursor::classify_cursor_rejection,
    error::SetupError,
    executor::{
        DEFAULT_REQUEST_TIMEOUT_SECONDS, RequestExecutor, RequestPath, header_value,
        parse_base_url, static_header,
    },
    non_empty_string::{Credential, NonEmptyString},
    normalize::{normalize_asset_types, normalize_transaction_page, normalize_wallet_list},
};

/// Default Anchorage environment (staging)
pub const DEFAULT_ANCHORAGE_BASE_URL: &str = "https://api.anchorage-staging.com";

const API_KEY_HEADER: &str = "api-access-key";

/// Configuration for the Anchorage backend
#[derive(Debug, Clone)]
pub struct AnchorageConfig {
    /// Base URL of the Anchorage API
    pub base_url: NonEmptyString,
    /// API access key
    pub api_key: Credential,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl AnchorageConfig {
    /// Create a configuration for the default staging environment
    ///
    /// # Errors
    ///
    /// Returns a descriptive message if the API key is blank
    pub fn new(api_key: impl Into<String>) -> Result<Self, String> {
        Ok(Self {
            base_url: NonEmptyString::new(DEFAULT_ANCHORAGE_BASE_URL)?,
            api_key: Credential::new(api_key)?,
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

/// Anchorage API adapter
#[derive(Debug, Clone)]
pub struct AnchorageAdapter {
    executor: RequestExecutor,
    base_url: Url,
}

impl AnchorageAdapter {
    /// Create a new adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or API key is unusable or the HTTP client
    /// cannot be created
    pub fn new(config: &AnchorageConfig) -> Result<Self, SetupError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            static_header(API_KEY_HEADER),
            header_value("Api-Access-Key", config.api_key.expose())?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(Self {
            executor: RequestExecutor::new(headers, config.timeout_seconds)?,
            base_url: parse_base_url(config.base_url.as_str())?,
        })
    }

    async fn get(&self, path: &RequestPath, query: &[(&str, String)]) -> Result<Value, BackendError> {
        self.executor
            .execute(&self.base_url, path, query, &HeaderMap::new())
            .await
    }

    /// List every asset type the provider supports
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the listing is malformed
    pub async fn asset_types(&self) -> Result<Vec<CoinInfo>, BackendError> {
        let path = RequestPath::new().segment("v2").segment("asset-types");
        let raw = self.get(&path, &[]).await?;
        let assets = normalize_asset_types(&raw)?;
        info!(count = assets.len(), "fetched asset types");
        Ok(assets)
    }

    /// List the wallets of a vault, one entry per asset held
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the listing is malformed
    pub async fn vault_wallets(&self, vault_id: &str) -> Result<Vec<Wallet>, BackendError> {
        let path = RequestPath::new()
            .segment("v2")
            .segment("vaults")
            .segment(vault_id)
            .segment("wallets");
        let raw = self.get(&path, &[]).await?;
        let wallets = normalize_wallet_list(&raw, BackendKind::Anchorage, None)?;
        info!(vault_id, count = wallets.len(), "fetched vault wallets");
        Ok(wallets)
    }

    /// List one page of a vault's transactions in one asset type
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidCursor`] for a blank or rejected cursor, or
    /// any other error if the request fails
    pub async fn vault_transactions(
        &self,
        vault_id: &str,
        asset_type: &CoinId,
        page: &PageRequest,
    ) -> Result<TransactionPage, BackendError> {
        let cursor = page.cursor()?;
        let mut query = vec![
            ("vaultId", vault_id.to_string()),
            ("assetType", asset_type.to_string()),
            (
                "limit",
                page.effective_limit(BackendKind::Anchorage).to_string(),
            ),
        ];
        if let Some(cursor) = cursor {
            query.push(("afterId", cursor.to_string()));
        }

        let path = RequestPath::new().segment("v2").segment("transactions");
        let raw = self
            .get(&path, &query)
            .await
            .map_err(|e| classify_cursor_rejection(e, cursor))?;

        let origin = WalletRef::new(BackendKind::Anchorage, asset_type.clone(), vault_id);
        let listing = normalize_transaction_page(&raw, BackendKind::Anchorage, &origin)?;
        info!(vault_id, %asset_type, count = listing.items.len(), "fetched vault transactions");
        Ok(listing)
    }
}

impl CustodyBackend for AnchorageAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::Anchorage
    }

    /// Wallets of `filter.vault_id` holding `coin`
    async fn list_wallets(
        &self,
        coin: &CoinId,
        filter: &WalletFilter,
    ) -> Result<Vec<Wallet>, BackendError> {
        let vault_id = filter
            .vault_id
            .as_deref()
            .ok_or_else(|| BackendError::provider(self.kind(), "listing wallets requires a vault id"))?;

        let mut wallets = self.vault_wallets(vault_id).await?;
        wallets.retain(|wallet| &wallet.coin == coin);
        Ok(wallets)
    }

    /// Transactions of vault `wallet_id` in asset type `coin`
    async fn list_transactions(
        &self,
        coin: &CoinId,
        wallet_id: &str,
        page: &PageRequest,
    ) -> Result<TransactionPage, BackendError> {
        self.vault_transactions(wallet_id, coin, page).await
    }
}
