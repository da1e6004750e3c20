// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! SDK-style custody backend
//!
//! The SDK exposes a stateful client from which coin-scoped sub-clients are
//! derived: `client.coin(c).wallets().get(id)` yields a wallet object whose
//! transfers are then listed. [`LegacySdkClient`], [`CoinClient`], [`Wallets`] and
//! [`SdkWallet`] reproduce that chain over the SDK's REST wire protocol, and
//! [`LegacySdkAdapter`] maps it onto [`CustodyBackend`].
//!
//! Coins are resolved against the [`CoinRegistry`] before any I/O, so an unknown
//! coin fails with [`BackendError::InvalidCoin`] without touching the network.

use std::sync::Arc;

use custody_client::{
    BackendError, BackendKind, CoinId, CoinInfo, CustodyBackend, PageRequest, TokenBalance,
    TokenConfig, Transaction, TransactionPage, Wallet, WalletFilter, WalletRef,
};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, info};
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

/// Default SDK environment (test network)
pub const DEFAULT_LEGACY_SDK_BASE_URL: &str = "https://app.bitgo-test.com/api/v2";

/// Configuration for the SDK-style backend
#[derive(Debug, Clone)]
pub struct LegacySdkConfig {
    /// Base URL of the SDK's REST API
    pub base_url: NonEmptyString,
    /// Bearer access token
    pub access_token: Credential,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl LegacySdkConfig {
    /// Create a configuration for the default test environment
    ///
    /// # Errors
    ///
    /// Returns a descriptive message if the access token is blank
    pub fn new(access_token: impl Into<String>) -> Result<Self, String> {
        Ok(Self {
            base_url: NonEmptyString::new(DEFAULT_LEGACY_SDK_BASE_URL)?,
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

/// Stateful SDK client, the root of the coin-scoped client chain
#[derive(Debug, Clone)]
pub struct LegacySdkClient {
    executor: RequestExecutor,
    base_url: Url,
    registry: Arc<CoinRegistry>,
}

impl LegacySdkClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or credential is unusable or the HTTP
    /// client cannot be created
    pub fn new(config: &LegacySdkConfig, registry: Arc<CoinRegistry>) -> Result<Self, SetupError> {
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

    /// Coin-scoped sub-client, see [`resolve_coin_client`]
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidCoin`] if the coin is not registered
    pub fn coin(&self, coin: &CoinId) -> Result<CoinClient<'_>, BackendError> {
        resolve_coin_client(self, coin)
    }

    /// Coins and tokens this client was built with
    pub fn registry(&self) -> &CoinRegistry {
        &self.registry
    }

    async fn get(&self, path: RequestPath, query: &[(&str, String)]) -> Result<Value, BackendError> {
        self.executor
            .execute(&self.base_url, &path, query, &HeaderMap::new())
            .await
    }
}

/// Resolve the coin-scoped sub-client of `client`
///
/// This is a pure lookup in the client's [`CoinRegistry`]; no request is made.
///
/// # Errors
///
/// Returns [`BackendError::InvalidCoin`] if the coin is not registered
pub fn resolve_coin_client<'a>(
    client: &'a LegacySdkClient,
    coin: &CoinId,
) -> Result<CoinClient<'a>, BackendError> {
    let info = client.registry.coin(coin)?;
    Ok(CoinClient { client, info })
}

/// Sub-client bound to one coin
#[derive(Debug, Clone, Copy)]
pub struct CoinClient<'a> {
    client: &'a LegacySdkClient,
    info: &'a CoinInfo,
}

impl<'a> CoinClient<'a> {
    /// The coin this sub-client is bound to
    pub fn coin(&self) -> &'a CoinId {
        &self.info.coin
    }

    /// Static description of the coin
    pub fn info(&self) -> &'a CoinInfo {
        self.info
    }

    /// Wallet collection of the coin
    pub fn wallets(&self) -> Wallets<'a> {
        Wallets { coin: *self }
    }

    fn wallet_path(&self) -> RequestPath {
        RequestPath::new().segment(self.coin().as_str()).segment("wallet")
    }
}

/// Options for fetching one wallet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetWalletOptions {
    /// Wallet identifier
    pub id: String,
    /// Include every token held by the wallet
    pub all_tokens: bool,
}

impl GetWalletOptions {
    /// Fetch wallet `id` without token details
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            all_tokens: false,
        }
    }

    /// Include every token held by the wallet
    #[must_use]
    pub fn with_all_tokens(mut self) -> Self {
        self.all_tokens = true;
        self
    }
}

/// Wallet collection of one coin
#[derive(Debug, Clone, Copy)]
pub struct Wallets<'a> {
    coin: CoinClient<'a>,
}

impl<'a> Wallets<'a> {
    /// List the raw wallets of the coin
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails
    pub async fn list(&self, filter: &WalletFilter) -> Result<Value, BackendError> {
        let mut query = Vec::new();
        if let Some(enterprise) = &filter.enterprise {
            query.push(("enterprise", enterprise.clone()));
        }
        self.coin.client.get(self.coin.wallet_path(), &query).await
    }

    /// Fetch one wallet object
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails
    pub async fn get(&self, options: &GetWalletOptions) -> Result<SdkWallet<'a>, BackendError> {
        let mut query = Vec::new();
        if options.all_tokens {
            query.push(("allTokens", "true".to_string()));
        }

        let raw = self
            .coin
            .client
            .get(self.coin.wallet_path().segment(options.id.as_str()), &query)
            .await?;

        let id = raw
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or(options.id.as_str())
            .to_string();

        Ok(SdkWallet {
            coin: self.coin,
            id,
            raw,
        })
    }
}

/// Options for listing a wallet's transfers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOptions {
    /// Page size sent to the backend
    pub limit: u32,
    /// Continuation cursor
    pub prev_id: Option<String>,
    /// Include token transfers
    pub all_tokens: bool,
}

impl TransferOptions {
    /// Options for one requested page
    ///
    /// A continuation request always uses the fixed continuation page size and
    /// asks for token transfers too, regardless of the requested limit.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidCursor`] for a blank cursor
    pub fn for_page(page: &PageRequest) -> Result<Self, BackendError> {
        let prev_id = page.cursor()?.map(str::to_string);
        Ok(Self {
            limit: page.effective_limit(BackendKind::LegacySdk),
            all_tokens: prev_id.is_some(),
            prev_id,
        })
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("limit", self.limit.to_string())];
        if let Some(prev_id) = &self.prev_id {
            query.push(("prevId", prev_id.clone()));
        }
        if self.all_tokens {
            query.push(("allTokens", "true".to_string()));
        }
        query
    }
}

/// Wallet object returned by [`Wallets::get`]
#[derive(Debug, Clone)]
pub struct SdkWallet<'a> {
    coin: CoinClient<'a>,
    id: String,
    raw: Value,
}

impl SdkWallet<'_> {
    /// Wallet identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The wallet payload as received
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    fn transfer_path(&self) -> RequestPath {
        self.coin
            .wallet_path()
            .segment(self.id.as_str())
            .segment("transfer")
    }

    /// List one page of the wallet's transfers, raw
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails
    pub async fn transfers(&self, options: &TransferOptions) -> Result<Value, BackendError> {
        self.coin
            .client
            .get(self.transfer_path(), &options.query())
            .await
    }

    /// Fetch one transfer of the wallet, raw
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails
    pub async fn get_transfer(&self, id: &str) -> Result<Value, BackendError> {
        self.coin
            .client
            .get(self.transfer_path().segment(id), &[])
            .await
    }
}

/// [`CustodyBackend`] over the SDK-style client
#[derive(Debug, Clone)]
pub struct LegacySdkAdapter {
    client: LegacySdkClient,
}

impl LegacySdkAdapter {
    /// Create a new adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created
    pub fn new(config: &LegacySdkConfig, registry: Arc<CoinRegistry>) -> Result<Self, SetupError> {
        Ok(Self {
            client: LegacySdkClient::new(config, registry)?,
        })
    }

    /// The underlying SDK client
    pub fn client(&self) -> &LegacySdkClient {
        &self.client
    }
}

impl CustodyBackend for LegacySdkAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::LegacySdk
    }

    async fn list_wallets(
        &self,
        coin: &CoinId,
        filter: &WalletFilter,
    ) -> Result<Vec<Wallet>, BackendError> {
        let raw = self.client.coin(coin)?.wallets().list(filter).await?;
        let wallets = normalize_wallet_list(&raw, self.kind(), Some(coin))?;
        info!(%coin, count = wallets.len(), "fetched wallets");
        Ok(wallets)
    }

    async fn get_wallet(&self, coin: &CoinId, wallet_id: &str) -> Result<Wallet, BackendError> {
        let wallet = self
            .client
            .coin(coin)?
            .wallets()
            .get(&GetWalletOptions::new(wallet_id))
            .await?;
        normalize_wallet(wallet.raw(), self.kind(), Some(coin))
    }

    async fn list_transactions(
        &self,
        coin: &CoinId,
        wallet_id: &str,
        page: &PageRequest,
    ) -> Result<TransactionPage, BackendError> {
        let options = TransferOptions::for_page(page)?;
        debug!(%coin, wallet_id, limit = options.limit, prev_id = ?options.prev_id, "listing transfers");

        let wallet = self
            .client
            .coin(coin)?
            .wallets()
            .get(&GetWalletOptions::new(wallet_id))
            .await?;
        let raw = wallet
            .transfers(&options)
            .await
            .map_err(|e| classify_cursor_rejection(e, options.prev_id.as_deref()))?;

        let origin = WalletRef::new(self.kind(), coin.clone(), wallet.id());
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
        let wallet = self
            .client
            .coin(coin)?
            .wallets()
            .get(&GetWalletOptions::new(wallet_id))
            .await?;
        let raw = wallet.get_transfer(transfer_id).await?;
        let origin = WalletRef::new(self.kind(), coin.clone(), wallet.id());
        normalize_transaction(&raw, self.kind(), &origin)
    }

    async fn get_wallet_tokens(
        &self,
        coin: &CoinId,
        wallet_id: &str,
    ) -> Result<Vec<TokenBalance>, BackendError> {
        let wallet = self
            .client
            .coin(coin)?
            .wallets()
            .get(&GetWalletOptions::new(wallet_id).with_all_tokens())
            .await?;
        let registry = self.client.registry();
        normalize_token_report(wallet.raw(), self.kind(), |name| {
            registry.token(name).ok().cloned()
        })
    }

    async fn get_coin_info(&self, coin: &CoinId) -> Result<CoinInfo, BackendError> {
        Ok(self.client.coin(coin)?.info().clone())
    }

    async fn get_token_info(&self, token_name: &str) -> Result<TokenConfig, BackendError> {
        self.client.registry().token(token_name).cloned()
    }
}
