// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Uniform capability surface over cryptocurrency custody backends
//!
//! This crate provides the abstractions every custody adapter implements, so that
//! callers can query wallets, balances, transactions and coin metadata without
//! knowing which provider protocol sits underneath.
//!
//! # Core Abstractions
//!
//! - **`CustodyBackend` Trait**: read-only capability set shared by all adapters
//! - **Error Handling**: [`BackendError`] with a serializable [`ErrorKind`] classification
//! - **Data Types**: normalized [`Wallet`], [`Transaction`], [`TokenBalance`] and metadata
//! - **Pagination**: [`PageRequest`] and [`TransactionPage`] with opaque forward cursors
//!
//! # Key Features
//!
//! - **Async-First Design**: All operations return `impl Future` for efficient async execution
//! - **Partial Capability Sets**: Unimplemented capabilities fail with
//!   [`BackendError::UnsupportedOperation`] instead of panicking
//! - **Stable Contract**: Provider payloads are reshaped into one schema, display strings verbatim

use std::{fmt, future::ready};

use serde::{Deserialize, Serialize};
pub use shared_types::{BackendKind, CoinId, WalletRef};
use utoipa::ToSchema;

pub mod error;
pub mod pagination;
pub mod types;

pub use error::*;
pub use pagination::*;
pub use types::*;

/// Read-only capability set shared by all custody adapters
///
/// Not every backend implements every capability. The default implementations
/// fail with [`BackendError::UnsupportedOperation`] naming the backend and the
/// capability, so an adapter only overrides what its provider can answer.
pub trait CustodyBackend: Send + Sync {
    /// The backend this adapter talks to
    fn kind(&self) -> BackendKind;

    /// List the wallets of one coin, optionally narrowed by `filter`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the capability is unsupported
    fn list_wallets(
        &self,
        coin: &CoinId,
        filter: &WalletFilter,
    ) -> impl Future<Output = Result<Vec<Wallet>, BackendError>> + Send {
        let _ = (coin, filter);
        ready(Err(BackendError::unsupported(
            self.kind(),
            Capability::ListWallets,
        )))
    }

    /// Fetch one wallet with its balances
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the capability is unsupported
    fn get_wallet(
        &self,
        coin: &CoinId,
        wallet_id: &str,
    ) -> impl Future<Output = Result<Wallet, BackendError>> + Send {
        let _ = (coin, wallet_id);
        ready(Err(BackendError::unsupported(
            self.kind(),
            Capability::GetWallet,
        )))
    }

    /// Fetch one page of a wallet's transactions
    ///
    /// Without a cursor the first page is returned. The adapter may apply a
    /// smaller effective limit than requested, see [`PageRequest::effective_limit`].
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidCursor`] for a blank or rejected cursor, or
    /// any other error if the request fails or the capability is unsupported
    fn list_transactions(
        &self,
        coin: &CoinId,
        wallet_id: &str,
        page: &PageRequest,
    ) -> impl Future<Output = Result<TransactionPage, BackendError>> + Send {
        let _ = (coin, wallet_id, page);
        ready(Err(BackendError::unsupported(
            self.kind(),
            Capability::ListTransactions,
        )))
    }

    /// Fetch a single transaction of a wallet
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the capability is unsupported
    fn get_transaction(
        &self,
        coin: &CoinId,
        wallet_id: &str,
        transfer_id: &str,
    ) -> impl Future<Output = Result<Transaction, BackendError>> + Send {
        let _ = (coin, wallet_id, transfer_id);
        ready(Err(BackendError::unsupported(
            self.kind(),
            Capability::GetTransaction,
        )))
    }

    /// Fetch the token balances held by a wallet
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the capability is unsupported
    fn get_wallet_tokens(
        &self,
        coin: &CoinId,
        wallet_id: &str,
    ) -> impl Future<Output = Result<Vec<TokenBalance>, BackendError>> + Send {
        let _ = (coin, wallet_id);
        ready(Err(BackendError::unsupported(
            self.kind(),
            Capability::GetWalletTokens,
        )))
    }

    /// Describe a coin
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidCoin`] for unknown coins, or an error if the
    /// capability is unsupported
    fn get_coin_info(
        &self,
        coin: &CoinId,
    ) -> impl Future<Output = Result<CoinInfo, BackendError>> + Send {
        let _ = coin;
        ready(Err(BackendError::unsupported(
            self.kind(),
            Capability::GetCoinInfo,
        )))
    }

    /// Describe a token by name
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidCoin`] for unknown tokens, or an error if the
    /// capability is unsupported
    fn get_token_info(
        &self,
        token_name: &str,
    ) -> impl Future<Output = Result<TokenConfig, BackendError>> + Send {
        let _ = token_name;
        ready(Err(BackendError::unsupported(
            self.kind(),
            Capability::GetTokenInfo,
        )))
    }
}

/// One entry of the [`CustodyBackend`] capability set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Capability {
    ListWallets,
    GetWallet,
    ListTransactions,
    GetTransaction,
    GetWalletTokens,
    GetCoinInfo,
    GetTokenInfo,
}

impl Capability {
    /// Returns the operation name of the capability
    pub const fn name(self) -> &'static str {
        match self {
            Self::ListWallets => "list_wallets",
            Self::GetWallet => "get_wallet",
            Self::ListTransactions => "list_transactions",
            Self::GetTransaction => "get_transaction",
            Self::GetWalletTokens => "get_wallet_tokens",
            Self::GetCoinInfo => "get_coin_info",
            Self::GetTokenInfo => "get_token_info",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
