// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Coin identifiers and wallet references
//!
//! Coin identifiers are opaque, case-sensitive tokens living in a backend-specific
//! namespace (`tbtc`, `hteth`, `BTC`, ...). No equivalence between backends is
//! assumed, so `CoinId` only guarantees that the token is not blank.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::BackendKind;

/// Opaque coin identifier, guaranteed non-blank
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "tbtc")]
pub struct CoinId(String);

impl CoinId {
    /// Create a new coin identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is empty or whitespace only
    pub fn new(value: impl Into<String>) -> Result<Self, CoinIdParseError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(CoinIdParseError::Blank);
        }
        Ok(Self(value))
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CoinId {
    type Err = CoinIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for CoinId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for CoinId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

/// Error type for coin identifier parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoinIdParseError {
    /// The identifier was empty or whitespace only
    #[error("coin identifier cannot be empty")]
    Blank,
}

/// Reference to a wallet within one backend and coin namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletRef {
    /// Backend the wallet lives in
    pub backend: BackendKind,
    /// Coin namespace of the wallet
    pub coin: CoinId,
    /// Backend-assigned wallet identifier
    pub wallet_id: String,
}

impl WalletRef {
    /// Create a new wallet reference
    pub fn new(backend: BackendKind, coin: CoinId, wallet_id: impl Into<String>) -> Self {
        Self {
            backend,
            coin,
            wallet_id: wallet_id.into(),
        }
    }
}

impl fmt::Display for WalletRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.backend, self.coin, self.wallet_id)
    }
}
