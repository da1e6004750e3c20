// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Read-only coin and token registry
//!
//! The SDK-style backend only answers for coins it has been built with, and
//! describes coins and tokens from local statics rather than over the network.
//! [`CoinRegistry`] holds that table. It is built once at startup (the builtin
//! set plus whatever configuration adds) and shared read-only afterwards.

use std::collections::HashMap;

use custody_client::{BackendError, CoinId, CoinInfo, TokenConfig};

/// Builtin coins: `(id, full name, family, decimals, testnet)`
const BUILTIN_COINS: &[(&str, &str, &str, u32, bool)] = &[
    ("btc", "Bitcoin", "btc", 8, false),
    ("tbtc", "Testnet Bitcoin", "btc", 8, true),
    ("tbtc4", "Testnet4 Bitcoin", "btc", 8, true),
    ("ltc", "Litecoin", "ltc", 8, false),
    ("tltc", "Testnet Litecoin", "ltc", 8, true),
    ("eth", "Ethereum", "eth", 18, false),
    ("teth", "Testnet Ethereum", "eth", 18, true),
    ("hteth", "Holesky Testnet Ethereum", "eth", 18, true),
    ("sol", "Solana", "sol", 9, false),
    ("tsol", "Testnet Solana", "sol", 9, true),
];

/// Builtin tokens: `(name, full name, parent coin, decimals, contract)`
const BUILTIN_TOKENS: &[(&str, &str, &str, u32, Option<&str>)] = &[
    (
        "usdc",
        "USD Coin",
        "eth",
        6,
        Some("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"),
    ),
    (
        "usdt",
        "Tether USD",
        "eth",
        6,
        Some("0xdac17f958d2ee523a2206206994597c13d831ec7"),
    ),
    ("hteth:usdc", "Holesky USD Coin", "hteth", 6, None),
    ("tsol:usdc", "Testnet Solana USD Coin", "tsol", 6, None),
];

/// Coins and tokens the SDK-style backend is built with
#[derive(Debug, Clone, Default)]
pub struct CoinRegistry {
    coins: HashMap<CoinId, CoinInfo>,
    tokens: HashMap<String, TokenConfig>,
}

impl CoinRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the builtin coins and tokens
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        for &(id, full_name, family, decimal_places, is_testnet) in BUILTIN_COINS {
            if let Ok(coin) = CoinId::new(id) {
                registry = registry.with_coin(CoinInfo {
                    coin,
                    full_name: full_name.to_string(),
                    family: family.to_string(),
                    decimal_places,
                    is_testnet,
                });
            }
        }

        for &(name, full_name, parent, decimal_places, contract) in BUILTIN_TOKENS {
            if let Ok(parent_coin) = CoinId::new(parent) {
                registry = registry.with_token(TokenConfig {
                    name: name.to_string(),
                    full_name: full_name.to_string(),
                    parent_coin,
                    decimal_places,
                    contract_address: contract.map(str::to_string),
                });
            }
        }

        registry
    }

    /// Add (or replace) a coin
    #[must_use]
    pub fn with_coin(mut self, info: CoinInfo) -> Self {
        self.coins.insert(info.coin.clone(), info);
        self
    }

    /// Add (or replace) a token
    #[must_use]
    pub fn with_token(mut self, config: TokenConfig) -> Self {
        self.tokens.insert(config.name.clone(), config);
        self
    }

    /// Describe a coin
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidCoin`] if the coin is not registered
    pub fn coin(&self, coin: &CoinId) -> Result<&CoinInfo, BackendError> {
        self.coins.get(coin).ok_or_else(|| BackendError::InvalidCoin {
            coin: coin.to_string(),
        })
    }

    /// Describe a token
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidCoin`] if the token is not registered
    pub fn token(&self, name: &str) -> Result<&TokenConfig, BackendError> {
        self.tokens
            .get(name)
            .ok_or_else(|| BackendError::InvalidCoin {
                coin: name.to_string(),
            })
    }

    /// Whether `coin` is registered
    pub fn contains(&self, coin: &CoinId) -> bool {
        self.coins.contains_key(coin)
    }

    /// Number of registered coins
    pub fn coin_count(&self) -> usize {
        self.coins.len()
    }

    /// Number of registered tokens
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}
