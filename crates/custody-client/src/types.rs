// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Normalized entities returned by every custody adapter
//!
//! These are read-only projections of remote state. They are built fresh per
//! request and never mutated afterwards. Display strings are whatever the
//! provider formatted; nothing here recomputes them.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{CoinId, WalletRef};
use utoipa::{
    ToSchema,
    openapi::{
        self, ObjectBuilder,
        schema::{SchemaType, Type},
    },
};

/// Schema of an amount in minor units, an integer of no fixed width
fn amount_schema(description: &str) -> openapi::Object {
    ObjectBuilder::new()
        .schema_type(SchemaType::Array(vec![Type::Integer, Type::Null]))
        .description(Some(description))
        .build()
}

fn unsigned_amount_schema() -> openapi::Object {
    amount_schema("Non-negative amount in minor units, may exceed 64 bits")
}

fn signed_amount_schema() -> openapi::Object {
    amount_schema("Signed amount in minor units, may exceed 64 bits")
}

/// A custody wallet with its balances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    /// Backend-assigned wallet identifier
    pub id: String,
    /// Human readable label (if any)
    pub label: Option<String>,
    /// Coin namespace of the wallet
    pub coin: CoinId,
    /// Total balance in minor units
    #[schema(schema_with = unsigned_amount_schema)]
    pub balance: Option<u128>,
    /// Confirmed balance in minor units
    #[schema(schema_with = unsigned_amount_schema)]
    pub confirmed_balance: Option<u128>,
    /// Spendable balance in minor units
    #[schema(schema_with = unsigned_amount_schema)]
    pub spendable_balance: Option<u128>,
    /// Provider-formatted total balance
    pub balance_display: Option<String>,
    /// Provider-formatted confirmed balance
    pub confirmed_balance_display: Option<String>,
    /// Provider-formatted spendable balance
    pub spendable_balance_display: Option<String>,
}

/// Lifecycle state of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransferState {
    /// Broadcast or awaiting approval, not yet confirmed
    Pending,
    /// Included in the chain
    Confirmed,
    /// Rejected, removed or failed on chain
    Failed,
    /// State not recognized
    #[default]
    Unknown,
}

/// One ledger movement of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    /// Address credited or debited
    pub address: String,
    /// Signed amount in minor units
    #[schema(schema_with = signed_amount_schema)]
    pub value: Option<i128>,
    /// Wallet owning the address, when it belongs to a known wallet
    pub wallet: Option<String>,
}

/// A normalized transaction (transfer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Backend-assigned transfer identifier
    pub id: String,
    /// Coin the transfer moved
    pub coin: CoinId,
    /// Wallet the transfer was queried through
    pub wallet_ref: WalletRef,
    /// On-chain transaction hash
    pub chain_tx_id: Option<String>,
    /// Block height of inclusion
    pub block_height: Option<u64>,
    /// Block identifier of inclusion
    pub block_height_id: Option<String>,
    /// When the transfer was created or confirmed
    pub timestamp: Option<DateTime<Utc>>,
    /// Number of confirmations
    pub confirmations: Option<u64>,
    /// Signed value in minor units
    #[schema(schema_with = signed_amount_schema)]
    pub value: Option<i128>,
    /// Provider-formatted value
    pub value_display: Option<String>,
    /// Provider-formatted network fee
    pub fee_display: Option<String>,
    /// Provider-formatted service fee
    pub pay_go_fee_display: Option<String>,
    /// Fiat value of the transfer
    pub fiat_value: Option<f64>,
    /// Fiat exchange rate used for `fiat_value`
    pub fiat_rate: Option<f64>,
    /// Lifecycle state
    pub state: TransferState,
    /// Free-form tags
    #[schema(value_type = Vec<String>)]
    pub tags: BTreeSet<String>,
    /// Provider event history, oldest first as reported
    #[schema(value_type = Vec<Object>)]
    pub history: Vec<serde_json::Value>,
    /// User comment
    pub comment: Option<String>,
    /// Ledger entries
    pub entries: Vec<LedgerEntry>,
}

/// Chain configuration of a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenConfig {
    /// Token name as used by the backend (e.g. `hteth:usdc`)
    pub name: String,
    /// Human readable name
    pub full_name: String,
    /// Coin whose chain carries the token
    pub parent_coin: CoinId,
    /// Number of decimals between minor and major units
    pub decimal_places: u32,
    /// Contract or mint address, when the token has one
    #[serde(default)]
    pub contract_address: Option<String>,
}

/// A token balance held by a wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    /// Token symbol as reported by the backend
    pub symbol: String,
    /// Provider-formatted balance
    pub balance: Option<String>,
    /// Chain configuration of the token, `None` when unknown
    pub token_config: Option<TokenConfig>,
}

/// Description of a coin (or asset type)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoinInfo {
    /// Coin identifier
    pub coin: CoinId,
    /// Human readable name
    pub full_name: String,
    /// Chain family (`btc`, `eth`, ...)
    pub family: String,
    /// Number of decimals between minor and major units
    pub decimal_places: u32,
    /// Whether this is a test network coin
    #[serde(default)]
    pub is_testnet: bool,
}

/// Optional narrowing of a wallet listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletFilter {
    /// Only wallets of this enterprise
    pub enterprise: Option<String>,
    /// Only wallets of this vault (vault-scoped backends)
    pub vault_id: Option<String>,
}

impl WalletFilter {
    /// Filter by enterprise
    #[must_use]
    pub fn with_enterprise(mut self, enterprise: impl Into<String>) -> Self {
        self.enterprise = Some(enterprise.into());
        self
    }

    /// Filter by vault
    #[must_use]
    pub fn with_vault(mut self, vault_id: impl Into<String>) -> Self {
        self.vault_id = Some(vault_id.into());
        self
    }
}

/// Narrowing of an enterprise-wide transfer listing
///
/// List-valued fields go upstream as one query pair per value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseTransferFilter {
    /// Only transfers of these coins
    pub coins: Vec<CoinId>,
    /// Only transfers in these states
    pub states: Vec<String>,
    /// Only transfers touching these addresses
    pub addresses: Vec<String>,
    /// `send` or `receive`
    pub transfer_type: Option<String>,
    /// Created at or after this date
    pub date_gte: Option<String>,
    /// Created before this date
    pub date_lt: Option<String>,
    /// A single transfer id
    pub id: Option<String>,
    /// A single on-chain transaction hash
    pub txid: Option<String>,
}

impl EnterpriseTransferFilter {
    /// Add a coin to the filter
    #[must_use]
    pub fn with_coin(mut self, coin: CoinId) -> Self {
        self.coins.push(coin);
        self
    }

    /// Add a state to the filter
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.states.push(state.into());
        self
    }

    /// Upstream query pairs, repeated keys for list values
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> = Vec::new();
        pairs.extend(self.coins.iter().map(|coin| ("coin", coin.to_string())));
        pairs.extend(self.states.iter().map(|state| ("state", state.clone())));
        pairs.extend(self.addresses.iter().map(|address| ("address", address.clone())));

        let singles = [
            ("type", &self.transfer_type),
            ("dateGte", &self.date_gte),
            ("dateLt", &self.date_lt),
            ("id", &self.id),
            ("txid", &self.txid),
        ];
        for (key, value) in singles {
            if let Some(value) = value {
                pairs.push((key, value.clone()));
            }
        }
        pairs
    }
}

/// Wallets of one coin, as produced by a per-coin balance query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoinWallets {
    /// Coin the wallets belong to
    pub coin: CoinId,
    /// Number of wallets
    pub count: usize,
    /// The wallets
    pub wallets: Vec<Wallet>,
}

impl CoinWallets {
    /// Create a listing, deriving `count` from the wallets
    pub fn new(coin: CoinId, wallets: Vec<Wallet>) -> Self {
        Self {
            coin,
            count: wallets.len(),
            wallets,
        }
    }

    /// Create the zero-valued listing used for a coin whose query failed
    pub fn empty(coin: CoinId) -> Self {
        Self::new(coin, Vec::new())
    }
}

/// Number of items a result contributes to a summary count
pub trait Tally {
    /// Number of items carried by this value
    fn item_count(&self) -> usize;
}

impl Tally for CoinWallets {
    fn item_count(&self) -> usize {
        self.count
    }
}

impl<T> Tally for Vec<T> {
    fn item_count(&self) -> usize {
        self.len()
    }
}

impl Wallet {
    /// Reference to this wallet within `backend`
    pub fn wallet_ref(&self, backend: shared_types::BackendKind) -> WalletRef {
        WalletRef::new(backend, self.coin.clone(), self.id.clone())
    }
}

impl Transaction {
    /// Whether the transaction is final on chain
    pub fn is_confirmed(&self) -> bool {
        self.state == TransferState::Confirmed
    }
}

#[cfg(test)]
mod tests {
    use shared_types::BackendKind;

    use super::*;

    fn coin(value: &str) -> CoinId {
        CoinId::new(value).unwrap()
    }

    #[test]
    fn coin_wallets_count_matches_wallets() {
        let wallet = Wallet {
            id: "w1".to_string(),
            label: Some("Treasury".to_string()),
            coin: coin("tbtc"),
            balance: Some(1_000),
            confirmed_balance: Some(1_000),
            spendable_balance: Some(900),
            balance_display: Some("0.00001 TBTC".to_string()),
            confirmed_balance_display: None,
            spendable_balance_display: None,
        };

        let listing = CoinWallets::new(coin("tbtc"), vec![wallet.clone(), wallet]);
        assert_eq!(listing.count, 2);
        assert_eq!(listing.item_count(), 2);

        let empty = CoinWallets::empty(coin("teth"));
        assert_eq!(empty.count, 0);
        assert!(empty.wallets.is_empty());
    }

    #[test]
    fn wallet_serializes_camel_case() {
        let wallet = Wallet {
            id: "w1".to_string(),
            label: None,
            coin: coin("tbtc"),
            balance: Some(5),
            confirmed_balance: None,
            spendable_balance: None,
            balance_display: Some("5".to_string()),
            confirmed_balance_display: None,
            spendable_balance_display: None,
        };

        let json = serde_json::to_value(&wallet).unwrap();
        assert_eq!(json["balanceDisplay"], "5");
        assert_eq!(json["coin"], "tbtc");
        assert!(json["spendableBalance"].is_null());
        assert_eq!(
            wallet.wallet_ref(BackendKind::LegacySdk).to_string(),
            "legacy-sdk/tbtc/w1"
        );
    }

    #[test]
    fn transfer_state_default_is_unknown() {
        assert_eq!(TransferState::default(), TransferState::Unknown);
        assert_eq!(
            serde_json::to_string(&TransferState::Confirmed).unwrap(),
            "\"confirmed\""
        );
    }

    #[test]
    fn wallet_filter_builders() {
        let filter = WalletFilter::default()
            .with_enterprise("ent-1")
            .with_vault("vault-9");
        assert_eq!(filter.enterprise.as_deref(), Some("ent-1"));
        assert_eq!(filter.vault_id.as_deref(), Some("vault-9"));
    }

    #[test]
    fn amount_schemas_have_no_fixed_width() {
        use utoipa::PartialSchema;

        let wallet = serde_json::to_value(Wallet::schema()).unwrap();
        let balance = &wallet["properties"]["balance"];
        assert_eq!(balance["type"], serde_json::json!(["integer", "null"]));
        assert!(balance.get("format").is_none());

        let entry = serde_json::to_value(LedgerEntry::schema()).unwrap();
        assert!(entry["properties"]["value"].get("format").is_none());

        let wei = Wallet {
            id: "w1".to_string(),
            label: None,
            coin: coin("teth"),
            balance: Some(u128::from(u64::MAX) + 1),
            confirmed_balance: None,
            spendable_balance: None,
            balance_display: None,
            confirmed_balance_display: None,
            spendable_balance_display: None,
        };
        let json = serde_json::to_string(&wei).unwrap();
        assert!(json.contains("\"balance\":18446744073709551616"));
    }

    #[test]
    fn enterprise_filter_repeats_list_keys() {
        let filter = EnterpriseTransferFilter {
            transfer_type: Some("send".to_string()),
            txid: Some("abc".to_string()),
            ..EnterpriseTransferFilter::default()
        }
        .with_coin(coin("tbtc"))
        .with_coin(coin("teth"))
        .with_state("confirmed")
        .with_state("signed");

        let pairs = filter.query_pairs();
        let values = |key: &str| {
            pairs
                .iter()
                .filter(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str())
                .collect::<Vec<_>>()
        };
        assert_eq!(values("coin"), ["tbtc", "teth"]);
        assert_eq!(values("state"), ["confirmed", "signed"]);
        assert_eq!(values("type"), ["send"]);
        assert_eq!(values("txid"), ["abc"]);
        assert!(values("dateGte").is_empty());
        assert!(EnterpriseTransferFilter::default().query_pairs().is_empty());
    }
}
