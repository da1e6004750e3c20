// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Reshaping of provider payloads into the common entity schema
//!
//! Every function here is pure: it parses a backend-specific raw structure with
//! serde and projects it onto [`Wallet`], [`Transaction`], [`TokenBalance`] or
//! [`CoinInfo`]. Absent optional fields become `None` or empty collections. Only a
//! missing identifier or a payload of the wrong shape is a
//! [`BackendError::Decode`]. Amounts are never unit-converted and display strings
//! are passed through as the provider formatted them.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use custody_client::{
    BackendError, BackendKind, Capability, CoinId, CoinInfo, LedgerEntry, TokenBalance,
    TokenConfig, Transaction, TransactionPage, TransferState, Wallet, WalletRef,
};
use serde::Deserialize;
use serde_json::Value;

use crate::cursor::{transfer_next_cursor, vault_next_cursor};

/// Wallet as returned by the SDK-style and direct REST backends
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWallet {
    id: Option<String>,
    label: Option<String>,
    coin: Option<String>,
    balance: Option<Value>,
    confirmed_balance: Option<Value>,
    spendable_balance: Option<Value>,
    balance_string: Option<String>,
    confirmed_balance_string: Option<String>,
    spendable_balance_string: Option<String>,
}

/// Wallet as returned by the vault backend
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVaultWallet {
    wallet_id: Option<String>,
    wallet_name: Option<String>,
    network_id: Option<String>,
    assets: Option<Vec<RawVaultAsset>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVaultAsset {
    asset_type: String,
    total_balance: Option<RawQuantity>,
    available_balance: Option<RawQuantity>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuantity {
    quantity: Option<String>,
    #[serde(rename = "currentUSDValue")]
    current_usd_value: Option<String>,
    current_price: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransfer {
    id: Option<String>,
    coin: Option<String>,
    wallet: Option<String>,
    txid: Option<String>,
    height: Option<Value>,
    height_id: Option<String>,
    date: Option<String>,
    confirmations: Option<Value>,
    value: Option<Value>,
    value_string: Option<String>,
    fee_string: Option<String>,
    pay_go_fee_string: Option<String>,
    usd: Option<f64>,
    usd_rate: Option<f64>,
    state: Option<String>,
    tags: Option<Vec<String>>,
    history: Option<Vec<Value>>,
    comment: Option<String>,
    entries: Option<Vec<RawEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    address: Option<String>,
    value: Option<Value>,
    value_string: Option<String>,
    wallet: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVaultTransaction {
    transaction_id: Option<String>,
    asset_type: Option<String>,
    status: Option<String>,
    amount: Option<RawQuantity>,
    fee: Option<RawQuantity>,
    #[serde(alias = "txHash")]
    blockchain_tx_id: Option<String>,
    created_at: Option<String>,
    comment: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAssetType {
    asset_type: Option<String>,
    name: Option<String>,
    network_id: Option<String>,
    decimals: Option<u32>,
    #[serde(default)]
    is_testnet: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTokenHolding {
    balance_string: Option<String>,
    balance: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawListedToken {
    #[serde(alias = "coin", alias = "token")]
    symbol: Option<String>,
    balance_string: Option<String>,
    balance: Option<Value>,
}

/// Token section of a wallet payload, in the shape its backend uses
#[derive(Debug)]
enum TokenReport {
    /// Map keyed by token symbol (SDK-style backend)
    Keyed(BTreeMap<String, RawTokenHolding>),
    /// Array of token entries (direct REST backend)
    Listed(Vec<RawListedToken>),
}

impl TokenReport {
    fn parse(raw: &Value, kind: BackendKind) -> Result<Self, BackendError> {
        let tokens = raw.get("tokens").filter(|tokens| !tokens.is_null());
        let report = match kind {
            BackendKind::LegacySdk => tokens
                .map(BTreeMap::<String, RawTokenHolding>::deserialize)
                .transpose()
                .map(|keyed| Self::Keyed(keyed.unwrap_or_default())),
            BackendKind::DirectRest => tokens
                .map(Vec::<RawListedToken>::deserialize)
                .transpose()
                .map(|listed| Self::Listed(listed.unwrap_or_default())),
            BackendKind::Anchorage => {
                return Err(BackendError::unsupported(kind, Capability::GetWalletTokens));
            }
        };
        report.map_err(|e| BackendError::decode(format!("token report: {e}")))
    }
}

fn parse<'a, T: Deserialize<'a>>(raw: &'a Value, what: &str) -> Result<T, BackendError> {
    T::deserialize(raw).map_err(|e| BackendError::decode(format!("{what}: {e}")))
}

fn required_id(id: Option<String>, what: &str) -> Result<String, BackendError> {
    id.filter(|id| !id.trim().is_empty())
        .ok_or_else(|| BackendError::decode(format!("{what} without id")))
}

fn coin_or(reported: Option<&str>, fallback: Option<&CoinId>) -> Result<CoinId, BackendError> {
    reported
        .and_then(|coin| CoinId::new(coin).ok())
        .or_else(|| fallback.cloned())
        .ok_or_else(|| BackendError::decode("payload without coin"))
}

/// Unsigned minor units from the provider's integer string, else its number
fn unsigned_amount(string: Option<&str>, number: Option<&Value>) -> Option<u128> {
    string
        .and_then(|s| s.parse().ok())
        .or_else(|| number.and_then(Value::as_u64).map(u128::from))
        .or_else(|| number.and_then(Value::as_str).and_then(|s| s.parse().ok()))
}

/// Signed minor units from the provider's integer string, else its number
fn signed_amount(string: Option<&str>, number: Option<&Value>) -> Option<i128> {
    string
        .and_then(|s| s.parse().ok())
        .or_else(|| number.and_then(Value::as_i64).map(i128::from))
        .or_else(|| number.and_then(Value::as_str).and_then(|s| s.parse().ok()))
}

fn count(value: Option<&Value>) -> Option<u64> {
    value.and_then(Value::as_u64)
}

fn timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|ts| ts.with_timezone(&Utc))
}

fn decimal(value: Option<&str>) -> Option<f64> {
    value.and_then(|s| s.parse().ok())
}

/// Items of a listing, whether bare or wrapped under `data` or `key`
fn listing<'a>(raw: &'a Value, key: &str) -> Result<&'a Vec<Value>, BackendError> {
    raw.as_array()
        .or_else(|| raw.get("data").and_then(Value::as_array))
        .or_else(|| raw.get(key).and_then(Value::as_array))
        .ok_or_else(|| BackendError::decode(format!("expected a list of {key}")))
}

/// Map a provider transfer state onto [`TransferState`]
pub fn map_transfer_state(kind: BackendKind, state: &str) -> TransferState {
    match kind {
        BackendKind::LegacySdk | BackendKind::DirectRest => match state {
            "confirmed" => TransferState::Confirmed,
            "unconfirmed" | "pendingApproval" | "initialized" | "signed" | "pending" => {
                TransferState::Pending
            }
            "failed" | "rejected" | "removed" | "replaced" => TransferState::Failed,
            _ => TransferState::Unknown,
        },
        BackendKind::Anchorage => match state {
            "COMPLETED" => TransferState::Confirmed,
            "PENDING" | "IN_PROGRESS" | "QUEUED" => TransferState::Pending,
            "FAILED" | "REJECTED" | "CANCELED" | "EXPIRED" => TransferState::Failed,
            _ => TransferState::Unknown,
        },
    }
}

/// Normalize one wallet payload
///
/// `coin` is used when the payload does not name its coin. A vault wallet is
/// projected onto its first asset holding, see [`vault_wallet_holdings`] for all.
///
/// # Errors
///
/// Returns [`BackendError::Decode`] if the wallet has no id or no coin
pub fn normalize_wallet(
    raw: &Value,
    kind: BackendKind,
    coin: Option<&CoinId>,
) -> Result<Wallet, BackendError> {
    match kind {
        BackendKind::LegacySdk | BackendKind::DirectRest => {
            let wallet: RawWallet = parse(raw, "wallet")?;
            Ok(Wallet {
                id: required_id(wallet.id, "wallet")?,
                label: wallet.label,
                coin: coin_or(wallet.coin.as_deref(), coin)?,
                balance: unsigned_amount(
                    wallet.balance_string.as_deref(),
                    wallet.balance.as_ref(),
                ),
                confirmed_balance: unsigned_amount(
                    wallet.confirmed_balance_string.as_deref(),
                    wallet.confirmed_balance.as_ref(),
                ),
                spendable_balance: unsigned_amount(
                    wallet.spendable_balance_string.as_deref(),
                    wallet.spendable_balance.as_ref(),
                ),
                balance_display: wallet.balance_string,
                confirmed_balance_display: wallet.confirmed_balance_string,
                spendable_balance_display: wallet.spendable_balance_string,
            })
        }
        BackendKind::Anchorage => {
            let mut holdings = vault_wallet_holdings(raw, coin)?.into_iter();
            holdings
                .next()
                .ok_or_else(|| BackendError::decode("vault wallet without coin"))
        }
    }
}

/// Normalize a wallet listing (`{"wallets": [...]}` or a bare list)
///
/// # Errors
///
/// Returns [`BackendError::Decode`] if the listing or any wallet is malformed
pub fn normalize_wallet_list(
    raw: &Value,
    kind: BackendKind,
    coin: Option<&CoinId>,
) -> Result<Vec<Wallet>, BackendError> {
    let items = listing(raw, "wallets")?;
    match kind {
        BackendKind::Anchorage => {
            let mut wallets = Vec::with_capacity(items.len());
            for item in items {
                wallets.extend(vault_wallet_holdings(item, coin)?);
            }
            Ok(wallets)
        }
        BackendKind::LegacySdk | BackendKind::DirectRest => items
            .iter()
            .map(|item| normalize_wallet(item, kind, coin))
            .collect(),
    }
}

/// Coin of a vault wallet that reports neither assets nor a network
pub const UNKNOWN_VAULT_ASSET: &str = "unknown";

/// Project a vault wallet onto one [`Wallet`] per asset it holds
///
/// Quantities are decimal strings in major units, so only the display fields are
/// set. A wallet without assets yields one holding on its network (or on `coin`,
/// else on [`UNKNOWN_VAULT_ASSET`]), with no balances.
///
/// # Errors
///
/// Returns [`BackendError::Decode`] if the wallet has no id or is malformed
pub fn vault_wallet_holdings(
    raw: &Value,
    coin: Option<&CoinId>,
) -> Result<Vec<Wallet>, BackendError> {
    let wallet: RawVaultWallet = parse(raw, "vault wallet")?;
    let id = required_id(wallet.wallet_id, "vault wallet")?;
    let assets = wallet.assets.unwrap_or_default();

    if assets.is_empty() {
        let coin = match coin_or(wallet.network_id.as_deref(), coin) {
            Ok(coin) => coin,
            Err(_) => CoinId::new(UNKNOWN_VAULT_ASSET).map_err(BackendError::decode)?,
        };
        return Ok(vec![Wallet {
            id,
            label: wallet.wallet_name,
            coin,
            balance: None,
            confirmed_balance: None,
            spendable_balance: None,
            balance_display: None,
            confirmed_balance_display: None,
            spendable_balance_display: None,
        }]);
    }

    assets
        .into_iter()
        .map(|asset| {
            Ok(Wallet {
                id: id.clone(),
                label: wallet.wallet_name.clone(),
                coin: CoinId::new(asset.asset_type).map_err(BackendError::decode)?,
                balance: None,
                confirmed_balance: None,
                spendable_balance: None,
                balance_display: asset.total_balance.and_then(|q| q.quantity),
                confirmed_balance_display: None,
                spendable_balance_display: asset.available_balance.and_then(|q| q.quantity),
            })
        })
        .collect()
}

/// Normalize one transfer payload queried through `origin`
///
/// # Errors
///
/// Returns [`BackendError::Decode`] if the transfer has no id or is malformed
pub fn normalize_transaction(
    raw: &Value,
    kind: BackendKind,
    origin: &WalletRef,
) -> Result<Transaction, BackendError> {
    match kind {
        BackendKind::LegacySdk | BackendKind::DirectRest => normalize_transfer(raw, kind, origin),
        BackendKind::Anchorage => normalize_vault_transaction(raw, origin),
    }
}

fn normalize_transfer(
    raw: &Value,
    kind: BackendKind,
    origin: &WalletRef,
) -> Result<Transaction, BackendError> {
    let transfer: RawTransfer = parse(raw, "transfer")?;
    let id = required_id(transfer.id, "transfer")?;
    let coin = coin_or(transfer.coin.as_deref(), Some(&origin.coin))?;
    let wallet_id = transfer
        .wallet
        .unwrap_or_else(|| origin.wallet_id.clone());

    let entries = transfer
        .entries
        .unwrap_or_default()
        .into_iter()
        .map(|entry| LedgerEntry {
            value: signed_amount(entry.value_string.as_deref(), entry.value.as_ref()),
            address: entry.address.unwrap_or_default(),
            wallet: entry.wallet,
        })
        .collect();

    Ok(Transaction {
        id,
        wallet_ref: WalletRef::new(kind, coin.clone(), wallet_id),
        coin,
        chain_tx_id: transfer.txid,
        block_height: count(transfer.height.as_ref()),
        block_height_id: transfer.height_id,
        timestamp: timestamp(transfer.date.as_deref()),
        confirmations: count(transfer.confirmations.as_ref()),
        value: signed_amount(transfer.value_string.as_deref(), transfer.value.as_ref()),
        value_display: transfer.value_string,
        fee_display: transfer.fee_string,
        pay_go_fee_display: transfer.pay_go_fee_string,
        fiat_value: transfer.usd,
        fiat_rate: transfer.usd_rate,
        state: transfer
            .state
            .as_deref()
            .map(|state| map_transfer_state(kind, state))
            .unwrap_or_default(),
        tags: transfer
            .tags
            .unwrap_or_default()
            .into_iter()
            .collect::<BTreeSet<_>>(),
        history: transfer.history.unwrap_or_default(),
        comment: transfer.comment,
        entries,
    })
}

fn normalize_vault_transaction(
    raw: &Value,
    origin: &WalletRef,
) -> Result<Transaction, BackendError> {
    let transaction: RawVaultTransaction = parse(raw, "vault transaction")?;
    let id = required_id(transaction.transaction_id, "vault transaction")?;
    let coin = coin_or(transaction.asset_type.as_deref(), Some(&origin.coin))?;
    let amount = transaction.amount.unwrap_or_default();

    Ok(Transaction {
        id,
        wallet_ref: WalletRef::new(
            BackendKind::Anchorage,
            coin.clone(),
            origin.wallet_id.clone(),
        ),
        coin,
        chain_tx_id: transaction.blockchain_tx_id,
        block_height: None,
        block_height_id: None,
        timestamp: timestamp(transaction.created_at.as_deref()),
        confirmations: None,
        value: None,
        fiat_value: decimal(amount.current_usd_value.as_deref()),
        fiat_rate: decimal(amount.current_price.as_deref()),
        value_display: amount.quantity,
        fee_display: transaction.fee.and_then(|fee| fee.quantity),
        pay_go_fee_display: None,
        state: transaction
            .status
            .as_deref()
            .map(|status| map_transfer_state(BackendKind::Anchorage, status))
            .unwrap_or_default(),
        tags: BTreeSet::new(),
        history: Vec::new(),
        comment: transaction.comment,
        entries: Vec::new(),
    })
}

/// Normalize one page of a transfer listing queried through `origin`
///
/// Items keep the backend's order.
///
/// # Errors
///
/// Returns [`BackendError::Decode`] if the listing or any transfer is malformed
pub fn normalize_transaction_page(
    raw: &Value,
    kind: BackendKind,
    origin: &WalletRef,
) -> Result<TransactionPage, BackendError> {
    let (items, next_cursor) = match kind {
        BackendKind::LegacySdk | BackendKind::DirectRest => {
            (listing(raw, "transfers")?, transfer_next_cursor(raw))
        }
        BackendKind::Anchorage => (listing(raw, "transactions")?, vault_next_cursor(raw)?),
    };

    let items = items
        .iter()
        .map(|item| normalize_transaction(item, kind, origin))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TransactionPage {
        coin: origin.coin.clone(),
        wallet_id: origin.wallet_id.clone(),
        items,
        next_cursor,
    })
}

/// Normalize the token section of a wallet payload
///
/// Keyed reports come out ordered by symbol, listed reports in backend order.
/// `lookup` resolves token configuration; a token it does not know keeps
/// `token_config: None`.
///
/// # Errors
///
/// Returns [`BackendError::Decode`] if the token section is malformed, or
/// [`BackendError::UnsupportedOperation`] for a backend without token reports
pub fn normalize_token_report<F>(
    raw: &Value,
    kind: BackendKind,
    lookup: F,
) -> Result<Vec<TokenBalance>, BackendError>
where
    F: Fn(&str) -> Option<TokenConfig>,
{
    match TokenReport::parse(raw, kind)? {
        TokenReport::Keyed(tokens) => Ok(tokens
            .into_iter()
            .map(|(symbol, holding)| TokenBalance {
                token_config: lookup(&symbol),
                balance: display_balance(holding.balance_string, holding.balance),
                symbol,
            })
            .collect()),
        TokenReport::Listed(tokens) => tokens
            .into_iter()
            .map(|token| {
                let symbol = required_id(token.symbol, "token entry")?;
                Ok(TokenBalance {
                    token_config: lookup(&symbol),
                    balance: display_balance(token.balance_string, token.balance),
                    symbol,
                })
            })
            .collect(),
    }
}

fn display_balance(string: Option<String>, number: Option<Value>) -> Option<String> {
    string.or_else(|| match number {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Normalize the vault backend's asset type listing
///
/// # Errors
///
/// Returns [`BackendError::Decode`] if the listing is malformed or an entry has no
/// asset type
pub fn normalize_asset_types(raw: &Value) -> Result<Vec<CoinInfo>, BackendError> {
    listing(raw, "assetTypes")?
        .iter()
        .map(|item| {
            let asset: RawAssetType = parse(item, "asset type")?;
            let coin = CoinId::new(required_id(asset.asset_type, "asset type")?)
                .map_err(BackendError::decode)?;
            Ok(CoinInfo {
                full_name: asset.name.unwrap_or_else(|| coin.to_string()),
                family: asset.network_id.unwrap_or_else(|| coin.to_string()),
                decimal_places: asset.decimals.unwrap_or_default(),
                is_testnet: asset.is_testnet,
                coin,
            })
        })
        .collect()
}
