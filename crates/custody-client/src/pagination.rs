// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Forward-only pagination over backend transaction listings
//!
//! Cursors are opaque: the gateway hands back whatever continuation token the
//! backend produced and forwards it unchanged on the next call.

use serde::{Deserialize, Serialize};
use shared_types::{BackendKind, CoinId};
use utoipa::ToSchema;

use crate::{BackendError, Tally, Transaction};

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Page size the SDK-style backend applies whenever a continuation cursor is present
///
/// Observed behavior of that backend, kept as is: a continuation request ignores
/// the requested limit.
pub const LEGACY_CONTINUATION_PAGE_SIZE: u32 = 20;

/// Largest page the SDK-style and direct REST backends accept
pub const LEGACY_MAX_PAGE_SIZE: u32 = 500;

/// Largest page the vault backend accepts
pub const ANCHORAGE_MAX_PAGE_SIZE: u32 = 100;

/// Requested page of a transaction listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// Upper bound on the page size
    pub limit: Option<u32>,
    /// Continuation cursor from a previous page, `None` for the first page
    pub cursor: Option<String>,
}

impl PageRequest {
    /// Request the first page with the default size
    pub fn first() -> Self {
        Self::default()
    }

    /// Request the page following `cursor`
    pub fn after(cursor: impl Into<String>) -> Self {
        Self {
            limit: None,
            cursor: Some(cursor.into()),
        }
    }

    /// Bound the page size
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The continuation cursor, validated
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidCursor`] when the cursor is present but blank
    pub fn cursor(&self) -> Result<Option<&str>, BackendError> {
        match self.cursor.as_deref() {
            Some(cursor) if cursor.trim().is_empty() => Err(BackendError::InvalidCursor {
                cursor: cursor.to_string(),
            }),
            cursor => Ok(cursor),
        }
    }

    /// Page size actually sent to `backend`
    ///
    /// The requested limit (or [`DEFAULT_PAGE_SIZE`]) is clamped to `1..=max`. The
    /// SDK-style backend uses [`LEGACY_CONTINUATION_PAGE_SIZE`] whenever a cursor
    /// is present, regardless of the requested limit.
    pub fn effective_limit(&self, backend: BackendKind) -> u32 {
        if backend == BackendKind::LegacySdk && self.cursor.is_some() {
            return LEGACY_CONTINUATION_PAGE_SIZE;
        }

        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, max_page_size(backend))
    }
}

/// Largest page size `backend` accepts
pub const fn max_page_size(backend: BackendKind) -> u32 {
    match backend {
        BackendKind::LegacySdk | BackendKind::DirectRest => LEGACY_MAX_PAGE_SIZE,
        BackendKind::Anchorage => ANCHORAGE_MAX_PAGE_SIZE,
    }
}

/// One page of a wallet's transactions, in backend order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    /// Coin of the listed wallet
    pub coin: CoinId,
    /// Listed wallet (or vault) identifier
    pub wallet_id: String,
    /// Transactions, never re-sorted
    pub items: Vec<Transaction>,
    /// Cursor for the next page, `None` when this is the last page
    pub next_cursor: Option<String>,
}

impl TransactionPage {
    /// Whether the backend signalled another page
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Request for the following page, keeping `limit`
    pub fn next_request(&self, limit: Option<u32>) -> Option<PageRequest> {
        self.next_cursor.as_ref().map(|cursor| PageRequest {
            limit,
            cursor: Some(cursor.clone()),
        })
    }
}

impl Tally for TransactionPage {
    fn item_count(&self) -> usize {
        self.items.len()
    }
}
