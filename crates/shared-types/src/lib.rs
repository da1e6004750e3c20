// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Shared types for the custody gateway
//!
//! This crate provides the identifiers that are shared across multiple crates
//! in the custody gateway workspace, avoiding circular dependencies.

pub mod backends;
pub mod coins;

pub use backends::{BackendKind, BackendKindParseError};
pub use coins::{CoinId, CoinIdParseError, WalletRef};
