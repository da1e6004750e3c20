// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Custody backend identifiers
//!
//! Every custody provider the gateway talks to has its own authentication scheme
//! and API shape. [`BackendKind`] names them so that errors, logs and normalized
//! entities can say which provider they came from.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Supported custody backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Stateful SDK-style client with coin-scoped sub-clients
    LegacySdk,
    /// Plain REST client with a bearer credential, no SDK
    DirectRest,
    /// Vault REST provider authenticated with an API access key header
    Anchorage,
}

impl BackendKind {
    /// Returns the stable name of the backend, as used in routes and logs
    pub const fn name(self) -> &'static str {
        match self {
            Self::LegacySdk => "legacy-sdk",
            Self::DirectRest => "direct-rest",
            Self::Anchorage => "anchorage",
        }
    }

    /// Returns all supported backends
    pub const fn all() -> &'static [Self] {
        &[Self::LegacySdk, Self::DirectRest, Self::Anchorage]
    }

    /// Returns whether the backend addresses wallets by coin and wallet id
    ///
    /// The vault provider addresses everything by vault identifier instead.
    pub const fn is_coin_scoped(self) -> bool {
        matches!(self, Self::LegacySdk | Self::DirectRest)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = BackendKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| BackendKindParseError(s.to_string()))
    }
}

/// Error type for backend name parsing
#[derive(Debug, thiserror::Error)]
#[error("unknown backend: {0}. Supported backends are: legacy-sdk, direct-rest, anchorage")]
pub struct BackendKindParseError(pub String);
