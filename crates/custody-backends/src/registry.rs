// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Registry of the configured custody adapters
//!
//! Every backend is optional: it is only present when its credential was
//! configured. Callers look adapters up by backend and get `None` when it is not
//! available.

use std::sync::Arc;

use custody_client::BackendKind;
use tracing::info;

use crate::{
    AnchorageAdapter, AnchorageConfig, CoinRegistry, DirectRestAdapter, DirectRestConfig,
    LegacySdkAdapter, LegacySdkConfig, error::SetupError,
};

/// Configured custody adapters
#[derive(Debug, Default)]
pub struct BackendRegistry {
    legacy_sdk: Option<LegacySdkAdapter>,
    direct_rest: Option<DirectRestAdapter>,
    anchorage: Option<AnchorageAdapter>,
}

impl BackendRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the given adapters
    pub fn with_backends(
        legacy_sdk: Option<LegacySdkAdapter>,
        direct_rest: Option<DirectRestAdapter>,
        anchorage: Option<AnchorageAdapter>,
    ) -> Self {
        Self {
            legacy_sdk,
            direct_rest,
            anchorage,
        }
    }

    /// Build every adapter whose configuration is present
    ///
    /// # Errors
    ///
    /// Returns an error if a present configuration cannot produce an adapter
    pub fn from_configs(
        legacy_sdk: Option<&LegacySdkConfig>,
        direct_rest: Option<&DirectRestConfig>,
        anchorage: Option<&AnchorageConfig>,
        coins: &Arc<CoinRegistry>,
    ) -> Result<Self, SetupError> {
        let registry = Self {
            legacy_sdk: legacy_sdk
                .map(|config| LegacySdkAdapter::new(config, Arc::clone(coins)))
                .transpose()?,
            direct_rest: direct_rest
                .map(|config| DirectRestAdapter::new(config, Arc::clone(coins)))
                .transpose()?,
            anchorage: anchorage.map(AnchorageAdapter::new).transpose()?,
        };

        info!(backends = ?registry.backend_names(), "custody backends configured");
        Ok(registry)
    }

    /// SDK-style adapter, if configured
    pub fn legacy_sdk(&self) -> Option<&LegacySdkAdapter> {
        self.legacy_sdk.as_ref()
    }

    /// Direct REST adapter, if configured
    pub fn direct_rest(&self) -> Option<&DirectRestAdapter> {
        self.direct_rest.as_ref()
    }

    /// Anchorage adapter, if configured
    pub fn anchorage(&self) -> Option<&AnchorageAdapter> {
        self.anchorage.as_ref()
    }

    /// Whether `backend` is configured
    pub fn is_configured(&self, backend: BackendKind) -> bool {
        match backend {
            BackendKind::LegacySdk => self.legacy_sdk.is_some(),
            BackendKind::DirectRest => self.direct_rest.is_some(),
            BackendKind::Anchorage => self.anchorage.is_some(),
        }
    }

    /// Get the number of configured backends
    pub fn backend_count(&self) -> usize {
        BackendKind::all()
            .iter()
            .filter(|backend| self.is_configured(**backend))
            .count()
    }

    /// Get the names of all configured backends
    pub fn backend_names(&self) -> Vec<&'static str> {
        BackendKind::all()
            .iter()
            .filter(|backend| self.is_configured(**backend))
            .map(|backend| backend.name())
            .collect()
    }
}
