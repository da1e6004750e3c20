// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server state management module
//!
//! This module provides shared application state for the custody gateway,
//! including configuration, the configured backend adapters, and coordinated
//! cancellation.

use std::{collections::BTreeMap, sync::Arc};

use custody_backends::{AnchorageAdapter, BackendRegistry, DirectRestAdapter, LegacySdkAdapter};
use custody_client::BackendKind;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;

use crate::{
    config::{Environment, ServerConfig},
    error::{ServerError, ServerResult},
};

/// Shared application state with cancellation token support
#[derive(Debug, Clone)]
pub struct ServerState {
    /// Server configuration
    config: ServerConfig,
    /// Configured custody backends
    backends: Arc<BackendRegistry>,
    /// Cancellation token for coordinated shutdown
    pub cancellation_token: CancellationToken,
}

impl ServerState {
    /// Create new server state
    pub fn new(
        config: ServerConfig,
        backends: Arc<BackendRegistry>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            config,
            backends,
            cancellation_token,
        }
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Configured custody backends
    pub fn backends(&self) -> &Arc<BackendRegistry> {
        &self.backends
    }

    /// The SDK-style adapter
    ///
    /// # Errors
    ///
    /// Returns `ServerError::BackendUnavailable` if the backend is not configured
    pub fn legacy_sdk(&self) -> ServerResult<&LegacySdkAdapter> {
        self.backends
            .legacy_sdk()
            .ok_or(ServerError::BackendUnavailable {
                backend: BackendKind::LegacySdk,
            })
    }

    /// The direct REST adapter
    ///
    /// # Errors
    ///
    /// Returns `ServerError::BackendUnavailable` if the backend is not configured
    pub fn direct_rest(&self) -> ServerResult<&DirectRestAdapter> {
        self.backends
            .direct_rest()
            .ok_or(ServerError::BackendUnavailable {
                backend: BackendKind::DirectRest,
            })
    }

    /// The vault adapter
    ///
    /// # Errors
    ///
    /// Returns `ServerError::BackendUnavailable` if the backend is not configured
    pub fn anchorage(&self) -> ServerResult<&AnchorageAdapter> {
        self.backends
            .anchorage()
            .ok_or(ServerError::BackendUnavailable {
                backend: BackendKind::Anchorage,
            })
    }

    /// Report which backends are configured
    ///
    /// No backend is contacted; the gateway holds no connections to probe.
    pub fn health_check(&self) -> HealthCheck {
        let backends: BTreeMap<String, BackendStatus> = BackendKind::all()
            .iter()
            .map(|backend| {
                let status = if self.backends.is_configured(*backend) {
                    BackendStatus::Configured
                } else {
                    BackendStatus::NotConfigured
                };
                (backend.name().to_string(), status)
            })
            .collect();

        let status = if self.backends.backend_count() == 0 {
            HealthStatus::Degraded {
                reason: Box::from("no custody backend is configured"),
            }
        } else {
            HealthStatus::Up
        };

        HealthCheck {
            status,
            version: Box::from(env!("CARGO_PKG_VERSION")),
            environment: self.config.environment,
            timestamp: chrono::Utc::now().to_rfc3339(),
            backends,
        }
    }
}

/// Health status of the service
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum HealthStatus {
    /// Service is fully operational
    Up,

    /// Service is running but cannot answer every route
    Degraded {
        /// Human-readable explanation of the degradation condition
        reason: Box<str>,
    },
}

/// Whether a backend can be queried
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BackendStatus {
    /// A credential is configured, the backend's routes are served
    Configured,
    /// No credential, the backend's routes answer 503
    NotConfigured,
}

/// Health check status
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthCheck {
    /// Service status
    pub status: HealthStatus,
    /// Service version
    #[schema(value_type = String)]
    pub version: Box<str>,
    /// Environment
    pub environment: Environment,
    /// Timestamp
    pub timestamp: String,
    /// Status of each custody backend, by backend name
    pub backends: BTreeMap<String, BackendStatus>,
}
