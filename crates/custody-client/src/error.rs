// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error types shared by every custody adapter
//!
//! Adapters never let a provider fault escape as a panic. Every failure is
//! classified into one [`BackendError`] variant, and [`BackendError::kind`] gives
//! the serializable [`ErrorKind`] used when a failure is folded into an aggregate.

use std::fmt;

use serde::{Deserialize, Serialize};
use shared_types::BackendKind;
use thiserror::Error;
use utoipa::ToSchema;

use crate::Capability;

/// Common errors that can occur when querying a custody backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum BackendError {
    /// Transport-level failure, no response was received
    #[error("network error: {cause}")]
    Network { cause: String },

    /// The backend answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// A successful response could not be decoded
    #[error("failed to decode response: {message}")]
    Decode { message: String },

    /// The coin is not known to the backend
    #[error("invalid coin: {coin}")]
    InvalidCoin { coin: String },

    /// The pagination cursor is blank or was rejected by the backend
    #[error("invalid cursor: {cursor}")]
    InvalidCursor { cursor: String },

    /// The backend does not implement the requested capability
    #[error("{backend} does not support {capability}")]
    UnsupportedOperation {
        backend: BackendKind,
        capability: Capability,
    },

    /// Provider-specific fault not otherwise classified
    #[error("{backend} error: {message}")]
    Provider {
        backend: BackendKind,
        message: String,
    },
}

impl BackendError {
    /// Create an error for a capability the backend does not implement
    pub fn unsupported(backend: BackendKind, capability: Capability) -> Self {
        Self::UnsupportedOperation {
            backend,
            capability,
        }
    }

    /// Create a decode error from any displayable cause
    pub fn decode(cause: impl fmt::Display) -> Self {
        Self::Decode {
            message: cause.to_string(),
        }
    }

    /// Create a provider-specific error
    pub fn provider(backend: BackendKind, message: impl Into<String>) -> Self {
        Self::Provider {
            backend,
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } => ErrorKind::Network,
            Self::Http { .. } => ErrorKind::Http,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::InvalidCoin { .. } => ErrorKind::InvalidCoin,
            Self::InvalidCursor { .. } => ErrorKind::InvalidCursor,
            Self::UnsupportedOperation { .. } => ErrorKind::UnsupportedOperation,
            Self::Provider { .. } => ErrorKind::Backend,
        }
    }

    /// HTTP status of the backend response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Serializable classification of a [`BackendError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum ErrorKind {
    Network,
    Http,
    Decode,
    InvalidCoin,
    InvalidCursor,
    UnsupportedOperation,
    Backend,
}

impl ErrorKind {
    /// Returns the stable name of the error kind
    pub const fn name(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Http => "http",
            Self::Decode => "decode",
            Self::InvalidCoin => "invalid_coin",
            Self::InvalidCursor => "invalid_cursor",
            Self::UnsupportedOperation => "unsupported_operation",
            Self::Backend => "backend",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
