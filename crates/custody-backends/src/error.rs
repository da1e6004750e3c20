// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Adapter construction errors

use thiserror::Error;

/// Errors raised while building an adapter, before any request is made
#[derive(Debug, Error)]
pub enum SetupError {
    /// HTTP client construction failed
    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
