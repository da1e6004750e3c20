// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error handling module
//!
//! This module provides the error types for server operations and their mapping
//! onto HTTP responses. Backend failures are never retried or reinterpreted here:
//! they surface as a 500 carrying the failure classification.

use std::net::SocketAddr;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use custody_backends::SetupError;
use custody_client::{BackendError, BackendKind};
use serde_json::json;
use thiserror::Error;

/// Comprehensive error types for server operations
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration validation errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Network binding errors
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        /// Socket address that failed to bind
        address: SocketAddr,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Server startup errors
    #[error("Server startup failed: {source}")]
    Startup {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Server shutdown errors
    #[error("Server shutdown failed: {source}")]
    Shutdown {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// A backend adapter could not be built
    #[error("Backend setup failed: {0}")]
    Setup(#[from] SetupError),

    /// The requested backend has no credential configured
    #[error("Backend {backend} is not configured")]
    BackendUnavailable {
        /// Backend the request was routed to
        backend: BackendKind,
    },

    /// A backend call failed
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Input validation errors
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, json_body) = match &self {
            ServerError::Config { .. }
            | ServerError::Bind { .. }
            | ServerError::Startup { .. }
            | ServerError::Shutdown { .. }
            | ServerError::Setup(..) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": self.to_string(),
                    "status": StatusCode::INTERNAL_SERVER_ERROR.as_u16()
                }),
            ),
            ServerError::BackendUnavailable { backend } => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({
                    "error": self.to_string(),
                    "backend": backend.name(),
                    "status": StatusCode::SERVICE_UNAVAILABLE.as_u16()
                }),
            ),
            ServerError::Backend(error) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": error.to_string(),
                    "kind": error.kind(),
                    "status": StatusCode::INTERNAL_SERVER_ERROR.as_u16()
                }),
            ),
            ServerError::ValidationError(..) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": self.to_string(),
                    "status": StatusCode::BAD_REQUEST.as_u16()
                }),
            ),
        };

        (status, Json(json_body)).into_response()
    }
}
