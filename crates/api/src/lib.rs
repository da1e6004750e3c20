// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Custody Gateway Server Implementation
//!
//! This crate provides the HTTP server of the custody gateway, built with Axum. It
//! exposes one route group per custody backend on top of the `custody-backends`
//! adapters, with hierarchical configuration and graceful shutdown.
//!
//! # Module Structure
//!
//! - [`config`]: Server configuration and environment management with hierarchical loading
//! - [`error`]: Error types and HTTP response handling with proper status codes
//! - [`extractors`]: Path and query extractors answering malformed input with JSON errors
//! - [`state`]: Shared application state management with cancellation token support
//! - [`server`]: Main server implementation, lifecycle, and coordinated shutdown
//! - [`routes`]: Route configuration and HTTP request handlers
//! - [`openapi`]: `OpenAPI` specification and Swagger UI endpoints for API documentation
//!
//! # Key Features
//!
//! - **Backend Integration**: Orchestrates the configured adapters via registry pattern
//! - **Partial Failure**: Multi-coin routes report failing coins in place
//! - **Graceful Shutdown**: Coordinated termination using `CancellationToken`
//! - **Health Monitoring**: Reports which custody backends are configured

pub mod config;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{Environment, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use server::{Server, ShutdownConfig};
pub use state::{HealthCheck, ServerState};
