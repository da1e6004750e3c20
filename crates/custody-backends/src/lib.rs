// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Custody backend adapters
//!
//! This crate provides implementations of the `CustodyBackend` trait for the
//! supported custody providers, along with the shared request, normalization and
//! aggregation machinery they are built from.
//!
//! # Architecture
//!
//! - **Adapters**: [`legacy_sdk`], [`direct_rest`], [`anchorage`] - one per provider protocol
//! - **Request Execution**: [`executor::RequestExecutor`] - authenticated single-attempt JSON requests
//! - **Normalization**: [`normalize`] - provider payloads reshaped into the common entities
//! - **Aggregation**: [`aggregate`] - concurrent multi-coin queries with partial failures
//! - **Registry Pattern**: [`registry::BackendRegistry`] - holds the configured adapters
//! - **Validation Utilities**: [`non_empty_string::NonEmptyString`] - ensures non-empty configuration values
//!
//! # Features
//!
//! - **Partial Failure**: one failing coin never hides the others' results
//! - **Request Order**: aggregate results follow request order, not completion order
//! - **Opaque Cursors**: continuation tokens are forwarded exactly as the backend issued them
//! - **Testing Support**: wiremock-backed tests for every HTTP-facing adapter

pub mod aggregate;
pub mod anchorage;
pub mod coins;
pub mod cursor;
pub mod direct_rest;
pub mod error;
pub mod executor;
pub mod legacy_sdk;
pub mod non_empty_string;
pub mod normalize;
pub mod registry;

pub use aggregate::{AggregateResult, PerTargetResult, aggregate, wallet_balances};
pub use anchorage::*;
pub use coins::CoinRegistry;
pub use direct_rest::*;
pub use error::SetupError;
pub use executor::{RequestExecutor, RequestPath};
pub use legacy_sdk::*;
pub use non_empty_string::{Credential, NonEmptyString};
pub use registry::*;
