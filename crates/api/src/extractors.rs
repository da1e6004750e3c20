// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Custom extractors for improved error handling
//!
//! Axum's own path and query rejections answer with plain text. These wrappers
//! turn them into `ServerError::ValidationError`, so every client error carries the
//! same JSON body as the rest of the API.

use axum::{
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::ServerError;

/// Query string extractor answering malformed input with a JSON 400
#[derive(Debug)]
pub struct QueryExtractor<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryExtractor<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection| {
                ServerError::ValidationError(format!("invalid query: {}", rejection.body_text()))
            })
    }
}

/// Path parameter extractor answering malformed input with a JSON 400
#[derive(Debug)]
pub struct PathExtractor<T>(pub T);

impl<T, S> FromRequestParts<S> for PathExtractor<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| Self(value))
            .map_err(|rejection| {
                ServerError::ValidationError(format!("invalid path: {}", rejection.body_text()))
            })
    }
}
