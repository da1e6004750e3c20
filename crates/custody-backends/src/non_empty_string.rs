// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Non-empty string and credential wrappers for backend configuration
//!
//! Backend configurations carry base URLs and credentials that are useless when
//! blank. [`NonEmptyString`] makes the blank state unrepresentable, and
//! [`Credential`] additionally keeps the secret out of `Debug` output so that
//! configurations can be logged.
//!
//! ```rust
//! use custody_backends::{Credential, NonEmptyString};
//!
//! let base_url = NonEmptyString::new("https://api.anchorage-staging.com").unwrap();
//! assert_eq!(base_url.as_str(), "https://api.anchorage-staging.com");
//!
//! assert!(NonEmptyString::new("   ").is_err());
//!
//! let key = Credential::new("sk-live-123").unwrap();
//! assert_eq!(format!("{key:?}"), "Credential(***)");
//! assert_eq!(key.expose(), "sk-live-123");
//! ```

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// A string guaranteed to contain at least one non-whitespace character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyString(Box<str>);

impl NonEmptyString {
    /// Create a new `NonEmptyString`
    ///
    /// # Errors
    ///
    /// Returns a descriptive message if the string is empty or whitespace-only
    pub fn new(s: impl Into<String>) -> Result<Self, String> {
        let s = s.into();
        if s.trim().is_empty() {
            Err("String cannot be empty or whitespace-only".to_string())
        } else {
            Ok(NonEmptyString(s.into_boxed_str()))
        }
    }

    /// Get a string slice of the contained value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NonEmptyString {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for NonEmptyString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

/// A non-empty secret (bearer token, API key) that never shows in `Debug` output
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Credential(NonEmptyString);

impl Credential {
    /// Create a new credential
    ///
    /// # Errors
    ///
    /// Returns a descriptive message if the secret is empty or whitespace-only
    pub fn new(secret: impl Into<String>) -> Result<Self, String> {
        NonEmptyString::new(secret).map(Self)
    }

    /// The secret value, for placing into a request header
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}
