// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Continuation cursors as the backends encode them
//!
//! The SDK-style and direct REST backends return the next cursor as
//! `nextBatchPrevId` and expect it back as `prevId`. The vault backend returns a
//! `page.next` link whose `afterId` query parameter is the cursor.

use custody_client::BackendError;
use serde_json::Value;
use url::Url;

const RELATIVE_LINK_BASE: &str = "https://cursor.invalid/";

/// Cursor for the page after a transfer listing, `None` on the last page
pub fn transfer_next_cursor(raw: &Value) -> Option<String> {
    raw.get("nextBatchPrevId")
        .and_then(Value::as_str)
        .filter(|cursor| !cursor.trim().is_empty())
        .map(str::to_string)
}

/// Cursor for the page after a vault listing, `None` on the last page
///
/// # Errors
///
/// Returns [`BackendError::Decode`] if `page.next` is present but carries no `afterId`
pub fn vault_next_cursor(raw: &Value) -> Result<Option<String>, BackendError> {
    let Some(next) = raw
        .get("page")
        .and_then(|page| page.get("next"))
        .and_then(Value::as_str)
        .filter(|next| !next.trim().is_empty())
    else {
        return Ok(None);
    };

    let link = Url::parse(RELATIVE_LINK_BASE)
        .and_then(|base| base.join(next))
        .map_err(|e| BackendError::decode(format!("invalid page link {next}: {e}")))?;

    link.query_pairs()
        .find(|(key, _)| key == "afterId")
        .map(|(_, value)| Some(value.into_owned()))
        .ok_or_else(|| BackendError::decode(format!("page link without afterId: {next}")))
}

/// Reclassify a rejected continuation request
///
/// An HTTP 400 answered to a request that carried `cursor` means the backend did
/// not accept the cursor. It becomes [`BackendError::InvalidCursor`]; every other
/// error passes through unchanged.
pub fn classify_cursor_rejection(error: BackendError, cursor: Option<&str>) -> BackendError {
    match (error, cursor) {
        (BackendError::Http { status: 400, .. }, Some(cursor)) => BackendError::InvalidCursor {
            cursor: cursor.to_string(),
        },
        (error, _) => error,
    }
}
