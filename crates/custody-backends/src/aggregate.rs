// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Concurrent multi-coin queries with partial-failure semantics
//!
//! [`aggregate`] runs one query per target concurrently and waits for all of them.
//! A failing target never aborts the others; its error is folded into a
//! [`PerTargetResult::Failure`] at the target's position. Results always come back
//! in request order, whatever order the queries completed in.

use std::future::Future;

use custody_client::{
    BackendError, CoinId, CoinWallets, CustodyBackend, ErrorKind, Tally, WalletFilter,
};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Outcome of the query for one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum PerTargetResult<T> {
    /// The query succeeded
    Success {
        /// Query result
        value: T,
    },
    /// The query failed
    Failure {
        /// Target whose query failed
        target: CoinId,
        /// Classification of the failure
        error_kind: ErrorKind,
        /// Human readable failure description
        message: String,
    },
}

impl<T> PerTargetResult<T> {
    /// Fold a failed query into a result
    pub fn failure(target: CoinId, error: &BackendError) -> Self {
        Self::Failure {
            target,
            error_kind: error.kind(),
            message: error.to_string(),
        }
    }

    /// Whether the query succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The successful value, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success { value } => Some(value),
            Self::Failure { .. } => None,
        }
    }
}

/// Outcomes of a multi-target query, in request order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult<T> {
    /// One outcome per requested target, in request order
    pub per_target: Vec<PerTargetResult<T>>,
    /// Number of successful outcomes
    pub total_succeeded: usize,
}

impl<T> AggregateResult<T> {
    /// Successful values, in request order
    pub fn successes(&self) -> impl Iterator<Item = &T> {
        self.per_target.iter().filter_map(PerTargetResult::value)
    }

    /// Failed outcomes, in request order
    pub fn failures(&self) -> impl Iterator<Item = &PerTargetResult<T>> {
        self.per_target.iter().filter(|result| !result.is_success())
    }
}

impl<T: Tally> AggregateResult<T> {
    /// Items across all successful outcomes, failures counting zero
    pub fn total_items(&self) -> usize {
        self.successes().map(Tally::item_count).sum()
    }
}

/// Run `query` for every target concurrently and collect every outcome
///
/// No retries, no deadline of its own (each call is bounded by its adapter's
/// request timeout) and no early abort. Duplicate targets are queried once per
/// occurrence.
pub async fn aggregate<T, F, Fut>(targets: &[CoinId], query: F) -> AggregateResult<T>
where
    F: Fn(CoinId) -> Fut,
    Fut: Future<Output = Result<T, BackendError>>,
{
    let calls = targets.iter().map(|target| {
        let call = query(target.clone());
        async move { (target, call.await) }
    });

    let per_target: Vec<_> = join_all(calls)
        .await
        .into_iter()
        .map(|(target, outcome)| match outcome {
            Ok(value) => PerTargetResult::Success { value },
            Err(error) => {
                warn!(%target, kind = %error.kind(), %error, "query failed for target");
                PerTargetResult::failure(target.clone(), &error)
            }
        })
        .collect();

    let total_succeeded = per_target.iter().filter(|r| r.is_success()).count();
    info!(
        targets = targets.len(),
        succeeded = total_succeeded,
        "aggregate query finished"
    );

    AggregateResult {
        per_target,
        total_succeeded,
    }
}

/// List the wallets of every coin through `backend`
pub async fn wallet_balances<B>(
    backend: &B,
    coins: &[CoinId],
    filter: &WalletFilter,
) -> AggregateResult<CoinWallets>
where
    B: CustodyBackend,
{
    aggregate(coins, |coin| async move {
        let wallets = backend.list_wallets(&coin, filter).await?;
        Ok(CoinWallets::new(coin, wallets))
    })
    .await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use custody_client::{BackendKind, Wallet};

    use super::*;

    fn coins(ids: &[&str]) -> Vec<CoinId> {
        ids.iter().map(|id| CoinId::new(*id).unwrap()).collect()
    }

    /// Backend whose latency and failure are driven by the coin name
    struct ScriptedBackend;

    impl CustodyBackend for ScriptedBackend {
        fn kind(&self) -> BackendKind {
            BackendKind::DirectRest
        }

        async fn list_wallets(
            &self,
            coin: &CoinId,
            _filter: &WalletFilter,
        ) -> Result<Vec<Wallet>, BackendError> {
            let delay = match coin.as_str() {
                "slow" => 60,
                "medium" => 30,
                _ => 0,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;

            if coin.as_str().starts_with("bad") {
                return Err(BackendError::Http {
                    status: 500,
                    body: "upstream down".to_string(),
                });
            }

            Ok(vec![Wallet {
                id: format!("{coin}-wallet"),
                label: None,
                coin: coin.clone(),
                balance: Some(1),
                confirmed_balance: None,
                spendable_balance: None,
                balance_display: None,
                confirmed_balance_display: None,
                spendable_balance_display: None,
            }])
        }
    }

    #[tokio::test]
    async fn results_keep_request_order() {
        let targets = coins(&["slow", "fast", "medium"]);
        let result = wallet_balances(&ScriptedBackend, &targets, &WalletFilter::default()).await;

        let order: Vec<_> = result
            .successes()
            .map(|listing| listing.coin.as_str())
            .collect();
        assert_eq!(order, ["slow", "fast", "medium"]);
        assert_eq!(result.total_succeeded, 3);
        assert_eq!(result.total_items(), 3);
    }

    #[tokio::test]
    async fn failures_are_folded_in_place() {
        let targets = coins(&["tbtc", "bad-teth", "slow"]);
        let result = wallet_balances(&ScriptedBackend, &targets, &WalletFilter::default()).await;

        assert_eq!(result.per_target.len(), 3);
        assert_eq!(result.total_succeeded, 2);
        assert_eq!(result.total_items(), 2);

        match &result.per_target[1] {
            PerTargetResult::Failure {
                target,
                error_kind,
                message,
            } => {
                assert_eq!(target.as_str(), "bad-teth");
                assert_eq!(*error_kind, ErrorKind::Http);
                assert_eq!(message, "HTTP 500: upstream down");
            }
            other => panic!("Expected failure, got: {other:?}"),
        }
        assert_eq!(result.failures().count(), 1);
    }

    #[tokio::test]
    async fn all_failures_and_empty_input() {
        let targets = coins(&["bad-1", "bad-2"]);
        let result = wallet_balances(&ScriptedBackend, &targets, &WalletFilter::default()).await;
        assert_eq!(result.total_succeeded, 0);
        assert_eq!(result.total_items(), 0);

        let result = wallet_balances(&ScriptedBackend, &[], &WalletFilter::default()).await;
        assert!(result.per_target.is_empty());
        assert_eq!(result.total_succeeded, 0);
    }

    #[tokio::test]
    async fn duplicate_targets_are_queried_each_time() {
        let targets = coins(&["tbtc", "tbtc"]);
        let result = aggregate(&targets, |coin| async move { Ok::<_, BackendError>(coin) }).await;
        assert_eq!(result.total_succeeded, 2);
    }

    #[tokio::test]
    async fn queries_run_concurrently() {
        let targets = coins(&["slow", "slow", "slow", "slow"]);
        let started = std::time::Instant::now();
        let result = wallet_balances(&ScriptedBackend, &targets, &WalletFilter::default()).await;
        assert_eq!(result.total_succeeded, 4);
        assert!(started.elapsed() < Duration::from_millis(200));
    }

    #[test]
    fn per_target_result_serialization() {
        let failure: PerTargetResult<CoinWallets> = PerTargetResult::failure(
            CoinId::new("teth").unwrap(),
            &BackendError::InvalidCoin {
                coin: "teth".to_string(),
            },
        );
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["target"], "teth");
        assert_eq!(json["errorKind"], "invalid_coin");
    }
}
