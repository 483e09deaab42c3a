//! One aggregation pass: every source lists its pairs for a chain and each
//! pair becomes a protocol carrying the account's derivative balance.

use {
    alloy::primitives::{Address, U256},
    futures::future::join_all,
    model::{Protocol, ProtocolKind, TokenPair},
    serde::Deserialize,
    shared::{sources::PairFetching, wallet::Wallet},
    std::sync::Arc,
};

/// What a failing source contributes to a pass. The pass itself always
/// completes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdapterFailurePolicy {
    /// Log and treat the source as having no pairs.
    #[default]
    Degrade,
    /// Like `Degrade` but also report the failure in the outcome.
    Surface,
}

#[derive(Debug, thiserror::Error)]
#[error("{kind} source failed")]
pub struct AdapterFailure {
    pub kind: ProtocolKind,
    #[source]
    pub error: anyhow::Error,
}

#[derive(Debug, Default)]
pub struct AggregationOutcome {
    pub chain_id: u64,
    pub protocols: Vec<Protocol>,
    /// Only populated with [`AdapterFailurePolicy::Surface`].
    pub failures: Vec<AdapterFailure>,
}

pub struct Aggregator {
    sources: Vec<Arc<dyn PairFetching>>,
    wallet: Arc<dyn Wallet>,
    failure_policy: AdapterFailurePolicy,
}

impl Aggregator {
    /// Protocols are listed in the order of `sources`.
    pub fn new(
        sources: Vec<Arc<dyn PairFetching>>,
        wallet: Arc<dyn Wallet>,
        failure_policy: AdapterFailurePolicy,
    ) -> Self {
        Self {
            sources,
            wallet,
            failure_policy,
        }
    }

    pub async fn aggregate(&self, chain_id: u64, account: Option<Address>) -> AggregationOutcome {
        let fetched = join_all(
            self.sources
                .iter()
                .map(|source| async move { (source.kind(), source.fetch_pairs(chain_id).await) }),
        )
        .await;

        let mut failures = Vec::new();
        let mut entries: Vec<(ProtocolKind, TokenPair)> = Vec::new();
        for (kind, result) in fetched {
            match result {
                Ok(pairs) => {
                    tracing::debug!(%kind, chain_id, pairs = pairs.len(), "source listed pairs");
                    entries.extend(pairs.into_iter().map(|pair| (kind, pair)));
                }
                Err(error) => {
                    tracing::warn!(%kind, chain_id, ?error, "source failed, skipping");
                    if self.failure_policy == AdapterFailurePolicy::Surface {
                        failures.push(AdapterFailure { kind, error });
                    }
                }
            }
        }

        let protocols = join_all(entries.into_iter().map(|(kind, pair)| async move {
            let balance = self.balance(&pair, account).await;
            Protocol::new(chain_id, kind, pair, balance)
        }))
        .await;
        tracing::info!(
            chain_id,
            protocols = protocols.len(),
            failures = failures.len(),
            "aggregated protocols"
        );
        AggregationOutcome {
            chain_id,
            protocols,
            failures,
        }
    }

    /// The account's balance of the derivative token, zero when unknown.
    async fn balance(&self, pair: &TokenPair, account: Option<Address>) -> U256 {
        let Some(account) = account else {
            return U256::ZERO;
        };
        match self.wallet.balance(&pair.derivative, account).await {
            Ok(balance) => balance,
            Err(err) => {
                tracing::debug!(?err, token = %pair.derivative.address, "failed to read balance");
                U256::ZERO
            }
        }
    }
}
