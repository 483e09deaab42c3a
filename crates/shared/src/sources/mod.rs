//! Yield sources. Each source lists the `(underlying, derivative)` token
//! pairs it offers on a chain; the savings aggregator turns those into
//! protocols.

pub mod aave;
pub mod lido;
pub mod yearn;

use {
    crate::token_info::TokenInfoFetching,
    alloy::primitives::Address,
    anyhow::Result,
    async_trait::async_trait,
    itertools::Itertools,
    model::{ProtocolKind, Token, TokenPair},
    serde::Deserialize,
    std::collections::HashMap,
};

#[mockall::automock]
#[async_trait]
pub trait PairFetching: Send + Sync {
    fn kind(&self) -> ProtocolKind;

    /// Lists the token pairs offered on `chain_id`. Unsupported chains yield
    /// an empty list rather than an error.
    async fn fetch_pairs(&self, chain_id: u64) -> Result<Vec<TokenPair>>;
}

/// A pair as reported by a source, before token metadata is known. The
/// derivative is absent when the source could not find one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AddressPair {
    pub underlying: Address,
    pub derivative: Option<Address>,
}

/// How resolved tokens are matched back into pairs.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PairingPolicy {
    /// Look both addresses of every reported pair up in the resolved
    /// metadata; pairs missing either token are dropped.
    #[default]
    Keyed,
    /// Chunk the flattened, compacted list of resolved tokens in twos. Any
    /// missing token shifts every following pair.
    Positional,
}

/// Resolves reported pairs to token descriptors with a single batched
/// metadata lookup.
pub async fn resolve_pairs(
    chain_id: u64,
    pairs: &[AddressPair],
    token_infos: &dyn TokenInfoFetching,
    policy: PairingPolicy,
) -> Vec<TokenPair> {
    let addresses: Vec<Address> = pairs
        .iter()
        .flat_map(|pair| [Some(pair.underlying), pair.derivative])
        .flatten()
        .collect();
    if addresses.is_empty() {
        return Vec::new();
    }
    let infos: HashMap<Address, Token> = token_infos
        .get_token_infos(chain_id, &addresses)
        .await
        .into_iter()
        .filter_map(|(address, info)| Some((address, info.to_token(chain_id, address)?)))
        .collect();

    match policy {
        PairingPolicy::Keyed => pairs
            .iter()
            .filter_map(|pair| {
                let underlying = infos.get(&pair.underlying)?;
                let derivative = infos.get(&pair.derivative?)?;
                Some(TokenPair::new(underlying.clone(), derivative.clone()))
            })
            .collect(),
        PairingPolicy::Positional => {
            let tokens: Vec<Token> = addresses
                .iter()
                .filter_map(|address| infos.get(address).cloned())
                .collect();
            if tokens.len() % 2 != 0 {
                tracing::warn!(
                    chain_id,
                    tokens = tokens.len(),
                    "odd number of resolved tokens, dropping the last one"
                );
            }
            split_to_pairs(tokens)
                .into_iter()
                .map(|(underlying, derivative)| TokenPair::new(underlying, derivative))
                .collect()
        }
    }
}

/// Splits `[a1, a2, a3, a4]` into `[(a1, a2), (a3, a4)]`. A trailing odd
/// element is dropped.
pub fn split_to_pairs<T>(items: Vec<T>) -> Vec<(T, T)> {
    items.into_iter().tuples().collect()
}
