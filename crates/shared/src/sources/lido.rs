//! Lido liquid staking. The pairs are a fixed table; no node is queried.

use {
    super::PairFetching,
    anyhow::Result,
    async_trait::async_trait,
    chain::Chain,
    model::{ProtocolKind, Token, TokenPair},
};

const STETH_DECIMALS: u8 = 18;

#[derive(Clone, Debug, Default)]
pub struct LidoPairs;

impl LidoPairs {
    /// Every known `ETH -> stETH` pair across chains.
    pub fn all() -> Vec<TokenPair> {
        Chain::ALL
            .iter()
            .filter_map(|&chain| {
                let steth = contracts::lido_steth(chain)?;
                Some(TokenPair::new(
                    Token::native(chain),
                    Token::erc20(chain.id(), steth, "stETH", STETH_DECIMALS),
                ))
            })
            .collect()
    }
}

#[async_trait]
impl PairFetching for LidoPairs {
    fn kind(&self) -> ProtocolKind {
        ProtocolKind::Lido
    }

    async fn fetch_pairs(&self, chain_id: u64) -> Result<Vec<TokenPair>> {
        let pairs: Vec<_> = Self::all()
            .into_iter()
            .filter(|pair| pair.underlying.chain_id == chain_id)
            .collect();
        tracing::debug!(chain_id, pairs = pairs.len(), "lido pairs");
        Ok(pairs)
    }
}
