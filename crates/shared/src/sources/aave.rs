//! Aave lending pools. Reserves and their interest bearing a-tokens are
//! enumerated on-chain through the protocol data provider.

use {
    super::{AddressPair, PairFetching, PairingPolicy, resolve_pairs},
    crate::{ethrpc::Web3, token_info::TokenInfoFetching},
    alloy::{primitives::Address, providers::DynProvider},
    anyhow::{Context, Result},
    async_trait::async_trait,
    contracts::IAaveProtocolDataProvider,
    model::{ProtocolKind, TokenPair},
    std::{collections::HashMap, sync::Arc},
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReserveToken {
    pub symbol: String,
    pub address: Address,
}

impl From<IAaveProtocolDataProvider::TokenData> for ReserveToken {
    fn from(data: IAaveProtocolDataProvider::TokenData) -> Self {
        Self {
            symbol: data.symbol,
            address: data.tokenAddress,
        }
    }
}

#[mockall::automock]
#[async_trait]
pub trait AaveDataProviding: Send + Sync {
    /// Whether a data provider is known for the chain.
    fn supports(&self, chain_id: u64) -> bool;

    async fn all_reserves_tokens(&self, chain_id: u64) -> Result<Vec<ReserveToken>>;

    async fn all_a_tokens(&self, chain_id: u64) -> Result<Vec<ReserveToken>>;
}

/// Reads reserves from the `ProtocolDataProvider` contract deployed on each
/// configured chain.
pub struct AaveDataProvider {
    web3: Arc<Web3>,
    addresses: HashMap<u64, Address>,
}

impl AaveDataProvider {
    pub fn new(web3: Arc<Web3>, addresses: HashMap<u64, Address>) -> Self {
        Self { web3, addresses }
    }

    fn contract(
        &self,
        chain_id: u64,
    ) -> Result<IAaveProtocolDataProvider::IAaveProtocolDataProviderInstance<DynProvider>> {
        let address = self
            .addresses
            .get(&chain_id)
            .with_context(|| format!("no aave data provider on chain {chain_id}"))?;
        let provider = self.web3.provider(chain_id)?.clone();
        Ok(IAaveProtocolDataProvider::new(*address, provider))
    }
}

#[async_trait]
impl AaveDataProviding for AaveDataProvider {
    fn supports(&self, chain_id: u64) -> bool {
        self.addresses.contains_key(&chain_id)
    }

    async fn all_reserves_tokens(&self, chain_id: u64) -> Result<Vec<ReserveToken>> {
        let tokens = self
            .contract(chain_id)?
            .getAllReservesTokens()
            .call()
            .await
            .context("getAllReservesTokens")?;
        Ok(tokens.into_iter().map(Into::into).collect())
    }

    async fn all_a_tokens(&self, chain_id: u64) -> Result<Vec<ReserveToken>> {
        let tokens = self
            .contract(chain_id)?
            .getAllATokens()
            .call()
            .await
            .context("getAllATokens")?;
        Ok(tokens.into_iter().map(Into::into).collect())
    }
}

pub struct AaveSource {
    data_provider: Arc<dyn AaveDataProviding>,
    token_infos: Arc<dyn TokenInfoFetching>,
    pairing: PairingPolicy,
}

impl AaveSource {
    pub fn new(
        data_provider: Arc<dyn AaveDataProviding>,
        token_infos: Arc<dyn TokenInfoFetching>,
        pairing: PairingPolicy,
    ) -> Self {
        Self {
            data_provider,
            token_infos,
            pairing,
        }
    }
}

/// Pairs every reserve with the a-token named `a<SYMBOL>`, compared
/// case-insensitively.
pub fn match_reserves(reserves: &[ReserveToken], a_tokens: &[ReserveToken]) -> Vec<AddressPair> {
    reserves
        .iter()
        .map(|reserve| {
            let expected = format!("a{}", reserve.symbol);
            AddressPair {
                underlying: reserve.address,
                derivative: a_tokens
                    .iter()
                    .find(|a_token| a_token.symbol.eq_ignore_ascii_case(&expected))
                    .map(|a_token| a_token.address),
            }
        })
        .collect()
}

#[async_trait]
impl PairFetching for AaveSource {
    fn kind(&self) -> ProtocolKind {
        ProtocolKind::Aave
    }

    async fn fetch_pairs(&self, chain_id: u64) -> Result<Vec<TokenPair>> {
        if !self.data_provider.supports(chain_id) {
            tracing::debug!(chain_id, "aave not deployed on chain");
            return Ok(Vec::new());
        }
        let (reserves, a_tokens) = futures::try_join!(
            self.data_provider.all_reserves_tokens(chain_id),
            self.data_provider.all_a_tokens(chain_id),
        )?;
        let matched = match_reserves(&reserves, &a_tokens);
        tracing::debug!(
            chain_id,
            reserves = reserves.len(),
            a_tokens = a_tokens.len(),
            "aave reserves"
        );
        let pairs =
            resolve_pairs(chain_id, &matched, self.token_infos.as_ref(), self.pairing).await;
        Ok(pairs)
    }
}
