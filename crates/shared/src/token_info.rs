use {
    crate::ethrpc::Web3,
    alloy::{primitives::Address, providers::DynProvider},
    async_trait::async_trait,
    contracts::IERC20,
    futures::future::join_all,
    model::{Token, TokenKind},
    parking_lot::Mutex,
    std::{
        collections::{HashMap, HashSet},
        sync::Arc,
    },
};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TokenInfo {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
}

impl TokenInfo {
    /// Builds an ERC-20 token descriptor. Tokens whose decimals could not be
    /// read are unusable for amount scaling and yield `None`.
    pub fn to_token(&self, chain_id: u64, address: Address) -> Option<Token> {
        Some(Token {
            chain_id,
            kind: TokenKind::Erc20,
            address,
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            decimals: self.decimals?,
        })
    }
}

/// Resolves token metadata for many addresses in one call.
#[mockall::automock]
#[async_trait]
pub trait TokenInfoFetching: Send + Sync {
    /// Retrieves information for a token.
    async fn get_token_infos(
        &self,
        chain_id: u64,
        addresses: &[Address],
    ) -> HashMap<Address, TokenInfo>;
}

pub struct TokenInfoFetcher {
    pub web3: Arc<Web3>,
}

impl TokenInfoFetcher {
    async fn fetch_token(provider: DynProvider, address: Address) -> TokenInfo {
        let erc20 = IERC20::new(address, provider);
        let name = erc20.name().call().await;
        let symbol = erc20.symbol().call().await;
        let decimals = erc20.decimals().call().await;
        if let Err(err) = &decimals {
            tracing::debug!(?address, ?err, "failed to read token decimals");
        }
        TokenInfo {
            name: name.ok(),
            symbol: symbol.ok(),
            decimals: decimals.ok(),
        }
    }
}

#[async_trait]
impl TokenInfoFetching for TokenInfoFetcher {
    async fn get_token_infos(
        &self,
        chain_id: u64,
        addresses: &[Address],
    ) -> HashMap<Address, TokenInfo> {
        let provider = match self.web3.provider(chain_id) {
            Ok(provider) => provider,
            Err(err) => {
                tracing::warn!(?err, "cannot fetch token infos");
                return HashMap::new();
            }
        };
        let unique: HashSet<Address> = addresses.iter().copied().collect();
        let futures = unique.into_iter().map(|address| {
            let provider = provider.clone();
            async move { (address, Self::fetch_token(provider, address).await) }
        });
        join_all(futures).await.into_iter().collect()
    }
}

/// Memoizes complete token infos per chain. Infos missing their decimals are
/// not cached so they are retried on the next request.
pub struct CachedTokenInfoFetcher {
    inner: Arc<dyn TokenInfoFetching>,
    cache: Mutex<HashMap<(u64, Address), TokenInfo>>,
}

impl CachedTokenInfoFetcher {
    pub fn new(inner: Arc<dyn TokenInfoFetching>) -> Self {
        Self {
            inner,
            cache: Default::default(),
        }
    }
}

#[async_trait]
impl TokenInfoFetching for CachedTokenInfoFetcher {
    async fn get_token_infos(
        &self,
        chain_id: u64,
        addresses: &[Address],
    ) -> HashMap<Address, TokenInfo> {
        let to_fetch: Vec<Address> = {
            let cache = self.cache.lock();
            addresses
                .iter()
                .copied()
                .filter(|address| !cache.contains_key(&(chain_id, *address)))
                .collect::<HashSet<_>>()
                .into_iter()
                .collect()
        };

        let fetched = if to_fetch.is_empty() {
            HashMap::new()
        } else {
            self.inner.get_token_infos(chain_id, &to_fetch).await
        };

        let mut cache = self.cache.lock();
        let mut result = HashMap::new();
        for (address, info) in fetched {
            if info.decimals.is_some() {
                cache.insert((chain_id, address), info.clone());
            }
            result.insert(address, info);
        }
        for address in addresses {
            if let Some(info) = cache.get(&(chain_id, *address)) {
                result.insert(*address, info.clone());
            }
        }
        result
    }
}
