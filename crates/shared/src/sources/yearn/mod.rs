//! Yearn vaults, listed through the yDaemon API.

pub mod api;

use {
    super::{AddressPair, PairFetching, PairingPolicy, resolve_pairs},
    crate::token_info::TokenInfoFetching,
    alloy::primitives::Address,
    anyhow::Result,
    async_trait::async_trait,
    chain::Chain,
    model::{ProtocolKind, TokenPair},
    std::sync::Arc,
};

/// Chains the vault API serves. Requests for any other chain return no
/// pairs without calling the API.
pub const SUPPORTED_CHAINS: [Chain; 3] = [Chain::Mainnet, Chain::Fantom, Chain::Arbitrum];

pub fn is_supported_chain(chain_id: u64) -> bool {
    SUPPORTED_CHAINS.iter().any(|chain| chain.id() == chain_id)
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Vault {
    pub address: Address,
    pub version: String,
    /// The token deposited into the vault.
    pub display_token: Address,
}

#[mockall::automock]
#[async_trait]
pub trait VaultFetching: Send + Sync {
    async fn fetch_vaults(&self, chain_id: u64) -> Result<Vec<Vault>>;
}

/// Keeps the vault with the lexicographically greatest version per display
/// token, ordered by display token. Versions compare as plain text, so
/// `"0.4.3"` wins over `"0.4.10"`.
pub fn latest_vaults(mut vaults: Vec<Vault>) -> Vec<Vault> {
    vaults.sort_by(|a, b| {
        a.display_token
            .cmp(&b.display_token)
            .then_with(|| b.version.cmp(&a.version))
    });
    vaults.dedup_by_key(|vault| vault.display_token);
    vaults
}

pub struct YearnSource {
    vaults: Arc<dyn VaultFetching>,
    token_infos: Arc<dyn TokenInfoFetching>,
    pairing: PairingPolicy,
}

impl YearnSource {
    pub fn new(
        vaults: Arc<dyn VaultFetching>,
        token_infos: Arc<dyn TokenInfoFetching>,
        pairing: PairingPolicy,
    ) -> Self {
        Self {
            vaults,
            token_infos,
            pairing,
        }
    }
}

#[async_trait]
impl PairFetching for YearnSource {
    fn kind(&self) -> ProtocolKind {
        ProtocolKind::Yearn
    }

    async fn fetch_pairs(&self, chain_id: u64) -> Result<Vec<TokenPair>> {
        if !is_supported_chain(chain_id) {
            tracing::debug!(chain_id, "yearn not supported on chain");
            return Ok(Vec::new());
        }
        let vaults = self.vaults.fetch_vaults(chain_id).await?;
        let total = vaults.len();
        let pairs: Vec<AddressPair> = latest_vaults(vaults)
            .into_iter()
            .map(|vault| AddressPair {
                underlying: vault.display_token,
                derivative: Some(vault.address),
            })
            .collect();
        tracing::debug!(chain_id, total, latest = pairs.len(), "yearn vaults");
        Ok(resolve_pairs(chain_id, &pairs, self.token_infos.as_ref(), self.pairing).await)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::token_info::{MockTokenInfoFetching, TokenInfo},
    };

    fn vault(address: u8, version: &str, display_token: u8) -> Vault {
        Vault {
            address: Address::repeat_byte(address),
            version: version.to_owned(),
            display_token: Address::repeat_byte(display_token),
        }
    }

    #[test]
    fn keeps_latest_version_per_token() {
        let vaults = latest_vaults(vec![
            vault(10, "0.2.11", 2),
            vault(11, "0.4.3", 1),
            vault(12, "0.3.0", 1),
            vault(13, "0.4.10", 1),
            vault(14, "0.2.2", 2),
        ]);
        assert_eq!(vaults, [vault(11, "0.4.3", 1), vault(14, "0.2.2", 2)]);
    }

    #[test]
    fn versions_compare_as_text() {
        let vaults = latest_vaults(vec![vault(10, "0.4.3", 1), vault(11, "0.4.10", 1)]);
        assert_eq!(vaults, [vault(10, "0.4.3", 1)]);
        let vaults = latest_vaults(vec![vault(10, "0.4", 1), vault(11, "0.4.0", 1)]);
        assert_eq!(vaults, [vault(11, "0.4.0", 1)]);
    }

    #[tokio::test]
    async fn unsupported_chain_skips_api() {
        let source = YearnSource::new(
            Arc::new(MockVaultFetching::new()),
            Arc::new(MockTokenInfoFetching::new()),
            PairingPolicy::Keyed,
        );
        assert!(source.fetch_pairs(137).await.unwrap().is_empty());
        assert!(source.fetch_pairs(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn pairs_display_token_with_vault() {
        let mut vaults = MockVaultFetching::new();
        vaults
            .expect_fetch_vaults()
            .withf(|chain_id| *chain_id == 250)
            .returning(|_| Ok(vec![vault(10, "0.4.2", 1), vault(11, "0.4.5", 1)]));

        let mut token_infos = MockTokenInfoFetching::new();
        token_infos
            .expect_get_token_infos()
            .times(1)
            .returning(|_, addresses| {
                addresses
                    .iter()
                    .map(|address| {
                        let symbol = if *address == Address::repeat_byte(1) {
                            "DAI"
                        } else {
                            "yvDAI"
                        };
                        (
                            *address,
                            TokenInfo {
                                name: None,
                                symbol: Some(symbol.to_owned()),
                                decimals: Some(18),
                            },
                        )
                    })
                    .collect()
            });

        let source = YearnSource::new(
            Arc::new(vaults),
            Arc::new(token_infos),
            PairingPolicy::Keyed,
        );
        let pairs = source.fetch_pairs(250).await.unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].underlying.symbol(), "DAI");
        assert_eq!(pairs[0].derivative.address, Address::repeat_byte(11));
        assert_eq!(pairs[0].derivative.chain_id, 250);
    }
}
