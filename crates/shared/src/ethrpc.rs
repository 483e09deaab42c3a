//! Access to EVM nodes, one JSON-RPC provider per configured chain.

use {
    alloy::{
        network::EthereumWallet,
        providers::{DynProvider, Provider, ProviderBuilder},
        signers::local::PrivateKeySigner,
    },
    anyhow::{Result, anyhow},
    std::collections::HashMap,
    url::Url,
};

#[derive(Clone, Debug)]
pub struct Web3 {
    providers: HashMap<u64, DynProvider>,
}

impl Web3 {
    /// Creates HTTP providers for every node URL. When a signer is given,
    /// the providers sign and submit transactions on its behalf.
    pub fn new(nodes: &HashMap<u64, Url>, signer: Option<&PrivateKeySigner>) -> Self {
        let providers = nodes
            .iter()
            .map(|(&chain_id, url)| {
                let provider = match signer {
                    Some(signer) => ProviderBuilder::new()
                        .wallet(EthereumWallet::from(signer.clone()))
                        .connect_http(url.clone())
                        .erased(),
                    None => ProviderBuilder::new().connect_http(url.clone()).erased(),
                };
                tracing::debug!(chain_id, %url, signing = signer.is_some(), "created provider");
                (chain_id, provider)
            })
            .collect();
        Self { providers }
    }

    pub fn provider(&self, chain_id: u64) -> Result<&DynProvider> {
        self.providers
            .get(&chain_id)
            .ok_or_else(|| anyhow!("no node configured for chain {chain_id}"))
    }
}
