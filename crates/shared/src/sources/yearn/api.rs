//! Client for the yDaemon vault API.

use {
    super::{Vault, VaultFetching},
    alloy::primitives::Address,
    anyhow::{Context, Result},
    async_trait::async_trait,
    reqwest::Client,
    serde::Deserialize,
    std::time::Duration,
    url::Url,
};

pub const DEFAULT_BASE_URL: &str = "https://ydaemon.yearn.fi/";

pub struct YearnApiClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl YearnApiClient {
    /// `base_url` must end with a slash for the chain path to be appended.
    pub fn new(client: Client, base_url: Url, timeout: Duration) -> Self {
        Self {
            client,
            base_url,
            timeout,
        }
    }

    fn vaults_url(&self, chain_id: u64) -> Result<Url> {
        self.base_url
            .join(&format!("{chain_id}/vaults/all"))
            .context("invalid yearn api url")
    }
}

#[async_trait]
impl VaultFetching for YearnApiClient {
    async fn fetch_vaults(&self, chain_id: u64) -> Result<Vec<Vault>> {
        let url = self.vaults_url(chain_id)?;
        tracing::debug!(%url, "fetching yearn vaults");
        let vaults: Vec<dto::Vault> = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .context("yearn api request")?
            .error_for_status()
            .context("yearn api status")?
            .json()
            .await
            .context("yearn api response")?;
        Ok(vaults.into_iter().map(Into::into).collect())
    }
}

mod dto {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct Vault {
        pub address: Address,
        #[serde(default)]
        pub version: String,
        pub token: Token,
    }

    #[derive(Debug, Deserialize)]
    pub struct Token {
        pub address: Address,
    }
}

impl From<dto::Vault> for Vault {
    fn from(vault: dto::Vault) -> Self {
        Self {
            address: vault.address,
            version: vault.version,
            display_token: vault.token.address,
        }
    }
}
