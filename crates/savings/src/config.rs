//! TOML configuration of the savings binary. Every field has a default, so
//! an empty file (or none at all) is a valid configuration.

use {
    crate::aggregator::AdapterFailurePolicy,
    alloy::primitives::Address,
    anyhow::{Context, Result},
    chain::Chain,
    serde::Deserialize,
    shared::sources::{PairingPolicy, yearn},
    std::{collections::HashMap, path::Path, time::Duration},
    url::Url,
};

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Chain ids the wallet is connected to, in display order.
    #[serde(default = "default_networks")]
    pub networks: Vec<u64>,

    #[serde(default)]
    pub yearn: YearnConfig,

    #[serde(default)]
    pub aave: AaveConfig,

    #[serde(default)]
    pub adapter_failure_policy: AdapterFailurePolicy,

    #[serde(default)]
    pub pairing_policy: PairingPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            networks: default_networks(),
            yearn: Default::default(),
            aave: Default::default(),
            adapter_failure_policy: Default::default(),
            pairing_policy: Default::default(),
        }
    }
}

fn default_networks() -> Vec<u64> {
    Chain::ALL.iter().map(Chain::id).collect()
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct YearnConfig {
    /// Defaults to the public yDaemon instance. Must end with a slash.
    #[serde(default)]
    pub base_url: Option<Url>,

    #[serde(default = "default_yearn_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl YearnConfig {
    pub fn base_url(&self) -> Result<Url> {
        match &self.base_url {
            Some(url) => Ok(url.clone()),
            None => Url::parse(yearn::api::DEFAULT_BASE_URL).context("default yearn url"),
        }
    }
}

impl Default for YearnConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: default_yearn_timeout(),
        }
    }
}

fn default_yearn_timeout() -> Duration {
    Duration::from_secs(10)
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AaveConfig {
    /// `ProtocolDataProvider` deployments. Chains without one offer no Aave
    /// protocols.
    #[serde(default = "default_data_providers")]
    pub data_providers: Vec<DataProvider>,
}

impl Default for AaveConfig {
    fn default() -> Self {
        Self {
            data_providers: default_data_providers(),
        }
    }
}

impl AaveConfig {
    pub fn addresses(&self) -> HashMap<u64, Address> {
        self.data_providers
            .iter()
            .map(|provider| (provider.chain_id, provider.address))
            .collect()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DataProvider {
    pub chain_id: u64,
    pub address: Address,
}

fn default_data_providers() -> Vec<DataProvider> {
    Chain::ALL
        .iter()
        .filter_map(|&chain| {
            Some(DataProvider {
                chain_id: chain.id(),
                address: contracts::aave_protocol_data_provider(chain)?,
            })
        })
        .collect()
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid savings configuration")
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&content)
    }
}
