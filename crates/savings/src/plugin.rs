//! The savings plugin's manifest.

use {
    chain::Chain,
    model::plugin::{
        Architecture, EnableRequirement, NetworkPluginId, NetworkRequirement,
        NetworkRequirementKind, PluginDefinition, ReleaseTarget, Web3Requirement,
    },
    std::collections::HashMap,
};

pub const PLUGIN_ID: &str = "com.savings";

/// Chains the dialog offers, before intersecting with the wallet's networks.
pub const SUPPORTED_CHAINS: [Chain; 4] =
    [Chain::Mainnet, Chain::Goerli, Chain::Fantom, Chain::Arbitrum];

pub fn definition() -> PluginDefinition {
    PluginDefinition {
        id: PLUGIN_ID.to_owned(),
        name: "Savings".to_owned(),
        description: Some("Deposit into liquid staking, lending and vault protocols.".to_owned()),
        publisher: None,
        enable_requirement: EnableRequirement {
            architecture: Architecture {
                app: true,
                web: true,
            },
            networks: NetworkRequirement {
                kind: NetworkRequirementKind::OptOut,
                networks: HashMap::new(),
            },
            target: ReleaseTarget::Stable,
            web3: HashMap::from([(
                NetworkPluginId::Evm,
                Web3Requirement {
                    supported_chain_ids: SUPPORTED_CHAINS.iter().map(Chain::id).collect(),
                },
            )]),
        },
    }
}

/// The configured networks the plugin can serve, in configuration order.
pub fn available_chains(plugin: &PluginDefinition, networks: &[u64]) -> Vec<u64> {
    networks
        .iter()
        .copied()
        .filter(|&chain_id| plugin.supports_chain(NetworkPluginId::Evm, chain_id))
        .collect()
}
