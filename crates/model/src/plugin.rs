//! Plugin definitions and the rules deciding where a plugin is enabled.

use {
    serde::{Deserialize, Serialize},
    std::collections::HashMap,
    url::Url,
};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginDefinition {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub publisher: Option<Publisher>,
    pub enable_requirement: EnableRequirement,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Publisher {
    pub name: String,
    pub link: Url,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnableRequirement {
    pub architecture: Architecture,
    pub networks: NetworkRequirement,
    pub target: ReleaseTarget,
    /// Chains supported per network plugin. Plugins without an entry are not
    /// restricted.
    #[serde(default)]
    pub web3: HashMap<NetworkPluginId, Web3Requirement>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Architecture {
    pub app: bool,
    pub web: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArchitectureKind {
    App,
    Web,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkRequirementKind {
    /// Enabled only on the networks explicitly set to `true`.
    OptIn,
    /// Enabled everywhere except the networks explicitly set to `false`.
    OptOut,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NetworkRequirement {
    #[serde(rename = "type")]
    pub kind: NetworkRequirementKind,
    #[serde(default)]
    pub networks: HashMap<String, bool>,
}

/// Release channel. Later channels see every plugin of the earlier ones.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReleaseTarget {
    Stable,
    Beta,
    Insider,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NetworkPluginId {
    Evm,
    Flow,
    Solana,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Web3Requirement {
    pub supported_chain_ids: Vec<u64>,
}

/// The environment a plugin is about to be loaded into.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnableContext {
    pub architecture: ArchitectureKind,
    /// The social network the page belongs to, `None` on extension pages.
    pub network: Option<String>,
    pub target: ReleaseTarget,
}

impl PluginDefinition {
    pub fn is_enabled(&self, context: &EnableContext) -> bool {
        let requirement = &self.enable_requirement;
        let architecture = match context.architecture {
            ArchitectureKind::App => requirement.architecture.app,
            ArchitectureKind::Web => requirement.architecture.web,
        };
        let network = match &context.network {
            None => true,
            Some(network) => {
                let setting = requirement.networks.networks.get(network).copied();
                match requirement.networks.kind {
                    NetworkRequirementKind::OptIn => setting == Some(true),
                    NetworkRequirementKind::OptOut => setting != Some(false),
                }
            }
        };
        architecture && network && requirement.target <= context.target
    }

    /// The chains this plugin supports for a network plugin, `None` when
    /// unrestricted.
    pub fn supported_chain_ids(&self, plugin: NetworkPluginId) -> Option<&[u64]> {
        self.enable_requirement
            .web3
            .get(&plugin)
            .map(|requirement| requirement.supported_chain_ids.as_slice())
    }

    pub fn supports_chain(&self, plugin: NetworkPluginId, chain_id: u64) -> bool {
        self.supported_chain_ids(plugin)
            .is_none_or(|chains| chains.contains(&chain_id))
    }
}

/// Whether the user has a persona and whether it is connected to the current
/// site.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PersonaConnectStatus {
    pub has_persona: bool,
    pub connected: bool,
    /// Whether the host can run a create or connect flow right now.
    pub action_available: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GateTitle {
    CreatePersona,
    ConnectPersona,
    Plugin(String),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GateAction {
    CreatePersona,
    ConnectPersona,
}

/// What the chrome around a plugin shows: plugin content is only rendered
/// once the user has a connected persona.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PluginGate {
    pub title: GateTitle,
    pub action: Option<GateAction>,
    pub render_body: bool,
}

impl PluginGate {
    pub fn new(plugin_name: &str, status: PersonaConnectStatus) -> Self {
        let title = if !status.has_persona {
            GateTitle::CreatePersona
        } else if !status.connected {
            GateTitle::ConnectPersona
        } else {
            GateTitle::Plugin(plugin_name.to_owned())
        };
        let action = status.action_available.then_some(if status.has_persona {
            GateAction::ConnectPersona
        } else {
            GateAction::CreatePersona
        });
        Self {
            title,
            action,
            render_body: status.connected,
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, maplit::hashmap};

    fn definition(kind: NetworkRequirementKind, networks: HashMap<String, bool>) -> PluginDefinition {
        PluginDefinition {
            id: "com.example.plugin".to_owned(),
            name: "Example".to_owned(),
            description: None,
            publisher: None,
            enable_requirement: EnableRequirement {
                architecture: Architecture {
                    app: false,
                    web: true,
                },
                networks: NetworkRequirement { kind, networks },
                target: ReleaseTarget::Beta,
                web3: hashmap! {
                    NetworkPluginId::Evm => Web3Requirement { supported_chain_ids: vec![1, 250] },
                    NetworkPluginId::Flow => Web3Requirement::default(),
                },
            },
        }
    }

    fn context(network: Option<&str>, target: ReleaseTarget) -> EnableContext {
        EnableContext {
            architecture: ArchitectureKind::Web,
            network: network.map(str::to_owned),
            target,
        }
    }

    #[test]
    fn opt_out_networks() {
        let plugin = definition(
            NetworkRequirementKind::OptOut,
            hashmap! { "facebook.com".to_owned() => false },
        );
        assert!(plugin.is_enabled(&context(Some("twitter.com"), ReleaseTarget::Beta)));
        assert!(!plugin.is_enabled(&context(Some("facebook.com"), ReleaseTarget::Beta)));
        assert!(plugin.is_enabled(&context(None, ReleaseTarget::Insider)));
    }

    #[test]
    fn opt_in_networks() {
        let plugin = definition(
            NetworkRequirementKind::OptIn,
            hashmap! { "twitter.com".to_owned() => true },
        );
        assert!(plugin.is_enabled(&context(Some("twitter.com"), ReleaseTarget::Beta)));
        assert!(!plugin.is_enabled(&context(Some("instagram.com"), ReleaseTarget::Beta)));
    }

    #[test]
    fn release_target_and_architecture() {
        let plugin = definition(NetworkRequirementKind::OptOut, HashMap::new());
        assert!(!plugin.is_enabled(&context(None, ReleaseTarget::Stable)));

        let app = EnableContext {
            architecture: ArchitectureKind::App,
            ..context(None, ReleaseTarget::Insider)
        };
        assert!(!plugin.is_enabled(&app));
    }

    #[test]
    fn chain_support() {
        let plugin = definition(NetworkRequirementKind::OptOut, HashMap::new());
        assert!(plugin.supports_chain(NetworkPluginId::Evm, 250));
        assert!(!plugin.supports_chain(NetworkPluginId::Evm, 56));
        assert!(!plugin.supports_chain(NetworkPluginId::Flow, 1));
        assert!(plugin.supports_chain(NetworkPluginId::Solana, 101));
    }

    #[test]
    fn gate_requires_connected_persona() {
        let gate = PluginGate::new(
            "Savings",
            PersonaConnectStatus {
                has_persona: false,
                connected: false,
                action_available: true,
            },
        );
        assert_eq!(gate.title, GateTitle::CreatePersona);
        assert_eq!(gate.action, Some(GateAction::CreatePersona));
        assert!(!gate.render_body);

        let gate = PluginGate::new(
            "Savings",
            PersonaConnectStatus {
                has_persona: true,
                connected: false,
                action_available: true,
            },
        );
        assert_eq!(gate.title, GateTitle::ConnectPersona);
        assert_eq!(gate.action, Some(GateAction::ConnectPersona));

        let gate = PluginGate::new(
            "Savings",
            PersonaConnectStatus {
                has_persona: true,
                connected: true,
                action_available: false,
            },
        );
        assert_eq!(gate.title, GateTitle::Plugin("Savings".to_owned()));
        assert_eq!(gate.action, None);
        assert!(gate.render_body);
    }
}
