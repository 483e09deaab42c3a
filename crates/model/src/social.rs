//! Address based social identities: an account, its ENS name and the
//! accounts it follows or is followed by.

use {
    alloy::primitives::Address,
    serde::{Deserialize, Serialize},
    url::Url,
};

/// Another account in a follow list.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub address: Address,
    pub ens: Option<String>,
    pub avatar: Option<Url>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialIdentity {
    pub address: Address,
    pub ens: Option<String>,
    pub avatar: Option<Url>,
    pub followings: Vec<Connection>,
    pub followers: Vec<Connection>,
}

impl SocialIdentity {
    /// The ENS name when one is set and not blank.
    pub fn ens_name(&self) -> Option<&str> {
        self.ens.as_deref().filter(|ens| !ens.trim().is_empty())
    }
}
