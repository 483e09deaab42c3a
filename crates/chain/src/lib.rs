use {
    derive_more::Display,
    serde::{Deserialize, Deserializer, Serialize, Serializer},
    thiserror::Error,
};

/// Represents each EVM chain the wallet knows about.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(u64)]
pub enum Chain {
    #[display("Ethereum / Mainnet")]
    Mainnet = 1,
    #[display("Ethereum / Goerli")]
    Goerli = 5,
    #[display("Optimism")]
    Optimism = 10,
    #[display("BNB Smart Chain")]
    Bnb = 56,
    #[display("Gnosis")]
    Gnosis = 100,
    #[display("Polygon")]
    Polygon = 137,
    #[display("Fantom")]
    Fantom = 250,
    #[display("Conflux eSpace")]
    Conflux = 1030,
    #[display("Base")]
    Base = 8453,
    #[display("Arbitrum One")]
    Arbitrum = 42161,
    #[display("Avalanche")]
    Avalanche = 43114,
    #[display("Ethereum / Sepolia")]
    Sepolia = 11155111,
    #[display("Aurora")]
    Aurora = 1313161554,
}

impl Chain {
    pub const ALL: [Chain; 13] = [
        Chain::Mainnet,
        Chain::Goerli,
        Chain::Optimism,
        Chain::Bnb,
        Chain::Gnosis,
        Chain::Polygon,
        Chain::Fantom,
        Chain::Conflux,
        Chain::Base,
        Chain::Arbitrum,
        Chain::Avalanche,
        Chain::Sepolia,
        Chain::Aurora,
    ];

    /// Returns the chain's chain ID
    pub fn id(&self) -> u64 {
        *self as u64
    }

    /// Symbol of the asset used to pay for gas.
    pub fn native_token_symbol(&self) -> &'static str {
        match self {
            Self::Bnb => "BNB",
            Self::Gnosis => "xDAI",
            Self::Polygon => "MATIC",
            Self::Fantom => "FTM",
            Self::Conflux => "CFX",
            Self::Avalanche => "AVAX",
            Self::Mainnet
            | Self::Goerli
            | Self::Optimism
            | Self::Base
            | Self::Arbitrum
            | Self::Sepolia
            | Self::Aurora => "ETH",
        }
    }

    /// Whether transactions on this chain are priced with the EIP-1559 fee
    /// market (`maxFeePerGas`) rather than a legacy gas price.
    pub fn supports_eip1559(&self) -> bool {
        matches!(
            self,
            Self::Mainnet | Self::Goerli | Self::Sepolia | Self::Polygon
        )
    }
}

impl TryFrom<u64> for Chain {
    type Error = Error;

    /// Initializes `Chain` from a chain ID, returns error if the chain id is
    /// not supported
    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|chain| chain.id() == value)
            .ok_or(Error::ChainIdNotSupported(value))
    }
}

impl Serialize for Chain {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.id())
    }
}

impl<'de> Deserialize<'de> for Chain {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = u64::deserialize(deserializer)?;
        Chain::try_from(id).map_err(serde::de::Error::custom)
    }
}

#[derive(Error, Debug, Eq, PartialEq)]
pub enum Error {
    #[error("chain id {0} not supported")]
    ChainIdNotSupported(u64),
}
