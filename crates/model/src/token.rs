use {
    alloy::primitives::{Address, address},
    chain::Chain,
    serde::{Deserialize, Serialize},
};

/// Sentinel address used for the chain's native asset.
pub const NATIVE_TOKEN_ADDRESS: Address = address!("EeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    #[default]
    Native,
    Erc20,
}

/// A fungible token with the metadata needed to display and scale amounts.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub chain_id: u64,
    pub kind: TokenKind,
    pub address: Address,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: u8,
}

impl Token {
    pub fn native(chain: Chain) -> Self {
        Self {
            chain_id: chain.id(),
            kind: TokenKind::Native,
            address: NATIVE_TOKEN_ADDRESS,
            name: Some(chain.native_token_symbol().to_owned()),
            symbol: Some(chain.native_token_symbol().to_owned()),
            decimals: 18,
        }
    }

    pub fn erc20(chain_id: u64, address: Address, symbol: &str, decimals: u8) -> Self {
        Self {
            chain_id,
            kind: TokenKind::Erc20,
            address,
            name: None,
            symbol: Some(symbol.to_owned()),
            decimals,
        }
    }

    pub fn is_native(&self) -> bool {
        self.kind == TokenKind::Native
    }

    pub fn symbol(&self) -> &str {
        self.symbol.as_deref().unwrap_or_default()
    }
}

/// An ordered `(underlying, derivative)` pair, e.g. `(DAI, aDAI)` or
/// `(ETH, stETH)`.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub underlying: Token,
    pub derivative: Token,
}

impl TokenPair {
    pub fn new(underlying: Token, derivative: Token) -> Self {
        Self {
            underlying,
            derivative,
        }
    }
}
