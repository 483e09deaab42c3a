use {
    crate::token::{Token, TokenPair},
    alloy::primitives::U256,
    serde::{Deserialize, Serialize},
    strum::{Display, EnumIter, EnumString},
};

/// The yield sources the savings dialog knows how to list.
#[derive(
    Clone, Copy, Debug, Display, EnumIter, EnumString, Eq, PartialEq, Hash, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum ProtocolKind {
    Lido,
    Aave,
    Yearn,
}

/// A single savings opportunity on one chain: deposit the underlying token,
/// receive the derivative token.
///
/// Built fresh for every aggregation pass and never mutated afterwards.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Protocol {
    pub chain_id: u64,
    pub kind: ProtocolKind,
    pub pair: TokenPair,
    /// The account's balance of the derivative token, in base units.
    pub balance: U256,
}

impl Protocol {
    pub fn new(chain_id: u64, kind: ProtocolKind, pair: TokenPair, balance: U256) -> Self {
        Self {
            chain_id,
            kind,
            pair,
            balance,
        }
    }

    /// The token shown to the user, i.e. the one being deposited.
    pub fn display_token(&self) -> &Token {
        &self.pair.underlying
    }

    pub fn derivative_token(&self) -> &Token {
        &self.pair.derivative
    }
}

/// Which table of the savings dialog is being looked at.
#[derive(Clone, Copy, Debug, Default, Display, EnumString, Eq, PartialEq, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "camelCase")]
pub enum Tab {
    #[default]
    Deposit,
    Withdraw,
}

impl Tab {
    /// Deposits are possible into every protocol, withdrawals only from those
    /// holding a non-zero balance.
    pub fn includes(&self, protocol: &Protocol) -> bool {
        match self {
            Tab::Deposit => true,
            Tab::Withdraw => !protocol.balance.is_zero(),
        }
    }
}
