use {
    crate::{gas::GasParams, token::Token},
    alloy::primitives::{Address, TxHash, U256},
};

/// Lifecycle of a submitted transfer.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum TransferState {
    #[default]
    Idle,
    WaitingForConfirming,
    Hash(TxHash),
    Failed(String),
}

impl TransferState {
    /// Terminal states are the ones after which the form gets reset.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Hash(_) | Self::Failed(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::WaitingForConfirming)
    }
}

/// Everything needed to submit a token transfer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferRequest {
    pub token: Token,
    /// Amount in base units of `token`.
    pub amount: U256,
    pub recipient: Address,
    /// Only attached to native asset transfers.
    pub memo: Option<String>,
    pub gas: GasParams,
}
