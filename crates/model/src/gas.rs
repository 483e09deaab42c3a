use {
    alloy::primitives::U256,
    serde::{Deserialize, Serialize},
};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GasOption {
    Low,
    #[default]
    Medium,
    High,
    Custom,
}

/// Message exchanged with the gas settings dialog.
///
/// Requests to show the dialog carry `open: true`; the dialog answers with
/// `open: false` and whichever values the user changed.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasSettingEvent {
    pub open: bool,
    pub gas_price: Option<U256>,
    pub gas_option: Option<GasOption>,
    pub gas_limit: Option<U256>,
    pub max_fee: Option<U256>,
}

/// Gas parameters attached to a transfer.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct GasParams {
    pub gas_limit: U256,
    /// Legacy gas price, `None` leaves it to the node.
    pub gas_price: Option<U256>,
    /// EIP-1559 max fee per gas, takes precedence over `gas_price`.
    pub max_fee: Option<U256>,
}
