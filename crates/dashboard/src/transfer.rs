//! Controller for the wallet's send form: one token, one recipient.

use {
    alloy::primitives::{Address, TxHash, U256},
    chain::Chain,
    model::{
        Token,
        gas::{GasOption, GasParams, GasSettingEvent},
        transfer::{TransferRequest, TransferState},
    },
    shared::{gas_settings::GasSettingsHandle, wallet::Wallet},
    std::sync::Arc,
};

/// Gas limit used for plain native asset transfers (with room for a memo).
pub const NATIVE_GAS_LIMIT: u64 = 30_000;

/// Why the form cannot be submitted. Checks run in declaration order and the
/// first failing one is reported.
#[derive(Clone, Debug, thiserror::Error, Eq, PartialEq)]
pub enum ValidationError {
    #[error("enter an amount")]
    AmountAbsent,
    #[error("insufficient {symbol} balance")]
    InsufficientBalance { symbol: String },
    #[error("enter a recipient address")]
    AddressAbsent,
    #[error("invalid recipient address")]
    InvalidAddress,
}

#[derive(Debug, thiserror::Error)]
pub enum TransferFailure {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("a transfer is already waiting for confirmation")]
    Pending,
    #[error("transfer failed")]
    Wallet(#[source] anyhow::Error),
}

/// Accepts `0x` followed by 40 hex digits. Mixed-case addresses must carry a
/// valid EIP-55 checksum.
pub fn is_valid_address(address: &str) -> bool {
    let Some(hex) = address.strip_prefix("0x") else {
        return false;
    };
    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return false;
    }
    let lower = hex.bytes().all(|b| !b.is_ascii_uppercase());
    let upper = hex.bytes().all(|b| !b.is_ascii_lowercase());
    lower || upper || Address::parse_checksummed(address, None).is_ok()
}

pub struct TransferForm {
    wallet: Arc<dyn Wallet>,
    gas_settings: GasSettingsHandle,
    token: Token,
    chain_id: u64,

    amount: String,
    address: String,
    memo: String,

    balance: U256,
    default_gas_price: U256,
    custom_gas_price: Option<U256>,
    gas_option: GasOption,
    gas_limit: U256,
    max_fee: Option<U256>,

    state: TransferState,
    last_outcome: Option<TransferState>,
}

impl TransferForm {
    pub fn new(wallet: Arc<dyn Wallet>, gas_settings: GasSettingsHandle, token: Token) -> Self {
        let gas_limit = Self::initial_gas_limit(&token);
        Self {
            wallet,
            gas_settings,
            chain_id: token.chain_id,
            token,
            amount: String::new(),
            address: String::new(),
            memo: String::new(),
            balance: U256::ZERO,
            default_gas_price: U256::ZERO,
            custom_gas_price: None,
            gas_option: GasOption::default(),
            gas_limit,
            max_fee: None,
            state: TransferState::Idle,
            last_outcome: None,
        }
    }

    fn initial_gas_limit(token: &Token) -> U256 {
        if token.is_native() {
            U256::from(NATIVE_GAS_LIMIT)
        } else {
            U256::ZERO
        }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    pub fn balance(&self) -> U256 {
        self.balance
    }

    pub fn gas_limit(&self) -> U256 {
        self.gas_limit
    }

    pub fn gas_option(&self) -> GasOption {
        self.gas_option
    }

    pub fn state(&self) -> &TransferState {
        &self.state
    }

    /// How the most recent submission ended.
    pub fn last_outcome(&self) -> Option<&TransferState> {
        self.last_outcome.as_ref()
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.amount = amount.into();
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = address.into();
    }

    /// Memos are only sent with native asset transfers.
    pub fn set_memo(&mut self, memo: impl Into<String>) {
        self.memo = memo.into();
    }

    /// Switches the token. Balance and gas limit are stale until the next
    /// [`Self::refresh`].
    pub fn select_token(&mut self, token: Token) {
        self.gas_limit = Self::initial_gas_limit(&token);
        self.balance = U256::ZERO;
        self.token = token;
    }

    /// Reloads chain, balance, default gas price and gas limit from the
    /// wallet. Native transfers use [`NATIVE_GAS_LIMIT`]; ERC-20 transfers
    /// are estimated and fall back to zero when the estimate fails.
    pub async fn refresh(&mut self) -> anyhow::Result<()> {
        self.chain_id = self.wallet.chain_id().await?;
        self.balance = match self.wallet.account() {
            Some(account) => self.wallet.balance(&self.token, account).await?,
            None => U256::ZERO,
        };
        self.default_gas_price = self.wallet.gas_price(self.chain_id).await?;
        self.gas_limit = if self.token.is_native() {
            U256::from(NATIVE_GAS_LIMIT)
        } else {
            self.estimate_erc20_gas().await
        };
        tracing::debug!(
            chain_id = self.chain_id,
            balance = %self.balance,
            gas_price = %self.default_gas_price,
            gas_limit = %self.gas_limit,
            "refreshed transfer form"
        );
        Ok(())
    }

    async fn estimate_erc20_gas(&self) -> U256 {
        let amount = self.scaled_amount().unwrap_or_default();
        let recipient = self
            .address
            .trim()
            .parse::<Address>()
            .ok()
            .or(self.wallet.account())
            .unwrap_or_default();
        match self
            .wallet
            .estimate_transfer_gas(&self.token, amount, recipient)
            .await
        {
            Ok(gas) => gas,
            Err(err) => {
                tracing::warn!(?err, token = %self.token.address, "failed to estimate transfer gas");
                U256::ZERO
            }
        }
    }

    fn supports_eip1559(&self) -> bool {
        Chain::try_from(self.chain_id).is_ok_and(|chain| chain.supports_eip1559())
    }

    /// The per gas price the fee is computed with: the max fee override on
    /// EIP-1559 chains, then a custom gas price, then the network default.
    pub fn effective_gas_price(&self) -> U256 {
        match self.max_fee {
            Some(max_fee) if self.supports_eip1559() => max_fee,
            _ => self
                .custom_gas_price
                .filter(|price| !price.is_zero())
                .unwrap_or(self.default_gas_price),
        }
    }

    pub fn gas_fee(&self) -> U256 {
        self.gas_limit.saturating_mul(self.effective_gas_price())
    }

    /// The largest amount that can be sent. Native transfers reserve the gas
    /// fee from the balance.
    pub fn max_amount(&self) -> U256 {
        if self.token.is_native() {
            self.balance.saturating_sub(self.gas_fee())
        } else {
            self.balance
        }
    }

    fn scaled_amount(&self) -> Option<U256> {
        number::parse_units(&self.amount, self.token.decimals).ok()
    }

    /// Validates the form, returning the scaled amount and the recipient.
    pub fn validate(&self) -> Result<(U256, Address), ValidationError> {
        let amount = self
            .scaled_amount()
            .filter(|amount| !amount.is_zero())
            .ok_or(ValidationError::AmountAbsent)?;
        if amount > self.max_amount() {
            return Err(ValidationError::InsufficientBalance {
                symbol: self.token.symbol().to_owned(),
            });
        }
        let address = self.address.trim();
        if address.is_empty() {
            return Err(ValidationError::AddressAbsent);
        }
        if !is_valid_address(address) {
            return Err(ValidationError::InvalidAddress);
        }
        let recipient = address
            .parse()
            .map_err(|_| ValidationError::InvalidAddress)?;
        Ok((amount, recipient))
    }

    /// Asks the gas settings dialog to open with the current parameters.
    pub fn open_gas_settings(&self) {
        self.gas_settings.publish(GasSettingEvent {
            open: true,
            gas_limit: Some(self.gas_limit),
            gas_option: Some(self.gas_option),
            ..Default::default()
        });
    }

    /// Applies the settings confirmed in the gas settings dialog since the
    /// last call. Fields missing from an event keep their value.
    pub fn apply_gas_settings(&mut self) {
        for event in self.gas_settings.drain() {
            if event.open {
                continue;
            }
            tracing::debug!(?event, "applying gas settings");
            if let Some(gas_price) = event.gas_price {
                self.custom_gas_price = Some(gas_price);
            }
            if let Some(gas_option) = event.gas_option {
                self.gas_option = gas_option;
            }
            if let Some(gas_limit) = event.gas_limit {
                self.gas_limit = gas_limit;
            }
            if let Some(max_fee) = event.max_fee {
                self.max_fee = Some(max_fee);
            }
        }
    }

    fn gas_params(&self) -> GasParams {
        let eip1559 = self.supports_eip1559();
        GasParams {
            gas_limit: self.gas_limit,
            gas_price: Some(self.effective_gas_price()).filter(|price| !price.is_zero()),
            max_fee: self.max_fee.filter(|_| eip1559),
        }
    }

    /// Submits the transfer. Whatever the result, the amount, address and
    /// memo are cleared and the form returns to [`TransferState::Idle`].
    pub async fn submit(&mut self) -> Result<TxHash, TransferFailure> {
        if self.state.is_pending() {
            return Err(TransferFailure::Pending);
        }
        let (amount, recipient) = self.validate()?;
        let request = TransferRequest {
            token: self.token.clone(),
            amount,
            recipient,
            memo: Some(self.memo.clone()).filter(|memo| self.token.is_native() && !memo.is_empty()),
            gas: self.gas_params(),
        };

        self.state = TransferState::WaitingForConfirming;
        let result = self.wallet.transfer(&request).await;
        self.state = match &result {
            Ok(hash) => {
                tracing::info!(?hash, token = %self.token.address, %amount, "transfer submitted");
                TransferState::Hash(*hash)
            }
            Err(err) => {
                tracing::warn!(?err, token = %self.token.address, "transfer failed");
                TransferState::Failed(format!("{err:#}"))
            }
        };
        self.reset();
        result.map_err(TransferFailure::Wallet)
    }

    /// Clears the inputs once a submission reached a terminal state.
    fn reset(&mut self) {
        if !self.state.is_terminal() {
            return;
        }
        self.amount.clear();
        self.address.clear();
        self.memo.clear();
        self.last_outcome = Some(std::mem::take(&mut self.state));
    }
}
