//! The wallet a user transfers from and whose balances are displayed.

use {
    crate::ethrpc::Web3,
    alloy::{
        network::TransactionBuilder,
        primitives::{Address, Bytes, TxHash, U256},
        providers::Provider,
        rpc::types::TransactionRequest,
        sol_types::SolCall,
    },
    anyhow::{Context, Result},
    async_trait::async_trait,
    contracts::IERC20,
    model::{Token, transfer::TransferRequest},
    std::sync::Arc,
};

#[mockall::automock]
#[async_trait]
pub trait Wallet: Send + Sync {
    /// The currently selected account, if any.
    fn account(&self) -> Option<Address>;

    /// Chain the wallet is currently connected to.
    async fn chain_id(&self) -> Result<u64>;

    /// Balance of `owner` in base units of `token`.
    async fn balance(&self, token: &Token, owner: Address) -> Result<U256>;

    /// The network's current default gas price in wei.
    async fn gas_price(&self, chain_id: u64) -> Result<U256>;

    /// Estimates the gas needed to transfer `amount` of `token` to
    /// `recipient` from the current account.
    async fn estimate_transfer_gas(
        &self,
        token: &Token,
        amount: U256,
        recipient: Address,
    ) -> Result<U256>;

    /// Signs and submits a transfer, returning once the node accepted it.
    async fn transfer(&self, request: &TransferRequest) -> Result<TxHash>;
}

/// A [`Wallet`] backed by JSON-RPC nodes. Transfers require the providers to
/// have been built with a signer for `account`.
pub struct Web3Wallet {
    web3: Arc<Web3>,
    chain_id: u64,
    account: Option<Address>,
}

impl Web3Wallet {
    pub fn new(web3: Arc<Web3>, chain_id: u64, account: Option<Address>) -> Self {
        Self {
            web3,
            chain_id,
            account,
        }
    }

    fn transaction(
        &self,
        token: &Token,
        amount: U256,
        recipient: Address,
        memo: Option<&str>,
    ) -> Result<TransactionRequest> {
        let from = self.account.context("no account selected")?;
        let tx = TransactionRequest::default().with_from(from);
        Ok(if token.is_native() {
            let tx = tx.with_to(recipient).with_value(amount);
            match memo.filter(|memo| !memo.is_empty()) {
                Some(memo) => tx.with_input(Bytes::copy_from_slice(memo.as_bytes())),
                None => tx,
            }
        } else {
            let call = IERC20::transferCall {
                to: recipient,
                amount,
            };
            tx.with_to(token.address).with_input(call.abi_encode())
        })
    }
}

#[async_trait]
impl Wallet for Web3Wallet {
    fn account(&self) -> Option<Address> {
        self.account
    }

    async fn chain_id(&self) -> Result<u64> {
        let provider = self.web3.provider(self.chain_id)?;
        Ok(provider.get_chain_id().await?)
    }

    async fn balance(&self, token: &Token, owner: Address) -> Result<U256> {
        let provider = self.web3.provider(token.chain_id)?;
        if token.is_native() {
            return Ok(provider.get_balance(owner).await?);
        }
        let balance = IERC20::new(token.address, provider.clone())
            .balanceOf(owner)
            .call()
            .await
            .with_context(|| format!("balanceOf {} on {}", owner, token.address))?;
        Ok(balance)
    }

    async fn gas_price(&self, chain_id: u64) -> Result<U256> {
        let provider = self.web3.provider(chain_id)?;
        Ok(U256::from(provider.get_gas_price().await?))
    }

    async fn estimate_transfer_gas(
        &self,
        token: &Token,
        amount: U256,
        recipient: Address,
    ) -> Result<U256> {
        let provider = self.web3.provider(token.chain_id)?;
        let tx = self.transaction(token, amount, recipient, None)?;
        Ok(U256::from(provider.estimate_gas(tx).await?))
    }

    async fn transfer(&self, request: &TransferRequest) -> Result<TxHash> {
        let provider = self.web3.provider(request.token.chain_id)?;
        let mut tx = self.transaction(
            &request.token,
            request.amount,
            request.recipient,
            request.memo.as_deref(),
        )?;
        if !request.gas.gas_limit.is_zero() {
            tx.set_gas_limit(u64::try_from(request.gas.gas_limit).context("gas limit")?);
        }
        match (request.gas.max_fee, request.gas.gas_price) {
            (Some(max_fee), _) => {
                tx.set_max_fee_per_gas(u128::try_from(max_fee).context("max fee")?)
            }
            (None, Some(gas_price)) => {
                tx.set_gas_price(u128::try_from(gas_price).context("gas price")?)
            }
            (None, None) => (),
        }
        let pending = provider
            .send_transaction(tx)
            .await
            .context("failed to submit transfer")?;
        let hash = *pending.tx_hash();
        tracing::info!(?hash, token = ?request.token.address, "submitted transfer");
        Ok(hash)
    }
}
