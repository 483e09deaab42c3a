//! State of the savings dialog: which chain is shown, the protocols listed
//! for it and the protocol opened for deposit or withdrawal.
//!
//! Every chain switch starts a new generation. Aggregation passes remember
//! the generation they were started in and their results are dropped when
//! it is no longer current, so a slow pass for a previous chain can never
//! overwrite the list of the chain now shown.

use {
    crate::aggregator::{AdapterFailure, AggregationOutcome, Aggregator},
    alloy::primitives::Address,
    model::{Protocol, Tab},
    std::sync::Arc,
};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DialogState {
    /// Waiting for protocols of the selected chain.
    #[default]
    ChainSelect,
    ProtocolList,
    ProtocolDetail,
    Closed,
}

/// Identifies an aggregation pass started by [`SavingsDialog::begin_pass`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Pass {
    generation: u64,
    pub chain_id: u64,
    pub account: Option<Address>,
}

impl Pass {
    pub async fn run(&self, aggregator: &Aggregator) -> AggregationOutcome {
        aggregator.aggregate(self.chain_id, self.account).await
    }
}

pub struct SavingsDialog {
    aggregator: Arc<Aggregator>,
    available_chains: Vec<u64>,
    chain_id: u64,
    account: Option<Address>,
    generation: u64,
    state: DialogState,
    protocols: Vec<Protocol>,
    failures: Vec<AdapterFailure>,
    selected: Option<(Protocol, Tab)>,
}

impl SavingsDialog {
    /// Opens the dialog on the wallet's current chain.
    pub fn new(
        aggregator: Arc<Aggregator>,
        available_chains: Vec<u64>,
        chain_id: u64,
        account: Option<Address>,
    ) -> Self {
        Self {
            aggregator,
            available_chains,
            chain_id,
            account,
            generation: 0,
            state: DialogState::default(),
            protocols: Vec::new(),
            failures: Vec::new(),
            selected: None,
        }
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn available_chains(&self) -> &[u64] {
        &self.available_chains
    }

    /// Sources that failed during the last committed pass.
    pub fn failures(&self) -> &[AdapterFailure] {
        &self.failures
    }

    pub fn set_account(&mut self, account: Option<Address>) {
        if self.account != account {
            self.account = account;
            self.reset();
        }
    }

    /// Shows another chain. Chains outside [`Self::available_chains`] are
    /// ignored.
    pub fn select_chain(&mut self, chain_id: u64) -> bool {
        if !self.available_chains.contains(&chain_id) {
            tracing::debug!(chain_id, "chain not available for savings");
            return false;
        }
        self.chain_id = chain_id;
        self.reset();
        true
    }

    /// Follows the wallet to a new chain.
    pub fn on_wallet_chain_changed(&mut self, chain_id: u64) {
        tracing::debug!(from = self.chain_id, to = chain_id, "wallet chain changed");
        self.chain_id = chain_id;
        self.reset();
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.state = DialogState::ChainSelect;
        self.protocols.clear();
        self.failures.clear();
        self.selected = None;
    }

    pub fn begin_pass(&self) -> Pass {
        Pass {
            generation: self.generation,
            chain_id: self.chain_id,
            account: self.account,
        }
    }

    /// Stores the outcome of `pass` unless the dialog moved on since it was
    /// started. Returns whether the outcome was kept.
    pub fn commit(&mut self, pass: Pass, outcome: AggregationOutcome) -> bool {
        if pass.generation != self.generation {
            tracing::debug!(
                pass = pass.generation,
                current = self.generation,
                chain_id = pass.chain_id,
                "discarding stale aggregation pass"
            );
            return false;
        }
        tracing::info!(
            chain_id = self.chain_id,
            protocols = outcome.protocols.len(),
            "showing protocols"
        );
        self.protocols = outcome.protocols;
        self.failures = outcome.failures;
        if self.state == DialogState::ChainSelect {
            self.state = DialogState::ProtocolList;
        }
        true
    }

    /// Aggregates the current chain and shows the result.
    pub async fn refresh(&mut self) -> bool {
        let pass = self.begin_pass();
        let outcome = pass.run(&self.aggregator).await;
        self.commit(pass, outcome)
    }

    /// The protocols listed on a tab. Withdrawals only list protocols the
    /// account holds a balance in.
    pub fn protocols(&self, tab: Tab) -> Vec<&Protocol> {
        self.protocols
            .iter()
            .filter(|protocol| tab.includes(protocol))
            .collect()
    }

    /// Opens the protocol at `index` of the `tab` listing.
    pub fn select_protocol(&mut self, index: usize, tab: Tab) -> Option<&Protocol> {
        let protocol = self.protocols(tab).get(index).copied()?.clone();
        self.selected = Some((protocol, tab));
        self.state = DialogState::ProtocolDetail;
        self.selected.as_ref().map(|(protocol, _)| protocol)
    }

    pub fn selected_protocol(&self) -> Option<(&Protocol, Tab)> {
        self.selected.as_ref().map(|(protocol, tab)| (protocol, *tab))
    }

    /// Closing from a protocol's detail goes back to the list; closing the
    /// list closes the dialog.
    pub fn request_close(&mut self) -> DialogState {
        self.state = if self.selected.take().is_some() {
            DialogState::ProtocolList
        } else {
            DialogState::Closed
        };
        self.state
    }
}
