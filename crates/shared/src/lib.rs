//! Collaborators of the savings and dashboard controllers: node access,
//! token metadata, the wallet, the identity store, the social identity API,
//! the gas settings channel and the protocol sources.

pub mod ethrpc;
pub mod gas_settings;
pub mod identity;
pub mod social;
pub mod sources;
pub mod token_info;
pub mod wallet;
