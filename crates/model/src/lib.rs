//! Contains models that are shared between the savings aggregator, the
//! dashboard controllers and the collaborator implementations.

pub mod gas;
pub mod identity;
pub mod plugin;
pub mod protocol;
pub mod relation;
pub mod social;
pub mod token;
pub mod transfer;

pub use {
    protocol::{Protocol, ProtocolKind, Tab},
    token::{Token, TokenKind, TokenPair},
};
