//! Savings: lists the yield protocols available to an account on a chain
//! and drives the dialog that deposits into and withdraws from them.

pub mod aggregator;
pub mod arguments;
pub mod config;
pub mod dialog;
pub mod plugin;
mod run;

pub use run::{run, start};
