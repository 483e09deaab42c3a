//! Numeric helpers shared by the wallet and savings crates.

pub mod conversions;
pub mod units;

pub use units::{ParseError, format_units, parse_units};
