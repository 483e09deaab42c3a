//! Controllers behind the dashboard's contacts list, profile card and wallet
//! transfer form. Rendering is left to the caller; these types own the state.

pub mod contacts;
pub mod profile_card;
pub mod transfer;
