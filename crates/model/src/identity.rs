//! Identifiers of social profiles and personas.
//!
//! Both are stored and exchanged in their textual form, e.g.
//! `person:twitter.com/alice` and `ec_key:secp256k1/A3lTm...`.

use {
    serde_with::{DeserializeFromStr, SerializeDisplay},
    std::{fmt, str::FromStr},
};

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum IdentifierError {
    #[error("expected prefix {expected:?} in {value:?}")]
    Prefix {
        expected: &'static str,
        value: String,
    },
    #[error("malformed identifier {0:?}")]
    Malformed(String),
}

/// A profile on a social network, identified by network and user id.
#[derive(
    Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, SerializeDisplay, DeserializeFromStr,
)]
pub struct ProfileIdentifier {
    network: String,
    user_id: String,
}

impl ProfileIdentifier {
    const PREFIX: &'static str = "person:";

    pub fn new(network: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            user_id: user_id.into(),
        }
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl fmt::Display for ProfileIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/{}", Self::PREFIX, self.network, self.user_id)
    }
}

impl FromStr for ProfileIdentifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (network, user_id) = split(s, Self::PREFIX)?;
        Ok(Self::new(network, user_id))
    }
}

/// A persona, i.e. the key pair a user's profiles get linked to.
#[derive(
    Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, SerializeDisplay, DeserializeFromStr,
)]
pub struct PersonaIdentifier {
    curve: String,
    compressed_point: String,
}

impl PersonaIdentifier {
    const PREFIX: &'static str = "ec_key:";

    pub fn new(curve: impl Into<String>, compressed_point: impl Into<String>) -> Self {
        Self {
            curve: curve.into(),
            compressed_point: compressed_point.into(),
        }
    }

    pub fn curve(&self) -> &str {
        &self.curve
    }

    pub fn compressed_point(&self) -> &str {
        &self.compressed_point
    }
}

impl fmt::Display for PersonaIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/{}", Self::PREFIX, self.curve, self.compressed_point)
    }
}

impl FromStr for PersonaIdentifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (curve, point) = split(s, Self::PREFIX)?;
        Ok(Self::new(curve, point))
    }
}

fn split<'a>(s: &'a str, prefix: &'static str) -> Result<(&'a str, &'a str), IdentifierError> {
    let rest = s.strip_prefix(prefix).ok_or_else(|| IdentifierError::Prefix {
        expected: prefix,
        value: s.to_owned(),
    })?;
    match rest.split_once('/') {
        Some((left, right)) if !left.is_empty() && !right.is_empty() => Ok((left, right)),
        _ => Err(IdentifierError::Malformed(s.to_owned())),
    }
}
