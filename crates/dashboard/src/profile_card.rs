//! Profile card of an account linked from a social post, e.g.
//! `https://app.cyberconnect.me/address/0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed`.

use {
    alloy::primitives::Address,
    model::social::{Connection, SocialIdentity},
    shared::social::SocialIdentityFetching,
    std::sync::Arc,
    url::Url,
};

/// Characters kept on each side of a shortened address.
const SHORT_ADDRESS_CHARS: usize = 4;

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum ProfileUrlError {
    #[error("{0:?} has no address segment")]
    MissingAddress(String),
    #[error("{0:?} is not an account address")]
    InvalidAddress(String),
}

/// Picks the account out of the fifth `/` separated segment of a profile
/// link, i.e. the path segment after `/address/`.
pub fn address_from_url(url: &str) -> Result<Address, ProfileUrlError> {
    let segment = url
        .split('/')
        .nth(4)
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| ProfileUrlError::MissingAddress(url.to_owned()))?;
    segment
        .parse()
        .map_err(|_| ProfileUrlError::InvalidAddress(segment.to_owned()))
}

/// Checksummed address shortened to `0x1234...abcd`. A `chars` of 0 or one
/// covering the whole address returns it in full.
pub fn short_address(address: Address, chars: usize) -> String {
    let checksummed = address.to_checksum(None);
    if chars == 0 || chars >= 20 {
        return checksummed;
    }
    format!(
        "{}...{}",
        &checksummed[..2 + chars],
        &checksummed[checksummed.len() - chars..]
    )
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Avatar {
    Image(Url),
    /// No picture is known; render a generated one from this seed.
    Generated(String),
}

pub struct ProfileCard {
    identities: Arc<dyn SocialIdentityFetching>,
    address: Address,
    identity: Option<SocialIdentity>,
    loading: bool,
}

impl ProfileCard {
    pub fn new(identities: Arc<dyn SocialIdentityFetching>, address: Address) -> Self {
        Self {
            identities,
            address,
            identity: None,
            loading: false,
        }
    }

    pub fn from_url(
        identities: Arc<dyn SocialIdentityFetching>,
        url: &str,
    ) -> Result<Self, ProfileUrlError> {
        Ok(Self::new(identities, address_from_url(url)?))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn identity(&self) -> Option<&SocialIdentity> {
        self.identity.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Fetches the identity. A failure keeps the previously loaded one.
    pub async fn load(&mut self) -> anyhow::Result<()> {
        self.loading = true;
        let result = self.identities.fetch_identity(self.address).await;
        self.loading = false;
        match result {
            Ok(identity) => {
                tracing::debug!(address = %self.address, found = identity.is_some(), "loaded social identity");
                self.identity = identity;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(?err, address = %self.address, "failed to load social identity");
                Err(err)
            }
        }
    }

    /// Reloads after following or unfollowing so both lists are current.
    pub async fn refresh_follow_lists(&mut self) -> anyhow::Result<()> {
        self.load().await
    }

    /// ENS name when there is one, the shortened address otherwise.
    pub fn display_name(&self) -> String {
        self.identity
            .as_ref()
            .and_then(SocialIdentity::ens_name)
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| short_address(self.address, SHORT_ADDRESS_CHARS))
    }

    pub fn avatar(&self) -> Avatar {
        match self.identity.as_ref().and_then(|identity| identity.avatar.clone()) {
            Some(url) => Avatar::Image(url),
            None => Avatar::Generated(self.address.to_checksum(None)),
        }
    }

    /// Following and unfollowing need a loaded identity.
    pub fn can_follow(&self) -> bool {
        !self.loading && self.identity.is_some()
    }

    pub fn followings(&self) -> &[Connection] {
        self.identity
            .as_ref()
            .map(|identity| identity.followings.as_slice())
            .unwrap_or_default()
    }

    pub fn followers(&self) -> &[Connection] {
        self.identity
            .as_ref()
            .map(|identity| identity.followers.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::primitives::address,
        shared::social::MockSocialIdentityFetching,
    };

    const ACCOUNT: Address = address!("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");

    fn identity(ens: Option<&str>, followers: usize) -> SocialIdentity {
        SocialIdentity {
            address: ACCOUNT,
            ens: ens.map(ToOwned::to_owned),
            avatar: Some("https://example.org/a.png".parse().unwrap()),
            followings: Vec::new(),
            followers: (0..followers)
                .map(|i| Connection {
                    address: Address::repeat_byte(u8::try_from(i).unwrap()),
                    ens: None,
                    avatar: None,
                })
                .collect(),
        }
    }

    #[test]
    fn extracts_address_segment() {
        assert_eq!(
            address_from_url(
                "https://app.cyberconnect.me/address/0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"
            ),
            Ok(ACCOUNT)
        );
        assert_eq!(
            address_from_url("https://app.cyberconnect.me/address/"),
            Err(ProfileUrlError::MissingAddress(
                "https://app.cyberconnect.me/address/".to_owned()
            ))
        );
        assert_eq!(
            address_from_url("https://app.cyberconnect.me"),
            Err(ProfileUrlError::MissingAddress(
                "https://app.cyberconnect.me".to_owned()
            ))
        );
        assert_eq!(
            address_from_url("https://app.cyberconnect.me/address/alice.eth"),
            Err(ProfileUrlError::InvalidAddress("alice.eth".to_owned()))
        );
    }

    #[test]
    fn shortens_checksummed_address() {
        assert_eq!(short_address(ACCOUNT, 4), "0x5aAe...eAed");
        assert_eq!(
            short_address(ACCOUNT, 0),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
        assert_eq!(
            short_address(ACCOUNT, 20),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }

    #[tokio::test]
    async fn falls_back_to_short_address() {
        let mut identities = MockSocialIdentityFetching::new();
        identities
            .expect_fetch_identity()
            .returning(|_| Ok(Some(identity(Some(""), 0))));
        let mut card = ProfileCard::new(Arc::new(identities), ACCOUNT);

        assert_eq!(card.display_name(), "0x5aAe...eAed");
        assert_eq!(
            card.avatar(),
            Avatar::Generated("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".to_owned())
        );
        assert!(!card.can_follow());

        card.load().await.unwrap();
        assert_eq!(card.display_name(), "0x5aAe...eAed");
        assert_eq!(
            card.avatar(),
            Avatar::Image("https://example.org/a.png".parse().unwrap())
        );
        assert!(card.can_follow());
    }

    #[tokio::test]
    async fn shows_ens_and_follow_lists() {
        let mut identities = MockSocialIdentityFetching::new();
        identities
            .expect_fetch_identity()
            .times(1)
            .withf(|address| *address == ACCOUNT)
            .returning(|_| Ok(Some(identity(Some("alice.eth"), 2))));
        let mut card = ProfileCard::from_url(
            Arc::new(identities),
            "https://app.cyberconnect.me/address/0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        )
        .unwrap();

        assert!(card.followers().is_empty());
        card.load().await.unwrap();
        assert_eq!(card.display_name(), "alice.eth");
        assert_eq!(card.followers().len(), 2);
        assert!(card.followings().is_empty());
    }

    #[tokio::test]
    async fn refresh_reloads_follow_lists() {
        let mut identities = MockSocialIdentityFetching::new();
        let mut seq = mockall::Sequence::new();
        identities
            .expect_fetch_identity()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(identity(None, 1))));
        identities
            .expect_fetch_identity()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(anyhow::anyhow!("timeout")));
        identities
            .expect_fetch_identity()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(identity(None, 2))));
        let mut card = ProfileCard::new(Arc::new(identities), ACCOUNT);

        card.load().await.unwrap();
        assert_eq!(card.followers().len(), 1);

        assert!(card.refresh_follow_lists().await.is_err());
        assert!(!card.is_loading());
        assert_eq!(card.followers().len(), 1);

        card.refresh_follow_lists().await.unwrap();
        assert_eq!(card.followers().len(), 2);
    }

    #[tokio::test]
    async fn unknown_account_has_no_identity() {
        let mut identities = MockSocialIdentityFetching::new();
        identities.expect_fetch_identity().returning(|_| Ok(None));
        let mut card = ProfileCard::new(Arc::new(identities), ACCOUNT);

        card.load().await.unwrap();
        assert!(card.identity().is_none());
        assert!(!card.can_follow());
        assert_eq!(card.display_name(), "0x5aAe...eAed");
    }
}
