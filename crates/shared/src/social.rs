//! Social identities looked up by account address through the CyberConnect
//! GraphQL API.

use {
    alloy::primitives::Address,
    anyhow::{Context, Result, anyhow},
    async_trait::async_trait,
    model::social::{Connection, SocialIdentity},
    reqwest::Client,
    serde::{Deserialize, Serialize},
    std::time::Duration,
    url::Url,
};

pub const DEFAULT_BASE_URL: &str = "https://api.cybertino.io/connect/";

#[mockall::automock]
#[async_trait]
pub trait SocialIdentityFetching: Send + Sync {
    /// `None` when the API knows nothing about the address.
    async fn fetch_identity(&self, address: Address) -> Result<Option<SocialIdentity>>;
}

pub struct CyberConnectClient {
    client: Client,
    url: Url,
    timeout: Duration,
}

impl CyberConnectClient {
    pub fn new(client: Client, url: Url, timeout: Duration) -> Self {
        Self {
            client,
            url,
            timeout,
        }
    }
}

#[async_trait]
impl SocialIdentityFetching for CyberConnectClient {
    async fn fetch_identity(&self, address: Address) -> Result<Option<SocialIdentity>> {
        use self::identity_query::*;

        tracing::debug!(%address, "fetching social identity");
        let response: Response = self
            .client
            .post(self.url.clone())
            .timeout(self.timeout)
            .json(&Request {
                query: QUERY,
                variables: Variables { address },
            })
            .send()
            .await
            .context("cyberconnect request")?
            .error_for_status()
            .context("cyberconnect status")?
            .json()
            .await
            .context("cyberconnect response")?;
        response.into_identity()
    }
}

mod identity_query {
    use super::*;

    pub const QUERY: &str = r#"
        query identity($address: String!) {
            identity(address: $address) {
                address
                ens
                avatar
                followings {
                    list { address ens avatar }
                }
                followers {
                    list { address ens avatar }
                }
            }
        }
    "#;

    #[derive(Serialize)]
    pub struct Request {
        pub query: &'static str,
        pub variables: Variables,
    }

    #[derive(Serialize)]
    pub struct Variables {
        pub address: Address,
    }

    #[derive(Debug, Deserialize)]
    pub struct Response {
        pub data: Option<Data>,
        #[serde(default)]
        pub errors: Vec<Error>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Error {
        pub message: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct Data {
        pub identity: Option<Identity>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Identity {
        pub address: Address,
        #[serde(default)]
        pub ens: String,
        #[serde(default)]
        pub avatar: String,
        pub followings: Option<Page>,
        pub followers: Option<Page>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct Page {
        #[serde(default)]
        pub list: Vec<Entry>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Entry {
        pub address: Address,
        #[serde(default)]
        pub ens: String,
        #[serde(default)]
        pub avatar: String,
    }

    impl Response {
        pub fn into_identity(self) -> Result<Option<SocialIdentity>> {
            if let Some(error) = self.errors.first() {
                return Err(anyhow!("cyberconnect error: {}", error.message));
            }
            Ok(self
                .data
                .and_then(|data| data.identity)
                .map(Identity::into_model))
        }
    }

    impl Identity {
        fn into_model(self) -> SocialIdentity {
            SocialIdentity {
                address: self.address,
                ens: non_empty(self.ens),
                avatar: avatar_url(&self.avatar),
                followings: connections(self.followings),
                followers: connections(self.followers),
            }
        }
    }

    fn connections(page: Option<Page>) -> Vec<Connection> {
        page.unwrap_or_default()
            .list
            .into_iter()
            .map(|entry| Connection {
                address: entry.address,
                ens: non_empty(entry.ens),
                avatar: avatar_url(&entry.avatar),
            })
            .collect()
    }

    fn non_empty(value: String) -> Option<String> {
        Some(value).filter(|value| !value.is_empty())
    }

    /// The API sends an empty string when no avatar is set.
    fn avatar_url(value: &str) -> Option<Url> {
        if value.is_empty() {
            return None;
        }
        value
            .parse::<Url>()
            .inspect_err(|err| tracing::debug!(?err, value, "ignoring invalid avatar url"))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use {
        super::{identity_query::*, *},
        alloy::primitives::address,
    };

    #[test]
    fn decodes_identity() {
        let json = r#"{
            "data": {
                "identity": {
                    "address": "0xd8da6bf26964af9d7eed9e03e53415d37aa96045",
                    "ens": "vitalik.eth",
                    "avatar": "https://example.org/vitalik.png",
                    "followings": {
                        "list": [
                            {
                                "address": "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
                                "ens": "",
                                "avatar": ""
                            }
                        ]
                    },
                    "followers": { "list": [] }
                }
            }
        }"#;
        let response: Response = serde_json::from_str(json).unwrap();
        let identity = response.into_identity().unwrap().unwrap();
        assert_eq!(
            identity.address,
            address!("d8dA6BF26964aF9D7eEd9e03E53415D37aA96045")
        );
        assert_eq!(identity.ens.as_deref(), Some("vitalik.eth"));
        assert_eq!(
            identity.avatar.unwrap().as_str(),
            "https://example.org/vitalik.png"
        );
        assert_eq!(
            identity.followings,
            [Connection {
                address: address!("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"),
                ens: None,
                avatar: None,
            }]
        );
        assert!(identity.followers.is_empty());
    }

    #[test]
    fn missing_identity_and_lists() {
        let response: Response = serde_json::from_str(r#"{"data":{"identity":null}}"#).unwrap();
        assert_eq!(response.into_identity().unwrap(), None);

        let json = r#"{"data":{"identity":{
            "address": "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "avatar": "not a url"
        }}}"#;
        let identity = serde_json::from_str::<Response>(json)
            .unwrap()
            .into_identity()
            .unwrap()
            .unwrap();
        assert_eq!(identity.ens, None);
        assert_eq!(identity.avatar, None);
        assert!(identity.followings.is_empty());
    }

    #[test]
    fn default_endpoint() {
        let client = CyberConnectClient::new(
            Client::new(),
            DEFAULT_BASE_URL.parse().unwrap(),
            Duration::from_secs(10),
        );
        assert_eq!(client.url.as_str(), "https://api.cybertino.io/connect/");
    }

    #[test]
    fn graphql_errors_fail() {
        let json = r#"{"data":null,"errors":[{"message":"rate limited"}]}"#;
        let err = serde_json::from_str::<Response>(json)
            .unwrap()
            .into_identity()
            .unwrap_err();
        assert!(err.to_string().contains("rate limited"));
    }

    #[test]
    fn request_carries_address_variable() {
        let request = Request {
            query: QUERY,
            variables: Variables {
                address: Address::repeat_byte(0xab),
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json["variables"]["address"]
                .as_str()
                .unwrap()
                .to_lowercase(),
            format!("0x{}", "ab".repeat(20))
        );
        assert!(json["query"].as_str().unwrap().contains("identity(address: $address)"));
    }
}
