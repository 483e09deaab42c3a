use {
    crate::identity::{PersonaIdentifier, ProfileIdentifier},
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    url::Url,
};

/// How a persona regards one of its contacts.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationFavor {
    Collected,
    Uncollected,
    Deprecated,
}

/// A link between a persona and a profile it has seen.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub profile: ProfileIdentifier,
    pub linked: PersonaIdentifier,
    pub network: String,
    pub favor: RelationFavor,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub identifier: ProfileIdentifier,
    pub nickname: Option<String>,
    pub avatar: Option<Url>,
    pub linked_persona: Option<PersonaIdentifier>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A profile together with the favor of the relation it was found through.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(flatten)]
    pub profile: Profile,
    pub favor: Option<RelationFavor>,
}
