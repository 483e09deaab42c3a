//! The identity store holding personas, the profiles they have seen and the
//! relations between them.

use {
    anyhow::Result,
    async_trait::async_trait,
    model::{
        identity::{PersonaIdentifier, ProfileIdentifier},
        relation::{Profile, Relation},
    },
    parking_lot::RwLock,
    std::collections::HashMap,
};

/// Where a relation page starts.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RelationQuery {
    pub network: String,
    /// Continue after this relation (the last one of the previous page).
    pub after: Option<Relation>,
    /// Positional offset used when `after` is absent or no longer present.
    pub page_offset: usize,
}

#[mockall::automock]
#[async_trait]
pub trait IdentityQuerying: Send + Sync {
    async fn query_relation_paged(
        &self,
        persona: Option<PersonaIdentifier>,
        query: RelationQuery,
        size: usize,
    ) -> Result<Vec<Relation>>;

    async fn query_profiles_with_identifiers(
        &self,
        identifiers: &[ProfileIdentifier],
    ) -> Result<Vec<Profile>>;
}

/// Identity store kept in memory, ordered by profile identifier.
#[derive(Default)]
pub struct InMemoryIdentityStore {
    relations: RwLock<Vec<Relation>>,
    profiles: RwLock<HashMap<ProfileIdentifier, Profile>>,
}

impl InMemoryIdentityStore {
    pub fn insert_profile(&self, profile: Profile) {
        self.profiles
            .write()
            .insert(profile.identifier.clone(), profile);
    }

    /// Adds or replaces the relation between a persona and a profile.
    pub fn insert_relation(&self, relation: Relation) {
        let mut relations = self.relations.write();
        relations.retain(|existing| {
            existing.profile != relation.profile || existing.linked != relation.linked
        });
        let position = relations.partition_point(|existing| existing.profile < relation.profile);
        relations.insert(position, relation);
    }
}

#[async_trait]
impl IdentityQuerying for InMemoryIdentityStore {
    async fn query_relation_paged(
        &self,
        persona: Option<PersonaIdentifier>,
        query: RelationQuery,
        size: usize,
    ) -> Result<Vec<Relation>> {
        let relations = self.relations.read();
        let scoped: Vec<&Relation> = relations
            .iter()
            .filter(|relation| relation.network == query.network)
            .filter(|relation| persona.as_ref().is_none_or(|p| &relation.linked == p))
            .collect();
        let start = query
            .after
            .as_ref()
            .and_then(|after| scoped.iter().position(|relation| *relation == after))
            .map(|position| position + 1)
            .unwrap_or(query.page_offset);
        Ok(scoped
            .into_iter()
            .skip(start)
            .take(size)
            .cloned()
            .collect())
    }

    async fn query_profiles_with_identifiers(
        &self,
        identifiers: &[ProfileIdentifier],
    ) -> Result<Vec<Profile>> {
        let profiles = self.profiles.read();
        Ok(identifiers
            .iter()
            .filter_map(|identifier| profiles.get(identifier).cloned())
            .collect())
    }
}
