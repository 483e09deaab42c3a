//! Paged contacts list for one persona on one social network.
//!
//! Relations are paged by cursor: the last relation of page `n` is stored
//! and passed as the starting point of page `n + 1`. The positional offset
//! is sent along for stores that can no longer locate the cursor.

use {
    model::{
        identity::PersonaIdentifier,
        relation::{Contact, Relation},
    },
    shared::identity::{IdentityQuerying, RelationQuery},
    std::{collections::HashMap, sync::Arc},
};

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// A page could not be loaded. Retrying the same page is safe.
#[derive(Debug, thiserror::Error)]
#[error("failed to load contacts page {page_index}")]
pub struct QueryFailure {
    pub page_index: usize,
    #[source]
    pub source: anyhow::Error,
}

pub struct RelationPager {
    identity: Arc<dyn IdentityQuerying>,
    network: String,
    persona: Option<PersonaIdentifier>,
    page_size: usize,
    /// Last relation of every fetched page, `None` for empty pages.
    cursors: HashMap<usize, Option<Relation>>,
}

impl RelationPager {
    pub fn new(
        identity: Arc<dyn IdentityQuerying>,
        network: impl Into<String>,
        persona: Option<PersonaIdentifier>,
    ) -> Self {
        Self {
            identity,
            network: network.into(),
            persona,
            page_size: DEFAULT_PAGE_SIZE,
            cursors: Default::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn persona(&self) -> Option<&PersonaIdentifier> {
        self.persona.as_ref()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Cursors are kept: page boundaries shift but the stored relations are
    /// still valid starting points.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size;
    }

    pub fn set_network(&mut self, network: &str) {
        if self.network != network {
            tracing::debug!(from = %self.network, to = %network, "contacts network changed");
            self.network = network.to_owned();
            self.cursors.clear();
        }
    }

    pub fn set_persona(&mut self, persona: Option<PersonaIdentifier>) {
        if self.persona != persona {
            tracing::debug!(?persona, "contacts persona changed");
            self.persona = persona;
            self.cursors.clear();
        }
    }

    pub fn cursor(&self, page_index: usize) -> Option<&Relation> {
        self.cursors.get(&page_index)?.as_ref()
    }

    pub async fn fetch_page(&mut self, page_index: usize) -> Result<Vec<Contact>, QueryFailure> {
        let after = page_index
            .checked_sub(1)
            .and_then(|previous| self.cursors.get(&previous).cloned())
            .flatten();
        let query = RelationQuery {
            network: self.network.clone(),
            after,
            page_offset: page_index * self.page_size,
        };
        let failure = |source| QueryFailure { page_index, source };

        let relations = self
            .identity
            .query_relation_paged(self.persona.clone(), query, self.page_size)
            .await
            .map_err(failure)?;
        self.cursors.insert(page_index, relations.last().cloned());
        tracing::debug!(page_index, relations = relations.len(), "fetched relations");
        if relations.is_empty() {
            return Ok(Vec::new());
        }

        let identifiers: Vec<_> = relations
            .iter()
            .map(|relation| relation.profile.clone())
            .collect();
        let profiles = self
            .identity
            .query_profiles_with_identifiers(&identifiers)
            .await
            .map_err(failure)?;
        Ok(profiles
            .into_iter()
            .map(|profile| Contact {
                favor: relations
                    .iter()
                    .find(|relation| relation.profile == profile.identifier)
                    .map(|relation| relation.favor),
                profile,
            })
            .collect())
    }

    /// Loads a page again after a failure.
    pub async fn retry(&mut self, page_index: usize) -> Result<Vec<Contact>, QueryFailure> {
        tracing::debug!(page_index, "retrying contacts page");
        self.fetch_page(page_index).await
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        chrono::Utc,
        model::{
            identity::ProfileIdentifier,
            relation::{Profile, RelationFavor},
        },
        shared::identity::{InMemoryIdentityStore, MockIdentityQuerying},
    };

    fn me() -> PersonaIdentifier {
        PersonaIdentifier::new("secp256k1", "me")
    }

    fn relation(user: &str, favor: RelationFavor) -> Relation {
        Relation {
            profile: ProfileIdentifier::new("twitter.com", user),
            linked: me(),
            network: "twitter.com".to_owned(),
            favor,
        }
    }

    fn profile(identifier: &ProfileIdentifier) -> Profile {
        Profile {
            identifier: identifier.clone(),
            nickname: Some(identifier.user_id().to_owned()),
            avatar: None,
            linked_persona: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn profiles_for(identifiers: &[ProfileIdentifier]) -> anyhow::Result<Vec<Profile>> {
        Ok(identifiers.iter().map(profile).collect())
    }

    #[tokio::test]
    async fn uses_previous_page_cursor() {
        let first = vec![
            relation("a", RelationFavor::Collected),
            relation("b", RelationFavor::Uncollected),
        ];
        let last_of_first = first[1].clone();

        let mut identity = MockIdentityQuerying::new();
        let page = first.clone();
        identity
            .expect_query_relation_paged()
            .times(1)
            .withf(|persona, query, size| {
                persona.as_ref() == Some(&me())
                    && query.after.is_none()
                    && query.page_offset == 0
                    && *size == 2
            })
            .returning(move |_, _, _| Ok(page.clone()));
        let expected = last_of_first.clone();
        identity
            .expect_query_relation_paged()
            .times(1)
            .withf(move |_, query, _| {
                query.after.as_ref() == Some(&expected) && query.page_offset == 2
            })
            .returning(|_, _, _| Ok(vec![relation("c", RelationFavor::Uncollected)]));
        identity
            .expect_query_profiles_with_identifiers()
            .returning(|identifiers| profiles_for(identifiers));

        let mut pager =
            RelationPager::new(Arc::new(identity), "twitter.com", Some(me())).with_page_size(2);
        let contacts = pager.fetch_page(0).await.unwrap();
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].favor, Some(RelationFavor::Collected));
        assert_eq!(contacts[1].favor, Some(RelationFavor::Uncollected));
        assert_eq!(pager.cursor(0), Some(&last_of_first));

        let contacts = pager.fetch_page(1).await.unwrap();
        assert_eq!(contacts[0].profile.identifier.user_id(), "c");
    }

    #[tokio::test]
    async fn empty_page_skips_enrichment() {
        let mut identity = MockIdentityQuerying::new();
        identity
            .expect_query_relation_paged()
            .returning(|_, _, _| Ok(Vec::new()));
        identity.expect_query_profiles_with_identifiers().never();

        let mut pager = RelationPager::new(Arc::new(identity), "twitter.com", None);
        assert!(pager.fetch_page(3).await.unwrap().is_empty());
        assert_eq!(pager.cursor(3), None);
    }

    #[tokio::test]
    async fn profiles_without_relation_have_no_favor() {
        let mut identity = MockIdentityQuerying::new();
        identity
            .expect_query_relation_paged()
            .returning(|_, _, _| Ok(vec![relation("a", RelationFavor::Deprecated)]));
        identity
            .expect_query_profiles_with_identifiers()
            .times(1)
            .returning(|_| {
                Ok(vec![
                    profile(&ProfileIdentifier::new("twitter.com", "a")),
                    profile(&ProfileIdentifier::new("twitter.com", "stranger")),
                ])
            });

        let mut pager = RelationPager::new(Arc::new(identity), "twitter.com", Some(me()));
        let contacts = pager.fetch_page(0).await.unwrap();
        assert_eq!(contacts[0].favor, Some(RelationFavor::Deprecated));
        assert_eq!(contacts[1].favor, None);
    }

    #[tokio::test]
    async fn scope_changes_clear_cursors() {
        let store = InMemoryIdentityStore::default();
        for user in ["a", "b", "c"] {
            store.insert_relation(relation(user, RelationFavor::Uncollected));
        }
        let mut pager =
            RelationPager::new(Arc::new(store), "twitter.com", Some(me())).with_page_size(1);
        pager.fetch_page(0).await.unwrap();
        assert!(pager.cursor(0).is_some());

        pager.set_network("twitter.com");
        pager.set_persona(Some(me()));
        pager.set_page_size(2);
        assert!(pager.cursor(0).is_some());

        pager.set_network("facebook.com");
        assert!(pager.cursor(0).is_none());

        pager.set_network("twitter.com");
        pager.fetch_page(0).await.unwrap();
        pager.set_persona(Some(PersonaIdentifier::new("secp256k1", "other")));
        assert!(pager.cursor(0).is_none());
    }

    #[tokio::test]
    async fn fetch_after_network_change_starts_without_cursor() {
        let mut identity = MockIdentityQuerying::new();
        let mut seq = mockall::Sequence::new();
        identity
            .expect_query_relation_paged()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|_, query, _| query.network == "twitter.com" && query.after.is_none())
            .returning(|_, _, _| Ok(vec![relation("a", RelationFavor::Collected)]));
        identity
            .expect_query_relation_paged()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|_, query, size| {
                query.network == "facebook.com"
                    && query.after.is_none()
                    && query.page_offset == 2
                    && *size == 2
            })
            .returning(|_, _, _| Ok(Vec::new()));
        identity
            .expect_query_profiles_with_identifiers()
            .returning(|identifiers| profiles_for(identifiers));

        let mut pager =
            RelationPager::new(Arc::new(identity), "twitter.com", Some(me())).with_page_size(2);
        pager.fetch_page(0).await.unwrap();
        assert!(pager.cursor(0).is_some());

        pager.set_network("facebook.com");
        assert!(pager.fetch_page(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failures_are_retryable() {
        let mut identity = MockIdentityQuerying::new();
        let mut seq = mockall::Sequence::new();
        identity
            .expect_query_relation_paged()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Err(anyhow::anyhow!("store locked")));
        identity
            .expect_query_relation_paged()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(vec![relation("a", RelationFavor::Collected)]));
        identity
            .expect_query_profiles_with_identifiers()
            .returning(|identifiers| profiles_for(identifiers));

        let mut pager = RelationPager::new(Arc::new(identity), "twitter.com", Some(me()));
        let err = pager.fetch_page(0).await.unwrap_err();
        assert_eq!(err.page_index, 0);
        assert!(pager.cursor(0).is_none());

        let contacts = pager.retry(0).await.unwrap();
        assert_eq!(contacts.len(), 1);
    }
}
