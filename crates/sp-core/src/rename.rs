// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Owner-scoped rename

use crate::collaborators::{NameNormalizer, RepositoryLookup};
use crate::effects::{Effect, Plan};
use crate::error::CoreResult;
use sp_domain_types::{Repository, RepositoryUrlKey};
use sp_rest_api_contract::FieldErrors;

pub const NAME_TAKEN: &str = "Name already exists on this account";
pub const NAME_UNUSABLE: &str = "Name must contain letters or digits";

/// Validation failure attached to a single request field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn into_field_errors(self) -> FieldErrors {
        FieldErrors::from([(self.field.to_string(), vec![self.message])])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// Nothing is left of the name once normalized
    Unusable(FieldError),
    Conflict(FieldError),
    /// Routing key of the renamed repository
    Renamed(RepositoryUrlKey),
}

pub struct RenameCoordinator<'a> {
    normalizer: &'a dyn NameNormalizer,
    lookup: &'a dyn RepositoryLookup,
}

impl<'a> RenameCoordinator<'a> {
    pub fn new(normalizer: &'a dyn NameNormalizer, lookup: &'a dyn RepositoryLookup) -> Self {
        Self { normalizer, lookup }
    }

    /// Normalize the proposed name, refuse it when the owner already has a
    /// repository under it, otherwise rename and plan the persistence.
    ///
    /// On conflict neither the repository nor the URL key is touched. Renaming
    /// to the current name conflicts with the repository itself. A name that
    /// normalizes to nothing is refused before the lookup.
    pub async fn rename(
        &self,
        repository: &mut Repository,
        url_key: &mut RepositoryUrlKey,
        proposed_name: &str,
    ) -> CoreResult<Plan<RenameOutcome>> {
        let name = self.normalizer.normalize(proposed_name);
        if name.is_empty() {
            tracing::info!(repository = %repository.key, proposed = %proposed_name, "Rename refused, empty name");
            return Ok(Plan::new(RenameOutcome::Unusable(FieldError {
                field: "name",
                message: NAME_UNUSABLE.to_string(),
            })));
        }

        let candidate = url_key.renamed(name.clone());

        if let Some(existing) = self.lookup.get_by_url_key(&candidate).await? {
            tracing::info!(
                repository = %repository.key,
                existing = %existing.key,
                name = %name,
                "Rename refused, name taken"
            );
            return Ok(Plan::new(RenameOutcome::Conflict(FieldError {
                field: "name",
                message: NAME_TAKEN.to_string(),
            })));
        }

        tracing::info!(repository = %repository.key, from = %repository.name, to = %name, "Renaming repository");
        repository.name = name;
        *url_key = candidate;

        Ok(Plan::new(RenameOutcome::Renamed(url_key.clone())).then(Effect::PersistRepository))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{MockNameNormalizer, MockRepositoryLookup};
    use mockall::predicate::eq;

    fn normalizer() -> MockNameNormalizer {
        let mut normalizer = MockNameNormalizer::new();
        normalizer
            .expect_normalize()
            .returning(|name| name.trim().to_lowercase().replace(' ', "-"));
        normalizer
    }

    #[tokio::test]
    async fn test_rename_to_free_name() {
        let normalizer = normalizer();
        let mut lookup = MockRepositoryLookup::new();
        lookup
            .expect_get_by_url_key()
            .with(eq(RepositoryUrlKey::new("acme", "new-name")))
            .times(1)
            .returning(|_| Ok(None));

        let mut repository = Repository::new("repo-1", "old");
        let mut url_key = RepositoryUrlKey::new("acme", "old").with_branch("develop");

        let plan = RenameCoordinator::new(&normalizer, &lookup)
            .rename(&mut repository, &mut url_key, " New Name")
            .await
            .unwrap();

        let expected = RepositoryUrlKey::new("acme", "new-name");
        assert_eq!(plan.outcome, RenameOutcome::Renamed(expected.clone()));
        assert_eq!(plan.effects, vec![Effect::PersistRepository]);
        assert_eq!(repository.name, "new-name");
        assert_eq!(url_key, expected);
    }

    #[tokio::test]
    async fn test_rename_to_taken_name_mutates_nothing() {
        let normalizer = normalizer();
        let mut lookup = MockRepositoryLookup::new();
        lookup
            .expect_get_by_url_key()
            .returning(|key| Ok(Some(Repository::new("repo-2", key.name.clone()))));

        let mut repository = Repository::new("repo-1", "old");
        let mut url_key = RepositoryUrlKey::new("acme", "old").with_branch("develop");
        let (repository_before, url_key_before) = (repository.clone(), url_key.clone());

        let plan = RenameCoordinator::new(&normalizer, &lookup)
            .rename(&mut repository, &mut url_key, "taken")
            .await
            .unwrap();

        match plan.outcome.clone() {
            RenameOutcome::Conflict(error) => {
                let errors = error.into_field_errors();
                assert_eq!(errors["name"], vec![NAME_TAKEN.to_string()]);
            }
            other => panic!("expected conflict, got {:?}", other),
        }
        assert!(plan.is_pure());
        assert_eq!(repository, repository_before);
        assert_eq!(url_key, url_key_before);
    }

    #[tokio::test]
    async fn test_name_without_letters_is_refused_before_lookup() {
        let mut normalizer = MockNameNormalizer::new();
        normalizer
            .expect_normalize()
            .withf(|name| name == "***")
            .returning(|_| String::new());
        let mut lookup = MockRepositoryLookup::new();
        lookup.expect_get_by_url_key().never();

        let mut repository = Repository::new("repo-1", "old");
        let mut url_key = RepositoryUrlKey::new("acme", "old");

        let plan = RenameCoordinator::new(&normalizer, &lookup)
            .rename(&mut repository, &mut url_key, "***")
            .await
            .unwrap();

        assert_eq!(
            plan.outcome,
            RenameOutcome::Unusable(FieldError {
                field: "name",
                message: NAME_UNUSABLE.to_string(),
            })
        );
        assert!(plan.is_pure());
        assert_eq!(repository.name, "old");
        assert_eq!(url_key, RepositoryUrlKey::new("acme", "old"));
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let normalizer = normalizer();
        let mut lookup = MockRepositoryLookup::new();
        lookup
            .expect_get_by_url_key()
            .returning(|_| Err(anyhow::anyhow!("index unavailable")));

        let mut repository = Repository::new("repo-1", "old");
        let mut url_key = RepositoryUrlKey::new("acme", "old");

        let result = RenameCoordinator::new(&normalizer, &lookup)
            .rename(&mut repository, &mut url_key, "new")
            .await;

        assert!(result.is_err());
        assert_eq!(repository.name, "old");
    }
}
