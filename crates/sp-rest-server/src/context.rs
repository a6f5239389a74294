// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Page context resolution

use async_trait::async_trait;
use sp_core::{PageContext, RepositoryLookup, SecurityPolicy, UrlBuilder};
use sp_domain_types::{RepositoryAction, RepositoryRole, RepositoryUrlKey};
use sp_rest_api_contract::PageHeader;
use std::sync::Arc;

/// Loads the repository and branch a page request addresses
#[async_trait]
pub trait PageContextResolver: Send + Sync {
    /// `None` when the repository or the addressed branch does not exist.
    /// A key without a branch addresses the default branch.
    async fn resolve(
        &self,
        url_key: RepositoryUrlKey,
        role: RepositoryRole,
    ) -> anyhow::Result<Option<PageContext>>;
}

pub struct LookupContextResolver {
    repositories: Arc<dyn RepositoryLookup>,
    urls: Arc<dyn UrlBuilder>,
    security: Arc<dyn SecurityPolicy>,
}

impl LookupContextResolver {
    pub fn new(
        repositories: Arc<dyn RepositoryLookup>,
        urls: Arc<dyn UrlBuilder>,
        security: Arc<dyn SecurityPolicy>,
    ) -> Self {
        Self {
            repositories,
            urls,
            security,
        }
    }

    fn header(&self, url_key: &RepositoryUrlKey, role: RepositoryRole) -> PageHeader {
        let settings_url = self
            .urls
            .settings_url(&RepositoryUrlKey::new(&url_key.owner, &url_key.name));
        let ignore_link = self
            .security
            .is_allowed(RepositoryAction::SetExcludePatterns, role)
            .then(|| format!("{}#exclude-patterns", settings_url));

        PageHeader {
            files_url: self.urls.files_url(url_key),
            settings_url,
            active_url: None,
            ignore_link,
        }
    }
}

#[async_trait]
impl PageContextResolver for LookupContextResolver {
    async fn resolve(
        &self,
        url_key: RepositoryUrlKey,
        role: RepositoryRole,
    ) -> anyhow::Result<Option<PageContext>> {
        let repository_key = RepositoryUrlKey::new(&url_key.owner, &url_key.name);
        let Some(repository) = self.repositories.get_by_url_key(&repository_key).await? else {
            return Ok(None);
        };

        let branch = match &url_key.branch_name {
            Some(name) => repository.branch(name),
            None => repository.branches.iter().find(|branch| branch.is_default),
        };
        let Some(branch) = branch.cloned() else {
            tracing::debug!(repository = %repository.key, branch = ?url_key.branch_name, "Branch not found");
            return Ok(None);
        };

        let header = self.header(&url_key, role);
        Ok(Some(
            PageContext::new(repository, branch, url_key)
                .with_header(header)
                .with_role(role),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory::InMemoryStore;
    use sp_core::security::RoleSecurityPolicy;
    use sp_core::RoutePaths;
    use sp_domain_types::{Branch, Repository};

    async fn resolver() -> LookupContextResolver {
        let store = InMemoryStore::new();
        store
            .insert_repository(
                "acme",
                Repository::new("repo-1", "sapphire")
                    .with_branch(Branch::new("", "main").default_branch())
                    .with_branch(Branch::new("", "develop")),
            )
            .await;
        LookupContextResolver::new(
            Arc::new(store),
            Arc::new(RoutePaths::default()),
            Arc::new(RoleSecurityPolicy),
        )
    }

    #[tokio::test]
    async fn test_key_without_branch_resolves_default() {
        let resolver = resolver().await;

        let ctx = resolver
            .resolve(RepositoryUrlKey::new("acme", "sapphire"), RepositoryRole::Owner)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(ctx.branch.name, "main");
        assert_eq!(ctx.header.files_url, "/acme/sapphire/files");
        assert_eq!(
            ctx.header.ignore_link.as_deref(),
            Some("/acme/sapphire/settings#exclude-patterns")
        );
    }

    #[tokio::test]
    async fn test_explicit_branch_and_viewer_header() {
        let resolver = resolver().await;

        let ctx = resolver
            .resolve(
                RepositoryUrlKey::new("acme", "sapphire").with_branch("develop"),
                RepositoryRole::Viewer,
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(ctx.branch.name, "develop");
        assert_eq!(ctx.header.files_url, "/acme/sapphire/tree/develop/files");
        assert_eq!(ctx.header.settings_url, "/acme/sapphire/settings");
        assert_eq!(ctx.header.ignore_link, None);
    }

    #[tokio::test]
    async fn test_unknown_repository_or_branch() {
        let resolver = resolver().await;

        for key in [
            RepositoryUrlKey::new("acme", "ghost"),
            RepositoryUrlKey::new("acme", "sapphire").with_branch("ghost"),
        ] {
            let ctx = resolver.resolve(key, RepositoryRole::Owner).await.unwrap();
            assert!(ctx.is_none());
        }
    }
}
