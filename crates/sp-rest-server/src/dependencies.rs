// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Dependency wiring for the REST server

use crate::{
    config::ServerConfig,
    context::LookupContextResolver,
    in_memory::{InMemoryStore, Seed},
    state::AppState,
};
use anyhow::Result;
use sp_core::{
    normalize::SlugNormalizer, security::RoleSecurityPolicy, Collaborators,
    RepositoryOrchestrator, RoutePaths, UrlBuilder,
};
use std::sync::Arc;

/// Default dependency builder backed by the in-memory store
pub struct DefaultServerDependencies {
    state: AppState,
}

impl DefaultServerDependencies {
    /// Build the store, seeding it from the configured fixture when present
    pub async fn new(config: ServerConfig) -> Result<Self> {
        let store = match &config.seed_file {
            Some(path) => {
                tracing::info!(seed = %path.display(), "Seeding repositories");
                InMemoryStore::from_seed(Seed::load(path)?).await
            }
            None => InMemoryStore::new(),
        };
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Serve an existing store
    pub fn with_store(config: ServerConfig, store: Arc<InMemoryStore>) -> Self {
        let collaborators = Collaborators {
            storage: store.clone(),
            normalizer: Arc::new(SlugNormalizer),
            repositories: store.clone(),
            code_files: store.clone(),
            analysis: store.clone(),
            propagation: store.clone(),
            visibility: store.clone(),
            security: Arc::new(RoleSecurityPolicy),
            removal: store.clone(),
            provider: store.clone(),
            details: store.clone(),
        };
        let mut dependencies = Self::with_collaborators(config, collaborators);
        dependencies.state.store = Some(store);
        dependencies
    }

    /// Serve arbitrary collaborators
    pub fn with_collaborators(config: ServerConfig, collaborators: Collaborators) -> Self {
        let urls: Arc<dyn UrlBuilder> = Arc::new(RoutePaths::new(config.base_path.clone()));
        let contexts = Arc::new(LookupContextResolver::new(
            collaborators.repositories.clone(),
            urls.clone(),
            collaborators.security.clone(),
        ));

        let state = AppState {
            security: collaborators.security.clone(),
            orchestrator: RepositoryOrchestrator::new(collaborators, urls),
            contexts,
            config,
            store: None,
        };

        Self { state }
    }

    /// Consume the dependency builder and return the resulting app state
    pub fn into_state(self) -> AppState {
        self.state
    }
}
