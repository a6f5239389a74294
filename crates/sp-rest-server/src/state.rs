// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Server state management

use crate::config::ServerConfig;
use crate::context::PageContextResolver;
use crate::in_memory::InMemoryStore;
use sp_core::{RepositoryOrchestrator, SecurityPolicy};
use std::sync::Arc;

/// Shared server state
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,

    pub orchestrator: RepositoryOrchestrator,

    pub contexts: Arc<dyn PageContextResolver>,

    /// Gatekeeper for mutating requests
    pub security: Arc<dyn SecurityPolicy>,

    /// Backing store when the server owns it; `None` for injected collaborators
    pub store: Option<Arc<InMemoryStore>>,
}

impl AppState {
    /// Get configuration reference
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
