// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Collaborator traits consumed by the core
//!
//! The core owns no storage, naming, matching or authorization logic. Each
//! concern is reached through one of these traits, which the server wires to
//! concrete backends and the tests replace with `mockall` doubles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sp_domain_types::{Branch, CodeFile, Repository, RepositoryAction, RepositoryRole, RepositoryUrlKey};
use sp_rest_api_contract::{CodeFileDetail, CodeLinesResponse, RefreshProviderResponse};

/// Persists entity state
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait EntityStorage: Send + Sync {
    async fn set(&self, repository: &Repository) -> anyhow::Result<()>;
}

/// Canonicalizes proposed repository names
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait NameNormalizer: Send + Sync {
    fn normalize(&self, name: &str) -> String;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait RepositoryLookup: Send + Sync {
    async fn get_by_url_key(&self, key: &RepositoryUrlKey) -> anyhow::Result<Option<Repository>>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait CodeFileLookup: Send + Sync {
    async fn get_code_file(&self, branch: &Branch, path: &str) -> anyhow::Result<Option<CodeFile>>;
}

/// Starts and stops code analysis of a branch
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait AnalysisControl: Send + Sync {
    async fn start_analysis(&self, repository: &Repository, branch: &Branch) -> anyhow::Result<()>;
    async fn stop_analysis(&self, repository: &Repository, branch: &Branch) -> anyhow::Result<()>;
}

/// Re-evaluates every code file of a repository against its exclude patterns
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait PatternPropagation: Send + Sync {
    async fn ignore_patterns(&self, repository: &Repository, patterns: &[String]) -> anyhow::Result<()>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait CodeFileVisibility: Send + Sync {
    async fn hide_code_file(&self, code_file: &CodeFile) -> anyhow::Result<()>;
}

/// Answers whether a role may perform an action on a repository
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait SecurityPolicy: Send + Sync {
    fn is_allowed(&self, action: RepositoryAction, role: RepositoryRole) -> bool;
}

/// Removal request forwarded on behalf of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRepositoryRequest {
    pub repository_key: String,
    pub user_key: String,
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait RepositoryRemoval: Send + Sync {
    async fn delete(&self, request: &DeleteRepositoryRequest) -> anyhow::Result<()>;
}

/// Re-reads repository metadata from the hosting provider
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ProviderRefresh: Send + Sync {
    async fn can_refresh(&self, repository: &Repository) -> anyhow::Result<bool>;
    async fn refresh(&self, repository: &Repository, user_key: &str) -> anyhow::Result<RefreshProviderResponse>;
}

/// File details and content served to the code file pages
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait CodeFileDetails: Send + Sync {
    async fn get_file_detail(
        &self,
        repository: &Repository,
        branch: &Branch,
        path: &str,
    ) -> anyhow::Result<Option<CodeFileDetail>>;

    async fn read_lines(
        &self,
        code_file: &CodeFile,
        start_line: u32,
        end_line: u32,
    ) -> anyhow::Result<CodeLinesResponse>;
}
