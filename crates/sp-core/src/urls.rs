// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Page URLs produced by redirecting commands

use sp_domain_types::RepositoryUrlKey;

/// Builds the page URLs commands redirect to
pub trait UrlBuilder: Send + Sync {
    fn settings_url(&self, key: &RepositoryUrlKey) -> String;
    fn files_url(&self, key: &RepositoryUrlKey) -> String;
    fn ignore_file_url(&self, key: &RepositoryUrlKey) -> String;
    fn dashboard_url(&self) -> String;
}

/// Path-only URLs below a configurable base.
///
/// A key without a branch addresses the default branch, so its URLs carry no
/// `tree/<branch>` segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePaths {
    base: String,
}

impl RoutePaths {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    fn repository_root(&self, key: &RepositoryUrlKey) -> String {
        match &key.branch_name {
            Some(branch) => format!("{}/{}/{}/tree/{}", self.base, key.owner, key.name, branch),
            None => format!("{}/{}/{}", self.base, key.owner, key.name),
        }
    }
}

impl Default for RoutePaths {
    fn default() -> Self {
        Self::new("")
    }
}

impl UrlBuilder for RoutePaths {
    fn settings_url(&self, key: &RepositoryUrlKey) -> String {
        format!("{}/settings", self.repository_root(key))
    }

    fn files_url(&self, key: &RepositoryUrlKey) -> String {
        format!("{}/files", self.repository_root(key))
    }

    fn ignore_file_url(&self, key: &RepositoryUrlKey) -> String {
        format!("{}/ignore", self.repository_root(key))
    }

    fn dashboard_url(&self) -> String {
        format!("{}/dashboard", self.base)
    }
}
