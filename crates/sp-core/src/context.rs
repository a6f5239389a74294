// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use sp_domain_types::{Branch, Repository, RepositoryRole, RepositoryUrlKey};
use sp_rest_api_contract::PageHeader;

/// Everything a repository page request works on.
///
/// Resolved once per request by the hosting layer and exclusively owned by
/// that request. `branch` is a snapshot of the branch the URL resolved to;
/// the branch flags that commands change live in `repository.branches`.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContext {
    pub repository: Repository,
    pub branch: Branch,
    pub url_key: RepositoryUrlKey,
    pub header: PageHeader,
    pub role: RepositoryRole,
}

impl PageContext {
    pub fn new(repository: Repository, branch: Branch, url_key: RepositoryUrlKey) -> Self {
        Self {
            repository,
            branch,
            url_key,
            header: PageHeader::default(),
            role: RepositoryRole::default(),
        }
    }

    pub fn with_header(mut self, header: PageHeader) -> Self {
        self.header = header;
        self
    }

    pub fn with_role(mut self, role: RepositoryRole) -> Self {
        self.role = role;
        self
    }
}
