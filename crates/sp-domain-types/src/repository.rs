// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Repository-related domain types
//!
//! Types describing a hosted source repository, how it is addressed in
//! URLs, and who is looking at it.

use crate::branch::Branch;
use crate::patterns::PatternSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{Display, EnumIter, EnumString};

/// A source repository and its branches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Opaque storage key
    pub key: String,
    /// Identifier at the hosting provider
    #[serde(default)]
    pub external_id: String,
    /// Human-readable name, unique per owner
    pub name: String,
    /// Keys of the accounts owning this repository
    #[serde(default)]
    pub user_keys: BTreeSet<String>,
    #[serde(default)]
    pub exclude_patterns: PatternSet,
    #[serde(default)]
    pub branches: Vec<Branch>,
}

impl Repository {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            external_id: String::new(),
            name: name.into(),
            user_keys: BTreeSet::new(),
            exclude_patterns: PatternSet::new(),
            branches: Vec::new(),
        }
    }

    pub fn with_owner(mut self, user_key: impl Into<String>) -> Self {
        self.user_keys.insert(user_key.into());
        self
    }

    /// Append a branch, rewriting its back-reference to this repository
    pub fn with_branch(mut self, mut branch: Branch) -> Self {
        branch.repository_key = self.key.clone();
        self.branches.push(branch);
        self
    }

    pub fn is_owned_by(&self, user_key: &str) -> bool {
        self.user_keys.contains(user_key)
    }

    pub fn branch(&self, name: &str) -> Option<&Branch> {
        self.branches.iter().find(|branch| branch.name == name)
    }
}

/// Routing identifier derived from a repository.
///
/// `name` tracks [`Repository::name`]. `branch_name` is `None` when the URL
/// resolves to the default branch implicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct RepositoryUrlKey {
    pub owner: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
}

impl RepositoryUrlKey {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            branch_name: None,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch_name = Some(branch.into());
        self
    }

    /// Same owner, different repository name, no branch segment
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            owner: self.owner.clone(),
            name: name.into(),
            branch_name: None,
        }
    }
}

/// Role of the current viewer on a repository
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum RepositoryRole {
    Owner,
    Collaborator,
    #[default]
    Viewer,
}

/// Action descriptors queried against the security policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RepositoryAction {
    Rename,
    SetDefaultBranch,
    ToggleBranchAnalysis,
    SetExcludePatterns,
    IgnoreCodeFile,
    RefreshProvider,
    Delete,
}

/// Identity of the caller, as resolved upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_key: String,
}

impl Identity {
    pub fn new(user_key: impl Into<String>) -> Self {
        Self {
            user_key: user_key.into(),
        }
    }
}
