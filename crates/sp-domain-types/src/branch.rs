// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Branch-related domain types

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A branch of a repository.
///
/// Branch names are unique within their repository. `repository_key` is a
/// back-reference only; the repository owns its branches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Branch {
    pub repository_key: String,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    /// Whether code analysis is currently active for this branch
    #[serde(default)]
    pub is_analyzed: bool,
}

impl Branch {
    pub fn new(repository_key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            repository_key: repository_key.into(),
            name: name.into(),
            is_default: false,
            is_analyzed: false,
        }
    }

    pub fn default_branch(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn analyzed(mut self) -> Self {
        self.is_analyzed = true;
        self
    }
}

/// Commands accepted by the branch analysis toggle
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BranchAnalysisAction {
    Start,
    Stop,
}
