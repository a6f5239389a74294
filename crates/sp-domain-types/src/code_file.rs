// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Code file records

use serde::{Deserialize, Serialize};

/// A file tracked on a branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct CodeFile {
    pub repository_key: String,
    pub branch: String,
    pub path: String,
    /// Set by the ignore-file workflow; hidden files are not shown anywhere
    #[serde(default)]
    pub is_hidden: bool,
    /// Derived from the repository exclude patterns by the matching backend
    #[serde(default)]
    pub is_ignored: bool,
}

impl CodeFile {
    pub fn new(
        repository_key: impl Into<String>,
        branch: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            repository_key: repository_key.into(),
            branch: branch.into(),
            path: path.into(),
            is_hidden: false,
            is_ignored: false,
        }
    }
}
