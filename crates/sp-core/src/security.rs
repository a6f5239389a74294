// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use crate::collaborators::SecurityPolicy;
use sp_domain_types::{RepositoryAction, RepositoryRole};

/// Role table used when no external authorization service is configured.
///
/// Owners may do anything. Collaborators may curate analysis and file
/// visibility but not rename, re-default or delete the repository. Viewers
/// may only look.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleSecurityPolicy;

impl SecurityPolicy for RoleSecurityPolicy {
    fn is_allowed(&self, action: RepositoryAction, role: RepositoryRole) -> bool {
        match role {
            RepositoryRole::Owner => true,
            RepositoryRole::Collaborator => matches!(
                action,
                RepositoryAction::ToggleBranchAnalysis
                    | RepositoryAction::SetExcludePatterns
                    | RepositoryAction::IgnoreCodeFile
                    | RepositoryAction::RefreshProvider
            ),
            RepositoryRole::Viewer => false,
        }
    }
}
