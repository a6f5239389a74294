// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Branch resolution and default switching

use crate::effects::{Effect, Plan};
use sp_domain_types::{Branch, Repository, RepositoryUrlKey};

/// In-memory view over the branches loaded with a repository
pub struct BranchDirectory<'a> {
    branches: &'a mut Vec<Branch>,
}

/// Result of moving the default flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultSwitch {
    pub new_default: String,
    pub previous_default: Option<String>,
    pub new_default_was_analyzing: bool,
}

impl<'a> BranchDirectory<'a> {
    pub fn new(branches: &'a mut Vec<Branch>) -> Self {
        Self { branches }
    }

    pub fn find(&self, name: &str) -> Option<&Branch> {
        self.branches.iter().find(|branch| branch.name == name)
    }

    pub fn default_branch(&self) -> Option<&Branch> {
        self.branches.iter().find(|branch| branch.is_default)
    }

    /// Make `name` the only default branch.
    ///
    /// Returns `None` and leaves every flag untouched when no branch has that
    /// name. Any other branch found with the default flag set loses it, so a
    /// repository that was loaded with several defaults leaves with one.
    pub fn set_default(&mut self, name: &str) -> Option<DefaultSwitch> {
        let new_default_was_analyzing = self.find(name)?.is_analyzed;
        let previous_default = self
            .default_branch()
            .filter(|branch| branch.name != name)
            .map(|branch| branch.name.clone());

        for branch in self.branches.iter_mut() {
            branch.is_default = branch.name == name;
        }

        Some(DefaultSwitch {
            new_default: name.to_string(),
            previous_default,
            new_default_was_analyzing,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultBranchOutcome {
    NotFound,
    /// Default moved; the URL key now addresses the default branch
    Switched(DefaultSwitch),
}

/// Plan the switch of the default branch.
///
/// The repository is persisted once. A new default that was not being
/// analyzed gets its analysis started after that persistence.
pub fn plan_set_default_branch(
    repository: &mut Repository,
    url_key: &mut RepositoryUrlKey,
    branch_name: &str,
) -> Plan<DefaultBranchOutcome> {
    let Some(switch) = BranchDirectory::new(&mut repository.branches).set_default(branch_name)
    else {
        tracing::debug!(repository = %repository.key, branch = branch_name, "Default branch candidate not found");
        return Plan::new(DefaultBranchOutcome::NotFound);
    };

    tracing::info!(
        repository = %repository.key,
        branch = %switch.new_default,
        previous = ?switch.previous_default,
        "Switching default branch"
    );

    url_key.branch_name = None;

    let mut plan = Plan::new(DefaultBranchOutcome::Switched(switch.clone()))
        .then(Effect::PersistRepository);
    if !switch.new_default_was_analyzing {
        plan = plan.then(Effect::StartAnalysis {
            branch: switch.new_default,
        });
    }
    plan
}
