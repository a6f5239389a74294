// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Branch analysis lifecycle

use crate::effects::{Effect, Plan};
use crate::error::{CoreError, CoreResult};
use sp_domain_types::{Branch, BranchAnalysisAction, Repository};
use std::str::FromStr;

/// Analysis state of a single branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisState {
    Inactive,
    Analyzing,
}

impl AnalysisState {
    pub fn of(branch: &Branch) -> Self {
        if branch.is_analyzed {
            AnalysisState::Analyzing
        } else {
            AnalysisState::Inactive
        }
    }

    /// State the analysis backend reaches once `action` is applied
    pub fn after(self, action: BranchAnalysisAction) -> Self {
        match action {
            BranchAnalysisAction::Start => AnalysisState::Analyzing,
            BranchAnalysisAction::Stop => AnalysisState::Inactive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    NotFound,
    Issued {
        action: BranchAnalysisAction,
        from: AnalysisState,
    },
}

pub struct AnalysisLifecycle;

impl AnalysisLifecycle {
    /// Parse a caller-provided action. Anything but `start`/`stop` is fatal.
    pub fn parse_action(action: &str) -> CoreResult<BranchAnalysisAction> {
        BranchAnalysisAction::from_str(action.trim())
            .map_err(|_| CoreError::UnsupportedAction(action.to_string()))
    }

    /// Plan a start or stop of `branch_name`.
    ///
    /// `Stop` is issued even for a branch that is not being analyzed; the
    /// backend treats it as a no-op.
    pub fn plan_toggle(
        repository: &Repository,
        branch_name: &str,
        action: BranchAnalysisAction,
    ) -> Plan<ToggleOutcome> {
        let Some(branch) = repository.branch(branch_name) else {
            tracing::debug!(repository = %repository.key, branch = branch_name, "Branch not found");
            return Plan::new(ToggleOutcome::NotFound);
        };

        let from = AnalysisState::of(branch);
        tracing::info!(
            repository = %repository.key,
            branch = branch_name,
            %action,
            ?from,
            "Toggling branch analysis"
        );

        let branch = branch.name.clone();
        let effect = match action {
            BranchAnalysisAction::Start => Effect::StartAnalysis { branch },
            BranchAnalysisAction::Stop => Effect::StopAnalysis { branch },
        };
        Plan::new(ToggleOutcome::Issued { action, from }).then(effect)
    }
}
