// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Planned side effects and the runner that executes them
//!
//! Planning functions mutate the repository they are given and describe the
//! collaborator calls that must follow as an ordered [`Effect`] list. The
//! [`EffectRunner`] executes that list strictly in order and stops at the
//! first failure.

use crate::collaborators::{AnalysisControl, CodeFileVisibility, EntityStorage, PatternPropagation};
use crate::error::{CoreError, CoreResult};
use sp_domain_types::{CodeFile, Repository};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    PersistRepository,
    StartAnalysis { branch: String },
    StopAnalysis { branch: String },
    PropagatePatterns { patterns: Vec<String> },
    HideCodeFile(CodeFile),
}

/// Outcome of a planned command plus the effects it requires
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Plan<O> {
    pub outcome: O,
    pub effects: Vec<Effect>,
}

impl<O> Plan<O> {
    /// A plan without side effects
    pub fn new(outcome: O) -> Self {
        Self {
            outcome,
            effects: Vec::new(),
        }
    }

    pub fn then(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn is_pure(&self) -> bool {
        self.effects.is_empty()
    }
}

pub struct EffectRunner<'a> {
    pub storage: &'a dyn EntityStorage,
    pub analysis: &'a dyn AnalysisControl,
    pub propagation: &'a dyn PatternPropagation,
    pub visibility: &'a dyn CodeFileVisibility,
}

impl EffectRunner<'_> {
    pub async fn apply(&self, repository: &Repository, effects: &[Effect]) -> CoreResult<()> {
        for effect in effects {
            tracing::trace!(repository = %repository.key, ?effect, "Applying effect");
            match effect {
                Effect::PersistRepository => self.storage.set(repository).await?,
                Effect::StartAnalysis { branch } => {
                    let branch = repository
                        .branch(branch)
                        .ok_or_else(|| CoreError::MissingBranch(branch.clone()))?;
                    self.analysis.start_analysis(repository, branch).await?;
                }
                Effect::StopAnalysis { branch } => {
                    let branch = repository
                        .branch(branch)
                        .ok_or_else(|| CoreError::MissingBranch(branch.clone()))?;
                    self.analysis.stop_analysis(repository, branch).await?;
                }
                Effect::PropagatePatterns { patterns } => {
                    self.propagation.ignore_patterns(repository, patterns).await?
                }
                Effect::HideCodeFile(code_file) => self.visibility.hide_code_file(code_file).await?,
            }
        }
        Ok(())
    }
}
