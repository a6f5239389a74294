// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Exclude-pattern change detection

use crate::effects::{Effect, Plan};
use sp_domain_types::{PatternSet, Repository};
use sp_rest_api_contract::SetExcludePatternsResponse;

#[derive(Debug, Clone, PartialEq)]
pub enum PatternsOutcome {
    NoOp,
    Changed(SetExcludePatternsResponse),
}

/// Plan the replacement of the exclude patterns.
///
/// Missing or empty input and a set equal to the current one are no-ops.
/// An empty list never clears the current patterns.
pub fn plan_set_exclude_patterns(
    repository: &mut Repository,
    candidate: Option<Vec<String>>,
) -> Plan<PatternsOutcome> {
    let candidate: PatternSet = match candidate {
        Some(patterns) if !patterns.is_empty() => patterns.into_iter().collect(),
        _ => return Plan::new(PatternsOutcome::NoOp),
    };

    if !candidate.differs_from(&repository.exclude_patterns) {
        tracing::debug!(repository = %repository.key, "Exclude patterns unchanged");
        return Plan::new(PatternsOutcome::NoOp);
    }

    tracing::info!(
        repository = %repository.key,
        changed = ?candidate.symmetric_difference(&repository.exclude_patterns),
        "Updating exclude patterns"
    );

    repository.exclude_patterns = candidate;
    let patterns = repository.exclude_patterns.to_vec();

    Plan::new(PatternsOutcome::Changed(SetExcludePatternsResponse::updated(
        patterns.clone(),
    )))
    .then(Effect::PersistRepository)
    .then(Effect::PropagatePatterns { patterns })
}
