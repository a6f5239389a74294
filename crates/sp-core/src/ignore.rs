// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Ignoring a single code file

use crate::collaborators::CodeFileLookup;
use crate::effects::{Effect, Plan};
use crate::error::CoreResult;
use sp_domain_types::{Branch, Repository};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreOutcome {
    NotFound,
    /// File hidden; `pattern_added` is false when its path was already excluded
    Ignored { pattern_added: bool },
}

pub struct IgnoreFileWorkflow<'a> {
    code_files: &'a dyn CodeFileLookup,
}

impl<'a> IgnoreFileWorkflow<'a> {
    pub fn new(code_files: &'a dyn CodeFileLookup) -> Self {
        Self { code_files }
    }

    /// Add `path` to the exclude patterns once and hide the file.
    ///
    /// The file is hidden on every call, including repeats for a path that is
    /// already excluded.
    pub async fn ignore(
        &self,
        repository: &mut Repository,
        branch: &Branch,
        path: &str,
    ) -> CoreResult<Plan<IgnoreOutcome>> {
        let Some(code_file) = self.code_files.get_code_file(branch, path).await? else {
            tracing::debug!(repository = %repository.key, branch = %branch.name, path, "Code file not found");
            return Ok(Plan::new(IgnoreOutcome::NotFound));
        };

        let pattern_added = repository.exclude_patterns.insert(path);
        tracing::info!(repository = %repository.key, path, pattern_added, "Ignoring code file");

        let mut plan = Plan::new(IgnoreOutcome::Ignored { pattern_added });
        if pattern_added {
            plan = plan
                .then(Effect::PersistRepository)
                .then(Effect::PropagatePatterns {
                    patterns: repository.exclude_patterns.to_vec(),
                });
        }
        Ok(plan.then(Effect::HideCodeFile(code_file)))
    }
}
