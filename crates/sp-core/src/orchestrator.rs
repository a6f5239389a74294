// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Command dispatch for the repository pages

use crate::analysis::{AnalysisLifecycle, ToggleOutcome};
use crate::branches::{plan_set_default_branch, DefaultBranchOutcome};
use crate::collaborators::*;
use crate::context::PageContext;
use crate::effects::EffectRunner;
use crate::error::CoreResult;
use crate::ignore::{IgnoreFileWorkflow, IgnoreOutcome};
use crate::patterns::{plan_set_exclude_patterns, PatternsOutcome};
use crate::rename::{RenameCoordinator, RenameOutcome};
use crate::result::{ActionResult, JsonPayload, PageView};
use crate::urls::UrlBuilder;
use sp_domain_types::{Identity, RepositoryAction};
use sp_rest_api_contract::{CodeFilePage, IgnoredFilePage};
use std::sync::Arc;

/// Backends the orchestrator delegates to
#[derive(Clone)]
pub struct Collaborators {
    pub storage: Arc<dyn EntityStorage>,
    pub normalizer: Arc<dyn NameNormalizer>,
    pub repositories: Arc<dyn RepositoryLookup>,
    pub code_files: Arc<dyn CodeFileLookup>,
    pub analysis: Arc<dyn AnalysisControl>,
    pub propagation: Arc<dyn PatternPropagation>,
    pub visibility: Arc<dyn CodeFileVisibility>,
    pub security: Arc<dyn SecurityPolicy>,
    pub removal: Arc<dyn RepositoryRemoval>,
    pub provider: Arc<dyn ProviderRefresh>,
    pub details: Arc<dyn CodeFileDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryCommand {
    Rename { name: String },
    SetDefaultBranch { name: String },
    ToggleBranchAnalysis { branch: String, action: String },
    SetExcludePatterns { patterns: Option<Vec<String>> },
    IgnoreCodeFile { path: String },
    Delete { identity: Identity },
    RefreshProvider { identity: Identity },
    CodeFile { path: String },
    ViewMore { path: String, start_line: u32, end_line: u32 },
}

impl RepositoryCommand {
    pub fn name(&self) -> &'static str {
        match self {
            RepositoryCommand::Rename { .. } => "rename",
            RepositoryCommand::SetDefaultBranch { .. } => "set-default-branch",
            RepositoryCommand::ToggleBranchAnalysis { .. } => "toggle-branch-analysis",
            RepositoryCommand::SetExcludePatterns { .. } => "set-exclude-patterns",
            RepositoryCommand::IgnoreCodeFile { .. } => "ignore-code-file",
            RepositoryCommand::Delete { .. } => "delete",
            RepositoryCommand::RefreshProvider { .. } => "refresh-provider",
            RepositoryCommand::CodeFile { .. } => "code-file",
            RepositoryCommand::ViewMore { .. } => "view-more",
        }
    }
}

/// Runs repository page commands against a resolved [`PageContext`].
///
/// Decisions are delegated to the planning components; this type only
/// applies the planned effects and maps outcomes to [`ActionResult`]s.
/// Authorization is never decided here.
#[derive(Clone)]
pub struct RepositoryOrchestrator {
    collaborators: Collaborators,
    urls: Arc<dyn UrlBuilder>,
}

impl RepositoryOrchestrator {
    pub fn new(collaborators: Collaborators, urls: Arc<dyn UrlBuilder>) -> Self {
        Self {
            collaborators,
            urls,
        }
    }

    fn runner(&self) -> EffectRunner<'_> {
        EffectRunner {
            storage: self.collaborators.storage.as_ref(),
            analysis: self.collaborators.analysis.as_ref(),
            propagation: self.collaborators.propagation.as_ref(),
            visibility: self.collaborators.visibility.as_ref(),
        }
    }

    #[tracing::instrument(
        skip_all,
        fields(repository = %ctx.repository.key, command = command.name())
    )]
    pub async fn execute(
        &self,
        ctx: &mut PageContext,
        command: RepositoryCommand,
    ) -> CoreResult<ActionResult> {
        match command {
            RepositoryCommand::Rename { name } => self.rename(ctx, &name).await,
            RepositoryCommand::SetDefaultBranch { name } => {
                self.set_default_branch(ctx, &name).await
            }
            RepositoryCommand::ToggleBranchAnalysis { branch, action } => {
                self.toggle_branch_analysis(ctx, &branch, &action).await
            }
            RepositoryCommand::SetExcludePatterns { patterns } => {
                self.set_exclude_patterns(ctx, patterns).await
            }
            RepositoryCommand::IgnoreCodeFile { path } => self.ignore_code_file(ctx, &path).await,
            RepositoryCommand::Delete { identity } => self.delete(ctx, &identity).await,
            RepositoryCommand::RefreshProvider { identity } => {
                self.refresh_provider(ctx, &identity).await
            }
            RepositoryCommand::CodeFile { path } => self.code_file(ctx, &path).await,
            RepositoryCommand::ViewMore {
                path,
                start_line,
                end_line,
            } => self.view_more(ctx, &path, start_line, end_line).await,
        }
    }

    pub async fn rename(&self, ctx: &mut PageContext, name: &str) -> CoreResult<ActionResult> {
        let coordinator = RenameCoordinator::new(
            self.collaborators.normalizer.as_ref(),
            self.collaborators.repositories.as_ref(),
        );
        let plan = coordinator
            .rename(&mut ctx.repository, &mut ctx.url_key, name)
            .await?;
        self.runner().apply(&ctx.repository, &plan.effects).await?;

        Ok(match plan.outcome {
            RenameOutcome::Unusable(error) | RenameOutcome::Conflict(error) => {
                ActionResult::Invalid(error.into_field_errors())
            }
            RenameOutcome::Renamed(key) => ActionResult::ScriptRedirect(self.urls.settings_url(&key)),
        })
    }

    pub async fn set_default_branch(
        &self,
        ctx: &mut PageContext,
        name: &str,
    ) -> CoreResult<ActionResult> {
        let plan = plan_set_default_branch(&mut ctx.repository, &mut ctx.url_key, name);
        self.runner().apply(&ctx.repository, &plan.effects).await?;

        Ok(match plan.outcome {
            DefaultBranchOutcome::NotFound => ActionResult::NotFound,
            DefaultBranchOutcome::Switched(_) => {
                ActionResult::ScriptRedirect(self.urls.settings_url(&ctx.url_key))
            }
        })
    }

    /// Fails with [`crate::CoreError::UnsupportedAction`] before touching
    /// any collaborator when `action` is not `start` or `stop`.
    pub async fn toggle_branch_analysis(
        &self,
        ctx: &PageContext,
        branch: &str,
        action: &str,
    ) -> CoreResult<ActionResult> {
        let action = AnalysisLifecycle::parse_action(action)?;
        let plan = AnalysisLifecycle::plan_toggle(&ctx.repository, branch, action);
        self.runner().apply(&ctx.repository, &plan.effects).await?;

        Ok(match plan.outcome {
            ToggleOutcome::NotFound => ActionResult::NotFound,
            ToggleOutcome::Issued { .. } => ActionResult::Empty,
        })
    }

    pub async fn set_exclude_patterns(
        &self,
        ctx: &mut PageContext,
        patterns: Option<Vec<String>>,
    ) -> CoreResult<ActionResult> {
        let plan = plan_set_exclude_patterns(&mut ctx.repository, patterns);
        self.runner().apply(&ctx.repository, &plan.effects).await?;

        Ok(match plan.outcome {
            PatternsOutcome::NoOp => ActionResult::Empty,
            PatternsOutcome::Changed(response) => {
                ActionResult::Json(JsonPayload::ExcludePatterns(response))
            }
        })
    }

    pub async fn ignore_code_file(
        &self,
        ctx: &mut PageContext,
        path: &str,
    ) -> CoreResult<ActionResult> {
        let workflow = IgnoreFileWorkflow::new(self.collaborators.code_files.as_ref());
        let plan = workflow.ignore(&mut ctx.repository, &ctx.branch, path).await?;
        self.runner().apply(&ctx.repository, &plan.effects).await?;

        Ok(match plan.outcome {
            IgnoreOutcome::NotFound => ActionResult::NotFound,
            IgnoreOutcome::Ignored { .. } => ActionResult::Redirect(self.urls.files_url(&ctx.url_key)),
        })
    }

    /// Ownership is checked by the removal backend, not here.
    pub async fn delete(&self, ctx: &PageContext, identity: &Identity) -> CoreResult<ActionResult> {
        let request = DeleteRepositoryRequest {
            repository_key: ctx.repository.key.clone(),
            user_key: identity.user_key.clone(),
        };
        self.collaborators.removal.delete(&request).await?;
        tracing::info!(repository = %request.repository_key, user = %request.user_key, "Repository deleted");

        Ok(ActionResult::ScriptRedirect(self.urls.dashboard_url()))
    }

    pub async fn refresh_provider(
        &self,
        ctx: &PageContext,
        identity: &Identity,
    ) -> CoreResult<ActionResult> {
        let provider = self.collaborators.provider.as_ref();
        if !provider.can_refresh(&ctx.repository).await? {
            tracing::debug!(repository = %ctx.repository.key, "Provider refresh not available");
            return Ok(ActionResult::Empty);
        }

        let response = provider.refresh(&ctx.repository, &identity.user_key).await?;
        Ok(ActionResult::Json(JsonPayload::RefreshProvider(response)))
    }

    /// Decide how a single file is shown.
    ///
    /// Hidden files do not exist as far as the viewer is concerned. Ignored
    /// files get a placeholder page pointing at the exclude-pattern editor.
    pub async fn code_file(&self, ctx: &mut PageContext, path: &str) -> CoreResult<ActionResult> {
        let detail = self
            .collaborators
            .details
            .get_file_detail(&ctx.repository, &ctx.branch, path)
            .await?;
        let Some(detail) = detail.filter(|detail| !detail.is_hidden) else {
            return Ok(ActionResult::NotFound);
        };

        ctx.header.active_url = Some(ctx.header.files_url.clone());

        if detail.is_ignored {
            return Ok(ActionResult::View(PageView::IgnoredFile(IgnoredFilePage {
                edit_exclude_patterns_link: ctx.header.ignore_link.clone(),
                header: ctx.header.clone(),
            })));
        }

        let ignore_file_button_visible = self
            .collaborators
            .security
            .is_allowed(RepositoryAction::IgnoreCodeFile, ctx.role);

        Ok(ActionResult::View(PageView::CodeFile(CodeFilePage {
            header: ctx.header.clone(),
            detail,
            ignore_file_url: self.urls.ignore_file_url(&ctx.url_key),
            ignore_file_button_visible,
        })))
    }

    pub async fn view_more(
        &self,
        ctx: &PageContext,
        path: &str,
        start_line: u32,
        end_line: u32,
    ) -> CoreResult<ActionResult> {
        let Some(code_file) = self
            .collaborators
            .code_files
            .get_code_file(&ctx.branch, path)
            .await?
        else {
            return Ok(ActionResult::NotFound);
        };

        let lines = self
            .collaborators
            .details
            .read_lines(&code_file, start_line, end_line)
            .await?;
        Ok(ActionResult::Json(JsonPayload::CodeLines(lines)))
    }
}
