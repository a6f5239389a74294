// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Repository page handlers

use crate::auth::Viewer;
use crate::error::{ServerError, ServerResult};
use crate::response::ActionResponse;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use sp_core::{PageContext, RepositoryCommand};
use sp_domain_types::{RepositoryAction, RepositoryUrlKey};
use sp_rest_api_contract::validation::{
    validate_ignore_code_file_request, validate_rename_request,
    validate_set_default_branch_request, validate_view_more_query,
};
use sp_rest_api_contract::{
    CodeFileQuery, IgnoreCodeFileRequest, RenameRequest, SetDefaultBranchRequest,
    SetExcludePatternsRequest, ToggleBranchAnalysisRequest, ViewMoreQuery,
};
use validator::Validate;

async fn page_context(
    state: &AppState,
    url_key: RepositoryUrlKey,
    viewer: &Viewer,
) -> ServerResult<PageContext> {
    let display = format!("{}/{}", url_key.owner, url_key.name);
    state
        .contexts
        .resolve(url_key, viewer.role)
        .await?
        .ok_or(ServerError::RepositoryNotFound(display))
}

async fn run(
    state: &AppState,
    mut ctx: PageContext,
    command: RepositoryCommand,
) -> ServerResult<ActionResponse> {
    let result = state.orchestrator.execute(&mut ctx, command).await?;
    Ok(ActionResponse(result))
}

/// Rename a repository
#[utoipa::path(
    post,
    path = "/api/v1/repos/{owner}/{name}/rename",
    request_body = RenameRequest,
    responses(
        (status = 200, description = "Renamed; the page navigates to the new settings URL", body = sp_rest_api_contract::RedirectResponse),
        (status = 400, description = "Invalid name or name already taken", body = sp_rest_api_contract::ProblemDetails),
        (status = 403, description = "Viewer may not rename", body = sp_rest_api_contract::ProblemDetails),
        (status = 404, description = "Repository not found", body = sp_rest_api_contract::ProblemDetails)
    ),
    params(
        ("owner" = String, Path, description = "Repository owner"),
        ("name" = String, Path, description = "Repository name")
    )
)]
pub async fn rename_repository(
    State(state): State<AppState>,
    Path((owner, name)): Path<(String, String)>,
    viewer: Viewer,
    Json(request): Json<RenameRequest>,
) -> ServerResult<ActionResponse> {
    viewer.authorize(state.security.as_ref(), RepositoryAction::Rename)?;
    validate_rename_request(&request)?;

    let ctx = page_context(&state, RepositoryUrlKey::new(owner, name), &viewer).await?;
    run(&state, ctx, RepositoryCommand::Rename { name: request.name }).await
}

/// Make another branch the default
#[utoipa::path(
    post,
    path = "/api/v1/repos/{owner}/{name}/default-branch",
    request_body = SetDefaultBranchRequest,
    responses(
        (status = 200, description = "Default switched; the page navigates to the settings URL", body = sp_rest_api_contract::RedirectResponse),
        (status = 403, description = "Viewer may not change the default branch", body = sp_rest_api_contract::ProblemDetails),
        (status = 404, description = "Repository or branch not found", body = sp_rest_api_contract::ProblemDetails)
    ),
    params(
        ("owner" = String, Path, description = "Repository owner"),
        ("name" = String, Path, description = "Repository name")
    )
)]
pub async fn set_default_branch(
    State(state): State<AppState>,
    Path((owner, name)): Path<(String, String)>,
    viewer: Viewer,
    Json(request): Json<SetDefaultBranchRequest>,
) -> ServerResult<ActionResponse> {
    viewer.authorize(state.security.as_ref(), RepositoryAction::SetDefaultBranch)?;
    validate_set_default_branch_request(&request)?;

    let ctx = page_context(&state, RepositoryUrlKey::new(owner, name), &viewer).await?;
    run(
        &state,
        ctx,
        RepositoryCommand::SetDefaultBranch { name: request.name },
    )
    .await
}

/// Start or stop the analysis of a branch
#[utoipa::path(
    post,
    path = "/api/v1/repos/{owner}/{name}/branches/{branch}/analysis",
    request_body = ToggleBranchAnalysisRequest,
    responses(
        (status = 204, description = "Command issued"),
        (status = 404, description = "Repository or branch not found", body = sp_rest_api_contract::ProblemDetails),
        (status = 500, description = "Action is neither start nor stop", body = sp_rest_api_contract::ProblemDetails)
    ),
    params(
        ("owner" = String, Path, description = "Repository owner"),
        ("name" = String, Path, description = "Repository name"),
        ("branch" = String, Path, description = "Branch name")
    )
)]
pub async fn toggle_branch_analysis(
    State(state): State<AppState>,
    Path((owner, name, branch)): Path<(String, String, String)>,
    viewer: Viewer,
    Json(request): Json<ToggleBranchAnalysisRequest>,
) -> ServerResult<ActionResponse> {
    viewer.authorize(state.security.as_ref(), RepositoryAction::ToggleBranchAnalysis)?;

    let ctx = page_context(&state, RepositoryUrlKey::new(owner, name), &viewer).await?;
    run(
        &state,
        ctx,
        RepositoryCommand::ToggleBranchAnalysis {
            branch,
            action: request.action,
        },
    )
    .await
}

/// Replace the exclude patterns
#[utoipa::path(
    put,
    path = "/api/v1/repos/{owner}/{name}/exclude-patterns",
    request_body = SetExcludePatternsRequest,
    responses(
        (status = 200, description = "Patterns changed", body = sp_rest_api_contract::SetExcludePatternsResponse),
        (status = 204, description = "Nothing to change"),
        (status = 404, description = "Repository not found", body = sp_rest_api_contract::ProblemDetails)
    ),
    params(
        ("owner" = String, Path, description = "Repository owner"),
        ("name" = String, Path, description = "Repository name")
    )
)]
pub async fn set_exclude_patterns(
    State(state): State<AppState>,
    Path((owner, name)): Path<(String, String)>,
    viewer: Viewer,
    Json(request): Json<SetExcludePatternsRequest>,
) -> ServerResult<ActionResponse> {
    viewer.authorize(state.security.as_ref(), RepositoryAction::SetExcludePatterns)?;

    let ctx = page_context(&state, RepositoryUrlKey::new(owner, name), &viewer).await?;
    run(
        &state,
        ctx,
        RepositoryCommand::SetExcludePatterns {
            patterns: request.patterns,
        },
    )
    .await
}

/// Exclude a single file and hide it
#[utoipa::path(
    post,
    path = "/api/v1/repos/{owner}/{name}/branches/{branch}/ignore",
    request_body = IgnoreCodeFileRequest,
    responses(
        (status = 303, description = "File ignored; redirect to the file listing"),
        (status = 404, description = "Repository, branch or file not found", body = sp_rest_api_contract::ProblemDetails)
    ),
    params(
        ("owner" = String, Path, description = "Repository owner"),
        ("name" = String, Path, description = "Repository name"),
        ("branch" = String, Path, description = "Branch name")
    )
)]
pub async fn ignore_code_file(
    State(state): State<AppState>,
    Path((owner, name, branch)): Path<(String, String, String)>,
    viewer: Viewer,
    Json(request): Json<IgnoreCodeFileRequest>,
) -> ServerResult<ActionResponse> {
    viewer.authorize(state.security.as_ref(), RepositoryAction::IgnoreCodeFile)?;
    validate_ignore_code_file_request(&request)?;

    let url_key = RepositoryUrlKey::new(owner, name).with_branch(branch);
    let ctx = page_context(&state, url_key, &viewer).await?;
    run(&state, ctx, RepositoryCommand::IgnoreCodeFile { path: request.path }).await
}

/// Delete a repository owned by the caller
#[utoipa::path(
    delete,
    path = "/api/v1/repos/{owner}/{name}",
    responses(
        (status = 200, description = "Deleted; the page navigates to the dashboard", body = sp_rest_api_contract::RedirectResponse),
        (status = 401, description = "No identity", body = sp_rest_api_contract::ProblemDetails),
        (status = 403, description = "Caller does not own the repository", body = sp_rest_api_contract::ProblemDetails),
        (status = 404, description = "Repository not found", body = sp_rest_api_contract::ProblemDetails)
    ),
    params(
        ("owner" = String, Path, description = "Repository owner"),
        ("name" = String, Path, description = "Repository name")
    )
)]
pub async fn delete_repository(
    State(state): State<AppState>,
    Path((owner, name)): Path<(String, String)>,
    viewer: Viewer,
) -> ServerResult<ActionResponse> {
    let identity = viewer.identity()?.clone();
    viewer.authorize(state.security.as_ref(), RepositoryAction::Delete)?;

    let ctx = page_context(&state, RepositoryUrlKey::new(owner, name), &viewer).await?;
    run(&state, ctx, RepositoryCommand::Delete { identity }).await
}

/// Refresh the metadata held by the hosting provider
#[utoipa::path(
    post,
    path = "/api/v1/repos/{owner}/{name}/refresh-provider",
    responses(
        (status = 200, description = "Refreshed", body = sp_rest_api_contract::RefreshProviderResponse),
        (status = 204, description = "Repository cannot be refreshed"),
        (status = 401, description = "No identity", body = sp_rest_api_contract::ProblemDetails)
    ),
    params(
        ("owner" = String, Path, description = "Repository owner"),
        ("name" = String, Path, description = "Repository name")
    )
)]
pub async fn refresh_provider(
    State(state): State<AppState>,
    Path((owner, name)): Path<(String, String)>,
    viewer: Viewer,
) -> ServerResult<ActionResponse> {
    let identity = viewer.identity()?.clone();
    viewer.authorize(state.security.as_ref(), RepositoryAction::RefreshProvider)?;

    let ctx = page_context(&state, RepositoryUrlKey::new(owner, name), &viewer).await?;
    run(&state, ctx, RepositoryCommand::RefreshProvider { identity }).await
}

/// Page model of a single code file
#[utoipa::path(
    get,
    path = "/api/v1/repos/{owner}/{name}/branches/{branch}/file",
    responses(
        (status = 200, description = "Code file page, or the ignored-file page when the file is excluded", body = sp_rest_api_contract::CodeFilePage),
        (status = 404, description = "File missing or hidden", body = sp_rest_api_contract::ProblemDetails)
    ),
    params(
        ("owner" = String, Path, description = "Repository owner"),
        ("name" = String, Path, description = "Repository name"),
        ("branch" = String, Path, description = "Branch name"),
        ("path" = String, Query, description = "File path within the branch")
    )
)]
pub async fn code_file(
    State(state): State<AppState>,
    Path((owner, name, branch)): Path<(String, String, String)>,
    viewer: Viewer,
    Query(query): Query<CodeFileQuery>,
) -> ServerResult<ActionResponse> {
    query.validate()?;

    let url_key = RepositoryUrlKey::new(owner, name).with_branch(branch);
    let ctx = page_context(&state, url_key, &viewer).await?;
    run(&state, ctx, RepositoryCommand::CodeFile { path: query.path }).await
}

/// Additional lines of a code file
#[utoipa::path(
    get,
    path = "/api/v1/repos/{owner}/{name}/branches/{branch}/view-more",
    responses(
        (status = 200, description = "Requested lines", body = sp_rest_api_contract::CodeLinesResponse),
        (status = 400, description = "Invalid line range", body = sp_rest_api_contract::ProblemDetails),
        (status = 404, description = "File not found", body = sp_rest_api_contract::ProblemDetails)
    ),
    params(
        ("owner" = String, Path, description = "Repository owner"),
        ("name" = String, Path, description = "Repository name"),
        ("branch" = String, Path, description = "Branch name"),
        ("path" = String, Query, description = "File path within the branch"),
        ("start_line" = u32, Query, description = "First line, 1-based"),
        ("end_line" = u32, Query, description = "Last line, inclusive")
    )
)]
pub async fn view_more(
    State(state): State<AppState>,
    Path((owner, name, branch)): Path<(String, String, String)>,
    viewer: Viewer,
    Query(query): Query<ViewMoreQuery>,
) -> ServerResult<ActionResponse> {
    validate_view_more_query(&query)?;

    let url_key = RepositoryUrlKey::new(owner, name).with_branch(branch);
    let ctx = page_context(&state, url_key, &viewer).await?;
    run(
        &state,
        ctx,
        RepositoryCommand::ViewMore {
            path: query.path,
            start_line: query.start_line,
            end_line: query.end_line,
        },
    )
    .await
}
