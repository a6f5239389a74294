// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! OpenAPI specification endpoint

use crate::handlers::repositories;
use axum::response::Json;
use sp_rest_api_contract::*;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Sapphire Repository API"),
    paths(
        repositories::rename_repository,
        repositories::set_default_branch,
        repositories::toggle_branch_analysis,
        repositories::set_exclude_patterns,
        repositories::ignore_code_file,
        repositories::delete_repository,
        repositories::refresh_provider,
        repositories::code_file,
        repositories::view_more
    ),
    components(schemas(
        RenameRequest,
        SetDefaultBranchRequest,
        ToggleBranchAnalysisRequest,
        SetExcludePatternsRequest,
        IgnoreCodeFileRequest,
        RedirectResponse,
        SetExcludePatternsResponse,
        RefreshProviderResponse,
        CodeLinesResponse,
        CodeFileDetail,
        PageHeader,
        CodeFilePage,
        IgnoredFilePage,
        ProblemDetails
    ))
)]
pub struct ApiDoc;

/// OpenAPI specification endpoint
pub async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
