// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Sapphire repository-page API contract types and validation
//!
//! These types are shared between the request-handling core, which produces
//! the response payloads and page models, and the REST server, which decodes
//! the requests and renders the responses.

pub mod error;
pub mod types;
pub mod validation;

pub use error::*;
pub use types::*;

/// Generate OpenAPI schema for the API contract types
#[cfg(feature = "utoipa")]
pub fn openapi_schema() -> utoipa::openapi::OpenApi {
    use utoipa::OpenApi;
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Sapphire Repository API"),
        paths(),
        components(schemas(
            RenameRequest,
            SetDefaultBranchRequest,
            ToggleBranchAnalysisRequest,
            SetExcludePatternsRequest,
            IgnoreCodeFileRequest,
            CodeFileQuery,
            ViewMoreQuery,
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
    struct ApiDoc;
    ApiDoc::openapi()
}
