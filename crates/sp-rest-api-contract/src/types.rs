// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! API contract types for the Sapphire repository-page service

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Rename a repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct RenameRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,
}

/// Make another branch the repository default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct SetDefaultBranchRequest {
    #[validate(length(min = 1, message = "Branch name cannot be empty"))]
    pub name: String,
}

/// Start or stop analysis of a branch.
///
/// `action` is kept as free text; values outside `start`/`stop` are rejected
/// by the core, not by deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ToggleBranchAnalysisRequest {
    #[serde(default)]
    pub action: String,
}

/// Replace the repository exclude patterns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct SetExcludePatternsRequest {
    #[serde(default)]
    pub patterns: Option<Vec<String>>,
}

/// Ignore a single file of the current branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct IgnoreCodeFileRequest {
    #[validate(length(min = 1, message = "Path cannot be empty"))]
    pub path: String,
}

/// Query of the code file page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct CodeFileQuery {
    #[validate(length(min = 1, message = "Path cannot be empty"))]
    pub path: String,
}

/// Query for additional lines of a code file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[validate(schema(function = "validate_line_range"))]
pub struct ViewMoreQuery {
    #[validate(length(min = 1, message = "Path cannot be empty"))]
    pub path: String,
    #[validate(range(min = 1, message = "Lines are numbered from 1"))]
    pub start_line: u32,
    pub end_line: u32,
}

fn validate_line_range(query: &ViewMoreQuery) -> Result<(), ValidationError> {
    if query.end_line < query.start_line {
        let mut error = ValidationError::new("line_range");
        error.message = Some("end_line must not precede start_line".into());
        return Err(error);
    }
    Ok(())
}

/// Redirect performed by the page script rather than by HTTP status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct RedirectResponse {
    pub redirect_url: String,
}

/// Acknowledgement that the exclude patterns changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct SetExcludePatternsResponse {
    pub message: String,
    pub patterns: Vec<String>,
}

impl SetExcludePatternsResponse {
    pub fn updated(patterns: Vec<String>) -> Self {
        Self {
            message: "Exclude patterns updated. Files will be re-evaluated shortly.".to_string(),
            patterns,
        }
    }
}

/// Result of refreshing the hosting-provider metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct RefreshProviderResponse {
    pub message: String,
    pub branches: usize,
}

/// A range of lines of a code file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct CodeLinesResponse {
    pub path: String,
    pub start_line: u32,
    pub end_line: u32,
    pub lines: Vec<String>,
}

/// Detail of a code file as produced by the page service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct CodeFileDetail {
    pub path: String,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_ignored: bool,
    #[serde(default)]
    pub line_count: u32,
}

/// Page header shared by every repository page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct PageHeader {
    pub files_url: String,
    pub settings_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_url: Option<String>,
    /// Link to the exclude-patterns editor, when the viewer may edit them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_link: Option<String>,
}

/// Code file page model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct CodeFilePage {
    pub header: PageHeader,
    pub detail: CodeFileDetail,
    pub ignore_file_url: String,
    pub ignore_file_button_visible: bool,
}

/// Page shown instead of a file that matches an exclude pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct IgnoredFilePage {
    pub header: PageHeader,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_exclude_patterns_link: Option<String>,
}
