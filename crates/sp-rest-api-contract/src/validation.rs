// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Validation helpers for API contract types

use crate::error::ApiContractError;
use crate::types::*;
use validator::Validate;

/// Validate a rename request
pub fn validate_rename_request(request: &RenameRequest) -> Result<(), ApiContractError> {
    request.validate()?;
    Ok(())
}

/// Validate a default-branch request
pub fn validate_set_default_branch_request(
    request: &SetDefaultBranchRequest,
) -> Result<(), ApiContractError> {
    request.validate()?;
    Ok(())
}

/// Validate an ignore-file request
pub fn validate_ignore_code_file_request(
    request: &IgnoreCodeFileRequest,
) -> Result<(), ApiContractError> {
    request.validate()?;
    Ok(())
}

/// Validate a view-more query
pub fn validate_view_more_query(query: &ViewMoreQuery) -> Result<(), ApiContractError> {
    query.validate()?;
    Ok(())
}
