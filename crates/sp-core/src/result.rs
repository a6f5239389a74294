// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Transport-neutral results of repository page commands

use serde::Serialize;
use sp_rest_api_contract::{
    CodeFilePage, CodeLinesResponse, FieldErrors, IgnoredFilePage, RefreshProviderResponse,
    SetExcludePatternsResponse,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult {
    /// Render a page model
    View(PageView),
    /// Redirect handled by the transport
    Redirect(String),
    /// Redirect performed by the page script after an asynchronous call
    ScriptRedirect(String),
    Json(JsonPayload),
    /// Validation failures keyed by field
    Invalid(FieldErrors),
    NotFound,
    /// Benign acknowledgement without a body
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PageView {
    CodeFile(CodeFilePage),
    IgnoredFile(IgnoredFilePage),
}

impl PageView {
    pub fn name(&self) -> &'static str {
        match self {
            PageView::CodeFile(_) => "code-file",
            PageView::IgnoredFile(_) => "ignored-code-file",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JsonPayload {
    ExcludePatterns(SetExcludePatternsResponse),
    RefreshProvider(RefreshProviderResponse),
    CodeLines(CodeLinesResponse),
}
